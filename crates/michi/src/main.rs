use anyhow::Context;
use clap::Parser;
use michi::autopilot::Autopilot;
use michi::config::GameConfig;
use michi::session::Session;
use michi::world::StreamingConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to drive (overrides config, 0 = until crash)
    #[arg(long)]
    ticks: Option<u64>,

    /// Streaming preset: default, long_city, quick_switch
    #[arg(long)]
    preset: Option<String>,

    /// Load the streaming world from a RON file instead of a preset
    #[arg(long)]
    world: Option<String>,

    /// Keep driving after hitting a hazard
    #[arg(long)]
    invincible: bool,

    /// Print the resolved streaming configuration as RON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = GameConfig::load()?;

    let default_level = if config.debug.verbose_logging {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Some(seed) = args.seed {
        config.session.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.session.max_ticks = ticks;
    }
    if let Some(preset) = args.preset {
        config.session.preset = preset;
        config.streaming = None;
    }
    if let Some(path) = args.world {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read world file {}", path))?;
        config.streaming = Some(
            StreamingConfig::from_ron_str(&source)
                .with_context(|| format!("Invalid world file {}", path))?,
        );
    }
    if args.invincible {
        config.debug.invincible = true;
    }

    if args.print_config {
        println!("{}", config.resolve_streaming()?.to_ron_string()?);
        return Ok(());
    }

    if config.session.max_ticks == 0 && config.debug.invincible {
        anyhow::bail!("An invincible run needs --ticks, it would never end");
    }

    let mut session = Session::new(config)?;
    let summary = session.run_autopilot(&mut Autopilot::new(), 0);

    match &summary.crashed_into {
        Some(hazard) => log::info!(
            "Game over after {} ticks: crashed into {}",
            summary.ticks,
            hazard
        ),
        None => log::info!("Finished {} ticks without a crash", summary.ticks),
    }
    println!(
        "{}",
        ron::ser::to_string_pretty(&summary, ron::ser::PrettyConfig::default())?
    );

    Ok(())
}
