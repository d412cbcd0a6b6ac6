//! # Michi - endless driving arcade game
//!
//! The car stays put, the world streams past it and alternates between city and
//! farmland every kilometre or so. This crate runs sessions on top of the
//! `michi-core` streaming world: natively from the command line, or in the browser
//! through `WebSession`.

pub mod autopilot;
pub mod config;
pub mod render;
pub mod session;

#[cfg(target_arch = "wasm32")]
mod web;

// Re-export core modules for convenience
pub use michi_core::entity;
pub use michi_core::world;

pub use session::{Session, SessionSummary};

#[cfg(target_arch = "wasm32")]
pub use web::WebSession;

// WASM entry point
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages in the browser console
    console_error_panic_hook::set_once();

    // Initialize logging for WASM
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }

    log::info!("Michi WASM module initialized");
}
