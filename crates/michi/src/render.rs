//! Flat draw buffers for front ends
//!
//! Renderers get plain `f64` arrays rather than world types so the same data can
//! cross the wasm boundary. Only what is visible this tick is written; hidden
//! biome sets and a parked tunnel produce nothing.

use michi_core::world::{BiomeType, SceneryKind, StreamingWorld, StructureKind};

/// Values per entry in [`scenery_buffer`]
pub const SCENERY_STRIDE: usize = 3;
/// Values per entry in [`structure_buffer`]
pub const STRUCTURE_STRIDE: usize = 4;

pub fn scenery_code(kind: &SceneryKind) -> f64 {
    match kind {
        SceneryKind::RoadSlab { .. } => 0.0,
        SceneryKind::Divider { .. } => 1.0,
        SceneryKind::Fence { .. } => 2.0,
        SceneryKind::Tree => 3.0,
        SceneryKind::House => 4.0,
        SceneryKind::Lamp => 5.0,
        SceneryKind::Pothole { .. } => 6.0,
        SceneryKind::Traffic { .. } => 7.0,
    }
}

pub fn structure_code(kind: StructureKind) -> f64 {
    match kind {
        StructureKind::Intersection => 0.0,
        StructureKind::CrossingTraffic => 1.0,
        StructureKind::RailCrossing => 2.0,
        StructureKind::Train => 3.0,
    }
}

/// Visible road and biome scenery as `[kind, x, z]` triples
pub fn scenery_buffer(world: &StreamingWorld) -> Vec<f64> {
    let sets = [BiomeType::City, BiomeType::Farmland].map(|b| world.biome_set(b));
    world
        .road()
        .visible()
        .chain(sets.into_iter().flat_map(|set| set.scenery().visible()))
        .flat_map(|object| {
            let p = object.position();
            [scenery_code(&object.kind), p.x, p.z]
        })
        .collect()
}

/// Visible structures as `[kind, x, z, depth]` quads
pub fn structure_buffer(world: &StreamingWorld) -> Vec<f64> {
    [BiomeType::City, BiomeType::Farmland]
        .into_iter()
        .flat_map(|b| world.biome_set(b).structures())
        .filter(|s| s.entity.is_visible())
        .flat_map(|s| {
            let p = s.entity.position;
            [structure_code(s.kind), p.x, p.z, s.depth]
        })
        .collect()
}

/// Camera-relative `[mouth, exit]` of the tunnel, empty while it is parked
pub fn tunnel_buffer(world: &StreamingWorld) -> Vec<f64> {
    let tunnel = world.tunnel();
    if tunnel.is_hidden() {
        return Vec::new();
    }
    let (mouth, exit) = tunnel.view_span();
    vec![mouth, exit]
}
