//! World streaming - pooled scenery, biome switching, the transition tunnel

pub mod biome;
pub mod biome_transition;
mod builder;
pub mod hazards;
pub mod notifications;
pub mod placement;
pub mod recyclable;
mod recycler;
pub mod rng_trait;
pub mod scenery;
mod streaming;
pub mod streaming_config;
pub mod structures;
pub mod tunnel;
pub mod zones;

pub use biome::{BiomeSet, BiomeSetUpdate, BiomeType};
pub use biome_transition::{BiomeTransitionMachine, SwitchSnapshot, TransitionStep};
pub use builder::{build_biome_set, build_road};
pub use hazards::{Hazard, HazardKind, HazardProbe};
pub use notifications::{NoopNotifications, NotificationLog, NotificationSink};
pub use placement::{OpenSegment, PointPlacement, plan_contiguous_segments, plan_point_placements};
pub use recyclable::{Recyclable, RecyclableEntity, Visibility, clamp_world_speed};
pub use recycler::SegmentRecycler;
pub use rng_trait::WorldRng;
pub use scenery::{SceneryKind, SceneryObject, WarningMarker};
pub use streaming::{StreamingWorld, TickReport};
pub use streaming_config::{
    BiomeLayout, LayoutConfig, RoadConfig, ScatterKind, ScatterLayout, StreamingConfig,
    StructureKind, StructureLayout, TransitionConfig,
};
pub use structures::{DodgeRule, PhaseLockedStructure, StructureUpdate, needs_double_jump};
pub use tunnel::{PreSpawnWindow, TransitionTunnel, TunnelEvent};
pub use zones::{DEFAULT_LATERAL_HALF_WIDTH, ZoneDescriptor, ZoneRegistry};
