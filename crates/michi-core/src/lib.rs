pub mod entity;
pub mod error;
pub mod world;

pub use error::{StreamingError, StreamingResult};
pub use world::{StreamingConfig, StreamingWorld};
