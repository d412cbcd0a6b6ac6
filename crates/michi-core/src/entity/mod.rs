pub mod input;
pub mod vehicle;

pub use input::DriveInput;
pub use vehicle::{Vehicle, VehicleConfig, VehicleStep};
