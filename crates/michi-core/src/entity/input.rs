//! Driver input state

/// Controls held during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveInput {
    pub accelerate: bool,
    pub brake: bool,
    /// Hold to wind up a launch, release to fire it
    pub rewind: bool,
    /// Lateral steering, -1.0 (left) to 1.0 (right)
    pub steer: f64,
}

impl DriveInput {
    pub fn new() -> Self {
        Self {
            accelerate: false,
            brake: false,
            rewind: false,
            steer: 0.0,
        }
    }

    /// Accelerate straight ahead
    pub fn cruise() -> Self {
        Self {
            accelerate: true,
            ..Self::new()
        }
    }

    /// Steering clamped to `[-1, 1]`, NaN treated as centered
    pub fn steer_axis(&self) -> f64 {
        if self.steer.is_nan() {
            0.0
        } else {
            self.steer.clamp(-1.0, 1.0)
        }
    }
}

impl Default for DriveInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_new() {
        let input = DriveInput::new();
        assert!(!input.accelerate);
        assert!(!input.brake);
        assert!(!input.rewind);
        assert_eq!(input.steer, 0.0);
    }

    #[test]
    fn test_steer_axis_clamped() {
        let mut input = DriveInput::cruise();
        input.steer = 3.0;
        assert_eq!(input.steer_axis(), 1.0);
        input.steer = -0.25;
        assert_eq!(input.steer_axis(), -0.25);
        input.steer = f64::NAN;
        assert_eq!(input.steer_axis(), 0.0);
    }
}
