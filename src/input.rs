//! Tilt input mapping
//!
//! The simulation only consumes two acceleration scalars and two friction
//! magnitudes per tick. These helpers turn a pointer drag or a device
//! orientation reading into that quadruple.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_abs;

/// Maximum pointer drag distance honoured on each axis
pub const DRAG_LIMIT: f32 = 15.0;
/// Board rotation (degrees) per unit of pointer drag
pub const DRAG_GAIN: f32 = 0.8;

/// Per-tick tilt input, before time scaling
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TiltInput {
    /// Acceleration along x and y
    pub accel: Vec2,
    /// Friction magnitude along x and y (always non-negative)
    pub friction: Vec2,
}

impl TiltInput {
    /// Board rotated by `rot_x_deg` about the x axis (tilts y) and
    /// `rot_y_deg` about the y axis (tilts x)
    pub fn from_rotation(rot_x_deg: f32, rot_y_deg: f32, gravity: f32, friction_coeff: f32) -> Self {
        let rx = rot_x_deg.to_radians();
        let ry = rot_y_deg.to_radians();
        Self {
            accel: Vec2::new(gravity * ry.sin(), gravity * rx.sin()),
            friction: Vec2::new(
                gravity * ry.cos() * friction_coeff,
                gravity * rx.cos() * friction_coeff,
            ),
        }
    }

    /// Joystick-style drag: `delta` is pointer position minus drag start
    pub fn from_drag(delta: Vec2, gravity: f32, friction_coeff: f32) -> Self {
        let dx = clamp_abs(delta.x, DRAG_LIMIT);
        let dy = clamp_abs(delta.y, DRAG_LIMIT);
        Self::from_rotation(dy * DRAG_GAIN, dx * DRAG_GAIN, gravity, friction_coeff)
    }

    /// Scale by the elapsed-time ratio for one tick
    pub fn scaled(&self, time_scale: f32) -> Self {
        Self {
            accel: self.accel * time_scale,
            friction: self.friction * time_scale,
        }
    }
}

/// Response curve for one device-orientation axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCurve {
    /// Usable device tilt (degrees) before saturating
    pub max_tilt: f32,
    /// Board rotation produced at full tilt
    pub max_rotation: f32,
    /// Exponent; below 1 makes small tilts more sensitive
    pub curve: f32,
    pub invert: bool,
}

impl AxisCurve {
    pub fn map(&self, tilt_deg: f32) -> f32 {
        let a = clamp_abs(tilt_deg, self.max_tilt);
        if a == 0.0 {
            return 0.0;
        }
        let n = a.abs() / self.max_tilt;
        let out = a.signum() * n.powf(self.curve) * self.max_rotation;
        if self.invert { -out } else { out }
    }
}

/// Maps device orientation (beta = front/back, gamma = left/right) to tilt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationMapper {
    pub front_back: AxisCurve,
    pub left_right: AxisCurve,
    /// Neutral-grip calibration offsets
    pub beta_offset: f32,
    pub gamma_offset: f32,
}

impl Default for OrientationMapper {
    fn default() -> Self {
        Self {
            // Front/back gets a larger range to compensate for sluggish pitch
            front_back: AxisCurve {
                max_tilt: 15.0,
                max_rotation: 32.0,
                curve: 0.48,
                invert: false,
            },
            left_right: AxisCurve {
                max_tilt: 15.0,
                max_rotation: 24.0,
                curve: 0.55,
                invert: false,
            },
            beta_offset: 0.0,
            gamma_offset: 0.0,
        }
    }
}

impl OrientationMapper {
    /// Treat the current grip as level
    pub fn calibrate(&mut self, beta: f32, gamma: f32) {
        self.beta_offset = beta;
        self.gamma_offset = gamma;
    }

    /// Board rotation `(rot_x, rot_y)` in degrees for a raw reading
    pub fn rotation(&self, beta: f32, gamma: f32) -> (f32, f32) {
        let rot_x = self.front_back.map(beta - self.beta_offset);
        let rot_y = self.left_right.map(gamma - self.gamma_offset);
        (rot_x, rot_y)
    }

    pub fn to_input(&self, beta: f32, gamma: f32, gravity: f32, friction_coeff: f32) -> TiltInput {
        let (rot_x, rot_y) = self.rotation(beta, gamma);
        TiltInput::from_rotation(rot_x, rot_y, gravity, friction_coeff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FRICTION_COEFF, GRAVITY};

    #[test]
    fn test_flat_board_has_no_acceleration() {
        let input = TiltInput::from_rotation(0.0, 0.0, GRAVITY, FRICTION_COEFF);
        assert_eq!(input.accel, Vec2::ZERO);
        assert!((input.friction.x - GRAVITY * FRICTION_COEFF).abs() < 1e-7);
        assert!((input.friction.y - GRAVITY * FRICTION_COEFF).abs() < 1e-7);
    }

    #[test]
    fn test_drag_is_clamped() {
        let far = TiltInput::from_drag(Vec2::new(100.0, -100.0), GRAVITY, FRICTION_COEFF);
        let edge = TiltInput::from_drag(Vec2::new(15.0, -15.0), GRAVITY, FRICTION_COEFF);
        assert_eq!(far, edge);
        // 15 px * 0.8 = 12 degrees
        let expected = GRAVITY * 12.0f32.to_radians().sin();
        assert!((far.accel.x - expected).abs() < 1e-6);
        assert!((far.accel.y + expected).abs() < 1e-6);
    }

    #[test]
    fn test_scaled() {
        let input = TiltInput::from_rotation(5.0, -5.0, GRAVITY, FRICTION_COEFF);
        let doubled = input.scaled(2.0);
        assert!((doubled.accel.x - input.accel.x * 2.0).abs() < 1e-7);
        assert!((doubled.friction.y - input.friction.y * 2.0).abs() < 1e-7);
    }

    #[test]
    fn test_axis_curve() {
        let mapper = OrientationMapper::default();
        assert_eq!(mapper.front_back.map(0.0), 0.0);
        assert!((mapper.front_back.map(15.0) - 32.0).abs() < 1e-4);
        assert!((mapper.left_right.map(-40.0) + 24.0).abs() < 1e-4);
        // Small tilts are amplified by the sub-linear curve
        assert!(mapper.left_right.map(3.75) > 24.0 * 0.25);
    }

    #[test]
    fn test_calibration_offsets() {
        let mut mapper = OrientationMapper::default();
        mapper.calibrate(30.0, -5.0);
        assert_eq!(mapper.rotation(30.0, -5.0), (0.0, 0.0));
        let input = mapper.to_input(30.0, -5.0, GRAVITY, FRICTION_COEFF);
        assert_eq!(input.accel, Vec2::ZERO);
    }

    #[test]
    fn test_inverted_axis() {
        let mut mapper = OrientationMapper::default();
        mapper.left_right.invert = true;
        let (_, rot_y) = mapper.rotation(0.0, 15.0);
        assert!((rot_y + 24.0).abs() < 1e-4);
    }
}
