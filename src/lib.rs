//! Crater Duel - a 2D artillery duel on destructible terrain
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (terrain grid, projectiles, tank stance, impacts)
//! - `config`: Tuning constants supplied at construction, loadable from JSON
//!
//! Rendering, input polling, audio and effects are the host's business. The
//! host drives [`sim::tick`] once per fixed frame and consumes the returned
//! [`sim::DuelEvent`]s.

pub mod config;
pub mod sim;

pub use config::{ConfigError, DuelConfig, TankConfig, WorldConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one settling pass per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Screen / grid dimensions
    pub const WIDTH: usize = 1024;
    pub const HEIGHT: usize = 576;
    /// Average height of the generated hills
    pub const BASE_HEIGHT: f32 = 400.0;

    /// Downward acceleration on projectiles (pixels/s²)
    pub const GRAVITY: f32 = 600.0;
    /// Horizontal acceleration on projectiles (pixels/s²)
    pub const WIND: f32 = 0.0;
    /// Wind is re-rolled in [-WIND_VARIANCE, WIND_VARIANCE] each turn
    pub const WIND_VARIANCE: f32 = 0.0;
    pub const EXPLOSION_RADIUS: f32 = 40.0;
    /// Launch speed of a fired shell (pixels/s)
    pub const MUZZLE_SPEED: f32 = 500.0;
    /// Pause between an impact and the debris starting to fall
    pub const SETTLE_DELAY_SECS: f32 = 0.5;

    /// Pixels per move volley
    pub const MOVE_DISTANCE: f32 = 150.0;
    /// Maximum ground height difference a tank can step over
    pub const MAX_CLIMB_HEIGHT: usize = 2;
    pub const INITIAL_MOVE_CHARGES: u32 = 4;

    pub const TURRET_LENGTH: f32 = 16.0;
    /// Distance from ground to tank center
    pub const GROUND_OFFSET: f32 = 6.0;
    /// Distance from center to the rear/front ground samples
    pub const TILT_SAMPLE_DISTANCE: f32 = 8.0;
    /// Turret rotation per tick of held aim input (degrees)
    pub const TURRET_STEP_DEG: f32 = 1.0;

    /// Points for a direct hit
    pub const MAX_EXPLOSION_POINTS: u32 = 100;
}

#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

#[inline]
pub fn rad_to_deg(rad: f32) -> f32 {
    rad * 180.0 / std::f32::consts::PI
}

/// Unit vector for a screen heading in degrees.
///
/// 0° points straight up (-y), positive angles turn clockwise on screen.
#[inline]
pub fn heading_from_degrees(deg: f32) -> Vec2 {
    let rad = deg_to_rad(deg);
    Vec2::new(rad.sin(), -rad.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_cardinals() {
        let up = heading_from_degrees(0.0);
        assert!((up - Vec2::new(0.0, -1.0)).length() < 1e-6);

        let right = heading_from_degrees(90.0);
        assert!((right - Vec2::new(1.0, 0.0)).length() < 1e-6);

        let left = heading_from_degrees(-90.0);
        assert!((left - Vec2::new(-1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_degree_conversion() {
        assert!((rad_to_deg(deg_to_rad(37.5)) - 37.5).abs() < 1e-4);
        assert!((rad_to_deg(std::f32::consts::FRAC_PI_4) - 45.0).abs() < 1e-4);
    }
}
