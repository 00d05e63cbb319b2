//! Duel configuration
//!
//! Every tuning knob the simulation reads. Fixed once a [`crate::sim::DuelState`]
//! is built; loaded from JSON with missing fields falling back to defaults.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors from loading or validating a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Io(std::io::Error),
    /// Config text is not valid JSON for [`DuelConfig`].
    Parse(serde_json::Error),
    /// A value is outside the range the simulation can work with.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "Parse error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// World and ballistics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid width in cells (= pixels)
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Average hill height used by terrain generation
    pub base_height: f32,
    /// Downward projectile acceleration (pixels/s²)
    pub gravity: f32,
    /// Starting horizontal projectile acceleration (pixels/s²)
    pub wind: f32,
    /// Per-turn wind range; 0 keeps `wind` for the whole session
    pub wind_variance: f32,
    /// Explosion radius used when the fire input doesn't pick one
    pub explosion_radius: f32,
    pub muzzle_speed: f32,
    /// Seconds between an impact and the start of settling
    pub settle_delay_secs: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            base_height: BASE_HEIGHT,
            gravity: GRAVITY,
            wind: WIND,
            wind_variance: WIND_VARIANCE,
            explosion_radius: EXPLOSION_RADIUS,
            muzzle_speed: MUZZLE_SPEED,
            settle_delay_secs: SETTLE_DELAY_SECS,
        }
    }
}

/// Tank movement, stance and scoring settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    pub move_distance: f32,
    pub max_climb_height: usize,
    pub initial_move_charges: u32,
    pub turret_length: f32,
    pub ground_offset: f32,
    pub tilt_sample_distance: f32,
    pub turret_step_deg: f32,
    pub max_explosion_points: u32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            move_distance: MOVE_DISTANCE,
            max_climb_height: MAX_CLIMB_HEIGHT,
            initial_move_charges: INITIAL_MOVE_CHARGES,
            turret_length: TURRET_LENGTH,
            ground_offset: GROUND_OFFSET,
            tilt_sample_distance: TILT_SAMPLE_DISTANCE,
            turret_step_deg: TURRET_STEP_DEG,
            max_explosion_points: MAX_EXPLOSION_POINTS,
        }
    }
}

/// Complete duel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    pub world: WorldConfig,
    pub tank: TankConfig,
    /// Starting x position of each tank; one tank per entry
    pub tank_positions: Vec<f32>,
}

impl DuelConfig {
    /// Default config with the classic two-tank layout
    pub fn two_player() -> Self {
        let mut config = Self::default();
        let w = config.world.width as f32;
        config.tank_positions = vec![w * 0.2, w * 0.8];
        config
    }

    /// Tank start positions, falling back to the two-player layout
    pub fn effective_tank_positions(&self) -> Vec<f32> {
        if self.tank_positions.is_empty() {
            let w = self.world.width as f32;
            vec![w * 0.2, w * 0.8]
        } else {
            self.tank_positions.clone()
        }
    }

    /// Settle delay expressed in fixed ticks
    pub fn settle_delay_ticks(&self) -> u32 {
        (self.world.settle_delay_secs / SIM_DT).round().max(0.0) as u32
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read and validate a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a config file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config ({}): {}", path.display(), e);
                Self::two_player()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.width == 0 || world.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be non-empty, got {}x{}",
                world.width, world.height
            )));
        }
        if world.explosion_radius < 0.0 {
            return Err(ConfigError::Invalid("explosion_radius must be >= 0".into()));
        }
        if world.wind_variance < 0.0 || world.settle_delay_secs < 0.0 {
            return Err(ConfigError::Invalid(
                "wind_variance and settle_delay_secs must be >= 0".into(),
            ));
        }
        if self.tank.move_distance <= 0.0 || self.tank.tilt_sample_distance <= 0.0 {
            return Err(ConfigError::Invalid(
                "move_distance and tilt_sample_distance must be > 0".into(),
            ));
        }
        if let Some(x) = self
            .tank_positions
            .iter()
            .find(|x| !(0.0..world.width as f32).contains(*x))
        {
            return Err(ConfigError::Invalid(format!(
                "tank position {x} is outside the grid"
            )));
        }
        Ok(())
    }
}
