//! Tank stance, movement and scoring
//!
//! A tank never owns its height: every frame it samples the terrain under
//! its rear and front and re-levels, so it rides the ground down as craters
//! open and debris settles beneath it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use super::terrain::TerrainGrid;
use crate::config::{TankConfig, WorldConfig};
use crate::{heading_from_degrees, rad_to_deg};

/// Horizontal direction of a move volley
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Left,
    Right,
}

impl MoveDirection {
    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            MoveDirection::Left => -1.0,
            MoveDirection::Right => 1.0,
        }
    }
}

/// An in-progress, charge-consuming relocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveVolley {
    pub target_x: f32,
    pub direction: MoveDirection,
}

/// What one frame of volley stepping did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolleyStep {
    /// No volley in progress
    Idle,
    /// Moved one pixel toward the target
    Advanced,
    /// Reached the target; volley over
    Arrived,
    /// Next step would leave the grid; volley over
    HitEdge,
    /// Next column is too high or low to step onto; volley over
    HitCliff,
}

impl VolleyStep {
    /// True when this step ended the volley
    pub fn ended(self) -> bool {
        matches!(self, VolleyStep::Arrived | VolleyStep::HitEdge | VolleyStep::HitCliff)
    }
}

/// Clamp a world x into a valid column index
#[inline]
fn column_at(terrain: &TerrainGrid, x: f32) -> usize {
    let col = x.floor().max(0.0) as usize;
    col.min(terrain.width().saturating_sub(1))
}

/// A player's tank
#[derive(Debug, Clone, Serialize)]
pub struct Tank {
    /// Player index, also the owner tag on fired shells
    pub index: usize,
    /// Chassis center
    pub pos: Vec2,
    /// Chassis tilt in degrees
    tilt: f32,
    /// Aim in degrees, independent of chassis tilt
    turret_angle: f32,
    move_charges: u32,
    volley: Option<MoveVolley>,
    score: u32,
}

impl Tank {
    /// Place a tank at `x` and settle it onto the ground
    pub fn new(index: usize, x: f32, terrain: &TerrainGrid, cfg: &TankConfig) -> Self {
        let mut tank = Self {
            index,
            pos: Vec2::new(x, 0.0),
            tilt: 0.0,
            turret_angle: 0.0,
            move_charges: cfg.initial_move_charges,
            volley: None,
            score: 0,
        };
        tank.snap_to_terrain(terrain, cfg);
        tank
    }

    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    pub fn move_charges(&self) -> u32 {
        self.move_charges
    }

    pub fn is_moving(&self) -> bool {
        self.volley.is_some()
    }

    pub fn volley(&self) -> Option<MoveVolley> {
        self.volley
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Absolute aim angle used for firing
    pub fn turret_angle(&self) -> f32 {
        self.turret_angle
    }

    pub fn set_turret_angle(&mut self, angle: f32) {
        self.turret_angle = angle;
    }

    pub fn aim_by(&mut self, delta: f32) {
        self.turret_angle += delta;
    }

    /// Turret rotation relative to the chassis, for drawing
    pub fn rendered_turret_angle(&self) -> f32 {
        self.turret_angle - self.tilt
    }

    /// End of the barrel in world coordinates
    pub fn turret_tip(&self, cfg: &TankConfig) -> Vec2 {
        self.pos + heading_from_degrees(self.turret_angle) * cfg.turret_length
    }

    /// Spawn a shell at the barrel tip along the absolute aim
    pub fn fire(
        &self,
        id: u32,
        explosion_radius: f32,
        wind: f32,
        world: &WorldConfig,
        cfg: &TankConfig,
    ) -> Projectile {
        let vel = heading_from_degrees(self.turret_angle) * world.muzzle_speed;
        Projectile::new(
            id,
            self.index,
            self.turret_tip(cfg),
            vel,
            world.gravity,
            wind,
            explosion_radius,
        )
    }

    /// Re-level on the ground sampled either side of center.
    ///
    /// A column with no solid cells reads as ground at the grid's bottom.
    pub fn snap_to_terrain(&mut self, terrain: &TerrainGrid, cfg: &TankConfig) {
        let d = cfg.tilt_sample_distance;
        let rear_y = terrain.surface_y(column_at(terrain, self.pos.x - d)) as f32;
        let front_y = terrain.surface_y(column_at(terrain, self.pos.x + d)) as f32;

        self.pos.y = (rear_y + front_y) / 2.0 - cfg.ground_offset;
        self.tilt = rad_to_deg((front_y - rear_y).atan2(d * 2.0));
    }

    /// Per-frame update: step any volley, then re-level
    pub fn update(&mut self, terrain: &TerrainGrid, cfg: &TankConfig) -> VolleyStep {
        let step = self.update_move_volley(terrain, cfg);
        self.snap_to_terrain(terrain, cfg);
        step
    }

    /// Spend a charge and start moving. Returns false, changing nothing,
    /// when out of charges or already moving.
    pub fn start_move_volley(&mut self, direction: MoveDirection, cfg: &TankConfig) -> bool {
        if self.move_charges == 0 || self.volley.is_some() {
            return false;
        }

        self.move_charges -= 1;
        self.volley = Some(MoveVolley {
            target_x: self.pos.x + direction.sign() * cfg.move_distance,
            direction,
        });

        log::info!(
            "Tank {} started move volley: {} charges remaining",
            self.index,
            self.move_charges
        );
        true
    }

    /// Step one pixel toward the volley target
    pub fn update_move_volley(&mut self, terrain: &TerrainGrid, cfg: &TankConfig) -> VolleyStep {
        let Some(volley) = self.volley else {
            return VolleyStep::Idle;
        };

        let next_x = self.pos.x + volley.direction.sign();

        let arrived = match volley.direction {
            MoveDirection::Right => next_x >= volley.target_x,
            MoveDirection::Left => next_x <= volley.target_x,
        };
        if arrived {
            self.volley = None;
            self.snap_to_terrain(terrain, cfg);
            return VolleyStep::Arrived;
        }

        if next_x < 0.0 || next_x >= terrain.width() as f32 {
            self.volley = None;
            log::debug!("Tank {} stopped at the edge (x={})", self.index, self.pos.x);
            return VolleyStep::HitEdge;
        }

        if !self.can_move_to(terrain, next_x, cfg) {
            self.volley = None;
            log::info!("Tank {} hit a wall at x={}, movement stopped", self.index, self.pos.x);
            return VolleyStep::HitCliff;
        }

        self.pos.x = next_x;
        self.snap_to_terrain(terrain, cfg);
        VolleyStep::Advanced
    }

    fn can_move_to(&self, terrain: &TerrainGrid, new_x: f32, cfg: &TankConfig) -> bool {
        let current = terrain.surface_y(column_at(terrain, self.pos.x));
        let next = terrain.surface_y(column_at(terrain, new_x));
        current.abs_diff(next) <= cfg.max_climb_height
    }

    /// Award points for an explosion by distance from this tank.
    ///
    /// Linear falloff: full points at the center, none at or past the radius.
    pub fn add_score(&mut self, center: Vec2, radius: f32, max_points: u32) -> u32 {
        let ratio = if radius > 0.0 {
            (1.0 - self.pos.distance(center) / radius).max(0.0)
        } else {
            0.0
        };
        let points = (ratio * max_points as f32).floor() as u32;

        self.score += points;
        log::info!("Tank {} scored {} points! Total score: {}", self.index, points, self.score);
        points
    }
}
