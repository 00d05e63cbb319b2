//! Serializable view of a duel for the presentation layer.

use serde::{Deserialize, Serialize};

use super::state::DuelState;

/// Snapshot of a single tank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub tilt: f32,
    pub turret_angle: f32,
    /// Turret rotation relative to the chassis
    pub rendered_turret_angle: f32,
    pub move_charges: u32,
    pub moving: bool,
    pub score: u32,
}

/// Snapshot of a live shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: u32,
    pub owner: usize,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

/// Complete duel snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelSnapshot {
    pub tick: u64,
    pub wind: f32,
    pub active_tank: usize,
    pub tanks: Vec<TankSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Debris is still falling (or about to)
    pub terrain_settling: bool,
    pub terrain_width: usize,
    pub terrain_height: usize,
}

impl DuelSnapshot {
    pub fn from_state(state: &DuelState) -> Self {
        let tanks = state
            .tanks
            .iter()
            .map(|t| TankSnapshot {
                index: t.index,
                x: t.pos.x,
                y: t.pos.y,
                tilt: t.tilt(),
                turret_angle: t.turret_angle(),
                rendered_turret_angle: t.rendered_turret_angle(),
                move_charges: t.move_charges(),
                moving: t.is_moving(),
                score: t.score(),
            })
            .collect();

        let projectiles = state
            .projectiles
            .iter()
            .map(|p| ProjectileSnapshot {
                id: p.id,
                owner: p.owner,
                x: p.pos.x,
                y: p.pos.y,
                vx: p.vel.x,
                vy: p.vel.y,
                radius: p.explosion_radius,
            })
            .collect();

        Self {
            tick: state.time_ticks,
            wind: state.wind,
            active_tank: state.active_tank,
            tanks,
            projectiles,
            terrain_settling: state.terrain.is_settling() || state.settle_countdown.is_some(),
            terrain_width: state.terrain.width(),
            terrain_height: state.terrain.height(),
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
