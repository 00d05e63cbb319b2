//! Impact resolution
//!
//! Glue between a spent shell, the tank that fired it and the terrain:
//! score first, then carve. Scheduling the settling pass and any effects
//! is left to the caller.

use serde::{Deserialize, Serialize};

use super::projectile::Impact;
use super::tank::Tank;
use super::terrain::TerrainGrid;

/// Outcome of resolving one impact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub impact: Impact,
    /// Points awarded to the owning tank
    pub points: u32,
}

/// Score the owning tank for the blast, then carve the crater
pub fn resolve_impact(
    impact: Impact,
    terrain: &mut TerrainGrid,
    tanks: &mut [Tank],
    max_points: u32,
) -> ImpactReport {
    let points = match tanks.get_mut(impact.owner) {
        Some(tank) => tank.add_score(impact.pos, impact.radius, max_points),
        None => {
            log::warn!("Impact from unknown tank {}, no score awarded", impact.owner);
            0
        }
    };

    terrain.carve(impact.pos.x, impact.pos.y, impact.radius);

    log::debug!(
        "Impact at ({:.1}, {:.1}) r={} by tank {}: {} points",
        impact.pos.x,
        impact.pos.y,
        impact.radius,
        impact.owner,
        points
    );

    ImpactReport { impact, points }
}
