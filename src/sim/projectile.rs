//! Ballistic projectiles
//!
//! A shell is a point mass under constant acceleration (gravity plus the wind
//! at the moment it was fired). Each step it moves, then asks the terrain
//! whether it is now inside solid ground.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::TerrainGrid;

/// Where and how big a shell went off, and whose it was
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub pos: Vec2,
    pub radius: f32,
    /// Index of the firing tank
    pub owner: usize,
}

/// Result of advancing a projectile by one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileOutcome {
    /// Still in the air
    Flying,
    /// Entered solid terrain; the projectile is spent
    Impacted(Impact),
    /// Left the playfield without hitting anything
    OutOfBounds,
}

impl ProjectileOutcome {
    /// True for both terminal outcomes
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProjectileOutcome::Flying)
    }
}

/// A live shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Constant acceleration: (wind, gravity)
    pub accel: Vec2,
    pub explosion_radius: f32,
}

impl Projectile {
    pub fn new(
        id: u32,
        owner: usize,
        pos: Vec2,
        vel: Vec2,
        gravity: f32,
        wind: f32,
        explosion_radius: f32,
    ) -> Self {
        Self {
            id,
            owner,
            pos,
            vel,
            accel: Vec2::new(wind, gravity),
            explosion_radius,
        }
    }

    /// Advance one fixed step and test the new position.
    ///
    /// Integration order is fixed: move with the current velocity, then
    /// apply acceleration to the velocity. Solidity is checked before the
    /// bounds test, so a position that is both solid and out of bounds is
    /// an impact. There is no culling above the top edge; a shell can arc
    /// arbitrarily high and still come back down.
    pub fn step(&mut self, terrain: &TerrainGrid, dt: f32) -> ProjectileOutcome {
        self.pos += self.vel * dt;
        self.vel += self.accel * dt;

        if terrain.is_solid(self.pos.x, self.pos.y) {
            return ProjectileOutcome::Impacted(Impact {
                pos: self.pos,
                radius: self.explosion_radius,
                owner: self.owner,
            });
        }

        let width = terrain.width() as f32;
        let height = terrain.height() as f32;
        if self.pos.x < 0.0 || self.pos.x > width || self.pos.y > height {
            return ProjectileOutcome::OutOfBounds;
        }

        ProjectileOutcome::Flying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn flat_terrain() -> TerrainGrid {
        let mut terrain = TerrainGrid::new(200, 100);
        terrain.fill_below(80);
        terrain
    }

    fn shell(pos: Vec2, vel: Vec2) -> Projectile {
        Projectile::new(1, 0, pos, vel, 600.0, 0.0, 10.0)
    }

    fn run(p: &mut Projectile, terrain: &TerrainGrid, max_steps: usize) -> (ProjectileOutcome, usize) {
        for i in 1..=max_steps {
            let outcome = p.step(terrain, SIM_DT);
            if outcome.is_terminal() {
                return (outcome, i);
            }
        }
        (ProjectileOutcome::Flying, max_steps)
    }

    #[test]
    fn test_moves_then_accelerates() {
        let terrain = TerrainGrid::new(100, 100);
        let mut p = Projectile::new(1, 0, Vec2::new(10.0, 10.0), Vec2::new(60.0, 0.0), 60.0, 30.0, 5.0);

        assert_eq!(p.step(&terrain, 1.0 / 60.0), ProjectileOutcome::Flying);
        // Position used the velocity from before this step
        assert!((p.pos - Vec2::new(11.0, 10.0)).length() < 1e-5);
        assert!((p.vel - Vec2::new(60.5, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_falls_onto_flat_ground() {
        let terrain = flat_terrain();
        let mut p = shell(Vec2::new(50.0, 10.0), Vec2::ZERO);

        let (outcome, _) = run(&mut p, &terrain, 600);
        match outcome {
            ProjectileOutcome::Impacted(impact) => {
                assert!(impact.pos.y >= 80.0);
                assert!((impact.pos.x - 50.0).abs() < 1e-4);
                assert_eq!(impact.radius, 10.0);
                assert_eq!(impact.owner, 0);
            }
            other => panic!("expected impact, got {other:?}"),
        }
    }

    #[test]
    fn test_parabolic_arc_apex() {
        let terrain = TerrainGrid::new(2000, 2000);
        let mut p = shell(Vec2::new(100.0, 1000.0), Vec2::new(100.0, -300.0));

        let mut min_y = p.pos.y;
        for _ in 0..120 {
            p.step(&terrain, SIM_DT);
            min_y = min_y.min(p.pos.y);
        }
        // Apex of v²/2g = 75 above launch, within a step of discretisation
        assert!((1000.0 - min_y - 75.0).abs() < 3.0, "apex rise {}", 1000.0 - min_y);
        // Horizontal motion unaffected without wind
        assert!((p.vel.x - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_wind_pushes_sideways() {
        let terrain = TerrainGrid::new(1000, 1000);
        let mut p = Projectile::new(1, 0, Vec2::new(500.0, 100.0), Vec2::ZERO, 0.0, -120.0, 5.0);
        for _ in 0..60 {
            p.step(&terrain, SIM_DT);
        }
        assert!(p.pos.x < 500.0);
        assert!((p.vel.x + 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_bounds_sides_and_bottom() {
        let terrain = TerrainGrid::new(100, 100);

        let mut left = shell(Vec2::new(0.5, 50.0), Vec2::new(-120.0, 0.0));
        assert_eq!(left.step(&terrain, SIM_DT), ProjectileOutcome::OutOfBounds);

        let mut right = shell(Vec2::new(99.5, 50.0), Vec2::new(120.0, 0.0));
        assert_eq!(right.step(&terrain, SIM_DT), ProjectileOutcome::OutOfBounds);

        let mut down = shell(Vec2::new(50.0, 99.5), Vec2::new(0.0, 120.0));
        assert_eq!(down.step(&terrain, SIM_DT), ProjectileOutcome::OutOfBounds);
    }

    #[test]
    fn test_right_edge_is_inclusive() {
        let terrain = TerrainGrid::new(100, 100);
        let mut p = Projectile::new(1, 0, Vec2::new(100.0, 50.0), Vec2::ZERO, 0.0, 0.0, 5.0);
        // Exactly x == width is not past the edge
        assert_eq!(p.step(&terrain, SIM_DT), ProjectileOutcome::Flying);
    }

    #[test]
    fn test_no_culling_above_top() {
        let terrain = TerrainGrid::new(100, 100);
        let mut p = shell(Vec2::new(50.0, 5.0), Vec2::new(0.0, -900.0));
        for _ in 0..30 {
            assert_eq!(p.step(&terrain, SIM_DT), ProjectileOutcome::Flying);
        }
        assert!(p.pos.y < 0.0);
    }

    #[test]
    fn test_hits_last_column() {
        let mut terrain = TerrainGrid::new(100, 100);
        terrain.fill_below(0);
        let mut p = shell(Vec2::new(99.0, 99.0), Vec2::new(59.0, 0.0));
        // x = 99.98 floors into the last column
        assert!(matches!(p.step(&terrain, SIM_DT), ProjectileOutcome::Impacted(_)));
    }
}
