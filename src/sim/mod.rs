//! Frame-stepped duel simulation
//!
//! All gameplay logic lives here, single-threaded and run to completion
//! each tick:
//! - Fixed timestep only
//! - Seeded RNG only (terrain phases, per-turn wind)
//! - One terrain grid, read by shells and tanks, written only by impacts
//!   and the settling pass
//! - No rendering, input or platform dependencies

pub mod impact;
pub mod projectile;
pub mod snapshot;
pub mod state;
pub mod tank;
pub mod terrain;
pub mod tick;

pub use impact::{ImpactReport, resolve_impact};
pub use projectile::{Impact, Projectile, ProjectileOutcome};
pub use snapshot::{DuelSnapshot, ProjectileSnapshot, TankSnapshot};
pub use state::DuelState;
pub use tank::{MoveDirection, MoveVolley, Tank, VolleyStep};
pub use terrain::TerrainGrid;
pub use tick::{DuelEvent, TickInput, tick};
