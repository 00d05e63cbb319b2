//! Duel state
//!
//! Owns the one terrain grid every projectile and tank reads, plus whose
//! turn it is, the current wind and the settle-delay countdown.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::projectile::Projectile;
use super::tank::Tank;
use super::terrain::TerrainGrid;
use crate::config::DuelConfig;

/// Complete duel state for one session
#[derive(Debug, Clone)]
pub struct DuelState {
    /// Session seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    config: DuelConfig,
    pub terrain: TerrainGrid,
    /// One tank per player, indexed by player
    pub tanks: Vec<Tank>,
    /// Live shells in firing order
    pub projectiles: Vec<Projectile>,
    /// Tank that input is applied to
    pub active_tank: usize,
    /// Horizontal acceleration given to shells fired now
    pub wind: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks left before settling may run; `None` when not waiting
    pub settle_countdown: Option<u32>,
    /// Shells fired by the active tank this turn
    turn_shots: u32,
    next_id: u32,
}

impl DuelState {
    /// New session with generated terrain
    pub fn new(seed: u64, config: DuelConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = &config.world;
        let terrain = TerrainGrid::generate(world.width, world.height, world.base_height, &mut rng);
        log::info!("Duel initialized with seed: {}", seed);
        Self::build(seed, rng, config, terrain)
    }

    /// New session on a prepared terrain
    pub fn with_terrain(seed: u64, config: DuelConfig, terrain: TerrainGrid) -> Self {
        Self::build(seed, Pcg32::seed_from_u64(seed), config, terrain)
    }

    fn build(seed: u64, rng: Pcg32, config: DuelConfig, terrain: TerrainGrid) -> Self {
        let tanks = config
            .effective_tank_positions()
            .into_iter()
            .enumerate()
            .map(|(i, x)| Tank::new(i, x, &terrain, &config.tank))
            .collect();

        Self {
            seed,
            rng,
            wind: config.world.wind,
            config,
            terrain,
            tanks,
            projectiles: Vec::new(),
            active_tank: 0,
            time_ticks: 0,
            settle_countdown: None,
            turn_shots: 0,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn active(&self) -> Option<&Tank> {
        self.tanks.get(self.active_tank)
    }

    pub fn turn_shots(&self) -> u32 {
        self.turn_shots
    }

    /// Fire from the active tank. Uses the configured radius when none is given.
    pub fn fire_active(&mut self, explosion_radius: Option<f32>) -> Option<u32> {
        let radius = explosion_radius.unwrap_or(self.config.world.explosion_radius);
        let id = self.next_entity_id();
        let shell = self.tanks.get(self.active_tank)?.fire(
            id,
            radius,
            self.wind,
            &self.config.world,
            &self.config.tank,
        );
        self.projectiles.push(shell);
        self.turn_shots += 1;
        Some(id)
    }

    /// Hand control to the next tank and re-roll the wind
    pub fn pass_turn(&mut self) {
        if !self.tanks.is_empty() {
            self.active_tank = (self.active_tank + 1) % self.tanks.len();
        }
        self.turn_shots = 0;

        let variance = self.config.world.wind_variance;
        if variance > 0.0 {
            self.wind = self.rng.random_range(-variance..=variance);
        }
        log::info!("Turn passed to tank {} (wind {:.1})", self.active_tank, self.wind);
    }

    /// Start (or restart) the pause before debris falls
    pub fn arm_settle_delay(&mut self) {
        self.settle_countdown = Some(self.config.settle_delay_ticks());
    }

    /// Nothing in flight, nothing waiting to fall, nothing falling
    pub fn is_quiet(&self) -> bool {
        self.projectiles.is_empty()
            && self.settle_countdown.is_none()
            && !self.terrain.is_settling()
            && self.tanks.iter().all(|t| !t.is_moving())
    }
}
