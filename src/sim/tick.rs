//! Fixed timestep simulation tick
//!
//! One call advances the duel by one frame, in a fixed order:
//! input, tanks, projectiles (and their impacts), then settling. A crater
//! carved this frame is therefore already visible to this frame's
//! settling pass.

use serde::{Deserialize, Serialize};

use super::impact::resolve_impact;
use super::projectile::ProjectileOutcome;
use super::state::DuelState;
use super::tank::{MoveDirection, VolleyStep};

/// Input commands for a single tick, applied to the active tank
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Turret rotation in steps this tick (-1 aims up/left, +1 down/right)
    pub aim: f32,
    /// Start a move volley
    pub move_dir: Option<MoveDirection>,
    /// Fire a shell
    pub fire: bool,
    /// Explosion radius for this shot (configured default if `None`)
    pub explosion_radius: Option<f32>,
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DuelEvent {
    Fired { tank: usize, projectile_id: u32 },
    Explosion { x: f32, y: f32, radius: f32, owner: usize, points: u32 },
    ProjectileLost { projectile_id: u32 },
    MoveStarted { tank: usize, charges_left: u32 },
    MoveRejected { tank: usize },
    VolleyEnded { tank: usize, reason: VolleyStep },
    SettlingFinished,
    TurnPassed { tank: usize, wind: f32 },
}

/// Advance the duel by one fixed timestep
pub fn tick(state: &mut DuelState, input: &TickInput, dt: f32) -> Vec<DuelEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    apply_input(state, input, &mut events);

    // Tanks: step volleys and re-level on whatever the ground is now
    let tank_cfg = state.config().tank.clone();
    for tank in &mut state.tanks {
        let step = tank.update(&state.terrain, &tank_cfg);
        if step.ended() {
            events.push(DuelEvent::VolleyEnded {
                tank: tank.index,
                reason: step,
            });
        }
    }

    // Projectiles: advance all, then resolve impacts in firing order
    let mut finished = Vec::new();
    let terrain = &state.terrain;
    state.projectiles.retain_mut(|p| match p.step(terrain, dt) {
        ProjectileOutcome::Flying => true,
        outcome => {
            finished.push((p.id, outcome));
            false
        }
    });

    let max_points = state.config().tank.max_explosion_points;
    for (id, outcome) in finished {
        match outcome {
            ProjectileOutcome::Impacted(impact) => {
                let report = resolve_impact(impact, &mut state.terrain, &mut state.tanks, max_points);
                state.arm_settle_delay();
                events.push(DuelEvent::Explosion {
                    x: impact.pos.x,
                    y: impact.pos.y,
                    radius: impact.radius,
                    owner: impact.owner,
                    points: report.points,
                });
            }
            ProjectileOutcome::OutOfBounds => {
                log::debug!("Projectile {} left the field", id);
                events.push(DuelEvent::ProjectileLost { projectile_id: id });
            }
            ProjectileOutcome::Flying => {}
        }
    }

    update_settling(state, &mut events);

    // The turn ends once every shell fired in it has come down
    if state.turn_shots() > 0 && state.projectiles.is_empty() {
        state.pass_turn();
        events.push(DuelEvent::TurnPassed {
            tank: state.active_tank,
            wind: state.wind,
        });
    }

    events
}

fn apply_input(state: &mut DuelState, input: &TickInput, events: &mut Vec<DuelEvent>) {
    let active = state.active_tank;
    let tank_cfg = state.config().tank.clone();
    let Some(tank) = state.tanks.get_mut(active) else {
        return;
    };

    if input.aim != 0.0 {
        tank.aim_by(input.aim * tank_cfg.turret_step_deg);
    }

    if let Some(direction) = input.move_dir {
        if tank.start_move_volley(direction, &tank_cfg) {
            events.push(DuelEvent::MoveStarted {
                tank: active,
                charges_left: tank.move_charges(),
            });
        } else {
            events.push(DuelEvent::MoveRejected { tank: active });
        }
    }

    if input.fire {
        if let Some(projectile_id) = state.fire_active(input.explosion_radius) {
            events.push(DuelEvent::Fired {
                tank: active,
                projectile_id,
            });
        }
    }
}

/// Count down the post-impact pause, then run one settling pass per tick
fn update_settling(state: &mut DuelState, events: &mut Vec<DuelEvent>) {
    match state.settle_countdown {
        Some(0) => state.settle_countdown = None,
        Some(n) => {
            state.settle_countdown = Some(n - 1);
            return;
        }
        None => {}
    }

    if state.terrain.is_settling() && !state.terrain.update_settling() {
        events.push(DuelEvent::SettlingFinished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuelConfig;
    use crate::consts::SIM_DT;
    use crate::sim::projectile::Projectile;
    use crate::sim::terrain::TerrainGrid;
    use glam::Vec2;

    fn flat_state(settle_delay_secs: f32) -> DuelState {
        let mut config = DuelConfig::default();
        config.world.width = 200;
        config.world.height = 100;
        config.world.settle_delay_secs = settle_delay_secs;
        config.tank_positions = vec![40.0, 160.0];
        let mut terrain = TerrainGrid::new(200, 100);
        terrain.fill_below(60);
        DuelState::with_terrain(1, config, terrain)
    }

    /// Drop a stationary shell inside solid ground so it goes off next tick
    fn buried_shell(state: &mut DuelState, pos: Vec2, radius: f32) {
        let id = state.next_entity_id();
        state
            .projectiles
            .push(Projectile::new(id, 0, pos, Vec2::ZERO, 0.0, 0.0, radius));
    }

    fn run_until_quiet(state: &mut DuelState, max_ticks: usize) -> Vec<DuelEvent> {
        let mut all = Vec::new();
        for _ in 0..max_ticks {
            all.extend(tick(state, &TickInput::default(), SIM_DT));
            if state.is_quiet() {
                return all;
            }
        }
        panic!("duel never went quiet");
    }

    #[test]
    fn test_idle_tick_changes_nothing() {
        let mut state = flat_state(0.5);
        let before = state.terrain.cells().to_vec();
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.terrain.cells(), &before[..]);
    }

    #[test]
    fn test_aim_input_rotates_active_turret() {
        let mut state = flat_state(0.5);
        let input = TickInput {
            aim: 1.0,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.tanks[0].turret_angle(), 30.0);
        assert_eq!(state.tanks[1].turret_angle(), 0.0);
    }

    #[test]
    fn test_shot_explodes_scores_and_passes_turn() {
        let mut state = flat_state(0.5);
        // Steep lob so it comes down inside the narrow field
        state.tanks[0].set_turret_angle(5.0);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let first = tick(&mut state, &fire, SIM_DT);
        assert!(matches!(first[0], DuelEvent::Fired { tank: 0, .. }));

        let events = run_until_quiet(&mut state, 2000);
        let explosion = events
            .iter()
            .find(|e| matches!(e, DuelEvent::Explosion { .. }))
            .expect("shell should land");
        if let DuelEvent::Explosion { owner, y, .. } = explosion {
            assert_eq!(*owner, 0);
            assert!(*y >= 60.0);
        }
        assert!(events.contains(&DuelEvent::TurnPassed { tank: 1, wind: 0.0 }));
        assert!(events.contains(&DuelEvent::SettlingFinished));
        assert_eq!(state.active_tank, 1);
    }

    #[test]
    fn test_lost_shell_passes_turn_without_explosion() {
        let mut state = flat_state(0.5);
        // Straight left off the field from the left tank
        state.tanks[0].set_turret_angle(-90.0);
        let fire = TickInput {
            fire: true,
            explosion_radius: Some(10.0),
            ..Default::default()
        };
        let mut events = tick(&mut state, &fire, SIM_DT);
        events.extend(run_until_quiet(&mut state, 2000));

        assert!(events.iter().any(|e| matches!(e, DuelEvent::ProjectileLost { .. })));
        assert!(!events.iter().any(|e| matches!(e, DuelEvent::Explosion { .. })));
        assert_eq!(state.active_tank, 1);
    }

    #[test]
    fn test_crater_settles_same_tick_without_delay() {
        let mut state = flat_state(0.0);
        buried_shell(&mut state, Vec2::new(100.0, 80.0), 5.0);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(matches!(events[0], DuelEvent::Explosion { .. }));
        // The roof over the tunnel already dropped one row
        assert!(!state.terrain.is_solid_cell(100, 60));
        assert!(state.terrain.is_solid_cell(100, 61));
        assert!(state.terrain.is_solid_cell(100, 75));
    }

    #[test]
    fn test_settling_waits_for_delay() {
        let mut state = flat_state(0.5);
        let delay = state.config().settle_delay_ticks();
        buried_shell(&mut state, Vec2::new(100.0, 80.0), 5.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.terrain.is_settling());
        for _ in 0..delay - 1 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert!(state.terrain.is_solid_cell(100, 60));
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.terrain.is_solid_cell(100, 60));
    }

    #[test]
    fn test_new_impact_rearms_delay() {
        let mut state = flat_state(0.5);
        buried_shell(&mut state, Vec2::new(100.0, 80.0), 5.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        buried_shell(&mut state, Vec2::new(150.0, 85.0), 4.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.settle_countdown, Some(state.config().settle_delay_ticks() - 1));
    }

    #[test]
    fn test_tank_sinks_into_settling_crater() {
        let mut state = flat_state(0.0);
        let start_y = state.tanks[1].pos.y;
        // Tunnel under the right tank
        buried_shell(&mut state, Vec2::new(160.0, 78.0), 12.0);

        let events = run_until_quiet(&mut state, 500);
        assert!(events.contains(&DuelEvent::SettlingFinished));
        assert!(state.tanks[1].pos.y > start_y);
        assert!(state.tanks[1].pos.y.is_finite());
    }

    #[test]
    fn test_move_input_runs_volley() {
        let mut state = flat_state(0.5);
        let go = TickInput {
            move_dir: Some(MoveDirection::Right),
            ..Default::default()
        };
        let events = tick(&mut state, &go, SIM_DT);
        assert_eq!(
            events[0],
            DuelEvent::MoveStarted {
                tank: 0,
                charges_left: 3
            }
        );

        // Ignored while the volley is running
        let again = tick(&mut state, &go, SIM_DT);
        assert!(again.contains(&DuelEvent::MoveRejected { tank: 0 }));

        let events = run_until_quiet(&mut state, 500);
        assert!(events.contains(&DuelEvent::VolleyEnded {
            tank: 0,
            reason: VolleyStep::Arrived
        }));
        assert_eq!(state.tanks[0].pos.x, 189.0);
        assert_eq!(state.tanks[0].move_charges(), 3);
    }
}
