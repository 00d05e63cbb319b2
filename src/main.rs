//! Crater Duel entry point
//!
//! Headless native host: runs a scripted two-turn duel on the fixed
//! timestep and prints what happened.
//!
//! Usage: `crater-duel [seed] [config.json]`

use std::path::Path;

use crater_duel::DuelConfig;
use crater_duel::consts::SIM_DT;
use crater_duel::sim::{DuelEvent, DuelSnapshot, DuelState, MoveDirection, TickInput, tick};

/// Give up on a turn that hasn't settled after this many ticks
const MAX_TURN_TICKS: u32 = 60 * 60;

/// One player's scripted turn
struct ScriptedTurn {
    move_dir: Option<MoveDirection>,
    aim_deg: f32,
    radius: Option<f32>,
}

struct Host {
    state: DuelState,
    events: usize,
}

impl Host {
    fn step(&mut self, input: &TickInput) {
        for event in tick(&mut self.state, input, SIM_DT) {
            self.events += 1;
            match &event {
                DuelEvent::Explosion { x, y, radius, owner, points } => println!(
                    "[{:>5}] tank {} shell burst at ({:.0}, {:.0}) r={} for {} points",
                    self.state.time_ticks, owner, x, y, radius, points
                ),
                other => println!("[{:>5}] {:?}", self.state.time_ticks, other),
            }
        }
    }

    /// Tick with idle input until nothing is moving
    fn settle(&mut self) {
        for _ in 0..MAX_TURN_TICKS {
            if self.state.is_quiet() {
                return;
            }
            self.step(&TickInput::default());
        }
        log::warn!("Turn did not settle within {} ticks", MAX_TURN_TICKS);
    }

    fn play(&mut self, turn: &ScriptedTurn) {
        let tank = self.state.active_tank;

        if let Some(dir) = turn.move_dir {
            self.step(&TickInput {
                move_dir: Some(dir),
                ..Default::default()
            });
            self.settle();
        }

        // Swing the turret one step per tick, as held input would
        let Some(current) = self.state.active().map(|t| t.turret_angle()) else {
            return;
        };
        let steps = (turn.aim_deg - current) / self.state.config().tank.turret_step_deg;
        for _ in 0..steps.abs().round() as u32 {
            self.step(&TickInput {
                aim: steps.signum(),
                ..Default::default()
            });
        }

        log::info!("Tank {} fires at {:.0} degrees", tank, turn.aim_deg);
        self.step(&TickInput {
            fire: true,
            explosion_radius: turn.radius,
            ..Default::default()
        });
        self.settle();
    }
}

fn main() {
    env_logger::init();
    log::info!("Crater Duel (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE);
    let config = match args.next() {
        Some(path) => DuelConfig::load(Path::new(&path)),
        None => DuelConfig::two_player(),
    };

    let mut host = Host {
        state: DuelState::new(seed, config),
        events: 0,
    };

    let script = [
        ScriptedTurn {
            move_dir: Some(MoveDirection::Right),
            aim_deg: 55.0,
            radius: None,
        },
        ScriptedTurn {
            move_dir: Some(MoveDirection::Left),
            aim_deg: -50.0,
            radius: Some(25.0),
        },
    ];
    for turn in &script {
        host.play(turn);
    }

    let snapshot = DuelSnapshot::from_state(&host.state);
    match snapshot.to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Snapshot serialization failed: {e}"),
    }
    log::info!(
        "Done after {} ticks, {} events",
        host.state.time_ticks,
        host.events
    );
}
