//! Per-turn decision making.
//!
//! A two-state machine (active / waiting) picks a movement for the turn and,
//! independently, decides whether to fire at the enemy. All mutable state
//! lives in `EngineState`, and all randomness comes through `RandomSource`,
//! so a turn is fully determined by its inputs.
//!
//! Priority per turn:
//! 1. Boundary escape, whatever the state.
//! 2. Active: periodic heading change, powerup pickup, chase, or circle.
//! 3. Waiting: return to active once the dwell has elapsed.
//! 4. Shoot when line of sight allows.
//! 5. Drive at the enemy if nothing else set a movement.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::geometry::{angle_deg, distance, wrap_deg, Point};
use crate::tactics::{BoundaryError, BoundaryTracker, LineOfSight, PowerupSelector};
use crate::world::{PowerupType, WorldModel};

/// Errors that prevent a decision for this turn.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecisionError {
    #[error("tank '{0}' is not in the world model")]
    MissingTank(String),

    #[error(transparent)]
    Boundary(#[from] BoundaryError),
}

/// The movement mode of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Active,
    Waiting,
}

/// Mutable state carried from one turn to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub mode: Mode,
    /// Turns spent in the current mode.
    pub tick_counter: u32,
    /// Turns to spend in the current mode before it may change.
    pub dwell_ticks: u32,
}

impl Default for EngineState {
    fn default() -> Self {
        EngineState {
            mode: Mode::Active,
            tick_counter: 0,
            dwell_ticks: 5,
        }
    }
}

impl EngineState {
    /// Switches to `mode` and restarts the dwell timer.
    pub fn enter(&mut self, mode: Mode, dwell_ticks: u32) {
        self.mode = mode;
        self.tick_counter = 0;
        self.dwell_ticks = dwell_ticks;
    }

    pub fn dwell_elapsed(&self) -> bool {
        self.tick_counter >= self.dwell_ticks
    }
}

/// The response for one turn. Absent fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Action {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Point>,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub move_angle: Option<f64>,
    #[serde(rename = "shoot", skip_serializing_if = "Option::is_none")]
    pub shoot_angle: Option<f64>,
}

/// Source of the engine's random choices.
pub trait RandomSource {
    /// Fair coin.
    fn coin_flip(&mut self) -> bool;

    /// Uniform whole number in `[-max, max]`.
    fn offset(&mut self, max: i32) -> i32;
}

/// `RandomSource` backed by a small fast PRNG.
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    /// Seeds deterministically, or from entropy when `seed` is 0.
    pub fn new(seed: u64) -> Self {
        let rng = if seed != 0 {
            SmallRng::seed_from_u64(seed)
        } else {
            SmallRng::from_entropy()
        };
        SeededRandom { rng }
    }
}

impl RandomSource for SeededRandom {
    fn coin_flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn offset(&mut self, max: i32) -> i32 {
        let max = max.abs();
        self.rng.gen_range(-max..=max)
    }
}

/// Decides one turn, advancing `state`.
pub fn decide(
    world: &WorldModel,
    state: &mut EngineState,
    config: &EngineConfig,
    rng: &mut impl RandomSource,
) -> Result<Action, DecisionError> {
    let own_tank = world
        .own_tank()
        .ok_or_else(|| DecisionError::MissingTank(world.own_tank_id.clone()))?;
    let own = own_tank
        .position()
        .ok_or_else(|| DecisionError::MissingTank(world.own_tank_id.clone()))?;
    let enemy = world
        .tank_position(&world.enemy_tank_id)
        .ok_or_else(|| DecisionError::MissingTank(world.enemy_tank_id.clone()))?;

    let own_speed = if own_tank.holds(PowerupType::Speed) {
        config.boosted_speed
    } else {
        config.base_speed
    };

    let boundary = BoundaryTracker::from_world(world);
    let powerup = PowerupSelector::new(world, &boundary, config).select_best(own, enemy, own_speed)?;
    let closest_boundary = boundary.closest_point(own)?;
    let to_enemy = angle_deg(enemy, own);

    let mut action = Action::default();

    if BoundaryTracker::is_near(own, closest_boundary, config.boundary_margin) {
        let escape = config.escape_point.unwrap_or_else(|| world.arena_center());
        log::debug!("boundary at {:?} too close, escaping to {:?}", closest_boundary, escape);
        action.path = Some(escape);
        action.shoot_angle = Some(to_enemy);
        state.enter(Mode::Waiting, config.emergency_dwell_ticks);
    } else {
        match state.mode {
            Mode::Active => {
                if state.dwell_elapsed() && powerup.is_none() {
                    let offset = if rng.coin_flip() {
                        config.turn_offset_deg
                    } else {
                        -config.turn_offset_deg
                    };
                    action.move_angle = Some(wrap_deg(to_enemy + offset));
                    state.enter(Mode::Waiting, config.wait_dwell_ticks);
                } else if let Some(target) = &powerup {
                    log::debug!("heading for powerup {} at {:?}", target.id, target.position);
                    action.path = Some(target.position);
                } else if distance(own, enemy) > config.chase_distance {
                    action.path = Some(enemy);
                } else {
                    let jitter = rng.offset(config.circle_jitter_deg);
                    action.move_angle = Some(wrap_deg(to_enemy + 180.0 + f64::from(jitter)));
                    state.enter(Mode::Waiting, config.wait_dwell_ticks);
                }
            }
            Mode::Waiting => {
                if state.dwell_elapsed() {
                    state.enter(Mode::Active, config.active_dwell_ticks);
                }
            }
        }
    }

    state.tick_counter += 1;

    if LineOfSight::new(world).is_clear_shot(own, enemy) {
        action.shoot_angle = Some(to_enemy);
    }

    if action.path.is_none() && action.move_angle.is_none() {
        action.path = Some(enemy);
    }

    Ok(action)
}

/// Owns the per-game state, config, and randomness for the turn loop.
pub struct DecisionEngine<R> {
    config: EngineConfig,
    state: EngineState,
    rng: R,
}

impl<R: RandomSource> DecisionEngine<R> {
    pub fn new(config: EngineConfig, rng: R) -> Self {
        let state = EngineState {
            dwell_ticks: config.active_dwell_ticks,
            ..EngineState::default()
        };
        DecisionEngine { config, state, rng }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decides the action for the current turn.
    pub fn decide(&mut self, world: &WorldModel) -> Result<Action, DecisionError> {
        decide(world, &mut self.state, &self.config, &mut self.rng)
    }
}
