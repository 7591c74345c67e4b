//! One full game, from handshake to the end signal.
//!
//! Single-threaded and strictly sequential: the only blocking point is the
//! read of the next server message, and every turn read is answered with
//! exactly one action before the next read.

use std::io::{BufRead, Write};

use crate::engine::{Action, DecisionEngine, RandomSource};
use crate::protocol::{MessageReader, MessageWriter, ProtocolError};
use crate::world::{WorldError, WorldModel};

/// Errors that end a game early.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    World(#[from] WorldError),
}

/// Counters reported when a game finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameSummary {
    /// Turns answered.
    pub turns: u32,
    /// Turns answered with an empty action because no decision could be made.
    pub failed_turns: u32,
}

/// Plays a game over the given transport until the server signals the end.
///
/// A turn whose decision fails, for instance because our tank has been
/// destroyed, is answered with an empty action so the exchange stays in step.
pub fn run_session<R, W, G>(
    reader: &mut MessageReader<R>,
    writer: &mut MessageWriter<W>,
    engine: &mut DecisionEngine<G>,
) -> Result<GameSummary, SessionError>
where
    R: BufRead,
    W: Write,
    G: RandomSource,
{
    let handshake = reader.read_handshake()?;
    log::info!(
        "playing as '{}' against '{}'",
        handshake.your_tank_id,
        handshake.enemy_tank_id
    );

    log::debug!("engine config: {:?}", engine.config());

    let mut world = WorldModel::new(handshake.your_tank_id, handshake.enemy_tank_id);
    world.ingest_init(reader.read_init()?)?;
    log::info!("init complete with {} objects", world.len());

    let mut summary = GameSummary::default();
    loop {
        let turn = reader.read_turn()?;
        if !world.apply_turn(turn) {
            break;
        }
        summary.turns += 1;

        let action = match engine.decide(&world) {
            Ok(action) => action,
            Err(e) => {
                log::warn!("turn {}: {}", summary.turns, e);
                summary.failed_turns += 1;
                Action::default()
            }
        };
        log::debug!("turn {}: {:?} state {:?}", summary.turns, action, engine.state());
        writer.post_action(&action)?;
    }

    log::info!(
        "game over after {} turns ({} without a decision)",
        summary.turns,
        summary.failed_turns
    );
    Ok(summary)
}
