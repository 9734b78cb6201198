/// Events observed across a single transition.
/// The presentation layer consumes these for sound and logging.

use crate::domain::board::Pos;
use crate::domain::direction::Direction;
use super::state::{GameState, Mode};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    TurnQueued(Direction),
    AppleEaten { at: Pos, score: u32 },
    Crashed { score: u32 },
    Restarted { high_score: u32 },
}

/// Compare two consecutive snapshots and report what happened between them.
pub fn between(before: &GameState, after: &GameState) -> Vec<GameEvent> {
    let mut events = vec![];

    if before.mode == Mode::Idle && after.mode == Mode::Play {
        events.push(GameEvent::Started);
    }
    if before.mode == Mode::GameOver && after.mode == Mode::Idle {
        events.push(GameEvent::Restarted { high_score: after.high_score });
        return events;
    }

    let (q0, q1) = (before.direction_queue.as_slice(), after.direction_queue.as_slice());
    if q1.len() > q0.len() {
        if let Some(&dir) = q1.last() {
            events.push(GameEvent::TurnQueued(dir));
        }
    }

    if after.score > before.score {
        events.push(GameEvent::AppleEaten { at: after.head(), score: after.score });
    }
    if before.mode == Mode::Play && after.mode == Mode::GameOver {
        events.push(GameEvent::Crashed { score: after.score });
    }

    events
}
