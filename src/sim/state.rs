/// GameState: the complete snapshot of a running game.
///
/// Snapshots are values. A transition never edits the state it was given;
/// it returns the next one, so the clock can keep the previous snapshot
/// around for interpolation.

use crate::domain::board::{Pos, COLUMNS, ROWS};
use crate::domain::direction::Direction;
use crate::domain::queue::DirectionQueue;

/// Target length added per apple eaten.
pub const GROWTH_FACTOR: usize = 2;

const START_X: i32 = 4;
const START_Y: i32 = ROWS / 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Idle,
    Play,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameState {
    pub mode: Mode,
    pub apple: Pos,
    /// Head first.
    pub snake: Vec<Pos>,
    pub direction_queue: DirectionQueue,
    /// Length the snake is allowed to reach; the tail stops being
    /// trimmed until the body catches up.
    pub size: usize,
    pub score: u32,
    pub high_score: u32,
}

impl GameState {
    pub fn new() -> Self {
        let snake = vec![
            Pos::new(START_X, START_Y),
            Pos::new(START_X - 1, START_Y),
            Pos::new(START_X - 2, START_Y),
        ];
        let size = snake.len() + 1;
        GameState {
            mode: Mode::Idle,
            apple: Pos::new(COLUMNS - START_X, START_Y),
            snake,
            direction_queue: DirectionQueue::new(Direction::East),
            size,
            score: 0,
            high_score: 0,
        }
    }

    /// Fresh idle state that remembers the best score so far.
    pub fn restarted(&self) -> Self {
        GameState {
            high_score: self.high_score,
            ..GameState::new()
        }
    }

    pub fn head(&self) -> Pos {
        self.snake[0]
    }

    pub fn direction(&self) -> Direction {
        self.direction_queue.head()
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}
