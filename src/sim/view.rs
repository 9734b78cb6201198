/// Render adapter: turns two discrete snapshots plus an interpolation
/// factor into a plain view model the renderer can draw.
///
/// Only the two ends of the snake move smoothly. The head slides from its
/// previous cell toward its current one, the tail end slides the same way,
/// and every cell in between is drawn where the current snapshot has it.

use crate::domain::board::Pos;
use crate::domain::direction::Direction;
use crate::domain::geometry::{self, Vec2};
use super::state::{GameState, Mode};

/// Within this many cells, a snake heading straight at the apple opens
/// its mouth.
pub const MOUTH_OPEN_DISTANCE: f32 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub mode: Mode,
    pub apple: Pos,
    /// Interpolated head, then the current body cells after the head,
    /// then the interpolated tail end.
    pub snake_positions: Vec<Vec2>,
    pub direction: Direction,
    pub score: u32,
    pub high_score: u32,
    pub mouth_open: bool,
    pub head_degrees: f32,
}

impl ViewModel {
    pub fn build(t: f32, previous: &GameState, current: &GameState) -> Self {
        let t = t.clamp(0.0, 1.0);
        let direction = current.direction();
        let snake_positions = snake_positions(t, &previous.snake, &current.snake);
        let mouth_open = is_mouth_open(direction, snake_positions[0], current.apple);

        ViewModel {
            mode: current.mode,
            apple: current.apple,
            snake_positions,
            direction,
            score: current.score,
            high_score: current.high_score,
            mouth_open,
            head_degrees: direction.degrees(),
        }
    }

    pub fn head(&self) -> Vec2 {
        self.snake_positions[0]
    }
}

fn snake_positions(t: f32, previous: &[Pos], current: &[Pos]) -> Vec<Vec2> {
    let first = |s: &[Pos]| s[0].as_vec2();
    let last = |s: &[Pos]| s[s.len() - 1].as_vec2();

    let mut out = Vec::with_capacity(current.len() + 1);
    out.push(geometry::lerp_vector(t, first(previous), first(current)));
    out.extend(current[1..].iter().map(|p| p.as_vec2()));
    out.push(geometry::lerp_vector(t, last(previous), last(current)));
    out
}

fn is_mouth_open(direction: Direction, head: Vec2, apple: Pos) -> bool {
    let apple = apple.as_vec2();
    let heading_at_apple = geometry::direction_vector_between(apple, head) == direction.vector();
    heading_at_apple && geometry::distance(head, apple) <= MOUTH_OPEN_DISTANCE
}
