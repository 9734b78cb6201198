/// Everything that can change a `GameState`.
/// Keyboard, gamepad and the clock all speak this vocabulary.

use crate::domain::direction::Direction;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    /// Queue a turn. Also starts the game from the idle screen.
    Turn(Direction),
    /// Advance the simulation by one tick.
    Step,
    /// Start over after a game over, keeping the high score.
    Restart,
}
