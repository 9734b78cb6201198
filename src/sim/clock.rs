/// Fixed-timestep game clock.
///
/// Owns the two snapshots the renderer interpolates between and the
/// accumulator of wall-clock time not yet turned into steps. All state
/// changes funnel through `input()`, whether they come from a key press
/// or from a tick being drained.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use super::action::Action;
use super::event::{self, GameEvent};
use super::state::GameState;
use super::transition::transition;
use super::view::ViewModel;

/// Seconds per simulation step.
pub const TIME_STEP: f64 = 1.0 / 6.0;

pub struct Clock<R: Rng> {
    current: GameState,
    previous: GameState,
    /// Seconds carried over from earlier frames, always ≤ TIME_STEP after a drain.
    accumulator: f64,
    rng: R,
}

impl<R: Rng> Clock<R> {
    pub fn new(rng: R) -> Self {
        let state = GameState::new();
        Clock {
            previous: state.clone(),
            current: state,
            accumulator: 0.0,
            rng,
        }
    }

    pub fn current(&self) -> &GameState {
        &self.current
    }

    #[cfg(test)]
    pub fn previous(&self) -> &GameState {
        &self.previous
    }

    /// Apply one action.
    ///
    /// A step first remembers the current snapshot as the interpolation
    /// origin. A restart resets the origin afterwards so the fresh snake
    /// does not slide in from where the old one died.
    pub fn input(&mut self, action: Action) -> Vec<GameEvent> {
        if action == Action::Step {
            self.previous = self.current.clone();
        }

        let next = transition(&self.current, action, &mut self.rng);
        let events = event::between(&self.current, &next);
        self.current = next;

        if action == Action::Restart {
            self.previous = self.current.clone();
        }

        log_events(&events);
        events
    }

    /// Feed elapsed wall-clock time, run every whole step it covers and
    /// keep the remainder. Returns events from all steps run.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        self.accumulator += elapsed.as_secs_f64();

        let mut events = vec![];
        while self.accumulator > TIME_STEP {
            events.extend(self.input(Action::Step));
            self.accumulator -= TIME_STEP;
        }
        events
    }

    /// Progress through the current step, 0.0 to 1.0.
    pub fn interpolation(&self) -> f32 {
        (self.accumulator / TIME_STEP) as f32
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::build(self.interpolation(), &self.previous, &self.current)
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Started => info!("game started"),
            GameEvent::TurnQueued(dir) => debug!(?dir, "turn queued"),
            GameEvent::AppleEaten { at, score } => debug!(x = at.x, y = at.y, score, "apple eaten"),
            GameEvent::Crashed { score } => info!(score, "game over"),
            GameEvent::Restarted { high_score } => info!(high_score, "restarted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::Pos;
    use crate::domain::direction::Direction;
    use crate::sim::state::Mode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn clock() -> Clock<StdRng> {
        Clock::new(StdRng::seed_from_u64(7))
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn short_frames_accumulate() {
        let mut c = clock();
        c.input(Action::Turn(Direction::East));
        c.advance(secs(0.1));
        assert_eq!(c.current().head(), Pos::new(4, 7));
        assert!((c.interpolation() - 0.6).abs() < 1e-3);

        c.advance(secs(0.1));
        assert_eq!(c.current().head(), Pos::new(5, 7));
        assert_eq!(c.previous().head(), Pos::new(4, 7));
        // 0.2 - 1/6 left over
        assert!((c.interpolation() - 0.2).abs() < 1e-3);
    }

    #[test]
    fn late_frame_replays_several_steps() {
        let mut c = clock();
        c.input(Action::Turn(Direction::East));
        c.advance(secs(0.45));
        assert_eq!(c.current().head(), Pos::new(6, 7));
        assert_eq!(c.previous().head(), Pos::new(5, 7));
        assert!(c.interpolation() < 1.0);
    }

    #[test]
    fn idle_does_not_move() {
        let mut c = clock();
        c.advance(secs(2.0));
        assert_eq!(c.current(), &GameState::new());
        assert_eq!(c.current().mode, Mode::Idle);
    }

    #[test]
    fn turn_does_not_touch_previous() {
        let mut c = clock();
        c.input(Action::Turn(Direction::East));
        c.advance(secs(0.2));
        let before = c.previous().clone();
        c.input(Action::Turn(Direction::North));
        assert_eq!(c.previous(), &before);
    }

    #[test]
    fn restart_resets_interpolation_origin() {
        let mut c = clock();
        c.input(Action::Turn(Direction::North));
        // Row 7 to row -1 takes eight steps; give it plenty.
        let events = c.advance(secs(20.0 * TIME_STEP + 0.01));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Crashed { .. })));
        assert_eq!(c.current().mode, Mode::GameOver);

        let events = c.input(Action::Restart);
        assert_eq!(events, vec![GameEvent::Restarted { high_score: 0 }]);
        assert_eq!(c.current(), c.previous());
        assert_eq!(c.current().mode, Mode::Idle);
    }

    #[test]
    fn view_reflects_progress() {
        let mut c = clock();
        c.input(Action::Turn(Direction::East));
        c.advance(secs(TIME_STEP + 0.5 * TIME_STEP));
        let v = c.view();
        // Head between (4,7) and (5,7)
        assert!(v.head().0 > 4.0 && v.head().0 < 5.0);
        assert_eq!(v.head().1, 7.0);
    }
}
