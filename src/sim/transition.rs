/// The transition function: `(state, action) -> next state`.
///
/// Dispatch table:
///   Idle     + Turn    → enqueue, start playing
///   Play     + Turn    → enqueue
///   Play     + Step    → advance one tick
///   GameOver + Restart → fresh idle state (high score kept)
///   anything else      → unchanged
///
/// Step processing order:
///   1. Consume the queued direction
///   2. Move (prepend head, trim to `size`)
///   3. Apple: respawn, grow, score
///   4. Crash check against the post-move snake

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::board::{self, Pos};
use crate::domain::direction::Direction;
use super::action::Action;
use super::state::{GameState, Mode, GROWTH_FACTOR};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn transition<R: Rng + ?Sized>(state: &GameState, action: Action, rng: &mut R) -> GameState {
    match (state.mode, action) {
        (Mode::Idle, Action::Turn(dir)) => start(state, dir),
        (Mode::Play, Action::Turn(dir)) => turn(state, dir),
        (Mode::Play, Action::Step) => step(state, rng),
        (Mode::GameOver, Action::Restart) => state.restarted(),
        _ => state.clone(),
    }
}

// ══════════════════════════════════════════════════════════════
// Turning
// ══════════════════════════════════════════════════════════════

fn start(state: &GameState, dir: Direction) -> GameState {
    let mut next = turn(state, dir);
    next.mode = Mode::Play;
    next
}

fn turn(state: &GameState, dir: Direction) -> GameState {
    let mut next = state.clone();
    next.direction_queue.enqueue(dir);
    next
}

// ══════════════════════════════════════════════════════════════
// Step
// ══════════════════════════════════════════════════════════════

fn step<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> GameState {
    let mut next = state.clone();

    next.direction_queue.dequeue();
    move_snake(&mut next);

    if next.head() == next.apple {
        eat_apple(&mut next, rng);
    }

    if is_eating_tail(&next) || !next.head().on_board() {
        next.mode = Mode::GameOver;
    }

    next
}

/// Growth is lazy: eating raises `size`, and the tail simply stops being
/// trimmed for the next `GROWTH_FACTOR` steps.
fn move_snake(state: &mut GameState) {
    let head = state.head().step(state.direction());
    state.snake.insert(0, head);
    state.snake.truncate(state.size);
}

fn eat_apple<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    // A full board leaves nowhere to go; the apple stays put.
    if let Some(cell) = free_cell(&state.snake, rng) {
        state.apple = cell;
    }
    state.size += GROWTH_FACTOR;
    state.score += 1;
    state.high_score = state.high_score.max(state.score);
}

fn is_eating_tail(state: &GameState) -> bool {
    let head = state.head();
    state.snake[1..].contains(&head)
}

/// Uniformly random board cell not covered by `snake`.
///
/// Shuffles the whole board, which is O(cells) per call.
// TODO: switch to rejection sampling if the board ever grows past a few hundred cells.
fn free_cell<R: Rng + ?Sized>(snake: &[Pos], rng: &mut R) -> Option<Pos> {
    let mut cells = board::cells();
    cells.shuffle(rng);
    cells.into_iter().find(|c| !snake.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::queue::{DirectionQueue, CAPACITY};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use Direction::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    /// Build a playing state from a head-first list of cells.
    fn playing(cells: &[(i32, i32)], dir: Direction, apple: (i32, i32)) -> GameState {
        let snake: Vec<Pos> = cells.iter().map(|&(x, y)| Pos::new(x, y)).collect();
        GameState {
            mode: Mode::Play,
            apple: Pos::new(apple.0, apple.1),
            size: snake.len() + 1,
            snake,
            direction_queue: DirectionQueue::new(dir),
            score: 0,
            high_score: 0,
        }
    }

    // ── Dispatch table ──

    #[test]
    fn first_turn_starts_game() {
        let s = transition(&GameState::new(), Action::Turn(North), &mut rng());
        assert_eq!(s.mode, Mode::Play);
        // The resting East heading is consumed by the first step.
        assert_eq!(s.direction_queue.as_slice(), &[East, North]);

        let s = transition(&s, Action::Step, &mut rng());
        assert_eq!(s.direction_queue.as_slice(), &[North]);
        assert_eq!(s.head(), Pos::new(4, 6));
    }

    #[test]
    fn reversing_from_idle_keeps_heading() {
        let s = transition(&GameState::new(), Action::Turn(West), &mut rng());
        assert_eq!(s.mode, Mode::Play);
        assert_eq!(s.direction_queue.as_slice(), &[East]);
        let s = transition(&s, Action::Step, &mut rng());
        assert_eq!(s.head(), Pos::new(5, 7));
        assert_eq!(s.mode, Mode::Play);
    }

    #[test]
    fn invalid_actions_are_identity() {
        let idle = GameState::new();
        assert_eq!(transition(&idle, Action::Step, &mut rng()), idle);
        assert_eq!(transition(&idle, Action::Restart, &mut rng()), idle);

        let play = playing(&[(8, 7), (7, 7), (6, 7)], East, (1, 1));
        assert_eq!(transition(&play, Action::Restart, &mut rng()), play);

        let mut over = play.clone();
        over.mode = Mode::GameOver;
        assert_eq!(transition(&over, Action::Step, &mut rng()), over);
        assert_eq!(transition(&over, Action::Turn(North), &mut rng()), over);
    }

    #[test]
    fn turn_then_opposite_keeps_first() {
        let s = playing(&[(8, 7), (7, 7), (6, 7)], East, (1, 1));
        let s = transition(&s, Action::Turn(North), &mut rng());
        let s = transition(&s, Action::Turn(South), &mut rng());
        assert_eq!(s.direction_queue.as_slice(), &[East, North]);
    }

    // ── Step ──

    #[test]
    fn plain_step_moves_and_trims() {
        let mut s = playing(&[(8, 7), (7, 7), (6, 7)], East, (1, 1));
        s.size = 3;
        let s = transition(&s, Action::Step, &mut rng());
        assert_eq!(s.snake, vec![Pos::new(9, 7), Pos::new(8, 7), Pos::new(7, 7)]);
        assert_eq!(s.mode, Mode::Play);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn eating_apple_grows_and_scores() {
        let s = playing(&[(8, 7), (7, 7), (6, 7)], East, (9, 7));
        assert_eq!(s.size, 4);

        let s = transition(&s, Action::Step, &mut rng());
        assert_eq!(s.head(), Pos::new(9, 7));
        assert_eq!(s.size, 6);
        assert_eq!(s.score, 1);
        assert_eq!(s.high_score, 1);
        assert!(s.apple.on_board());
        assert!(!s.snake.contains(&s.apple));
        assert_eq!(s.mode, Mode::Play);
    }

    #[test]
    fn growth_shows_up_over_following_steps() {
        let mut s = playing(&[(2, 7), (1, 7), (0, 7)], East, (3, 7));
        s.size = 3;
        let mut r = rng();

        let mut s = transition(&s, Action::Step, &mut r);
        // Trimmed to the old size before the apple raised it.
        assert_eq!(s.snake.len(), 3);
        assert_eq!(s.size, 5);
        // Keep the respawned apple out of the way.
        s.apple = Pos::new(0, 0);

        let s = transition(&s, Action::Step, &mut r);
        assert_eq!(s.snake.len(), 4);
        let s = transition(&s, Action::Step, &mut r);
        assert_eq!(s.snake.len(), 5);
        let s = transition(&s, Action::Step, &mut r);
        assert_eq!(s.snake.len(), 5);
    }

    #[test]
    fn biting_body_ends_game() {
        // Head at (5,5) heading South into its own body at (5,6).
        let mut s = playing(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)], South, (1, 1));
        s.size = 5;
        let over = transition(&s, Action::Step, &mut rng());
        assert_eq!(over.mode, Mode::GameOver);

        // Frozen until restart
        assert_eq!(transition(&over, Action::Step, &mut rng()), over);
        assert_eq!(transition(&over, Action::Turn(East), &mut rng()), over);
    }

    #[test]
    fn chasing_own_tail_is_safe() {
        // The tail cell is vacated by the trim in the same step.
        let mut s = playing(&[(5, 5), (6, 5), (6, 6), (5, 6)], South, (1, 1));
        s.size = 4;
        let s = transition(&s, Action::Step, &mut rng());
        assert_eq!(s.mode, Mode::Play);
        assert_eq!(s.head(), Pos::new(5, 6));
    }

    #[test]
    fn leaving_board_ends_game() {
        let s = playing(&[(16, 7), (15, 7), (14, 7)], East, (1, 1));
        let s = transition(&s, Action::Step, &mut rng());
        assert_eq!(s.mode, Mode::GameOver);
        assert_eq!(s.head(), Pos::new(17, 7));

        let s = playing(&[(3, 0), (3, 1)], North, (1, 1));
        let s = transition(&s, Action::Step, &mut rng());
        assert_eq!(s.mode, Mode::GameOver);
    }

    #[test]
    fn step_consumes_one_queued_turn() {
        let s = playing(&[(8, 7), (7, 7), (6, 7)], East, (1, 1));
        let s = transition(&s, Action::Turn(North), &mut rng());
        let s = transition(&s, Action::Turn(West), &mut rng());
        assert_eq!(s.direction_queue.as_slice(), &[East, North, West]);

        let s = transition(&s, Action::Step, &mut rng());
        assert_eq!(s.head(), Pos::new(8, 6));
        let s = transition(&s, Action::Step, &mut rng());
        assert_eq!(s.head(), Pos::new(7, 6));
        let s = transition(&s, Action::Step, &mut rng());
        assert_eq!(s.head(), Pos::new(6, 6));
        assert_eq!(s.direction_queue.as_slice(), &[West]);
    }

    // ── Restart ──

    #[test]
    fn restart_keeps_high_score_only() {
        let s = playing(&[(8, 7), (7, 7), (6, 7)], East, (9, 7));
        let mut r = rng();
        let s = transition(&s, Action::Step, &mut r);
        assert_eq!(s.high_score, 1);

        let mut over = s.clone();
        over.mode = Mode::GameOver;
        let fresh = transition(&over, Action::Restart, &mut r);

        let mut expected = GameState::new();
        expected.high_score = 1;
        assert_eq!(fresh, expected);
    }

    // ── Apple respawn ──

    #[test]
    fn respawn_finds_the_last_free_cell() {
        let all = board::cells();
        let hole = Pos::new(11, 3);
        let snake: Vec<Pos> = all.iter().copied().filter(|&c| c != hole).collect();
        assert_eq!(free_cell(&snake, &mut rng()), Some(hole));
        assert_eq!(free_cell(&all, &mut rng()), None);
    }

    #[test]
    fn respawn_never_lands_on_snake() {
        let snake: Vec<Pos> = (0..17).map(|x| Pos::new(x, 7)).collect();
        let mut r = rng();
        for _ in 0..200 {
            let cell = free_cell(&snake, &mut r).unwrap();
            assert!(cell.on_board());
            assert!(!snake.contains(&cell));
        }
    }

    // ── Invariants under random play ──

    #[test]
    fn random_play_keeps_invariants() {
        let mut r = rng();
        let mut s = GameState::new();
        let mut best = 0;

        for _ in 0..20_000 {
            let action = match r.gen_range(0..10) {
                0..=2 => Action::Turn(Direction::ALL[r.gen_range(0..4)]),
                3 => Action::Restart,
                _ => Action::Step,
            };
            let next = transition(&s, action, &mut r);

            assert!(next.snake.len() <= next.size);
            if action != Action::Restart {
                assert!(next.size >= s.size);
            }
            assert!(next.high_score >= next.score);
            assert!(next.high_score >= best);
            best = next.high_score;

            let q = next.direction_queue.as_slice();
            assert!((1..=CAPACITY).contains(&q.len()));
            for pair in q.windows(2) {
                assert_ne!(pair[0], pair[1]);
                assert!(!pair[0].is_opposite(pair[1]));
            }

            assert!(next.apple.on_board());
            if next.mode == Mode::Play {
                assert!(next.head().on_board());
                let unique: std::collections::HashSet<_> = next.snake.iter().collect();
                assert_eq!(unique.len(), next.snake.len());
            }

            s = next;
        }
    }
}
