/// Keyboard input controller.
///
/// Every key press (and every auto-repeat of a held key) becomes at most one
/// command. Direction keys turn into `Action::Turn`, which goes through the
/// same `Clock::input` entry point as the simulation ticks. The queue
/// collapsing rule is the only filter; nothing here second-guesses a turn.
///
///   W / ↑  →  North        Enter / Space / R  →  Restart
///   S / ↓  →  South        Esc / Q / Ctrl+C   →  Quit
///   A / ←  →  West
///   D / →  →  East

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::direction::Direction;
use crate::error::Result;
use crate::sim::action::Action;

/// What a key press asks for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Game(Action),
    Quit,
}

const KEYS_NORTH: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_SOUTH: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_WEST: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_EAST: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' '), KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub fn key_to_direction(code: KeyCode) -> Option<Direction> {
    if KEYS_NORTH.contains(&code) {
        Some(Direction::North)
    } else if KEYS_SOUTH.contains(&code) {
        Some(Direction::South)
    } else if KEYS_WEST.contains(&code) {
        Some(Direction::West)
    } else if KEYS_EAST.contains(&code) {
        Some(Direction::East)
    } else {
        None
    }
}

pub fn key_to_command(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));
    if ctrl_c || KEYS_QUIT.contains(&key.code) {
        return Some(Command::Quit);
    }
    if KEYS_RESTART.contains(&key.code) {
        return Some(Command::Game(Action::Restart));
    }
    key_to_direction(key.code).map(|d| Command::Game(Action::Turn(d)))
}

pub struct InputState {
    /// Commands from the most recent `drain_events()`, in arrival order.
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            commands: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before the clock advances.
    pub fn drain_events(&mut self) -> Result<()> {
        self.commands.clear();
        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(cmd) = key_to_command(&key) {
                    self.commands.push(cmd);
                }
            }
        }
        Ok(())
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}
