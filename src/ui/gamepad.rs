/// Gamepad input using gilrs.
///
/// Stands in for the on-screen arrow buttons of a touch layout: every fresh
/// D-pad or left-stick push is one turn. Restart and quit buttons come from
/// `config.toml`.
///
/// Default mapping:
///   D-pad / Left Stick  →  Turn
///   Start / A           →  Restart
///   Select              →  Quit
///
/// Without the "gamepad" feature this compiles to an input source that
/// never produces anything.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
#[cfg(feature = "gamepad")]
use tracing::{debug, info};

use crate::config::GamepadConfig;
use crate::domain::direction::Direction;
use crate::sim::action::Action;
use super::input::Command;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    restart: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            restart: vec![Btn::Start, Btn::A],
            quit: vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// Unknown names are skipped; a list with no usable names keeps the default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let mut map = ActionMap::default();
        let rs = parse_list(&cfg.restart);
        if !rs.is_empty() { map.restart = rs; }
        let qt = parse_list(&cfg.quit);
        if !qt.is_empty() { map.quit = qt; }
        map
    }

    fn command_for(&self, btn: Btn) -> Option<Command> {
        if self.quit.contains(&btn) {
            Some(Command::Quit)
        } else if self.restart.contains(&btn) {
            Some(Command::Game(Action::Restart))
        } else {
            None
        }
    }
}

/// Stick position → the direction it is pushed toward, if past the deadzone.
/// The dominant axis wins; gilrs reports +y as up.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_direction(x: f32, y: f32) -> Option<Direction> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        None
    } else if x.abs() >= y.abs() {
        Some(if x > 0.0 { Direction::East } else { Direction::West })
    } else {
        Some(if y > 0.0 { Direction::North } else { Direction::South })
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    stick_x: f32,
    stick_y: f32,
    /// Direction the stick was last held in, for edge detection.
    stick_dir: Option<Direction>,

    action_map: ActionMap,
    commands: Vec<Command>,

    pub connected: bool,
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    info!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            action_map: ActionMap::from_config(cfg),
            commands: Vec::with_capacity(4),
            connected,
        }
    }

    /// Collect commands from all pending gamepad events.
    pub fn update(&mut self) {
        self.commands.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press_button(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    self.update_axis(axis, value);
                }
                EventType::Connected => {
                    debug!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    debug!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn press_button(&mut self, gilrs_btn: Button) {
        let dpad = match gilrs_btn {
            Button::DPadUp    => Some(Direction::North),
            Button::DPadDown  => Some(Direction::South),
            Button::DPadLeft  => Some(Direction::West),
            Button::DPadRight => Some(Direction::East),
            _ => None,
        };
        if let Some(dir) = dpad {
            self.commands.push(Command::Game(Action::Turn(dir)));
            return;
        }

        if let Some(cmd) = Btn::from_gilrs(gilrs_btn).and_then(|b| self.action_map.command_for(b)) {
            self.commands.push(cmd);
        }
    }

    #[cfg(feature = "gamepad")]
    fn update_axis(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::LeftStickX => self.stick_x = value,
            Axis::LeftStickY => self.stick_y = value,
            _ => return,
        }
        let dir = stick_direction(self.stick_x, self.stick_y);
        if dir != self.stick_dir {
            if let Some(d) = dir {
                self.commands.push(Command::Game(Action::Turn(d)));
            }
            self.stick_dir = dir;
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.stick_x = 0.0;
        self.stick_y = 0.0;
        self.stick_dir = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(restart: &[&str], quit: &[&str]) -> GamepadConfig {
        GamepadConfig {
            restart: restart.iter().map(|s| s.to_string()).collect(),
            quit: quit.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name("Turbo"), None);
    }

    #[test]
    fn config_overrides_mapping() {
        let map = ActionMap::from_config(&cfg(&["X"], &["B", "nonsense"]));
        assert_eq!(map.command_for(Btn::X), Some(Command::Game(Action::Restart)));
        assert_eq!(map.command_for(Btn::B), Some(Command::Quit));
        assert_eq!(map.command_for(Btn::Start), None);
    }

    #[test]
    fn unusable_config_keeps_defaults() {
        let map = ActionMap::from_config(&cfg(&["???"], &[]));
        assert_eq!(map, ActionMap::default());
    }

    #[test]
    fn stick_dominant_axis() {
        assert_eq!(stick_direction(0.1, 0.2), None);
        assert_eq!(stick_direction(0.9, 0.3), Some(Direction::East));
        assert_eq!(stick_direction(-0.9, 0.3), Some(Direction::West));
        assert_eq!(stick_direction(0.2, 0.8), Some(Direction::North));
        assert_eq!(stick_direction(0.2, -0.8), Some(Direction::South));
    }
}
