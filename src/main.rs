/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use config::GameConfig;
use sim::clock::Clock;
use ui::gamepad::GamepadState;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;
use ui::sound::{self as sfx, SoundEngine};

/// Pause between frames; the host's stand-in for a display refresh.
const FRAME_SLEEP: Duration = Duration::from_millis(8);

fn main() {
    let (config, warnings) = GameConfig::load();
    if logging::init(&config.log) {
        GameConfig::report(&warnings);
    }
    info!(log_file = %config.log.file.display(), "starting");

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        let _ = renderer.cleanup();
        return;
    }

    let sound = if config.sound_enabled { SoundEngine::new() } else { None };
    let mut clock = Clock::new(SmallRng::from_entropy());

    let result = game_loop(&mut clock, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("game loop aborted: {e}");
        eprintln!("Game error: {e}");
    }

    info!(high_score = clock.current().high_score, "exiting");
    println!();
    println!("Thanks for playing Snake!");
    println!("High Score: {}", clock.current().high_score);
}

/// Runs until a quit command arrives.
///
/// Each frame: apply input, drain elapsed time into whole steps, render
/// with the leftover fraction, sleep.
fn game_loop<R: Rng>(
    clock: &mut Clock<R>,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> error::Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new(&config.gamepad);
    if gp.connected {
        info!("gamepad detected");
    }
    let mut last_frame = Instant::now();

    loop {
        kb.drain_events()?;
        gp.update();

        for &cmd in kb.commands().iter().chain(gp.commands()) {
            match cmd {
                Command::Quit => return Ok(()),
                Command::Game(action) => {
                    let events = clock.input(action);
                    sfx::play_events(sound, &events);
                }
            }
        }

        let now = Instant::now();
        let events = clock.advance(now - last_frame);
        last_frame = now;
        sfx::play_events(sound, &events);

        renderer.render(&clock.view(), config.show_help)?;
        std::thread::sleep(FRAME_SLEEP);
    }
}
