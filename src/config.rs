/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Board size and game speed are fixed and deliberately not configurable.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use tracing::warn;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub log: LogConfig,
    pub show_help: bool,
    pub sound_enabled: bool,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogConfig {
    pub file: PathBuf,
    pub filter: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_true")]
    show_help: bool,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_true")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_log_file() -> String { "snake.log".into() }
fn default_log_filter() -> String { "info".into() }
fn default_true() -> bool { true }
fn default_restart() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            log_file: default_log_file(),
            log_filter: default_log_filter(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { show_help: true }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: true }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            restart: default_restart(),
            quit: default_quit(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    ///
    /// Also returns the warnings met on the way; logging is not up yet
    /// when this runs, so the caller replays them once it is.
    pub fn load() -> (Self, Vec<String>) {
        let search_dirs = candidate_dirs();
        let (toml_cfg, warnings) = load_toml(&search_dirs);
        (Self::from_toml(toml_cfg, &search_dirs), warnings)
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Relative log paths land next to the first candidate directory.
        let log_file = PathBuf::from(&cfg.general.log_file);
        let log_file = match search_dirs.first() {
            Some(dir) if log_file.is_relative() => dir.join(&log_file),
            _ => log_file,
        };

        GameConfig {
            log: LogConfig {
                file: log_file,
                filter: cfg.general.log_filter,
            },
            show_help: cfg.display.show_help,
            sound_enabled: cfg.sound.enabled,
            gamepad: GamepadConfig {
                restart: cfg.gamepad.restart,
                quit: cfg.gamepad.quit,
            },
        }
    }

    /// Replay warnings collected during `load()` into the log.
    pub fn report(warnings: &[String]) {
        for w in warnings {
            warn!("{w}");
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> (TomlConfig, Vec<String>) {
    let mut warnings = vec![];
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let cfg = parse(&text, &path).unwrap_or_else(|msg| {
                    warnings.push(msg);
                    TomlConfig::default()
                });
                return (cfg, warnings);
            }
            Err(e) => warnings.push(format!("could not read {}: {e}", path.display())),
        }
    }
    (TomlConfig::default(), warnings)
}

fn parse(text: &str, path: &Path) -> Result<TomlConfig, String> {
    toml::from_str::<TomlConfig>(text)
        .map_err(|e| format!("{} parse error, using defaults: {e}", path.display()))
}
