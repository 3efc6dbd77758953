use appdex::wm::ShellCommand;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Where the edit-mode action targets go. `Auto` follows the viewport
/// orientation: bottom edge in portrait, right edge in landscape.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TargetEdge {
    #[default]
    Auto,
    Bottom,
    Right,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// A press shorter than this (and within `touch_slop`) counts as a tap.
    #[serde(default = "default_tap_timeout_ms")]
    pub tap_timeout_ms: u64,
    /// Maximum finger travel, in pixels, for a press to still count as a tap.
    #[serde(default = "default_touch_slop")]
    pub touch_slop: f64,
    #[serde(default)]
    pub targets: TargetEdge,
    /// Command run when the menu is tapped (the full application list).
    #[serde(default)]
    pub list_exec: Option<ShellCommand>,
    /// Command template run for "app info"; `{id}` is the desktop entry id.
    #[serde(default)]
    pub info_exec: Option<ShellCommand>,
}

fn default_tap_timeout_ms() -> u64 {
    150
}

fn default_touch_slop() -> f64 {
    16.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tap_timeout_ms: default_tap_timeout_ms(),
            touch_slop: default_touch_slop(),
            targets: TargetEdge::default(),
            list_exec: None,
            info_exec: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "gyre").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("GYRE"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the config, writing the commented default file on first run. Any
/// failure falls back to defaults; the launcher must come up regardless.
pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
        && let Err(e) = write_default_config()
    {
        log::error!("Failed to write default config: {}", e);
    }

    match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_edge_deserialization() {
        let cases = vec![
            ("\"auto\"", TargetEdge::Auto),
            ("\"Auto\"", TargetEdge::Auto),
            ("\"BOTTOM\"", TargetEdge::Bottom),
            ("\"bottom\"", TargetEdge::Bottom),
            ("\"Right\"", TargetEdge::Right),
        ];

        for (json, expected) in cases {
            let deserialized: TargetEdge = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.tap_timeout_ms, 150);
        assert_eq!(config.touch_slop, 16.0);
        assert_eq!(config.targets, TargetEdge::Auto);
        assert!(config.list_exec.is_none());
        assert!(config.info_exec.is_none());
    }

    #[test]
    fn test_partial_config_overrides() {
        let config: Config =
            serde_json::from_str("{\"tap_timeout_ms\": 220, \"targets\": \"right\"}").unwrap();
        assert_eq!(config.tap_timeout_ms, 220);
        assert_eq!(config.targets, TargetEdge::Right);
        assert_eq!(config.touch_slop, 16.0);
    }
}
