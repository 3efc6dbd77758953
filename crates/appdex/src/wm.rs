use crate::desktop::AppInfo;
use derive_more::{AsRef, Deref, Display, From, Into};
use hyprland::data::{Clients, Monitors};
use hyprland::dispatch::{Dispatch, DispatchType, WindowIdentifier};
use hyprland::error::HyprError;
use hyprland::prelude::*;
use hyprland::shared::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct WindowClass(String);

crate::impl_string_newtype!(WindowClass);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct MonitorName(String);

crate::impl_string_newtype!(MonitorName);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ShellCommand(String);

crate::impl_string_newtype!(ShellCommand);

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Hypr(#[from] HyprError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("no exec command for '{0}'")]
    NoExec(String),
}

pub fn get_active_classes() -> Vec<WindowClass> {
    Clients::get()
        .map(|clients| clients.into_iter().map(|c| WindowClass(c.class)).collect())
        .unwrap_or_default()
}

pub fn focus_window(address: &Address) -> Result<(), HyprError> {
    Dispatch::call(DispatchType::FocusWindow(WindowIdentifier::Address(
        address.clone(),
    )))
}

pub fn get_active_monitor() -> Option<MonitorName> {
    Monitors::get()
        .ok()?
        .into_iter()
        .find(|m| m.focused)
        .map(|m| MonitorName(m.name))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
enum MatchScore {
    NoMatch,
    Fuzzy,
    Component,
    Exact,
}

fn score_class(window_class: &str, target: &str) -> MatchScore {
    match window_class {
        s if s == target => MatchScore::Exact,
        s if s.split('.').any(|p| p == target) => MatchScore::Component,
        s if s.contains(target) || target.contains(s) => MatchScore::Fuzzy,
        _ => MatchScore::NoMatch,
    }
}

pub fn spawn_shell(exec: &ShellCommand) -> Result<(), std::io::Error> {
    std::process::Command::new("sh")
        .arg("-c")
        .arg(exec.as_str())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()?;
    Ok(())
}

/// Focuses the best-matching window of the app's class, or spawns its exec
/// command if no window matches.
pub fn launch(app: &AppInfo) -> Result<(), LaunchError> {
    let target = app.class.to_ascii_lowercase();

    let best = Clients::get()?
        .into_iter()
        .map(|c| (score_class(&c.class.to_ascii_lowercase(), &target), c))
        .filter(|(score, _)| *score > MatchScore::NoMatch)
        .max_by_key(|(score, _)| *score);

    match best {
        Some((_, client)) => focus_window(&client.address).map_err(LaunchError::from),
        None => {
            if app.exec.is_empty() {
                return Err(LaunchError::NoExec(app.name.to_string()));
            }
            spawn_shell(&app.exec)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_match_ranking() {
        assert_eq!(score_class("firefox", "firefox"), MatchScore::Exact);
        assert_eq!(
            score_class("org.mozilla.firefox", "firefox"),
            MatchScore::Component
        );
        assert_eq!(score_class("firefox-esr", "firefox"), MatchScore::Fuzzy);
        assert_eq!(score_class("vesktop", "firefox"), MatchScore::NoMatch);
        assert!(MatchScore::Exact > MatchScore::Component);
        assert!(MatchScore::Component > MatchScore::Fuzzy);
    }
}
