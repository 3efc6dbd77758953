use crate::desktop::{AppId, AppInfo};
use directories::ProjectDirs;
use fs_err as fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to determine data directory")]
    DataDirNotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn order_path() -> Result<PathBuf, StoreError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "gyre").ok_or(StoreError::DataDirNotFound)?;
    Ok(proj_dirs.data_dir().join("menu"))
}

/// Loads the saved menu order. A missing file is an empty menu, not an error.
pub fn load_order() -> Result<Vec<AppId>, StoreError> {
    let path = order_path()?;
    if !path.exists() {
        return Ok(Vec::new());
    }
    Ok(parse_order(&fs::read_to_string(path)?))
}

pub fn save_order(ids: &[AppId]) -> Result<(), StoreError> {
    let path = order_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serialize_order(ids))?;
    Ok(())
}

fn parse_order(text: &str) -> Vec<AppId> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(AppId::new)
        .collect()
}

fn serialize_order(ids: &[AppId]) -> String {
    let mut out = String::new();
    for id in ids {
        out.push_str(id.as_str());
        out.push('\n');
    }
    out
}

/// Resolves a saved order against the current entry index, preserving the
/// saved sequence and dropping ids that no longer resolve.
pub fn resolve_order(saved: &[AppId], entries: &[AppInfo]) -> Vec<AppInfo> {
    saved
        .iter()
        .filter_map(|id| entries.iter().find(|app| &app.id == id).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::{AppName, AppQuery, find_desktop_entry_in_list};
    use crate::wm::{ShellCommand, WindowClass};

    fn entry(id: &str) -> AppInfo {
        AppInfo {
            id: AppId::new(id),
            name: AppName::new(id),
            icon: PathBuf::new(),
            class: WindowClass::new(id),
            exec: ShellCommand::new(id),
            entry_path: PathBuf::new(),
        }
    }

    #[test]
    fn test_order_round_trip() {
        let ids = vec![AppId::new("firefox"), AppId::new("org.gnome.Nautilus")];
        assert_eq!(parse_order(&serialize_order(&ids)), ids);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        assert_eq!(
            parse_order("firefox\n\n  \nvesktop\n"),
            vec![AppId::new("firefox"), AppId::new("vesktop")]
        );
    }

    #[test]
    fn test_resolve_keeps_saved_order_and_drops_missing() {
        let entries = vec![entry("a"), entry("b"), entry("c")];
        let saved = vec![AppId::new("c"), AppId::new("gone"), AppId::new("a")];

        let resolved = resolve_order(&saved, &entries);
        let ids: Vec<_> = resolved.iter().map(|app| app.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);

        // resolved entries still index back into the full list
        assert!(find_desktop_entry_in_list(&AppQuery::new("a"), &entries).is_some());
    }
}
