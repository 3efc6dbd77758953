use crate::icon::{self, IconName};
use crate::wm::{ShellCommand, WindowClass, spawn_shell};
use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_entry_parser::parse_entry;
use fs_err as fs;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Desktop entry id: the `.desktop` file name without its extension.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct AppId(String);

crate::impl_string_newtype!(AppId);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct AppName(String);

crate::impl_string_newtype!(AppName);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct AppQuery(String);

crate::impl_string_newtype!(AppQuery);

#[derive(Debug, Clone)]
pub struct AppInfo {
    pub id: AppId,
    pub name: AppName,
    pub icon: PathBuf,
    pub class: WindowClass,
    pub exec: ShellCommand,
    pub entry_path: PathBuf,
}

static ENTRIES: OnceLock<RwLock<Vec<AppInfo>>> = OnceLock::new();

pub fn refresh_cache() {
    let apps = scan_entries();
    let lock = ENTRIES.get_or_init(|| RwLock::new(Vec::new()));
    *lock.write() = apps;
}

pub fn get_all_entries() -> Vec<AppInfo> {
    let lock = ENTRIES.get_or_init(|| RwLock::new(scan_entries()));
    lock.read().clone()
}

fn get_desktop_directories() -> Vec<PathBuf> {
    let xdg = xdg::BaseDirectories::new();
    let mut dirs = Vec::new();

    if let Some(home) = xdg.get_data_home() {
        dirs.push(home.join("applications"));
    }

    dirs.extend(
        xdg.get_data_dirs()
            .into_iter()
            .map(|p| p.join("applications")),
    );
    dirs
}

fn collect_desktop_files() -> Vec<PathBuf> {
    let mut entries = HashMap::new();

    // later directories have lower precedence, so walk them first
    for dir in get_desktop_directories().iter().rev() {
        if let Ok(read_dir) = fs::read_dir(dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) == Some("desktop")
                    && let Some(id) = path.file_name().and_then(|s| s.to_str())
                {
                    entries.insert(id.to_string(), path);
                }
            }
        }
    }
    entries.into_values().collect()
}

pub fn scan_entries() -> Vec<AppInfo> {
    collect_desktop_files()
        .into_iter()
        .filter_map(|path| parse_desktop_file(&path))
        .collect()
}

pub fn parse_desktop_file(path: &Path) -> Option<AppInfo> {
    let entry = parse_entry(path).ok()?;
    let section = entry.section("Desktop Entry")?;

    if section.attr("Type").first()? != "Application" {
        return None;
    }
    if let Some(no_display) = section.attr("NoDisplay").first()
        && no_display == "true"
    {
        return None;
    }

    let name = section.attr("Name").first()?.to_string();

    let icon_path = match section.attr("Icon").first() {
        Some(icon) => icon::find_icon_path(&IconName::from(icon.to_string()), icon::MENU_ICON_SIZE)
            .unwrap_or_else(|| PathBuf::from(icon)),
        None => PathBuf::new(),
    };

    let exec_raw = section.attr("Exec").first()?;
    let exec = strip_field_codes(exec_raw);

    let id = path.file_name()?.to_str()?.trim_end_matches(".desktop");
    let class = section
        .attr("StartupWMClass")
        .first()
        .cloned()
        .unwrap_or_else(|| id.to_string());

    Some(AppInfo {
        id: AppId::new(id),
        name: AppName::new(name),
        icon: icon_path,
        class: WindowClass::new(class),
        exec: ShellCommand::new(exec),
        entry_path: path.to_path_buf(),
    })
}

fn strip_field_codes(exec: &str) -> String {
    shell_words::split(exec)
        .map(|args| {
            let clean_args: Vec<_> = args
                .into_iter()
                .filter(|arg| !arg.starts_with('%'))
                .collect();
            shell_words::join(clean_args)
        })
        .unwrap_or_else(|_| exec.to_string())
}

pub fn find_desktop_entry(query: &AppQuery) -> Option<AppInfo> {
    find_desktop_entry_in_list(query, &get_all_entries())
}

pub fn find_desktop_entry_in_list(query: &AppQuery, entries: &[AppInfo]) -> Option<AppInfo> {
    let lower_query = query.to_lowercase();
    entries
        .iter()
        .find(|app| {
            app.id.to_lowercase() == lower_query
                || app.name.to_lowercase() == lower_query
                || app.class.to_lowercase() == lower_query
        })
        .cloned()
}

/// Runs the configured app-info command with `{id}` substituted. A logged
/// no-op when no command is configured.
pub fn open_app_info(id: &AppId, info_exec: Option<&ShellCommand>) {
    match info_exec {
        Some(template) => {
            let cmd = ShellCommand::new(template.replace("{id}", id.as_str()));
            if let Err(e) = spawn_shell(&cmd) {
                log::error!("Failed to run app info command for '{}': {}", id, e);
            }
        }
        None => log::info!("No info_exec configured; ignoring app info for '{}'", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, class: &str) -> AppInfo {
        AppInfo {
            id: AppId::new(id),
            name: AppName::new(name),
            icon: PathBuf::new(),
            class: WindowClass::new(class),
            exec: ShellCommand::new(id),
            entry_path: PathBuf::new(),
        }
    }

    #[test]
    fn test_strip_field_codes() {
        assert_eq!(strip_field_codes("firefox %u"), "firefox");
        assert_eq!(
            strip_field_codes("env FOO=1 vlc --started-from-file %U"),
            "env FOO=1 vlc --started-from-file"
        );
        assert_eq!(strip_field_codes("gimp"), "gimp");
    }

    #[test]
    fn test_find_by_id_name_or_class() {
        let entries = vec![
            entry("org.mozilla.firefox", "Firefox", "firefox"),
            entry("vesktop", "Vesktop", "vesktop"),
        ];

        for query in ["Firefox", "firefox", "org.mozilla.firefox"] {
            let found = find_desktop_entry_in_list(&AppQuery::new(query), &entries).unwrap();
            assert_eq!(found.id.as_str(), "org.mozilla.firefox");
        }
        assert!(find_desktop_entry_in_list(&AppQuery::new("emacs"), &entries).is_none());
    }
}
