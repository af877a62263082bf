use crate::query::DEFAULT_IMMINENT_DAYS;
use crate::reminder::{DEFAULT_UPCOMING_DAYS, DEFAULT_WINDOW_DAYS};
use crate::schedule::DEFAULT_INTERVAL_SECS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Directory holding project state, relative to the project root.
pub const PROJECT_DIR: &str = ".docket";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: u32,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u32,
    #[serde(default = "default_imminent_days")]
    pub imminent_days: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            upcoming_days: default_upcoming_days(),
            interval_secs: default_interval_secs(),
            imminent_days: default_imminent_days(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Active user id, set by `dk users switch`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

#[must_use]
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join("config.toml")
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_config_path(project_root);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn save_project_config(project_root: &Path, config: &ProjectConfig) -> Result<()> {
    let path = project_config_path(project_root);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to encode project config")?;
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    load_user_config_from(&config_dir.join("docket/config.toml"))
}

fn load_user_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Output mode precedence: `--json`, then `FORMAT`, then the user config,
/// then TTY detection.
#[must_use]
pub fn resolve_output(
    cli_json: bool,
    user_output: Option<&str>,
    env_format: Option<&str>,
) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" | "table" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

const fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

const fn default_upcoming_days() -> u32 {
    DEFAULT_UPCOMING_DAYS
}

const fn default_interval_secs() -> u32 {
    DEFAULT_INTERVAL_SECS
}

const fn default_imminent_days() -> u32 {
    DEFAULT_IMMINENT_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.reminders.window_days, 7);
        assert_eq!(cfg.reminders.upcoming_days, 30);
        assert_eq!(cfg.reminders.interval_secs, 30);
        assert_eq!(cfg.reminders.imminent_days, 3);
        assert_eq!(cfg.session.user, None);
    }

    #[test]
    fn partial_project_config_fills_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(root.path().join(PROJECT_DIR)).expect("mkdir");
        std::fs::write(
            project_config_path(root.path()),
            "[reminders]\nwindow_days = 14\n",
        )
        .expect("write");

        let cfg = load_project_config(root.path()).expect("load");
        assert_eq!(cfg.reminders.window_days, 14);
        assert_eq!(cfg.reminders.upcoming_days, 30);
    }

    #[test]
    fn malformed_project_config_is_an_error() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(root.path().join(PROJECT_DIR)).expect("mkdir");
        std::fs::write(project_config_path(root.path()), "[reminders\n").expect("write");
        let err = load_project_config(root.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn session_user_round_trips_through_save() {
        let root = tempfile::tempdir().expect("temp dir");
        let mut cfg = ProjectConfig::default();
        cfg.session.user = Some("u_lawyer".into());
        save_project_config(root.path(), &cfg).expect("save");
        assert_eq!(load_project_config(root.path()).expect("load"), cfg);
    }

    #[test]
    fn user_config_parses_output_and_user() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "output = \"json\"\nuser = \"u_admin\"\n").expect("write");
        let cfg = load_user_config_from(&path).expect("load");
        assert_eq!(cfg.output.as_deref(), Some("json"));
        assert_eq!(cfg.user.as_deref(), Some("u_admin"));
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        assert_eq!(resolve_output(true, Some("pretty"), Some("text")), "json");
    }

    #[test]
    fn env_beats_user_config_and_aliases_normalize() {
        assert_eq!(resolve_output(false, Some("table"), Some("human")), "pretty");
        assert_eq!(resolve_output(false, Some("human"), Some("table")), "text");
        assert_eq!(resolve_output(false, Some("json"), Some("bogus")), "json");
    }
}
