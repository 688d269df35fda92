#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::task::model::{StatusFilter, TaskStatus};

pub const CONFIG_ENV: &str = "TASK_CLI_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "exceprt_len")]
    pub excerpt_len: usize,
    pub storage: StorageConfig,
    pub actions: ActionsConfig,
    pub logging: LoggingConfig,
    pub messages: MessagesConfig,
    pub errors: ErrorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excerpt_len: 20,
            storage: StorageConfig::default(),
            actions: ActionsConfig::default(),
            logging: LoggingConfig::default(),
            messages: MessagesConfig::default(),
            errors: ErrorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub file_to_read: String,
    pub file_to_write: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_to_read: "tasks.json".to_owned(),
            file_to_write: "tasks.json".to_owned(),
        }
    }
}

/// Keyword tables the parser accepts for `list <status>` and `mark-<status>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActionsConfig {
    pub list: Vec<String>,
    pub mark: Vec<String>,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            list: ["all", "todo", "in-progress", "done"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            mark: ["mark-todo", "mark-in-progress", "mark-done"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub system_logs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MessagesConfig {
    pub empty_list: String,
    pub list_of_tasks: String,
    pub list_item: String,
    pub task_added: String,
    pub task_updated: String,
    pub task_deleted: String,
    pub task_marked: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            empty_list: "There are no tasks to show.".to_owned(),
            list_of_tasks: "Here's a list of your {} tasks:".to_owned(),
            list_item: "{} | {} : {}".to_owned(),
            task_added: "Task added successfully (ID: {})".to_owned(),
            task_updated: "Task {} updated successfully".to_owned(),
            task_deleted: "Task '{}' deleted successfully".to_owned(),
            task_marked: "Task '{}' marked as {}".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ErrorsConfig {
    pub incorrectly_specified: String,
    pub upd_no_id: String,
    pub del_no_id: String,
    pub mark_no_id: String,
    pub unknown_cmd: String,
    pub no_arguments: String,
}

impl Default for ErrorsConfig {
    fn default() -> Self {
        Self {
            incorrectly_specified: " action is not specified correctly".to_owned(),
            upd_no_id: "Can't update: there is no task with ID '{}'".to_owned(),
            del_no_id: "Can't delete: there is no task with ID '{}'".to_owned(),
            mark_no_id: "Can't mark: there is no task with ID '{}'".to_owned(),
            unknown_cmd: "Unknown command '{}'".to_owned(),
            no_arguments:
                "There are no arguments to parse! Try: list, add, update, delete, mark-in-progress, mark-done"
                    .to_owned(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.storage.file_to_read.trim().is_empty() {
            return Err(TrackerError::Config(
                "storage.file_to_read must not be empty".to_owned(),
            ));
        }
        if self.storage.file_to_write.trim().is_empty() {
            return Err(TrackerError::Config(
                "storage.file_to_write must not be empty".to_owned(),
            ));
        }
        if self.excerpt_len == 0 {
            return Err(TrackerError::Config(
                "excerpt_len must be >= 1".to_owned(),
            ));
        }
        for token in &self.actions.list {
            if token.parse::<StatusFilter>().is_err() {
                return Err(TrackerError::Config(format!(
                    "actions.list: '{token}' is not 'all' or a task status"
                )));
            }
        }
        for token in &self.actions.mark {
            if TaskStatus::from_mark_keyword(token).is_none() {
                return Err(TrackerError::Config(format!(
                    "actions.mark: '{token}' must look like mark-<status>"
                )));
            }
        }
        Ok(())
    }

    pub fn read_path(&self) -> anyhow::Result<PathBuf> {
        expand_path(&self.storage.file_to_read)
    }

    pub fn write_path(&self) -> anyhow::Result<PathBuf> {
        expand_path(&self.storage.file_to_write)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
}

/// `--config` wins, then `$TASK_CLI_CONFIG`, then the per-user location.
pub fn resolve_paths(explicit: Option<&Path>) -> anyhow::Result<ConfigPaths> {
    if let Some(p) = explicit {
        return Ok(ConfigPaths {
            config_file: p.to_path_buf(),
        });
    }
    if let Some(v) = std::env::var_os(CONFIG_ENV)
        && !v.is_empty()
    {
        return Ok(ConfigPaths {
            config_file: expand_path(&v.to_string_lossy())?,
        });
    }
    default_paths()
}

pub fn default_paths() -> anyhow::Result<ConfigPaths> {
    let unix = home_config_path_unix();
    if !cfg!(windows) {
        return Ok(ConfigPaths { config_file: unix });
    }

    // Windows: a ~/.config file still wins when present.
    if unix.exists() {
        return Ok(ConfigPaths { config_file: unix });
    }

    let proj = ProjectDirs::from("com", "task-cli", "task-cli")
        .context("failed to determine platform config directory")?;
    Ok(ConfigPaths {
        config_file: proj.config_dir().join("config.toml"),
    })
}

fn home_config_path_unix() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("task-cli").join("config.toml")
}

fn home_dir() -> Option<PathBuf> {
    if let Some(v) = std::env::var_os("HOME") {
        return Some(PathBuf::from(v));
    }
    if let Some(v) = std::env::var_os("USERPROFILE") {
        return Some(PathBuf::from(v));
    }
    let drive = std::env::var_os("HOMEDRIVE");
    let path = std::env::var_os("HOMEPATH");
    match (drive, path) {
        (Some(d), Some(p)) => Some(PathBuf::from(d).join(PathBuf::from(p))),
        _ => None,
    }
}

#[must_use]
pub fn expand_tilde(input: &str) -> String {
    if let Some(rest) = input.strip_prefix("~/")
        && let Some(home) = home_dir()
    {
        return home.join(rest).to_string_lossy().to_string();
    }
    input.to_owned()
}

pub fn expand_path(input: &str) -> anyhow::Result<PathBuf> {
    let expanded = expand_env_vars(&expand_tilde(input));
    let p = PathBuf::from(expanded);
    if p.is_absolute() {
        return Ok(p);
    }
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(cwd.join(p))
}

fn expand_env_vars(input: &str) -> String {
    // $VAR and ${VAR}; unknown vars stay as written.
    let Ok(re) = regex::Regex::new(r"\$\{?([A-Za-z_][A-Za-z0-9_]*)\}?") else {
        return input.to_owned();
    };
    re.replace_all(input, |caps: &regex::Captures<'_>| {
        let key = &caps[1];
        std::env::var(key).unwrap_or_else(|_| caps[0].to_owned())
    })
    .to_string()
}

pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Config, ConfigPaths)> {
    let paths = resolve_paths(explicit)?;
    let cfg = load_from_file(&paths.config_file)?;
    cfg.validate()?;
    Ok((cfg, paths))
}

pub fn load_from_file(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg: Config = toml::from_str(&raw)
        .with_context(|| format!("failed to deserialize TOML in {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn config_validation_catches_invalid_values() {
        let mut cfg = Config::default();
        cfg.excerpt_len = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.actions.list.push("blocked".to_owned());
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.actions.mark.push("done".to_owned());
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.storage.file_to_write = "  ".to_owned();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "exceprt_len = 5\n\n[logging]\nsystem_logs = true\n\n[messages]\nempty_list = \"nothing\"\n",
        )
        .unwrap();

        let cfg = load_from_file(&path).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.excerpt_len, 5);
        assert!(cfg.logging.system_logs);
        assert_eq!(cfg.messages.empty_list, "nothing");
        assert_eq!(cfg.messages.task_added, MessagesConfig::default().task_added);
        assert_eq!(cfg.storage, StorageConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn explicit_path_wins() {
        let p = PathBuf::from("/tmp/explicit.toml");
        let paths = resolve_paths(Some(&p)).unwrap();
        assert_eq!(paths.config_file, p);
    }

    #[test]
    fn absolute_paths_are_kept() {
        let p = if cfg!(windows) { r"C:\data\tasks.json" } else { "/data/tasks.json" };
        assert_eq!(expand_path(p).unwrap(), PathBuf::from(p));
    }

    #[test]
    fn tilde_expands_only_as_a_prefix() {
        if let Some(home) = home_dir() {
            assert_eq!(
                expand_tilde("~/tasks/tasks.json"),
                home.join("tasks/tasks.json").to_string_lossy()
            );
            assert_eq!(
                expand_path("~/tasks.json").unwrap(),
                home.join("tasks.json")
            );
        }
        assert_eq!(expand_tilde("~other/tasks.json"), "~other/tasks.json");
        assert_eq!(expand_tilde("data/~/tasks.json"), "data/~/tasks.json");
    }

    #[test]
    fn unknown_env_vars_are_left_alone() {
        assert_eq!(
            expand_env_vars("$TASK_CLI_SURELY_UNSET_VAR/tasks.json"),
            "$TASK_CLI_SURELY_UNSET_VAR/tasks.json"
        );
    }

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path("tasks.json").unwrap(), cwd.join("tasks.json"));
    }
}
