//! Configuration loading
//!
//! Settings live in an optional TOML file; command-line flags override them.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone used as local time for day boundaries
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub timeline: TimelineSettings,

    #[serde(default)]
    pub task_statuses: TaskStatuses,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            timeline: TimelineSettings::default(),
            task_statuses: TaskStatuses::default(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSettings {
    /// When false, completed and abandoned tasks are left out
    #[serde(default = "default_show_completed")]
    pub show_completed_tasks: bool,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            show_completed_tasks: default_show_completed(),
        }
    }
}

fn default_show_completed() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatuses {
    /// Pipe-separated status markers, e.g. `-|_|>`
    #[serde(default = "default_abandoned")]
    pub abandoned: String,
}

impl Default for TaskStatuses {
    fn default() -> Self {
        Self {
            abandoned: default_abandoned(),
        }
    }
}

fn default_abandoned() -> String {
    "-".to_string()
}

impl TaskStatuses {
    pub fn abandoned_markers(&self) -> Vec<&str> {
        self.abandoned.split('|').filter(|m| !m.is_empty()).collect()
    }
}

impl Config {
    /// Load from file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| Error::ReadFile {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| Error::InvalidTimezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timezone, "UTC");
        assert!(config.timeline.show_completed_tasks);
        assert_eq!(config.task_statuses.abandoned_markers(), vec!["-"]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            timezone = "Europe/Moscow"

            [timeline]
            show_completed_tasks = false
            "#,
        )
        .unwrap();
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::Moscow);
        assert!(!config.timeline.show_completed_tasks);
        assert_eq!(config.task_statuses.abandoned, "-");
    }

    #[test]
    fn test_abandoned_markers_skip_empty() {
        let statuses = TaskStatuses {
            abandoned: "-||_|>".to_string(),
        };
        assert_eq!(statuses.abandoned_markers(), vec!["-", "_", ">"]);
        let none = TaskStatuses {
            abandoned: String::new(),
        };
        assert!(none.abandoned_markers().is_empty());
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(Error::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml_str("timeline = ["),
            Err(Error::TomlParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(Error::ReadFile { .. })));
    }
}
