//! Agent configuration.
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! url = "http://127.0.0.1:8080"
//! worker_id = 1
//! worker_key = "..."
//!
//! [[tasks]]
//! name = "build"
//! work_dir = "/srv/app"
//!
//! [[tasks.steps]]
//! name = "compile"
//! cmd = "make"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use steprun_core::{TaskDefinition, WorkerId};

/// Errors loading the agent configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Agent configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Coordinator base URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Worker identity this agent acts for.
    pub worker_id: WorkerId,

    /// Secret key issued when the worker was added.
    pub worker_key: String,

    /// Delay between polls (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Shell used for steps without positional parameters.
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Task catalog, in declaration order.
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

fn default_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_shell() -> String {
    "sh".to_string()
}

impl AgentConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check the task catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tasks.is_empty() {
            return Err(ConfigError::Invalid("can't find tasks in config".to_string()));
        }

        let mut names = HashSet::new();
        for (i, task) in self.tasks.iter().enumerate() {
            if task.name.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "task at index {i}: name can't be empty"
                )));
            }
            if !names.insert(task.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "task at index {i}: duplicate task name {}",
                    task.name
                )));
            }
            if task.steps.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "task {}: steps can't be empty",
                    task.name
                )));
            }
            for (j, step) in task.steps.iter().enumerate() {
                if step.name.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "task {} step at index {j}: name can't be empty",
                        task.name
                    )));
                }
                if step.cmd.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "task {} step at index {j}: cmd can't be empty",
                        task.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl std::str::FromStr for AgentConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: AgentConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        worker_id = 3
        worker_key = "secret"

        [[tasks]]
        name = "build"
        work_dir = "/tmp"

        [[tasks.steps]]
        name = "compile"
        cmd = "make"

        [[tasks.steps]]
        name = "test"
        cmd = "./run-tests"
        params = true

        [[tasks]]
        name = "deploy"

        [[tasks.steps]]
        name = "ship"
        cmd = "echo shipped"
    "#;

    #[test]
    fn test_parse_with_defaults() {
        let config: AgentConfig = SAMPLE.parse().unwrap();

        assert_eq!(config.url, "http://127.0.0.1:8080");
        assert_eq!(config.worker_id, WorkerId::new(3));
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.shell, "sh");
        assert_eq!(config.tasks.len(), 2);
        assert_eq!(config.tasks[0].work_dir, "/tmp");
        assert!(config.tasks[0].steps[1].params);
        assert!(!config.tasks[0].steps[0].params);
        assert_eq!(config.tasks[1].work_dir, "");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("agent.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = AgentConfig::load(&path).unwrap();
        assert_eq!(config.worker_key, "secret");

        let missing = AgentConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let err = "worker_id = 1\nworker_key = \"k\"\n"
            .parse::<AgentConfig>()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let toml = r#"
            worker_id = 1
            worker_key = "k"
            [[tasks]]
            name = "build"
            [[tasks.steps]]
            name = "a"
            cmd = "true"
            [[tasks]]
            name = "build"
            [[tasks.steps]]
            name = "b"
            cmd = "true"
        "#;
        let err = toml.parse::<AgentConfig>().unwrap_err();
        assert!(err.to_string().contains("duplicate task name build"));
    }

    #[test]
    fn test_rejects_empty_step_fields() {
        let toml = r#"
            worker_id = 1
            worker_key = "k"
            [[tasks]]
            name = "build"
            [[tasks.steps]]
            name = "compile"
            cmd = ""
        "#;
        let err = toml.parse::<AgentConfig>().unwrap_err();
        assert!(err.to_string().contains("cmd can't be empty"));

        let toml = r#"
            worker_id = 1
            worker_key = "k"
            [[tasks]]
            name = "build"
            steps = []
        "#;
        let err = toml.parse::<AgentConfig>().unwrap_err();
        assert!(err.to_string().contains("steps can't be empty"));
    }

    #[test]
    fn test_parse_error() {
        let err = "worker_id = \"not a number\"".parse::<AgentConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
