//! Task definitions known to an agent.

use serde::{Deserialize, Serialize};

/// A named, ordered sequence of steps an agent knows how to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Name matched against the first token of a task's params.
    pub name: String,

    /// Directory every step's child process starts in.
    #[serde(default)]
    pub work_dir: String,

    /// Steps in execution order, 0-indexed.
    pub steps: Vec<Step>,
}

impl TaskDefinition {
    /// Number of steps in this definition.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// One step of a task definition, mapped to exactly one child process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Step name used in progress details.
    pub name: String,

    /// Command text. Run through the shell unless `params` is set, in which
    /// case it names the program to execute directly.
    pub cmd: String,

    /// Pass the task's positional arguments as separate process arguments.
    #[serde(default)]
    pub params: bool,
}

impl Step {
    /// Create a step run through the shell.
    pub fn shell(name: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cmd: cmd.into(),
            params: false,
        }
    }

    /// Create a step invoked directly with the task's positional arguments.
    pub fn with_params(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cmd: program.into(),
            params: true,
        }
    }
}
