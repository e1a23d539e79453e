//! Step execution as child processes.
//!
//! Steps flagged with `params` run their command directly with the task's
//! positional arguments as separate process arguments. All other steps hand
//! their command text to the configured shell. Task arguments never reach
//! the shell.
//!
//! The two output streams are captured separately, so a step's output is
//! all of its stdout followed by all of its stderr, not the order in which
//! the process wrote them.

use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use steprun_core::Step;

/// A step that did not complete successfully.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{status}")]
    Exit { status: ExitStatus, output: String },
}

impl StepError {
    /// Output captured before the failure, empty if nothing ran.
    pub fn output(&self) -> &str {
        match self {
            Self::Spawn { .. } => "",
            Self::Exit { output, .. } => output,
        }
    }
}

/// Runs steps as child processes.
#[derive(Debug, Clone)]
pub struct Executor {
    shell: String,
}

impl Executor {
    /// Create an executor using `shell -c` for shell steps.
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Run one step in `work_dir` (the current directory if empty) and
    /// return its combined stdout and stderr.
    pub async fn run_step(
        &self,
        step: &Step,
        work_dir: &str,
        args: &[String],
    ) -> Result<String, StepError> {
        let mut command = if step.params {
            let mut c = Command::new(&step.cmd);
            c.args(args);
            c
        } else {
            let mut c = Command::new(&self.shell);
            c.args(["-c", step.cmd.as_str()]);
            c
        };

        if !work_dir.is_empty() {
            command.current_dir(work_dir);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(step = %step.name, cmd = %step.cmd, params = step.params, "Running step");

        let program = if step.params { &step.cmd } else { &self.shell };
        let out = command.output().await.map_err(|source| StepError::Spawn {
            program: program.clone(),
            source,
        })?;

        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));

        if out.status.success() {
            Ok(output)
        } else {
            Err(StepError::Exit {
                status: out.status,
                output,
            })
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new("sh")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_shell_step_captures_output() {
        let executor = Executor::default();
        let step = Step::shell("greet", "echo hello && echo oops >&2");

        let output = executor.run_step(&step, "", &[]).await.unwrap();
        assert_eq!(output, "hello\noops\n");
    }

    #[tokio::test]
    async fn test_stdout_precedes_stderr() {
        let step = Step::shell("mixed", "echo err1 >&2; echo out1; echo err2 >&2; echo out2");
        let output = Executor::default().run_step(&step, "", &[]).await.unwrap();
        assert_eq!(output, "out1\nout2\nerr1\nerr2\n");
    }

    #[tokio::test]
    async fn test_shell_step_runs_in_work_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "found").unwrap();
        let work_dir = dir.path().to_str().unwrap();

        let step = Step::shell("read", "cat marker.txt");
        let output = Executor::default()
            .run_step(&step, work_dir, &[])
            .await
            .unwrap();
        assert_eq!(output, "found");
    }

    #[tokio::test]
    async fn test_failing_step_keeps_output() {
        let step = Step::shell("test", "echo partial; exit 3");
        let err = Executor::default().run_step(&step, "", &[]).await.unwrap_err();

        match &err {
            StepError::Exit { status, output } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(output, "partial\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.output(), "partial\n");
    }

    #[tokio::test]
    async fn test_param_step_does_not_use_shell() {
        let step = Step::with_params("echo", "echo");
        let args = vec!["$HOME;".to_string(), "`id`".to_string()];

        let output = Executor::default().run_step(&step, "", &args).await.unwrap();
        assert_eq!(output, "$HOME; `id`\n");
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let step = Step::with_params("missing", "/nonexistent/steprun-binary");
        let err = Executor::default().run_step(&step, "", &[]).await.unwrap_err();

        assert!(matches!(err, StepError::Spawn { .. }));
        assert_eq!(err.output(), "");
    }
}
