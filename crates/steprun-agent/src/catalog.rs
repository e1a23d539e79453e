//! Task catalog: maps a task's params onto a configured definition.

use std::collections::HashMap;

use thiserror::Error;

use steprun_core::{Step, TaskDefinition};

/// Why a task cannot be run. Reported as the task's failure detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid task params, params can't be empty")]
    EmptyParams,

    #[error("invalid task name {name}, must be one of [{known}]")]
    UnknownTask { name: String, known: String },

    #[error("invalid task progress")]
    InvalidProgress,
}

/// What to run for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan<'a> {
    pub definition: &'a TaskDefinition,
    /// Positional arguments following the task name.
    pub args: Vec<String>,
    /// Index of the first step to run.
    pub start: usize,
}

impl<'a> Plan<'a> {
    /// Steps still to run, with their indexes.
    pub fn remaining(&self) -> impl Iterator<Item = (usize, &'a Step)> {
        self.definition.steps.iter().enumerate().skip(self.start)
    }
}

/// Task definitions indexed by name.
#[derive(Debug, Clone)]
pub struct Catalog {
    definitions: Vec<TaskDefinition>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(definitions: Vec<TaskDefinition>) -> Self {
        let index = definitions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        Self { definitions, index }
    }

    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// Definition names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    /// Resolve raw params and a stored checkpoint into a plan.
    ///
    /// The first whitespace-separated token names the definition; the rest
    /// are positional arguments. `progress` may equal the step count, in
    /// which case nothing is left to run.
    pub fn resolve(&self, params: &str, progress: i32) -> Result<Plan<'_>, ResolveError> {
        let mut tokens = params.split_whitespace();
        let name = tokens.next().ok_or(ResolveError::EmptyParams)?;

        let definition = self.get(name).ok_or_else(|| ResolveError::UnknownTask {
            name: name.to_string(),
            known: self.names().collect::<Vec<_>>().join(" "),
        })?;

        let start = usize::try_from(progress).map_err(|_| ResolveError::InvalidProgress)?;
        if start > definition.step_count() {
            return Err(ResolveError::InvalidProgress);
        }

        Ok(Plan {
            definition,
            args: tokens.map(str::to_string).collect(),
            start,
        })
    }
}
