#![forbid(unsafe_code)]

pub mod executor;
pub mod parser;
pub mod template;

use std::io::Write;

use crate::config::Config;
use crate::error::Result;
use crate::logger::Logger;
use crate::task::model::{StatusFilter, TaskStatus};
use crate::task::storage::TaskStore;

pub use executor::Executor;
pub use parser::ActionBuilder;

/// A parsed and validated command, ready to execute.
///
/// Task references are carried as ids and resolved to a position only when
/// the action runs, so earlier actions in the same batch cannot shift them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List(StatusFilter),
    Add(String),
    Update { id: String, description: String },
    Delete { id: String },
    Mark { id: String, status: TaskStatus },
}

impl Action {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Add(_) => "add",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Mark { .. } => "mark",
        }
    }
}

/// Parses `args` (program name first) and executes every resulting action.
///
/// Any parse failure aborts the whole invocation before the first action
/// runs. Execution stops at the first failing action.
pub fn run<W: Write>(
    config: &Config,
    store: &TaskStore,
    logger: &mut Logger<W>,
    args: &[String],
) -> Result<()> {
    let actions = ActionBuilder::new(config, store).parse(args)?;
    logger.system("finished parsing")?;
    Executor::new(config, store, logger).execute(&actions)?;
    logger.system("finished executing")?;
    Ok(())
}
