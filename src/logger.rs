#![forbid(unsafe_code)]

use std::io::{self, Write};

const SYSTEM_PREFIX: &str = "+ SYSTEM: ";

/// Sink for user-visible output. User lines are always written; system lines
/// only when enabled at construction.
#[derive(Debug)]
pub struct Logger<W: Write = io::Stdout> {
    system_logs: bool,
    out: W,
}

impl Logger<io::Stdout> {
    #[must_use]
    pub fn stdout(system_logs: bool) -> Self {
        Self::new(system_logs, io::stdout())
    }
}

impl<W: Write> Logger<W> {
    pub fn new(system_logs: bool, out: W) -> Self {
        Self { system_logs, out }
    }

    #[must_use]
    pub fn system_logs(&self) -> bool {
        self.system_logs
    }

    pub fn write(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "{msg}")
    }

    pub fn system(&mut self, msg: &str) -> io::Result<()> {
        tracing::debug!(target: "task_tracker::system", "{msg}");
        if !self.system_logs {
            return Ok(());
        }
        writeln!(self.out, "{SYSTEM_PREFIX}{msg}")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
