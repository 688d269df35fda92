#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::action;
use crate::config;
use crate::error::TrackerError;
use crate::logger::Logger;
use crate::task::storage::TaskStore;

const BIN_NAME: &str = "task-cli";
const EXIT_INVALID: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "task-cli",
    version,
    about = "Track short tasks in a local JSON file",
    after_help = "Commands:\n  list [todo|in-progress|done]\n  add \"<description>\"\n  update <id> \"<new description>\"\n  delete <id>\n  mark-in-progress <id>\n  mark-done <id>"
)]
pub struct Cli {
    /// Config file (defaults to $TASK_CLI_CONFIG, then ~/.config/task-cli/config.toml)
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Raw command words; interpreted by the action parser, not clap.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let (cfg, paths) = config::load(cli.config.as_deref())?;
    tracing::debug!(config = %paths.config_file.display(), "config resolved");

    let store = TaskStore::new(cfg.read_path()?, cfg.write_path()?);
    let mut logger = Logger::stdout(cfg.logging.system_logs);

    let argv = program_argv(cli.args);
    match action::run(&cfg, &store, &mut logger, &argv) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is_recoverable() => Ok(report(&err)),
        Err(err) => Err(err.into()),
    }
}

/// Validation failures print one line. An empty invocation is a no-op.
fn report(err: &TrackerError) -> ExitCode {
    eprintln!("{err}");
    ExitCode::from(exit_status(err))
}

fn exit_status(err: &TrackerError) -> u8 {
    match err {
        TrackerError::NoArguments(_) => 0,
        _ => EXIT_INVALID,
    }
}

fn program_argv(args: Vec<String>) -> Vec<String> {
    let prog = std::env::args().next().unwrap_or_else(|| BIN_NAME.to_owned());
    std::iter::once(prog).chain(args).collect()
}
