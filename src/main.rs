#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    task_tracker::cli::main()
}
