//! CLI entrypoint for the Vista plugin tooling.
//!
//! The binary delegates to [`vista_cli::run`], which loads configuration,
//! installs telemetry, discovers plugins, and reports on them.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    vista_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
