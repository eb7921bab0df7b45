//! Command-line runtime for inspecting Vista renderer plugins.
//!
//! The runtime splits configuration flags from the command, loads
//! configuration, installs telemetry, discovers plugins under the configured
//! roots, and writes a report to the supplied output stream. Configuration
//! loading and IO streams can be substituted in tests.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use vista_config::Config;
use vista_plugins::PluginRegistry;

mod cli;
mod config;
mod errors;
mod output;
pub mod telemetry;

use cli::{Cli, CliCommand};
use config::split_config_arguments;
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader, true)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
    install_telemetry: bool,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    match execute(&args, stdout, loader, install_telemetry) {
        Ok(exit_code) => exit_code,
        Err(AppError::CliUsage(error)) if !error.use_stderr() => {
            let _ = write!(stdout, "{error}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W, L>(
    args: &[OsString],
    stdout: &mut W,
    loader: &L,
    install_telemetry: bool,
) -> Result<ExitCode, AppError>
where
    W: Write,
    L: ConfigLoader,
{
    let split = split_config_arguments(args);
    let cli = Cli::try_parse_from(&split.command_arguments).map_err(AppError::CliUsage)?;
    let config = loader.load(&split.config_arguments)?;
    if install_telemetry {
        telemetry::initialise(&config)?;
    }
    run_command(&cli.command, &config, stdout)
}

fn run_command<W: Write>(
    command: &CliCommand,
    config: &Config,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    let roots = config.plugin_roots();
    debug!(roots = ?roots, "discovering plugins");
    let (registry, report) = PluginRegistry::discovered(&roots);

    match command {
        CliCommand::List => {
            output::write_list(&registry, stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Show { name } => {
            let plugin = registry.require(name)?;
            output::write_show(plugin, config.url_prefix(), stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Check => {
            let clean = output::write_check(&report, stdout)?;
            Ok(if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
