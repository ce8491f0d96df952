//! inx: scaffold Inkscape extensions from templates.
//!
//! # Usage
//!
//! ```text
//! inx new [--template CAT] [--output DIR] [--archive|--archive-only] [--dry-run] [--save-config]
//! inx build <CONFIG> [--output DIR] [--template CAT] [--template-dir DIR] ...
//! inx install <CONFIG> [--install-dir DIR] ...
//! inx list-templates [--json]
//! ```
//!
//! Exit codes: 0 success, 1 configuration / template / render / usage error,
//! 2 write or install failure.

mod commands;
mod interactive;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{build::BuildArgs, install::InstallArgs, list::ListArgs, new::NewArgs};
use inx_build::{BuildError, InstallError, WriteError};
use inx_core::ConfigError;
use inx_renderer::{RenderError, TemplateError};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "inx",
    version,
    about = "Scaffold Inkscape extensions from templates",
    long_about = None,
)]
struct Cli {
    /// Debug logging on stderr (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a few questions and generate a new extension.
    New(NewArgs),

    /// Generate an extension from a YAML / JSON configuration file.
    Build(BuildArgs),

    /// Generate an extension and copy it into Inkscape's extensions directory.
    Install(InstallArgs),

    /// List the available template categories.
    ListTemplates(ListArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::New(args) => args.run(),
        Commands::Build(args) => args.run(),
        Commands::Install(args) => args.run(),
        Commands::ListTemplates(args) => args.run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 2 for write and install failures, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(build) = cause.downcast_ref::<BuildError>() {
            return match build {
                BuildError::Write(_) => 2,
                BuildError::Config(_) | BuildError::Template(_) | BuildError::Render(_) => 1,
            };
        }
        if cause.is::<WriteError>() || cause.is::<InstallError>() {
            return 2;
        }
        if cause.is::<ConfigError>() || cause.is::<TemplateError>() || cause.is::<RenderError>() {
            return 1;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn write_failures_exit_with_two() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: anyhow::Result<()> = Err(BuildError::Write(WriteError::Io {
            path: PathBuf::from("out/x.py"),
            source: io,
        }))
        .context("build failed");
        assert_eq!(exit_code(&err.unwrap_err()), 2);

        let err = anyhow::Error::new(InstallError::NotResolved).context("install failed");
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn validation_failures_exit_with_one() {
        let err = anyhow::Error::new(ConfigError::MissingField { field: "name".into() })
            .context("failed to load config");
        assert_eq!(exit_code(&err), 1);

        let err = anyhow::Error::new(BuildError::Template(TemplateError::CustomDirRequired));
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
