//! `inx install <CONFIG>`: build, then copy into Inkscape's extensions directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use inx_build::pipeline;

use super::{load_config, print_report, OutputArgs};

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// YAML / JSON configuration, or a directory containing `extension.json`.
    pub config: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Extensions directory (default: $INX_EXTENSIONS_DIR, then the platform location).
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,
}

impl InstallArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config(&self.config, &self.output)?;
        let options = self.output.options();
        let report = pipeline::install(&config, &options, self.install_dir.as_deref())
            .context("build failed")?;
        print_report(&report.build, options.dry_run);

        match report.install {
            Ok(installed) => {
                let prefix = if options.dry_run { "[dry-run] " } else { "" };
                println!(
                    "{prefix}{} installed into {} ({} file(s))",
                    "✓".green(),
                    installed.dir.display(),
                    installed.files.len()
                );
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("install failed")),
        }
    }
}
