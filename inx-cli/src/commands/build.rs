//! `inx build <CONFIG>`: non-interactive generation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use inx_build::pipeline;

use super::{load_config, print_report, OutputArgs};

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// YAML / JSON configuration, or a directory containing `extension.json`.
    pub config: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl BuildArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config(&self.config, &self.output)?;
        let options = self.output.options();
        let report = pipeline::build(&config, &options).context("build failed")?;
        print_report(&report, options.dry_run);
        Ok(())
    }
}
