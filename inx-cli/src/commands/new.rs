//! `inx new`: interactive scaffolding.

use anyhow::{Context, Result};
use clap::Args;

use inx_build::pipeline;
use inx_core::prompt;

use super::{print_report, OutputArgs};
use crate::interactive::DialoguerPrompter;

#[derive(Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

impl NewArgs {
    pub fn run(self) -> Result<()> {
        let category = self.output.category()?;
        let config = prompt::from_answers(&mut DialoguerPrompter::default(), category)?;

        let options = self.output.options();
        let report = pipeline::build(&config, &options).context("build failed")?;
        print_report(&report, options.dry_run);
        Ok(())
    }
}
