//! Subcommand implementations and the flags they share.

pub mod build;
pub mod install;
pub mod list;
pub mod new;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use inx_build::{ArchiveMode, BuildOptions, BuildReport, WriteResult};
use inx_core::{config, Category, ExtensionConfig};

/// Output flags shared by `new`, `build`, and `install`.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Directory the extension is written to.
    #[arg(short, long, env = "INX_OUTPUT_DIR", default_value = "output")]
    pub output: PathBuf,

    /// Also package the files as `<name>-<version>.zip`.
    #[arg(long, conflicts_with = "archive_only")]
    pub archive: bool,

    /// Write only the archive, no loose files.
    #[arg(long)]
    pub archive_only: bool,

    /// Template category (basic_effect, input_output, render, custom); overrides `type`.
    #[arg(short, long, value_name = "CATEGORY")]
    pub template: Option<String>,

    /// Template directory for the custom category; overrides `template_dir`.
    #[arg(long, env = "INX_TEMPLATE_DIR", value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Show what would be written without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// Also write `extension.json` so the output can be rebuilt with `inx build <DIR>`.
    #[arg(long)]
    pub save_config: bool,
}

impl OutputArgs {
    /// `--template`, parsed. Unknown names fail like an unknown `type`.
    pub fn category(&self) -> Result<Option<Category>> {
        self.template
            .as_deref()
            .map(|t| t.parse::<Category>().map_err(config_err))
            .transpose()
    }

    pub fn options(&self) -> BuildOptions {
        let archive = if self.archive_only {
            ArchiveMode::Only
        } else if self.archive {
            ArchiveMode::Alongside
        } else {
            ArchiveMode::None
        };
        BuildOptions {
            output_dir: self.output.clone(),
            archive,
            dry_run: self.dry_run,
            save_config: self.save_config,
            template_dir: self.template_dir.clone(),
        }
    }
}

fn config_err(e: inx_core::UnknownCategory) -> anyhow::Error {
    anyhow::Error::new(inx_core::ConfigError::from(e))
}

/// Load a configuration file (or snapshot directory) and apply `--template`.
pub fn load_config(path: &Path, output: &OutputArgs) -> Result<ExtensionConfig> {
    let category = output.category()?;
    if let Some(category) = category {
        tracing::debug!("template category overridden: {category}");
    }
    config::load_as(path, category)
        .with_context(|| format!("failed to load configuration '{}'", path.display()))
}

pub fn print_report(report: &BuildReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let all: Vec<&WriteResult> = report
        .writes
        .iter()
        .chain(report.archive.iter())
        .chain(report.snapshot.iter())
        .collect();
    let written = all
        .iter()
        .filter(|r| matches!(r, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }))
        .count();
    let unchanged = all.len() - written;

    println!(
        "{prefix}{} '{}' built in {} ({} written, {} unchanged)",
        "✓".green(),
        report.extension,
        report.output_dir.display(),
        written,
        unchanged
    );
    for r in all {
        match r {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }
}
