//! `inx list-templates`: show the template catalog.

use anyhow::Result;
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use inx_renderer::{Catalog, CategoryInfo};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the catalog as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "category")]
    name: String,
    #[tabled(rename = "description")]
    description: String,
    #[tabled(rename = "files")]
    files: String,
}

impl From<&CategoryInfo> for Row {
    fn from(info: &CategoryInfo) -> Self {
        Row {
            name: info.name.to_owned(),
            description: info.description.to_owned(),
            files: if info.files.is_empty() {
                "(from --template-dir)".to_owned()
            } else {
                info.files.join(", ")
            },
        }
    }
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let catalog = Catalog::describe();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
            return Ok(());
        }
        let rows: Vec<Row> = catalog.iter().map(Row::from).collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
        Ok(())
    }
}
