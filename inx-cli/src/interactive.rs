//! Terminal prompts for `inx new`.
//!
//! Uses dialoguer; the question flow itself lives in `inx_core::prompt`.

use dialoguer::{Confirm, Input, Select};

use inx_core::prompt::Prompter;
use inx_core::ConfigError;

#[derive(Debug, Default)]
pub struct DialoguerPrompter;

fn prompt_err(e: dialoguer::Error) -> ConfigError {
    ConfigError::Prompt {
        message: e.to_string(),
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&mut self, prompt: &str, default: Option<&str>) -> Result<String, ConfigError> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        match default {
            Some("") => input = input.allow_empty(true),
            Some(default) => input = input.default(default.to_owned()),
            None => {}
        }
        let answer = input.interact_text().map_err(prompt_err)?;
        Ok(answer.trim().to_owned())
    }

    fn select(
        &mut self,
        prompt: &str,
        items: &[&str],
        default: usize,
    ) -> Result<usize, ConfigError> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .map_err(prompt_err)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, ConfigError> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_err)
    }
}
