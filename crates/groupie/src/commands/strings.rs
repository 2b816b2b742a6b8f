//! `groupie strings` command implementation.

use std::path::PathBuf;

use clap::Args;
use groupie_config::{CliSettings, Config};
use groupie_i18n::Translator;

use super::language::LanguageArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the strings command.
#[derive(Args)]
pub(crate) struct StringsArgs {
    /// Path to configuration file (default: auto-discover groupie.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    language: LanguageArgs,
}

impl StringsArgs {
    /// Print every UI string of the selected language as a JSON object.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let cli_settings = CliSettings {
            lang: self.language.lang.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let translator = self.language.translator(&config, &output)?;

        output.note(&format!("Language: {}", translator.language()));
        output.document(&strings_json(&translator)?)?;
        Ok(())
    }
}

fn strings_json(translator: &Translator) -> Result<String, CliError> {
    let mut json = serde_json::to_string_pretty(translator.all())?;
    json.push('\n');
    Ok(json)
}
