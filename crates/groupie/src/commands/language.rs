//! Display language selection shared by all commands.

use clap::Args;
use groupie_config::Config;
use groupie_i18n::{Catalog, Translator};

use crate::error::CliError;
use crate::output::Output;

/// Language options.
#[derive(Args)]
pub(crate) struct LanguageArgs {
    /// Display language (overrides config).
    #[arg(long, env = "GROUPIE_LANG")]
    pub lang: Option<String>,

    /// Preferred languages in `Accept-Language` form, used when `--lang` is
    /// not given or not available.
    #[arg(long)]
    pub accept_language: Option<String>,
}

impl LanguageArgs {
    /// Load the catalog named by `config` and pick the display language.
    pub(crate) fn translator(&self, config: &Config, output: &Output) -> Result<Translator, CliError> {
        let catalog = Catalog::load(config.i18n_resolved.translations.as_deref())?;

        if let Some(lang) = self.lang.as_deref().filter(|l| !catalog.is_available(l)) {
            let available: Vec<&str> = catalog.languages().collect();
            output.warning(&format!(
                "No translations for '{lang}' (available: {}), falling back",
                available.join(", ")
            ));
        }

        let lang = catalog.negotiate(
            self.lang.as_deref(),
            self.accept_language.as_deref(),
            &config.i18n_resolved.default_lang,
        );
        tracing::debug!(lang = %lang, "Language selected");
        Ok(catalog.translator(&lang))
    }
}
