//! CLI error types.

use groupie_config::ConfigError;
use groupie_detail::DetailError;
use groupie_i18n::I18nError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    I18n(#[from] I18nError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Entity(#[from] DetailError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Artist could not be loaded; carries the localized message.
    #[error("{message}: {detail}")]
    Load { message: String, detail: String },
}
