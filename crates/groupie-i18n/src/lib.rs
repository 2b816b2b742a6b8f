//! Translation catalog and language negotiation.
//!
//! A [`Catalog`] holds every known language; [`Catalog::translator`] hands out
//! a [`Translator`] bound to one language. Nothing here is global: callers
//! build the catalog once at startup and pass the translator (or a closure
//! over it) to whatever needs localized text.
//!
//! ```
//! use groupie_i18n::Catalog;
//!
//! let catalog = Catalog::load(None).unwrap();
//! let lang = catalog.negotiate(None, Some("en-GB,en;q=0.9"), "fr");
//! let tr = catalog.translator(&lang);
//! assert_eq!(tr.translate("detail.members"), "Members");
//! assert_eq!(tr.translate("no.such.key"), "no.such.key");
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Language used when a key or language is missing.
pub const FALLBACK_LANG: &str = "fr";

/// Translations shipped with the binary.
const BUILTIN: &str = include_str!("../assets/translations.json");

type Strings = BTreeMap<String, String>;

/// Translation loading error.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    /// Translations file could not be read.
    #[error("cannot read translations {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Translations file is not a `{lang: {key: text}}` JSON object.
    #[error("invalid translations JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// All translations, keyed by language code.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    languages: BTreeMap<String, Strings>,
}

impl Catalog {
    /// Build the catalog from the bundled translations, then merge `extra`
    /// over it when given.
    ///
    /// # Errors
    ///
    /// Returns an error if `extra` cannot be read or parsed.
    pub fn load(extra: Option<&Path>) -> Result<Self, I18nError> {
        let mut catalog = Self::from_json(BUILTIN)?;
        if let Some(path) = extra {
            let content = std::fs::read_to_string(path).map_err(|source| I18nError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            catalog.merge(Self::from_json(&content)?);
        }
        tracing::info!(languages = catalog.languages.len(), "Translations loaded");
        Ok(catalog)
    }

    /// Parse a `{lang: {key: text}}` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not have that shape.
    pub fn from_json(json: &str) -> Result<Self, I18nError> {
        let languages: BTreeMap<String, Strings> = serde_json::from_str(json)?;
        Ok(Self { languages })
    }

    /// Merge `other` into this catalog; its keys win.
    pub fn merge(&mut self, other: Self) {
        for (lang, strings) in other.languages {
            self.languages.entry(lang).or_default().extend(strings);
        }
    }

    /// Whether translations exist for `lang`.
    #[must_use]
    pub fn is_available(&self, lang: &str) -> bool {
        self.languages.contains_key(lang)
    }

    /// Known language codes, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Pick the display language.
    ///
    /// Priority: an explicitly requested language, then the primary tag of
    /// the first `Accept-Language` entry, then `default`. Candidates without
    /// translations are skipped.
    #[must_use]
    pub fn negotiate(
        &self,
        explicit: Option<&str>,
        accept_language: Option<&str>,
        default: &str,
    ) -> String {
        if let Some(lang) = explicit.filter(|l| self.is_available(l)) {
            return lang.to_owned();
        }
        if let Some(lang) = accept_language
            .and_then(parse_accept_language)
            .filter(|l| self.is_available(l))
        {
            return lang;
        }
        default.to_owned()
    }

    /// Ready-to-use handle for `lang`.
    #[must_use]
    pub fn translator(&self, lang: &str) -> Translator {
        Translator {
            lang: lang.to_owned(),
            strings: self.languages.get(lang).cloned(),
            fallback: self
                .languages
                .get(FALLBACK_LANG)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

/// Extract the primary language subtag of the first `Accept-Language` entry.
///
/// `"en-US,en;q=0.9"` yields `"en"`. Returns `None` for an empty header.
#[must_use]
pub fn parse_accept_language(header: &str) -> Option<String> {
    let first = header.split(',').next()?.trim();
    let tag = first.split(';').next().unwrap_or(first).trim();
    let primary = tag.split('-').next().unwrap_or(tag).trim();
    if primary.is_empty() {
        None
    } else {
        Some(primary.to_lowercase())
    }
}

/// Translations for one language.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: String,
    strings: Option<Strings>,
    fallback: Strings,
}

impl Translator {
    /// Current language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.lang
    }

    /// Look up `key` in the current language, then the fallback language.
    /// Unknown keys come back unchanged.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        self.strings
            .as_ref()
            .and_then(|s| s.get(key))
            .or_else(|| self.fallback.get(key))
            .map_or_else(|| key.to_owned(), Clone::clone)
    }

    /// Every string of the current language, or of the fallback language
    /// when the current one has no translations.
    #[must_use]
    pub fn all(&self) -> &BTreeMap<String, String> {
        self.strings.as_ref().unwrap_or(&self.fallback)
    }
}
