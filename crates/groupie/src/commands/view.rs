//! Options and pipeline shared by every command that prints a detail view.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use groupie_config::{CliSettings, Config};
use groupie_detail::{DetailView, Entity, Unresolved, escape_html, render};
use groupie_i18n::Translator;
use groupie_links::{HttpFetcher, LinkFetcher, LinkResolver, attach_channel};

use super::language::LanguageArgs;
use crate::error::CliError;
use crate::output::Output;

/// Options common to `show` and `render`.
#[derive(Args)]
pub(crate) struct ViewArgs {
    /// Path to configuration file (default: auto-discover groupie.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    language: LanguageArgs,

    /// API base URL (overrides config).
    #[arg(long, env = "GROUPIE_API_URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Leave linked resources unresolved.
    #[arg(long)]
    no_resolve: bool,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output (show link resolution logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ViewArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            api_url: self.api_url.clone(),
            lang: self.language.lang.clone(),
            timeout_secs: self.timeout,
            resolve_links: self.no_resolve.then_some(false),
        }
    }

    /// Load configuration and translations.
    pub(crate) fn open(&self, output: &Output) -> Result<Session, CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        let translator = self.language.translator(&config, output)?;

        let fetcher: Arc<dyn LinkFetcher> = Arc::new(HttpFetcher::new(config.resolver.timeout()));
        Ok(Session {
            translator,
            fetcher,
            resolve_links: config.resolver.enabled,
            destination: self.output.clone(),
            config,
        })
    }
}

/// Everything needed to turn an entity into printed HTML.
pub(crate) struct Session {
    pub config: Config,
    pub translator: Translator,
    pub fetcher: Arc<dyn LinkFetcher>,
    resolve_links: bool,
    destination: Option<PathBuf>,
}

impl Session {
    /// Localized message for a failed artist load.
    pub(crate) fn load_error(&self, detail: impl std::fmt::Display) -> CliError {
        CliError::Load {
            message: self.translator.translate("error.load_details"),
            detail: detail.to_string(),
        }
    }

    /// Render `entity`, resolve its links and produce the final document.
    pub(crate) async fn build(&self, entity: &Entity) -> String {
        let tr = &self.translator;
        let view = render(entity, &|key: &str| tr.translate(key));

        let body = if self.resolve_links && !view.links.is_empty() {
            let resolver = LinkResolver::new(Arc::clone(&self.fetcher));
            let (handle, signal) = attach_channel();
            let mut board = resolver.resolve_all(&view.links, signal);
            // The view is complete once rendered; nothing else has to appear first.
            handle.attach();
            board.wait_settled().await;
            tracing::info!(
                settled = board.settled_count(),
                total = board.len(),
                "Links resolved"
            );
            view.to_html(&board)
        } else {
            view.to_html(&Unresolved)
        };

        document(&view, &body)
    }

    /// Print or write the document.
    pub(crate) fn emit(&self, document: &str, output: &Output) -> Result<(), CliError> {
        match &self.destination {
            Some(path) => {
                write_document(path, document)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => output.document(document)?,
        }
        Ok(())
    }

    /// Render, resolve and emit in one go.
    pub(crate) async fn present(&self, entity: &Entity, output: &Output) -> Result<(), CliError> {
        let document = self.build(entity).await;
        self.emit(&document, output)
    }
}

fn document(view: &DetailView, body: &str) -> String {
    format!("<h2>{}</h2>\n{body}\n", escape_html(&view.title))
}

fn write_document(path: &Path, document: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, document)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use groupie_i18n::Catalog;
    use groupie_links::MockFetcher;
    use pretty_assertions::assert_eq;

    /// Session with built-in translations and the given fetcher.
    pub(crate) fn session(lang: &str, fetcher: MockFetcher, resolve_links: bool) -> Session {
        let catalog = Catalog::load(None).unwrap();
        Session {
            config: Config::default(),
            translator: catalog.translator(lang),
            fetcher: Arc::new(fetcher),
            resolve_links,
            destination: None,
        }
    }

    fn args() -> ViewArgs {
        ViewArgs {
            config: None,
            language: LanguageArgs {
                lang: None,
                accept_language: None,
            },
            api_url: None,
            timeout: None,
            no_resolve: false,
            output: None,
            verbose: false,
        }
    }

    #[test]
    fn test_cli_settings_mapping() {
        let settings = ViewArgs {
            language: LanguageArgs {
                lang: Some("en".to_owned()),
                accept_language: None,
            },
            timeout: Some(3),
            no_resolve: true,
            ..args()
        }
        .cli_settings();

        assert_eq!(settings.lang.as_deref(), Some("en"));
        assert_eq!(settings.timeout_secs, Some(3));
        assert_eq!(settings.resolve_links, Some(false));
        assert_eq!(settings.api_url, None);
    }

    #[test]
    fn test_resolve_flag_absent_leaves_config() {
        assert_eq!(args().cli_settings().resolve_links, None);
    }

    #[tokio::test]
    async fn test_build_resolves_links() {
        let fetcher = MockFetcher::new().with_json(
            "http://api.test/api/relation/1",
            r#"{"id": 1, "datesLocations": {"paris-france": ["01-01-2020"]}}"#,
        );
        let session = session("en", fetcher, true);
        let entity = Entity::from_json(
            r#"{"id": 1, "name": "Queen", "relations": "http://api.test/api/relation/1"}"#,
        )
        .unwrap();

        let html = session.build(&entity).await;

        assert!(html.starts_with("<h2>Queen</h2>\n"));
        assert!(html.contains(r#"<div data-url="http://api.test/api/relation/1"><pre>{"#));
        assert!(!html.contains("Loading"));
    }

    #[tokio::test]
    async fn test_build_without_resolution_keeps_loading_label() {
        let fetcher = MockFetcher::new();
        let session = session("fr", fetcher, false);
        let entity =
            Entity::from_json(r#"{"name": "Queen", "relations": "http://api.test/r/1"}"#).unwrap();

        let html = session.build(&entity).await;

        assert!(html.contains(r#"<div data-url="http://api.test/r/1">Chargement…</div>"#));
    }

    #[tokio::test]
    async fn test_build_escapes_title() {
        let session = session("en", MockFetcher::new(), true);
        let entity = Entity::from_json(r#"{"name": "AC<DC"}"#).unwrap();

        let html = session.build(&entity).await;

        assert!(html.starts_with("<h2>AC&lt;DC</h2>\n"));
    }

    #[test]
    fn test_load_error_is_localized() {
        let session = session("fr", MockFetcher::new(), true);
        let err = session.load_error("HTTP status 404");
        assert_eq!(
            err.to_string(),
            "Erreur lors du chargement des détails: HTTP status 404"
        );
    }

    #[test]
    fn test_write_document_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/queen.html");

        write_document(&path, "<h2>Queen</h2>\n").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "<h2>Queen</h2>\n");
    }
}
