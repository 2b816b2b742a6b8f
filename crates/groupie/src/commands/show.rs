//! `groupie show` command implementation.

use std::sync::Arc;

use clap::Args;
use groupie_detail::Entity;

use super::view::{Session, ViewArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Artist identifier.
    id: String,

    #[command(flatten)]
    pub view: ViewArgs,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the artist cannot be loaded.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.view.open(&output)?;

        let url = session.config.api.artist_url(&self.id);
        output.note(&format!("Fetching {url}"));

        let entity = fetch_entity(&session, &url).await?;
        session.present(&entity, &output).await
    }
}

/// Fetch and parse the artist at `url`. Every failure becomes a localized
/// load error.
async fn fetch_entity(session: &Session, url: &str) -> Result<Entity, CliError> {
    let fetcher = Arc::clone(&session.fetcher);
    let target = url.to_owned();
    let fetched = tokio::task::spawn_blocking(move || fetcher.fetch(&target))
        .await
        .map_err(|e| session.load_error(e))?
        .map_err(|e| {
            tracing::warn!(url, error = %e, "Artist fetch failed");
            session.load_error(e)
        })?;

    Entity::from_json(&fetched.body).map_err(|e| session.load_error(e))
}
