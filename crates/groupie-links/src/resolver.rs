//! Concurrent resolution of a view's deferred links.

use std::sync::Arc;

use groupie_detail::{DeferredLink, Resolution};

use crate::classify::resolve_one;
use crate::fetch::LinkFetcher;
use crate::slots::{AttachSignal, SlotBoard, SlotWriter};

/// Resolves deferred links through a shared [`LinkFetcher`].
#[derive(Clone)]
pub struct LinkResolver {
    fetcher: Arc<dyn LinkFetcher>,
}

impl LinkResolver {
    #[must_use]
    pub fn new(fetcher: Arc<dyn LinkFetcher>) -> Self {
        Self { fetcher }
    }

    /// Start resolving `links` and return the board their results land on.
    ///
    /// Nothing is fetched until `attached` fires. If the attach handle is
    /// dropped instead, no request is made and every slot stays loading.
    /// Links are fetched concurrently, one request per link, and each slot
    /// settles independently of its siblings.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn resolve_all(&self, links: &[DeferredLink], attached: AttachSignal) -> SlotBoard {
        let (board, writers) = SlotBoard::open(links.len());
        if links.is_empty() {
            return board;
        }

        let jobs: Vec<(SlotWriter, String)> = writers
            .into_iter()
            .zip(links.iter().map(|link| link.url.clone()))
            .collect();
        let fetcher = Arc::clone(&self.fetcher);

        tokio::spawn(async move {
            if !attached.attached().await {
                tracing::debug!(links = jobs.len(), "View detached before display, skipping links");
                return;
            }
            tracing::info!(links = jobs.len(), "Resolving links");

            for (writer, url) in jobs {
                let fetcher = Arc::clone(&fetcher);
                tokio::spawn(async move {
                    let fetch_url = url.clone();
                    let resolution =
                        tokio::task::spawn_blocking(move || resolve_one(fetcher.as_ref(), &fetch_url))
                            .await;
                    match resolution {
                        Ok(resolution) => writer.settle(resolution),
                        Err(err) => {
                            tracing::warn!(
                                slot = writer.slot().0,
                                url = %url,
                                error = %err,
                                "Link task failed"
                            );
                            writer.settle(Resolution::Fallback { url });
                        }
                    }
                });
            }
        });

        board
    }
}

impl std::fmt::Debug for LinkResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkResolver").finish_non_exhaustive()
    }
}
