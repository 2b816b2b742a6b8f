//! Asynchronous resolution of deferred link placeholders.
//!
//! A rendered [`DetailView`](groupie_detail::DetailView) lists the URLs it
//! wants fetched. [`LinkResolver::resolve_all`] waits until the view is
//! attached for display, then fetches every URL concurrently and settles
//! each placeholder with its content, or with a plain link when the fetch
//! fails. The returned [`SlotBoard`] is passed back to
//! [`DetailView::to_html`](groupie_detail::DetailView::to_html).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use groupie_detail::{Entity, render};
//! use groupie_links::{HttpFetcher, LinkResolver, attach_channel};
//!
//! # async fn run(json: &str) -> Result<(), groupie_detail::DetailError> {
//! let entity = Entity::from_json(json)?;
//! let view = render(&entity, &|key: &str| key.to_owned());
//!
//! let resolver = LinkResolver::new(Arc::new(HttpFetcher::new(Duration::from_secs(10))));
//! let (handle, signal) = attach_channel();
//! let mut board = resolver.resolve_all(&view.links, signal);
//! handle.attach();
//! board.wait_settled().await;
//! println!("{}", view.to_html(&board));
//! # Ok(())
//! # }
//! ```

mod classify;
mod fetch;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod resolver;
mod slots;

pub use classify::{MAX_TEXT_CHARS, classify, resolve_one};
pub use fetch::{FetchError, Fetched, HttpFetcher, LinkFetcher, MAX_BODY_BYTES, create_agent};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockFetcher;
pub use resolver::LinkResolver;
pub use slots::{AttachHandle, AttachSignal, SlotBoard, SlotState, SlotWriter, attach_channel};
