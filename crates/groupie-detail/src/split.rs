//! Delimited-string splitting with deferred URL placeholders.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::entity::{is_truthy, value_to_text};
use crate::tree::{DeferredLink, Node, SlotId};

static DELIMITERS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;]+").unwrap());

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Whether `s` starts with an `http://` or `https://` scheme (any case).
pub fn is_url(s: &str) -> bool {
    URL_RE.is_match(s)
}

/// Whether `s` contains a `,` or `;` delimiter.
pub(crate) fn has_delimiters(s: &str) -> bool {
    DELIMITERS_RE.is_match(s)
}

/// Collects the URLs deferred while rendering one view.
///
/// Slot ids are handed out in discovery order, starting at zero.
#[derive(Debug, Default)]
pub struct Deferrals {
    links: Vec<DeferredLink>,
}

impl Deferrals {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `url` and return the placeholder node standing in for it.
    pub fn defer(&mut self, url: &str) -> Node {
        let slot = SlotId(self.links.len());
        self.links.push(DeferredLink {
            slot,
            url: url.to_owned(),
        });
        Node::Deferred {
            slot,
            url: url.to_owned(),
        }
    }

    /// Links registered so far.
    #[must_use]
    pub fn links(&self) -> &[DeferredLink] {
        &self.links
    }

    /// Consume the collector.
    #[must_use]
    pub fn into_links(self) -> Vec<DeferredLink> {
        self.links
    }
}

/// Turn a delimited value into a list node.
///
/// The value is split on runs of `,` and `;`, parts are trimmed and empty
/// ones dropped. When `allow_url_fetch` is set, parts that look like HTTP(S)
/// URLs become deferred placeholders; everything else is plain text.
///
/// Absent and falsy values (null, `false`, zero, the empty string) and
/// empty lists yield [`Node::Empty`]. Lists contribute one
/// part per element; other non-string values use their text form.
pub fn split_to_list(
    value: Option<&Value>,
    allow_url_fetch: bool,
    deferrals: &mut Deferrals,
) -> Node {
    let text = match value {
        None => return Node::Empty,
        Some(v) if !is_truthy(v) => return Node::Empty,
        Some(Value::Array(items)) if items.is_empty() => return Node::Empty,
        Some(Value::Array(items)) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(","),
        Some(other) => value_to_text(other),
    };

    let parts: Vec<&str> = DELIMITERS_RE
        .split(&text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        return Node::Block(text);
    }

    Node::List(
        parts
            .into_iter()
            .map(|part| {
                if allow_url_fetch && is_url(part) {
                    deferrals.defer(part)
                } else {
                    Node::Text(part.to_owned())
                }
            })
            .collect(),
    )
}
