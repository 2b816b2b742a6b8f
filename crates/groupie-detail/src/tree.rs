//! Render tree and HTML serialization.
//!
//! The tree is plain data. Deferred placeholders only carry a [`SlotId`];
//! their content is looked up through a [`SlotLookup`] at serialization time,
//! so the same tree can be written before, during and after link resolution.

use std::collections::HashMap;
use std::fmt::Write;

/// Marker shown for absent or empty values.
pub const EMPTY_MARKER: &str = "—";

/// Index of a deferred placeholder within one rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// A URL waiting to be resolved into content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredLink {
    pub slot: SlotId,
    pub url: String,
}

/// Terminal content of a resolved placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One bullet per item.
    List(Vec<String>),
    /// Labelled summary lines (label, text).
    Summary(Vec<(String, String)>),
    /// Pretty-printed JSON or other preformatted text.
    Preformatted(String),
    /// Plain text.
    Text(String),
    /// Fetch failed; link to the requested URL instead.
    Fallback { url: String },
}

/// Source of placeholder state during serialization.
pub trait SlotLookup {
    /// Settled content for `slot`, or `None` while it is still loading.
    fn resolution(&self, slot: SlotId) -> Option<Resolution>;
}

/// Lookup where every placeholder is still loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unresolved;

impl SlotLookup for Unresolved {
    fn resolution(&self, _slot: SlotId) -> Option<Resolution> {
        None
    }
}

impl SlotLookup for HashMap<SlotId, Resolution> {
    fn resolution(&self, slot: SlotId) -> Option<Resolution> {
        self.get(&slot).cloned()
    }
}

/// Node of the detail render tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Children written one after another, separated by newlines.
    Fragment(Vec<Node>),
    /// Collapsible block with the pretty-printed payload.
    RawJson { summary: String, json: String },
    /// Prominent image.
    Image { src: String, alt: String },
    /// `label: value` on one line.
    Labeled { label: String, value: Box<Node> },
    /// `label:` followed by block content.
    Section { label: String, body: Box<Node> },
    /// `label: value` inside a list item, without a paragraph.
    Pair { label: String, value: Box<Node> },
    /// Separator plus section heading.
    Heading(String),
    /// Bulleted list.
    List(Vec<Node>),
    /// Text as its own block.
    Block(String),
    /// Inline text.
    Text(String),
    /// Absent value.
    Empty,
    /// Placeholder for a URL resolved after rendering.
    Deferred { slot: SlotId, url: String },
    /// Hyperlink opening in a new context.
    Link { href: String, text: String },
}

impl Node {
    /// Write this node as HTML.
    ///
    /// `loading` is the text shown inside placeholders that have not settled.
    pub fn write_html(&self, slots: &dyn SlotLookup, loading: &str, out: &mut String) {
        match self {
            Self::Fragment(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    child.write_html(slots, loading, out);
                }
            }
            Self::RawJson { summary, json } => {
                write!(
                    out,
                    r#"<details class="raw-json"><summary>{}</summary><pre>{}</pre></details>"#,
                    escape_html(summary),
                    escape_html(json)
                )
                .unwrap();
            }
            Self::Image { src, alt } => {
                write!(
                    out,
                    r#"<div class="detail-image"><img src="{}" alt="{}"></div>"#,
                    escape_html(src),
                    escape_html(alt)
                )
                .unwrap();
            }
            Self::Labeled { label, value } => {
                write!(out, "<p><strong>{}:</strong> ", escape_html(label)).unwrap();
                value.write_html(slots, loading, out);
                out.push_str("</p>");
            }
            Self::Section { label, body } => {
                write!(out, "<p><strong>{}:</strong></p>", escape_html(label)).unwrap();
                body.write_html(slots, loading, out);
            }
            Self::Pair { label, value } => {
                write!(out, "<strong>{}:</strong> ", escape_html(label)).unwrap();
                value.write_html(slots, loading, out);
            }
            Self::Heading(text) => {
                write!(out, "<hr><h3>{}</h3>", escape_html(text)).unwrap();
            }
            Self::List(items) => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    item.write_html(slots, loading, out);
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            Self::Block(text) => {
                write!(out, "<div>{}</div>", escape_html(text)).unwrap();
            }
            Self::Text(text) => out.push_str(&escape_html(text)),
            Self::Empty => {
                write!(out, "<em>{EMPTY_MARKER}</em>").unwrap();
            }
            Self::Deferred { slot, url } => {
                write!(out, r#"<div data-url="{}">"#, escape_html(url)).unwrap();
                match slots.resolution(*slot) {
                    Some(resolution) => resolution.write_html(out),
                    None => out.push_str(&escape_html(loading)),
                }
                out.push_str("</div>");
            }
            Self::Link { href, text } => write_link(href, text, out),
        }
    }
}

impl Resolution {
    /// Write the settled content of a placeholder as HTML.
    pub fn write_html(&self, out: &mut String) {
        match self {
            Self::List(items) => {
                out.push_str("<ul>");
                for item in items {
                    write!(out, "<li>{}</li>", escape_html(item)).unwrap();
                }
                out.push_str("</ul>");
            }
            Self::Summary(lines) => {
                for (label, text) in lines {
                    write!(
                        out,
                        "<p><strong>{}:</strong> {}</p>",
                        escape_html(label),
                        escape_html(text)
                    )
                    .unwrap();
                }
            }
            Self::Preformatted(text) => {
                write!(out, "<pre>{}</pre>", escape_html(text)).unwrap();
            }
            Self::Text(text) => out.push_str(&escape_html(text)),
            Self::Fallback { url } => write_link(url, url, out),
        }
    }
}

fn write_link(href: &str, text: &str, out: &mut String) {
    write!(
        out,
        r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
        escape_html(href),
        escape_html(text)
    )
    .unwrap();
}

/// Escape HTML special characters for text and attribute contexts.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
