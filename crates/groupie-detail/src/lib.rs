//! Schema-less detail renderer for artist entities.
//!
//! This crate turns an arbitrary JSON object into a render tree without
//! knowing its schema up front. The pipeline:
//!
//! - [`Entity::resolve`] looks fields up regardless of `name`/`Name` casing
//! - [`split_to_list`] turns delimited strings into lists, deferring URLs
//! - [`scan_identifiers`] collects every id/URL pair found in the payload
//! - [`render`] assembles the final [`DetailView`]
//!
//! URLs that should be fetched later become [`Node::Deferred`] placeholders
//! pointing at a [`SlotId`]. Rendering never performs I/O; whoever resolves
//! the links supplies a [`SlotLookup`] when the view is serialized.
//!
//! # Example
//!
//! ```
//! use groupie_detail::{Entity, Unresolved, render};
//!
//! let entity = Entity::from_json(r#"{"Name": "Queen", "relations": "http://api.test/relation/1"}"#).unwrap();
//! let view = render(&entity, &|key: &str| key.to_owned());
//!
//! assert_eq!(view.title, "Queen");
//! assert_eq!(view.links.len(), 1);
//! assert!(view.to_html(&Unresolved).contains(r#"data-url="http://api.test/relation/1""#));
//! ```

mod entity;
mod render;
mod scan;
mod split;
mod tree;

pub use entity::{DetailError, Entity, is_truthy, value_to_text};
pub use render::{
    DetailView, GEOGRAPHIC_FIELD, PREFERRED_FIELDS, Translate, render, render_field,
};
pub use scan::{IdentifierEntry, scan_identifiers};
pub use split::{Deferrals, is_url, split_to_list};
pub use tree::{
    DeferredLink, EMPTY_MARKER, Node, Resolution, SlotId, SlotLookup, Unresolved, escape_html,
};
