//! Detail view assembly.

use serde_json::Value;

use crate::entity::{Entity, is_truthy, value_to_text};
use crate::scan::{IdentifierEntry, scan_identifiers};
use crate::split::{Deferrals, has_delimiters, is_url, split_to_list};
use crate::tree::{DeferredLink, Node, SlotLookup};

/// Logical fields rendered first, in this order.
pub const PREFERRED_FIELDS: &[&str] = &[
    "name",
    "id",
    "image",
    "creationDate",
    "firstAlbum",
    "locations",
    "concertDates",
    "relations",
    "members",
];

/// Field holding place names. Never fetched, never scanned for ids.
pub const GEOGRAPHIC_FIELD: &str = "locations";

const IMAGE_FIELD: &str = "image";
const MEMBERS_FIELD: &str = "members";
const LIST_FIELDS: &[&str] = &[GEOGRAPHIC_FIELD, "concertDates", "relations"];

/// Source of localized UI strings.
///
/// Implemented for any `Fn(&str) -> String`, so a closure over a translation
/// handle is enough.
pub trait Translate {
    /// Text for `key`; unknown keys come back unchanged.
    fn translate(&self, key: &str) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}

/// Result of rendering one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Display title (entity name, or a localized fallback).
    pub title: String,
    /// Render tree in display order.
    pub root: Node,
    /// Placeholders awaiting resolution, indexed by slot.
    pub links: Vec<DeferredLink>,
    loading_label: String,
}

impl DetailView {
    /// Serialize the view, filling placeholders from `slots`.
    #[must_use]
    pub fn to_html(&self, slots: &dyn SlotLookup) -> String {
        let mut out = String::new();
        self.root.write_html(slots, &self.loading_label, &mut out);
        out
    }
}

/// Render `entity` into a detail view.
///
/// Output order: raw JSON block, image, preferred fields, other fields,
/// identifier table. Absent preferred fields are skipped. No I/O happens
/// here; URLs worth fetching end up in [`DetailView::links`].
pub fn render(entity: &Entity, tr: &dyn Translate) -> DetailView {
    let mut deferrals = Deferrals::new();
    let mut parts = vec![Node::RawJson {
        summary: tr.translate("detail.raw_json"),
        json: format!("{:#}", entity.to_value()),
    }];

    if let Some(image) = entity.resolve(IMAGE_FIELD).filter(|v| is_truthy(v)) {
        parts.push(image_node(entity, image));
    }

    for &name in PREFERRED_FIELDS {
        if name == IMAGE_FIELD || entity.resolve(name).is_none() {
            continue;
        }
        parts.push(render_field(entity, name, tr, &mut deferrals));
    }

    render_other_fields(entity, tr, &mut deferrals, &mut parts);

    let ids = scan_identifiers(entity);
    if !ids.is_empty() {
        parts.push(Node::Heading(tr.translate("detail.ids_found")));
        parts.push(Node::List(ids.into_iter().map(identifier_node).collect()));
    }

    let links = deferrals.into_links();
    tracing::debug!(parts = parts.len(), links = links.len(), "Entity rendered");

    DetailView {
        title: title(entity, tr),
        root: Node::Fragment(parts),
        links,
        loading_label: tr.translate("detail.loading"),
    }
}

/// Render a single preferred field.
///
/// Unlike [`render`], absent values are not skipped: they show up as
/// [`Node::Empty`] under the field's label.
pub fn render_field(
    entity: &Entity,
    name: &str,
    tr: &dyn Translate,
    deferrals: &mut Deferrals,
) -> Node {
    let value = entity.resolve(name);

    if name == IMAGE_FIELD {
        return value
            .filter(|v| is_truthy(v))
            .map_or(Node::Empty, |image| image_node(entity, image));
    }
    if name == MEMBERS_FIELD {
        return Node::Section {
            label: tr.translate("detail.members"),
            body: Box::new(members_node(value)),
        };
    }
    if LIST_FIELDS.contains(&name) {
        return Node::Section {
            label: field_label(tr, name),
            body: Box::new(split_to_list(value, name != GEOGRAPHIC_FIELD, deferrals)),
        };
    }
    Node::Labeled {
        label: field_label(tr, name),
        value: Box::new(value.map_or(Node::Empty, |v| Node::Text(value_to_text(v)))),
    }
}

fn render_other_fields(
    entity: &Entity,
    tr: &dyn Translate,
    deferrals: &mut Deferrals,
    parts: &mut Vec<Node>,
) {
    let others: Vec<(&str, &Value)> = entity
        .fields()
        .filter(|(name, _)| !PREFERRED_FIELDS.iter().any(|p| p.eq_ignore_ascii_case(name)))
        .collect();
    if others.is_empty() {
        return;
    }

    parts.push(Node::Heading(tr.translate("detail.other_fields")));
    for (name, value) in others {
        let geographic = name.eq_ignore_ascii_case(GEOGRAPHIC_FIELD);
        let node = match value {
            Value::String(s) if is_url(s) && !geographic => Node::Section {
                label: name.to_owned(),
                body: Box::new(deferrals.defer(s)),
            },
            Value::String(s) if has_delimiters(s) => Node::Section {
                label: name.to_owned(),
                body: Box::new(split_to_list(Some(value), !geographic, deferrals)),
            },
            _ => Node::Labeled {
                label: name.to_owned(),
                value: Box::new(Node::Text(value_to_text(value))),
            },
        };
        parts.push(node);
    }
}

fn members_node(value: Option<&Value>) -> Node {
    match value {
        None => Node::Empty,
        Some(v) if !is_truthy(v) => Node::Empty,
        Some(Value::Array(members)) if members.is_empty() => Node::Empty,
        Some(Value::Array(members)) => Node::List(
            members
                .iter()
                .map(|m| Node::Text(value_to_text(m)))
                .collect(),
        ),
        Some(other) => Node::Block(value_to_text(other)),
    }
}

fn image_node(entity: &Entity, image: &Value) -> Node {
    Node::Image {
        src: value_to_text(image),
        alt: entity.resolve("name").map(value_to_text).unwrap_or_default(),
    }
}

fn identifier_node(entry: IdentifierEntry) -> Node {
    let value = match entry.url {
        Some(href) => Node::Link {
            href,
            text: entry.id,
        },
        None => Node::Text(entry.id),
    };
    Node::Pair {
        label: entry.name,
        value: Box::new(value),
    }
}

/// Localized label for a preferred field, or the raw name when untranslated.
fn field_label(tr: &dyn Translate, name: &str) -> String {
    let key = format!("field.{name}");
    let label = tr.translate(&key);
    if label == key { name.to_owned() } else { label }
}

fn title(entity: &Entity, tr: &dyn Translate) -> String {
    entity
        .resolve("name")
        .filter(|v| is_truthy(v))
        .map_or_else(|| tr.translate("detail.title_fallback"), value_to_text)
}
