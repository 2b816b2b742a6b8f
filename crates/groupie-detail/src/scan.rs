//! Identifier discovery across an untyped payload.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::entity::{Entity, is_truthy, value_to_text};

/// First `/<digits>` path segment ending at a word boundary.
static PATH_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/([0-9]+)\b").unwrap());

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Fields never scanned for identifiers. Place names are not links.
const DENYLIST: &[&str] = &["locations"];

/// Name the entity's own id is recorded under.
const SELF_NAME: &str = "artist";

/// An identifier found somewhere in the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierEntry {
    /// Field the identifier was found in.
    pub name: String,
    /// Identifier text.
    pub id: String,
    /// Full URL the identifier was extracted from, if any.
    pub url: Option<String>,
}

impl IdentifierEntry {
    fn new(name: &str, id: String, url: Option<&str>) -> Self {
        Self {
            name: name.to_owned(),
            id,
            url: url.map(str::to_owned),
        }
    }
}

/// Collect every identifier in `entity`, in discovery order.
///
/// The entity's own `id` comes first under the name `artist`. Each other
/// field contributes:
/// - strings: the first `/<digits>` segment (with the string as URL), or the
///   whole string when it is purely numeric
/// - lists: `id` of object elements, numeric tokens of string elements
/// - objects: their `id`
///
/// Pairs already seen under the same field name are skipped. Fields in the
/// denylist and falsy values are ignored.
pub fn scan_identifiers(entity: &Entity) -> Vec<IdentifierEntry> {
    let mut found = Vec::new();

    if let Some(id) = entity.resolve("id") {
        push_unique(&mut found, IdentifierEntry::new(SELF_NAME, value_to_text(id), None));
    }

    for (name, value) in entity.fields() {
        if DENYLIST.iter().any(|d| d.eq_ignore_ascii_case(name)) || !is_truthy(value) {
            continue;
        }
        match value {
            Value::String(s) => {
                if let Some(entry) = string_identifier(name, s) {
                    push_unique(&mut found, entry);
                }
            }
            Value::Array(items) => {
                for item in items {
                    let entry = match item {
                        Value::Object(fields) => object_identifier(name, fields),
                        Value::String(s) => string_identifier(name, s).map(|mut e| {
                            e.url = None;
                            e
                        }),
                        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => None,
                    };
                    if let Some(entry) = entry {
                        push_unique(&mut found, entry);
                    }
                }
            }
            Value::Object(fields) => {
                if let Some(entry) = object_identifier(name, fields) {
                    push_unique(&mut found, entry);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    tracing::debug!(count = found.len(), "Identifiers scanned");
    found
}

fn string_identifier(name: &str, s: &str) -> Option<IdentifierEntry> {
    if let Some(caps) = PATH_ID_RE.captures(s) {
        return Some(IdentifierEntry::new(name, caps[1].to_owned(), Some(s)));
    }
    NUMERIC_RE
        .is_match(s)
        .then(|| IdentifierEntry::new(name, s.to_owned(), None))
}

fn object_identifier(name: &str, fields: &Map<String, Value>) -> Option<IdentifierEntry> {
    fields
        .get("id")
        .filter(|id| is_truthy(id))
        .map(|id| IdentifierEntry::new(name, value_to_text(id), None))
}

fn push_unique(found: &mut Vec<IdentifierEntry>, entry: IdentifierEntry) {
    if !found
        .iter()
        .any(|e| e.id == entry.id && e.name == entry.name)
    {
        found.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn scan(value: Value) -> Vec<IdentifierEntry> {
        scan_identifiers(&Entity::from_value(value).unwrap())
    }

    fn entry(name: &str, id: &str, url: Option<&str>) -> IdentifierEntry {
        IdentifierEntry::new(name, id.to_owned(), url)
    }

    #[test]
    fn test_scan_discovery_order() {
        let found = scan(json!({
            "id": 5,
            "members": [{"id": 12}],
            "tour": "http://x.test/concerts/99"
        }));

        assert_eq!(
            found,
            vec![
                entry("artist", "5", None),
                entry("members", "12", None),
                entry("tour", "99", Some("http://x.test/concerts/99")),
            ]
        );
    }

    #[test]
    fn test_scan_suppresses_duplicate_pairs() {
        let found = scan(json!({
            "members": [{"id": 12}, {"id": 12}, "12"],
        }));
        assert_eq!(found, vec![entry("members", "12", None)]);
    }

    #[test]
    fn test_scan_keeps_same_id_under_different_names() {
        let found = scan(json!({
            "relations": "http://api.test/relation/3",
            "dates": "http://api.test/dates/3"
        }));
        assert_eq!(
            found,
            vec![
                entry("relations", "3", Some("http://api.test/relation/3")),
                entry("dates", "3", Some("http://api.test/dates/3")),
            ]
        );
    }

    #[test]
    fn test_scan_skips_locations_case_insensitively() {
        let found = scan(json!({
            "Locations": "http://api.test/locations/7",
            "locations": "42"
        }));
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_numeric_string() {
        let found = scan(json!({"label": "123", "code": "12a"}));
        assert_eq!(found, vec![entry("label", "123", None)]);
    }

    #[test]
    fn test_scan_first_path_segment_wins() {
        let found = scan(json!({"link": "http://api.test/artists/4/relations/9"}));
        assert_eq!(
            found,
            vec![entry(
                "link",
                "4",
                Some("http://api.test/artists/4/relations/9")
            )]
        );
    }

    #[test]
    fn test_scan_path_digits_need_word_boundary() {
        let found = scan(json!({"link": "http://api.test/99abc"}));
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_list_strings_have_no_url() {
        let found = scan(json!({"links": ["http://api.test/dates/8", "77"]}));
        assert_eq!(
            found,
            vec![entry("links", "8", None), entry("links", "77", None)]
        );
    }

    #[test]
    fn test_scan_nested_object_id() {
        let found = scan(json!({"label": {"id": "abc", "name": "EMI"}}));
        assert_eq!(found, vec![entry("label", "abc", None)]);
    }

    #[test]
    fn test_scan_ignores_wrong_types_and_falsy_values() {
        let found = scan(json!({
            "flag": true,
            "count": 3,
            "empty": "",
            "none": null,
            "nested": [[1], null, 4, {"id": 0}],
            "obj": {"name": "no id"}
        }));
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_capitalized_id_seeds_artist() {
        let found = scan(json!({"Id": 9}));
        assert_eq!(found, vec![entry("artist", "9", None)]);
    }

    #[test]
    fn test_scan_string_id_also_recorded_under_field_name() {
        let found = scan(json!({"id": "9"}));
        assert_eq!(
            found,
            vec![entry("artist", "9", None), entry("id", "9", None)]
        );
    }
}
