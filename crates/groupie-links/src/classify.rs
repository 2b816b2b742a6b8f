//! Turning fetched bodies into placeholder content.

use groupie_detail::{Resolution, is_truthy, value_to_text};
use serde_json::Value;

use crate::fetch::{FetchError, Fetched, LinkFetcher};

/// Maximum characters of plain text shown in a placeholder.
pub const MAX_TEXT_CHARS: usize = 1000;

/// Appended to truncated text.
const TRUNCATION_MARKER: &str = "...";

/// Object fields worth summarizing instead of dumping the whole document.
const SUMMARY_FIELDS: &[(&str, &str)] = &[
    ("locations", "Locations"),
    ("dates", "Dates"),
    ("relation", "Relation"),
];

/// Fetch `url` and classify the response. Never fails: any error becomes
/// [`Resolution::Fallback`] pointing at `url`.
pub fn resolve_one(fetcher: &dyn LinkFetcher, url: &str) -> Resolution {
    match fetcher.fetch(url).and_then(classify) {
        Ok(resolution) => {
            tracing::debug!(url, "Link resolved");
            resolution
        }
        Err(err) => {
            tracing::debug!(url, error = %err, "Link resolution failed, falling back to link");
            Resolution::Fallback {
                url: url.to_owned(),
            }
        }
    }
}

/// Classify a successful response.
///
/// - JSON content type: arrays become lists, objects with known summary
///   fields become summaries, other objects are pretty-printed, scalars are
///   plain text. A body that does not parse is an error.
/// - Any other content type: text that happens to be JSON is pretty-printed,
///   everything else is shown as plain text, truncated.
pub fn classify(fetched: Fetched) -> Result<Resolution, FetchError> {
    if fetched.is_json() {
        let json: Value = serde_json::from_str(&fetched.body)?;
        return Ok(classify_json(json));
    }

    Ok(match serde_json::from_str::<Value>(&fetched.body) {
        Ok(json) => Resolution::Preformatted(format!("{json:#}")),
        Err(_) => Resolution::Text(truncate(&fetched.body)),
    })
}

fn classify_json(json: Value) -> Resolution {
    match json {
        Value::Array(items) => Resolution::List(items.iter().map(value_to_text).collect()),
        Value::Object(ref fields) => {
            let lines: Vec<(String, String)> = SUMMARY_FIELDS
                .iter()
                .filter_map(|(key, label)| {
                    fields
                        .get(*key)
                        .filter(|v| is_truthy(v))
                        .map(|v| ((*label).to_owned(), v.to_string()))
                })
                .collect();
            if lines.is_empty() {
                Resolution::Preformatted(format!("{json:#}"))
            } else {
                Resolution::Summary(lines)
            }
        }
        scalar @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)) => {
            Resolution::Text(value_to_text(&scalar))
        }
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFetcher;
    use pretty_assertions::assert_eq;

    fn json(body: &str) -> Fetched {
        Fetched {
            content_type: Some("application/json".to_owned()),
            body: body.to_owned(),
        }
    }

    fn text(content_type: Option<&str>, body: &str) -> Fetched {
        Fetched {
            content_type: content_type.map(str::to_owned),
            body: body.to_owned(),
        }
    }

    #[test]
    fn test_json_array_becomes_list() {
        let resolution = classify(json(r#"["a<b", 2, {"k": "v"}, null]"#)).unwrap();
        assert_eq!(
            resolution,
            Resolution::List(vec![
                "a<b".to_owned(),
                "2".to_owned(),
                r#"{"k":"v"}"#.to_owned(),
                "null".to_owned(),
            ])
        );
    }

    #[test]
    fn test_json_object_with_summary_fields() {
        let resolution = classify(json(
            r#"{"id": 1, "dates": ["*23-08-2019", "22-08-2019"], "locations": ""}"#,
        ))
        .unwrap();
        assert_eq!(
            resolution,
            Resolution::Summary(vec![(
                "Dates".to_owned(),
                r#"["*23-08-2019","22-08-2019"]"#.to_owned()
            )])
        );
    }

    #[test]
    fn test_json_summary_keeps_fixed_order() {
        let resolution = classify(json(
            r#"{"relation": {"a": 1}, "locations": ["x"]}"#,
        ))
        .unwrap();
        assert_eq!(
            resolution,
            Resolution::Summary(vec![
                ("Locations".to_owned(), r#"["x"]"#.to_owned()),
                ("Relation".to_owned(), r#"{"a":1}"#.to_owned()),
            ])
        );
    }

    #[test]
    fn test_json_object_without_summary_fields_is_pretty() {
        let resolution = classify(json(r#"{"id":1,"name":"x"}"#)).unwrap();
        assert_eq!(
            resolution,
            Resolution::Preformatted("{\n  \"id\": 1,\n  \"name\": \"x\"\n}".to_owned())
        );
    }

    #[test]
    fn test_json_scalar_is_text() {
        assert_eq!(
            classify(json(r#""hello""#)).unwrap(),
            Resolution::Text("hello".to_owned())
        );
    }

    #[test]
    fn test_invalid_json_with_json_content_type_is_error() {
        assert!(matches!(classify(json("<html>")), Err(FetchError::Json(_))));
    }

    #[test]
    fn test_text_that_parses_as_json_is_pretty() {
        let resolution = classify(text(Some("text/plain"), "[1,2]")).unwrap();
        assert_eq!(
            resolution,
            Resolution::Preformatted("[\n  1,\n  2\n]".to_owned())
        );
    }

    #[test]
    fn test_plain_text_without_content_type() {
        let resolution = classify(text(None, "just words")).unwrap();
        assert_eq!(resolution, Resolution::Text("just words".to_owned()));
    }

    #[test]
    fn test_long_text_truncated() {
        let body = "é".repeat(MAX_TEXT_CHARS + 5);
        let Resolution::Text(shown) = classify(text(Some("text/html"), &body)).unwrap() else {
            panic!("expected text");
        };
        assert_eq!(shown.chars().count(), MAX_TEXT_CHARS + TRUNCATION_MARKER.len());
        assert!(shown.ends_with("é..."));
    }

    #[test]
    fn test_text_at_limit_not_truncated() {
        let body = "a".repeat(MAX_TEXT_CHARS);
        assert_eq!(
            classify(text(None, &body)).unwrap(),
            Resolution::Text(body.clone())
        );
    }

    #[test]
    fn test_content_type_match_is_case_insensitive() {
        let resolution = classify(text(Some("Application/JSON"), "[1]")).unwrap();
        assert_eq!(resolution, Resolution::List(vec!["1".to_owned()]));
    }

    #[test]
    fn test_resolve_one_falls_back_on_status() {
        let fetcher = MockFetcher::new().with_status("http://api.test/gone", 404);
        assert_eq!(
            resolve_one(&fetcher, "http://api.test/gone"),
            Resolution::Fallback {
                url: "http://api.test/gone".to_owned()
            }
        );
    }

    #[test]
    fn test_resolve_one_falls_back_on_unreachable() {
        let fetcher = MockFetcher::new();
        assert_eq!(
            resolve_one(&fetcher, "http://nowhere.test/1"),
            Resolution::Fallback {
                url: "http://nowhere.test/1".to_owned()
            }
        );
        assert_eq!(fetcher.calls("http://nowhere.test/1"), 1);
    }
}
