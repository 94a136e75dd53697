//! JSON front matter codec for Hugo content files.
//!
//! ```text
//! ---
//! {"id":"110","syndication":"https://...",...}
//! ---
//! {{< unsafe >}}
//! <p>toot body</p>
//! {{< /unsafe >}}
//! ```
//!
//! The parser locates the body by fixed offsets, so the marker lines below
//! must not change without changing the offsets with them.

use serde_json::{Map, Value};

use crate::error::Result;

pub const DELIMITER: &str = "---";
pub const BODY_OPEN: &str = "{{< unsafe >}}";
pub const BODY_CLOSE: &str = "{{< /unsafe >}}";

/// Bytes from the second delimiter to the start of the body.
const BODY_START_OFFSET: usize = DELIMITER.len() + 1 + BODY_OPEN.len() + 1;
/// Bytes from the end of the body to the end of the file.
const BODY_END_OFFSET: usize = 1 + BODY_CLOSE.len() + 1;

/// Read the front matter of a content file, with the body under `content`.
///
/// Returns `None` when the file has no parseable JSON object between its
/// first two delimiters.
pub fn parse(text: &str) -> Option<Map<String, Value>> {
    let first = text.find(DELIMITER)?;
    let second = first + 1 + text.get(first + 1..)?.find(DELIMITER)?;

    let front = text.get(first + DELIMITER.len()..second)?;
    let Value::Object(mut record) = serde_json::from_str::<Value>(front).ok()? else {
        return None;
    };

    let start = second + BODY_START_OFFSET;
    let end = text.len().saturating_sub(BODY_END_OFFSET);
    let body = if start < end {
        text.get(start..end).unwrap_or_default()
    } else {
        ""
    };

    record.insert("content".to_string(), Value::String(body.to_string()));
    Some(record)
}

/// Write a record as a content file. `content` becomes the body.
pub fn render(record: &Map<String, Value>) -> Result<String> {
    let mut front = record.clone();
    let content = match front.remove("content") {
        Some(Value::String(text)) => text,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    // A literal delimiter can only occur inside a JSON string, where an
    // escaped hyphen decodes to the same text.
    let json = serde_json::to_string(&front)?.replace(DELIMITER, r"\u002d\u002d\u002d");

    Ok(format!(
        "{DELIMITER}\n{json}\n{DELIMITER}\n{BODY_OPEN}\n{content}\n{BODY_CLOSE}\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_offsets_match_markers() {
        assert_eq!(BODY_START_OFFSET, 19);
        assert_eq!(BODY_END_OFFSET, 17);
    }

    #[test]
    fn test_render_layout() {
        let toot = record(json!({ "id": "110", "content": "<p>Hello</p>" }));
        let text = render(&toot).unwrap();

        assert_eq!(
            text,
            "---\n{\"id\":\"110\"}\n---\n{{< unsafe >}}\n<p>Hello</p>\n{{< /unsafe >}}\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let toot = record(json!({
            "id": "110",
            "syndication": "https://fosstodon.org/@someone/110",
            "date": "2024-03-01T12:00:00.000Z",
            "account": { "id": "7", "username": "someone", "display_name": "Some Öne" },
            "media_attachments": [],
            "tags": [{ "name": "rust" }],
            "content": "<p>multi\nline</p>\n<p>with --- in it</p>",
        }));

        let parsed = parse(&render(&toot).unwrap()).unwrap();
        assert_eq!(parsed, toot);
    }

    #[test]
    fn test_round_trip_with_delimiter_in_fields() {
        let toot = record(json!({
            "id": "111",
            "spoiler_text": "spoilers --- ahead",
            "card": { "description": "---" },
            "content": "<p>body</p>",
        }));

        let text = render(&toot).unwrap();
        assert_eq!(text.matches(DELIMITER).count(), 2);
        assert_eq!(parse(&text).unwrap(), toot);
    }

    #[test]
    fn test_round_trip_empty_content() {
        let toot = record(json!({ "id": "112", "content": "" }));
        assert_eq!(parse(&render(&toot).unwrap()).unwrap(), toot);
    }

    #[test]
    fn test_render_without_content() {
        let toot = record(json!({ "id": "113" }));
        let parsed = parse(&render(&toot).unwrap()).unwrap();
        assert_eq!(parsed.get("content"), Some(&json!("")));
    }

    #[test]
    fn test_parse_reads_python_style_json() {
        let text = "---\n{\"id\": \"110\", \"favourites_count\": 3}\n---\n{{< unsafe >}}\n<p>Hi</p>\n{{< /unsafe >}}\n";
        let parsed = parse(text).unwrap();

        assert_eq!(parsed.get("favourites_count"), Some(&json!(3)));
        assert_eq!(parsed.get("content"), Some(&json!("<p>Hi</p>")));
    }

    #[test]
    fn test_parse_rejects_missing_front_matter() {
        assert!(parse("").is_none());
        assert!(parse("just some markdown").is_none());
        assert!(parse("---\n{\"id\": \"1\"}\n").is_none());
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        assert!(parse("---\nid: 1\n---\nbody").is_none());
        assert!(parse("---\n[1, 2]\n---\n{{< unsafe >}}\nx\n{{< /unsafe >}}\n").is_none());
        assert!(parse("----\n").is_none());
    }

    #[test]
    fn test_parse_truncated_body_is_empty() {
        let parsed = parse("---\n{\"id\": \"1\"}\n---\n").unwrap();
        assert_eq!(parsed.get("content"), Some(&json!("")));
    }
}
