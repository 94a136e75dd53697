// src/pipeline/transform.rs

//! Reshape server toots into the front matter Hugo expects.

use serde_json::Value;

use crate::models::{Toot, TransformConfig};

/// Renames and strips toot fields ahead of persisting.
#[derive(Debug, Clone)]
pub struct Transformer {
    strip_account_fields: Vec<String>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(&TransformConfig::default())
    }
}

impl Transformer {
    pub fn new(config: &TransformConfig) -> Self {
        Self {
            strip_account_fields: config.strip_account_fields.clone(),
        }
    }

    /// Produce the persisted form of a toot.
    ///
    /// - `url` (or `uri` when there is no `url`) becomes `syndication`
    /// - `created_at` becomes `date`
    /// - volatile `account` fields are dropped
    ///
    /// Absent keys are ignored, so applying this to its own output changes
    /// nothing.
    pub fn apply(&self, toot: &Toot) -> Toot {
        toot.map_fields(|fields| {
            // URL -> Syndication
            let url = fields.remove("url");
            let uri = fields.remove("uri");
            if let Some(syndication) = url.or(uri) {
                fields.insert("syndication".to_string(), syndication);
            }

            // Created At -> Date
            if let Some(date) = fields.remove("created_at") {
                fields.insert("date".to_string(), date);
            }

            // Strip out highly dynamic account information
            if let Some(Value::Object(account)) = fields.get_mut("account") {
                for field in &self.strip_account_fields {
                    account.remove(field);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server_toot() -> Toot {
        Toot::from_value(json!({
            "id": "110",
            "created_at": "2024-03-01T12:00:00.000Z",
            "uri": "https://fosstodon.org/users/someone/statuses/110",
            "url": "https://fosstodon.org/@someone/110",
            "content": "<p>Hello</p>",
            "favourites_count": 2,
            "account": {
                "id": "7",
                "username": "someone",
                "avatar": "https://cdn.example/a.png",
                "locked": false,
                "bot": false,
                "discoverable": true,
                "group": false,
                "created_at": "2022-05-01T00:00:00.000Z",
                "note": "<p>bio</p>",
                "followers_count": 100,
                "following_count": 50,
                "statuses_count": 999,
                "last_status_at": "2024-03-01",
                "emojis": [],
                "fields": []
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_renames_fields() {
        let out = Transformer::default().apply(&server_toot());

        assert_eq!(
            out.get("syndication"),
            Some(&json!("https://fosstodon.org/@someone/110"))
        );
        assert_eq!(out.get("date"), Some(&json!("2024-03-01T12:00:00.000Z")));
        assert!(out.get("url").is_none());
        assert!(out.get("uri").is_none());
        assert!(out.get("created_at").is_none());
        assert_eq!(out.get("favourites_count"), Some(&json!(2)));
        assert_eq!(out.content(), "<p>Hello</p>");
    }

    #[test]
    fn test_strips_exactly_the_account_fields() {
        let out = Transformer::default().apply(&server_toot());

        assert_eq!(
            out.get("account"),
            Some(&json!({
                "id": "7",
                "username": "someone",
                "avatar": "https://cdn.example/a.png"
            }))
        );
    }

    #[test]
    fn test_input_is_untouched() {
        let original = server_toot();
        let _ = Transformer::default().apply(&original);
        assert_eq!(original, server_toot());
    }

    #[test]
    fn test_idempotent() {
        let transformer = Transformer::default();
        let once = transformer.apply(&server_toot());
        let twice = transformer.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_tolerates_missing_fields() {
        let sparse = Toot::from_value(json!({
            "id": "1",
            "content": "<p>x</p>",
            "account": { "id": "7", "note": "bio" }
        }))
        .unwrap();
        let out = Transformer::default().apply(&sparse);

        assert!(out.get("syndication").is_none());
        assert!(out.get("date").is_none());
        assert_eq!(out.get("account"), Some(&json!({ "id": "7" })));

        let no_account = Toot::from_value(json!({ "id": "2", "account": null })).unwrap();
        let out = Transformer::default().apply(&no_account);
        assert_eq!(out.get("account"), Some(&Value::Null));
    }

    #[test]
    fn test_uri_fallback() {
        let toot = Toot::from_value(json!({ "id": "3", "uri": "tag:example,2024:3" })).unwrap();
        let out = Transformer::default().apply(&toot);
        assert_eq!(out.get("syndication"), Some(&json!("tag:example,2024:3")));
    }

    #[test]
    fn test_custom_field_list() {
        let config = TransformConfig {
            strip_account_fields: vec!["avatar".into(), "noindex".into()],
        };
        let out = Transformer::new(&config).apply(&server_toot());
        let account = out.get("account").unwrap();

        assert!(account.get("avatar").is_none());
        assert!(account.get("note").is_some());
    }
}
