//! Cursor pagination metadata.
//!
//! Paginated list responses wrap their resource array together with a `meta`
//! object carrying the total item count and opaque `next`/`prev` cursors.
//! `Links` is always present on a successful paginated response; an empty
//! cursor string means the list does not continue in that direction.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside list results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    /// Total number of items across all pages.
    pub total: i64,
    /// Cursor links for the surrounding pages.
    pub links: Links,
}

/// Opaque cursor tokens pointing at the adjacent pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Links {
    /// Cursor for the next page; empty when on the terminal page.
    #[serde(default)]
    pub next: String,
    /// Cursor for the previous page; empty when on the first page.
    #[serde(default)]
    pub prev: String,
}

impl Meta {
    /// Cursor for the next page, if the list continues forward.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        if self.links.next.is_empty() {
            None
        } else {
            Some(&self.links.next)
        }
    }

    /// Cursor for the previous page, if the list continues backward.
    #[must_use]
    pub fn prev_cursor(&self) -> Option<&str> {
        if self.links.prev.is_empty() {
            None
        } else {
            Some(&self.links.prev)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let json = r#"{"total":11,"links":{"next":"abc","prev":""}}"#;
        let meta: Meta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.total, 11);
        assert_eq!(meta.links.next, "abc");
        assert_eq!(meta.links.prev, "");

        let encoded = serde_json::to_string(&meta).unwrap();
        let again: Meta = serde_json::from_str(&encoded).unwrap();
        assert_eq!(meta, again);
    }

    #[test]
    fn cursors_empty_means_none() {
        let meta = Meta {
            total: 3,
            links: Links {
                next: String::new(),
                prev: String::new(),
            },
        };
        assert!(meta.next_cursor().is_none());
        assert!(meta.prev_cursor().is_none());
    }

    #[test]
    fn cursors_present() {
        let meta = Meta {
            total: 40,
            links: Links {
                next: "t2".to_string(),
                prev: "t0".to_string(),
            },
        };
        assert_eq!(meta.next_cursor(), Some("t2"));
        assert_eq!(meta.prev_cursor(), Some("t0"));
    }

    #[test]
    fn links_default_when_fields_missing() {
        // Terminal pages may omit individual cursor fields entirely.
        let meta: Meta = serde_json::from_str(r#"{"total":0,"links":{}}"#).unwrap();
        assert!(meta.next_cursor().is_none());
        assert!(meta.prev_cursor().is_none());
    }
}
