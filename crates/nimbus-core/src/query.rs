//! Query-parameter assembly helpers.
//!
//! List endpoints take optional filter and pagination parameters. This
//! builder collects them as key/value pairs that can be applied to an
//! [`ApiRequest`](crate::request::ApiRequest) before execution.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append cursor pagination parameters when present.
    ///
    /// `per_page` becomes `per_page=<n>`, the cursor becomes `cursor=<token>`.
    pub fn push_pagination(&mut self, per_page: Option<u32>, cursor: Option<&str>) {
        self.push_opt("per_page", per_page);
        self.push_opt("cursor", cursor.filter(|c| !c.is_empty()));
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Borrow the collected pairs as `(&str, &str)` tuples.
    #[must_use]
    pub fn as_pairs(&self) -> Vec<(&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect()
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
