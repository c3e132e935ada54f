//! Request descriptors.
//!
//! An [`ApiRequest`] is a fully resolved, ready-to-dispatch description of a
//! single API call: method, absolute URL and an optionally pre-serialized
//! body. Resource handlers obtain one from
//! [`Client::request`](crate::client::Client::request) (or the `_json`/`_form`
//! variants), may adjust its query string, and hand it to
//! [`Client::execute`](crate::client::Client::execute). Building a request
//! never performs I/O.

use reqwest::Method;
use serde::Serialize;
use url::form_urlencoded;
use url::Url;

use crate::error::{Error, Result};

/// A serialized request body together with its wire format.
///
/// Current endpoints take JSON; legacy endpoints take URL-encoded form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// JSON payload (`application/json`)
    Json(Vec<u8>),
    /// URL-encoded payload (`application/x-www-form-urlencoded`)
    Form(String),
}

impl Body {
    /// The `Content-Type` value matching this body's encoding.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Form(_) => "application/x-www-form-urlencoded",
        }
    }

    /// Raw bytes to place on the wire.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Json(bytes) => bytes,
            Self::Form(encoded) => encoded.as_bytes(),
        }
    }
}

/// A resolved request ready for dispatch through the client.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    body: Option<Body>,
}

impl ApiRequest {
    /// Creates a body-less request for an already resolved URL.
    #[must_use]
    pub const fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
        }
    }

    /// Creates a request carrying a JSON-serialized body.
    ///
    /// # Errors
    ///
    /// Fails if the payload cannot be serialized, or if the method is
    /// non-mutating (GET/HEAD requests never carry a body).
    pub fn json<B>(method: Method, url: Url, payload: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        Self::check_mutating(&method)?;
        let bytes = serde_json::to_vec(payload)
            .map_err(|err| Error::Decode(format!("Failed to serialize request body: {err}")))?;
        Ok(Self {
            method,
            url,
            body: Some(Body::Json(bytes)),
        })
    }

    /// Creates a request carrying a URL-encoded form body (legacy endpoints).
    ///
    /// # Errors
    ///
    /// Fails if the method is non-mutating.
    pub fn form(method: Method, url: Url, fields: &[(&str, &str)]) -> Result<Self> {
        Self::check_mutating(&method)?;
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        Ok(Self {
            method,
            url,
            body: Some(Body::Form(encoded)),
        })
    }

    fn check_mutating(method: &Method) -> Result<()> {
        if matches!(*method, Method::GET | Method::HEAD) {
            return Err(Error::InvalidUri(format!(
                "{method} requests cannot carry a body"
            )));
        }
        Ok(())
    }

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Resolved absolute URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Serialized body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Replaces the query string with the given pairs.
    pub fn set_query<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.url.set_query(None);
        let mut serializer = self.url.query_pairs_mut();
        for (key, value) in pairs {
            serializer.append_pair(key, value);
        }
        drop(serializer);
        if self.url.query() == Some("") {
            self.url.set_query(None);
        }
    }

    /// Appends a single query pair, keeping existing ones.
    pub fn append_query_pair(&mut self, key: &str, value: &str) {
        self.url.query_pairs_mut().append_pair(key, value);
    }
}

/// Resolves a URI reference against the configured base URL.
///
/// Standard RFC 3986 reference resolution: a path starting with `/` replaces
/// the base path entirely, relative segments merge with it.
pub(crate) fn resolve(base: &Url, reference: &str) -> Result<Url> {
    base.join(reference)
        .map_err(|err| Error::InvalidUri(format!("`{reference}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.nimbuscloud.com/v2/").unwrap()
    }

    #[test]
    fn resolve_relative_merges_paths() {
        let url = resolve(&base(), "instances").unwrap();
        assert_eq!(url.as_str(), "https://api.nimbuscloud.com/v2/instances");
    }

    #[test]
    fn resolve_rooted_replaces_path() {
        let url = resolve(&base(), "/v1/os/list").unwrap();
        assert_eq!(url.as_str(), "https://api.nimbuscloud.com/v1/os/list");
    }

    #[test]
    fn resolve_absolute_reference_wins() {
        let url = resolve(&base(), "https://other.example.com/x").unwrap();
        assert_eq!(url.host_str(), Some("other.example.com"));
    }

    #[test]
    fn resolve_reparses_to_expected_merge() {
        let url = resolve(&base(), "instances/abc/backups").unwrap();
        let reparsed = Url::parse(url.as_str()).unwrap();
        assert_eq!(reparsed.path(), "/v2/instances/abc/backups");
    }

    #[test]
    fn json_body_content_type() {
        let req = ApiRequest::json(
            Method::POST,
            base(),
            &serde_json::json!({"label": "web-1"}),
        )
        .unwrap();
        let body = req.body().unwrap();
        assert_eq!(body.content_type(), "application/json");
        assert_eq!(body.as_bytes(), br#"{"label":"web-1"}"#);
    }

    #[test]
    fn form_body_is_url_encoded() {
        let req = ApiRequest::form(
            Method::POST,
            base(),
            &[("server_id", "41"), ("label", "a b")],
        )
        .unwrap();
        let body = req.body().unwrap();
        assert_eq!(body.content_type(), "application/x-www-form-urlencoded");
        assert_eq!(body.as_bytes(), b"server_id=41&label=a+b");
    }

    #[test]
    fn get_rejects_body() {
        let err = ApiRequest::json(Method::GET, base(), &serde_json::json!({})).unwrap_err();
        assert!(matches!(err, Error::InvalidUri(_)));
    }

    #[test]
    fn set_query_replaces_existing() {
        let mut req = ApiRequest::new(Method::GET, base());
        req.set_query([("per_page", "25"), ("cursor", "abc")]);
        assert_eq!(req.url().query(), Some("per_page=25&cursor=abc"));

        req.set_query([("region", "ams")]);
        assert_eq!(req.url().query(), Some("region=ams"));
    }

    #[test]
    fn set_query_empty_clears() {
        let mut req = ApiRequest::new(Method::GET, base());
        req.set_query([("a", "1")]);
        req.set_query(std::iter::empty::<(&str, &str)>());
        assert_eq!(req.url().query(), None);
    }

    #[test]
    fn append_query_pair_keeps_existing() {
        let mut req = ApiRequest::new(Method::GET, base());
        req.set_query([("per_page", "25")]);
        req.append_query_pair("cursor", "abc");
        assert_eq!(req.url().query(), Some("per_page=25&cursor=abc"));
    }
}
