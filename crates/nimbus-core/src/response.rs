//! Response decoding.
//!
//! Turns a raw HTTP response into either a decoded typed value or an
//! [`Error`]. The body is always read in full before any decision is made, so
//! the underlying connection is released on every exit path.
//!
//! Two body shapes get special treatment:
//!
//! - a successful response whose body is empty or exactly `[]` leaves the
//!   decoded value unset instead of forcing an array into a non-array target
//!   (several endpoints answer `[]` when no data exists);
//! - legacy list endpoints answer a JSON object keyed by identifier rather
//!   than an array; [`keyed_records`] flattens that shape.

use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{Error, Result};

/// A decoded response: the raw status and headers plus the typed value.
///
/// `value` is `None` when the server sent no decodable data (empty body,
/// empty-array body, or the no-target execution path).
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// HTTP status code of the response.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Decoded value, when the body carried one.
    pub value: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the decoded value, failing if the body carried none.
    ///
    /// # Errors
    ///
    /// Returns a decode error when the response body was empty.
    pub fn into_value(self) -> Result<T> {
        self.value
            .ok_or_else(|| Error::Decode("response body was empty".to_string()))
    }
}

/// Decodes a response into the caller-supplied target type.
pub(crate) async fn decode<T>(response: Response) -> Result<ApiResponse<T>>
where
    T: DeserializeOwned,
{
    let (status, headers, bytes) = read(response).await?;
    let body = trim_ascii(&bytes);
    if body.is_empty() || body == b"[]" {
        return Ok(ApiResponse {
            status,
            headers,
            value: None,
        });
    }

    let value = serde_json::from_slice(body).map_err(|err| Error::Decode(err.to_string()))?;
    Ok(ApiResponse {
        status,
        headers,
        value: Some(value),
    })
}

/// Consumes a response without decoding (delete/action endpoints).
pub(crate) async fn discard(response: Response) -> Result<ApiResponse<()>> {
    let (status, headers, _bytes) = read(response).await?;
    Ok(ApiResponse {
        status,
        headers,
        value: None,
    })
}

/// Reads the full body and classifies non-success statuses.
///
/// On a non-2xx status the raw body text becomes the error message verbatim;
/// error payload shapes are inconsistent across API versions, so no JSON
/// structure is assumed.
async fn read(response: Response) -> Result<(StatusCode, HeaderMap, Vec<u8>)> {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.bytes().await?.to_vec();

    if !status.is_success() {
        let body = String::from_utf8_lossy(&bytes).into_owned();
        debug!(status = %status, "request rejected by API");
        return Err(Error::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok((status, headers, bytes))
}

/// Flattens a legacy keyed-object listing into records.
///
/// Older endpoints return `{"<id>": {...}, "<id>": {...}}` instead of an
/// array. Records come back in ascending key order so consumers see a
/// deterministic sequence.
#[must_use]
pub fn keyed_records<T>(map: BTreeMap<String, T>) -> Vec<T> {
    map.into_values().collect()
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: String,
    }

    async fn fetch(server: &MockServer, route: &str) -> Response {
        reqwest::Client::new()
            .get(format!("{}{route}", server.uri()))
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn decodes_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "web-1"})))
            .mount(&server)
            .await;

        let decoded: ApiResponse<Payload> = decode(fetch(&server, "/ok").await).await.unwrap();
        assert_eq!(decoded.status, StatusCode::OK);
        assert_eq!(
            decoded.value,
            Some(Payload {
                name: "web-1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn empty_array_body_leaves_value_unset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let decoded: ApiResponse<Payload> = decode(fetch(&server, "/empty").await).await.unwrap();
        assert!(decoded.value.is_none());
    }

    #[tokio::test]
    async fn empty_body_leaves_value_unset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/none"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let decoded: ApiResponse<Payload> = decode(fetch(&server, "/none").await).await.unwrap();
        assert!(decoded.value.is_none());
        assert!(decoded.into_value().is_err());
    }

    #[tokio::test]
    async fn non_success_surfaces_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/limited"))
            .respond_with(ResponseTemplate::new(503).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = decode::<Payload>(fetch(&server, "/limited").await)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn malformed_json_reports_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bad"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = decode::<Payload>(fetch(&server, "/bad").await)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn discard_skips_decoding_entirely() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/raw"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain text, not json"))
            .mount(&server)
            .await;

        let decoded = discard(fetch(&server, "/raw").await).await.unwrap();
        assert!(decoded.value.is_none());
        assert_eq!(decoded.status, StatusCode::OK);
    }

    #[test]
    fn keyed_records_sorted_by_key() {
        let mut map = BTreeMap::new();
        map.insert("167".to_string(), "older");
        map.insert("124".to_string(), "oldest");
        map.insert("401".to_string(), "newest");

        assert_eq!(keyed_records(map), vec!["oldest", "older", "newest"]);
    }

    #[test]
    fn trim_ascii_strips_whitespace() {
        assert_eq!(trim_ascii(b"  [] \n"), b"[]");
        assert_eq!(trim_ascii(b"   \n"), b"");
        assert_eq!(trim_ascii(b"{}"), b"{}");
    }
}
