//! The `Client` composition point used by every resource handler.
//!
//! A [`Client`] owns the configuration (base URL, API key, user agent, rate
//! interval, timeout), the injected [`Pacer`] and the underlying
//! [`reqwest::Client`]. Resource handlers build an
//! [`ApiRequest`](crate::request::ApiRequest) through it and hand the request
//! back to [`Client::execute`], which paces the dispatch, performs the round
//! trip and decodes the response.
//!
//! Clones share all mutable configuration, so a fleet of resource service
//! objects holding clones of one client is paced collectively and observes
//! setter calls made through any of them. Setters are last-write-wins;
//! callers needing stricter consistency must serialize configuration changes
//! themselves.

use crate::error::{Error, Result};
use crate::limiter::{IntervalPacer, Pacer, DEFAULT_RATE_INTERVAL};
use crate::request::{resolve, ApiRequest};
use crate::response::{self, ApiResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.nimbuscloud.com";

/// Default user-agent header value.
pub const DEFAULT_USER_AGENT: &str = concat!("nimbus-rs/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "API-Key";

/// Default request deadline, covering pacing and the network round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`Client`].
#[derive(Clone)]
pub struct ClientBuilder {
    api_key: SecretString,
    base_url: Option<Url>,
    user_agent: String,
    rate_interval: Duration,
    timeout: Duration,
    http: Option<reqwest::Client>,
    pacer: Option<Arc<dyn Pacer>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("rate_interval", &self.rate_interval)
            .field("timeout", &self.timeout)
            .field("http", &self.http)
            .field("pacer", &self.pacer.as_ref().map(|_| "<pacer>"))
            .finish()
    }
}

impl ClientBuilder {
    /// Create a builder holding the required API key and defaults for
    /// everything else.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            rate_interval: DEFAULT_RATE_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            http: None,
            pacer: None,
        }
    }

    /// Override the base URL.
    ///
    /// # Errors
    ///
    /// Fails when the value is not a valid absolute URL.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(parse_base_url(base_url.as_ref())?);
        Ok(self)
    }

    /// Override the user-agent header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the pacing interval between consecutive requests.
    #[must_use]
    pub const fn with_rate_interval(mut self, interval: Duration) -> Self {
        self.rate_interval = interval;
        self
    }

    /// Override the request deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supply an existing HTTP transport instead of building one.
    ///
    /// The transport is shared with the caller; connection pooling and TLS
    /// behaviour stay whatever the caller configured.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Supply a custom pacing component.
    #[must_use]
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = Some(pacer);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP transport cannot be constructed.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => parse_base_url(DEFAULT_BASE_URL)?,
        };

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()
                .map_err(|err| Error::Config(format!("Failed to build HTTP client: {err}")))?,
        };

        let pacer = self
            .pacer
            .unwrap_or_else(|| Arc::new(IntervalPacer::new(self.rate_interval)));

        Ok(Client {
            http,
            api_key: self.api_key,
            base_url: Arc::new(RwLock::new(base_url)),
            user_agent: Arc::new(RwLock::new(self.user_agent)),
            pacer,
            timeout: self.timeout,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url =
        Url::parse(raw).map_err(|err| Error::InvalidUri(format!("Invalid base URL `{raw}`: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUri(format!(
            "Base URL `{raw}` cannot serve as a base"
        )));
    }
    Ok(url)
}

/// Shared transport core for the Nimbus API.
///
/// Cheap to clone; clones share configuration and pacing state.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: Arc<RwLock<Url>>,
    user_agent: Arc<RwLock<String>>,
    pacer: Arc<dyn Pacer>,
    timeout: Duration,
}

impl Client {
    /// Construct a client with default configuration.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP transport cannot be constructed.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Start a builder.
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Current base URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current user-agent value.
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.user_agent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current pacing interval.
    #[must_use]
    pub fn rate_interval(&self) -> Duration {
        self.pacer.interval()
    }

    /// Replace the base URL.
    ///
    /// # Errors
    ///
    /// Fails when the value is not a valid absolute URL; the previous base
    /// URL stays in effect.
    pub fn set_base_url(&self, base_url: impl AsRef<str>) -> Result<()> {
        let url = parse_base_url(base_url.as_ref())?;
        *self
            .base_url
            .write()
            .unwrap_or_else(PoisonError::into_inner) = url;
        Ok(())
    }

    /// Replace the user-agent value.
    pub fn set_user_agent(&self, user_agent: impl Into<String>) {
        *self
            .user_agent
            .write()
            .unwrap_or_else(PoisonError::into_inner) = user_agent.into();
    }

    /// Replace the pacing interval.
    pub fn set_rate_interval(&self, interval: Duration) {
        self.pacer.set_interval(interval);
    }

    /// Build a body-less request for the given method and URI reference.
    ///
    /// # Errors
    ///
    /// Fails when the reference does not resolve against the base URL.
    pub fn request(&self, method: Method, path: &str) -> Result<ApiRequest> {
        let url = resolve(&self.base_url(), path)?;
        Ok(ApiRequest::new(method, url))
    }

    /// Build a request carrying a JSON body (current endpoints).
    ///
    /// # Errors
    ///
    /// Fails on an unresolvable reference, a non-mutating method, or an
    /// unserializable payload.
    pub fn request_json<B>(&self, method: Method, path: &str, payload: &B) -> Result<ApiRequest>
    where
        B: Serialize + ?Sized,
    {
        let url = resolve(&self.base_url(), path)?;
        ApiRequest::json(method, url, payload)
    }

    /// Build a request carrying a URL-encoded form body (legacy endpoints).
    ///
    /// # Errors
    ///
    /// Fails on an unresolvable reference or a non-mutating method.
    pub fn request_form(
        &self,
        method: Method,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<ApiRequest> {
        let url = resolve(&self.base_url(), path)?;
        ApiRequest::form(method, url, fields)
    }

    /// Execute a request and decode the response into `T`.
    ///
    /// The whole call (pacing wait, round trip, body read) runs under the
    /// configured deadline. The decoded value is `None` when the server sent
    /// an empty or empty-array body.
    ///
    /// # Errors
    ///
    /// Surfaces transport failures, deadline expiry, decode failures and
    /// non-2xx API statuses.
    pub async fn execute<T>(&self, request: ApiRequest) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        self.with_deadline(async {
            let http_response = self.dispatch(request).await?;
            response::decode(http_response).await
        })
        .await
    }

    /// Execute a request whose response body is not decoded at all
    /// (delete/action endpoints).
    ///
    /// # Errors
    ///
    /// Surfaces transport failures, deadline expiry and non-2xx statuses.
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<ApiResponse<()>> {
        self.with_deadline(async {
            let http_response = self.dispatch(request).await?;
            response::discard(http_response).await
        })
        .await
    }

    async fn with_deadline<T>(
        &self,
        call: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| Error::Timeout(format!("no response within {:?}", self.timeout)))?
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<reqwest::Response> {
        self.pacer.acquire().await;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(method = %method, url = %url, "dispatching request");

        // Auth and user-agent reflect the configuration current at dispatch,
        // not at build time.
        let mut builder = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .header(USER_AGENT, self.user_agent())
            .header(ACCEPT, "application/json");

        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, body.content_type())
                .body(body.as_bytes().to_vec());
        }

        Ok(builder.send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limiter::MockPacer;
    use serde_json::{json, Value};
    use std::time::Instant;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> Client {
        Client::builder("test-key")
            .with_base_url(server.uri())
            .unwrap()
            .with_rate_interval(Duration::from_millis(1))
            .build()
            .unwrap()
    }

    #[test]
    fn invalid_base_url_rejected() {
        let err = Client::builder("k").with_base_url("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUri(_)));

        let client = Client::new("k").unwrap();
        assert!(client.set_base_url("::::").is_err());
        assert_eq!(client.base_url().as_str(), "https://api.nimbuscloud.com/");
    }

    #[test]
    fn request_resolves_against_base() {
        let client = Client::new("k").unwrap();
        let request = client.request(Method::GET, "/v2/instances").unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.nimbuscloud.com/v2/instances"
        );
    }

    #[tokio::test]
    async fn headers_reflect_configuration_at_dispatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(header("User-Agent", "updated/2.0"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = client.request(Method::GET, "/v2/account").unwrap();

        // Mutated after the request was built; dispatch must pick it up.
        client.set_user_agent("updated/2.0");

        let response: ApiResponse<Value> = client.execute(request).await.unwrap();
        assert!(response.value.is_some());
    }

    #[tokio::test]
    async fn query_mutation_before_execute() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/instances"))
            .and(query_param("per_page", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"instances": []})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut request = client.request(Method::GET, "/v2/instances").unwrap();
        request.set_query([("per_page", "25")]);

        let response: ApiResponse<Value> = client.execute(request).await.unwrap();
        assert!(response.value.is_some());
    }

    #[tokio::test]
    async fn form_body_dispatched_with_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/server/reboot"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string("server_id=41"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = client
            .request_form(Method::POST, "/v1/server/reboot", &[("server_id", "41")])
            .unwrap();
        let response = client.execute_empty(request).await.unwrap();
        assert!(response.value.is_none());
    }

    #[tokio::test]
    async fn empty_array_body_decodes_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/backups"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = client.request(Method::GET, "/v2/backups").unwrap();
        let response: ApiResponse<Value> = client.execute(request).await.unwrap();
        assert!(response.value.is_none());
    }

    #[tokio::test]
    async fn missing_resource_surfaces_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/instances/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = client.request(Method::GET, "/v2/instances/gone").unwrap();
        let err = client.execute::<Value>(request).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "not found");
    }

    #[tokio::test]
    async fn sequential_calls_are_paced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = Client::builder("test-key")
            .with_base_url(server.uri())
            .unwrap()
            .with_rate_interval(Duration::from_millis(50))
            .build()
            .unwrap();

        let start = Instant::now();
        for _ in 0..3 {
            let request = client.request(Method::GET, "/v2/account").unwrap();
            let _: ApiResponse<Value> = client.execute(request).await.unwrap();
        }
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn deadline_expiry_fails_with_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = Client::builder("test-key")
            .with_base_url(server.uri())
            .unwrap()
            .with_rate_interval(Duration::from_millis(1))
            .with_timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let request = client.request(Method::GET, "/v2/account").unwrap();
        let err = client.execute::<Value>(request).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[tokio::test]
    async fn pacer_acquired_once_per_dispatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let mut pacer = MockPacer::new();
        pacer.expect_acquire().times(2).returning(|| ());

        let client = Client::builder("test-key")
            .with_base_url(server.uri())
            .unwrap()
            .with_pacer(Arc::new(pacer))
            .build()
            .unwrap();

        for _ in 0..2 {
            let request = client.request(Method::GET, "/v2/account").unwrap();
            let _: ApiResponse<Value> = client.execute(request).await.unwrap();
        }
    }

    #[tokio::test]
    async fn clones_share_configuration() {
        let client = Client::new("k").unwrap();
        let clone = client.clone();

        clone.set_user_agent("shared/1.0");
        assert_eq!(client.user_agent(), "shared/1.0");

        clone.set_base_url("https://staging.nimbuscloud.com").unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://staging.nimbuscloud.com/"
        );
    }

    #[test]
    fn api_key_not_leaked_by_secret_type() {
        let key = SecretString::from("super-secret".to_string());
        assert!(!format!("{key:?}").contains("super-secret"));
    }
}
