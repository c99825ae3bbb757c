//! Builder and access to the [`Hummingbird`] struct which is required to make any request.

use crate::error::{extract_error_message, Error, ErrorContext, ErrorResponse};
use crate::{Request, Result};
use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, field, instrument, warn, Span};
use url::Url;

/// Root of the hummingbird service. All endpoint paths carry the `api/v1/` prefix themselves.
pub const DEFAULT_BASE_URL: &str = "http://hummingbird.me/";

/// Starting point of this whole library.
#[derive(Clone, Debug)]
pub struct Hummingbird {
    pub(crate) executor: Arc<Executor>,
}

impl Default for Hummingbird {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Hummingbird {
    pub fn builder() -> HummingbirdBuilder {
        HummingbirdBuilder::default()
    }

    /// Return the (cloned) [`Client`] which is internally used to make requests.
    pub fn client(&self) -> Client {
        self.executor.client.clone()
    }

    /// The base url every endpoint path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.executor.base_url
    }

    /// Return the cached authentication token. It is set by [`Hummingbird::authenticate`],
    /// [`HummingbirdBuilder::login_with_credentials`] and [`HummingbirdBuilder::login_with_token`].
    pub async fn auth_token(&self) -> Option<String> {
        self.executor.auth_token.read().await.clone()
    }

    /// Replace the cached authentication token.
    pub async fn set_auth_token<S: Into<String>>(&self, token: S) {
        *self.executor.auth_token.write().await = Some(token.into());
    }

    /// Remove the cached authentication token. Methods which require authentication will then
    /// only work if a token is passed to them explicitly.
    pub async fn clear_auth_token(&self) {
        *self.executor.auth_token.write().await = None;
    }

    /// Build a request to `path`, resolved against [`Hummingbird::base_url`]. Attach a body with
    /// [`ApiRequest::json`] and query parameters with [`ApiRequest::query`]. Nothing is sent until
    /// the request is passed to [`Hummingbird::execute`] or [`Hummingbird::execute_raw`].
    ///
    /// Path segments are not escaped, a `%` which isn't followed by two hex digits results in
    /// [`Error::InvalidUrl`].
    pub fn request(&self, method: Method, path: &str) -> Result<ApiRequest> {
        ApiRequest::new(&self.executor.base_url, method, path)
    }

    /// Send a request and decode the (successful) response body into `T`. The raw response is
    /// returned alongside the decoded value; on error it's accessible via [`Error::response`].
    ///
    /// Resource methods (e.g. [`Hummingbird::anime`]) discard the response of successful
    /// requests, use this to read its status or headers.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<(T, ApiResponse)> {
        self.executor.execute(request).await
    }

    /// Send a request without decoding the response body.
    pub async fn execute_raw(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.executor.execute_raw(request).await
    }
}

/// A request which is ready to be sent. Build it with [`Hummingbird::request`].
#[derive(Clone, Debug)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    body: Option<Bytes>,
}

impl ApiRequest {
    pub(crate) fn new(base_url: &Url, method: Method, path: &str) -> Result<Self> {
        check_escapes(path)?;
        let url = base_url.join(path).map_err(|e| {
            Error::InvalidUrl(ErrorContext::new(e.to_string()).with_url(path))
        })?;

        Ok(Self {
            method,
            url,
            body: None,
        })
    }

    /// Set the query string. Any existing query is replaced, not merged.
    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(query)?;
        if encoded.is_empty() {
            self.url.set_query(None)
        } else {
            self.url.set_query(Some(&encoded))
        }

        Ok(self)
    }

    /// Serialize `body` as json (followed by a newline) and use it as request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let mut buf = serde_json::to_vec(body).map_err(|e| {
            Error::Encode(ErrorContext::new(e.to_string()).with_url(self.url.as_str()))
        })?;
        buf.push(b'\n');
        self.body = Some(Bytes::from(buf));

        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// `application/json` if the request has a body.
    pub fn content_type(&self) -> Option<&'static str> {
        self.body.as_ref().map(|_| "application/json")
    }

    pub(crate) fn into_reqwest(self) -> reqwest::Request {
        let mut request = reqwest::Request::new(self.method, self.url);
        request
            .headers_mut()
            .insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = self.body {
            request
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *request.body_mut() = Some(body.into());
        }
        request
    }
}

/// Checks that every `%` in `path` starts a valid percent escape.
fn check_escapes(path: &str) -> Result<()> {
    let bytes = path.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'%' {
            continue;
        }
        let valid = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            let escape = &bytes[i..(i + 3).min(bytes.len())];
            return Err(Error::InvalidUrl(
                ErrorContext::new(format!(
                    "invalid url escape \"{}\"",
                    String::from_utf8_lossy(escape)
                ))
                .with_url(path),
            ));
        }
    }
    Ok(())
}

/// The raw response of a request.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as (lossy converted) utf-8 text.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

static DEFAULT_EXECUTOR: Lazy<Arc<Executor>> =
    Lazy::new(|| HummingbirdBuilder::default().build().executor);

/// Executor which is used by structs which were constructed via [`Default`] or deserialized
/// without being requested through an executor.
pub(crate) fn default_executor() -> Arc<Executor> {
    DEFAULT_EXECUTOR.clone()
}

/// Internal struct to execute all request with.
pub struct Executor {
    pub(crate) client: Client,
    pub(crate) base_url: Url,

    /// Token of the last successful authentication. Library changes fall back to it if no token
    /// is given explicitly.
    pub(crate) auth_token: RwLock<Option<String>>,

    #[cfg(feature = "tower")]
    pub(crate) middleware: Option<tokio::sync::Mutex<crate::internal::tower::Middleware>>,
}

impl Debug for Executor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("client", &self.client)
            .field("base_url", &self.base_url.as_str())
            .field("auth_token", &"<hidden>")
            .finish()
    }
}

impl Executor {
    pub(crate) fn get<S: AsRef<str>>(self: &Arc<Self>, path: S) -> Result<ExecutorRequestBuilder> {
        self.builder(Method::GET, path.as_ref())
    }

    pub(crate) fn post<S: AsRef<str>>(self: &Arc<Self>, path: S) -> Result<ExecutorRequestBuilder> {
        self.builder(Method::POST, path.as_ref())
    }

    fn builder(self: &Arc<Self>, method: Method, path: &str) -> Result<ExecutorRequestBuilder> {
        Ok(ExecutorRequestBuilder::new(
            self.clone(),
            ApiRequest::new(&self.base_url, method, path)?,
        ))
    }

    /// Return `explicit` if set, otherwise the cached token. Falls back to an empty token which
    /// the api rejects with `401`.
    pub(crate) async fn resolve_auth_token(&self, explicit: Option<String>) -> String {
        if let Some(token) = explicit {
            return token;
        }
        self.auth_token.read().await.clone().unwrap_or_default()
    }

    #[instrument(
        name = "api_request",
        skip_all,
        fields(
            http.method = %request.method,
            http.url = %request.url,
            http.status_code = field::Empty,
        )
    )]
    pub(crate) async fn execute_raw(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method.clone();
        let url = request.url.clone();

        let resp = self.send(request.into_reqwest()).await.map_err(|e| {
            warn!(error = %e, "sending request failed");
            e
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        Span::current().record("http.status_code", status.as_u16());

        // reading the whole body consumes and releases the connection
        let body = resp.bytes().await.map_err(|e| {
            warn!(error = %e, "reading response body failed");
            Error::Transport(
                ErrorContext::new(format!("cannot read response body: {}", e)).with_url(&url),
            )
        })?;
        let response = ApiResponse::new(status, headers, body);

        if !status.is_success() {
            let message = extract_error_message(response.body());
            debug!(%message, "api returned error status");
            return Err(Error::Status(ErrorResponse {
                method,
                url,
                status,
                message,
                response,
            }));
        }

        debug!(bytes = response.body().len(), "request successful");
        Ok(response)
    }

    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<(T, ApiResponse)> {
        let url = request.url.to_string();
        let response = self.execute_raw(request).await?;

        let value = serde_json::from_slice::<T>(response.body()).map_err(|e| {
            Error::Decode(
                ErrorContext::new(e.to_string())
                    .with_url(&url)
                    .with_value(response.body())
                    .with_response(response.clone()),
            )
        })?;
        Ok((value, response))
    }

    /// Execute `request` and hand this executor to the decoded value, so that it can make
    /// follow-up requests itself.
    pub(crate) async fn request<T: Request + DeserializeOwned>(
        self: &Arc<Self>,
        request: ApiRequest,
    ) -> Result<T> {
        let (mut value, _): (T, _) = self.execute(request).await?;
        value.__set_executor(self.clone());

        Ok(value)
    }

    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        #[cfg(feature = "tower")]
        if let Some(middleware) = &self.middleware {
            // the future doesn't borrow the middleware, so the lock is released before awaiting it
            let future = {
                let mut middleware = middleware.lock().await;
                middleware.ready().await?;
                middleware.call(request)
            };
            return future.await;
        }

        Ok(self.client.execute(request).await?)
    }
}

pub(crate) struct ExecutorRequestBuilder {
    executor: Arc<Executor>,
    request: ApiRequest,
}

impl ExecutorRequestBuilder {
    pub(crate) fn new(executor: Arc<Executor>, request: ApiRequest) -> Self {
        Self { executor, request }
    }

    pub(crate) fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Result<Self> {
        self.request = self.request.query(query)?;

        Ok(self)
    }

    pub(crate) fn json<T: Serialize + ?Sized>(mut self, json: &T) -> Result<Self> {
        self.request = self.request.json(json)?;

        Ok(self)
    }

    pub(crate) async fn request<T: Request + DeserializeOwned>(self) -> Result<T> {
        self.executor.request(self.request).await
    }
}

/// A builder to construct a new [`Hummingbird`] instance. To create it, call
/// [`Hummingbird::builder`].
pub struct HummingbirdBuilder {
    client: Client,
    base_url: Url,

    #[cfg(feature = "tower")]
    middleware: Option<crate::internal::tower::Middleware>,
}

impl Default for HummingbirdBuilder {
    fn default() -> Self {
        Self {
            client: HummingbirdBuilder::predefined_client_builder()
                .build()
                .unwrap_or_default(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            #[cfg(feature = "tower")]
            middleware: None,
        }
    }
}

impl HummingbirdBuilder {
    /// Return a [`ClientBuilder`] with the configurations this crate uses by default. Use it as
    /// base if you want to configure timeouts, proxies or tls and pass the built client to
    /// [`HummingbirdBuilder::client`].
    pub fn predefined_client_builder() -> ClientBuilder {
        Client::builder().user_agent(concat!("hummingbird-rs/", env!("CARGO_PKG_VERSION")))
    }

    /// Set a custom client that will be used in all api requests.
    pub fn client(mut self, client: Client) -> HummingbirdBuilder {
        self.client = client;
        self
    }

    /// Set the url every endpoint path is resolved against. Defaults to [`DEFAULT_BASE_URL`].
    /// Resolution follows the standard url reference rules, so a base with a path should end
    /// with `/`.
    pub fn base_url(mut self, base_url: Url) -> HummingbirdBuilder {
        self.base_url = base_url;
        self
    }

    /// Send all requests through a [`tower_service::Service`] instead of the client set via
    /// [`HummingbirdBuilder::client`]. Errors of the service are reported as
    /// [`Error::Transport`].
    #[cfg(feature = "tower")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tower")))]
    pub fn middleware<S>(mut self, service: S) -> HummingbirdBuilder
    where
        S: tower_service::Service<reqwest::Request, Response = reqwest::Response>
            + Send
            + 'static,
        S::Error: std::error::Error + Send + Sync + 'static,
        S::Future: Send + 'static,
    {
        self.middleware = Some(crate::internal::tower::Middleware::new(service));
        self
    }

    /// Build an instance without authentication. Everything except library changes works without
    /// it.
    pub fn build(self) -> Hummingbird {
        self.into_hummingbird(None)
    }

    /// Build an instance with an already acquired authentication token.
    pub fn login_with_token<S: Into<String>>(self, token: S) -> Hummingbird {
        self.into_hummingbird(Some(token.into()))
    }

    /// Authenticate with the given credentials and build an instance which caches the returned
    /// token.
    pub async fn login_with_credentials(
        self,
        credentials: &crate::user::Credentials,
    ) -> Result<Hummingbird> {
        let hummingbird = self.build();
        hummingbird.authenticate(credentials).await?;

        Ok(hummingbird)
    }

    fn into_hummingbird(self, auth_token: Option<String>) -> Hummingbird {
        Hummingbird {
            executor: Arc::new(Executor {
                client: self.client,
                base_url: self.base_url,
                auth_token: RwLock::new(auth_token),
                #[cfg(feature = "tower")]
                middleware: self.middleware.map(tokio::sync::Mutex::new),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:3000/").unwrap()
    }

    #[test]
    fn path_is_resolved_against_base() {
        let req = ApiRequest::new(&base(), Method::GET, "api/v1/anime/log-horizon").unwrap();
        assert_eq!(
            req.url().as_str(),
            "http://localhost:3000/api/v1/anime/log-horizon"
        );
        assert!(req.body().is_none());
        assert!(req.content_type().is_none());
    }

    #[test]
    fn absolute_path_replaces_base_path() {
        let base = Url::parse("http://localhost:3000/api/v1/").unwrap();
        let req = ApiRequest::new(&base, Method::GET, "/foo").unwrap();
        assert_eq!(req.url().as_str(), "http://localhost:3000/foo");

        let req = ApiRequest::new(&base, Method::GET, "foo").unwrap();
        assert_eq!(req.url().as_str(), "http://localhost:3000/api/v1/foo");
    }

    #[test]
    fn malformed_escape_is_rejected() {
        for path in ["%foo", "api/v1/anime/%", "api/v1/anime/%4", "a%zz"] {
            let result = ApiRequest::new(&base(), Method::GET, path);
            assert!(
                matches!(result, Err(Error::InvalidUrl(_))),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn valid_escape_is_accepted() {
        let req = ApiRequest::new(&base(), Method::GET, "api/v1/users/some%20one").unwrap();
        assert_eq!(
            req.url().as_str(),
            "http://localhost:3000/api/v1/users/some%20one"
        );
    }

    #[test]
    fn json_body_ends_with_single_newline() {
        #[derive(Serialize)]
        struct Body {
            name: String,
        }

        let req = ApiRequest::new(&base(), Method::POST, "foo")
            .unwrap()
            .json(&Body {
                name: "TestUser".to_string(),
            })
            .unwrap();
        assert_eq!(req.body(), Some("{\"name\":\"TestUser\"}\n".as_bytes()));
        assert_eq!(req.content_type(), Some("application/json"));

        let reqwest_req = req.into_reqwest();
        assert_eq!(
            reqwest_req.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn unserializable_body_is_encode_error() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], "value");

        let result = ApiRequest::new(&base(), Method::POST, "foo")
            .unwrap()
            .json(&map);
        assert!(matches!(result, Err(Error::Encode(_))));
    }

    #[test]
    fn query_replaces_existing_query() {
        let req = ApiRequest::new(&base(), Method::GET, "api/v1/search/anime?query=old&x=1")
            .unwrap()
            .query(&[("query", "log horizon")])
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "http://localhost:3000/api/v1/search/anime?query=log+horizon"
        );

        let req = req.query(&[("status", "completed")]).unwrap();
        assert_eq!(req.url().query(), Some("status=completed"));
    }

    #[test]
    fn empty_query_removes_query() {
        let empty: [(&str, &str); 0] = [];
        let req = ApiRequest::new(&base(), Method::GET, "foo?bar=baz")
            .unwrap()
            .query(&empty)
            .unwrap();
        assert_eq!(req.url().query(), None);
    }
}
