//! Errors which can occur while building, sending or decoding requests.

use crate::hummingbird::ApiResponse;
use http::{Method, StatusCode};
use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use url::Url;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Crate specific error types.
#[derive(Clone, Debug)]
pub enum Error {
    /// The endpoint path could not be resolved against the base url, e.g. because it contains a
    /// `%` which isn't followed by two hex digits. No request was sent.
    InvalidUrl(ErrorContext),

    /// A request body or query could not be serialized. No request was sent.
    Encode(ErrorContext),

    /// Sending the request or receiving the response failed (connection refused, timeout, dns
    /// failure, ...). No response is available.
    Transport(ErrorContext),

    /// The api answered with a status code outside of `200..=299`.
    Status(ErrorResponse),

    /// The api answered successfully but the body doesn't match the expected shape. The context
    /// carries the raw response.
    Decode(ErrorContext),

    /// Generally malformed or invalid user input, or a struct misses data which is required for a
    /// follow-up request.
    Input(ErrorContext),
}

impl Error {
    /// The raw response which caused this error, if the api was reached at all.
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Error::Status(err) => Some(&err.response),
            Error::Decode(context) => context.response.as_deref(),
            _ => None,
        }
    }

    /// The http status code of the response which caused this error.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|r| r.status())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidUrl(context) => write!(f, "invalid url: {}", context),
            Error::Encode(context) => write!(f, "cannot encode request: {}", context),
            Error::Transport(context) => write!(f, "{}", context),
            Error::Status(err) => write!(f, "{}", err),
            Error::Decode(context) => write!(f, "cannot decode response: {}", context),
            Error::Input(context) => write!(f, "{}", context),
        }
    }
}

impl StdError for Error {}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Self::Encode(ErrorContext::new(err.to_string()))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let mut context = ErrorContext::new(err.to_string());
        if let Some(url) = err.url() {
            context = context.with_url(url);
        }

        if err.is_builder() {
            Error::InvalidUrl(context)
        } else if err.is_decode() {
            Error::Decode(context)
        } else {
            Error::Transport(context)
        }
    }
}

/// Information about an [`Error`].
#[derive(Clone, Debug)]
pub struct ErrorContext {
    pub message: String,
    pub url: Option<String>,
    pub value: Option<String>,
    pub response: Option<Box<ApiResponse>>,
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(url) = &self.url {
            write!(f, " ({})", url)?;
        }
        if let Some(value) = &self.value {
            write!(f, ": {}", value)?;
        }
        Ok(())
    }
}

impl From<String> for ErrorContext {
    fn from(string: String) -> Self {
        ErrorContext::new(string)
    }
}

impl From<&str> for ErrorContext {
    fn from(str: &str) -> Self {
        ErrorContext::new(str)
    }
}

impl ErrorContext {
    pub(crate) fn new<S: ToString>(message: S) -> Self {
        Self {
            message: message.to_string(),
            url: None,
            value: None,
            response: None,
        }
    }

    pub(crate) fn with_url<S: AsRef<str>>(mut self, url: S) -> Self {
        self.url = Some(url.as_ref().to_string());

        self
    }

    pub(crate) fn with_value(mut self, value: &[u8]) -> Self {
        self.value = Some(
            std::str::from_utf8(value)
                .unwrap_or("-- not displayable --")
                .to_string(),
        );

        self
    }

    pub(crate) fn with_response(mut self, response: ApiResponse) -> Self {
        self.response = Some(Box::new(response));

        self
    }
}

/// An api response with a status code outside of `200..=299`.
#[derive(Clone, Debug)]
pub struct ErrorResponse {
    pub method: Method,
    pub url: Url,
    pub status: StatusCode,
    /// Error message the api sent. Taken from the `error` field of a json object, a bare json
    /// string or the plain body text.
    pub message: String,
    /// The raw response. Can be used to inspect headers or the untouched body.
    pub response: ApiResponse,
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.method, self.url, self.status.as_u16())?;
        if !self.message.is_empty() {
            write!(f, " {}", self.message)?;
        }
        Ok(())
    }
}

impl StdError for ErrorResponse {}

/// Extracts a human readable message out of an error response body. The api usually sends
/// `{"error": "..."}`, some endpoints a bare json string or plain text.
pub(crate) fn extract_error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    if let Ok(err) = serde_json::from_slice::<ErrorBody>(body) {
        return err.error;
    }
    if let Ok(message) = serde_json::from_slice::<String>(body) {
        return message;
    }
    String::from_utf8_lossy(body).trim().to_string()
}
