use chrono::ParseError as ChronoError;
use reqwest::Error as ReqwestError;
use serde_json::Error as JsonError;
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt::Display;
use std::io::Error as IoError;
use websockets::WebSocketError;

/// Discord API `Result` alias type.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Discord API error type.
///
/// The first few variants are the ones callers are expected to match on;
/// the rest wrap whatever the underlying crate that surfaced the failure
/// produced.
#[derive(Debug)]
pub enum Error {
    /// The supplied token was rejected. Fatal: reconnecting with the same
    /// token will fail the same way.
    InvalidAuthentication,
    /// The acting user/bot lacks the permission required for the request.
    NoPermission,
    /// The requested resource does not exist.
    NotFound,
    /// A rate limit error, with how many milliseconds to wait before retrying.
    RateLimited(u64),
    /// A network-level failure reaching Discord. The session manager treats
    /// this as transient and retries with backoff.
    Transport,

    /// A `reqwest` crate error
    Reqwest(ReqwestError),
    /// A `chrono` crate error
    Chrono(ChronoError),
    /// A `serde_json` crate error
    Json(JsonError),
    /// A `websockets` crate error
    WebSocket(WebSocketError),
    /// A `std::io` module error
    Io(IoError),
    /// A websocket connection was closed, possibly with a message
    Closed(Option<u16>, String),
    /// A json decoding error, with a description and the offending value
    Decode(&'static str, Value),
    /// A generic non-success response from the REST API
    Status(reqwest::StatusCode, Option<Value>),
    /// A Discord protocol error, with a description
    Protocol(&'static str),
    /// A miscellaneous error, with a description
    Other(&'static str),
}

impl Error {
    #[doc(hidden)]
    pub async fn from_response(response: reqwest::Response) -> Error {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidAuthentication;
        }
        if status == reqwest::StatusCode::FORBIDDEN {
            return Error::NoPermission;
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Error::NotFound;
        }

        let value = response
            .bytes()
            .await
            .ok()
            .map(|b| serde_json::from_slice(&b).ok())
            .flatten();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            if let Some(Value::Object(ref map)) = value {
                if let Some(delay) = map.get("retry_after").and_then(|v| v.as_u64()) {
                    return Error::RateLimited(delay);
                }
            }
            return Error::RateLimited(0);
        }
        Error::Status(status, value)
    }

    /// Whether this error represents a condition the session manager should
    /// retry after (reconnect with backoff) rather than surface to the caller.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Transport | Error::WebSocket(_) | Error::Io(_) | Error::Closed(_, _)
        )
    }
}

impl From<IoError> for Error {
    fn from(err: IoError) -> Error {
        Error::Io(err)
    }
}

impl From<ReqwestError> for Error {
    fn from(err: ReqwestError) -> Error {
        if err.is_connect() || err.is_timeout() {
            return Error::Transport;
        }
        Error::Reqwest(err)
    }
}

impl From<ChronoError> for Error {
    fn from(err: ChronoError) -> Error {
        Error::Chrono(err)
    }
}

impl From<JsonError> for Error {
    fn from(err: JsonError) -> Error {
        Error::Json(err)
    }
}

impl From<WebSocketError> for Error {
    fn from(err: WebSocketError) -> Error {
        Error::WebSocket(err)
    }
}

impl Display for Error {
    #[allow(deprecated)]
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match *self {
            Error::Reqwest(ref inner) => inner.fmt(f),
            Error::Chrono(ref inner) => inner.fmt(f),
            Error::Json(ref inner) => inner.fmt(f),
            Error::WebSocket(ref inner) => inner.fmt(f),
            Error::Io(ref inner) => inner.fmt(f),
            _ => f.write_str(self.description()),
        }
    }
}

impl StdError for Error {
    #[allow(deprecated)]
    fn description(&self) -> &str {
        match *self {
            Error::InvalidAuthentication => "Invalid authentication",
            Error::NoPermission => "Missing permission",
            Error::NotFound => "Not found",
            Error::RateLimited(_) => "Rate limited",
            Error::Transport => "Transport error",
            Error::Reqwest(ref inner) => inner.description(),
            Error::Chrono(ref inner) => inner.description(),
            Error::Json(ref inner) => inner.description(),
            Error::WebSocket(ref inner) => inner.description(),
            Error::Io(ref inner) => inner.description(),
            Error::Closed(_, _) => "Connection closed",
            Error::Decode(msg, _) | Error::Protocol(msg) | Error::Other(msg) => msg,
            Error::Status(status, _) => status
                .canonical_reason()
                .unwrap_or("Unknown bad HTTP status"),
        }
    }

    fn cause(&self) -> Option<&dyn StdError> {
        match *self {
            Error::Reqwest(ref inner) => Some(inner),
            Error::Chrono(ref inner) => Some(inner),
            Error::Json(ref inner) => Some(inner),
            Error::WebSocket(ref inner) => Some(inner),
            Error::Io(ref inner) => Some(inner),
            _ => None,
        }
    }
}

/// Extension trait for checking the status and discarding failed discord HTTP requests.
pub(crate) trait CheckStatus {
    /// Convert non-success hyper statuses to discord crate errors, tossing info.
    async fn check_status(self) -> Result<reqwest::Response>;
}

impl CheckStatus for reqwest::Result<reqwest::Response> {
    async fn check_status(self) -> Result<reqwest::Response> {
        let response = self?;
        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }
        Ok(response)
    }
}

/// Extension trait for checking the status dumping unexpected discord HTTP requests.
pub(crate) trait StatusChecks {
    /// Validate a request that is expected to return 204 No Content and print
    /// debug information if it does not.
    async fn insure_no_content(self) -> Result<()>;
}

impl StatusChecks for reqwest::Response {
    async fn insure_no_content(self) -> Result<()> {
        if self.status() != reqwest::StatusCode::NO_CONTENT {
            tracing::debug!("Expected 204 No Content, got {}", self.status());

            for (header_name, header_value) in self.headers().iter() {
                tracing::debug!("Header: {}: {:?}", header_name, header_value);
            }

            let content = self.bytes().await?;
            tracing::debug!("Content: {:?}", content);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_does_not_panic_for_every_variant() {
        let variants: Vec<Error> = vec![
            Error::InvalidAuthentication,
            Error::NoPermission,
            Error::NotFound,
            Error::RateLimited(250),
            Error::Transport,
            Error::Protocol("unexpected op 42"),
            Error::Closed(Some(4004), "auth failed".into()),
            Error::Decode("missing field", Value::Null),
            Error::Other("misc"),
        ];
        for err in variants {
            let _ = err.to_string();
        }
    }

    #[test]
    fn transport_like_errors_are_transient() {
        assert!(Error::Transport.is_transient());
        assert!(Error::Closed(None, String::new()).is_transient());
        assert!(!Error::InvalidAuthentication.is_transient());
        assert!(!Error::NotFound.is_transient());
    }
}
