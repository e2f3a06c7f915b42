use http::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Possible errors when talking to the Path of Exile API through `poeapi_lib`
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The configured API host is not a bare `host[:port]` authority
    #[error("Invalid API host: `{0}`")]
    InvalidHost(String),

    /// The configured poe.ninja host is not a bare `host[:port]` authority
    #[error("Invalid poe.ninja host: `{0}`")]
    InvalidNinjaHost(String),

    /// The response cache must be able to hold at least one entry
    #[error("Invalid cache size {0}, the cache must hold at least one entry")]
    InvalidCacheSize(usize),

    /// The standard rate limit must allow at least one request per second
    #[error("Invalid rate limit {0}, expected at least one request per second")]
    InvalidRateLimit(u32),

    /// The stash rate limit must allow at least one request per second
    #[error("Invalid stash rate limit {0}, expected at least one request per second")]
    InvalidStashRateLimit(u32),

    /// Requests must be allowed to run for at least one millisecond
    #[error("Invalid request timeout {0:?}, expected at least 1ms")]
    InvalidRequestTimeout(Duration),

    /// The underlying HTTP client could not be built
    #[error("Failed to create a request client")]
    BuildRequestClient(#[source] reqwest::Error),

    /// The given string can not be parsed into a valid URL
    #[error("Cannot parse string `{1}` as URL: {0}")]
    ParseUrl(#[source] url::ParseError, String),

    /// Transport failure: connection refused, timeout, protocol violation or
    /// redirect handling
    #[error("Network error: {0}")]
    NetworkRequest(#[source] reqwest::Error),

    /// The response body could not be read as text
    #[error("Error reading response body: {0}")]
    ReadResponseBody(#[source] reqwest::Error),

    /// The API answered `400 Bad Request`
    #[error("Bad request (400)")]
    BadRequest,

    /// The API answered `404 Not Found`
    #[error("Resource not found (404)")]
    NotFound,

    /// The API answered `429 Too Many Requests`
    #[error("Rate limited by the API (429)")]
    RateLimited,

    /// The API answered `500 Internal Server Error`
    #[error("API server failure (500)")]
    ServerFailure,

    /// The API answered with a status code this client does not handle
    #[error("Unknown API failure ({0})")]
    UnknownFailure(StatusCode),
}

impl ErrorKind {
    /// Returns `true` if the underlying request timed out
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::NetworkRequest(e) | Self::ReadResponseBody(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if the error was derived from an HTTP status code
    /// rather than from configuration or transport
    #[must_use]
    pub const fn is_http_status(&self) -> bool {
        matches!(
            self,
            Self::BadRequest
                | Self::NotFound
                | Self::RateLimited
                | Self::ServerFailure
                | Self::UnknownFailure(_)
        )
    }

    /// Returns the HTTP status code behind this error, if any
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::BadRequest => Some(StatusCode::BAD_REQUEST),
            Self::NotFound => Some(StatusCode::NOT_FOUND),
            Self::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
            Self::ServerFailure => Some(StatusCode::INTERNAL_SERVER_ERROR),
            Self::UnknownFailure(code) => Some(*code),
            Self::NetworkRequest(e) | Self::ReadResponseBody(e) => e.status(),
            _ => None,
        }
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidHost(h1), Self::InvalidHost(h2))
            | (Self::InvalidNinjaHost(h1), Self::InvalidNinjaHost(h2)) => h1 == h2,
            (Self::InvalidCacheSize(s1), Self::InvalidCacheSize(s2)) => s1 == s2,
            (Self::InvalidRateLimit(r1), Self::InvalidRateLimit(r2))
            | (Self::InvalidStashRateLimit(r1), Self::InvalidStashRateLimit(r2)) => r1 == r2,
            (Self::InvalidRequestTimeout(t1), Self::InvalidRequestTimeout(t2)) => t1 == t2,
            (Self::BuildRequestClient(e1), Self::BuildRequestClient(e2))
            | (Self::NetworkRequest(e1), Self::NetworkRequest(e2))
            | (Self::ReadResponseBody(e1), Self::ReadResponseBody(e2)) => {
                e1.to_string() == e2.to_string()
            }
            (Self::ParseUrl(e1, s1), Self::ParseUrl(e2, s2)) => e1 == e2 && s1 == s2,
            (Self::UnknownFailure(c1), Self::UnknownFailure(c2)) => c1 == c2,
            (Self::BadRequest, Self::BadRequest)
            | (Self::NotFound, Self::NotFound)
            | (Self::RateLimited, Self::RateLimited)
            | (Self::ServerFailure, Self::ServerFailure) => true,
            _ => false,
        }
    }
}

impl Eq for ErrorKind {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_errors_compare_by_kind() {
        assert_eq!(ErrorKind::NotFound, ErrorKind::NotFound);
        assert_ne!(ErrorKind::NotFound, ErrorKind::BadRequest);
        assert_eq!(
            ErrorKind::UnknownFailure(StatusCode::IM_A_TEAPOT),
            ErrorKind::UnknownFailure(StatusCode::IM_A_TEAPOT)
        );
        assert_ne!(
            ErrorKind::UnknownFailure(StatusCode::IM_A_TEAPOT),
            ErrorKind::UnknownFailure(StatusCode::BAD_GATEWAY)
        );
    }

    #[test]
    fn test_configuration_errors_keep_their_value() {
        assert_eq!(ErrorKind::InvalidRateLimit(0), ErrorKind::InvalidRateLimit(0));
        // Same value, different setting
        assert_ne!(
            ErrorKind::InvalidRateLimit(0),
            ErrorKind::InvalidStashRateLimit(0)
        );
    }

    #[test]
    fn test_status_code() {
        assert_eq!(
            ErrorKind::RateLimited.status_code(),
            Some(StatusCode::TOO_MANY_REQUESTS)
        );
        assert_eq!(
            ErrorKind::ServerFailure.status_code(),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
        assert_eq!(ErrorKind::InvalidCacheSize(0).status_code(), None);
        assert!(ErrorKind::ServerFailure.is_http_status());
        assert!(!ErrorKind::InvalidHost(String::new()).is_http_status());
        assert!(!ErrorKind::NotFound.is_timeout());
    }
}
