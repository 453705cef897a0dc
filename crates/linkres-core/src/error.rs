//! Resolver error type.

use thiserror::Error;

/// Failure of a single resolution call. Never raised for a heuristic miss.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The selected strategy needs a setting that was not supplied.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input is not an absolute URL.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Curl reported an error (DNS, connect, TLS, timeout, too many redirects).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Response had a non-2xx status while status validation was on.
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    /// The blocking transfer task panicked or was cancelled.
    #[error("resolver task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ResolveError {
    /// True for network-level and HTTP-status failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ResolveError::Transport { .. } | ResolveError::HttpStatus { .. }
        )
    }

    /// True if the request ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ResolveError::Transport { source, .. } if source.is_operation_timedout())
    }

    /// True if the redirect chain exceeded the hop limit.
    pub fn is_too_many_redirects(&self) -> bool {
        matches!(self, ResolveError::Transport { source, .. } if source.is_too_many_redirects())
    }
}
