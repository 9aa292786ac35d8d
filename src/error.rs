//! Error types for sabnzbd-client

use thiserror::Error;

/// Result type alias for sabnzbd-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sabnzbd-client
///
/// API-level failures (the server answering with an `error` field, or not
/// answering at all) are not represented here; those are carried by
/// [`ApiOutcome`](crate::response::ApiOutcome). `Error` covers the cases
/// where no API call could be made or a socket operation genuinely failed.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured base URL could not be parsed or extended with the
    /// API path
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL has no host component to probe
    #[error("no probe host in URL: {0}")]
    MissingProbeHost(String),

    /// HTTP client construction or transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error from a probe or wake socket
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A hardware address string was not in `aa:bb:cc:dd:ee:ff` form
    #[error("invalid MAC address: {0}")]
    InvalidMacAddress(String),
}
