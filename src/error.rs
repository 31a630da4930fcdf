//! Failure taxonomy for fetching a remote film list

use thiserror::Error;

/// Why a list page could not be turned into a film collection.
///
/// Every variant is reported to the user the same way; the distinction only
/// matters for logs.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, timeout or body read failure
    #[error("could not reach {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// The site answered, but not with a success status
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response did not carry an HTML document
    #[error("no document received from {url}")]
    NoDocument { url: String },

    #[error("invalid selector `{0}`")]
    Selector(String),
}

impl FetchError {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Unreachable { url, .. } | Self::Status { url, .. } | Self::NoDocument { url } => {
                Some(url)
            }
            Self::Selector(_) => None,
        }
    }
}
