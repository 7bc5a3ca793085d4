//! Error types

use std::fmt;
use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the webhook validator
#[derive(Error, Debug)]
pub enum Error {
    /// A key or config file could not be read
    #[error("{}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileRead {
            path: path.into(),
            source,
        }
    }
}

/// Raised when a webhook delivery fails signature verification.
///
/// Every verification failure (missing signature, missing secret, malformed
/// header, unsupported algorithm, digest mismatch) maps to this one type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "invalid webhook signature (key: {key_label}, webhook: {webhook_id}, ip: {})",
    DisplayIp(.ip)
)]
pub struct ValidationError {
    pub key_label: String,
    pub webhook_id: String,
    pub ip: Option<IpAddr>,
}

struct DisplayIp<'a>(&'a Option<IpAddr>);

impl fmt::Display for DisplayIp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ip) => write!(f, "{}", ip),
            None => f.write_str("<unknown>"),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
