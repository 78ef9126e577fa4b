//! Error taxonomy for every core operation.
//!
//! Nothing in the core retries or recovers locally; each variant carries
//! enough context for the top level to print one line and stop.

use std::path::PathBuf;
use std::process::ExitStatus;

pub type Result<T, E = FlashError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum FlashError {
    /// Server answered with something other than `200 OK`.
    #[error("GET {url} returned {status}")]
    Transport { url: String, status: String },

    /// libcurl could not complete the request (DNS, connect, TLS, reset).
    #[error("GET {url} failed: {source}")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Directory listing body could not be read as markup.
    #[error("cannot parse directory listing at {url}: {reason}")]
    Parse { url: String, reason: String },

    /// Listing is well formed but has no matching entry.
    #[error("mirror has no file ending in \"{suffix}\"")]
    NotFound { suffix: String },

    /// Matching link points at a directory or otherwise has no file name.
    #[error("listing link {href:?} has no usable file name")]
    UnusableLink { href: String },

    /// `sha256sums.txt` was fetched but does not list the image.
    #[error("checksum list has no entry for {filename}")]
    MissingChecksum { filename: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination device failed validation before anything was downloaded.
    #[error("invalid destination {}: {reason}", .path.display())]
    Destination { path: PathBuf, reason: String },

    /// External program exited unsuccessfully; `output` is its combined stdout/stderr.
    #[error("{program} failed ({status}):\n{output}")]
    Command {
        program: String,
        status: ExitStatus,
        output: String,
    },

    #[error("SHA-256 mismatch for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    #[error("invalid mirror URL {url}: {reason}")]
    InvalidMirror { url: String, reason: String },

    #[error("only supported on Linux (running on {0})")]
    UnsupportedPlatform(&'static str),
}

impl FlashError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FlashError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for network failures and non-200 responses.
    pub fn is_transport(&self) -> bool {
        matches!(self, FlashError::Transport { .. } | FlashError::Curl { .. })
    }

    /// True when the mirror was reachable but lacked the expected file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FlashError::NotFound { .. })
    }
}
