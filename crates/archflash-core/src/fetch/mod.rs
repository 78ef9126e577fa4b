//! Streaming HTTP GET to a file or to memory.
//!
//! Uses libcurl through `Easy2`. The body is never held in memory when saving
//! to a file: each chunk libcurl hands over goes straight through a
//! [`ProgressSink`](crate::progress::ProgressSink) into the destination.
//! Runs in the current thread and blocks until the transfer ends.

mod handler;

use crate::config::FlashConfig;
use crate::error::{FlashError, Result};
use curl::easy::Easy2;
use handler::StreamHandler;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// libcurl knobs shared by every request of a run.
#[derive(Debug, Clone, Copy)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    pub max_redirections: u32,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            max_redirections: 10,
        }
    }
}

impl From<&FlashConfig> for CurlOptions {
    fn from(cfg: &FlashConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            ..Self::default()
        }
    }
}

/// Why a stream stopped: the request itself, or the destination.
enum Failure {
    Request(FlashError),
    Destination(io::Error),
}

/// Downloads `url` into `dest`, printing progress to stdout. Returns the
/// number of bytes written.
///
/// `dest` is created (or truncated) before the request goes out. When the
/// server answers with anything but `200 OK` the call fails with
/// [`FlashError::Transport`] and `dest` is left in place, empty. Nothing is
/// cleaned up after a failure mid-transfer either.
pub fn fetch_to_path(url: &str, dest: &Path, opts: CurlOptions) -> Result<u64> {
    let file = File::create(dest).map_err(|e| FlashError::io(dest, e))?;
    let writer = BufWriter::with_capacity(1 << 20, file);
    match stream(url, writer, io::stdout(), &opts) {
        Ok((_, bytes)) => {
            tracing::debug!(url, dest = %dest.display(), bytes, "download finished");
            Ok(bytes)
        }
        Err(Failure::Request(e)) => Err(e),
        Err(Failure::Destination(e)) => Err(FlashError::io(dest, e)),
    }
}

/// Fetches a small document (directory listing, checksum file) into memory.
pub fn fetch_text(url: &str, opts: CurlOptions) -> Result<Vec<u8>> {
    match stream(url, Vec::new(), io::sink(), &opts) {
        Ok((body, _)) => Ok(body),
        Err(Failure::Request(e)) => Err(e),
        Err(Failure::Destination(e)) => Err(FlashError::io("<memory>", e)),
    }
}

fn stream<W: Write, O: Write>(
    url: &str,
    dest: W,
    out: O,
    opts: &CurlOptions,
) -> std::result::Result<(W, u64), Failure> {
    let curl_err = |source: curl::Error| {
        Failure::Request(FlashError::Curl {
            url: url.to_string(),
            source,
        })
    };

    let mut easy = Easy2::new(StreamHandler::new(dest, out));
    easy.url(url).map_err(curl_err)?;
    easy.get(true).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.max_redirections(opts.max_redirections)
        .map_err(curl_err)?;
    easy.connect_timeout(opts.connect_timeout)
        .map_err(curl_err)?;

    tracing::debug!(url, "GET");
    if let Err(e) = easy.perform() {
        easy.get_mut().abandon();
        if e.is_write_error() {
            if let Some(io_err) = easy.get_mut().failure.take() {
                return Err(Failure::Destination(io_err));
            }
        }
        return Err(curl_err(e));
    }

    if !easy.get_ref().head.is_ok() {
        let status = easy.get_ref().head.status_text();
        // Report the URL that answered, not the one before redirects.
        let final_url = match easy.effective_url() {
            Ok(Some(u)) => u.to_string(),
            _ => url.to_string(),
        };
        tracing::warn!(url = %final_url, %status, "unexpected response status");
        return Err(Failure::Request(FlashError::Transport {
            url: final_url,
            status,
        }));
    }

    let sink = easy.get_mut().take_sink().ok_or_else(|| {
        Failure::Destination(io::Error::new(
            io::ErrorKind::Other,
            "destination already released",
        ))
    })?;
    let (mut dest, bytes) = sink.finish().map_err(Failure::Destination)?;
    dest.flush().map_err(Failure::Destination)?;
    Ok((dest, bytes))
}
