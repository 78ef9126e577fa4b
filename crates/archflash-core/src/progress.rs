//! Progress reporting for a single streaming download.
//!
//! `ProgressSink` decorates any `Write` destination. Every chunk is forwarded
//! unchanged; a single overwritten status line is redrawn only on every
//! `REDRAW_EVERY`-th write so terminal output stays cheap when chunks are small.

use crate::size::human_size;
use std::io::{self, Write};

/// Number of writes between two redraws of the progress line.
pub const REDRAW_EVERY: u64 = 50;

/// Width blanked before each redraw.
const CLEAR_WIDTH: usize = 50;

/// Write decorator that counts bytes and draws `Received <have> of <total> total`.
///
/// `out` receives the progress text (stdout in the CLI). Failures writing to
/// `out` are swallowed; only failures of the wrapped destination surface.
pub struct ProgressSink<W: Write, O: Write> {
    inner: W,
    out: O,
    /// Total size prepared for printing once, up front.
    total: String,
    have: u64,
    writes: u64,
}

impl<W: Write, O: Write> ProgressSink<W, O> {
    /// `total_bytes` is the expected size; 0 when the server did not say.
    pub fn new(inner: W, total_bytes: u64, out: O) -> Self {
        Self {
            inner,
            out,
            total: human_size(total_bytes),
            have: 0,
            writes: 0,
        }
    }

    /// Forward `chunk` to the destination and account for it.
    ///
    /// Counters only move once the whole chunk has been accepted downstream.
    pub fn observe(&mut self, chunk: &[u8]) -> io::Result<usize> {
        self.inner.write_all(chunk)?;
        self.have += chunk.len() as u64;
        self.writes += 1;
        if self.writes % REDRAW_EVERY == 0 {
            self.redraw();
        }
        Ok(chunk.len())
    }

    fn redraw(&mut self) {
        let _ = write!(self.out, "\r{}", " ".repeat(CLEAR_WIDTH));
        let _ = write!(
            self.out,
            "\rReceived {} of {} total",
            human_size(self.have),
            self.total
        );
        let _ = self.out.flush();
    }

    /// Bytes forwarded so far.
    pub fn bytes(&self) -> u64 {
        self.have
    }

    /// Number of successful `observe` calls.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Terminates a drawn progress line when a transfer is abandoned. The
    /// destination is left as is.
    pub fn finish_line(&mut self) {
        if self.writes >= REDRAW_EVERY {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
        }
    }

    /// Ends the progress line with a newline, flushes the destination and
    /// hands it back together with the byte count.
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
        self.inner.flush()?;
        Ok((self.inner, self.have))
    }
}

impl<W: Write, O: Write> Write for ProgressSink<W, O> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.observe(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
