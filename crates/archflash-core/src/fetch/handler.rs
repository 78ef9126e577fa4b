//! Easy2 handler: tracks the final response head and streams the body of a
//! `200 OK` through a [`ProgressSink`].

use crate::progress::ProgressSink;
use std::io::{self, Write};
use std::str;

/// Status line and length of the most recent response (redirect hops reset it).
#[derive(Debug, Default)]
pub(super) struct ResponseHead {
    status_line: Option<String>,
    content_length: Option<u64>,
}

impl ResponseHead {
    pub(super) fn accept(&mut self, line: &str) {
        let line = line.trim_end();
        if line.starts_with("HTTP/") {
            *self = ResponseHead {
                status_line: Some(line.to_string()),
                content_length: None,
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.content_length = value.trim().parse::<u64>().ok();
            }
        }
    }

    pub(super) fn status_code(&self) -> Option<u32> {
        self.status_line
            .as_deref()?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()
    }

    /// Code and reason as sent, e.g. `404 Not Found`.
    pub(super) fn status_text(&self) -> String {
        match self.status_line.as_deref().and_then(|l| l.split_once(' ')) {
            Some((_, rest)) => rest.trim().to_string(),
            None => "no status line".to_string(),
        }
    }

    pub(super) fn is_ok(&self) -> bool {
        self.status_code() == Some(200)
    }

    pub(super) fn content_length(&self) -> Option<u64> {
        self.content_length
    }
}

pub(super) struct StreamHandler<W: Write, O: Write> {
    pub(super) head: ResponseHead,
    /// Destination and progress output until the first body byte arrives.
    pending: Option<(W, O)>,
    sink: Option<ProgressSink<W, O>>,
    /// Destination error that made us abort the transfer.
    pub(super) failure: Option<io::Error>,
}

impl<W: Write, O: Write> StreamHandler<W, O> {
    pub(super) fn new(dest: W, out: O) -> Self {
        Self {
            head: ResponseHead::default(),
            pending: Some((dest, out)),
            sink: None,
            failure: None,
        }
    }

    /// The sink is seeded from the response head, so build it lazily.
    fn sink(&mut self) -> Option<&mut ProgressSink<W, O>> {
        if self.sink.is_none() {
            let (dest, out) = self.pending.take()?;
            let total = self.head.content_length().unwrap_or(0);
            self.sink = Some(ProgressSink::new(dest, total, out));
        }
        self.sink.as_mut()
    }

    /// Ends the progress line of a transfer that did not complete.
    pub(super) fn abandon(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.finish_line();
        }
    }

    /// Hands out the sink after the transfer, even when the body was empty.
    pub(super) fn take_sink(&mut self) -> Option<ProgressSink<W, O>> {
        self.sink()?;
        self.sink.take()
    }
}

impl<W: Write, O: Write> curl::easy::Handler for StreamHandler<W, O> {
    fn header(&mut self, data: &[u8]) -> bool {
        if let Ok(s) = str::from_utf8(data) {
            self.head.accept(s);
        }
        true
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        // Error bodies are drained but never reach the destination.
        if !self.head.is_ok() {
            return Ok(data.len());
        }
        let Some(sink) = self.sink() else {
            return Ok(0);
        };
        match sink.observe(data) {
            Ok(n) => Ok(n),
            Err(e) => {
                tracing::warn!("download write failed: {}", e);
                self.failure = Some(e);
                Ok(0) // abort transfer
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curl::easy::Handler;

    #[test]
    fn status_and_length_from_headers() {
        let mut head = ResponseHead::default();
        for line in ["HTTP/1.1 200 OK\r\n", "Content-Length: 12345\r\n", "\r\n"] {
            head.accept(line);
        }
        assert!(head.is_ok());
        assert_eq!(head.status_code(), Some(200));
        assert_eq!(head.status_text(), "200 OK");
        assert_eq!(head.content_length(), Some(12345));
    }

    #[test]
    fn redirect_hop_is_forgotten() {
        let mut head = ResponseHead::default();
        for line in [
            "HTTP/1.1 302 Found",
            "Location: /elsewhere",
            "Content-Length: 5",
            "",
            "HTTP/1.1 404 Not Found",
            "",
        ] {
            head.accept(line);
        }
        assert!(!head.is_ok());
        assert_eq!(head.status_text(), "404 Not Found");
        assert_eq!(head.content_length(), None);
    }

    #[test]
    fn http2_status_without_reason() {
        let mut head = ResponseHead::default();
        head.accept("HTTP/2 200");
        head.accept("content-length: 7");
        assert!(head.is_ok());
        assert_eq!(head.status_text(), "200");
        assert_eq!(head.content_length(), Some(7));
    }

    #[test]
    fn unparseable_length_means_unknown() {
        let mut head = ResponseHead::default();
        head.accept("HTTP/1.1 200 OK");
        head.accept("Content-Length: -1");
        assert_eq!(head.content_length(), None);
    }

    #[test]
    fn non_ok_body_never_reaches_destination() {
        let mut h = StreamHandler::new(Vec::new(), io::sink());
        h.header(b"HTTP/1.1 404 Not Found\r\n");
        assert_eq!(h.write(b"<h1>not here</h1>").unwrap(), 17);
        assert!(h.sink.is_none());
        let (dest, n) = h.take_sink().unwrap().finish().unwrap();
        assert!(dest.is_empty());
        assert_eq!(n, 0);
    }

    #[test]
    fn abandon_terminates_progress_line() {
        let mut out = Vec::new();
        {
            let mut h = StreamHandler::new(Vec::new(), &mut out);
            h.header(b"HTTP/1.1 200 OK\r\n");
            for _ in 0..60 {
                h.write(b"chunk").unwrap();
            }
            h.abandon();
        }
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Received 250B of 0B total"));
        assert!(printed.ends_with('\n'));
    }

    #[test]
    fn write_failure_is_kept_and_aborts() {
        let mut h = StreamHandler::new(Full, io::sink());
        h.header(b"HTTP/1.1 200 OK\r\n");
        assert_eq!(h.write(b"data").unwrap(), 0);
        let err = h.failure.take().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
    }

    /// Destination that is out of space.
    struct Full;

    impl Write for Full {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::StorageFull))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn ok_body_is_forwarded() {
        let mut h = StreamHandler::new(Vec::new(), io::sink());
        h.header(b"HTTP/1.1 200 OK\r\n");
        h.header(b"Content-Length: 6\r\n");
        h.write(b"abc").unwrap();
        h.write(b"def").unwrap();
        let (dest, n) = h.take_sink().unwrap().finish().unwrap();
        assert_eq!(dest, b"abcdef");
        assert_eq!(n, 6);
    }
}
