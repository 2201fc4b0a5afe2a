//! The Frame Reader.
//!
//! Consumes a RESP array-of-bulk-strings framing from a buffered byte
//! stream and yields one parsed statement at a time. Grounded on the
//! teacher's `net.rs` socket-reading helpers, generalized from raw `fd`
//! reads to a `BufRead` so the parser itself is socket-agnostic and
//! independently testable.

use std::io::{BufRead, Read};

use crate::error::{Error, Result};

/// One parsed frame: either a client statement, or end-of-stream.
#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    /// A statement is the command name followed by zero or more arguments,
    /// all as raw bytes.
    Statement(Vec<Vec<u8>>),
    Eof,
}

/// Reads one RESP array-of-bulk-strings frame at a time from `R`.
pub struct FrameReader<R: BufRead> {
    reader: R,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        FrameReader { reader }
    }

    /// Reads one full statement, or signals end-of-stream / a parse error.
    ///
    /// On a parse error the connection must be dropped; the caller is never
    /// expected to call this again after an `Err`.
    pub fn read_statement(&mut self) -> Result<Frame> {
        let line = match self.read_line()? {
            Some(l) => l,
            None => return Ok(Frame::Eof),
        };

        if line.first() != Some(&b'*') {
            return Err(Error::Protocol(format!(
                "expected '*', got {:?}",
                line.first()
            )));
        }
        let count: i64 = parse_ascii_int(&line[1..])
            .ok_or_else(|| Error::Protocol("non-numeric array length".into()))?;

        if count == 0 {
            // *0 is coerced to the synthetic ["null"] statement.
            return Ok(Frame::Statement(vec![b"null".to_vec()]));
        }
        if count < 0 {
            return Err(Error::Protocol("negative array length".into()));
        }

        let mut statement = Vec::with_capacity(count as usize);
        for _ in 0..count {
            statement.push(self.read_bulk_string()?);
        }
        Ok(Frame::Statement(statement))
    }

    fn read_bulk_string(&mut self) -> Result<Vec<u8>> {
        let line = self
            .read_line()?
            .ok_or_else(|| Error::Protocol("truncated frame: expected bulk header".into()))?;

        if line.first() != Some(&b'$') {
            return Err(Error::Protocol(format!(
                "expected '$', got {:?}",
                line.first()
            )));
        }
        let len: i64 = parse_ascii_int(&line[1..])
            .ok_or_else(|| Error::Protocol("non-numeric bulk length".into()))?;
        if len < 0 {
            return Err(Error::Protocol("negative bulk length".into()));
        }

        let mut payload = vec![0u8; len as usize];
        self.reader
            .read_exact(&mut payload)
            .map_err(|_| Error::Protocol("truncated bulk payload".into()))?;

        let mut crlf = [0u8; 2];
        self.reader
            .read_exact(&mut crlf)
            .map_err(|_| Error::Protocol("missing bulk payload terminator".into()))?;
        if crlf != *b"\r\n" {
            return Err(Error::Protocol("bulk payload not terminated by CRLF".into()));
        }

        Ok(payload)
    }

    /// Reads one `\r\n`-terminated line, stripping the terminator. Returns
    /// `Ok(None)` only on a clean EOF before any byte of the line is read;
    /// any other malformed terminator is a parse error.
    fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        let n = self.reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        if buf.last() != Some(&b'\n') {
            return Err(Error::Protocol("line not terminated by CRLF".into()));
        }
        buf.pop(); // '\n'
        if buf.pop() != Some(b'\r') {
            return Err(Error::Protocol("line not terminated by CRLF".into()));
        }
        Ok(Some(buf))
    }
}

fn parse_ascii_int(bytes: &[u8]) -> Option<i64> {
    if bytes.is_empty() {
        return None;
    }
    std::str::from_utf8(bytes).ok()?.parse::<i64>().ok()
}
