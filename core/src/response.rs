//! Minimal HTTP/1.1 response reader.
//!
//! # Design
//! The reader walks three phases: status line, header lines up to the first
//! empty line, then exactly `Content-Length` body bytes. Each line is written
//! to `out` as soon as it is read, so a response that breaks half way still
//! leaves its first lines on screen. Only `Content-Length` framing is
//! understood; chunked bodies are printed as headers only.
//!
//! All buffers are owned by a single call. The caller must not start another
//! read on the same stream until this one returns.

use std::io::{BufRead, Read, Write};

use crate::error::ClientError;
use crate::http::HttpResponse;

/// Maximum bytes in a status or header line, CRLF included.
pub const MAX_LINE_LEN: usize = 4096;

const CONTENT_LENGTH: &str = "content-length:";

/// Read one response from `reader`, echoing it to `out`.
///
/// Output format: status line and header lines each followed by `\n`; when a
/// body is present, a blank line, the body bytes, and a final `\n`.
pub fn read_response<R, W>(reader: &mut R, out: &mut W) -> Result<HttpResponse, ClientError>
where
    R: BufRead,
    W: Write,
{
    let status_line = read_line(reader, MAX_LINE_LEN)?;
    writeln!(out, "{status_line}")?;

    let mut headers = Vec::new();
    let mut content_length = 0;
    loop {
        let line = read_line(reader, MAX_LINE_LEN)?;
        if line.is_empty() {
            break;
        }
        writeln!(out, "{line}")?;
        if let Some(len) = parse_content_length(&line) {
            content_length = len;
        }
        let name = line.split(':').next().unwrap_or_default().trim().to_string();
        tracing::trace!(header = %line, "response header");
        headers.push((name, line));
    }

    let body = if content_length > 0 {
        let body = read_body(reader, content_length)?;
        out.write_all(b"\n")?;
        out.write_all(&body)?;
        out.write_all(b"\n")?;
        Some(body)
    } else {
        None
    };
    out.flush()?;

    tracing::debug!(status = %status_line, content_length, "response read");
    Ok(HttpResponse {
        status_line,
        headers,
        body,
    })
}

/// Read a CRLF-terminated line and return it without the terminator.
///
/// A bare `\n` does not end the line. Fails with `LineTooLong` once `max`
/// bytes have been read without a CRLF.
fn read_line<R: BufRead>(reader: &mut R, max: usize) -> Result<String, ClientError> {
    let mut line = Vec::new();
    loop {
        let remaining = (max - line.len()) as u64;
        if remaining == 0 {
            return Err(ClientError::LineTooLong { max });
        }
        let read = reader.by_ref().take(remaining).read_until(b'\n', &mut line)?;
        if read == 0 {
            return Err(ClientError::ConnectionClosed);
        }
        if line.ends_with(b"\r\n") {
            line.truncate(line.len() - 2);
            return Ok(String::from_utf8_lossy(&line).into_owned());
        }
    }
}

/// Value of a `Content-Length` header line, matched case-insensitively.
///
/// Leading whitespace is skipped and digits are read up to the first
/// non-digit; a value with no leading digits counts as zero.
fn parse_content_length(line: &str) -> Option<usize> {
    let prefix = line.get(..CONTENT_LENGTH.len())?;
    if !prefix.eq_ignore_ascii_case(CONTENT_LENGTH) {
        return None;
    }
    let value = line[CONTENT_LENGTH.len()..].trim_start();
    let digits = value
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value, |end| &value[..end]);
    Some(digits.parse().unwrap_or(0))
}

/// Read exactly `expected` body bytes.
///
/// The buffer grows with the bytes actually received, so a bogus length
/// from the server ends in `TruncatedBody` rather than a huge allocation.
fn read_body<R: Read>(reader: &mut R, expected: usize) -> Result<Vec<u8>, ClientError> {
    let mut body = Vec::new();
    reader.by_ref().take(expected as u64).read_to_end(&mut body)?;
    let received = body.len();
    if received < expected {
        return Err(ClientError::TruncatedBody { expected, received });
    }
    Ok(body)
}
