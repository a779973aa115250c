//! HTTP/1.1 request and response types plus the wire encoder.
//!
//! # Design
//! Requests are plain data built by the command translator. `encode` turns a
//! request into the exact bytes written to the socket, so callers can reject
//! an oversized request before any byte leaves the process.

use std::fmt;
use std::net::Ipv6Addr;

/// HTTP method for a request.
///
/// `Other` carries the verb of a raw pass-through command exactly as typed;
/// it is not checked against the known HTTP verbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Other(verb) => verb,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `path` includes any query string. `body` is `None` rather than empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: body.filter(|b| !b.is_empty()),
        }
    }

    /// Render the request as HTTP/1.1 wire bytes.
    ///
    /// `Content-Type` and `Content-Length` are only emitted for a request
    /// with a body. The body follows the blank line with nothing appended.
    /// An IPv6 literal host is written in brackets.
    pub fn encode(&self, host: &str, api_key: Option<&str>) -> Vec<u8> {
        let mut head = format!("{} {} HTTP/1.1\r\n", self.method, self.path);
        if host.parse::<Ipv6Addr>().is_ok() {
            head.push_str(&format!("Host: [{host}]\r\n"));
        } else {
            head.push_str(&format!("Host: {host}\r\n"));
        }
        if let Some(key) = api_key {
            head.push_str(&format!("Authorization: Bearer {key}\r\n"));
        }
        if let Some(body) = &self.body {
            head.push_str("Content-Type: application/json\r\n");
            head.push_str(&format!("Content-Length: {}\r\n", body.len()));
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        if let Some(body) = &self.body {
            bytes.extend_from_slice(body.as_bytes());
        }
        bytes
    }
}

/// An HTTP response as read off the connection.
///
/// Each header keeps its name and the full line it came from. `body` is
/// `None` when the response had no positive `Content-Length`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    /// Numeric status code from the status line, if it has one.
    pub fn status(&self) -> Option<u16> {
        self.status_line.split(' ').nth(1)?.parse().ok()
    }

    /// First header line whose name matches `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, line)| line.as_str())
    }

    /// Body decoded as UTF-8, lossily. Empty when there is no body.
    pub fn body_text(&self) -> String {
        self.body
            .as_deref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn bodyless_request_has_no_content_headers() {
        let req = HttpRequest::new(HttpMethod::Get, "/indexes", None);
        assert_eq!(
            text(req.encode("127.0.0.1", None)),
            "GET /indexes HTTP/1.1\r\nHost: 127.0.0.1\r\n\r\n"
        );
    }

    #[test]
    fn body_follows_blank_line_with_matching_length() {
        let body = r#"{"q":"café"}"#;
        let req = HttpRequest::new(HttpMethod::Post, "/indexes/books/search", Some(body.to_string()));
        let wire = text(req.encode("localhost", None));

        let (head, rest) = wire.split_once("\r\n\r\n").unwrap();
        assert_eq!(rest, body);
        let lengths: Vec<_> = head
            .lines()
            .filter(|l| l.starts_with("Content-Length:"))
            .collect();
        assert_eq!(lengths, vec![format!("Content-Length: {}", body.len()).as_str()]);
        assert!(head.contains("Content-Type: application/json"));
    }

    #[test]
    fn api_key_becomes_bearer_header() {
        let req = HttpRequest::new(HttpMethod::Delete, "/indexes/books", None);
        assert_eq!(
            text(req.encode("10.0.0.1", Some("s3cret"))),
            "DELETE /indexes/books HTTP/1.1\r\nHost: 10.0.0.1\r\nAuthorization: Bearer s3cret\r\n\r\n"
        );
    }

    #[test]
    fn header_order_is_fixed() {
        let req = HttpRequest::new(HttpMethod::Patch, "/x", Some("{}".to_string()));
        assert_eq!(
            text(req.encode("h", Some("k"))),
            "PATCH /x HTTP/1.1\r\nHost: h\r\nAuthorization: Bearer k\r\n\
             Content-Type: application/json\r\nContent-Length: 2\r\n\r\n{}"
        );
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        let req = HttpRequest::new(HttpMethod::Get, "/indexes", None);
        assert_eq!(
            text(req.encode("::1", None)),
            "GET /indexes HTTP/1.1\r\nHost: [::1]\r\n\r\n"
        );
        assert!(text(req.encode("localhost", None)).contains("\r\nHost: localhost\r\n"));
    }

    #[test]
    fn empty_body_is_normalised_to_none() {
        let req = HttpRequest::new(HttpMethod::Post, "/x", Some(String::new()));
        assert!(req.body.is_none());
    }

    #[test]
    fn other_method_is_written_verbatim() {
        let req = HttpRequest::new(HttpMethod::Other("purge".to_string()), "/x", None);
        assert!(text(req.encode("h", None)).starts_with("purge /x HTTP/1.1\r\n"));
    }

    #[test]
    fn response_accessors() {
        let resp = HttpResponse {
            status_line: "HTTP/1.1 404 Not Found".to_string(),
            headers: vec![(
                "content-type".to_string(),
                "content-type: application/json".to_string(),
            )],
            body: Some(b"{}".to_vec()),
        };
        assert_eq!(resp.status(), Some(404));
        assert_eq!(resp.header("Content-Type"), Some("content-type: application/json"));
        assert_eq!(resp.header("Content-Length"), None);
        assert_eq!(resp.body_text(), "{}");
    }
}
