//! Request building and response reading for one search-service endpoint.
//!
//! # Design
//! `MeiliClient` holds only the `Host` header value and the optional API key
//! and carries no state between calls. It turns tokens into wire bytes and
//! reads a response from whatever stream the caller owns; opening, writing
//! to, and closing the connection stay with the caller.

use std::io::{BufRead, Write};

use crate::command::translate;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};
use crate::response::read_response;

/// Size of the request buffer. An encoded request must be strictly smaller.
pub const REQUEST_BUFFER_SIZE: usize = 4096;

/// Stateless client for the search-service HTTP API.
#[derive(Debug, Clone)]
pub struct MeiliClient {
    host: String,
    api_key: Option<String>,
}

impl MeiliClient {
    pub fn new(host: &str, api_key: Option<&str>) -> Self {
        Self {
            host: host.to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Translate a token sequence into a request.
    pub fn build_request<S: AsRef<str>>(&self, tokens: &[S]) -> Result<HttpRequest, ClientError> {
        translate(tokens)
    }

    /// Encode `request` for the wire, refusing anything that does not fit
    /// the request buffer.
    pub fn encode_request(&self, request: &HttpRequest) -> Result<Vec<u8>, ClientError> {
        let bytes = request.encode(&self.host, self.api_key.as_deref());
        let max = REQUEST_BUFFER_SIZE - 1;
        if bytes.len() > max {
            return Err(ClientError::RequestTooLarge {
                len: bytes.len(),
                max,
            });
        }
        Ok(bytes)
    }

    /// Translate and encode in one step.
    pub fn prepare<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<u8>, ClientError> {
        let request = self.build_request(tokens)?;
        self.encode_request(&request)
    }

    /// Read one response from `reader`, echoing it to `out`.
    pub fn read_response<R: BufRead, W: Write>(
        &self,
        reader: &mut R,
        out: &mut W,
    ) -> Result<HttpResponse, ClientError> {
        read_response(reader, out)
    }
}
