//! Command translation and HTTP framing for a Meilisearch command-line client.
//!
//! # Overview
//! Turns a line of user input into HTTP/1.1 request bytes and reads the
//! server's response back off a stream, echoing it as it arrives. The crate
//! never opens sockets; callers pass in any `BufRead`/`Write` pair, which
//! keeps every stage testable against in-memory buffers.
//!
//! # Design
//! - `tokenize` splits a line on spaces, honouring double quotes.
//! - `Command` is a closed enum over the supported commands plus a `Raw`
//!   pass-through; `translate` maps it to an `HttpRequest`.
//! - `HttpRequest::encode` renders the wire format; `MeiliClient` adds the
//!   host, API key, and request-size limit.
//! - `read_response` understands `Content-Length` framing only.

pub mod client;
pub mod command;
pub mod error;
pub mod escape;
pub mod http;
pub mod response;
pub mod tokenize;

pub use client::{MeiliClient, REQUEST_BUFFER_SIZE};
pub use command::{translate, Command};
pub use error::ClientError;
pub use escape::json_escape;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::{read_response, MAX_LINE_LEN};
pub use tokenize::{tokenize, MAX_TOKENS};
