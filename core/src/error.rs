//! Error types for the search-service client.
//!
//! # Design
//! One enum covers every failure of a request/response cycle. The variants
//! fall into three groups that callers treat differently:
//! - translation and encoding failures (`EmptyCommand`, `IncompleteCommand`,
//!   `FieldTooLong`, `RequestTooLarge`) happen before anything is sent, so an
//!   interactive session can report them and carry on;
//! - transport failures (`Io`) and malformed responses (`LineTooLong`,
//!   `ConnectionClosed`, `TruncatedBody`) leave the connection in an unknown
//!   state and end the session.
//!
//! `is_recoverable` encodes that split.

use std::fmt;
use std::io;

/// Errors produced while building, sending, or reading a request.
#[derive(Debug)]
pub enum ClientError {
    /// The input line contained no tokens.
    EmptyCommand,

    /// A single token that is not `list_indexes`; every other command needs
    /// at least a second argument.
    IncompleteCommand { command: String },

    /// A method, path, or body exceeds the space reserved for it.
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The encoded request does not fit the request buffer.
    RequestTooLarge { len: usize, max: usize },

    /// A status or header line reached `max` bytes without a CRLF.
    LineTooLong { max: usize },

    /// The peer closed the connection before a full line arrived.
    ConnectionClosed,

    /// The peer closed the connection before `Content-Length` bytes arrived.
    TruncatedBody { expected: usize, received: usize },

    /// Reading from or writing to the connection or the output failed.
    Io(io::Error),
}

impl ClientError {
    /// Whether an interactive session may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClientError::EmptyCommand
                | ClientError::IncompleteCommand { .. }
                | ClientError::FieldTooLong { .. }
                | ClientError::RequestTooLarge { .. }
        )
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::EmptyCommand => write!(f, "invalid command: no command given"),
            ClientError::IncompleteCommand { command } => {
                write!(f, "invalid command: '{command}' needs more arguments")
            }
            ClientError::FieldTooLong { field, len, max } => {
                write!(f, "invalid command: {field} is {len} bytes, limit is {max}")
            }
            ClientError::RequestTooLarge { len, max } => {
                write!(f, "request too long: {len} bytes, limit is {max}")
            }
            ClientError::LineTooLong { max } => {
                write!(f, "response line longer than {max} bytes")
            }
            ClientError::ConnectionClosed => write!(f, "connection closed by server"),
            ClientError::TruncatedBody { expected, received } => {
                write!(
                    f,
                    "connection closed after {received} of {expected} body bytes"
                )
            }
            ClientError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        ClientError::Io(err)
    }
}
