//! Translation of tokenized commands into HTTP requests.
//!
//! # Design
//! `Command::parse` matches the first token against a closed vocabulary and
//! checks argument counts; `Command::to_request` maps each variant to a
//! method, path, and body. Anything unrecognized, and any recognized name
//! given too few arguments, becomes `Command::Raw`, which forwards
//! method/path/body as typed. That means `search books` is sent as method
//! `search` with path `books`; this mirrors the long-standing behaviour of the
//! tool and is kept on purpose.
//!
//! Identifiers are placed in paths and in `create_index` bodies without
//! escaping. Only the search query is JSON-escaped.

use crate::error::ClientError;
use crate::escape::json_escape;
use crate::http::{HttpMethod, HttpRequest};

/// Longest accepted method token.
pub const MAX_METHOD_LEN: usize = 15;

/// Longest accepted path (including query string) or body.
pub const MAX_FIELD_LEN: usize = 4095;

/// A recognized command, or a raw method/path/body triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListIndexes,
    GetIndex {
        uid: String,
    },
    CreateIndex {
        uid: String,
        primary_key: Option<String>,
    },
    DeleteIndex {
        uid: String,
    },
    AddDocuments {
        index: String,
        documents: String,
    },
    Search {
        index: String,
        query: String,
    },
    GetDocuments {
        index: String,
        limit: Option<String>,
        offset: Option<String>,
    },
    UpdateSettings {
        index: String,
        settings: String,
    },
    Raw {
        method: String,
        path: String,
        body: Option<String>,
    },
}

impl Command {
    /// Parse a token sequence. `tokens[0]` is the command name.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Command, ClientError> {
        let args: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let Some(&name) = args.first() else {
            return Err(ClientError::EmptyCommand);
        };
        let argc = args.len();
        let arg = |i: usize| args[i].to_string();
        let opt = |i: usize| args.get(i).map(|s| s.to_string());

        let is = |expected: &str| name.eq_ignore_ascii_case(expected);

        let command = if is("list_indexes") {
            Command::ListIndexes
        } else if is("get_index") && argc >= 2 {
            Command::GetIndex { uid: arg(1) }
        } else if is("create_index") && argc >= 2 {
            Command::CreateIndex {
                uid: arg(1),
                primary_key: opt(2),
            }
        } else if is("delete_index") && argc >= 2 {
            Command::DeleteIndex { uid: arg(1) }
        } else if is("add_docs") && argc >= 3 {
            Command::AddDocuments {
                index: arg(1),
                documents: arg(2),
            }
        } else if is("search") && argc >= 3 {
            Command::Search {
                index: arg(1),
                query: arg(2),
            }
        } else if is("get_docs") && argc >= 2 {
            Command::GetDocuments {
                index: arg(1),
                limit: opt(2),
                offset: opt(3),
            }
        } else if is("update_settings") && argc >= 3 {
            Command::UpdateSettings {
                index: arg(1),
                settings: arg(2),
            }
        } else if argc >= 2 {
            Command::Raw {
                method: arg(0),
                path: arg(1),
                body: opt(2),
            }
        } else {
            return Err(ClientError::IncompleteCommand {
                command: name.to_string(),
            });
        };

        Ok(command)
    }

    /// Build the HTTP request for this command.
    pub fn to_request(&self) -> Result<HttpRequest, ClientError> {
        let request = match self {
            Command::ListIndexes => HttpRequest::new(HttpMethod::Get, "/indexes", None),
            Command::GetIndex { uid } => {
                HttpRequest::new(HttpMethod::Get, format!("/indexes/{uid}"), None)
            }
            Command::CreateIndex { uid, primary_key } => {
                let body = match primary_key {
                    Some(pk) => format!(r#"{{"uid":"{uid}","primaryKey":"{pk}"}}"#),
                    None => format!(r#"{{"uid":"{uid}"}}"#),
                };
                HttpRequest::new(HttpMethod::Post, "/indexes", Some(body))
            }
            Command::DeleteIndex { uid } => {
                HttpRequest::new(HttpMethod::Delete, format!("/indexes/{uid}"), None)
            }
            Command::AddDocuments { index, documents } => HttpRequest::new(
                HttpMethod::Post,
                format!("/indexes/{index}/documents"),
                Some(documents.clone()),
            ),
            Command::Search { index, query } => HttpRequest::new(
                HttpMethod::Post,
                format!("/indexes/{index}/search"),
                Some(format!(r#"{{"q":"{}"}}"#, json_escape(query))),
            ),
            Command::GetDocuments {
                index,
                limit,
                offset,
            } => {
                let mut path = format!("/indexes/{index}/documents");
                if let Some(limit) = limit {
                    path.push_str(&format!("?limit={limit}"));
                    if let Some(offset) = offset {
                        path.push_str(&format!("&offset={offset}"));
                    }
                }
                HttpRequest::new(HttpMethod::Get, path, None)
            }
            Command::UpdateSettings { index, settings } => HttpRequest::new(
                HttpMethod::Patch,
                format!("/indexes/{index}/settings"),
                Some(settings.clone()),
            ),
            Command::Raw { method, path, body } => HttpRequest::new(
                HttpMethod::Other(method.clone()),
                path.clone(),
                body.clone(),
            ),
        };

        check_len("method", request.method.as_str().len(), MAX_METHOD_LEN)?;
        check_len("path", request.path.len(), MAX_FIELD_LEN)?;
        check_len("body", request.body.as_ref().map_or(0, String::len), MAX_FIELD_LEN)?;
        Ok(request)
    }
}

fn check_len(field: &'static str, len: usize, max: usize) -> Result<(), ClientError> {
    if len > max {
        return Err(ClientError::FieldTooLong { field, len, max });
    }
    Ok(())
}

/// Parse `tokens` and build the matching request in one step.
pub fn translate<S: AsRef<str>>(tokens: &[S]) -> Result<HttpRequest, ClientError> {
    let command = Command::parse(tokens)?;
    let request = command.to_request()?;
    tracing::debug!(?command, method = %request.method, path = %request.path, "translated command");
    Ok(request)
}
