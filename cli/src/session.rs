//! One connection, driven by a single command or by an interactive loop.
//!
//! # Design
//! A `Session` owns the stream for its whole life and runs strictly one
//! request/response cycle at a time: the next command is not read until the
//! previous response has been drained or has failed. Dropping the session
//! closes the connection, so every exit path releases it exactly once.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::process::ExitCode;

use meili_core::{tokenize, ClientError, HttpResponse, MeiliClient, MAX_TOKENS};
use tracing::{debug, info};

use crate::config::ClientConfig;

pub const PROMPT: &str = "meili> ";

/// Open the TCP connection described by `config`.
pub fn connect(config: &ClientConfig) -> io::Result<TcpStream> {
    let stream = TcpStream::connect((config.host.as_str(), config.port))?;
    info!(peer = %stream.peer_addr()?, "connected");
    Ok(stream)
}

pub struct Session<S> {
    client: MeiliClient,
    reader: BufReader<S>,
}

impl<S: Read + Write> Session<S> {
    pub fn new(client: MeiliClient, stream: S) -> Self {
        Self {
            client,
            reader: BufReader::new(stream),
        }
    }

    /// Send one command and echo its response to `out`.
    ///
    /// Translation and size errors are returned before anything is written
    /// to the stream.
    pub fn execute<T, W>(&mut self, tokens: &[T], out: &mut W) -> Result<HttpResponse, ClientError>
    where
        T: AsRef<str>,
        W: Write,
    {
        let bytes = self.client.prepare(tokens)?;
        debug!(len = bytes.len(), "sending request");
        let stream = self.reader.get_mut();
        stream.write_all(&bytes)?;
        stream.flush()?;
        self.client.read_response(&mut self.reader, out)
    }

    /// Run a single command. Any failure is reported on `err` and yields a
    /// failing exit code.
    pub fn run_once<T, W, E>(&mut self, tokens: &[T], out: &mut W, err: &mut E) -> ExitCode
    where
        T: AsRef<str>,
        W: Write,
        E: Write,
    {
        match self.execute(tokens, out) {
            Ok(_) => ExitCode::SUCCESS,
            Err(error) => {
                let _ = writeln!(err, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    /// Read commands from `input` until end of input, `quit`/`exit`, or the
    /// first transport or response failure.
    ///
    /// Translation errors are reported and the loop continues. A broken
    /// connection ends the session without failing the process.
    pub fn run_interactive<R, W, E>(&mut self, input: &mut R, out: &mut W, err: &mut E) -> ExitCode
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut line = Vec::new();
        loop {
            if write!(out, "{PROMPT}").and_then(|()| out.flush()).is_err() {
                break;
            }

            line.clear();
            match input.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(error) => {
                    debug!(%error, "failed to read input");
                    let _ = writeln!(err, "failed to read input: {error}");
                    break;
                }
            }

            // Invalid UTF-8 is replaced, not rejected.
            let text = String::from_utf8_lossy(&line);
            let command = text.trim_end_matches(&['\n', '\r'][..]);
            if command.is_empty() {
                continue;
            }
            if command.eq_ignore_ascii_case("quit") || command.eq_ignore_ascii_case("exit") {
                break;
            }

            let tokens = tokenize(command, MAX_TOKENS);
            if tokens.is_empty() {
                continue;
            }

            match self.execute(&tokens, out) {
                Ok(response) => debug!(status = %response.status_line, "command complete"),
                Err(error) if error.is_recoverable() => {
                    debug!(%error, "command rejected");
                    let _ = writeln!(err, "{error}");
                }
                Err(error) => {
                    debug!(%error, "ending session");
                    let _ = writeln!(err, "{error}");
                    break;
                }
            }
        }

        let _ = writeln!(out, "Disconnected.");
        ExitCode::SUCCESS
    }
}
