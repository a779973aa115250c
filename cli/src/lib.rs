//! Command-line front end for the Meilisearch client core.
//!
//! # Overview
//! Parses `-h`/`-p`/`-a` and an optional trailing command, opens one TCP
//! connection, then either runs that command once or reads commands from
//! stdin until `quit`, `exit`, or end of input.
//!
//! # Exit codes
//! - 0: command succeeded, or an interactive session ended (including when
//!   the server dropped the connection).
//! - 1: usage error, connection failure, or any failure in single-command
//!   mode.

pub mod cli;
pub mod config;
pub mod session;
pub mod telemetry;

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

pub use cli::Cli;
pub use config::ClientConfig;
pub use session::{connect, Session};

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, input: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return usage(&error, stdout, stderr),
    };
    let config = ClientConfig::from(&cli);

    let stream = match connect(&config) {
        Ok(stream) => stream,
        Err(error) => {
            tracing::error!(%error, address = %config, "connect failed");
            let _ = writeln!(stderr, "Failed to connect to Meilisearch at {config}: {error}");
            return ExitCode::FAILURE;
        }
    };
    let mut session = Session::new(config.client(), stream);

    if !cli.command.is_empty() {
        return session.run_once(&cli.command, stdout, stderr);
    }

    let _ = writeln!(
        stdout,
        "Connected to Meilisearch at {config}. Enter commands (type 'quit' or 'exit' to stop)."
    );
    session.run_interactive(input, stdout, stderr)
}

/// Help and version go to stdout and succeed; anything else is a usage
/// error.
fn usage<W: Write, E: Write>(error: &clap::Error, stdout: &mut W, stderr: &mut E) -> ExitCode {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(stdout, "{error}");
            ExitCode::SUCCESS
        }
        _ => {
            let _ = write!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}
