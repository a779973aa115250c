//! Command-line arguments.

use clap::{ArgAction, Parser};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7700;

const COMMANDS_HELP: &str = "\
Supported commands:
  list_indexes
  get_index <uid>
  create_index <uid> [primary_key]
  delete_index <uid>
  add_docs <index> <json_array>
  search <index> <query>
  get_docs <index> [limit] [offset]
  update_settings <index> <json>
  Or raw: GET/POST/etc <path> [body]

If command arguments are provided, execute the command and exit.
Otherwise, enter interactive mode where you can type commands.
In interactive mode, type 'quit' or 'exit' to stop.";

/// `-h` selects the host, so clap's short help flag is disabled and help is
/// only available as `--help`.
#[derive(Parser, Debug)]
#[command(
    name = "meili-client",
    version,
    about = "A simple Meilisearch client.",
    disable_help_flag = true,
    after_help = COMMANDS_HELP
)]
pub struct Cli {
    /// Server hostname
    #[arg(short = 'h', long = "host", value_name = "HOSTNAME", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Server port
    #[arg(
        short = 'p',
        long = "port",
        default_value_t = DEFAULT_PORT,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// API key for authentication
    #[arg(short = 'a', long = "api-key", value_name = "API_KEY")]
    pub api_key: Option<String>,

    /// Print help
    #[arg(long = "help", action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,

    /// Command to run once; interactive mode when omitted
    #[arg(value_name = "CMD", trailing_var_arg = true)]
    pub command: Vec<String>,
}
