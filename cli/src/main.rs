use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    meili_cli::telemetry::init();
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    meili_cli::run(std::env::args_os(), &mut stdin, &mut stdout, &mut stderr)
}
