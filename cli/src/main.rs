use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use vercount_cli::EnvDriverFactory;

fn init_logging() {
    let default_level = "warn";
    // stdout carries the response document; logs go to stderr only.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_logging();

    let cli = match vercount_cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    match vercount_cli::run(cli, stdin, stdout, &EnvDriverFactory) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            vercount_cli::report(&err, std::io::stderr().lock());
            ExitCode::FAILURE
        }
    }
}
