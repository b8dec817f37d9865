use std::process::ExitCode;
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use monkey_lang::Config;

fn main() -> ExitCode {
    let config: Config = Config::parse();
    init_tracing(config.verbose);

    match monkey_lang::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        },
    }
}

// `RUST_LOG` takes precedence over `--verbose`
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
