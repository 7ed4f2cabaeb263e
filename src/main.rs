use clap::Parser;
use piptool::{exit_code, run_cli, Cli};
use std::{env, io};
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr, stdout is only for the report
    if env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    } else {
        let format = tracing_subscriber::fmt::format()
            .with_level(false)
            .with_target(false)
            .without_time()
            .compact();
        tracing_subscriber::fmt()
            .event_format(format)
            .with_writer(io::stderr)
            .init();
    }

    let cli = Cli::parse();
    if let Err(err) = run_cli(cli, &mut io::stdout().lock()) {
        eprintln!("💥 {} failed", env!("CARGO_PKG_NAME"));
        for cause in err.chain() {
            eprintln!("  Caused by: {}", cause);
        }
        std::process::exit(exit_code(&err));
    }
}
