use clap::Parser;

use chordstrum_lib::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over -v
    env_logger::Builder::new()
        .filter_level(cli::log_filter(cli.verbose))
        .parse_default_env()
        .init();

    if let Err(e) = cli::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
