//! chunkwise CLI - chunk normalization for parsed documents
//!
//! # Examples
//!
//! ```bash
//! # Process a directory of parser output
//! chunkwise process ./parsed --output-dir ./chunks
//!
//! # Look at the chunks produced for one document
//! chunkwise inspect ./parsed/CCLW.executive.1.json --limit 20
//!
//! # Show configuration and pipeline components
//! chunkwise show-config
//! ```

use chunkwise::cli::output::print_error;
use chunkwise::cli::{run, Cli};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chunkwise=info"));

    let json = std::env::var("CHUNKWISE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr so stdout stays clean for --format json
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
