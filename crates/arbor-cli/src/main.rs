//! Arbor command-line binary.
//!
//! # Usage
//!
//! ```bash
//! # Evaluate leaf 5 of a depth-7 tree
//! arbor --key 00..00 --depth 7 eval --leaf 5
//!
//! # Delegate [4, 9], narrow it to [5, 6], print the decomposition and outputs
//! arbor --key 00..00 --depth 7 constrain --min 4 --max 9 --sub-min 5 --sub-max 6
//!
//! # Check a delegation against the root with a throwaway key
//! arbor --random-key --depth 20 verify --min 1000 --max 90000
//! ```

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = arbor_cli::Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    arbor_cli::run(&args, &mut out)?;

    Ok(())
}
