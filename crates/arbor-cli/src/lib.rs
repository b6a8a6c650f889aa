//! Command-line front end for the Arbor RC-PRF.
//!
//! Parses arguments, builds a tree from a hex or random root key and runs
//! one subcommand, writing results to any [`Write`] sink. Key material is
//! never logged; only the requested outputs are printed.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::io::Write;

use arbor_crypto::{CryptoError, SecretKey};
use arbor_rcprf::{
    ConstrainedElement, ConstrainedRcPrf, Depth, RCPRF_KEY_SIZE, RcPrf, RcPrfError,
};
use clap::{ArgGroup, Parser, Subcommand};
use thiserror::Error;

/// Widest constrained range whose leaf outputs `constrain` prints.
pub const MAX_PRINTED_LEAVES: u64 = 1 << 10;

/// Range-constrained PRF over a GGM tree
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(about = "Evaluate and constrain range-constrained PRFs")]
#[command(version)]
#[command(group(ArgGroup::new("key_source").required(true).args(["key", "random_key"])))]
pub struct Args {
    /// Root key as 64 hex characters
    #[arg(short, long)]
    pub key: Option<String>,

    /// Use a fresh random root key
    #[arg(long)]
    pub random_key: bool,

    /// Tree depth (the tree has 2^depth leaves)
    #[arg(short, long, default_value = "16")]
    pub depth: Depth,

    /// Bytes per leaf output (16, 32 or 64)
    #[arg(long, default_value = "16")]
    pub output_len: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Evaluate one leaf with the root key
    Eval {
        /// Leaf index
        #[arg(long)]
        leaf: u64,
    },

    /// Constrain to a range, optionally re-constrain, and print the outputs
    /// of ranges up to 1024 leaves
    Constrain {
        /// First leaf of the range
        #[arg(long)]
        min: u64,
        /// Last leaf of the range
        #[arg(long)]
        max: u64,
        /// First leaf of the re-constrained range
        #[arg(long, requires = "sub_max")]
        sub_min: Option<u64>,
        /// Last leaf of the re-constrained range
        #[arg(long, requires = "sub_min")]
        sub_max: Option<u64>,
    },

    /// Check that a constrained capability agrees with the root key over at
    /// most 2^20 leaves
    Verify {
        /// First leaf of the range
        #[arg(long)]
        min: u64,
        /// Last leaf of the range
        #[arg(long)]
        max: u64,
    },
}

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed command-line value.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the invalid value.
        reason: String,
    },

    /// A constrained output differed from the root's.
    #[error("verification failed at leaf {leaf}")]
    Mismatch {
        /// First diverging leaf.
        leaf: u64,
    },

    /// RC-PRF operation failed.
    #[error(transparent)]
    RcPrf(#[from] RcPrfError),

    /// Primitive failure while loading the key.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Writing the output failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the parsed command, writing results to `out`.
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    match args.output_len {
        16 => run_with::<16>(args, out),
        32 => run_with::<32>(args, out),
        64 => run_with::<64>(args, out),
        other => Err(CliError::InvalidArgument {
            reason: format!("output length must be 16, 32 or 64, got {other}"),
        }),
    }
}

fn run_with<const N: usize>(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let prf = RcPrf::<N>::new(load_key(args)?, args.depth)?;
    tracing::info!(depth = prf.depth(), output_len = N, "tree ready");

    match args.command {
        Command::Eval { leaf } => {
            let output = prf.eval(leaf)?;
            writeln!(out, "{leaf}: {}", hex::encode(output))?;
        },
        Command::Constrain { min, max, sub_min, sub_max } => {
            let mut constrained = prf.constrain(min, max)?;
            if let (Some(sub_min), Some(sub_max)) = (sub_min, sub_max) {
                constrained = constrained.constrain(sub_min, sub_max)?;
            }
            write_decomposition(&constrained, out)?;
            if constrained.leaf_count() > MAX_PRINTED_LEAVES {
                writeln!(out, "outputs omitted: {} leaves", constrained.leaf_count())?;
                return Ok(());
            }
            let outputs = constrained.eval_range(constrained.min(), constrained.max())?;
            for (leaf, output) in (constrained.min()..=constrained.max()).zip(&outputs) {
                writeln!(out, "{leaf}: {}", hex::encode(output))?;
            }
        },
        Command::Verify { min, max } => {
            let constrained = prf.constrain(min, max)?;
            let expected = prf.eval_range(min, max)?;
            let actual = constrained.eval_range(min, max)?;

            if let Some(offset) = expected.iter().zip(&actual).position(|(e, a)| e != a) {
                let leaf = min + offset as u64;
                tracing::error!(leaf, "constrained output differs from root");
                return Err(CliError::Mismatch { leaf });
            }
            for outside in [min.checked_sub(1), max.checked_add(1)].into_iter().flatten() {
                if constrained.eval(outside).is_ok() {
                    return Err(CliError::Mismatch { leaf: outside });
                }
            }
            writeln!(
                out,
                "ok: {} leaves in [{min}, {max}] match across {} elements",
                constrained.leaf_count(),
                constrained.len()
            )?;
        },
    }
    Ok(())
}

fn load_key(args: &Args) -> Result<SecretKey<RCPRF_KEY_SIZE>, CliError> {
    let Some(encoded) = &args.key else {
        tracing::info!("using a random root key");
        return Ok(SecretKey::random()?);
    };

    let mut bytes = hex::decode(encoded.trim()).map_err(|err| CliError::InvalidArgument {
        reason: format!("key is not valid hex: {err}"),
    })?;
    if bytes.len() != RCPRF_KEY_SIZE {
        return Err(CliError::InvalidArgument {
            reason: format!("key must be {RCPRF_KEY_SIZE} bytes, got {}", bytes.len()),
        });
    }
    Ok(SecretKey::from_slice(&mut bytes)?)
}

fn write_decomposition<const N: usize>(
    constrained: &ConstrainedRcPrf<N>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    writeln!(
        out,
        "constrained [{}, {}] in {} element(s)",
        constrained.min(),
        constrained.max(),
        constrained.len()
    )?;
    for element in constrained.elements() {
        match element {
            ConstrainedElement::Leaf(leaf) => writeln!(out, "  leaf  [{0}, {0}]", leaf.index())?,
            ConstrainedElement::Inner(inner) => writeln!(
                out,
                "  inner [{}, {}] height {}",
                inner.min(),
                inner.max(),
                inner.subtree_height()
            )?,
        }
    }
    Ok(())
}
