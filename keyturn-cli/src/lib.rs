//! The `keyturn` command-line tool.

pub mod args;
pub mod plan;

use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use keyturn_store::{ops, Defaults, Storage};
use tracing::debug;

pub use args::{Args, Command};
pub use plan::{resolve, Plan};

/// What a successful command reports on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    KeyGen { public_key: String },
    Rotate { public_key: String, factor: PathBuf },
    Rekey { capsule: PathBuf },
    Encrypt { output: PathBuf, capsule: PathBuf },
    Decrypt { output: PathBuf, len: usize },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyGen { public_key } => write!(f, "public key: {public_key}"),
            Self::Rotate { public_key, factor } => write!(
                f,
                "public key: {public_key}\nfactor written to {}",
                factor.display()
            ),
            Self::Rekey { capsule } => write!(f, "rekeyed {}", capsule.display()),
            Self::Encrypt { output, capsule } => {
                write!(f, "wrote {} and {}", output.display(), capsule.display())
            }
            Self::Decrypt { output, len } => write!(f, "wrote {len} bytes to {}", output.display()),
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads defaults, resolves paths and runs the selected workflow. The
/// config file is read through `storage` like every other file.
pub fn run(args: &Args, storage: &dyn Storage) -> anyhow::Result<Outcome> {
    let defaults = match &args.config {
        Some(path) => Defaults::load(storage, path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Defaults::default(),
    };

    let plan = resolve(args, &defaults);
    debug!(?plan, "resolved paths");

    let outcome = match plan {
        Plan::KeyGen(paths) => {
            let public = ops::keygen(storage, &paths).context("keygen failed")?;
            Outcome::KeyGen {
                public_key: public.to_hex(),
            }
        }
        Plan::Rotate(paths) => {
            let public = ops::rotate(storage, &paths).context("key rotation failed")?;
            Outcome::Rotate {
                public_key: public.to_hex(),
                factor: paths.factor,
            }
        }
        Plan::Rekey(paths) => {
            ops::rekey(storage, &paths).context("rekey failed")?;
            Outcome::Rekey {
                capsule: paths.capsule,
            }
        }
        Plan::Encrypt(paths) => {
            ops::encrypt(storage, &paths).context("encryption failed")?;
            Outcome::Encrypt {
                output: paths.output,
                capsule: paths.capsule,
            }
        }
        Plan::Decrypt(paths) => {
            let len = ops::decrypt(storage, &paths).context("decryption failed")?;
            Outcome::Decrypt {
                output: paths.output,
                len,
            }
        }
    };

    Ok(outcome)
}
