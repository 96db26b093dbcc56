use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "keyturn", version)]
#[command(about = "Hybrid file encryption with rotatable recipient keys")]
pub struct Args {
    /// Secret key file (defaults to ./secretkey)
    #[arg(short = 's', long, global = true)]
    pub secret_key: Option<PathBuf>,

    /// Public key file written by keygen and keyrotate (defaults to ./publickey,
    /// or next to the secret key when rotating)
    #[arg(short = 'p', long, global = true)]
    pub public_key: Option<PathBuf>,

    /// Rotation factor file (defaults to ./factor, or next to the secret key
    /// when rotating)
    #[arg(short = 'f', long, global = true)]
    pub factor: Option<PathBuf>,

    /// Recipient public key used by encrypt (defaults to ./recipient)
    #[arg(short = 'r', long, global = true)]
    pub recipient: Option<PathBuf>,

    /// Capsule file (defaults to the ciphertext path plus ".encap")
    #[arg(short = 'e', long, global = true)]
    pub capsule: Option<PathBuf>,

    /// JSON file overriding the default file names
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate a new key pair
    Keygen,
    /// Replace the secret key and write the factor that rekeys old capsules
    Keyrotate,
    /// Apply the rotation factor to a capsule, rewriting it in place
    Rekey {
        #[arg(value_name = "CAPSULE")]
        target: PathBuf,
    },
    /// Encrypt INPUT for the recipient into OUTPUT and its capsule
    Encrypt { input: PathBuf, output: PathBuf },
    /// Decrypt INPUT with the secret key and its capsule into OUTPUT
    Decrypt { input: PathBuf, output: PathBuf },
}
