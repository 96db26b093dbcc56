//! Turns parsed arguments into the explicit path set of one workflow.

use keyturn_store::{DecryptPaths, Defaults, EncryptPaths, KeyGenPaths, RekeyPaths, RotatePaths};

use crate::args::{Args, Command};

/// A workflow with every path resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    KeyGen(KeyGenPaths),
    Rotate(RotatePaths),
    Rekey(RekeyPaths),
    Encrypt(EncryptPaths),
    Decrypt(DecryptPaths),
}

/// Resolves paths: explicit flag, then `defaults`.
///
/// Key generation and rotation place the public key (and rotation the
/// factor) next to the secret key unless given explicitly, so both commands
/// maintain the same public key file.
pub fn resolve(args: &Args, defaults: &Defaults) -> Plan {
    let secret_key = args
        .secret_key
        .clone()
        .unwrap_or_else(|| defaults.secret_key.clone());

    match &args.command {
        Command::Keygen => Plan::KeyGen(KeyGenPaths {
            public_key: args
                .public_key
                .clone()
                .unwrap_or_else(|| defaults.public_key_beside(&secret_key)),
            secret_key,
        }),
        Command::Keyrotate => Plan::Rotate(RotatePaths {
            public_key: args
                .public_key
                .clone()
                .unwrap_or_else(|| defaults.public_key_beside(&secret_key)),
            factor: args
                .factor
                .clone()
                .unwrap_or_else(|| defaults.factor_beside(&secret_key)),
            secret_key,
        }),
        Command::Rekey { target } => Plan::Rekey(RekeyPaths {
            factor: args.factor.clone().unwrap_or_else(|| defaults.factor.clone()),
            capsule: target.clone(),
        }),
        Command::Encrypt { input, output } => Plan::Encrypt(EncryptPaths {
            recipient: args
                .recipient
                .clone()
                .unwrap_or_else(|| defaults.recipient.clone()),
            input: input.clone(),
            output: output.clone(),
            capsule: args
                .capsule
                .clone()
                .unwrap_or_else(|| defaults.capsule_for(output)),
        }),
        Command::Decrypt { input, output } => Plan::Decrypt(DecryptPaths {
            secret_key,
            capsule: args
                .capsule
                .clone()
                .unwrap_or_else(|| defaults.capsule_for(input)),
            input: input.clone(),
            output: output.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn plan(argv: &[&str]) -> Plan {
        let args = Args::try_parse_from(argv).unwrap();
        resolve(&args, &Defaults::default())
    }

    #[test]
    fn keygen_defaults_to_working_directory() {
        assert_eq!(
            plan(&["keyturn", "keygen"]),
            Plan::KeyGen(KeyGenPaths {
                secret_key: PathBuf::from("secretkey"),
                public_key: PathBuf::from("publickey"),
            })
        );
    }

    #[test]
    fn keygen_writes_public_key_beside_secret_key() {
        assert_eq!(
            plan(&["keyturn", "keygen", "-s", "/keys/alice/sk"]),
            Plan::KeyGen(KeyGenPaths {
                secret_key: PathBuf::from("/keys/alice/sk"),
                public_key: PathBuf::from("/keys/alice/publickey"),
            })
        );
    }

    #[test]
    fn keygen_and_keyrotate_agree_on_public_key() {
        let Plan::KeyGen(keygen) = plan(&["keyturn", "keygen", "-s", "keys/sk"]) else {
            panic!("expected keygen plan");
        };
        let Plan::Rotate(rotate) = plan(&["keyturn", "keyrotate", "-s", "keys/sk"]) else {
            panic!("expected rotate plan");
        };
        assert_eq!(keygen.public_key, rotate.public_key);
    }

    #[test]
    fn keyrotate_writes_beside_secret_key() {
        assert_eq!(
            plan(&["keyturn", "keyrotate", "-s", "/keys/alice/sk"]),
            Plan::Rotate(RotatePaths {
                secret_key: PathBuf::from("/keys/alice/sk"),
                public_key: PathBuf::from("/keys/alice/publickey"),
                factor: PathBuf::from("/keys/alice/factor"),
            })
        );
    }

    #[test]
    fn keyrotate_explicit_factor_wins() {
        assert_eq!(
            plan(&["keyturn", "-f", "/ops/factor", "keyrotate", "-s", "/keys/sk"]),
            Plan::Rotate(RotatePaths {
                secret_key: PathBuf::from("/keys/sk"),
                public_key: PathBuf::from("/keys/publickey"),
                factor: PathBuf::from("/ops/factor"),
            })
        );
    }

    #[test]
    fn rekey_takes_capsule_positional() {
        assert_eq!(
            plan(&["keyturn", "rekey", "report.bin.encap", "-f", "f1"]),
            Plan::Rekey(RekeyPaths {
                factor: PathBuf::from("f1"),
                capsule: PathBuf::from("report.bin.encap"),
            })
        );
    }

    #[test]
    fn encrypt_capsule_follows_output() {
        assert_eq!(
            plan(&["keyturn", "encrypt", "report.pdf", "out/report.bin", "-r", "bob.pub"]),
            Plan::Encrypt(EncryptPaths {
                recipient: PathBuf::from("bob.pub"),
                input: PathBuf::from("report.pdf"),
                output: PathBuf::from("out/report.bin"),
                capsule: PathBuf::from("out/report.bin.encap"),
            })
        );
    }

    #[test]
    fn decrypt_capsule_follows_input() {
        assert_eq!(
            plan(&["keyturn", "decrypt", "report.bin", "report.pdf"]),
            Plan::Decrypt(DecryptPaths {
                secret_key: PathBuf::from("secretkey"),
                capsule: PathBuf::from("report.bin.encap"),
                input: PathBuf::from("report.bin"),
                output: PathBuf::from("report.pdf"),
            })
        );
    }

    #[test]
    fn explicit_capsule_overrides_suffix() {
        let Plan::Decrypt(paths) = plan(&["keyturn", "decrypt", "a", "b", "-e", "c.cap"]) else {
            panic!("expected decrypt plan");
        };
        assert_eq!(paths.capsule, PathBuf::from("c.cap"));
    }

    #[test]
    fn custom_defaults_apply() {
        let defaults = Defaults {
            capsule_suffix: ".kt".to_string(),
            recipient: PathBuf::from("team.pub"),
            ..Defaults::default()
        };
        let args = Args::try_parse_from(["keyturn", "encrypt", "in", "out"]).unwrap();

        assert_eq!(
            resolve(&args, &defaults),
            Plan::Encrypt(EncryptPaths {
                recipient: PathBuf::from("team.pub"),
                input: PathBuf::from("in"),
                output: PathBuf::from("out"),
                capsule: PathBuf::from("out.kt"),
            })
        );
    }

    #[test]
    fn missing_positionals_rejected() {
        assert!(Args::try_parse_from(["keyturn", "encrypt", "only-input"]).is_err());
        assert!(Args::try_parse_from(["keyturn", "rekey"]).is_err());
        assert!(Args::try_parse_from(["keyturn"]).is_err());
    }
}
