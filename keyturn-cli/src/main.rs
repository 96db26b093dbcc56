use std::process::ExitCode;

use clap::Parser;
use keyturn_cli::{init_tracing, run, Args};
use keyturn_store::FileStorage;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args, &FileStorage::new()) {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
