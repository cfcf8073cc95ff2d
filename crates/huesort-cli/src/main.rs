use clap::Parser;
use huesort_core::error::Error;
use huesort_core::logging;

mod cli;

use crate::cli::Cli;

/// Exit status after Ctrl-C, as a shell reports SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible; stderr if the state dir is unusable.
    if let Err(err) = logging::init_logging(cli.verbose) {
        logging::init_logging_stderr(cli.verbose);
        tracing::warn!("log file unavailable, logging to stderr: {:#}", err);
    }

    if let Err(err) = cli.run().await {
        match err.downcast_ref::<Error>() {
            Some(Error::Interrupted) => {
                println!("\nGoodbye!");
                std::process::exit(EXIT_INTERRUPTED);
            }
            Some(Error::Format { .. }) => eprintln!("{}", err),
            _ => eprintln!("huesort error: {:#}", err),
        }
        std::process::exit(1);
    }
}
