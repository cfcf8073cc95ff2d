//! CLI for huesort, the Letterboxd poster fetcher.

mod console;
mod path_prompt;

use anyhow::{Context, Result};
use clap::Parser;
use huesort_core::batch;
use huesort_core::config;
use huesort_core::http::CurlFetcher;
use huesort_core::interrupt::Interrupt;
use std::path::PathBuf;

use console::ConsoleProgress;

/// Download the poster of every film in a Letterboxd list export.
#[derive(Debug, Parser)]
#[command(name = "huesort")]
#[command(
    about = "huesort: fetch Letterboxd film posters for hue sorting",
    long_about = "Reads a Letterboxd list export (CSV), finds each film's poster and saves a \
                  half-size copy to a `posters` folder next to the file. Posters already \
                  present are skipped, so an interrupted run can simply be started again."
)]
pub struct Cli {
    /// Absolute path to the film-list CSV file.
    #[arg(value_name = "FILM_LIST_CSV")]
    pub film_list_csv: PathBuf,

    /// Debug-level logging in the log file.
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        cfg.validate()?;

        let Some(csv_path) = path_prompt::resolve(self.film_list_csv).await? else {
            println!("Goodbye!");
            return Ok(());
        };

        let interrupt = Interrupt::new();
        spawn_interrupt_watcher(interrupt.clone());

        let list_path = csv_path.clone();
        let summary = tokio::task::spawn_blocking(move || {
            let fetcher = CurlFetcher::new(&cfg.http(), interrupt.clone());
            batch::run_film_list(&list_path, &cfg, &fetcher, &ConsoleProgress::default(), &interrupt)
        })
        .await
        .context("poster run panicked")??;

        console::print_summary(&summary, &csv_path);
        Ok(())
    }
}

/// Raise `interrupt` on the first Ctrl-C; the batch loop and curl check it.
fn spawn_interrupt_watcher(interrupt: Interrupt) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, stopping");
            interrupt.raise();
        }
    });
}

#[cfg(test)]
mod tests;
