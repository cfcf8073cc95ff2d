//! Console rendering of run progress and the final summary.

use huesort_core::batch::{BatchSummary, FilmOutcome};
use huesort_core::progress::{FilmPosition, Progress};
use std::cell::Cell;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

const TRANSFER_REDRAW: Duration = Duration::from_millis(250);

/// One status line per film, with a byte counter while a poster downloads.
#[derive(Debug, Default)]
pub(crate) struct ConsoleProgress {
    last_draw: Cell<Option<Instant>>,
}

impl Progress for ConsoleProgress {
    fn film_started(&self, pos: FilmPosition, label: &str) {
        self.last_draw.set(None);
        print!("[{}/{}] {} ", pos.index, pos.total, label);
        let _ = io::stdout().flush();
    }

    fn transfer(&self, bytes_done: u64, total_bytes: Option<u64>) {
        let now = Instant::now();
        if let Some(last) = self.last_draw.get() {
            if now.duration_since(last) < TRANSFER_REDRAW {
                return;
            }
        }
        self.last_draw.set(Some(now));
        let done_kib = bytes_done as f64 / 1024.0;
        match total_bytes {
            Some(total) => print!("\r  {:.1} / {:.1} KiB  ", done_kib, total as f64 / 1024.0),
            None => print!("\r  {:.1} KiB  ", done_kib),
        }
        let _ = io::stdout().flush();
    }

    fn film_finished(&self, pos: FilmPosition, label: &str, outcome: &FilmOutcome) {
        if self.last_draw.get().is_some() {
            // Redraw the film line over the byte counter.
            print!("\r[{}/{}] {} ", pos.index, pos.total, label);
        }
        println!("{}", describe(outcome));
    }
}

fn describe(outcome: &FilmOutcome) -> String {
    match outcome {
        FilmOutcome::Downloaded { .. } => "saved".to_string(),
        FilmOutcome::AlreadyPresent => "already downloaded".to_string(),
        FilmOutcome::NoPoster => "no poster found".to_string(),
        FilmOutcome::Unavailable { reason } => format!("skipped: {}", reason),
        FilmOutcome::InvalidUrl => "skipped: URL is not a web link".to_string(),
    }
}

pub(crate) fn print_summary(summary: &BatchSummary, csv_path: &Path) {
    println!();
    println!(
        "{} poster(s) saved, {} already present.",
        summary.downloaded, summary.already_present
    );
    if summary.soft_failures() > 0 {
        println!(
            "{} film(s) without a poster (see the log for details).",
            summary.soft_failures()
        );
    }
    if summary.skipped_rows > 0 {
        println!(
            "{} row(s) in {} had no film name or URL.",
            summary.skipped_rows,
            csv_path.display()
        );
    }
}
