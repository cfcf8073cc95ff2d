//! The poster run: one film at a time, in list order.
//!
//! Per film: skip if its poster already exists, otherwise locate the poster
//! URL on the film page, then download and save it. Missing posters and bad
//! responses are soft outcomes; connectivity loss and interrupts end the run
//! immediately. Posters saved before the failure stay on disk, and the next
//! run skips them.

use std::path::{Path, PathBuf};

use crate::config::HuesortConfig;
use crate::error::{Error, Result};
use crate::film_list::{self, FilmEntry, HeaderPattern};
use crate::http::Fetch;
use crate::interrupt::Interrupt;
use crate::poster::{fetch_and_save, PosterLocator, PosterStore, SaveOutcome};
use crate::progress::{FilmPosition, Progress};

/// Result for one film.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilmOutcome {
    Downloaded { path: PathBuf },
    /// Poster saved by an earlier run; nothing fetched.
    AlreadyPresent,
    /// The film page has no poster URL (or could not be loaded).
    NoPoster,
    /// A poster URL was found but could not be turned into a file.
    Unavailable { reason: String },
    /// The `URL` column is not an absolute http(s) link.
    InvalidUrl,
}

impl FilmOutcome {
    /// True for outcomes that leave the film without a poster.
    pub fn is_soft_failure(&self) -> bool {
        matches!(
            self,
            FilmOutcome::NoPoster | FilmOutcome::Unavailable { .. } | FilmOutcome::InvalidUrl
        )
    }
}

/// Counts per outcome for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub downloaded: usize,
    pub already_present: usize,
    pub no_poster: usize,
    pub unavailable: usize,
    pub invalid_url: usize,
    /// Rows without a name or URL, never attempted.
    pub skipped_rows: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &FilmOutcome) {
        match outcome {
            FilmOutcome::Downloaded { .. } => self.downloaded += 1,
            FilmOutcome::AlreadyPresent => self.already_present += 1,
            FilmOutcome::NoPoster => self.no_poster += 1,
            FilmOutcome::Unavailable { .. } => self.unavailable += 1,
            FilmOutcome::InvalidUrl => self.invalid_url += 1,
        }
    }

    /// Films attempted but left without a poster.
    pub fn soft_failures(&self) -> usize {
        self.no_poster + self.unavailable + self.invalid_url
    }
}

/// Everything the run needs besides the film list.
pub struct Batch<'a> {
    pub fetch: &'a dyn Fetch,
    pub locator: &'a PosterLocator,
    pub store: &'a PosterStore,
    pub shrink_factor: u32,
    pub progress: &'a dyn Progress,
    pub interrupt: &'a Interrupt,
}

impl Batch<'_> {
    /// Process `films` in order. Returns the summary, or the error that ended
    /// the run early (`Network`, `Interrupted`, `Io`).
    pub fn run(&self, films: &[FilmEntry]) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        let total = films.len();
        tracing::info!(total, dir = %self.store.dir().display(), "poster run started");

        for (i, film) in films.iter().enumerate() {
            if self.interrupt.is_raised() {
                tracing::info!(done = i, total, "run interrupted");
                return Err(Error::Interrupted);
            }
            let pos = FilmPosition { index: i + 1, total };
            let label = film.label();
            self.progress.film_started(pos, &label);

            let outcome = match self.process(film) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(film = %film.name, error = %e, "poster run stopped");
                    return Err(e);
                }
            };
            if outcome.is_soft_failure() {
                tracing::warn!(film = %film.name, url = %film.url, ?outcome, "no poster saved");
            }
            summary.record(&outcome);
            self.progress.film_finished(pos, &label, &outcome);
        }

        tracing::info!(?summary, "poster run finished");
        Ok(summary)
    }

    fn process(&self, film: &FilmEntry) -> Result<FilmOutcome> {
        if self.store.contains(&film.name) {
            tracing::debug!(film = %film.name, "poster already downloaded");
            return Ok(FilmOutcome::AlreadyPresent);
        }
        if !is_http_url(&film.url) {
            return Ok(FilmOutcome::InvalidUrl);
        }

        let Some(poster_url) = self.locator.locate(self.fetch, &film.url)? else {
            return Ok(FilmOutcome::NoPoster);
        };

        let outcome = fetch_and_save(
            self.fetch,
            &poster_url,
            self.store,
            &film.name,
            self.shrink_factor,
            self.progress,
        )?;
        Ok(match outcome {
            SaveOutcome::Saved { path, .. } => FilmOutcome::Downloaded { path },
            SaveOutcome::AlreadyPresent { .. } => FilmOutcome::AlreadyPresent,
            SaveOutcome::HttpStatus(code) => FilmOutcome::Unavailable {
                reason: format!("poster request returned HTTP {}", code),
            },
            SaveOutcome::Undecodable(e) => FilmOutcome::Unavailable {
                reason: format!("poster is not a readable image: {}", e),
            },
            SaveOutcome::TransferFailed(e) => FilmOutcome::Unavailable {
                reason: format!("poster download failed: {}", e),
            },
        })
    }
}

/// Parse the film list at `csv_path` and fetch every missing poster into the
/// posters directory beside it.
pub fn run_film_list(
    csv_path: &Path,
    cfg: &HuesortConfig,
    fetch: &dyn Fetch,
    progress: &dyn Progress,
    interrupt: &Interrupt,
) -> Result<BatchSummary> {
    let pattern = HeaderPattern::new(&cfg.required_labels)?;
    let parsed = film_list::parse_required(csv_path, &pattern, cfg.max_header_scan_rows)?;
    let (films, skipped_rows) = parsed.entries();
    if skipped_rows > 0 {
        tracing::warn!(skipped_rows, "rows without a film name or URL skipped");
    }

    let store = PosterStore::beside(csv_path, &cfg.posters_dir_name)?;
    let locator = PosterLocator::new(&cfg.poster_url_pattern)?;
    let batch = Batch {
        fetch,
        locator: &locator,
        store: &store,
        shrink_factor: cfg.shrink_factor,
        progress,
        interrupt,
    };
    let mut summary = batch.run(&films)?;
    summary.skipped_rows = skipped_rows;
    Ok(summary)
}

fn is_http_url(s: &str) -> bool {
    url::Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false)
}
