//! Progress reporting capability for the poster run.
//!
//! The batch loop and the HTTP layer report through this trait; the CLI
//! renders it, headless runs and tests use `NoProgress`.

use crate::batch::FilmOutcome;

/// Position of the current film within the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilmPosition {
    /// 1-based index of the film.
    pub index: usize,
    pub total: usize,
}

pub trait Progress {
    /// A film is about to be processed. `label` is `Name (Year)`.
    fn film_started(&self, _pos: FilmPosition, _label: &str) {}

    /// Bytes received so far for the current poster download.
    fn transfer(&self, _bytes_done: u64, _total_bytes: Option<u64>) {}

    /// The film finished with `outcome`.
    fn film_finished(&self, _pos: FilmPosition, _label: &str, _outcome: &FilmOutcome) {}
}

/// Progress sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}
