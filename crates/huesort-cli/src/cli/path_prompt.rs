//! Validation of the film-list path, with a re-prompt loop on a terminal.

use anyhow::{bail, Context, Result};
use huesort_core::error::Error;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Why a path was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathProblem {
    NotAbsolute,
    Missing,
    NotCsv,
}

impl PathProblem {
    fn message(self) -> &'static str {
        match self {
            PathProblem::NotAbsolute => "The path you provided is not a full path.",
            PathProblem::Missing => "The file you provided does not exist.",
            PathProblem::NotCsv => "The file you provided is not a .csv file.",
        }
    }
}

/// Accepts an absolute path to an existing `.csv` file.
pub(crate) fn check(path: &Path) -> Result<(), PathProblem> {
    if !path.is_absolute() {
        return Err(PathProblem::NotAbsolute);
    }
    if !path.is_file() {
        return Err(PathProblem::Missing);
    }
    if !path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    {
        return Err(PathProblem::NotCsv);
    }
    Ok(())
}

/// What the user typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Answer {
    Path(PathBuf),
    Quit,
}

pub(crate) fn parse_answer(line: &str) -> Answer {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        Answer::Quit
    } else {
        Answer::Path(PathBuf::from(line))
    }
}

/// Returns a valid film-list path, or `None` if the user chose to quit.
///
/// Without a terminal on stdin the first invalid path is an error. Ctrl-C at
/// the prompt yields `Error::Interrupted`.
pub(crate) async fn resolve(mut path: PathBuf) -> Result<Option<PathBuf>> {
    loop {
        let problem = match check(&path) {
            Ok(()) => return Ok(Some(path)),
            Err(problem) => problem,
        };
        if !io::stdin().is_terminal() {
            bail!("{} ({})", problem.message(), path.display());
        }

        print!(
            "\n{}\nPlease re-enter the full path again.\n(q to quit)\nfull path > ",
            problem.message()
        );
        io::stdout().flush().context("cannot write prompt")?;

        let line = tokio::select! {
            line = tokio::task::spawn_blocking(read_line) => line.context("prompt reader panicked")??,
            _ = tokio::signal::ctrl_c() => return Err(Error::Interrupted.into()),
        };
        // EOF on stdin counts as quitting.
        let Some(line) = line else {
            return Ok(None);
        };
        match parse_answer(&line) {
            Answer::Quit => return Ok(None),
            Answer::Path(next) => path = next,
        }
    }
}

fn read_line() -> Result<Option<String>> {
    let mut line = String::new();
    let n = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("cannot read from stdin")?;
    Ok((n > 0).then_some(line))
}
