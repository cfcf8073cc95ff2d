//! Run-level error type: everything that stops a poster run.
//!
//! Per-film problems (no poster, HTTP error status, undecodable image) are not
//! errors; they are `FilmOutcome`s absorbed by the batch loop.

use std::path::Path;

use crate::film_list::format_help;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Header row with the required labels not found within the scan window.
    #[error("{path}: could not find the column labels {labels} within the first {window} rows\n{help}")]
    Format {
        path: String,
        labels: String,
        window: usize,
        help: String,
    },

    /// Connection-level failure talking to the site or its CDN.
    #[error("could not reach {url}; check your internet connection and run again (finished posters are kept): {source}")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Stopped by the user (Ctrl-C).
    #[error("interrupted")]
    Interrupted,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read film list: {0}")]
    Csv(#[from] csv::Error),

    /// A configured header label set or poster URL pattern does not compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn format(path: &Path, labels: &[String], window: usize) -> Self {
        Error::Format {
            path: path.display().to_string(),
            labels: labels
                .iter()
                .map(|l| format!("`{}`", l))
                .collect::<Vec<_>>()
                .join(", "),
            window,
            help: format_help(labels, window),
        }
    }

    pub(crate) fn network(url: &str, source: curl::Error) -> Self {
        Error::Network {
            url: url.to_string(),
            source,
        }
    }

    /// True for the errors the CLI reports as lost connectivity.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. })
    }
}
