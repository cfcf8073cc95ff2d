//! Poster download: fetch image bytes, shrink, save.

use std::path::PathBuf;

use super::resize::shrink_to_jpeg;
use super::store::PosterStore;
use crate::error::{Error, Result};
use crate::http::{Fetch, FetchError};
use crate::progress::Progress;

/// What happened to one poster download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Poster written to `path`.
    Saved { path: PathBuf, bytes: usize },
    /// `<film>.jpg` already existed; nothing was fetched.
    AlreadyPresent { path: PathBuf },
    /// The CDN answered with an HTTP error status.
    HttpStatus(u32),
    /// The response was not a decodable image.
    Undecodable(String),
    /// The transfer failed for this URL only (TLS, redirect loop, bad reply).
    TransferFailed(String),
}

/// Download `poster_url` and save it as the poster for `film_name`, shrunk by
/// `shrink_factor`. Skips the download when the poster file already exists.
pub fn fetch_and_save(
    fetch: &dyn Fetch,
    poster_url: &str,
    store: &PosterStore,
    film_name: &str,
    shrink_factor: u32,
    progress: &dyn Progress,
) -> Result<SaveOutcome> {
    if store.contains(film_name) {
        return Ok(SaveOutcome::AlreadyPresent {
            path: store.path_for(film_name),
        });
    }

    let raw = match fetch.get_bytes(poster_url, progress) {
        Ok(raw) => raw,
        Err(FetchError::Http(code)) => {
            tracing::warn!(poster_url, code, "poster download returned HTTP error");
            return Ok(SaveOutcome::HttpStatus(code));
        }
        Err(FetchError::Aborted) => return Err(Error::Interrupted),
        Err(e @ FetchError::Curl(_)) if !e.is_connection_loss() => {
            tracing::warn!(poster_url, error = %e, "poster download failed");
            return Ok(SaveOutcome::TransferFailed(e.to_string()));
        }
        Err(FetchError::Curl(source)) => return Err(Error::network(poster_url, source)),
    };

    let jpeg = match shrink_to_jpeg(&raw, shrink_factor) {
        Ok(jpeg) => jpeg,
        Err(e) => {
            tracing::warn!(poster_url, error = %e, "poster is not a decodable image");
            return Ok(SaveOutcome::Undecodable(e.to_string()));
        }
    };

    let path = store.save(film_name, &jpeg)?;
    Ok(SaveOutcome::Saved {
        path,
        bytes: jpeg.len(),
    })
}
