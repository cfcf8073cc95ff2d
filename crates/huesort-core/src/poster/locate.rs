//! Finding a film's poster URL on its Letterboxd page.
//!
//! Film pages embed the poster link in script content (JSON-LD metadata and
//! inline config), so only `<script>` bodies are searched.

use regex::Regex;

use crate::error::{Error, Result};
use crate::http::{Fetch, FetchError};

/// Poster URL lookup for film pages.
#[derive(Debug, Clone)]
pub struct PosterLocator {
    poster_url: Regex,
    script: Regex,
}

impl PosterLocator {
    /// `poster_url_pattern` matches a full poster image URL, e.g.
    /// [`crate::config::DEFAULT_POSTER_URL_PATTERN`].
    pub fn new(poster_url_pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            poster_url: Regex::new(poster_url_pattern)?,
            script: Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>")?,
        })
    }

    /// First poster URL inside the page's script content, if any.
    pub fn find_in_page(&self, html: &str) -> Option<String> {
        self.script
            .captures_iter(html)
            .filter_map(|cap| cap.get(1))
            .find_map(|body| self.poster_url.find(body.as_str()))
            .map(|m| unescape_json_slashes(m.as_str()))
    }

    /// Fetch `film_url` and look for its poster.
    ///
    /// Returns `Ok(None)` when the page has no poster, answers with an HTTP
    /// error status or fails in a way specific to this URL (TLS, redirect
    /// loop). Lost connectivity and interrupts are run errors.
    pub fn locate(&self, fetch: &dyn Fetch, film_url: &str) -> Result<Option<String>> {
        let html = match fetch.get_text(film_url) {
            Ok(html) => html,
            Err(FetchError::Http(code)) => {
                tracing::warn!(film_url, code, "film page returned HTTP error");
                return Ok(None);
            }
            Err(FetchError::Aborted) => return Err(Error::Interrupted),
            Err(e @ FetchError::Curl(_)) if !e.is_connection_loss() => {
                tracing::warn!(film_url, error = %e, "film page could not be loaded");
                return Ok(None);
            }
            Err(FetchError::Curl(source)) => {
                return Err(Error::network(film_url, source));
            }
        };
        let found = self.find_in_page(&html);
        match &found {
            Some(poster_url) => tracing::debug!(film_url, poster_url = %poster_url, "poster located"),
            None => tracing::info!(film_url, "no poster URL on film page"),
        }
        Ok(found)
    }
}

/// JSON string values in script tags may escape `/` as `\/`.
fn unescape_json_slashes(s: &str) -> String {
    s.replace("\\/", "/")
}
