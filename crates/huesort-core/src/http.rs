//! Blocking HTTP GET for film pages and poster images.
//!
//! Uses the curl crate (libcurl) with one `Easy` handle per request. Requests
//! follow redirects and honour the shared interrupt flag through curl's
//! progress callback, so Ctrl-C stops a transfer mid-flight.

use std::time::Duration;

use crate::config::HttpConfig;
use crate::interrupt::Interrupt;
use crate::progress::Progress;

/// Failure of a single GET.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported a transport error (connect, resolve, timeout, TLS...).
    #[error("{0}")]
    Curl(#[source] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The interrupt flag was raised during the transfer.
    #[error("transfer aborted")]
    Aborted,
}

impl FetchError {
    /// True when the failure says the network is gone rather than that one
    /// response was bad: connect/resolve failures, send/recv errors, timeouts
    /// and empty replies. Other curl errors (TLS, redirect loops, malformed
    /// replies) concern a single URL.
    pub fn is_connection_loss(&self) -> bool {
        match self {
            FetchError::Curl(e) => is_connection_error(e),
            FetchError::Http(_) | FetchError::Aborted => false,
        }
    }
}

fn is_connection_error(e: &curl::Error) -> bool {
    e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_operation_timedout()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
}

/// HTTP capability used by the poster pipeline. Implemented by `CurlFetcher`
/// for real runs; tests substitute in-memory fakes.
pub trait Fetch {
    /// GET `url` and return the body decoded as UTF-8 (lossy).
    fn get_text(&self, url: &str) -> Result<String, FetchError>;

    /// GET `url` and return the raw body, reporting transfer progress.
    fn get_bytes(&self, url: &str, progress: &dyn Progress) -> Result<Vec<u8>, FetchError>;
}

/// libcurl-backed fetcher.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: String,
    interrupt: Interrupt,
}

impl CurlFetcher {
    pub fn new(cfg: &HttpConfig, interrupt: Interrupt) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            user_agent: cfg.user_agent.clone(),
            interrupt,
        }
    }

    fn get(&self, url: &str, progress: &dyn Progress) -> Result<Vec<u8>, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(FetchError::Curl)?;
        easy.follow_location(true).map_err(FetchError::Curl)?;
        easy.max_redirections(10).map_err(FetchError::Curl)?;
        easy.connect_timeout(self.connect_timeout)
            .map_err(FetchError::Curl)?;
        easy.timeout(self.timeout).map_err(FetchError::Curl)?;
        easy.useragent(&self.user_agent).map_err(FetchError::Curl)?;
        easy.accept_encoding("").map_err(FetchError::Curl)?;
        easy.progress(true).map_err(FetchError::Curl)?;

        let interrupt = self.interrupt.clone();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(FetchError::Curl)?;
            transfer
                .progress_function(|dl_total, dl_now, _, _| {
                    if interrupt.is_raised() {
                        return false;
                    }
                    if dl_total > 0.0 {
                        progress.transfer(dl_now as u64, Some(dl_total as u64));
                    } else {
                        progress.transfer(dl_now as u64, None);
                    }
                    true
                })
                .map_err(FetchError::Curl)?;
            if let Err(e) = transfer.perform() {
                if e.is_aborted_by_callback() {
                    return Err(FetchError::Aborted);
                }
                return Err(FetchError::Curl(e));
            }
        }

        let code = easy.response_code().map_err(FetchError::Curl)?;
        if !(200..300).contains(&code) {
            tracing::debug!(url, code, "GET returned non-success status");
            return Err(FetchError::Http(code));
        }
        tracing::debug!(url, bytes = body.len(), "GET complete");
        Ok(body)
    }
}

impl Fetch for CurlFetcher {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let body = self.get(url, &crate::progress::NoProgress)?;
        Ok(decode_text(&body))
    }

    fn get_bytes(&self, url: &str, progress: &dyn Progress) -> Result<Vec<u8>, FetchError> {
        self.get(url, progress)
    }
}

/// Decode a page body as UTF-8, replacing invalid sequences.
fn decode_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_text_utf8() {
        assert_eq!(decode_text("Amélie".as_bytes()), "Amélie");
    }

    #[test]
    fn decode_text_invalid_bytes_replaced() {
        let s = decode_text(b"ok\xffok");
        assert!(s.starts_with("ok"));
        assert!(s.ends_with("ok"));
        assert!(s.contains('\u{FFFD}'));
    }

    #[test]
    fn connection_class_curl_errors() {
        // CURLE_COULDNT_RESOLVE_HOST, COULDNT_CONNECT, OPERATION_TIMEDOUT,
        // GOT_NOTHING, SEND_ERROR, RECV_ERROR
        for code in [6, 7, 28, 52, 55, 56] {
            assert!(
                FetchError::Curl(curl::Error::new(code)).is_connection_loss(),
                "code {code}"
            );
        }
        // CURLE_WEIRD_SERVER_REPLY, SSL_CONNECT_ERROR, TOO_MANY_REDIRECTS
        for code in [8, 35, 47] {
            assert!(
                !FetchError::Curl(curl::Error::new(code)).is_connection_loss(),
                "code {code}"
            );
        }
        assert!(!FetchError::Http(503).is_connection_loss());
        assert!(!FetchError::Aborted.is_connection_loss());
    }

    #[test]
    fn fetch_error_display() {
        assert_eq!(FetchError::Http(404).to_string(), "HTTP 404");
        assert_eq!(FetchError::Aborted.to_string(), "transfer aborted");
    }
}
