//! Outbound links: web search, favicons, and opening URLs in the browser.

use std::cell::RefCell;
use std::rc::Rc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use url::Url;

use crate::util::{validate_url_for_open, UrlValidationError};

const SEARCH_ENDPOINT: &str = "https://www.google.com/search?q=";
const FAVICON_ENDPOINT: &str = "https://www.google.com/s2/favicons";
const FAVICON_FALLBACK_DOMAIN: &str = "example.com";

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Google search URL for `query`, or `None` when the query is blank.
///
/// The query is sent as typed, surrounding whitespace included.
pub fn web_search_url(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        return None;
    }
    Some(format!(
        "{SEARCH_ENDPOINT}{}",
        utf8_percent_encode(query, URI_COMPONENT)
    ))
}

/// 32px favicon URL for the host of `url`.
///
/// Scheme-less values are parsed as `https://`. Anything without a usable
/// host falls back to a fixed domain rather than failing.
pub fn favicon_url(url: &str) -> String {
    let candidate = if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    };
    let domain = match Url::parse(&candidate) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => FAVICON_FALLBACK_DOMAIN.to_string(),
        },
        Err(e) => {
            tracing::debug!(url, error = %e, "Favicon domain fallback");
            FAVICON_FALLBACK_DOMAIN.to_string()
        }
    };
    format!("{FAVICON_ENDPOINT}?domain={domain}&sz=32")
}

#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Rejected(#[from] UrlValidationError),

    #[error("Failed to open browser: {0}")]
    Launch(#[from] std::io::Error),
}

/// Something that can show a URL to the user.
pub trait LinkOpener {
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Opens URLs with the platform handler (`xdg-open`, `open`, `start`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        validate_url_for_open(url)?;
        open::that(url)?;
        tracing::info!(url = %url, "Opened link");
        Ok(())
    }
}

/// Records URLs that pass validation instead of launching a browser.
///
/// Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingOpener {
    opened: Rc<RefCell<Vec<String>>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        validate_url_for_open(url)?;
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_search_url_encodes_like_uri_component() {
        assert_eq!(
            web_search_url("rust lang").as_deref(),
            Some("https://www.google.com/search?q=rust%20lang")
        );
        assert_eq!(
            web_search_url("a&b=c/d?").as_deref(),
            Some("https://www.google.com/search?q=a%26b%3Dc%2Fd%3F")
        );
        assert_eq!(
            web_search_url("it's (fine)!*~").as_deref(),
            Some("https://www.google.com/search?q=it's%20(fine)!*~")
        );
        assert_eq!(
            web_search_url("café").as_deref(),
            Some("https://www.google.com/search?q=caf%C3%A9")
        );
    }

    #[test]
    fn test_web_search_url_blank_is_none() {
        assert_eq!(web_search_url(""), None);
        assert_eq!(web_search_url("   "), None);
    }

    #[test]
    fn test_favicon_url() {
        assert_eq!(
            favicon_url("https://github.com/rust-lang"),
            "https://www.google.com/s2/favicons?domain=github.com&sz=32"
        );
        assert_eq!(
            favicon_url("music.youtube.com"),
            "https://www.google.com/s2/favicons?domain=music.youtube.com&sz=32"
        );
    }

    #[test]
    fn test_favicon_url_fallback() {
        assert_eq!(
            favicon_url("http://"),
            "https://www.google.com/s2/favicons?domain=example.com&sz=32"
        );
        assert_eq!(
            favicon_url("not a url"),
            "https://www.google.com/s2/favicons?domain=example.com&sz=32"
        );
    }

    #[test]
    fn test_recording_opener_validates() {
        let opener = RecordingOpener::new();
        opener.open("https://claude.ai").unwrap();
        assert!(opener.open("file:///etc/passwd").is_err());
        assert_eq!(opener.opened(), vec!["https://claude.ai".to_string()]);
    }

    #[test]
    fn test_opener_keeps_stored_url_exactly() {
        let opener = RecordingOpener::new();
        opener.open("https://Example.COM/a b").unwrap();
        opener.open("http://localhost:8080/Path?q=1").unwrap();
        assert_eq!(
            opener.opened(),
            vec![
                "https://Example.COM/a b".to_string(),
                "http://localhost:8080/Path?q=1".to_string(),
            ]
        );
    }
}
