use thiserror::Error;
use url::Url;

/// Why a URL was refused before being handed to the system browser.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Check a URL before opening it with the platform handler.
///
/// Only `http` and `https` URLs with a host are allowed, so a stored bookmark
/// can never launch `file://`, `javascript:` or a custom protocol handler.
/// Local and private addresses are fine here; bookmarking a router page or a
/// dev server is a normal thing to do.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if !url.host_str().is_some_and(|h| !h.is_empty()) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_urls_accepted() {
        assert!(validate_url_for_open("https://claude.ai").is_ok());
        assert!(validate_url_for_open("http://bbc.com/news").is_ok());
        assert!(validate_url_for_open("  https://x.com  ").is_ok());
    }

    #[test]
    fn test_local_hosts_accepted() {
        assert!(validate_url_for_open("http://localhost:3000").is_ok());
        assert!(validate_url_for_open("http://192.168.1.1").is_ok());
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert!(matches!(
            validate_url_for_open("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(s)) if s == "file"
        ));
        assert!(validate_url_for_open("javascript:alert(1)").is_err());
        assert!(validate_url_for_open("ftp://example.com").is_err());
    }

    #[test]
    fn test_unparsable_rejected() {
        assert!(matches!(
            validate_url_for_open("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }
}
