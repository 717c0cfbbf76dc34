use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

fn parse_http_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

/// Validates the backend base URL.
///
/// Unlike links opened in the browser, the backend is expected to live on
/// localhost or a private network, so no host restrictions apply beyond
/// requiring one. Query and fragment are dropped since endpoints are built by
/// appending path segments.
///
/// ```
/// use hecate::util::validate_base_url;
///
/// let url = validate_base_url("http://localhost:8000").unwrap();
/// assert_eq!(url.port(), Some(8000));
/// assert!(validate_base_url("file:///tmp/socket").is_err());
/// ```
pub fn validate_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let mut url = parse_http_url(url_str)?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Validates a post's discussion URL before handing it to the system browser.
///
/// Only http/https are allowed so that a crafted `discussionUrl` cannot launch
/// `file://` or custom protocol handlers.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    parse_http_url(url_str)
}
