//! Proxy URL construction for the listing fetcher.

use reqwest::Url;

use crate::error::FetchError;

/// Builds `http://<username>:<password>@<host>` for the forward proxy.
///
/// `proxy_host` may be a bare `host:port` or carry an explicit scheme.
/// Credentials are percent-encoded into the authority, so passwords with
/// `@` or `:` survive intact.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] if the host does not parse as a URL
/// authority or cannot carry credentials.
pub fn proxy_url(proxy_host: &str, username: &str, password: &str) -> Result<Url, FetchError> {
    let trimmed = proxy_host.trim().trim_end_matches('/');
    let raw = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };

    let invalid = |reason: String| FetchError::InvalidUrl {
        url: proxy_host.to_owned(),
        reason,
    };

    let mut url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("proxy URL has no host".to_owned()));
    }
    url.set_username(username)
        .map_err(|()| invalid("proxy URL cannot carry a username".to_owned()))?;
    url.set_password(Some(password))
        .map_err(|()| invalid("proxy URL cannot carry a password".to_owned()))?;

    Ok(url)
}
