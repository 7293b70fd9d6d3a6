use thiserror::Error;

/// Failure of a single proxied listing fetch.
///
/// [`FetchError::is_transient`] decides which variants the retry loop will
/// attempt again.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("timed out fetching {url}: {source}")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed reading response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("TLS certificate rejected for {url}: {source}")]
    Tls {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read trust anchor {path}: {source}")]
    TrustAnchor {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Returns `true` for failures worth one more attempt after the retry delay.
    ///
    /// Transient: timeout, transport, body read, non-2xx status.
    /// Everything else (bad URL, certificate rejection, client setup) fails
    /// the same way on every attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout { .. }
                | FetchError::Transport { .. }
                | FetchError::Body { .. }
                | FetchError::UnexpectedStatus { .. }
        )
    }

    /// Sorts a `reqwest` send/read error into the matching variant.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_owned();
        if err.is_timeout() {
            FetchError::Timeout { url, source: err }
        } else if err.is_builder() {
            FetchError::InvalidUrl {
                url,
                reason: err.to_string(),
            }
        } else if is_certificate_error(&err) {
            FetchError::Tls { url, source: err }
        } else if err.is_body() || err.is_decode() {
            FetchError::Body { url, source: err }
        } else {
            FetchError::Transport { url, source: err }
        }
    }
}

/// Walks `err` and its source chain looking for a rustls certificate
/// rejection.
///
/// `io::Error` hides its wrapped error from `source()`, so custom I/O errors
/// are unwrapped through `get_ref()` as well.
fn is_certificate_error(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(cause) = current {
        let text = cause.to_string().to_ascii_lowercase();
        if text.contains("invalid peer certificate")
            || text.contains("unknownissuer")
            || text.contains("unknown issuer")
        {
            return true;
        }
        if let Some(inner) = cause
            .downcast_ref::<std::io::Error>()
            .and_then(std::io::Error::get_ref)
        {
            if is_certificate_error(inner) {
                return true;
            }
        }
        current = cause.source();
    }
    false
}

/// Failure turning a fetched page into listing fields.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("page body from {url} is not valid UTF-8 text: {source}")]
    NotText {
        url: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Any failure while turning one work item into a record.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// Failure discovering the address list.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("spreadsheet link not found on {url}: {reason}")]
    MissingLink { url: String, reason: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("spreadsheet has no worksheets")]
    NoWorksheet,

    #[error("spreadsheet header row with column \"{column}\" not found")]
    MissingColumn { column: String },
}
