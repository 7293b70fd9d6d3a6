//! Discovery of regulated addresses from the city's Class B dwellings list.
//!
//! The list is published as a spreadsheet linked from an HTML page. The page
//! is fetched, the spreadsheet link located, and the workbook parsed into
//! [`WorkItem`]s, each paired with a listing-site search URL.

mod sheet;

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::{Client, Url};
use scraper::{Html, Selector};

use nycrental_core::{AppConfig, WorkItem};

use crate::error::SourceError;

pub use sheet::work_items_from_workbook;

/// Text of the paragraph that holds the spreadsheet download link.
const XLS_LINK_LABEL: &str = "Class B Multiple Dwellings List (XLS)";

static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid paragraph selector"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Produces the ordered work list for a pipeline run.
pub struct ClassBListSource {
    client: Client,
    source_url: String,
    base_url: String,
    search_base_url: String,
    boroughs: Vec<String>,
}

impl ClassBListSource {
    /// Creates a source with a plain (non-proxied) HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        source_url: &str,
        base_url: &str,
        search_base_url: &str,
        boroughs: Vec<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            source_url: source_url.to_owned(),
            base_url: base_url.to_owned(),
            search_base_url: search_base_url.to_owned(),
            boroughs,
        })
    }

    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::new(
            &config.source_url,
            &config.source_base_url,
            &config.search_base_url,
            config.boroughs.clone(),
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Fetches the source page and spreadsheet and returns the work list in
    /// spreadsheet row order.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] / [`SourceError::UnexpectedStatus`] on fetch failure.
    /// - [`SourceError::MissingLink`] if the page has no spreadsheet link.
    /// - [`SourceError::Spreadsheet`], [`SourceError::NoWorksheet`],
    ///   [`SourceError::MissingColumn`] if the workbook cannot be read.
    pub async fn list_work_items(&self) -> Result<Vec<WorkItem>, SourceError> {
        tracing::info!(url = %self.source_url, "starting address extraction");

        let page = self.get(&self.source_url).await?;
        let html = String::from_utf8_lossy(&page);
        let xls_url = find_xls_link(&html, &self.source_url, &self.base_url)?;
        tracing::debug!(url = %xls_url, "found spreadsheet link");

        let workbook = self.get(&xls_url).await?;
        let items = work_items_from_workbook(&workbook, &self.boroughs, &self.search_base_url)?;

        tracing::info!(count = items.len(), boroughs = ?self.boroughs, "found valid addresses");
        Ok(items)
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Finds the spreadsheet link inside the paragraph labelled
/// [`XLS_LINK_LABEL`]. Relative links are resolved against `base_url`.
fn find_xls_link(html: &str, page_url: &str, base_url: &str) -> Result<String, SourceError> {
    let document = Html::parse_document(html);
    let missing = |reason: &str| SourceError::MissingLink {
        url: page_url.to_owned(),
        reason: reason.to_owned(),
    };

    let paragraph = document
        .select(&PARAGRAPH)
        .find(|p| p.text().collect::<String>().contains(XLS_LINK_LABEL))
        .ok_or_else(|| missing("download paragraph not found"))?;

    let href = paragraph
        .select(&ANCHOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| missing("download anchor not found"))?;

    Ok(absolute_url(href, base_url))
}

fn absolute_url(href: &str, base_url: &str) -> String {
    if href.starts_with("http") {
        href.to_owned()
    } else {
        format!("{}{href}", base_url.trim_end_matches('/'))
    }
}

/// Builds the listing-site search URL for `address`:
/// `<search_base>?utf8=✓&search=<address>&commit=`.
///
/// # Errors
///
/// Returns [`SourceError::InvalidUrl`] if `search_base_url` does not parse.
pub fn search_url(search_base_url: &str, address: &str) -> Result<String, SourceError> {
    let mut url = Url::parse(search_base_url).map_err(|e| SourceError::InvalidUrl {
        url: search_base_url.to_owned(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut()
        .append_pair("utf8", "\u{2713}")
        .append_pair("search", address)
        .append_pair("commit", "");
    Ok(url.to_string())
}

#[cfg(test)]
#[path = "../source_test.rs"]
mod tests;
