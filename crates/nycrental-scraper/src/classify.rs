//! Listing-page classification: building summary extraction, "no results"
//! detection, and source-address comparison.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::client::FetchedPage;
use crate::error::ClassifyError;
use crate::normalize;

static BUILDING_SUMMARY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"section[data-testid="building-summary-component"]"#)
        .expect("valid building summary selector")
});
static BUILDING_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("valid h1 selector"));
static BUILDING_ADDRESS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("valid h2 selector"));

/// Listing fields extracted from one search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub unit_name: Option<String>,
    pub unit_address: Option<String>,
    pub has_listing: bool,
    /// `None` when the page had no building address to compare against.
    pub same_address: Option<bool>,
}

/// Classifies listing pages against a configured set of "no results" phrases.
#[derive(Debug, Clone)]
pub struct ListingClassifier {
    /// Case- and whitespace-folded phrases.
    no_listing_phrases: Vec<String>,
}

impl ListingClassifier {
    /// Creates a classifier. Phrases are matched case-insensitively; blank
    /// phrases are ignored.
    #[must_use]
    pub fn new<I, S>(no_listing_phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let no_listing_phrases = no_listing_phrases
            .into_iter()
            .map(|p| fold_text(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        Self { no_listing_phrases }
    }

    /// Classifies a fetched page for `source_address`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::NotText`] if the body is not valid UTF-8.
    /// Malformed or unexpected HTML never fails; missing structure yields
    /// `None` fields.
    pub fn classify(
        &self,
        source_address: &str,
        page: &FetchedPage,
    ) -> Result<Classification, ClassifyError> {
        let html = std::str::from_utf8(&page.body).map_err(|source| ClassifyError::NotText {
            url: page.final_url.clone(),
            source,
        })?;
        Ok(self.classify_html(source_address, html))
    }

    /// Classifies already-decoded page content. The HTML is parsed once and
    /// every field is read from that single document.
    #[must_use]
    pub fn classify_html(&self, source_address: &str, html: &str) -> Classification {
        let document = Html::parse_document(html);

        let (unit_name, unit_address) = extract_building_info(&document);
        let has_listing = self.has_listing(html, &document);
        let same_address = unit_address
            .as_deref()
            .map(|scraped| normalize::same_address(source_address, scraped));

        Classification {
            unit_name,
            unit_address,
            has_listing,
            same_address,
        }
    }

    /// `false` when any configured phrase occurs in the page content.
    ///
    /// The raw markup is searched as well as the parsed text, so phrases in
    /// attribute values (`<meta content>`, `aria-label`) count. Text nodes
    /// are searched both joined directly and space-separated, so a phrase
    /// split by inline tags still matches.
    fn has_listing(&self, raw_html: &str, document: &Html) -> bool {
        let nodes: Vec<&str> = document.root_element().text().collect();
        let haystacks = [
            fold_text(raw_html),
            fold_text(&nodes.concat()),
            fold_text(&nodes.join(" ")),
        ];
        !self.no_listing_phrases.iter().any(|phrase| {
            haystacks
                .iter()
                .any(|haystack| haystack.contains(phrase.as_str()))
        })
    }
}

/// Returns the building name (`h1`) and address (`h2`) from the building
/// summary section, if the page has one.
fn extract_building_info(document: &Html) -> (Option<String>, Option<String>) {
    let Some(summary) = document.select(&BUILDING_SUMMARY).next() else {
        tracing::debug!("no building summary found in page");
        return (None, None);
    };

    let name = summary.select(&BUILDING_NAME).next().and_then(element_text);
    let address = summary.select(&BUILDING_ADDRESS).next().and_then(element_text);
    (name, address)
}

/// Concatenates an element's trimmed text nodes; `None` if nothing remains.
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text: String = element.text().map(str::trim).collect();
    (!text.is_empty()).then_some(text)
}

/// Lower-cases, folds typographic apostrophes, and collapses whitespace so
/// phrase matching is insensitive to markup line breaks.
fn fold_text(text: &str) -> String {
    text.to_lowercase()
        .replace(['\u{2018}', '\u{2019}'], "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
