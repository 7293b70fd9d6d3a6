use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One regulated address paired with the listing-site search URL built for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub address: String,
    /// Initial search URL, before any redirect the listing site applies.
    pub search_url: String,
}

impl WorkItem {
    #[must_use]
    pub fn new(address: impl Into<String>, search_url: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            search_url: search_url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Success,
    Failed,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Success => write!(f, "success"),
            RecordStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Terminal result for a single [`WorkItem`].
///
/// Failed records carry the source identity and timestamp only; every
/// listing-derived field is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub address: String,
    pub search_url: String,
    /// URL reached after redirects, present only when it differs from `search_url`.
    pub final_url: Option<String>,
    /// Building name from the listing page's summary section.
    pub unit_name: Option<String>,
    /// Building address from the listing page's summary section.
    pub unit_address: Option<String>,
    pub has_listing: Option<bool>,
    /// `None` whenever `unit_address` is absent.
    pub same_address: Option<bool>,
    pub status: RecordStatus,
    pub processed_at: DateTime<Utc>,
}

impl ClassificationRecord {
    /// Builds a `failed` record for `item` stamped with the current time.
    #[must_use]
    pub fn failed(item: &WorkItem) -> Self {
        Self {
            address: item.address.clone(),
            search_url: item.search_url.clone(),
            final_url: None,
            unit_name: None,
            unit_address: None,
            has_listing: None,
            same_address: None,
            status: RecordStatus::Failed,
            processed_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RecordStatus::Success
    }
}
