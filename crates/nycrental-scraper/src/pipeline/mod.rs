//! Concurrent fetch-and-classify pipeline.
//!
//! Work items fan out to at most `max_workers` in-flight tasks; records fan
//! back in as they complete. A single coordinating loop owns the record list
//! and the [`FailureBreaker`], so neither needs locking. When the breaker
//! trips, the in-flight stream is dropped: pending fetches and retry sleeps
//! are cancelled and their results never reach the record list.

mod breaker;

use chrono::Utc;
use futures::stream::{self, StreamExt};

use nycrental_core::{AppConfig, ClassificationRecord, RecordStatus, WorkItem};

use crate::classify::ListingClassifier;
use crate::client::ListingFetcher;
use crate::error::ItemError;

pub use breaker::{BreakerState, FailureBreaker};

/// Completions between progress log lines.
const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Upper bound on concurrently processed items. 0 is treated as 1.
    pub max_workers: usize,
    /// Consecutive failures, in completion order, that abort the run.
    pub abort_threshold: u32,
}

impl PipelineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_workers: config.max_workers,
            abort_threshold: config.abort_threshold,
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Records in completion order.
    pub records: Vec<ClassificationRecord>,
    /// `true` if the breaker tripped; `records` then holds only the items
    /// that completed before the trip.
    pub aborted: bool,
}

impl PipelineOutcome {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_success()).count()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.records.len() - self.success_count()
    }
}

/// Drives fetch → classify for every work item with bounded concurrency.
pub struct PipelineOrchestrator<F> {
    fetcher: F,
    classifier: ListingClassifier,
    config: PipelineConfig,
}

impl<F: ListingFetcher> PipelineOrchestrator<F> {
    #[must_use]
    pub fn new(fetcher: F, classifier: ListingClassifier, config: PipelineConfig) -> Self {
        Self {
            fetcher,
            classifier,
            config,
        }
    }

    /// Processes `items` and returns every completed record.
    ///
    /// Items are dispatched in input order; records arrive in completion
    /// order. Item failures become `failed` records and never stop sibling
    /// tasks. Only the breaker aborts the run.
    pub async fn run(&self, items: Vec<WorkItem>) -> PipelineOutcome {
        let total = items.len();
        let max_workers = self.config.max_workers.max(1);
        let mut breaker = FailureBreaker::new(self.config.abort_threshold);
        let mut records: Vec<ClassificationRecord> = Vec::with_capacity(total);
        let mut aborted = false;

        tracing::info!(total, max_workers, "starting listing extraction");

        let mut completions = stream::iter(items)
            .map(|item| self.process_item(item))
            .buffer_unordered(max_workers);

        while let Some(record) = completions.next().await {
            let succeeded = record.is_success();
            records.push(record);

            let completed = records.len();
            if completed % PROGRESS_EVERY == 0 {
                tracing::info!(completed, total, "pipeline progress");
            }

            if breaker.record(succeeded) == BreakerState::Tripped {
                tracing::error!(
                    threshold = breaker.threshold(),
                    completed,
                    total,
                    "consecutive failure threshold reached, aborting pipeline"
                );
                aborted = true;
                break;
            }
        }

        // Dropping the stream cancels every task still in flight.
        drop(completions);

        let outcome = PipelineOutcome { records, aborted };
        tracing::info!(
            completed = outcome.records.len(),
            succeeded = outcome.success_count(),
            failed = outcome.failure_count(),
            total,
            aborted,
            "listing extraction finished"
        );
        outcome
    }

    /// Runs one item to a terminal record. Never fails: errors are logged and
    /// folded into a `failed` record.
    async fn process_item(&self, item: WorkItem) -> ClassificationRecord {
        match self.fetch_and_classify(&item).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(address = %item.address, error = %e, "error processing listing");
                ClassificationRecord::failed(&item)
            }
        }
    }

    async fn fetch_and_classify(&self, item: &WorkItem) -> Result<ClassificationRecord, ItemError> {
        let page = self.fetcher.fetch(&item.search_url).await?;
        let classification = self.classifier.classify(&item.address, &page)?;

        tracing::debug!(
            address = %item.address,
            has_listing = classification.has_listing,
            same_address = ?classification.same_address,
            "classified listing"
        );

        let final_url = (page.final_url != item.search_url).then_some(page.final_url);

        Ok(ClassificationRecord {
            address: item.address.clone(),
            search_url: item.search_url.clone(),
            final_url,
            unit_name: classification.unit_name,
            unit_address: classification.unit_address,
            has_listing: Some(classification.has_listing),
            same_address: classification.same_address,
            status: RecordStatus::Success,
            processed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
#[path = "../pipeline_test.rs"]
mod tests;
