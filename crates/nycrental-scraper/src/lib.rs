pub mod classify;
pub mod client;
pub mod error;
pub mod normalize;
pub mod pipeline;
mod retry;
pub mod source;

pub use classify::{Classification, ListingClassifier};
pub use client::{FetchedPage, FetcherConfig, ListingFetcher, ProxiedFetcher};
pub use error::{ClassifyError, FetchError, ItemError, SourceError};
pub use normalize::{normalize_address, same_address};
pub use pipeline::{
    BreakerState, FailureBreaker, PipelineConfig, PipelineOrchestrator, PipelineOutcome,
};
pub use source::ClassBListSource;
