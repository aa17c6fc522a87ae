//! Batch workflow
//!
//! - `batch` - TSV rows and derived file names
//! - `processor` - per-item pipeline (providers, catalog search, evaluation, synthesis)
//! - `runner` - sequential batch driver
//! - `output` - append-only record files
//! - `review` - operator review notices

pub mod batch;
pub mod output;
pub mod processor;
pub mod review;
pub mod runner;

pub use batch::{parse_batch, read_batch, select_rows, BatchItem, BatchPaths};
pub use output::{count_records, oclc_numbers, read_records, MarcFiles};
pub use processor::{ItemOutcome, ItemProcessor, ProcessingDates, ProviderReleases};
pub use review::{CollectingReviewSink, ReviewNotice, ReviewSink, TracingReviewSink};
pub use runner::{BatchRunner, BatchSummary, DEFAULT_ITEM_PAUSE};
