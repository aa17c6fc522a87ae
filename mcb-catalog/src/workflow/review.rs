//! Operator review notices
//!
//! Items that need a person to look at the physical CD are reported through a
//! `ReviewSink`. The default sink logs a `Pull CD for review [...]` line.

use super::batch::BatchItem;
use std::fmt;
use std::sync::Mutex;
use tracing::info;

/// Why an item needs review
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewNotice {
    /// A usable catalog record is already held locally
    HeldLocally { oclc_number: String },
    /// No catalog record survived; one was synthesized from provider data
    OriginalRecordCreated,
    /// No catalog record and no provider data
    NoRecordCreated,
    /// The chosen catalog record is missing something a cataloger should check
    RecordProblem(String),
}

impl ReviewNotice {
    /// Short label used in the pull line
    pub fn label(&self) -> &'static str {
        match self {
            ReviewNotice::HeldLocally { .. } => "held locally",
            ReviewNotice::OriginalRecordCreated => "original record created",
            ReviewNotice::NoRecordCreated => "no record created",
            ReviewNotice::RecordProblem(_) => "record problem",
        }
    }
}

impl fmt::Display for ReviewNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewNotice::HeldLocally { oclc_number } => {
                write!(f, "{} (OCLC {})", self.label(), oclc_number)
            }
            ReviewNotice::RecordProblem(problem) => write!(f, "REVIEW: {}", problem),
            other => f.write_str(other.label()),
        }
    }
}

/// Receives review notices for items
pub trait ReviewSink: Send + Sync {
    fn notify(&self, item: &BatchItem, notice: ReviewNotice);
}

/// Writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReviewSink;

impl ReviewSink for TracingReviewSink {
    fn notify(&self, item: &BatchItem, notice: ReviewNotice) {
        match notice {
            ReviewNotice::RecordProblem(problem) => info!("REVIEW: {}", problem),
            notice => info!(
                "Pull CD for review [{}]: {} ({})",
                notice.label(),
                item.call_number,
                item.official_title
            ),
        }
    }
}

/// Keeps notices in memory, for reports and tests
#[derive(Debug, Default)]
pub struct CollectingReviewSink {
    notices: Mutex<Vec<(String, ReviewNotice)>>,
}

impl CollectingReviewSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(call number, notice)` pairs in the order received
    pub fn notices(&self) -> Vec<(String, ReviewNotice)> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl ReviewSink for CollectingReviewSink {
    fn notify(&self, item: &BatchItem, notice: ReviewNotice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push((item.call_number.clone(), notice));
        }
    }
}
