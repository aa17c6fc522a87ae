//! Batch driver
//!
//! Processes rows sequentially, writes each finished record to its output
//! file and pauses between items.

use super::batch::BatchItem;
use super::output::MarcFiles;
use super::processor::{ItemOutcome, ItemProcessor};
use std::time::Duration;
use tracing::{error, info};

/// Pause after each item when none is configured
pub const DEFAULT_ITEM_PAUSE: Duration = Duration::from_secs(1);

/// Counts of item outcomes for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub cataloged: usize,
    pub synthesized: usize,
    pub duplicates: usize,
    pub no_source: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.cataloged + self.synthesized + self.duplicates + self.no_source + self.failed
    }

    fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Cataloged { .. } => self.cataloged += 1,
            ItemOutcome::Synthesized { .. } => self.synthesized += 1,
            ItemOutcome::DuplicateHeld { .. } => self.duplicates += 1,
            ItemOutcome::NoUsableSource => self.no_source += 1,
            ItemOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Sequential batch run over a slice of rows
pub struct BatchRunner<'a> {
    processor: &'a ItemProcessor,
    files: &'a MarcFiles,
    pause: Duration,
}

impl<'a> BatchRunner<'a> {
    pub fn new(processor: &'a ItemProcessor, files: &'a MarcFiles) -> Self {
        Self {
            processor,
            files,
            pause: DEFAULT_ITEM_PAUSE,
        }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Process `items`, numbering rows from `first_row` in the log
    pub async fn run(&self, items: &[BatchItem], first_row: usize) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (row, item) in items.iter().enumerate() {
            let row = first_row + row;
            info!("Starting row {}", row);

            let mut outcome = self.processor.process(item).await;
            let write_error = outcome
                .record()
                .and_then(|record| self.files.append(record).err());
            if let Some(e) = write_error {
                error!("{}: failed to write record: {}", item.call_number, e);
                outcome = ItemOutcome::Failed {
                    error: e.to_string(),
                };
            }

            info!("Row {} {}", row, outcome);
            summary.record(&outcome);
            info!("Finished row {}", row);

            if !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        info!(
            "Batch finished: {} items, {} cataloged, {} synthesized, {} held, {} without source, {} failed",
            summary.total(),
            summary.cataloged,
            summary.synthesized,
            summary.duplicates,
            summary.no_source,
            summary.failed
        );
        summary
    }
}
