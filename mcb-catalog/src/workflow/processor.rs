//! Per-item pipeline
//!
//! For one CD:
//! 1. Fetch Discogs and MusicBrainz releases for the product code
//! 2. Gather reference titles (official title plus provider titles)
//! 3. Search the catalog by standard number, then by publisher numbers
//! 4. Discard everything if any usable candidate is held locally
//! 5. Rank the usable candidates, or synthesize from the preferred release
//! 6. Add local fields
//!
//! Collaborators, the review sink and dates are injected; nothing here holds
//! state between items.

use super::batch::BatchItem;
use super::review::{ReviewNotice, ReviewSink};
use crate::error::CatalogResult;
use crate::evaluate::{
    best_record, check_holdings, external_id, record_problems, usable_records, HoldingsCheck,
    ReferenceTitles,
};
use crate::marc::Record;
use crate::sources::{CatalogSource, DiscogsSource, MusicBrainzSource, SearchIndex};
use crate::synthesis::{
    preferred_release, publisher_numbers, synthesize, ExternalReleaseRecord, LocalizedRecord,
    ProviderKind, SourcedRecord,
};
use chrono::NaiveDate;
use mcb_common::config::LocalFieldsConfig;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Dates written into records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingDates {
    /// Date entered on file (008/00-05) for synthesized records
    pub entered: NaiveDate,
    /// Batch processing date (962 $c)
    pub processed: NaiveDate,
}

impl ProcessingDates {
    /// Both dates set to the same day
    pub fn on(date: NaiveDate) -> Self {
        Self {
            entered: date,
            processed: date,
        }
    }
}

/// What happened to one item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// A catalog record won and was localized
    Cataloged {
        record: LocalizedRecord,
        oclc_number: String,
    },
    /// No catalog record survived; a record was built from provider data
    Synthesized {
        record: LocalizedRecord,
        provider: ProviderKind,
    },
    /// A usable candidate is already held locally; nothing is written
    DuplicateHeld { oclc_number: String },
    /// No usable catalog record and no provider data
    NoUsableSource,
    /// Processing failed; the batch continues with the next item
    Failed { error: String },
}

impl ItemOutcome {
    /// Record to write, if any
    pub fn record(&self) -> Option<&LocalizedRecord> {
        match self {
            ItemOutcome::Cataloged { record, .. } | ItemOutcome::Synthesized { record, .. } => {
                Some(record)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOutcome::Cataloged { oclc_number, .. } => write!(f, "cataloged (OCLC {})", oclc_number),
            ItemOutcome::Synthesized { provider, .. } => write!(f, "synthesized from {}", provider),
            ItemOutcome::DuplicateHeld { oclc_number } => {
                write!(f, "held locally (OCLC {})", oclc_number)
            }
            ItemOutcome::NoUsableSource => f.write_str("no usable source"),
            ItemOutcome::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

/// Provider releases found for an item
#[derive(Debug, Clone, Default)]
pub struct ProviderReleases {
    pub discogs: Vec<ExternalReleaseRecord>,
    pub musicbrainz: Vec<ExternalReleaseRecord>,
}

impl ProviderReleases {
    pub fn iter(&self) -> impl Iterator<Item = &ExternalReleaseRecord> {
        self.discogs.iter().chain(self.musicbrainz.iter())
    }

    /// Reference titles: the official title plus every release title
    pub fn reference_titles(&self, official_title: &str) -> ReferenceTitles {
        ReferenceTitles::gather(official_title, self.iter().map(|r| r.title.as_str()))
    }
}

/// Runs the pipeline for one item at a time
pub struct ItemProcessor {
    catalog: Arc<dyn CatalogSource>,
    discogs: Arc<dyn DiscogsSource>,
    musicbrainz: Arc<dyn MusicBrainzSource>,
    review: Arc<dyn ReviewSink>,
    local_fields: LocalFieldsConfig,
    dates: ProcessingDates,
    lacks_container_insert: bool,
}

impl ItemProcessor {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        discogs: Arc<dyn DiscogsSource>,
        musicbrainz: Arc<dyn MusicBrainzSource>,
        review: Arc<dyn ReviewSink>,
        local_fields: LocalFieldsConfig,
        dates: ProcessingDates,
    ) -> Self {
        Self {
            catalog,
            discogs,
            musicbrainz,
            review,
            local_fields,
            dates,
            lacks_container_insert: false,
        }
    }

    /// Add the missing-insert note (590) to every record
    pub fn with_lacks_container_insert(mut self, lacks: bool) -> Self {
        self.lacks_container_insert = lacks;
        self
    }

    /// Process one item; errors become `ItemOutcome::Failed`
    pub async fn process(&self, item: &BatchItem) -> ItemOutcome {
        info!(
            "{}: Searching for {} ({})",
            item.call_number, item.product_code, item.official_title
        );
        match self.try_process(item).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{}: processing failed: {}", item.call_number, e);
                ItemOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_process(&self, item: &BatchItem) -> CatalogResult<ItemOutcome> {
        let releases = self.provider_releases(&item.product_code).await?;
        let titles = releases.reference_titles(&item.official_title);

        let mut usable = self
            .usable_catalog_records(
                std::slice::from_ref(&item.product_code),
                SearchIndex::StandardNumber,
                &titles,
            )
            .await?;

        if usable.is_empty() {
            let numbers: Vec<String> = publisher_numbers(releases.iter()).into_iter().collect();
            if !numbers.is_empty() {
                info!("Searching WorldCat again for publisher numbers: {:?}", numbers);
                usable = self
                    .usable_catalog_records(&numbers, SearchIndex::PublisherNumber, &titles)
                    .await?;
            }
        }

        if let HoldingsCheck::Held { oclc_number, .. } =
            check_holdings(self.catalog.as_ref(), &usable).await?
        {
            self.review.notify(
                item,
                ReviewNotice::HeldLocally {
                    oclc_number: oclc_number.clone(),
                },
            );
            return Ok(ItemOutcome::DuplicateHeld { oclc_number });
        }

        if let Some(best) = best_record(&usable) {
            let oclc_number = external_id(best).unwrap_or_default();
            info!("Winner: OCLC# {}", oclc_number);
            for problem in record_problems(best) {
                self.review.notify(item, ReviewNotice::RecordProblem(problem));
            }
            let record = self.localize(item, SourcedRecord::from_catalog(best.clone()));
            return Ok(ItemOutcome::Cataloged {
                record,
                oclc_number,
            });
        }

        if let Some(release) = preferred_release(&releases.discogs, &releases.musicbrainz) {
            let provider = release.provider();
            let sourced = synthesize(
                &release.synthesis_input(),
                self.dates.entered,
                &self.local_fields,
            );
            let record = self.localize(item, sourced);
            self.review.notify(item, ReviewNotice::OriginalRecordCreated);
            return Ok(ItemOutcome::Synthesized { record, provider });
        }

        info!("MARC not created: no data available");
        self.review.notify(item, ReviewNotice::NoRecordCreated);
        Ok(ItemOutcome::NoUsableSource)
    }

    /// Discogs (ids, full releases, parse) then MusicBrainz (search, parse)
    pub async fn provider_releases(&self, product_code: &str) -> CatalogResult<ProviderReleases> {
        let ids = self.discogs.find_ids_by_code(product_code).await?;
        let full = self.discogs.fetch_full(&ids).await?;
        let discogs = self.discogs.parse(full);
        info!("Found {} Discogs records", discogs.len());

        let found = self.musicbrainz.find_by_code(product_code).await?;
        let musicbrainz = self.musicbrainz.parse(found);
        info!("Found {} MusicBrainz records", musicbrainz.len());

        Ok(ProviderReleases {
            discogs,
            musicbrainz,
        })
    }

    /// Search each term, fetch full records and keep the usable ones
    async fn usable_catalog_records(
        &self,
        terms: &[String],
        index: SearchIndex,
        titles: &ReferenceTitles,
    ) -> CatalogResult<Vec<Record>> {
        let mut candidates = Vec::new();
        for term in terms {
            let results = self.catalog.search(term, index).await?;
            let ids = self.catalog.identifiers(&results);
            candidates.extend(self.catalog.records(&ids).await?);
        }
        info!("Found {} WorldCat records", candidates.len());

        let usable = usable_records(candidates, titles);
        info!("Found {} usable WorldCat records", usable.len());
        Ok(usable)
    }

    fn localize(&self, item: &BatchItem, record: SourcedRecord) -> LocalizedRecord {
        record.localize(
            &item.local(self.lacks_container_insert),
            &self.local_fields,
            self.dates.processed,
        )
    }
}
