//! Local holdings guard
//!
//! If any usable candidate is already held by the home institution the item is
//! probably cataloged already, so the whole candidate set is discarded rather
//! than risking a near-duplicate record.

use super::external_id;
use crate::marc::{Record, RecordExt};
use crate::sources::{CatalogSource, SourceResult};
use tracing::{info, warn};

/// Result of the holdings check for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldingsCheck {
    /// No candidate is held; the set may be used
    Clear,
    /// The first held candidate found
    Held { oclc_number: String, title: String },
}

impl HoldingsCheck {
    pub fn is_held(&self) -> bool {
        matches!(self, HoldingsCheck::Held { .. })
    }
}

/// Ask the catalog about each candidate in order, stopping at the first held one
pub async fn check_holdings<C>(catalog: &C, candidates: &[Record]) -> SourceResult<HoldingsCheck>
where
    C: CatalogSource + ?Sized,
{
    for record in candidates {
        let Some(oclc_number) = external_id(record) else {
            warn!("Candidate without an OCLC number skipped in holdings check");
            continue;
        };

        if catalog.is_held_locally(&oclc_number).await? {
            let title = record.title_statement().unwrap_or_default();
            info!("Rejecting all records: OCLC {} is held locally", oclc_number);
            info!("WorldCat title -> {}", title);
            return Ok(HoldingsCheck::Held { oclc_number, title });
        }
    }
    Ok(HoldingsCheck::Clear)
}
