//! # mcb-catalog
//!
//! Catalog record reconciliation for music CD batches.
//!
//! For each CD in a batch the engine searches WorldCat for existing records,
//! keeps only usable candidates whose titles agree with Discogs and
//! MusicBrainz, refuses items already held locally, and picks the best record
//! by encoding level. When no catalog record survives, a record is
//! synthesized from provider metadata. Every output record receives the
//! institution's local fields.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod marc;
pub mod sources;
pub mod synthesis;
pub mod workflow;

pub use error::{CatalogError, CatalogResult};
