//! Batch output files
//!
//! Two append-only ISO 2709 files per batch: catalog records and synthesized
//! (original) records. Each write opens the file in append mode, so records
//! written before a crash are kept and a rerun adds to the same files.

use super::batch::BatchPaths;
use crate::error::CatalogResult;
use crate::evaluate::external_id;
use crate::marc::{read_all, MarcWriter, Record};
use crate::synthesis::{LocalizedRecord, RecordOrigin};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The pair of output files for one batch
#[derive(Debug, Clone)]
pub struct MarcFiles {
    catalog_records: PathBuf,
    original_records: PathBuf,
}

impl MarcFiles {
    pub fn new(catalog_records: impl Into<PathBuf>, original_records: impl Into<PathBuf>) -> Self {
        Self {
            catalog_records: catalog_records.into(),
            original_records: original_records.into(),
        }
    }

    pub fn from_paths(paths: &BatchPaths) -> Self {
        Self::new(&paths.catalog_records, &paths.original_records)
    }

    /// File a record of this origin goes to
    pub fn path_for(&self, origin: RecordOrigin) -> &Path {
        match origin {
            RecordOrigin::Catalog => &self.catalog_records,
            RecordOrigin::Synthesized(_) => &self.original_records,
        }
    }

    /// Append one finished record to the matching file
    pub fn append(&self, record: &LocalizedRecord) -> CatalogResult<PathBuf> {
        let path = self.path_for(record.origin());
        append_record(path, record.record())?;
        debug!("Record written to {}", path.display());
        Ok(path.to_path_buf())
    }
}

/// Append one record to a file, creating it if needed
pub fn append_record(path: &Path, record: &Record) -> CatalogResult<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);
    {
        let mut writer = MarcWriter::new(&mut out);
        writer.write_record(record)?;
    }
    out.flush()?;
    Ok(())
}

/// Read every record in a file
pub fn read_records(path: &Path) -> CatalogResult<Vec<Record>> {
    Ok(read_all(BufReader::new(File::open(path)?))?)
}

/// Number of records in a file
pub fn count_records(path: &Path) -> CatalogResult<usize> {
    Ok(read_records(path)?.len())
}

/// OCLC number of each record in a file, in file order
///
/// Records without a usable 001 are skipped.
pub fn oclc_numbers(path: &Path) -> CatalogResult<Vec<String>> {
    Ok(read_records(path)?.iter().filter_map(external_id).collect())
}
