//! Batch input: tab-separated rows with a header line
//!
//! Required columns (any order, extra columns ignored):
//! `UPC`, `call number`, `barcode`, `title`.

use crate::error::{CatalogError, CatalogResult};
use crate::synthesis::ItemLocal;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::{Path, PathBuf};

const UPC_COLUMN: &str = "UPC";
const CALL_NUMBER_COLUMN: &str = "call number";
const BARCODE_COLUMN: &str = "barcode";
const TITLE_COLUMN: &str = "title";

/// One physical CD to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    /// UPC/EAN searched as a standard number
    pub product_code: String,
    pub call_number: String,
    /// Item barcode, upper-cased
    pub barcode: String,
    /// Title supplied by the library
    pub official_title: String,
}

impl BatchItem {
    /// Local field values for this item
    pub fn local(&self, lacks_container_insert: bool) -> ItemLocal {
        ItemLocal {
            barcode: self.barcode.clone(),
            call_number: self.call_number.clone(),
            lacks_container_insert,
        }
    }
}

/// Column positions resolved from the header line
struct Columns {
    upc: usize,
    call_number: usize,
    barcode: usize,
    title: usize,
}

impl Columns {
    fn from_header(header: &StringRecord) -> CatalogResult<Self> {
        let names: Vec<&str> = header
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim())
            .collect();
        let position = |column: &str| {
            names.iter().position(|name| *name == column).ok_or_else(|| {
                CatalogError::Batch(format!("Missing column '{}' in header", column))
            })
        };
        Ok(Self {
            upc: position(UPC_COLUMN)?,
            call_number: position(CALL_NUMBER_COLUMN)?,
            barcode: position(BARCODE_COLUMN)?,
            title: position(TITLE_COLUMN)?,
        })
    }

    fn item(&self, row: &StringRecord) -> BatchItem {
        let cell = |i: usize| row.get(i).unwrap_or_default();
        BatchItem {
            product_code: cell(self.upc).to_string(),
            call_number: cell(self.call_number).to_string(),
            barcode: cell(self.barcode).to_uppercase(),
            official_title: cell(self.title).to_string(),
        }
    }
}

fn row_error(err: csv::Error) -> CatalogError {
    match err.position() {
        Some(pos) => CatalogError::Batch(format!("Line {}: {}", pos.line(), err)),
        None => CatalogError::Batch(err.to_string()),
    }
}

/// Parse tab-separated text into batch items
///
/// Cells may be double-quoted to carry tabs, quotes or line breaks. Blank
/// lines are skipped; a missing trailing cell reads as empty.
pub fn parse_batch(content: &str) -> CatalogResult<Vec<BatchItem>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let header = reader.headers().map_err(row_error)?;
    if header.iter().all(|name| name.trim_start_matches('\u{feff}').is_empty()) {
        return Err(CatalogError::Batch("Batch file is empty".to_string()));
    }
    let columns = Columns::from_header(header)?;

    let mut items = Vec::new();
    for row in reader.records() {
        let row = row.map_err(row_error)?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        items.push(columns.item(&row));
    }
    Ok(items)
}

/// Read and parse a batch file
pub fn read_batch(path: &Path) -> CatalogResult<Vec<BatchItem>> {
    let content = std::fs::read_to_string(path)?;
    parse_batch(&content)
}

/// Rows `start..end` (end exclusive, clamped to the batch length)
pub fn select_rows(items: &[BatchItem], start: usize, end: Option<usize>) -> &[BatchItem] {
    let end = end.unwrap_or(items.len()).min(items.len());
    let start = start.min(end);
    &items[start..end]
}

/// Output and log file names derived from the batch file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPaths {
    /// Catalog records (`{stem}_oclc.mrc`)
    pub catalog_records: PathBuf,
    /// Synthesized records (`{stem}_orig.mrc`)
    pub original_records: PathBuf,
    /// Log file (`{stem}.log`)
    pub log: PathBuf,
}

impl BatchPaths {
    /// Files are created in `dir` using the input file's stem
    pub fn for_input(input: &Path, dir: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "batch".to_string());
        Self {
            catalog_records: dir.join(format!("{}_oclc.mrc", stem)),
            original_records: dir.join(format!("{}_orig.mrc", stem)),
            log: dir.join(format!("{}.log", stem)),
        }
    }
}
