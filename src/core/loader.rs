//! Record loader
//!
//! Reads the classification table, checks the header against the
//! required columns, and turns each row into a [`VariantRecord`]. Rows
//! that cannot take part in grouping are dropped and reported as
//! [`RecordWarning`]s rather than failing the run.

use crate::core::error::{OncoVcfError, RecordWarning, Result};
use crate::core::group::VariantMode;
use crate::core::io::open_input;
use crate::core::record::{
    is_missing, non_missing, normalize_chromosome, normalize_classification, parse_date,
    VariantRecord,
};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

/// Columns every input table must carry
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "chromosome",
    "start",
    "reference_allele",
    "alternate_allele",
    "hgvsc",
    "oncogenicity_classification",
    "date_last_evaluated",
    "specimen_id",
];

/// Optional column used for the VCF ID
pub const LOCAL_ID_COLUMN: &str = "local_id";

/// Warnings beyond this many are counted but not logged individually
const MAX_LOGGED_WARNINGS: usize = 20;

/// Records kept from an input table plus the rows that were dropped
#[derive(Debug, Default)]
pub struct LoadedTable {
    pub records: Vec<VariantRecord>,
    pub warnings: Vec<RecordWarning>,
    pub rows_read: usize,
}

impl LoadedTable {
    pub fn undated(&self) -> usize {
        self.count(|w| matches!(w, RecordWarning::DateParse { .. }))
    }

    pub fn unkeyed(&self) -> usize {
        self.count(|w| matches!(w, RecordWarning::MissingKey { .. }))
    }

    pub fn invalid_start(&self) -> usize {
        self.count(|w| matches!(w, RecordWarning::InvalidStart { .. }))
    }

    fn count(&self, pred: impl Fn(&RecordWarning) -> bool) -> usize {
        self.warnings.iter().filter(|w| pred(w)).count()
    }
}

/// Header positions of the columns the loader reads
#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    chromosome: usize,
    start: usize,
    reference_allele: usize,
    alternate_allele: usize,
    hgvsc: usize,
    classification: usize,
    date: usize,
    specimen_id: usize,
    local_id: Option<usize>,
}

impl ColumnIndices {
    /// Resolve column positions, reporting every missing required column
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&name| find(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(OncoVcfError::Schema { missing });
        }

        let get = |name: &str| find(name).ok_or_else(|| OncoVcfError::Schema {
            missing: vec![name.to_string()],
        });

        Ok(Self {
            chromosome: get("chromosome")?,
            start: get("start")?,
            reference_allele: get("reference_allele")?,
            alternate_allele: get("alternate_allele")?,
            hgvsc: get("hgvsc")?,
            classification: get("oncogenicity_classification")?,
            date: get("date_last_evaluated")?,
            specimen_id: get("specimen_id")?,
            local_id: find(LOCAL_ID_COLUMN),
        })
    }
}

/// Parse a `start` cell; integral floats such as `12345.0` are accepted
fn parse_start(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u64>() {
        return Some(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => Some(f as u64),
        _ => None,
    }
}

/// Turn one CSV row into a record, or the reason it was dropped
fn parse_row(
    row: usize,
    fields: &StringRecord,
    cols: &ColumnIndices,
    mode: VariantMode,
) -> std::result::Result<VariantRecord, RecordWarning> {
    let cell = |idx: usize| fields.get(idx).unwrap_or("");

    let raw_start = cell(cols.start);
    let start = parse_start(raw_start).ok_or_else(|| RecordWarning::InvalidStart {
        row,
        value: raw_start.to_string(),
    })?;

    let text = |idx: usize| {
        let value = cell(idx);
        if is_missing(value) {
            String::new()
        } else {
            value.to_string()
        }
    };

    let chromosome = normalize_chromosome(&text(cols.chromosome));
    let record = VariantRecord {
        row,
        chromosome,
        start,
        reference_allele: text(cols.reference_allele),
        alternate_allele: text(cols.alternate_allele),
        hgvsc: non_missing(cell(cols.hgvsc)),
        oncogenicity_classification: normalize_classification(&text(cols.classification)),
        date_last_evaluated: parse_date(cell(cols.date)),
        specimen_id: text(cols.specimen_id),
        local_id: cols.local_id.and_then(|idx| non_missing(cell(idx))),
    };

    if mode.identity_key(&record).is_none() {
        let field = match mode {
            VariantMode::Transcript => "hgvsc",
            VariantMode::Coordinate if record.chromosome.is_empty() => "chromosome",
            VariantMode::Coordinate if record.reference_allele.is_empty() => "reference_allele",
            VariantMode::Coordinate => "alternate_allele",
        };
        return Err(RecordWarning::MissingKey { row, field });
    }

    if record.date_last_evaluated.is_none() {
        return Err(RecordWarning::DateParse {
            row,
            value: cell(cols.date).to_string(),
        });
    }

    Ok(record)
}

/// Load records from any reader holding a delimited table
pub fn load_records_from_reader<R: Read>(
    reader: R,
    mode: VariantMode,
    delimiter: u8,
) -> Result<LoadedTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let cols = ColumnIndices::from_headers(&headers)?;

    let mut table = LoadedTable::default();
    for (idx, result) in csv_reader.records().enumerate() {
        let fields = result?;
        let row = idx + 1;
        table.rows_read += 1;

        match parse_row(row, &fields, &cols, mode) {
            Ok(record) => table.records.push(record),
            Err(warning) => {
                if table.warnings.len() < MAX_LOGGED_WARNINGS {
                    log::warn!("Dropping {}", warning);
                } else if table.warnings.len() == MAX_LOGGED_WARNINGS {
                    log::warn!("Further dropped rows are counted but not logged");
                }
                table.warnings.push(warning);
            }
        }
    }

    log::info!(
        "Loaded {} of {} rows ({} dropped)",
        table.records.len(),
        table.rows_read,
        table.warnings.len()
    );
    Ok(table)
}

/// Load records from a (possibly compressed) table on disk
pub fn load_records(path: &Path, mode: VariantMode, delimiter: u8) -> Result<LoadedTable> {
    let reader = open_input(path).map_err(|source| OncoVcfError::InputAccess {
        path: path.to_path_buf(),
        source,
    })?;
    load_records_from_reader(reader, mode, delimiter)
}
