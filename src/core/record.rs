//! Variant classification records
//!
//! One [`VariantRecord`] per input row, plus the field normalizations and
//! date parsing applied while loading.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Tokens treated as a missing value, as pandas does when reading CSV
pub const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "NULL", "null", "None"];

/// Characters that delimit the classification summary
pub const SUMMARY_DELIMITERS: &[char] = &['|', '(', ')', ','];

// month-first before day-first, as dateutil resolves `01/06/2024`
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%b %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// One classification row after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    /// 1-based data row number, for diagnostics only
    pub row: usize,
    pub chromosome: String,
    pub start: u64,
    pub reference_allele: String,
    pub alternate_allele: String,
    pub hgvsc: Option<String>,
    pub oncogenicity_classification: String,
    pub date_last_evaluated: Option<NaiveDateTime>,
    pub specimen_id: String,
    pub local_id: Option<String>,
}

impl VariantRecord {
    /// Date of evaluation formatted as `YYYY-MM-DD`
    pub fn date_string(&self) -> Option<String> {
        self.date_last_evaluated
            .map(|d| d.date().format("%Y-%m-%d").to_string())
    }
}

/// Check whether a raw cell holds a missing-value token
#[inline]
pub fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value.trim())
}

/// Convert a raw cell into `None` when it is a missing-value token
pub fn non_missing(value: &str) -> Option<String> {
    if is_missing(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Replace whitespace and summary delimiters with `_`
///
/// Keeps every label a single token inside `label(count)|...` summaries.
///
/// # Examples
/// ```
/// use onco_vcf::core::record::normalize_classification;
///
/// assert_eq!(normalize_classification("Likely Benign"), "Likely_Benign");
/// assert_eq!(normalize_classification("Tier I|II"), "Tier_I_II");
/// ```
pub fn normalize_classification(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_whitespace() || SUMMARY_DELIMITERS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Remove every whitespace character
///
/// # Examples
/// ```
/// use onco_vcf::core::record::normalize_chromosome;
///
/// assert_eq!(normalize_chromosome(" 1 7"), "17");
/// ```
pub fn normalize_chromosome(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse an evaluation date
///
/// Accepts plain dates (`2024-06-01`, `2024/06/01`, `20240601`), slashed
/// US and European dates (`06/01/2024` month-first, `13/06/2024` when the
/// first field cannot be a month), month names (`01-Jun-2024`,
/// `Jun 1, 2024`), ISO date-times with optional fractional seconds, and
/// RFC 3339 timestamps.
/// Returns `None` for anything else, including missing-value tokens.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if is_missing(value) {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_local())
}
