//! Grouping and latest-classification selection
//!
//! Records are partitioned by an identity key into an ordered map. Each
//! group is put into canonical order (newest first, then a content-only
//! tie-break), the head of that order becomes the latest classification,
//! and the remaining (or all) classifications are condensed into a
//! `label(count)|label(count)` summary.

use crate::core::error::{GroupWarning, OncoVcfError, Result};
use crate::core::record::VariantRecord;
use chrono::NaiveDateTime;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Which classifications go into the summary string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    /// Every classification except the latest
    Other,
    /// Every classification, the latest included
    Total,
}

/// Pipeline flavour: how variants are identified and what is summarized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VariantMode {
    /// Keyed by `hgvsc`; summarizes other classifications
    #[default]
    Transcript,
    /// Keyed by `(chromosome, start, ref, alt)`; summarizes total
    /// classifications and aggregates HGVS annotations
    Coordinate,
}

impl VariantMode {
    pub fn summary_mode(self) -> SummaryMode {
        match self {
            VariantMode::Transcript => SummaryMode::Other,
            VariantMode::Coordinate => SummaryMode::Total,
        }
    }

    /// Whether summaries carry the aggregated HGVS list
    pub fn aggregates_hgvs(self) -> bool {
        matches!(self, VariantMode::Coordinate)
    }

    /// Build the identity key of a record, if all key fields are present
    pub fn identity_key(self, record: &VariantRecord) -> Option<IdentityKey> {
        match self {
            VariantMode::Transcript => record
                .hgvsc
                .as_ref()
                .map(|h| IdentityKey::Transcript(h.clone())),
            VariantMode::Coordinate => {
                if record.chromosome.is_empty()
                    || record.reference_allele.is_empty()
                    || record.alternate_allele.is_empty()
                {
                    return None;
                }
                Some(IdentityKey::Coordinate {
                    chromosome: record.chromosome.clone(),
                    start: record.start,
                    reference_allele: record.reference_allele.clone(),
                    alternate_allele: record.alternate_allele.clone(),
                })
            }
        }
    }
}

/// Variant identity shared by every record of a group
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdentityKey {
    Transcript(String),
    Coordinate {
        chromosome: String,
        start: u64,
        reference_allele: String,
        alternate_allele: String,
    },
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Transcript(hgvsc) => write!(f, "{}", hgvsc),
            IdentityKey::Coordinate {
                chromosome,
                start,
                reference_allele,
                alternate_allele,
            } => write!(f, "{}:{}:{}>{}", chromosome, start, reference_allele, alternate_allele),
        }
    }
}

/// One output row derived from a variant group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSummary {
    pub key: IdentityKey,
    pub chromosome: String,
    pub start: u64,
    pub reference_allele: String,
    pub alternate_allele: String,
    pub hgvsc: Option<String>,
    pub local_id: Option<String>,
    pub latest_classification: String,
    pub latest_date: NaiveDateTime,
    pub latest_specimen_id: String,
    /// `label(count)|...` over other or total classifications
    pub classification_summary: Option<String>,
    /// Unique HGVS annotations of the group, first-seen order
    pub hgvs_list: Option<String>,
    /// Number of dated records in the group
    pub group_size: usize,
    /// Number of labeled records counted into `classification_summary`
    pub summarized: usize,
}

impl VariantSummary {
    /// Latest evaluation date as `YYYY-MM-DD`
    pub fn latest_date_string(&self) -> String {
        self.latest_date.date().format("%Y-%m-%d").to_string()
    }
}

/// Summaries produced from a set of groups, plus the groups that were skipped
#[derive(Debug, Default)]
pub struct GroupingOutcome {
    pub summaries: Vec<VariantSummary>,
    pub warnings: Vec<GroupWarning>,
}

/// Canonical within-group order
///
/// Date descending, then specimen id, classification, local id, HGVS and
/// coordinates ascending. Only record content takes part, so any
/// permutation of the input yields the same order.
pub fn canonical_cmp(a: &VariantRecord, b: &VariantRecord) -> Ordering {
    b.date_last_evaluated
        .cmp(&a.date_last_evaluated)
        .then_with(|| a.specimen_id.cmp(&b.specimen_id))
        .then_with(|| a.oncogenicity_classification.cmp(&b.oncogenicity_classification))
        .then_with(|| a.local_id.cmp(&b.local_id))
        .then_with(|| a.hgvsc.cmp(&b.hgvsc))
        .then_with(|| a.chromosome.cmp(&b.chromosome))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.reference_allele.cmp(&b.reference_allele))
        .then_with(|| a.alternate_allele.cmp(&b.alternate_allele))
}

/// Count classification labels into `label(count)` entries joined by `|`
///
/// Entries are ordered by descending count; equal counts keep the order in
/// which the labels were first seen. Returns `None` for no labels, which
/// the VCF writer renders as `.`.
///
/// # Examples
/// ```
/// use onco_vcf::core::group::format_classification_counts;
///
/// let labels = ["Pathogenic", "VUS", "VUS"];
/// assert_eq!(
///     format_classification_counts(labels.iter().copied()),
///     Some("VUS(2)|Pathogenic(1)".to_string())
/// );
/// ```
pub fn format_classification_counts<'a, I>(labels: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for label in labels {
        match index.get(label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label, counts.len());
                counts.push((label, 1));
            }
        }
    }

    if counts.is_empty() {
        return None;
    }

    // sort_by is stable: ties stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    Some(
        counts
            .iter()
            .map(|(label, count)| format!("{}({})", label, count))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

/// Parse a summary string back into `(label, count)` pairs
///
/// `.` and the empty string yield no entries. Entries that do not end in
/// a parenthesized count are skipped.
pub fn parse_classification_counts(summary: &str) -> Vec<(String, usize)> {
    if summary.is_empty() || summary == "." {
        return Vec::new();
    }
    summary
        .split('|')
        .filter_map(|entry| {
            let body = entry.strip_suffix(')')?;
            let (label, count) = body.rsplit_once('(')?;
            Some((label.to_string(), count.parse().ok()?))
        })
        .collect()
}

/// Join unique non-missing HGVS values in first-seen order
pub fn aggregate_hgvs<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut seen: Vec<&'a str> = Vec::new();
    for value in values.into_iter().flatten() {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    if seen.is_empty() {
        None
    } else {
        Some(seen.join("|"))
    }
}

/// Partition records by identity key
///
/// Records whose key cannot be built are not grouped; the loader already
/// drops those rows, so this only logs them.
pub fn group_records(
    records: Vec<VariantRecord>,
    mode: VariantMode,
) -> BTreeMap<IdentityKey, Vec<VariantRecord>> {
    let mut groups: BTreeMap<IdentityKey, Vec<VariantRecord>> = BTreeMap::new();
    for record in records {
        match mode.identity_key(&record) {
            Some(key) => groups.entry(key).or_default().push(record),
            None => log::warn!("row {}: no identity key, not grouped", record.row),
        }
    }
    groups
}

/// Select the latest record of one group and summarize the rest
pub fn summarize_group(
    key: IdentityKey,
    records: Vec<VariantRecord>,
    mode: VariantMode,
) -> std::result::Result<VariantSummary, GroupWarning> {
    let mut dated: Vec<VariantRecord> = records
        .into_iter()
        .filter(|r| r.date_last_evaluated.is_some())
        .collect();

    if dated.is_empty() {
        return Err(GroupWarning::EmptyGroup { key: key.to_string() });
    }

    dated.sort_by(canonical_cmp);

    let counted: &[VariantRecord] = match mode.summary_mode() {
        SummaryMode::Other => &dated[1..],
        SummaryMode::Total => &dated[..],
    };
    // unlabeled records are not counted
    let labels: Vec<&str> = counted
        .iter()
        .map(|r| r.oncogenicity_classification.as_str())
        .filter(|label| !label.is_empty())
        .collect();
    let summarized = labels.len();
    let classification_summary = format_classification_counts(labels);

    let hgvs_list = if mode.aggregates_hgvs() {
        aggregate_hgvs(dated.iter().map(|r| r.hgvsc.as_deref()))
    } else {
        None
    };

    let group_size = dated.len();
    let latest = dated.swap_remove(0);
    let latest_date = match latest.date_last_evaluated {
        Some(date) => date,
        None => return Err(GroupWarning::EmptyGroup { key: key.to_string() }),
    };

    Ok(VariantSummary {
        key,
        chromosome: latest.chromosome,
        start: latest.start,
        reference_allele: latest.reference_allele,
        alternate_allele: latest.alternate_allele,
        hgvsc: latest.hgvsc,
        local_id: latest.local_id,
        latest_classification: latest.oncogenicity_classification,
        latest_date,
        latest_specimen_id: latest.specimen_id,
        classification_summary,
        hgvs_list,
        group_size,
        summarized,
    })
}

/// Summarize every group, optionally across a rayon thread pool
///
/// Results come back in key order regardless of `threads`; groups without
/// dated records are reported as warnings and left out.
pub fn summarize_groups(
    groups: BTreeMap<IdentityKey, Vec<VariantRecord>>,
    mode: VariantMode,
    threads: usize,
) -> Result<GroupingOutcome> {
    let groups: Vec<(IdentityKey, Vec<VariantRecord>)> = groups.into_iter().collect();

    let results: Vec<std::result::Result<VariantSummary, GroupWarning>> = if threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| {
                OncoVcfError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to create thread pool: {}", e),
                ))
            })?;
        pool.install(|| {
            groups
                .into_par_iter()
                .map(|(key, records)| summarize_group(key, records, mode))
                .collect()
        })
    } else {
        groups
            .into_iter()
            .map(|(key, records)| summarize_group(key, records, mode))
            .collect()
    };

    let mut outcome = GroupingOutcome::default();
    for result in results {
        match result {
            Ok(summary) => outcome.summaries.push(summary),
            Err(warning) => {
                log::warn!("{}", warning);
                outcome.warnings.push(warning);
            }
        }
    }
    Ok(outcome)
}
