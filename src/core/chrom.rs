//! Chromosome ordering and output sorting
//!
//! Output rows follow the fixed human order `1..22, X, Y`. Chromosomes
//! outside that set sort after `Y`, lexicographically among themselves.

use crate::core::group::VariantSummary;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Standard GRCh38 primary contigs with their lengths, in output order
pub const GRCH38_CONTIGS: [(&str, u64); 24] = [
    ("1", 248_956_422),
    ("2", 242_193_529),
    ("3", 198_295_559),
    ("4", 190_214_555),
    ("5", 181_538_259),
    ("6", 170_805_979),
    ("7", 159_345_973),
    ("8", 145_138_636),
    ("9", 138_394_717),
    ("10", 133_797_422),
    ("11", 135_086_622),
    ("12", 133_275_309),
    ("13", 114_364_328),
    ("14", 107_043_718),
    ("15", 101_991_189),
    ("16", 90_338_345),
    ("17", 83_257_441),
    ("18", 80_373_285),
    ("19", 58_617_616),
    ("20", 64_444_167),
    ("21", 46_709_983),
    ("22", 50_818_468),
    ("X", 156_040_895),
    ("Y", 57_227_415),
];

/// Rank given to every chromosome outside `1..22, X, Y`
pub const UNKNOWN_CHROM_RANK: usize = GRCH38_CONTIGS.len();

/// Drop a leading `chr` (any case) unless nothing would remain
fn strip_chr_prefix(chrom: &str) -> &str {
    match chrom.get(..3) {
        Some(prefix) if chrom.len() > 3 && prefix.eq_ignore_ascii_case("chr") => &chrom[3..],
        _ => chrom,
    }
}

/// Position of a chromosome in the fixed order
///
/// A leading `chr` (any case) and the case of `X`/`Y` are ignored.
///
/// # Examples
/// ```
/// use onco_vcf::core::chrom::{chrom_rank, UNKNOWN_CHROM_RANK};
///
/// assert_eq!(chrom_rank("1"), 0);
/// assert_eq!(chrom_rank("chrX"), 22);
/// assert_eq!(chrom_rank("MT"), UNKNOWN_CHROM_RANK);
/// ```
pub fn chrom_rank(chrom: &str) -> usize {
    let name = strip_chr_prefix(chrom);

    match name {
        "X" | "x" => 22,
        "Y" | "y" => 23,
        _ => match name.parse::<usize>() {
            // reject "01" and friends so ranks map to one spelling
            Ok(n) if (1..=22).contains(&n) && !name.starts_with('0') => n - 1,
            _ => UNKNOWN_CHROM_RANK,
        },
    }
}

/// Whether a chromosome belongs to the standard set
pub fn is_standard_chrom(chrom: &str) -> bool {
    chrom_rank(chrom) < UNKNOWN_CHROM_RANK
}

/// Sort key that treats `chr1` and `1` as the same chromosome
///
/// Standard chromosomes are fully described by their rank; unknown ones
/// also carry their prefix-less name.
fn chrom_key(chrom: &str) -> (usize, &str) {
    let rank = chrom_rank(chrom);
    if rank < UNKNOWN_CHROM_RANK {
        (rank, "")
    } else {
        (rank, strip_chr_prefix(chrom))
    }
}

/// Compare two chromosome names under the fixed order
///
/// Spellings of the same chromosome fall back to plain string order.
pub fn compare_chroms(a: &str, b: &str) -> Ordering {
    chrom_key(a).cmp(&chrom_key(b)).then_with(|| a.cmp(b))
}

/// Total order on output rows
///
/// Chromosome (ignoring a `chr` prefix), then start, then the raw
/// chromosome spelling, identity key, REF, ALT and latest specimen id.
pub fn compare_summaries(a: &VariantSummary, b: &VariantSummary) -> Ordering {
    chrom_key(&a.chromosome)
        .cmp(&chrom_key(&b.chromosome))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.chromosome.cmp(&b.chromosome))
        .then_with(|| a.key.cmp(&b.key))
        .then_with(|| a.reference_allele.cmp(&b.reference_allele))
        .then_with(|| a.alternate_allele.cmp(&b.alternate_allele))
        .then_with(|| a.latest_specimen_id.cmp(&b.latest_specimen_id))
}

/// Sort summaries for output
///
/// Each distinct non-standard chromosome is logged once.
pub fn sort_summaries(summaries: &mut [VariantSummary]) {
    let unknown: BTreeSet<&str> = summaries
        .iter()
        .map(|s| s.chromosome.as_str())
        .filter(|c| !is_standard_chrom(c))
        .collect();
    for chrom in unknown {
        log::warn!("Non-standard chromosome '{}' sorted after Y", chrom);
    }

    summaries.sort_by(compare_summaries);
}
