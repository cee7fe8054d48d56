//! Property-based tests for chromosome/position ordering
//!
//! **Feature: onco-vcf, Property 5: output is ordered by 1..22, X, Y, then start**

use chrono::NaiveDate;
use onco_vcf::core::chrom::{chrom_rank, sort_summaries, UNKNOWN_CHROM_RANK};
use onco_vcf::core::group::{IdentityKey, VariantSummary};
use proptest::prelude::*;

fn arb_bare_chrom() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => (1u8..=22).prop_map(|n| n.to_string()),
        1 => Just("X".to_string()),
        1 => Just("Y".to_string()),
        1 => prop::sample::select(vec!["MT", "GL000220.1", "Un"]).prop_map(str::to_string),
    ]
}

/// Bare and `chr`-prefixed names mixed in one input
fn arb_chrom() -> impl Strategy<Value = String> {
    (arb_bare_chrom(), any::<bool>())
        .prop_map(|(name, prefixed)| if prefixed { format!("chr{}", name) } else { name })
}

/// Whether two spellings name the same chromosome
fn same_chrom(a: &str, b: &str) -> bool {
    a.trim_start_matches("chr") == b.trim_start_matches("chr")
}

fn summary(chrom: String, start: u64, n: usize) -> VariantSummary {
    let hgvsc = format!("NM_{}:c.{}A>G", n, start);
    VariantSummary {
        key: IdentityKey::Transcript(hgvsc.clone()),
        chromosome: chrom,
        start,
        reference_allele: "A".to_string(),
        alternate_allele: "G".to_string(),
        hgvsc: Some(hgvsc),
        local_id: None,
        latest_classification: "VUS".to_string(),
        latest_date: NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        latest_specimen_id: "S1".to_string(),
        classification_summary: None,
        hgvs_list: None,
        group_size: 1,
        summarized: 0,
    }
}

fn arb_summaries() -> impl Strategy<Value = Vec<VariantSummary>> {
    prop::collection::vec((arb_chrom(), 1u64..1_000_000), 0..60).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(n, (chrom, start))| summary(chrom, start, n))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Sorted output is non-decreasing in (chromosome rank, start)
    #[test]
    fn prop_sorted_by_chrom_then_start(mut rows in arb_summaries()) {
        sort_summaries(&mut rows);
        for pair in rows.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ra = chrom_rank(&a.chromosome);
            let rb = chrom_rank(&b.chromosome);
            prop_assert!(ra <= rb, "{} before {}", a.chromosome, b.chromosome);
            if same_chrom(&a.chromosome, &b.chromosome) {
                prop_assert!(a.start <= b.start, "{}:{} before {}:{}", a.chromosome, a.start, b.chromosome, b.start);
            }
        }
    }

    /// Unknown chromosomes never precede standard ones
    #[test]
    fn prop_unknown_chroms_last(mut rows in arb_summaries()) {
        sort_summaries(&mut rows);
        if let Some(first_unknown) = rows.iter().position(|s| chrom_rank(&s.chromosome) == UNKNOWN_CHROM_RANK) {
            prop_assert!(rows[first_unknown..]
                .iter()
                .all(|s| chrom_rank(&s.chromosome) == UNKNOWN_CHROM_RANK));
        }
    }

    /// Sorting is independent of the incoming order
    #[test]
    fn prop_sort_ignores_input_order(
        (rows, shuffled) in arb_summaries().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let mut a = rows;
        let mut b = shuffled;
        sort_summaries(&mut a);
        sort_summaries(&mut b);
        prop_assert_eq!(a, b);
    }
}

#[test]
fn test_chr_prefix_ranks_like_bare_name() {
    for n in 1..=22 {
        assert_eq!(chrom_rank(&format!("chr{}", n)), chrom_rank(&n.to_string()));
    }
    assert_eq!(chrom_rank("chrX"), chrom_rank("X"));
}

#[test]
fn test_mixed_prefix_positions_interleave() {
    let mut rows = vec![
        summary("1".to_string(), 100, 0),
        summary("chr1".to_string(), 50, 1),
    ];
    sort_summaries(&mut rows);
    assert_eq!(rows[0].chromosome, "chr1");
    assert_eq!(rows[1].chromosome, "1");
}
