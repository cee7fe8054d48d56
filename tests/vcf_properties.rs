//! Property-based tests for VCF serialization
//!
//! **Feature: onco-vcf, Property 6: every body line carries every declared INFO key**

use chrono::NaiveDate;
use onco_vcf::core::group::{IdentityKey, VariantMode, VariantSummary};
use onco_vcf::vcf::{format_record_line, info_schema, write_vcf, VcfHeaderOptions, COLUMN_HEADER};
use proptest::prelude::*;

fn arb_opt_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[A-Za-z0-9_|():>. ;=]{1,20}".prop_map(Some),
    ]
}

fn arb_summary() -> impl Strategy<Value = VariantSummary> {
    (
        (1u8..=22).prop_map(|n| n.to_string()),
        1u64..250_000_000,
        "[ACGT]{1,4}",
        "[ACGT]{1,4}",
        arb_opt_text(),
        arb_opt_text(),
        "[A-Za-z_ ]{0,20}",
        "[-A-Za-z0-9 ]{0,10}",
        arb_opt_text(),
        arb_opt_text(),
    )
        .prop_map(
            |(chrom, start, ref_allele, alt_allele, hgvsc, local_id, class, specimen, summary, hgvs)| {
                VariantSummary {
                    key: IdentityKey::Transcript(hgvsc.clone().unwrap_or_default()),
                    chromosome: chrom,
                    start,
                    reference_allele: ref_allele,
                    alternate_allele: alt_allele,
                    hgvsc,
                    local_id,
                    latest_classification: class,
                    latest_date: NaiveDate::from_ymd_opt(2023, 11, 5)
                        .unwrap()
                        .and_hms_opt(9, 30, 0)
                        .unwrap(),
                    latest_specimen_id: specimen,
                    classification_summary: summary,
                    hgvs_list: hgvs,
                    group_size: 1,
                    summarized: 0,
                }
            },
        )
}

fn arb_mode() -> impl Strategy<Value = VariantMode> {
    prop_oneof![Just(VariantMode::Transcript), Just(VariantMode::Coordinate)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// INFO holds exactly the declared keys, in header order, none empty
    #[test]
    fn prop_info_completeness(summary in arb_summary(), mode in arb_mode()) {
        let line = format_record_line(&summary, mode);
        let fields: Vec<&str> = line.split('\t').collect();
        prop_assert_eq!(fields.len(), 8);
        prop_assert!(fields.iter().all(|f| !f.is_empty()));
        prop_assert_eq!(fields[5], ".");
        prop_assert_eq!(fields[6], ".");

        let keys: Vec<&str> = fields[7]
            .split(';')
            .map(|kv| kv.split_once('=').map(|(k, _)| k).unwrap_or(kv))
            .collect();
        let declared: Vec<&str> = info_schema(mode).iter().map(|f| f.id).collect();
        prop_assert_eq!(keys, declared);

        for kv in fields[7].split(';') {
            let (_, value) = kv.split_once('=').unwrap();
            prop_assert!(!value.is_empty());
            prop_assert!(!value.contains('='));
        }
    }

    /// Dates are always rendered YYYY-MM-DD
    #[test]
    fn prop_date_format(summary in arb_summary(), mode in arb_mode()) {
        let line = format_record_line(&summary, mode);
        let info = line.rsplit('\t').next().unwrap();
        let date = info
            .split(';')
            .find_map(|kv| kv.strip_prefix("EG_LCD=").or_else(|| kv.strip_prefix("LCD=")))
            .unwrap();
        prop_assert_eq!(date, "2023-11-05");
    }

    /// Body lines match header declarations for a whole file
    #[test]
    fn prop_file_header_matches_body(rows in prop::collection::vec(arb_summary(), 0..20), mode in arb_mode()) {
        let out = write_vcf(Vec::new(), &rows, mode, &VcfHeaderOptions::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let declared: Vec<String> = text
            .lines()
            .filter_map(|l| l.strip_prefix("##INFO=<ID="))
            .map(|rest| rest.split(',').next().unwrap().to_string())
            .collect();
        let body: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        prop_assert_eq!(body.len(), rows.len());

        for line in body {
            let info = line.split('\t').nth(7).unwrap();
            let keys: Vec<String> = info
                .split(';')
                .map(|kv| kv.split('=').next().unwrap().to_string())
                .collect();
            prop_assert_eq!(&keys, &declared);
        }
        prop_assert_eq!(text.lines().filter(|l| *l == COLUMN_HEADER).count(), 1);
    }
}

#[test]
fn test_transcript_example_line() {
    let summary = VariantSummary {
        key: IdentityKey::Transcript("NM_1:c.1A>T".to_string()),
        chromosome: "1".to_string(),
        start: 1000,
        reference_allele: "A".to_string(),
        alternate_allele: "T".to_string(),
        hgvsc: Some("NM_1:c.1A>T".to_string()),
        local_id: None,
        latest_classification: "Benign".to_string(),
        latest_date: NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        latest_specimen_id: "S2".to_string(),
        classification_summary: Some("Likely_Benign(1)".to_string()),
        hgvs_list: None,
        group_size: 2,
        summarized: 1,
    };
    assert_eq!(
        format_record_line(&summary, VariantMode::Transcript),
        "1\t1000\tNM_1:c.1A>T\tA\tT\t.\t.\tEG_LC=Benign;EG_LCD=2024-06-01;EG_LCS=S2;EG_OC=Likely_Benign(1)"
    );
}
