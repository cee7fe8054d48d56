//! Performance benchmarks for onco-vcf
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use onco_vcf::core::chrom::sort_summaries;
use onco_vcf::core::group::{group_records, summarize_groups, VariantMode};
use onco_vcf::core::loader::load_records_from_reader;
use onco_vcf::core::record::{parse_date, VariantRecord};
use onco_vcf::vcf::{write_vcf, VcfHeaderOptions};

const CLASSES: [&str; 4] = ["Pathogenic", "Likely_Pathogenic", "VUS", "Benign"];

/// Synthetic records: ~4 classifications per variant
fn synthetic_records(n: usize) -> Vec<VariantRecord> {
    (0..n)
        .map(|i| {
            let variant = i / 4;
            VariantRecord {
                row: i + 1,
                chromosome: ((variant % 22) + 1).to_string(),
                start: 10_000 + variant as u64 * 37,
                reference_allele: "C".to_string(),
                alternate_allele: "T".to_string(),
                hgvsc: Some(format!("NM_{:06}.1:c.{}C>T", variant, variant % 900)),
                oncogenicity_classification: CLASSES[i % CLASSES.len()].to_string(),
                date_last_evaluated: parse_date(&format!("2024-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1)),
                specimen_id: format!("SP{}", i),
                local_id: None,
            }
        })
        .collect()
}

fn synthetic_csv(n: usize) -> String {
    let mut csv = String::from("chromosome,start,reference_allele,alternate_allele,hgvsc,oncogenicity_classification,date_last_evaluated,specimen_id\n");
    for r in synthetic_records(n) {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            r.chromosome,
            r.start,
            r.reference_allele,
            r.alternate_allele,
            r.hgvsc.unwrap_or_default(),
            r.oncogenicity_classification,
            r.date_string().unwrap_or_default(),
            r.specimen_id
        ));
    }
    csv
}

/// Benchmark table loading
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_records");
    for size in [1_000usize, 10_000, 100_000].iter() {
        let csv = synthetic_csv(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &csv, |b, csv| {
            b.iter(|| {
                let table =
                    load_records_from_reader(black_box(csv.as_bytes()), VariantMode::Transcript, b',')
                        .unwrap();
                black_box(table)
            })
        });
    }
    group.finish();
}

/// Benchmark grouping + selection, sequential and parallel
fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_and_summarize");
    let records = synthetic_records(100_000);
    group.throughput(Throughput::Elements(records.len() as u64));

    for threads in [1usize, 4].iter() {
        group.bench_with_input(BenchmarkId::new("threads", threads), threads, |b, &threads| {
            b.iter(|| {
                let groups = group_records(black_box(records.clone()), VariantMode::Coordinate);
                let mut outcome = summarize_groups(groups, VariantMode::Coordinate, threads).unwrap();
                sort_summaries(&mut outcome.summaries);
                black_box(outcome)
            })
        });
    }
    group.finish();
}

/// Benchmark VCF serialization
fn bench_write(c: &mut Criterion) {
    let groups = group_records(synthetic_records(100_000), VariantMode::Transcript);
    let mut outcome = summarize_groups(groups, VariantMode::Transcript, 1).unwrap();
    sort_summaries(&mut outcome.summaries);
    let options = VcfHeaderOptions::default();

    c.bench_function("write_vcf_25k", |b| {
        b.iter(|| {
            let out = write_vcf(
                Vec::with_capacity(4 * 1024 * 1024),
                black_box(&outcome.summaries),
                VariantMode::Transcript,
                &options,
            )
            .unwrap();
            black_box(out)
        })
    });
}

criterion_group!(benches, bench_load, bench_grouping, bench_write);
criterion_main!(benches);
