//! onco-vcf CLI entry point
//!
//! Converts an oncogenicity classification table into annotated VCF.

use clap::{Parser, ValueEnum};
use onco_vcf::core::pipeline::DEFAULT_PREFIX;
use onco_vcf::{run_pipeline, ExternalSorter, OutputNaming, PipelineConfig, VariantMode};
use std::path::PathBuf;
use std::time::Instant;

/// Variant identity mode (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum ModeArg {
    /// One line per transcript (hgvsc); EG_* INFO keys with other classifications
    #[default]
    #[value(name = "transcript")]
    Transcript,
    /// One line per genomic coordinate; total classifications and HGVS list
    #[value(name = "coordinate")]
    Coordinate,
}

impl From<ModeArg> for VariantMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Transcript => VariantMode::Transcript,
            ModeArg::Coordinate => VariantMode::Coordinate,
        }
    }
}

#[derive(Parser)]
#[command(name = "onco-vcf")]
#[command(about = "Convert oncogenicity classification tables into annotated VCF")]
#[command(version)]
struct Cli {
    /// Input classification table (CSV, optionally .gz/.bz2)
    #[arg(short = 'f', long = "filename")]
    filename: PathBuf,

    /// Variant identity mode
    #[arg(long, default_value = "transcript")]
    mode: ModeArg,

    /// Output VCF path (default: output.vcf)
    #[arg(short = 'o', long, conflicts_with = "timestamp")]
    output: Option<PathBuf>,

    /// Name the output <prefix>_<YYYYMMDD_HHMMSS>.vcf
    #[arg(long)]
    timestamp: bool,

    /// Prefix for timestamped output names
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Directory for timestamped output names
    #[arg(long, default_value = ".")]
    outdir: PathBuf,

    /// Input field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Reference assembly written to the VCF header
    #[arg(long, default_value = "GRCh38")]
    reference: String,

    /// Do not write ##contig header lines
    #[arg(long)]
    no_contigs: bool,

    /// Number of threads for group summarization
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Re-sort the written VCF with this program (e.g. bcftools)
    #[arg(long = "sort-with")]
    sort_with: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<PipelineConfig> {
        if !self.delimiter.is_ascii() {
            anyhow::bail!("Delimiter must be a single ASCII character, got {:?}", self.delimiter);
        }

        let mut config = PipelineConfig::new(self.filename);
        config.mode = self.mode.into();
        config.delimiter = self.delimiter as u8;
        config.header.reference = self.reference;
        config.header.write_contigs = !self.no_contigs;
        config.threads = self.threads.max(1);
        config.external_sort = self.sort_with.map(ExternalSorter::new);
        config.output = if self.timestamp {
            OutputNaming::Timestamped {
                dir: self.outdir,
                prefix: self.prefix,
            }
        } else {
            self.output
                .map(OutputNaming::Fixed)
                .unwrap_or_default()
        };
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let config = cli.into_config()?;
    eprintln!("Converting classification table: {:?}", config.input);

    let report = run_pipeline(&config)?;

    eprintln!("\n=== Conversion Statistics ===");
    eprintln!("Rows read:         {}", report.rows_read);
    eprintln!("Variants written:  {}", report.variants_written);
    eprintln!("Warnings:          {}", report.warning_count());
    eprintln!("  - Undated rows:  {}", report.rows_undated);
    eprintln!("  - Unkeyed rows:  {}", report.rows_unkeyed);
    eprintln!("  - Bad start:     {}", report.rows_invalid_start);
    eprintln!("  - Empty groups:  {}", report.groups_skipped);
    eprintln!("Output:            {:?}", report.output_path);
    if let Some(sorted) = &report.sorted_path {
        eprintln!("Sorted output:     {:?}", sorted);
    }
    eprintln!("Time elapsed:      {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
