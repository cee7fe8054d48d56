//! onco-vcf - oncogenicity classifications as VCF
//!
//! Converts a table of variant classification records into a VCF 4.2
//! file with one line per variant. Each line carries the latest
//! classification and a count summary of the variant's classification
//! history.
//!
//! # Example
//!
//! ```ignore
//! use onco_vcf::{run_pipeline, PipelineConfig, VariantMode};
//!
//! let mut config = PipelineConfig::new("classifications.csv");
//! config.mode = VariantMode::Coordinate;
//!
//! let report = run_pipeline(&config)?;
//! println!("{} variants written", report.variants_written);
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    format_classification_counts, run_pipeline, GroupWarning, IdentityKey, OncoVcfError,
    OutputNaming, PipelineConfig, RecordWarning, RunReport, VariantMode, VariantRecord,
    VariantSummary,
};
pub use formats::{vcf, ExternalSorter, VcfHeaderOptions};
