//! Core conversion functionality
//!
//! This module contains the record loader, the grouping and selection
//! engine, chromosome ordering, and the pipeline driver.

pub mod chrom;
mod error;
pub mod group;
pub mod io;
pub mod loader;
pub mod pipeline;
pub mod record;

pub use chrom::{chrom_rank, compare_chroms, sort_summaries, GRCH38_CONTIGS};
pub use error::{GroupWarning, OncoVcfError, RecordWarning, Result};
pub use group::{
    format_classification_counts, group_records, parse_classification_counts, summarize_group,
    summarize_groups, GroupingOutcome, IdentityKey, SummaryMode, VariantMode, VariantSummary,
};
pub use io::{detect_compression, open_input, CompressionFormat};
pub use loader::{load_records, load_records_from_reader, LoadedTable, REQUIRED_COLUMNS};
pub use pipeline::{run_pipeline, OutputNaming, PipelineConfig, RunReport};
pub use record::{normalize_chromosome, normalize_classification, parse_date, VariantRecord};
