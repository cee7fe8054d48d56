//! Output adapters
//!
//! The VCF writer and the external sort step applied to its output.

pub mod sort;
pub mod vcf;

pub use sort::{ExternalSorter, DEFAULT_SORT_PROGRAM};
pub use vcf::{info_schema, write_vcf, InfoField, InfoValue, VcfHeaderOptions, VcfWriter};
