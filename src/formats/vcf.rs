//! VCF 4.2 writer
//!
//! Serializes sorted [`VariantSummary`] rows into an eight-column VCF.
//! The INFO keys are fixed per [`VariantMode`]; every body line carries
//! every declared key, with `.` standing in for missing values.

use crate::core::chrom::GRCH38_CONTIGS;
use crate::core::group::{VariantMode, VariantSummary};
use std::io::{self, Write};

pub const FILE_FORMAT: &str = "VCFv4.2";

pub const COLUMN_HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO";

/// Missing-value marker
pub const MISSING: &str = ".";

/// Which summary attribute an INFO key carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoValue {
    LatestClassification,
    LatestDate,
    LatestSpecimen,
    ClassificationSummary,
    HgvsList,
}

/// One `##INFO` declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoField {
    pub id: &'static str,
    pub number: &'static str,
    pub value_type: &'static str,
    pub description: &'static str,
    pub value: InfoValue,
}

impl InfoField {
    pub fn header_line(&self) -> String {
        format!(
            "##INFO=<ID={},Number={},Type={},Description=\"{}\">",
            self.id, self.number, self.value_type, self.description
        )
    }
}

static TRANSCRIPT_INFO: [InfoField; 4] = [
    InfoField {
        id: "EG_LC",
        number: "1",
        value_type: "String",
        description: "Oncogenicity classification of the variant",
        value: InfoValue::LatestClassification,
    },
    InfoField {
        id: "EG_LCD",
        number: "1",
        value_type: "String",
        description: "Date of latest classification evaluation",
        value: InfoValue::LatestDate,
    },
    InfoField {
        id: "EG_LCS",
        number: "1",
        value_type: "String",
        description: "Specimen ID of the latest classification",
        value: InfoValue::LatestSpecimen,
    },
    InfoField {
        id: "EG_OC",
        number: ".",
        value_type: "String",
        description: "Other Classifications with counts",
        value: InfoValue::ClassificationSummary,
    },
];

static COORDINATE_INFO: [InfoField; 5] = [
    InfoField {
        id: "LC",
        number: "1",
        value_type: "String",
        description: "Latest oncogenicity classification of the variant",
        value: InfoValue::LatestClassification,
    },
    InfoField {
        id: "LCD",
        number: "1",
        value_type: "String",
        description: "Date of latest classification evaluation",
        value: InfoValue::LatestDate,
    },
    InfoField {
        id: "LCS",
        number: "1",
        value_type: "String",
        description: "Specimen ID of the latest classification",
        value: InfoValue::LatestSpecimen,
    },
    InfoField {
        id: "TC",
        number: ".",
        value_type: "String",
        description: "Total classifications with counts, latest included",
        value: InfoValue::ClassificationSummary,
    },
    InfoField {
        id: "HGVS",
        number: ".",
        value_type: "String",
        description: "HGVS transcript annotations observed for the variant",
        value: InfoValue::HgvsList,
    },
];

/// INFO keys declared and emitted for a mode, in output order
pub fn info_schema(mode: VariantMode) -> &'static [InfoField] {
    match mode {
        VariantMode::Transcript => &TRANSCRIPT_INFO,
        VariantMode::Coordinate => &COORDINATE_INFO,
    }
}

/// Header settings
#[derive(Debug, Clone)]
pub struct VcfHeaderOptions {
    /// Value of the `##reference=` line and contig `assembly`
    pub reference: String,
    /// Emit `##contig` lines for the 24 standard chromosomes
    pub write_contigs: bool,
}

impl Default for VcfHeaderOptions {
    fn default() -> Self {
        Self {
            reference: "GRCh38".to_string(),
            write_contigs: true,
        }
    }
}

/// Make a value safe for the ID or INFO column
///
/// Whitespace, `;` and `=` become `_`; an empty value becomes `.`.
pub fn sanitize_value(value: &str) -> String {
    if value.is_empty() {
        return MISSING.to_string();
    }
    value
        .chars()
        .map(|c| if c.is_whitespace() || c == ';' || c == '=' { '_' } else { c })
        .collect()
}

fn or_missing(value: Option<&str>) -> String {
    value.map(sanitize_value).unwrap_or_else(|| MISSING.to_string())
}

/// Value of one INFO key for a summary
fn info_value(summary: &VariantSummary, value: InfoValue) -> String {
    match value {
        InfoValue::LatestClassification => sanitize_value(&summary.latest_classification),
        InfoValue::LatestDate => summary.latest_date_string(),
        InfoValue::LatestSpecimen => sanitize_value(&summary.latest_specimen_id),
        InfoValue::ClassificationSummary => or_missing(summary.classification_summary.as_deref()),
        InfoValue::HgvsList => or_missing(summary.hgvs_list.as_deref()),
    }
}

/// Build the INFO column
pub fn format_info(summary: &VariantSummary, schema: &[InfoField]) -> String {
    schema
        .iter()
        .map(|field| format!("{}={}", field.id, info_value(summary, field.value)))
        .collect::<Vec<_>>()
        .join(";")
}

/// Build the ID column: HGVS in transcript mode, otherwise the local id
fn format_id(summary: &VariantSummary, mode: VariantMode) -> String {
    let id = match mode {
        VariantMode::Transcript => summary.hgvsc.as_deref().or(summary.local_id.as_deref()),
        VariantMode::Coordinate => summary.local_id.as_deref(),
    };
    or_missing(id)
}

/// Format one body line (without trailing newline)
pub fn format_record_line(summary: &VariantSummary, mode: VariantMode) -> String {
    let mut output = String::with_capacity(256);

    // CHROM
    output.push_str(&sanitize_value(&summary.chromosome));
    output.push('\t');

    // POS
    output.push_str(&summary.start.to_string());
    output.push('\t');

    // ID
    output.push_str(&format_id(summary, mode));
    output.push('\t');

    // REF
    output.push_str(&sanitize_value(&summary.reference_allele));
    output.push('\t');

    // ALT
    output.push_str(&sanitize_value(&summary.alternate_allele));
    output.push('\t');

    // QUAL, FILTER
    output.push_str(MISSING);
    output.push('\t');
    output.push_str(MISSING);
    output.push('\t');

    // INFO
    output.push_str(&format_info(summary, info_schema(mode)));

    output
}

/// Streaming VCF writer
pub struct VcfWriter<W: Write> {
    inner: W,
    mode: VariantMode,
    written: usize,
}

impl<W: Write> VcfWriter<W> {
    pub fn new(inner: W, mode: VariantMode) -> Self {
        Self {
            inner,
            mode,
            written: 0,
        }
    }

    /// Write meta-information lines and the column header
    pub fn write_header(&mut self, options: &VcfHeaderOptions) -> io::Result<()> {
        writeln!(self.inner, "##fileformat={}", FILE_FORMAT)?;
        writeln!(
            self.inner,
            "##source={} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(self.inner, "##reference={}", options.reference)?;
        if options.write_contigs {
            for (name, length) in GRCH38_CONTIGS.iter() {
                writeln!(
                    self.inner,
                    "##contig=<ID={},length={},assembly={}>",
                    name, length, options.reference
                )?;
            }
        }
        for field in info_schema(self.mode) {
            writeln!(self.inner, "{}", field.header_line())?;
        }
        writeln!(self.inner, "{}", COLUMN_HEADER)?;
        Ok(())
    }

    pub fn write_summary(&mut self, summary: &VariantSummary) -> io::Result<()> {
        writeln!(self.inner, "{}", format_record_line(summary, self.mode))?;
        self.written += 1;
        Ok(())
    }

    /// Number of body lines written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Write a complete VCF (header and body) for already-sorted summaries
pub fn write_vcf<W: Write>(
    writer: W,
    summaries: &[VariantSummary],
    mode: VariantMode,
    options: &VcfHeaderOptions,
) -> io::Result<W> {
    let mut vcf = VcfWriter::new(writer, mode);
    vcf.write_header(options)?;
    for summary in summaries {
        vcf.write_summary(summary)?;
    }
    vcf.finish()
}
