//! Load → group → sort → write pipeline
//!
//! [`run_pipeline`] is the single entry point used by the CLI. All run
//! settings arrive through a [`PipelineConfig`] value.

use crate::core::chrom::sort_summaries;
use crate::core::error::{OncoVcfError, Result};
use crate::core::group::{group_records, summarize_groups, VariantMode};
use crate::core::loader::load_records;
use crate::formats::sort::ExternalSorter;
use crate::formats::vcf::{info_schema, VcfHeaderOptions, VcfWriter};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default fixed output file name
pub const DEFAULT_OUTPUT: &str = "output.vcf";

/// Default prefix for timestamped output names
pub const DEFAULT_PREFIX: &str = "output";

/// How the output file is named
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNaming {
    /// Always write to this path
    Fixed(PathBuf),
    /// `<dir>/<prefix>_<YYYYMMDD_HHMMSS>.vcf`
    Timestamped { dir: PathBuf, prefix: String },
}

impl Default for OutputNaming {
    fn default() -> Self {
        OutputNaming::Fixed(PathBuf::from(DEFAULT_OUTPUT))
    }
}

impl OutputNaming {
    /// Resolve the final output path, stamping with the current local time
    pub fn resolve(&self) -> PathBuf {
        match self {
            OutputNaming::Fixed(path) => path.clone(),
            OutputNaming::Timestamped { dir, prefix } => {
                let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
                dir.join(format!("{}_{}.vcf", prefix, stamp))
            }
        }
    }
}

/// Settings for one conversion run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub mode: VariantMode,
    pub output: OutputNaming,
    pub delimiter: u8,
    pub header: VcfHeaderOptions,
    /// Worker threads for group summarization (1 = sequential)
    pub threads: usize,
    pub external_sort: Option<ExternalSorter>,
}

impl PipelineConfig {
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        Self {
            input: input.into(),
            mode: VariantMode::default(),
            output: OutputNaming::default(),
            delimiter: b',',
            header: VcfHeaderOptions::default(),
            threads: 1,
            external_sort: None,
        }
    }
}

/// What a run did, including everything it recovered from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub rows_read: usize,
    pub rows_undated: usize,
    pub rows_unkeyed: usize,
    pub rows_invalid_start: usize,
    pub groups_skipped: usize,
    pub variants_written: usize,
    pub output_path: PathBuf,
    pub sorted_path: Option<PathBuf>,
}

impl RunReport {
    /// Dropped rows plus skipped groups
    pub fn warning_count(&self) -> usize {
        self.rows_undated + self.rows_unkeyed + self.rows_invalid_start + self.groups_skipped
    }
}

/// Directory a file will be created in
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn output_error(path: &Path) -> impl FnOnce(std::io::Error) -> OncoVcfError + '_ {
    move |source| OncoVcfError::Output {
        path: path.to_path_buf(),
        source,
    }
}

/// Write to a temporary file beside `path` and rename it into place
fn write_atomically<F>(path: &Path, write: F) -> Result<usize>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<usize>,
{
    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(output_error(path))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".onco-vcf")
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(output_error(path))?;

    let written = {
        let mut writer = BufWriter::with_capacity(128 * 1024, tmp.as_file_mut());
        let written = write(&mut writer).map_err(output_error(path))?;
        writer.flush().map_err(output_error(path))?;
        written
    };

    // temp files are created 0600
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(output_error(path))?;
    }

    tmp.persist(path).map_err(|e| OncoVcfError::Output {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(written)
}

/// Run the external sorter into a temporary sibling, then rename
fn sort_output(sorter: &ExternalSorter, output: &Path) -> Result<PathBuf> {
    let target = ExternalSorter::sorted_path(output);
    let staging = target.with_extension("vcf.tmp");

    if let Err(e) = sorter.sort(output, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }
    fs::rename(&staging, &target).map_err(output_error(&target))?;
    Ok(target)
}

/// Convert a classification table into VCF
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunReport> {
    let mode = config.mode;
    log::info!("Loading {:?} ({:?} mode)", config.input, mode);

    let table = load_records(&config.input, mode, config.delimiter)?;
    let mut report = RunReport {
        rows_read: table.rows_read,
        rows_undated: table.undated(),
        rows_unkeyed: table.unkeyed(),
        rows_invalid_start: table.invalid_start(),
        ..RunReport::default()
    };

    let groups = group_records(table.records, mode);
    log::debug!("{} variant groups", groups.len());

    let outcome = summarize_groups(groups, mode, config.threads)?;
    report.groups_skipped = outcome.warnings.len();

    let mut summaries = outcome.summaries;
    sort_summaries(&mut summaries);
    log::info!(
        "Output table: {} variants x {} columns",
        summaries.len(),
        7 + info_schema(mode).len()
    );

    let output_path = config.output.resolve();
    report.variants_written = write_atomically(&output_path, |w| {
        let mut vcf = VcfWriter::new(w, mode);
        vcf.write_header(&config.header)?;
        for summary in &summaries {
            vcf.write_summary(summary)?;
        }
        let written = vcf.written();
        vcf.finish()?;
        Ok(written)
    })?;
    log::info!("VCF file created as {:?}", output_path);

    if let Some(sorter) = &config.external_sort {
        report.sorted_path = Some(sort_output(sorter, &output_path)?);
    }

    report.output_path = output_path;
    Ok(report)
}
