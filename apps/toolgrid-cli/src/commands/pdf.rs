//! merge, split, compress and info

use super::{file_name, read_input, write_output};
use anyhow::{bail, Context};
use pdftools_core::{
    compress_batch, format_file_size, full_range, parse_page_selection, split_document,
    split_output_name, validate_pdf, CompressionOptions, CompressionReport, LopdfBackend,
    MergeQueue, PdfBackend, PdfInfo, ProcessMetrics, SourceFile, MIN_MERGE_MESSAGE,
};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct MergeResult {
    pub output: PathBuf,
    pub documents: usize,
    /// Inputs that were not PDFs or could not be parsed
    pub skipped: Vec<String>,
    pub metrics: ProcessMetrics,
}

impl fmt::Display for MergeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Merged {} documents ({} pages, {}) into {}",
            self.documents,
            self.metrics.page_count,
            format_file_size(self.metrics.output_size_bytes as u64),
            self.output.display()
        )?;
        for name in &self.skipped {
            write!(f, "\n  skipped {}", name)?;
        }
        Ok(())
    }
}

/// Merge `inputs` in the order given. Unreadable inputs are skipped; the
/// merge still needs two usable documents.
pub fn merge(inputs: &[PathBuf], output: &Path) -> anyhow::Result<MergeResult> {
    let files = inputs
        .iter()
        .map(|path| Ok(SourceFile::from_name(file_name(path), read_input(path)?)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let input_size_bytes = files.iter().map(|f| f.bytes.len()).sum();

    let mut queue = MergeQueue::new();
    let added = queue.add_documents(&LopdfBackend, files);
    if !queue.can_merge() {
        bail!(MIN_MERGE_MESSAGE);
    }

    let merged = queue.merge(&LopdfBackend, |progress| {
        tracing::info!(
            "merging: {}/{} documents ({:.0}%)",
            progress.completed,
            progress.total,
            progress.percent()
        );
    })?;
    write_output(output, &merged.bytes)?;

    Ok(MergeResult {
        output: output.to_path_buf(),
        documents: queue.len(),
        skipped: added.skipped.into_iter().map(|s| s.name).collect(),
        metrics: ProcessMetrics {
            input_size_bytes,
            output_size_bytes: merged.bytes.len(),
            page_count: merged.page_count,
        },
    })
}

#[derive(Debug, Serialize)]
pub struct SplitResult {
    pub output: PathBuf,
    pub pages: Vec<u32>,
    /// Range tokens that were ignored
    pub dropped: usize,
    /// Ranges cut short at the last page
    pub clipped: usize,
    pub metrics: ProcessMetrics,
}

impl fmt::Display for SplitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extracted {} pages into {}",
            self.pages.len(),
            self.output.display()
        )
    }
}

/// Extract `range` (default: every page) from `input`. `output` defaults
/// to `<stem>_pages_<list>.pdf` inside `output_dir`.
pub fn split(
    input: &Path,
    range: Option<&str>,
    output: Option<&Path>,
    output_dir: &Path,
) -> anyhow::Result<SplitResult> {
    let bytes = read_input(input)?;
    let name = file_name(input);

    let document = LopdfBackend
        .load(&bytes)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let page_count = LopdfBackend.page_count(&document);

    let range = range.map_or_else(|| full_range(page_count), str::to_string);
    let selection = parse_page_selection(&range, page_count);
    if selection.has_warnings() {
        tracing::warn!(
            dropped = selection.dropped,
            clipped = selection.clipped,
            "part of the page range was ignored"
        );
    }

    let extracted = split_document(&LopdfBackend, &bytes, &selection)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_dir.join(split_output_name(&name, &selection.pages)));
    write_output(&output, &extracted)?;

    Ok(SplitResult {
        output,
        metrics: ProcessMetrics {
            input_size_bytes: bytes.len(),
            output_size_bytes: extracted.len(),
            page_count: selection.pages.len() as u32,
        },
        pages: selection.pages,
        dropped: selection.dropped,
        clipped: selection.clipped,
    })
}

#[derive(Debug, Serialize)]
pub struct CompressResult {
    pub outputs: Vec<PathBuf>,
    pub reports: Vec<CompressionReport>,
}

impl fmt::Display for CompressResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.reports.iter().zip(&self.outputs);
        for (i, (report, output)) in rows.enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}: {} -> {} ({:.1}% smaller), written to {}",
                report.name,
                format_file_size(report.original_size as u64),
                format_file_size(report.compressed_size as u64),
                report.savings_percent,
                output.display()
            )?;
        }
        Ok(())
    }
}

/// Compress every input into `output_dir`. Nothing is written if any
/// input fails.
pub fn compress(
    inputs: &[PathBuf],
    options: CompressionOptions,
    output_dir: &Path,
) -> anyhow::Result<CompressResult> {
    let files = inputs
        .iter()
        .map(|path| Ok(SourceFile::from_name(file_name(path), read_input(path)?)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let compressed = compress_batch(&files, options, |progress| {
        tracing::info!("compressed {}/{}", progress.completed, progress.total);
    })?;

    let mut result = CompressResult {
        outputs: Vec::with_capacity(compressed.len()),
        reports: Vec::with_capacity(compressed.len()),
    };
    for file in compressed {
        let output = output_dir.join(&file.output_name);
        write_output(&output, &file.bytes)?;
        result.outputs.push(output);
        result.reports.push(file.report);
    }

    Ok(result)
}

#[derive(Debug, Serialize)]
pub struct InfoResult {
    pub file: String,
    pub size: String,
    #[serde(flatten)]
    pub info: PdfInfo,
}

impl fmt::Display for InfoResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File:      {}", self.file)?;
        writeln!(f, "Size:      {}", self.size)?;
        writeln!(f, "Version:   PDF {}", self.info.version)?;
        writeln!(f, "Pages:     {}", self.info.page_count)?;
        writeln!(f, "Encrypted: {}", if self.info.encrypted { "yes" } else { "no" })?;
        if let Some(title) = &self.info.title {
            writeln!(f, "Title:     {}", title)?;
        }
        if let Some(author) = &self.info.author {
            writeln!(f, "Author:    {}", author)?;
        }
        Ok(())
    }
}

pub fn info(input: &Path) -> anyhow::Result<InfoResult> {
    let bytes = read_input(input)?;
    let info = validate_pdf(&bytes).with_context(|| format!("{} is not a valid PDF", input.display()))?;
    Ok(InfoResult {
        file: file_name(input),
        size: format_file_size(bytes.len() as u64),
        info,
    })
}
