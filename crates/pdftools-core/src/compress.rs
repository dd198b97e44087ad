//! PDF size reduction
//!
//! Drops document metadata, prunes unreachable objects and re-encodes
//! streams with Flate. Works on lopdf documents directly because metadata
//! handling is library specific.

use crate::error::PdfToolsError;
use crate::report::Progress;
use crate::validation::{ensure_pdf, pdf_stem, SourceFile};
use lopdf::{Document, Object};
use serde::{Deserialize, Serialize};

/// Info dictionary keys cleared when metadata removal is requested
const METADATA_KEYS: [&[u8]; 6] = [
    b"Title",
    b"Author",
    b"Subject",
    b"Keywords",
    b"Creator",
    b"Producer",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionOptions {
    #[serde(default = "default_true")]
    pub remove_metadata: bool,
    #[serde(default = "default_true")]
    pub compress_streams: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            remove_metadata: true,
            compress_streams: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionReport {
    pub name: String,
    pub original_size: usize,
    pub compressed_size: usize,
    /// Size reduction in percent, never negative
    pub savings_percent: f64,
}

impl CompressionReport {
    fn new(name: &str, original_size: usize, compressed_size: usize) -> Self {
        let savings = if original_size == 0 {
            0.0
        } else {
            (original_size as f64 - compressed_size as f64) / original_size as f64 * 100.0
        };
        Self {
            name: name.to_string(),
            original_size,
            compressed_size,
            savings_percent: savings.max(0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompressedFile {
    pub output_name: String,
    pub bytes: Vec<u8>,
    pub report: CompressionReport,
}

/// Compress one document
pub fn compress_document(
    name: &str,
    bytes: &[u8],
    options: CompressionOptions,
) -> Result<CompressedFile, PdfToolsError> {
    let mut doc =
        Document::load_mem(bytes).map_err(|e| PdfToolsError::DecodeFailure(e.to_string()))?;

    if options.remove_metadata {
        strip_metadata(&mut doc);
    }

    doc.prune_objects();
    if options.compress_streams {
        doc.compress();
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfToolsError::OperationError(format!("Save failed: {}", e)))?;

    let report = CompressionReport::new(name, bytes.len(), buffer.len());
    tracing::debug!(
        name,
        original = report.original_size,
        compressed = report.compressed_size,
        "compressed document"
    );

    Ok(CompressedFile {
        output_name: compressed_output_name(name),
        bytes: buffer,
        report,
    })
}

/// Compress a batch in order. The first failing file aborts the batch.
pub fn compress_batch(
    files: &[SourceFile],
    options: CompressionOptions,
    mut on_progress: impl FnMut(Progress),
) -> Result<Vec<CompressedFile>, PdfToolsError> {
    if files.is_empty() {
        return Err(PdfToolsError::Validation(
            "Please select PDF files to compress".to_string(),
        ));
    }

    let total = files.len();
    let mut results = Vec::with_capacity(total);

    for (index, file) in files.iter().enumerate() {
        let compressed = ensure_pdf(file)
            .and_then(|_| compress_document(&file.name, &file.bytes, options))
            .map_err(|e| {
                tracing::warn!(name = %file.name, error = %e, "compression aborted");
                PdfToolsError::aborted(&file.name, e)
            })?;
        results.push(compressed);
        on_progress(Progress {
            completed: index + 1,
            total,
        });
    }

    Ok(results)
}

/// Name for a compressed document, e.g. `report_compressed.pdf`
pub fn compressed_output_name(original: &str) -> String {
    format!("{}_compressed.pdf", pdf_stem(original))
}

fn strip_metadata(doc: &mut Document) {
    let info_id = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .ok();

    if let Some(info_id) = info_id {
        if let Ok(Object::Dictionary(info)) = doc.get_object_mut(info_id) {
            for key in METADATA_KEYS {
                info.remove(key);
            }
        }
    }

    // XMP metadata stream hangs off the catalog
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .ok();
    if let Some(catalog_id) = catalog_id {
        if let Ok(Object::Dictionary(catalog)) = doc.get_object_mut(catalog_id) {
            catalog.remove(b"Metadata");
        }
    }
}
