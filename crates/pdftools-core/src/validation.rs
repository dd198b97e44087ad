//! Input file screening and PDF info extraction
//!
//! Files arrive from a picker or drag-and-drop with a name, an optional
//! media type and raw bytes. This module decides whether a file is
//! accepted by the PDF tools at all and extracts basic metadata.

use crate::error::PdfToolsError;
use lopdf::Document;
use serde::Serialize;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A file handed in by the file picker
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    /// Media type reported by the picker, if any (e.g. "application/pdf")
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, media_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.map(str::to_string),
            bytes,
        }
    }

    /// Build a source file, guessing the media type from the extension
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = if has_pdf_extension(&name) {
            Some(PDF_MEDIA_TYPE.to_string())
        } else {
            None
        };
        Self {
            name,
            media_type,
            bytes,
        }
    }
}

/// PDF file information extracted during validation
#[derive(Debug, Clone, Serialize, Default)]
pub struct PdfInfo {
    /// Number of pages in the document
    pub page_count: u32,
    /// PDF version string (e.g., "1.7")
    pub version: String,
    /// Whether the document is encrypted
    pub encrypted: bool,
    /// File size in bytes
    pub size_bytes: usize,
    /// Document title from metadata (if available)
    pub title: Option<String>,
    /// Document author from metadata (if available)
    pub author: Option<String>,
}

fn has_pdf_extension(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".pdf")
}

/// Whether a picked file is accepted by the PDF tools.
///
/// The reported media type wins when present; otherwise the extension decides.
pub fn is_pdf_file(name: &str, media_type: Option<&str>) -> bool {
    match media_type {
        Some(media_type) if !media_type.is_empty() => media_type == PDF_MEDIA_TYPE,
        _ => has_pdf_extension(name),
    }
}

/// Reject files that are not PDFs before handing them to the parser
pub fn ensure_pdf(file: &SourceFile) -> Result<(), PdfToolsError> {
    if !is_pdf_file(&file.name, file.media_type.as_deref()) || !file.bytes.starts_with(b"%PDF-") {
        return Err(PdfToolsError::UnsupportedFile(file.name.clone()));
    }
    Ok(())
}

/// Validate a PDF file and extract basic info
pub fn validate_pdf(bytes: &[u8]) -> Result<PdfInfo, PdfToolsError> {
    quick_check_header(bytes)?;

    let version = extract_version(bytes);

    let document =
        Document::load_mem(bytes).map_err(|e| PdfToolsError::DecodeFailure(e.to_string()))?;

    let encrypted = document.is_encrypted();

    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err(PdfToolsError::DecodeFailure("PDF has no pages".to_string()));
    }

    let (title, author) = extract_metadata(&document);

    Ok(PdfInfo {
        page_count,
        version,
        encrypted,
        size_bytes: bytes.len(),
        title,
        author,
    })
}

fn quick_check_header(bytes: &[u8]) -> Result<(), PdfToolsError> {
    if bytes.len() < 8 {
        return Err(PdfToolsError::DecodeFailure(
            "File too small to be a valid PDF".to_string(),
        ));
    }

    if !bytes.starts_with(b"%PDF-") {
        return Err(PdfToolsError::DecodeFailure(
            "Not a valid PDF file (missing %PDF- header)".to_string(),
        ));
    }

    Ok(())
}

/// Quick validation without full parsing (for large files)
pub fn quick_validate(bytes: &[u8]) -> Result<(), PdfToolsError> {
    quick_check_header(bytes)?;

    // EOF marker should be near the end
    let tail = if bytes.len() > 1024 {
        &bytes[bytes.len() - 1024..]
    } else {
        bytes
    };

    if !tail.windows(5).any(|w| w == b"%%EOF") {
        return Err(PdfToolsError::DecodeFailure(
            "PDF appears truncated (missing %%EOF marker)".to_string(),
        ));
    }

    Ok(())
}

/// Extract PDF version from header (`%PDF-1.7`)
fn extract_version(bytes: &[u8]) -> String {
    if bytes.len() >= 8 && bytes.starts_with(b"%PDF-") {
        if let Ok(version) = std::str::from_utf8(&bytes[5..8]) {
            return version.trim().to_string();
        }
    }
    "1.4".to_string()
}

/// Extract title and author from the document Info dictionary
fn extract_metadata(document: &Document) -> (Option<String>, Option<String>) {
    let info = document
        .trailer
        .get(b"Info")
        .and_then(|obj| obj.as_reference())
        .and_then(|id| document.get_object(id))
        .and_then(|obj| obj.as_dict());

    let info = match info {
        Ok(info) => info,
        Err(_) => return (None, None),
    };

    let read = |key: &[u8]| {
        info.get(key)
            .and_then(|obj| obj.as_str())
            .ok()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .filter(|s| !s.is_empty())
    };

    (read(b"Title"), read(b"Author"))
}

/// File name without its `.pdf` extension
pub fn pdf_stem(name: &str) -> &str {
    if has_pdf_extension(name) {
        &name[..name.len() - 4]
    } else {
        name
    }
}

/// Format a byte count for display: "0 Bytes", "512 Bytes", "1.5 KB", "2.25 MB"
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
