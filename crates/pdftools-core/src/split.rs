//! PDF Split algorithm
//!
//! Extracts a page selection from one document into a new document.

use crate::backend::PdfBackend;
use crate::error::PdfToolsError;
use crate::page_range::PageSelection;
use crate::validation::pdf_stem;

/// Message shown when a range expression selects nothing
pub const EMPTY_SELECTION_MESSAGE: &str = "Please enter valid page numbers";

/// Copy the selected pages (1-indexed, ascending) into a new document.
///
/// An empty selection is rejected before the source is touched.
pub fn split_document<B: PdfBackend>(
    backend: &B,
    bytes: &[u8],
    selection: &PageSelection,
) -> Result<Vec<u8>, PdfToolsError> {
    if selection.is_empty() {
        return Err(PdfToolsError::Validation(
            EMPTY_SELECTION_MESSAGE.to_string(),
        ));
    }

    if selection.pages.contains(&0) {
        return Err(PdfToolsError::InvalidRange(
            "Page numbers must be >= 1".into(),
        ));
    }

    let source = backend.load(bytes)?;
    let page_count = backend.page_count(&source);

    if let Some(&page) = selection.pages.iter().find(|&&page| page > page_count) {
        return Err(PdfToolsError::InvalidRange(format!(
            "Page {} does not exist (document has {} pages)",
            page, page_count
        )));
    }

    let mut output = backend.create()?;
    for page in backend.copy_pages(&mut output, &source, &selection.zero_based())? {
        backend.add_page(&mut output, page)?;
    }

    tracing::debug!(pages = selection.len(), of = page_count, "extracted pages");

    backend.save(output)
}

/// Name for an extracted document, e.g. `report_pages_1-2-5.pdf`
pub fn split_output_name(original: &str, pages: &[u32]) -> String {
    let pages = pages
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("-");
    format!("{}_pages_{}.pdf", pdf_stem(original), pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{create_test_pdf, page_labels};
    use crate::backend::LopdfBackend;
    use crate::page_range::parse_page_selection;
    use lopdf::Document;

    fn selection(pages: Vec<u32>) -> PageSelection {
        PageSelection {
            pages,
            ..Default::default()
        }
    }

    #[test]
    fn test_split_empty_pages_fails() {
        let pdf = create_test_pdf(5, "Doc");
        let result = split_document(&LopdfBackend, &pdf, &selection(vec![]));
        assert_eq!(
            result.unwrap_err(),
            PdfToolsError::Validation(EMPTY_SELECTION_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_split_extracts_single_page() {
        let pdf = create_test_pdf(5, "Doc");
        let result = split_document(&LopdfBackend, &pdf, &selection(vec![1])).unwrap();
        let doc = Document::load_mem(&result).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_split_extracts_parsed_range() {
        let pdf = create_test_pdf(10, "Doc");
        let pages = parse_page_selection("7-8, 2", 10);
        let result = split_document(&LopdfBackend, &pdf, &pages).unwrap();
        assert_eq!(
            page_labels(&result),
            vec!["Doc-Page-2", "Doc-Page-7", "Doc-Page-8"]
        );
    }

    #[test]
    fn test_split_invalid_page_number_fails() {
        let pdf = create_test_pdf(5, "Doc");
        let result = split_document(&LopdfBackend, &pdf, &selection(vec![10]));
        assert!(matches!(result, Err(PdfToolsError::InvalidRange(_))));
    }

    #[test]
    fn test_split_page_zero_fails() {
        let pdf = create_test_pdf(5, "Doc");
        let result = split_document(&LopdfBackend, &pdf, &selection(vec![0]));
        assert!(result.is_err());
    }

    #[test]
    fn test_split_corrupt_source_fails() {
        let result = split_document(&LopdfBackend, b"garbage", &selection(vec![1]));
        assert!(matches!(result, Err(PdfToolsError::DecodeFailure(_))));
    }

    #[test]
    fn test_split_output_name() {
        assert_eq!(
            split_output_name("report.pdf", &[1, 2, 5]),
            "report_pages_1-2-5.pdf"
        );
        assert_eq!(split_output_name("scan", &[3]), "scan_pages_3.pdf");
    }
}
