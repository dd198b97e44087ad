//! PDF Merge algorithm
//!
//! Concatenates the pages of several source documents, in the given order,
//! into one new document.

use crate::backend::PdfBackend;
use crate::error::PdfToolsError;
use crate::merge_queue::EntryId;
use crate::report::Progress;
use serde::Serialize;

/// Message shown when the user tries to merge fewer than two files
pub const MIN_MERGE_MESSAGE: &str = "Please select at least 2 PDF files to merge";

/// One input of a merge, borrowed from wherever the bytes are held
#[derive(Debug, Clone, Copy)]
pub struct MergeSource<'a> {
    pub id: EntryId,
    pub name: &'a str,
    pub bytes: &'a [u8],
}

/// Where an output page came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageOrigin {
    pub entry: EntryId,
    /// 1-indexed page number within the source document
    pub page: u32,
}

#[derive(Debug, Clone)]
pub struct MergeOutput {
    pub bytes: Vec<u8>,
    pub page_count: u32,
    /// One entry per output page, in output order
    pub origins: Vec<PageOrigin>,
}

/// Merge `sources` into a single document.
///
/// The algorithm:
/// 1. Reject fewer than two sources
/// 2. Create an empty output document
/// 3. For each source, in order: load it, copy all of its pages and append
///    them to the output, then report progress
/// 4. Save the output
///
/// Any failure aborts the whole merge; no partial output is returned.
pub fn merge_sources<B: PdfBackend>(
    backend: &B,
    sources: &[MergeSource<'_>],
    mut on_progress: impl FnMut(Progress),
) -> Result<MergeOutput, PdfToolsError> {
    if sources.len() < 2 {
        return Err(PdfToolsError::Validation(MIN_MERGE_MESSAGE.to_string()));
    }

    let total = sources.len();
    tracing::info!(documents = total, "merging documents");

    let mut output = backend.create()?;
    let mut origins = Vec::new();

    for (index, source) in sources.iter().enumerate() {
        let copied = append_all_pages(backend, &mut output, source.bytes).map_err(|e| {
            tracing::warn!(name = source.name, error = %e, "merge aborted");
            PdfToolsError::aborted(source.name, e)
        })?;

        origins.extend((1..=copied).map(|page| PageOrigin {
            entry: source.id,
            page,
        }));

        on_progress(Progress {
            completed: index + 1,
            total,
        });
    }

    let page_count = backend.page_count(&output);
    let bytes = backend
        .save(output)
        .map_err(|e| PdfToolsError::aborted("merged document", e))?;

    tracing::info!(pages = page_count, size = bytes.len(), "merge complete");

    Ok(MergeOutput {
        bytes,
        page_count,
        origins,
    })
}

fn append_all_pages<B: PdfBackend>(
    backend: &B,
    output: &mut B::Document,
    bytes: &[u8],
) -> Result<u32, PdfToolsError> {
    let source = backend.load(bytes)?;
    let count = backend.page_count(&source);
    let indices: Vec<u32> = (0..count).collect();

    for page in backend.copy_pages(output, &source, &indices)? {
        backend.add_page(output, page)?;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{create_test_pdf, page_labels};
    use crate::backend::LopdfBackend;
    use lopdf::Document;

    fn source<'a>(id: u64, name: &'a str, bytes: &'a [u8]) -> MergeSource<'a> {
        MergeSource {
            id: EntryId::from_raw(id),
            name,
            bytes,
        }
    }

    #[test]
    fn test_merge_empty_fails() {
        let result = merge_sources(&LopdfBackend, &[], |_| {});
        assert_eq!(
            result.unwrap_err(),
            PdfToolsError::Validation(MIN_MERGE_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_merge_single_document_rejected() {
        let pdf = create_test_pdf(2, "Single");
        let result = merge_sources(&LopdfBackend, &[source(1, "single.pdf", &pdf)], |_| {});
        assert!(matches!(result, Err(PdfToolsError::Validation(_))));
    }

    #[test]
    fn test_merge_two_documents_combines_pages() {
        let doc_a = create_test_pdf(2, "DocA");
        let doc_b = create_test_pdf(3, "DocB");

        let merged = merge_sources(
            &LopdfBackend,
            &[source(1, "a.pdf", &doc_a), source(2, "b.pdf", &doc_b)],
            |_| {},
        )
        .unwrap();

        assert_eq!(merged.page_count, 5);
        let doc = Document::load_mem(&merged.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 5, "Merged document should have 5 pages");
    }

    #[test]
    fn test_merge_preserves_page_order() {
        let doc1 = create_test_pdf(2, "First");
        let doc2 = create_test_pdf(1, "Second");
        let doc3 = create_test_pdf(2, "Third");

        let merged = merge_sources(
            &LopdfBackend,
            &[
                source(1, "1.pdf", &doc1),
                source(2, "2.pdf", &doc2),
                source(3, "3.pdf", &doc3),
            ],
            |_| {},
        )
        .unwrap();

        assert_eq!(
            page_labels(&merged.bytes),
            vec![
                "First-Page-1",
                "First-Page-2",
                "Second-Page-1",
                "Third-Page-1",
                "Third-Page-2"
            ]
        );
        let entries: Vec<u64> = merged.origins.iter().map(|o| o.entry.raw()).collect();
        assert_eq!(entries, vec![1, 1, 2, 3, 3]);
    }

    #[test]
    fn test_merge_reports_progress_per_document() {
        let docs: Vec<Vec<u8>> = (0..4)
            .map(|i| create_test_pdf(1, &format!("Doc{}", i)))
            .collect();
        let sources: Vec<_> = docs
            .iter()
            .enumerate()
            .map(|(i, d)| source(i as u64, "doc.pdf", d))
            .collect();

        let mut seen = Vec::new();
        merge_sources(&LopdfBackend, &sources, |p| seen.push(p.percent())).unwrap();

        assert_eq!(seen, vec![25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn test_merge_aborts_on_corrupt_source() {
        let good = create_test_pdf(1, "Good");
        let bad = b"%PDF-1.7 this is not really a pdf".to_vec();

        let mut progress_calls = 0;
        let result = merge_sources(
            &LopdfBackend,
            &[source(1, "good.pdf", &good), source(2, "bad.pdf", &bad)],
            |_| progress_calls += 1,
        );

        match result {
            Err(PdfToolsError::OperationAborted { name, .. }) => assert_eq!(name, "bad.pdf"),
            other => panic!("expected abort, got {:?}", other.map(|o| o.page_count)),
        }
        assert_eq!(progress_calls, 1);
    }

    #[test]
    fn test_merged_document_is_valid_pdf() {
        let doc1 = create_test_pdf(10, "Large");
        let doc2 = create_test_pdf(1, "Small");

        let merged = merge_sources(
            &LopdfBackend,
            &[source(1, "l.pdf", &doc1), source(2, "s.pdf", &doc2)],
            |_| {},
        )
        .unwrap();

        assert!(merged.bytes.starts_with(b"%PDF-"));
        let doc = Document::load_mem(&merged.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 11);
    }
}
