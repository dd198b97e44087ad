//! PDF page selection, merge, split and compress
//!
//! Client-side PDF manipulation on top of lopdf. The document library is
//! reached through the [`PdfBackend`] trait so the ordering and progress
//! logic can be exercised without real documents.
//!
//! - [`page_range`]: turn `"1-3, 5"` into a sorted, deduplicated page list
//! - [`merge_queue`]: the ordered working set for a merge
//! - [`merge`] / [`split`] / [`compress`]: the document operations
//! - [`flow`]: the Empty/FilesSelected/Processing/Result/Error page flow

pub mod backend;
pub mod compress;
pub mod error;
pub mod flow;
pub mod merge;
pub mod merge_queue;
pub mod page_range;
pub mod report;
pub mod split;
pub mod validation;

pub use backend::{LopdfBackend, PdfBackend};
pub use compress::{
    compress_batch, compress_document, compressed_output_name, CompressedFile, CompressionOptions,
    CompressionReport,
};
pub use error::PdfToolsError;
pub use flow::{Flow, FlowState};
pub use merge::{merge_sources, MergeOutput, MergeSource, PageOrigin, MIN_MERGE_MESSAGE};
pub use merge_queue::{AddReport, Direction, EntryId, EntrySummary, MergeQueue, Preview};
pub use page_range::{
    checked_page_count, format_page_list, full_range, parse_page_ranges, parse_page_selection,
    validate_page_range, PageSelection, MAX_PAGE_COUNT,
};
pub use report::{ProcessMetrics, Progress};
pub use split::{split_document, split_output_name, EMPTY_SELECTION_MESSAGE};
pub use validation::{
    format_file_size, is_pdf_file, quick_validate, validate_pdf, PdfInfo, SourceFile,
};

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32, PdfToolsError> {
    let doc = LopdfBackend.load(bytes)?;
    Ok(LopdfBackend.page_count(&doc))
}
