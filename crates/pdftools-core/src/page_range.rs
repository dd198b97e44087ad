//! Page range parsing for split/extract operations
//!
//! Turns a user-typed expression like `"1-3, 5, 7-10"` into a sorted,
//! deduplicated list of 1-indexed page numbers bounded by the document's
//! page count. Invalid tokens are dropped rather than reported as errors;
//! the counts of dropped and clipped tokens travel with the result so a
//! caller can show a warning without changing what gets extracted.

use crate::error::PdfToolsError;
use serde::Serialize;
use std::collections::BTreeSet;

/// Largest page count accepted from callers that do not hold a parsed
/// document. A selection allocates one entry per page.
pub const MAX_PAGE_COUNT: u32 = 100_000;

/// Result of parsing a page range expression against a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageSelection {
    /// Distinct page numbers, ascending, each in `1..=page_count`
    pub pages: Vec<u32>,
    /// Tokens that were discarded (malformed, zero, reversed, out of bounds)
    pub dropped: usize,
    /// Ranges whose end ran past the last page and were cut short
    pub clipped: usize,
}

impl PageSelection {
    /// Every page of a document with `page_count` pages
    pub fn all(page_count: u32) -> Self {
        Self {
            pages: (1..=page_count).collect(),
            dropped: 0,
            clipped: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Page indices as the PDF backend expects them (0-based)
    pub fn zero_based(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p - 1).collect()
    }

    /// True when some part of the input was ignored or shortened
    pub fn has_warnings(&self) -> bool {
        self.dropped > 0 || self.clipped > 0
    }
}

enum Token {
    Single(u32),
    Range(u32, u32),
}

fn parse_token(part: &str) -> Option<Token> {
    if let Some((start, end)) = part.split_once('-') {
        let start = start.trim().parse::<u32>().ok()?;
        let end = end.trim().parse::<u32>().ok()?;
        Some(Token::Range(start, end))
    } else {
        part.parse::<u32>().ok().map(Token::Single)
    }
}

/// Parse a page range expression into a [`PageSelection`].
///
/// # Arguments
/// * `range_text` - Range string like "1-3, 5, 8-10"
/// * `page_count` - Total pages in the document (for bounds checking).
///   The selection can hold up to `page_count` entries, so this must come
///   from a real document; see [`checked_page_count`] for untrusted input.
///
/// # Examples
/// ```
/// use pdftools_core::page_range::parse_page_selection;
///
/// let selection = parse_page_selection("5, 1-3, 2", 10);
/// assert_eq!(selection.pages, vec![1, 2, 3, 5]);
/// assert_eq!(selection.dropped, 0);
/// ```
pub fn parse_page_selection(range_text: &str, page_count: u32) -> PageSelection {
    let mut pages = BTreeSet::new();
    let mut dropped = 0;
    let mut clipped = 0;

    for part in range_text.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        match parse_token(part) {
            Some(Token::Single(page)) if page >= 1 && page <= page_count => {
                pages.insert(page);
            }
            Some(Token::Range(start, end)) if start >= 1 && start <= end && start <= page_count => {
                if end > page_count {
                    clipped += 1;
                }
                pages.extend(start..=end.min(page_count));
            }
            _ => dropped += 1,
        }
    }

    PageSelection {
        pages: pages.into_iter().collect(),
        dropped,
        clipped,
    }
}

/// Parse a page range expression and return only the page numbers.
///
/// ```
/// use pdftools_core::page_range::parse_page_ranges;
///
/// assert_eq!(parse_page_ranges("1-3, 5, 7-10", 10), vec![1, 2, 3, 5, 7, 8, 9, 10]);
/// assert_eq!(parse_page_ranges("0,-1,abc", 10), Vec::<u32>::new());
/// ```
pub fn parse_page_ranges(range_text: &str, page_count: u32) -> Vec<u32> {
    parse_page_selection(range_text, page_count).pages
}

/// Reject page counts no real document reaches
pub fn checked_page_count(page_count: u32) -> Result<u32, PdfToolsError> {
    if page_count > MAX_PAGE_COUNT {
        return Err(PdfToolsError::InvalidRange(format!(
            "Page count {} exceeds the limit of {}",
            page_count, MAX_PAGE_COUNT
        )));
    }
    Ok(page_count)
}

/// Strict check of a page range expression.
///
/// Unlike [`parse_page_selection`], the first problem found is returned as
/// an error so a form can explain what is wrong with the input.
pub fn validate_page_range(range_text: &str, page_count: u32) -> Result<(), PdfToolsError> {
    if range_text.trim().is_empty() {
        return Err(PdfToolsError::InvalidRange(
            "Page range cannot be empty".to_string(),
        ));
    }

    for part in range_text.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        match parse_token(part) {
            Some(Token::Range(start, end)) => {
                if start > end {
                    return Err(PdfToolsError::InvalidRange(format!(
                        "Start {} > end {}",
                        start, end
                    )));
                }
                if start < 1 {
                    return Err(PdfToolsError::InvalidRange(format!(
                        "Page number must be >= 1, got {}",
                        start
                    )));
                }
                if end > page_count {
                    return Err(PdfToolsError::InvalidRange(format!(
                        "Page {} exceeds total pages {}",
                        end, page_count
                    )));
                }
            }
            Some(Token::Single(page)) => {
                if page < 1 {
                    return Err(PdfToolsError::InvalidRange(format!(
                        "Page number must be >= 1, got {}",
                        page
                    )));
                }
                if page > page_count {
                    return Err(PdfToolsError::InvalidRange(format!(
                        "Page {} exceeds total pages {}",
                        page, page_count
                    )));
                }
            }
            None => {
                return Err(PdfToolsError::InvalidRange(format!(
                    "Invalid page token: {}",
                    part
                )))
            }
        }
    }

    Ok(())
}

/// Range expression covering a whole document, used as the initial input
/// after a file is loaded.
pub fn full_range(page_count: u32) -> String {
    match page_count {
        0 => String::new(),
        n => format!("1-{}", n),
    }
}

/// Human readable page list, e.g. "1, 2, 5"
pub fn format_page_list(pages: &[u32]) -> String {
    pages
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
