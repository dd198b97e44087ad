//! Ordered working set of documents awaiting a merge
//!
//! Insertion order is merge order. Entries can be moved up/down one slot,
//! reordered wholesale, or removed. Each entry may own a preview resource
//! (e.g. a browser object URL) which is released exactly once, when the
//! entry leaves the queue.

use crate::backend::PdfBackend;
use crate::error::PdfToolsError;
use crate::merge::{merge_sources, MergeOutput, MergeSource};
use crate::report::Progress;
use crate::validation::{ensure_pdf, format_file_size, SourceFile};
use serde::Serialize;
use std::fmt;

/// Stable identity of a queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A resource tied to a queue entry, released when the entry is dropped
pub struct Preview {
    release: Option<Box<dyn FnOnce()>>,
}

impl Preview {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preview")
            .field("pending", &self.release.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct QueueEntry {
    id: EntryId,
    name: String,
    bytes: Vec<u8>,
    page_count: u32,
    // held for its Drop
    #[allow(dead_code)]
    preview: Option<Preview>,
}

impl QueueEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id,
            name: self.name.clone(),
            size: format_file_size(self.bytes.len() as u64),
            page_count: self.page_count,
        }
    }
}

/// Display data for one queue row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySummary {
    pub id: EntryId,
    pub name: String,
    pub size: String,
    pub page_count: u32,
}

/// A file that was not added, and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub name: String,
    pub error: PdfToolsError,
}

#[derive(Debug, Default)]
pub struct AddReport {
    pub added: Vec<EntryId>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Default)]
pub struct MergeQueue {
    entries: Vec<QueueEntry>,
    next_id: u64,
}

impl MergeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of files in order. Files that are not PDFs or cannot
    /// be parsed are skipped and reported; the rest of the batch is added.
    pub fn add_documents<B: PdfBackend>(
        &mut self,
        backend: &B,
        files: impl IntoIterator<Item = SourceFile>,
    ) -> AddReport {
        let mut report = AddReport::default();

        for file in files {
            let name = file.name.clone();
            match self.add_document(backend, file, None) {
                Ok(id) => report.added.push(id),
                Err(error) => {
                    tracing::warn!(name = %name, error = %error, "skipping file");
                    report.skipped.push(SkippedFile { name, error });
                }
            }
        }

        report
    }

    /// Append one file, optionally with a preview resource owned by the entry
    pub fn add_document<B: PdfBackend>(
        &mut self,
        backend: &B,
        file: SourceFile,
        preview: Option<Preview>,
    ) -> Result<EntryId, PdfToolsError> {
        ensure_pdf(&file)?;

        let document = backend.load(&file.bytes)?;
        let page_count = backend.page_count(&document);

        let id = EntryId(self.next_id);
        self.next_id += 1;

        tracing::debug!(id = id.0, name = %file.name, pages = page_count, "added document");

        self.entries.push(QueueEntry {
            id,
            name: file.name,
            bytes: file.bytes,
            page_count,
            preview,
        });

        Ok(id)
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Swap an entry with its neighbour. Returns false when nothing moved
    /// (unknown id, first entry moved up, last entry moved down).
    pub fn move_entry(&mut self, id: EntryId, direction: Direction) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.entries.len() => index + 1,
            _ => return false,
        };

        self.entries.swap(index, target);
        true
    }

    /// Remove an entry and release its preview. Returns false for unknown ids.
    pub fn remove_entry(&mut self, id: EntryId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the order wholesale; `order` must name every entry exactly once
    pub fn reorder(&mut self, order: &[EntryId]) -> Result<(), PdfToolsError> {
        if order.len() != self.entries.len() {
            return Err(PdfToolsError::Validation(
                "Invalid order: wrong number of entries".to_string(),
            ));
        }

        let mut positions = Vec::with_capacity(order.len());
        for &id in order {
            let index = self.position(id).ok_or_else(|| {
                PdfToolsError::Validation(format!("Invalid order: unknown entry {}", id))
            })?;
            if positions.contains(&index) {
                return Err(PdfToolsError::Validation(format!(
                    "Invalid order: duplicate entry {}",
                    id
                )));
            }
            positions.push(index);
        }

        let mut slots: Vec<Option<QueueEntry>> = self.entries.drain(..).map(Some).collect();
        self.entries = positions
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();

        Ok(())
    }

    /// Remove every entry, releasing all previews
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&QueueEntry> {
        self.position(id).map(|index| &self.entries[index])
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub fn summaries(&self) -> Vec<EntrySummary> {
        self.entries.iter().map(QueueEntry::summary).collect()
    }

    pub fn total_page_count(&self) -> u32 {
        self.entries.iter().map(|entry| entry.page_count).sum()
    }

    pub fn can_merge(&self) -> bool {
        self.entries.len() >= 2
    }

    /// Merge all entries in queue order.
    ///
    /// Rejected with a validation error when fewer than two entries are
    /// queued. `on_progress` is called after each document is copied.
    pub fn merge<B: PdfBackend>(
        &self,
        backend: &B,
        on_progress: impl FnMut(Progress),
    ) -> Result<MergeOutput, PdfToolsError> {
        let sources: Vec<MergeSource<'_>> = self
            .entries
            .iter()
            .map(|entry| MergeSource {
                id: entry.id,
                name: &entry.name,
                bytes: &entry.bytes,
            })
            .collect();

        merge_sources(backend, &sources, on_progress)
    }
}
