//! Stateful PDF session management
//!
//! Holds the working set (a [`MergeQueue`]), the page selection for split
//! and the page [`Flow`] in Rust, so JavaScript only forwards DOM events.

use pdftools_core::{
    full_range, parse_page_selection, split_document, split_output_name, Direction, EntryId,
    EntrySummary, Flow, LopdfBackend, MergeQueue, PageSelection, PdfToolsError, Preview,
    Progress, SourceFile, EMPTY_SELECTION_MESSAGE, MIN_MERGE_MESSAGE,
};
use wasm_bindgen::prelude::*;

/// Name given to merge output
pub const MERGED_OUTPUT_NAME: &str = "merged.pdf";

/// Session mode determines available operations
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Split mode: single document, extract pages
    Split,
    /// Merge mode: multiple documents, combine
    Merge,
}

/// Stateful PDF session that holds documents in Rust memory
#[wasm_bindgen]
pub struct PdfToolSession {
    mode: SessionMode,
    queue: MergeQueue,
    flow: Flow,
    range_text: String,
    selection: PageSelection,
    progress_callback: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl PdfToolSession {
    #[wasm_bindgen(constructor)]
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            queue: MergeQueue::new(),
            flow: Flow::new(),
            range_text: String::new(),
            selection: PageSelection::default(),
            progress_callback: None,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Callback signature: (completed: number, total: number, message: string) => void
    #[wasm_bindgen(js_name = setProgressCallback)]
    pub fn set_progress_callback(&mut self, callback: js_sys::Function) {
        self.progress_callback = Some(callback);
    }

    /// Add a document. Returns its queue row (`{ id, name, size, page_count }`).
    #[wasm_bindgen(js_name = addDocument)]
    pub fn add_document(
        &mut self,
        name: &str,
        media_type: Option<String>,
        bytes: &[u8],
    ) -> Result<JsValue, JsValue> {
        let summary = self
            .add_document_internal(name, media_type.as_deref(), bytes, None)
            .map_err(to_js)?;
        to_js_value(&summary)
    }

    /// Like `addDocument`, but `release` is called once when the document
    /// leaves the session (e.g. to revoke a thumbnail object URL).
    #[wasm_bindgen(js_name = addDocumentWithPreview)]
    pub fn add_document_with_preview(
        &mut self,
        name: &str,
        media_type: Option<String>,
        bytes: &[u8],
        release: js_sys::Function,
    ) -> Result<JsValue, JsValue> {
        let preview = Preview::new(move || {
            let _ = release.call0(&JsValue::NULL);
        });
        let summary = self
            .add_document_internal(name, media_type.as_deref(), bytes, Some(preview))
            .map_err(to_js)?;
        to_js_value(&summary)
    }

    #[wasm_bindgen(js_name = removeDocument)]
    pub fn remove_document(&mut self, id: u64) -> Result<bool, JsValue> {
        self.remove_document_internal(EntryId::from_raw(id))
            .map_err(to_js)
    }

    /// Move a document one slot up or down. Returns false when nothing moved.
    #[wasm_bindgen(js_name = moveDocument)]
    pub fn move_document(&mut self, id: u64, up: bool) -> Result<bool, JsValue> {
        let direction = if up { Direction::Up } else { Direction::Down };
        self.move_document_internal(EntryId::from_raw(id), direction)
            .map_err(to_js)
    }

    /// Reorder documents. `order` must list every document id exactly once.
    #[wasm_bindgen(js_name = reorderDocuments)]
    pub fn reorder_documents(&mut self, order: &[u64]) -> Result<(), JsValue> {
        self.reorder_documents_internal(order).map_err(to_js)
    }

    /// Set the split page range, e.g. "1-3, 5, 8-10".
    /// Returns `{ pages, dropped, clipped }`.
    #[wasm_bindgen(js_name = setPageRange)]
    pub fn set_page_range(&mut self, range_text: &str) -> Result<JsValue, JsValue> {
        let selection = self.set_page_range_internal(range_text).map_err(to_js)?;
        to_js_value(&selection)
    }

    #[wasm_bindgen(js_name = getPageRange)]
    pub fn get_page_range(&self) -> String {
        self.range_text.clone()
    }

    #[wasm_bindgen(js_name = getSelectedPages)]
    pub fn get_selected_pages(&self) -> Vec<u32> {
        self.selection.pages.clone()
    }

    #[wasm_bindgen(js_name = getDocuments)]
    pub fn get_documents(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.queue.summaries())
    }

    #[wasm_bindgen(js_name = getDocumentCount)]
    pub fn get_document_count(&self) -> usize {
        self.queue.len()
    }

    #[wasm_bindgen(js_name = getTotalPageCount)]
    pub fn get_total_page_count(&self) -> u32 {
        self.queue.total_page_count()
    }

    /// Current page state: "empty", "files-selected", "processing", "result" or "error"
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.flow.state().to_string()
    }

    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.flow.last_error().map(str::to_string)
    }

    #[wasm_bindgen(js_name = acknowledgeError)]
    pub fn acknowledge_error(&mut self) -> Result<(), JsValue> {
        self.flow.acknowledge_error().map_err(to_js)
    }

    #[wasm_bindgen(js_name = canExecute)]
    pub fn can_execute(&self) -> bool {
        match self.mode {
            SessionMode::Split => self.queue.len() == 1 && !self.selection.is_empty(),
            SessionMode::Merge => self.queue.can_merge(),
        }
    }

    /// Suggested download name for the result
    #[wasm_bindgen(js_name = outputName)]
    pub fn output_name(&self) -> String {
        match (self.mode, self.queue.entries().first()) {
            (SessionMode::Split, Some(entry)) => split_output_name(entry.name(), &self.selection.pages),
            _ => MERGED_OUTPUT_NAME.to_string(),
        }
    }

    /// Run the operation and return the result as a Uint8Array
    pub fn execute(&mut self) -> Result<js_sys::Uint8Array, JsValue> {
        let result = self.execute_internal().map_err(to_js)?;
        Ok(js_sys::Uint8Array::from(result.as_slice()))
    }

    /// Drop every document and start over
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.reset_internal().map_err(to_js)
    }
}

impl PdfToolSession {
    fn add_document_internal(
        &mut self,
        name: &str,
        media_type: Option<&str>,
        bytes: &[u8],
        preview: Option<Preview>,
    ) -> Result<EntrySummary, PdfToolsError> {
        if self.mode == SessionMode::Split && !self.queue.is_empty() {
            return Err(PdfToolsError::Validation(
                "Split mode only allows one document. Remove existing document first.".to_string(),
            ));
        }

        let file = SourceFile::new(name, media_type, bytes.to_vec());
        let id = self.queue.add_document(&LopdfBackend, file, preview)?;
        self.files_changed()?;

        let entry = self
            .queue
            .get(id)
            .ok_or_else(|| PdfToolsError::OperationError(format!("entry {} vanished", id)))?;

        // A fresh split document starts with every page selected
        if self.mode == SessionMode::Split {
            self.range_text = full_range(entry.page_count());
            self.selection = PageSelection::all(entry.page_count());
        }

        Ok(entry.summary())
    }

    fn remove_document_internal(&mut self, id: EntryId) -> Result<bool, PdfToolsError> {
        let removed = self.queue.remove_entry(id);
        if removed && self.queue.is_empty() {
            self.range_text.clear();
            self.selection = PageSelection::default();
        }
        self.files_changed()?;
        Ok(removed)
    }

    fn move_document_internal(
        &mut self,
        id: EntryId,
        direction: Direction,
    ) -> Result<bool, PdfToolsError> {
        let moved = self.queue.move_entry(id, direction);
        if moved {
            self.files_changed()?;
        }
        Ok(moved)
    }

    fn reorder_documents_internal(&mut self, order: &[u64]) -> Result<(), PdfToolsError> {
        if self.mode != SessionMode::Merge {
            return Err(PdfToolsError::Validation(
                "Reorder only available in merge mode".to_string(),
            ));
        }
        let ids: Vec<EntryId> = order.iter().copied().map(EntryId::from_raw).collect();
        self.queue.reorder(&ids)?;
        self.files_changed()
    }

    fn set_page_range_internal(&mut self, range_text: &str) -> Result<PageSelection, PdfToolsError> {
        if self.mode != SessionMode::Split {
            return Err(PdfToolsError::Validation(
                "Page selection only available in split mode".to_string(),
            ));
        }
        let page_count = self
            .queue
            .entries()
            .first()
            .map(|entry| entry.page_count())
            .ok_or_else(|| PdfToolsError::Validation("No document loaded".to_string()))?;

        self.files_changed()?;
        self.range_text = range_text.to_string();
        self.selection = parse_page_selection(range_text, page_count);
        Ok(self.selection.clone())
    }

    fn execute_internal(&mut self) -> Result<Vec<u8>, PdfToolsError> {
        if !self.can_execute() {
            let message = match self.mode {
                SessionMode::Split if !self.queue.is_empty() => EMPTY_SELECTION_MESSAGE,
                SessionMode::Split => "Please select a PDF file",
                SessionMode::Merge => MIN_MERGE_MESSAGE,
            };
            return Err(PdfToolsError::Validation(message.to_string()));
        }

        let Self {
            mode,
            queue,
            flow,
            selection,
            progress_callback,
            ..
        } = self;
        let callback = progress_callback.as_ref();

        flow.run(true, || match mode {
            SessionMode::Split => {
                let entry = queue.entries().first().ok_or_else(|| {
                    PdfToolsError::Validation("Please select a PDF file".to_string())
                })?;
                report_progress(callback, 0, 1, "Extracting pages...");
                let bytes = split_document(&LopdfBackend, entry.bytes(), selection)?;
                report_progress(callback, 1, 1, "Complete");
                Ok(bytes)
            }
            SessionMode::Merge => {
                report_progress(callback, 0, queue.len(), "Merging...");
                let output = queue.merge(&LopdfBackend, |progress: Progress| {
                    let message = format!(
                        "Processing document {}/{}...",
                        progress.completed, progress.total
                    );
                    report_progress(callback, progress.completed, progress.total, &message);
                })?;
                Ok(output.bytes)
            }
        })
    }

    fn reset_internal(&mut self) -> Result<(), PdfToolsError> {
        self.queue.clear();
        self.range_text.clear();
        self.selection = PageSelection::default();
        self.files_changed()?;
        Ok(())
    }

    fn files_changed(&mut self) -> Result<(), PdfToolsError> {
        self.flow.files_changed(!self.queue.is_empty())?;
        Ok(())
    }
}

/// Report progress to the JavaScript callback, if one is set
fn report_progress(callback: Option<&js_sys::Function>, completed: usize, total: usize, message: &str) {
    if let Some(callback) = callback {
        let _ = callback.call3(
            &JsValue::NULL,
            &JsValue::from(completed as u32),
            &JsValue::from(total as u32),
            &JsValue::from_str(message),
        );
    }
}

pub(crate) fn to_js(error: PdfToolsError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

pub(crate) fn to_js_value<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
