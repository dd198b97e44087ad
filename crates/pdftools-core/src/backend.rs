//! PDF document collaborator
//!
//! Merge and split are written against [`PdfBackend`] so the page ordering
//! logic does not depend on a particular PDF library. [`LopdfBackend`] is
//! the production implementation.

use crate::error::PdfToolsError;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Operations the page-copy algorithms need from a PDF library.
pub trait PdfBackend {
    /// A parsed (source) or under-construction (output) document
    type Document;
    /// A page that has been copied into an output document but not yet placed
    type Page;

    fn load(&self, bytes: &[u8]) -> Result<Self::Document, PdfToolsError>;

    fn page_count(&self, doc: &Self::Document) -> u32;

    /// Create an empty output document
    fn create(&self) -> Result<Self::Document, PdfToolsError>;

    /// Copy the pages at `indices` (0-based) of `src` into `dest`.
    /// The copies are returned in the order of `indices` and must be placed
    /// with [`PdfBackend::add_page`].
    fn copy_pages(
        &self,
        dest: &mut Self::Document,
        src: &Self::Document,
        indices: &[u32],
    ) -> Result<Vec<Self::Page>, PdfToolsError>;

    /// Append a copied page to the end of `dest`
    fn add_page(&self, dest: &mut Self::Document, page: Self::Page) -> Result<(), PdfToolsError>;

    fn save(&self, doc: Self::Document) -> Result<Vec<u8>, PdfToolsError>;
}

/// Page attributes a page may inherit from its ancestors in the page tree.
/// They are copied onto the page itself before it is re-parented.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic `/Parent` chains in damaged files
const MAX_TREE_DEPTH: usize = 64;

/// [`PdfBackend`] backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Document = Document;
    type Page = ObjectId;

    fn load(&self, bytes: &[u8]) -> Result<Document, PdfToolsError> {
        let doc =
            Document::load_mem(bytes).map_err(|e| PdfToolsError::DecodeFailure(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(PdfToolsError::DecodeFailure(
                "Document is encrypted".to_string(),
            ));
        }
        Ok(doc)
    }

    fn page_count(&self, doc: &Document) -> u32 {
        doc.get_pages().len() as u32
    }

    fn create(&self) -> Result<Document, PdfToolsError> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(0)),
            ("Kids", Object::Array(Vec::new())),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        Ok(doc)
    }

    fn copy_pages(
        &self,
        dest: &mut Document,
        src: &Document,
        indices: &[u32],
    ) -> Result<Vec<ObjectId>, PdfToolsError> {
        let source_pages = src.get_pages();
        let page_ids = indices
            .iter()
            .map(|&index| {
                source_pages.get(&(index + 1)).copied().ok_or_else(|| {
                    PdfToolsError::InvalidRange(format!(
                        "Page {} does not exist (document has {} pages)",
                        index + 1,
                        source_pages.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Import every source object under shifted IDs; objects the copied
        // pages do not reach are pruned when the output is saved.
        let id_offset = dest.max_id;
        for (old_id, object) in src.objects.iter() {
            let new_id = (old_id.0 + id_offset, old_id.1);
            dest.objects
                .insert(new_id, remap_object_refs(object.clone(), id_offset));
        }
        dest.max_id = dest.max_id.max(src.max_id + id_offset);

        let mut copied = Vec::with_capacity(page_ids.len());
        for page_id in page_ids {
            let new_id = (page_id.0 + id_offset, page_id.1);
            let inherited = inherited_attributes(src, page_id);
            if let Ok(Object::Dictionary(page)) = dest.get_object_mut(new_id) {
                for (key, value) in inherited {
                    page.set(key, remap_object_refs(value, id_offset));
                }
            }
            copied.push(new_id);
        }

        Ok(copied)
    }

    fn add_page(&self, dest: &mut Document, page: ObjectId) -> Result<(), PdfToolsError> {
        let pages_id = page_tree_root(dest)?;

        match dest.get_object_mut(page) {
            Ok(Object::Dictionary(page_dict)) => {
                page_dict.set("Parent", Object::Reference(pages_id));
            }
            _ => {
                return Err(PdfToolsError::OperationError(
                    "Copied page is not a dictionary".into(),
                ))
            }
        }

        if let Ok(Object::Dictionary(pages_dict)) = dest.get_object_mut(pages_id) {
            if !matches!(pages_dict.get(b"Kids"), Ok(Object::Array(_))) {
                pages_dict.set("Kids", Object::Array(Vec::new()));
            }
            let count = match pages_dict.get_mut(b"Kids") {
                Ok(Object::Array(kids)) => {
                    kids.push(Object::Reference(page));
                    kids.len()
                }
                _ => 0,
            };
            pages_dict.set("Count", Object::Integer(count as i64));
            Ok(())
        } else {
            Err(PdfToolsError::OperationError(
                "Invalid pages dictionary".into(),
            ))
        }
    }

    fn save(&self, mut doc: Document) -> Result<Vec<u8>, PdfToolsError> {
        doc.prune_objects();
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfToolsError::OperationError(format!("Save failed: {}", e)))?;
        Ok(buffer)
    }
}

/// Recursively shift object references by `offset`
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Collect inheritable attributes the page does not define itself,
/// nearest ancestor first.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();

    let page = match doc.get_object(page_id).and_then(Object::as_dict) {
        Ok(page) => page,
        Err(_) => return found,
    };

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }
        let node = match doc.get_object(parent_id).and_then(Object::as_dict) {
            Ok(node) => node,
            Err(_) => break,
        };
        for key in INHERITABLE_KEYS {
            if page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    found
}

/// Object ID of the root `/Pages` node
fn page_tree_root(doc: &Document) -> Result<ObjectId, PdfToolsError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfToolsError::OperationError("No Root in trailer".into()))?;

    doc.get_object(catalog_id)
        .and_then(Object::as_dict)
        .map_err(|_| PdfToolsError::OperationError("Catalog not found".into()))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| PdfToolsError::OperationError("No Pages in catalog".into()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::{content::Content, content::Operation, Stream};

    /// Create a PDF whose pages carry the text "<label>-Page-<n>"
    pub(crate) fn create_test_pdf(num_pages: u32, label: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();

        for i in 0..num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                    ),
                    Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("{}-Page-{}", label, i + 1).into_bytes(),
                            lopdf::StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

            // MediaBox lives on the Pages node so copies must inherit it
            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                ("Contents", Object::Reference(content_id)),
            ]);
            let page_id = doc.add_object(page);
            page_ids.push(page_id);
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    /// Text labels of every page, in page order
    pub(crate) fn page_labels(bytes: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let content = doc.get_page_content(page_id).unwrap();
                let text = String::from_utf8_lossy(&content).into_owned();
                let start = text.find('(').unwrap() + 1;
                let end = text[start..].find(')').unwrap() + start;
                text[start..end].to_string()
            })
            .collect()
    }

    #[test]
    fn test_create_is_empty_document() {
        let backend = LopdfBackend;
        let doc = backend.create().unwrap();
        assert_eq!(backend.page_count(&doc), 0);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let result = LopdfBackend.load(b"not a valid pdf");
        assert!(matches!(result, Err(PdfToolsError::DecodeFailure(_))));
    }

    #[test]
    fn test_copy_selected_pages_in_requested_order() {
        let backend = LopdfBackend;
        let src = backend.load(&create_test_pdf(4, "Src")).unwrap();
        let mut dest = backend.create().unwrap();

        let pages = backend.copy_pages(&mut dest, &src, &[3, 0]).unwrap();
        for page in pages {
            backend.add_page(&mut dest, page).unwrap();
        }
        let bytes = backend.save(dest).unwrap();

        assert_eq!(page_labels(&bytes), vec!["Src-Page-4", "Src-Page-1"]);
    }

    #[test]
    fn test_copy_rejects_missing_page() {
        let backend = LopdfBackend;
        let src = backend.load(&create_test_pdf(2, "Src")).unwrap();
        let mut dest = backend.create().unwrap();
        assert!(backend.copy_pages(&mut dest, &src, &[2]).is_err());
    }

    #[test]
    fn test_copied_pages_keep_inherited_media_box() {
        let backend = LopdfBackend;
        let src = backend.load(&create_test_pdf(1, "Src")).unwrap();
        let mut dest = backend.create().unwrap();

        let pages = backend.copy_pages(&mut dest, &src, &[0]).unwrap();
        let page_id = pages[0];
        backend.add_page(&mut dest, page_id).unwrap();

        let page = dest.get_object(page_id).unwrap().as_dict().unwrap();
        assert!(page.has(b"MediaBox"));
    }

    #[test]
    fn test_remap_object_refs_shifts_nested_references() {
        let obj = Object::Array(vec![
            Object::Reference((1, 0)),
            Object::Dictionary(Dictionary::from_iter(vec![(
                "Ref",
                Object::Reference((5, 0)),
            )])),
        ]);
        let remapped = remap_object_refs(obj, 10);
        let arr = remapped.as_array().unwrap();
        assert!(matches!(arr[0], Object::Reference((11, 0))));
        let dict = arr[1].as_dict().unwrap();
        assert!(matches!(dict.get(b"Ref").unwrap(), Object::Reference((15, 0))));
    }
}
