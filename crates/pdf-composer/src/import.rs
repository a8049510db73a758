use crate::copier::ObjectCopier;
use crate::error::ComposerError;
use crate::template::{A4_HEIGHT_PT, A4_WIDTH_PT};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

// Page tree depth limit when resolving inherited attributes.
const MAX_INHERIT_DEPTH: usize = 32;

/// A source page copied into a target document as a Form XObject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportedPage {
    pub id: ObjectId,
    /// `[x0, y0, x1, y1]` of the source page box, in the form's space.
    pub bbox: [f32; 4],
}

impl ImportedPage {
    pub fn width(&self) -> f32 {
        self.bbox[2] - self.bbox[0]
    }

    pub fn height(&self) -> f32 {
        self.bbox[3] - self.bbox[1]
    }
}

/// Imports pages of one source document into a target document. Objects
/// shared between source pages, and pages imported more than once, are
/// only copied once.
#[derive(Debug)]
pub struct PageImporter {
    source: Document,
    id_map: HashMap<ObjectId, ObjectId>,
    imported: HashMap<usize, ImportedPage>,
}

impl PageImporter {
    pub fn new(source: Document) -> Self {
        Self {
            source,
            id_map: HashMap::new(),
            imported: HashMap::new(),
        }
    }

    pub fn from_bytes(pdf: &[u8]) -> Result<Self, ComposerError> {
        Ok(Self::new(Document::load_mem(pdf)?))
    }

    pub fn page_count(&self) -> usize {
        self.source.get_pages().len()
    }

    /// Copies 0-indexed page `page_index` into `target`, returning the form.
    pub fn import_page(
        &mut self,
        target: &mut Document,
        page_index: usize,
    ) -> Result<ImportedPage, ComposerError> {
        if let Some(page) = self.imported.get(&page_index) {
            return Ok(*page);
        }

        let pages = self.source.get_pages();
        let page_id = u32::try_from(page_index + 1)
            .ok()
            .and_then(|n| pages.get(&n).copied())
            .ok_or(ComposerError::PageOutOfRange {
                page: page_index,
                count: pages.len(),
            })?;

        let content = self.source.get_page_content(page_id)?;
        let bbox = self.page_box(page_id);
        let resources = inherited(&self.source, page_id, b"Resources").cloned();

        let mut copier = ObjectCopier::new(&self.source, target, &mut self.id_map);
        let mut form = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => bbox.iter().map(|&v| Object::Real(v)).collect::<Vec<_>>(),
        };
        if let Some(resources) = resources {
            form.set("Resources", copier.remap_references(resources)?);
        }

        let mut stream = Stream::new(form, content);
        // uncompressed streams stay valid if compression fails
        if let Err(e) = stream.compress() {
            log::debug!("could not compress imported page {}: {}", page_index, e);
        }
        let id = target.add_object(stream);

        let page = ImportedPage { id, bbox };
        self.imported.insert(page_index, page);
        log::debug!("imported background page {} as form {:?}", page_index, id);
        Ok(page)
    }

    /// The crop box if present, else the media box, else A4.
    fn page_box(&self, page_id: ObjectId) -> [f32; 4] {
        [b"CropBox".as_slice(), b"MediaBox".as_slice()]
            .into_iter()
            .find_map(|key| inherited(&self.source, page_id, key).and_then(|o| rect(&self.source, o)))
            .unwrap_or_else(|| {
                log::warn!("background page has no usable MediaBox, assuming A4");
                [0.0, 0.0, A4_WIDTH_PT, A4_HEIGHT_PT]
            })
    }
}

/// Looks up a page attribute, following the page tree for inherited values.
fn inherited<'d>(doc: &'d Document, page_id: ObjectId, key: &[u8]) -> Option<&'d Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn rect(doc: &Document, obj: &Object) -> Option<[f32; 4]> {
    let obj = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let values = obj.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let mut out = [0.0; 4];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value.as_float().ok()?;
    }
    Some(out)
}
