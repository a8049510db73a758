use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object};

/// Names of the optional content groups, in catalog order.
pub fn layer_names(doc: &LopdfDocument) -> Vec<String> {
    let Ok(catalog) = doc.catalog() else {
        return Vec::new();
    };
    let Ok(properties) = catalog.get(b"OCProperties").and_then(Object::as_dict) else {
        return Vec::new();
    };
    let Ok(groups) = properties.get(b"OCGs").and_then(Object::as_array) else {
        return Vec::new();
    };
    groups
        .iter()
        .filter_map(|group| group.as_reference().ok())
        .filter_map(|id| doc.get_dictionary(id).ok())
        .filter_map(|dict| dict.get(b"Name").ok())
        .filter_map(|name| match name {
            Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        })
        .collect()
}

/// Operator names of a 1-indexed page's content stream.
pub fn page_operators(doc: &LopdfDocument, page_number: u32) -> Vec<String> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page_number) else {
        return Vec::new();
    };
    let Ok(bytes) = doc.get_page_content(*page_id) else {
        return Vec::new();
    };
    Content::decode(&bytes)
        .map(|content| content.operations.into_iter().map(|op| op.operator).collect())
        .unwrap_or_default()
}

/// Number of stroked paths on a page.
pub fn stroke_count(doc: &LopdfDocument, page_number: u32) -> usize {
    page_operators(doc, page_number)
        .iter()
        .filter(|op| op.as_str() == "S")
        .count()
}

/// `[width, height]` of a 1-indexed page's media box.
pub fn media_box_size(doc: &LopdfDocument, page_number: u32) -> Option<(f32, f32)> {
    let page_id = *doc.get_pages().get(&page_number)?;
    let page = doc.get_dictionary(page_id).ok()?;
    let values: Vec<f32> = page
        .get(b"MediaBox")
        .ok()?
        .as_array()
        .ok()?
        .iter()
        .filter_map(|v| v.as_float().ok())
        .collect();
    match values.as_slice() {
        [x0, y0, x1, y1] => Some((x1 - x0, y1 - y0)),
        _ => None,
    }
}

/// Numeric operands of every `operator` on a page, in order.
pub fn operands_of(doc: &LopdfDocument, page_number: u32, operator: &str) -> Vec<Vec<f32>> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page_number) else {
        return Vec::new();
    };
    let Ok(bytes) = doc.get_page_content(*page_id) else {
        return Vec::new();
    };
    let Ok(content) = Content::decode(&bytes) else {
        return Vec::new();
    };
    content
        .operations
        .into_iter()
        .filter(|op| op.operator == operator)
        .map(|op| op.operands.iter().filter_map(|o| o.as_float().ok()).collect())
        .collect()
}

/// Names of the XObjects painted on a page, in order.
pub fn painted_forms(doc: &LopdfDocument, page_number: u32) -> Vec<String> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page_number) else {
        return Vec::new();
    };
    let Ok(bytes) = doc.get_page_content(*page_id) else {
        return Vec::new();
    };
    let Ok(content) = Content::decode(&bytes) else {
        return Vec::new();
    };
    content
        .operations
        .into_iter()
        .filter(|op| op.operator == "Do")
        .filter_map(|op| op.operands.first().and_then(|o| o.as_name().ok()).map(|n| String::from_utf8_lossy(n).into_owned()))
        .collect()
}
