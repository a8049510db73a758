use byteorder::{LittleEndian, WriteBytesExt};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const BUNDLE_ID: &str = "5f2c9a61-1c7e-4a3b-9d2e-7e8f0a1b2c3d";

const HEADER: &str = "reMarkable .lines file, version=5         ";

/// One encoded stroke: pen code, raw width and tablet-space points.
#[derive(Debug, Clone)]
pub struct StrokeSpec {
    pub pen: u32,
    pub width: f32,
    pub points: Vec<(f32, f32)>,
}

impl StrokeSpec {
    pub fn new(pen: u32, width: f32, points: &[(f32, f32)]) -> Self {
        Self { pen, width, points: points.to_vec() }
    }

    /// A two-point standard-weight stroke.
    pub fn line(pen: u32) -> Self {
        Self::new(pen, 2.0, &[(100.0, 100.0), (400.0, 500.0)])
    }
}

/// Encodes a version 5 stroke file.
pub fn encode_lines(layers: &[Vec<StrokeSpec>]) -> Vec<u8> {
    let mut buf = HEADER.as_bytes().to_vec();
    buf.push(0);
    buf.write_u32::<LittleEndian>(layers.len() as u32).unwrap();
    for layer in layers {
        buf.write_u32::<LittleEndian>(layer.len() as u32).unwrap();
        for stroke in layer {
            buf.write_u32::<LittleEndian>(stroke.pen).unwrap();
            buf.write_u32::<LittleEndian>(0).unwrap();
            buf.write_u32::<LittleEndian>(0).unwrap();
            buf.write_f32::<LittleEndian>(stroke.width).unwrap();
            buf.write_u32::<LittleEndian>(0).unwrap();
            buf.write_u32::<LittleEndian>(stroke.points.len() as u32).unwrap();
            for &(x, y) in &stroke.points {
                for v in [x, y, 0.5, 0.0, 0.0, 0.0] {
                    buf.write_f32::<LittleEndian>(v).unwrap();
                }
            }
        }
    }
    buf
}

/// A PDF with `pages` A4 pages, each carrying a marker rectangle.
pub fn background_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for i in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("re", vec![10.into(), 10.into(), (i as i64 + 1).into(), 5.into()]),
                Operation::new("f", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Builds a bundle directory under a temporary root.
pub struct BundleFixture {
    dir: TempDir,
    pages: Vec<String>,
    orientation: Option<String>,
    redirection: Vec<i32>,
    original_page_count: Option<usize>,
    visible_name: Option<String>,
}

impl BundleFixture {
    /// A bundle with `pages` pages named `page-0`, `page-1`, ...
    pub fn new(pages: usize) -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            pages: (0..pages).map(|i| format!("page-{}", i)).collect(),
            orientation: None,
            redirection: Vec::new(),
            original_page_count: None,
            visible_name: Some("Notebook".to_string()),
        }
    }

    pub fn landscape(mut self) -> Self {
        self.orientation = Some("landscape".to_string());
        self
    }

    pub fn redirection(mut self, map: &[i32], original_page_count: usize) -> Self {
        self.redirection = map.to_vec();
        self.original_page_count = Some(original_page_count);
        self
    }

    pub fn without_metadata(mut self) -> Self {
        self.visible_name = None;
        self
    }

    pub fn page_id(&self, index: usize) -> &str {
        &self.pages[index]
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// `<root>/<uuid>`, the path the converter is given.
    pub fn input(&self) -> PathBuf {
        self.root().join(BUNDLE_ID)
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    fn member(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Writes the `.content` and `.metadata` descriptors.
    pub fn write_descriptors(&self) -> &Self {
        let mut content = json!({
            "fileType": "pdf",
            "pages": self.pages,
            "pageCount": self.pages.len(),
        });
        if let Some(o) = &self.orientation {
            content["orientation"] = Value::from(o.as_str());
        }
        if !self.redirection.is_empty() {
            content["redirectionPageMap"] = json!(self.redirection);
        }
        if let Some(n) = self.original_page_count {
            content["originalPageCount"] = json!(n);
        }
        self.write_json(&format!("{}.content", BUNDLE_ID), &content);

        if let Some(name) = &self.visible_name {
            let metadata = json!({
                "visibleName": name,
                "type": "DocumentType",
                "version": 3,
                "lastModified": "1700000000000",
            });
            self.write_json(&format!("{}.metadata", BUNDLE_ID), &metadata);
        }
        self
    }

    pub fn write_background(&self, pages: usize) -> &Self {
        fs::write(self.member(&format!("{}.pdf", BUNDLE_ID)), background_pdf(pages)).unwrap();
        self
    }

    /// Writes the stroke file for page `index`, named by the page uuid.
    pub fn write_strokes(&self, index: usize, layers: &[Vec<StrokeSpec>]) -> &Self {
        self.write_raw_strokes(self.page_id(index), &encode_lines(layers))
    }

    /// Writes raw bytes as `<uuid>/<stem>.rm`.
    pub fn write_raw_strokes(&self, stem: &str, bytes: &[u8]) -> &Self {
        let dir = self.member(BUNDLE_ID);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.rm", stem)), bytes).unwrap();
        self
    }

    pub fn write_layer_names(&self, index: usize, names: &[&str]) -> &Self {
        let layers: Vec<Value> = names.iter().map(|n| json!({ "name": n })).collect();
        let path = format!("{}/{}-metadata.json", BUNDLE_ID, self.page_id(index));
        self.write_json(&path, &json!({ "layers": layers }));
        self
    }

    /// Packs the bundle members written so far into `<root>/bundle.zip`.
    pub fn zip(&self) -> PathBuf {
        let path = self.output("bundle.zip");
        let mut writer = ZipWriter::new(fs::File::create(&path).unwrap());
        let mut members = Vec::new();
        collect_members(self.root(), "", &mut members);
        members.sort();
        for member in members.iter().filter(|m| m.starts_with(BUNDLE_ID)) {
            writer.start_file(member.as_str(), SimpleFileOptions::default()).unwrap();
            writer.write_all(&fs::read(self.member(member)).unwrap()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    pub fn write_json(&self, name: &str, value: &Value) -> &Self {
        let path = self.member(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
        self
    }
}

fn collect_members(dir: &Path, prefix: &str, out: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let name = format!("{}{}", prefix, entry.file_name().to_string_lossy());
        if entry.file_type().unwrap().is_dir() {
            collect_members(&entry.path(), &format!("{}/", name), out);
        } else {
            out.push(name);
        }
    }
}
