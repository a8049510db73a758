use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use rmpdf_pdf_composer::{ComposerError, PageImporter};
use rmpdf_render_core::utils::flip_y;
use rmpdf_render_core::{BackgroundId, DrawingSurface, LayerId, RenderError};
use rmpdf_types::{Color, Rect, Size};
use std::collections::HashMap;
use std::io::Write;

struct PageState {
    size: Size,
    content: Content,
    open_layers: usize,
}

/// An in-memory PDF surface. Every page shares one resources dictionary
/// holding the background forms, alpha graphics states and layer
/// properties.
pub struct LopdfSurface {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    resources_id: ObjectId,
    current: Option<PageState>,
    layers: Vec<ObjectId>,
    backgrounds: Vec<PageImporter>,
    xobjects: Dictionary,
    form_names: HashMap<ObjectId, String>,
    ext_gstates: Dictionary,
    alpha_names: HashMap<u32, String>,
    compress: bool,
    finished: bool,
}

impl Default for LopdfSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfSurface {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();
        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
            resources_id,
            current: None,
            layers: Vec::new(),
            backgrounds: Vec::new(),
            xobjects: Dictionary::new(),
            form_names: HashMap::new(),
            ext_gstates: Dictionary::new(),
            alpha_names: HashMap::new(),
            compress: true,
            finished: false,
        }
    }

    /// Content streams are Flate-compressed unless disabled.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Pages added so far, including the one being drawn.
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + usize::from(self.current.is_some())
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Finishes the document into a byte vector.
    pub fn finish_to_vec(&mut self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.finish(&mut bytes)?;
        Ok(bytes)
    }

    fn page(&mut self) -> Result<&mut PageState, RenderError> {
        self.current.as_mut().ok_or(RenderError::NoPage)
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) -> Result<(), RenderError> {
        self.page()?.content.operations.push(Operation::new(operator, operands));
        Ok(())
    }

    fn flush_page(&mut self) -> Result<(), RenderError> {
        let Some(mut page) = self.current.take() else {
            return Ok(());
        };
        if page.open_layers > 0 {
            log::debug!("closing {} layer(s) left open at end of page", page.open_layers);
            for _ in 0..page.open_layers {
                page.content.operations.push(Operation::new("EMC", vec![]));
            }
        }

        let mut stream = Stream::new(dictionary! {}, page.content.encode()?);
        if self.compress {
            stream.compress()?;
        }
        let content_id = self.document.add_object(stream);

        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page.size.width.into(), page.size.height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        };
        let page_id = self.document.add_object(page_dict);
        self.page_ids.push(page_id);
        Ok(())
    }

    fn layer_name(index: usize) -> String {
        format!("OC{}", index)
    }

    fn alpha_state(&mut self, alpha: f32) -> String {
        // quantised so near-identical opacities share a graphics state
        let key = (alpha.clamp(0.0, 1.0) * 1000.0).round() as u32;
        if let Some(name) = self.alpha_names.get(&key) {
            return name.clone();
        }
        let value = key as f32 / 1000.0;
        let gs_id = self.document.add_object(dictionary! {
            "Type" => "ExtGState",
            "CA" => value,
            "ca" => value,
        });
        let name = format!("GS{}", self.alpha_names.len());
        self.ext_gstates.set(name.as_bytes(), gs_id);
        self.alpha_names.insert(key, name.clone());
        name
    }
}

fn composer_error(err: ComposerError) -> RenderError {
    match err {
        ComposerError::PageOutOfRange { page, count } => RenderError::PageOutOfRange { page, count },
        other => RenderError::Pdf(other.to_string()),
    }
}

impl DrawingSurface for LopdfSurface {
    fn add_page(&mut self, size: Size) -> Result<(), RenderError> {
        self.flush_page()?;
        self.current = Some(PageState {
            size,
            content: Content {
                operations: vec![
                    Operation::new("J", vec![1.into()]),
                    Operation::new("j", vec![1.into()]),
                ],
            },
            open_layers: 0,
        });
        Ok(())
    }

    fn register_layer(&mut self, name: &str) -> Result<LayerId, RenderError> {
        let ocg_id = self.document.add_object(dictionary! {
            "Type" => "OCG",
            "Name" => Object::string_literal(name),
        });
        self.layers.push(ocg_id);
        log::debug!("registered layer '{}'", name);
        Ok(LayerId(self.layers.len() - 1))
    }

    fn begin_layer(&mut self, layer: LayerId) -> Result<(), RenderError> {
        if layer.0 >= self.layers.len() {
            return Err(RenderError::UnknownLayer(layer.0));
        }
        let name = Self::layer_name(layer.0);
        self.push("BDC", vec![Object::Name(b"OC".to_vec()), Object::Name(name.into_bytes())])?;
        self.page()?.open_layers += 1;
        Ok(())
    }

    fn end_layer(&mut self) -> Result<(), RenderError> {
        let page = self.page()?;
        if page.open_layers == 0 {
            return Err(RenderError::Other("end_layer without an open layer".into()));
        }
        page.open_layers -= 1;
        self.push("EMC", vec![])
    }

    fn load_background(&mut self, pdf: &[u8]) -> Result<BackgroundId, RenderError> {
        let importer = PageImporter::from_bytes(pdf).map_err(composer_error)?;
        log::debug!("loaded background with {} page(s)", importer.page_count());
        self.backgrounds.push(importer);
        Ok(BackgroundId(self.backgrounds.len() - 1))
    }

    fn background_page_count(&self, background: BackgroundId) -> Result<usize, RenderError> {
        self.backgrounds
            .get(background.0)
            .map(PageImporter::page_count)
            .ok_or(RenderError::UnknownBackground(background.0))
    }

    fn import_background(
        &mut self,
        background: BackgroundId,
        page_index: usize,
        target: Rect,
    ) -> Result<(), RenderError> {
        let page_height = self.page()?.size.height;
        let importer = self
            .backgrounds
            .get_mut(background.0)
            .ok_or(RenderError::UnknownBackground(background.0))?;
        let form = importer
            .import_page(&mut self.document, page_index)
            .map_err(composer_error)?;

        let next_name = format!("Bg{}", self.form_names.len());
        let name = self.form_names.entry(form.id).or_insert(next_name).clone();
        self.xobjects.set(name.as_bytes(), form.id);

        let (form_width, form_height) = (form.width(), form.height());
        if form_width <= 0.0 || form_height <= 0.0 {
            return Err(RenderError::Pdf(format!(
                "background page {} has an empty page box",
                page_index
            )));
        }
        let sx = target.width / form_width;
        let sy = target.height / form_height;
        let tx = target.x - form.bbox[0] * sx;
        let ty = flip_y(target.y + target.height, page_height) - form.bbox[1] * sy;

        self.push("q", vec![])?;
        self.push("cm", vec![sx.into(), 0.into(), 0.into(), sy.into(), tx.into(), ty.into()])?;
        self.push("Do", vec![Object::Name(name.into_bytes())])?;
        self.push("Q", vec![])
    }

    fn set_draw_color(&mut self, color: Color) -> Result<(), RenderError> {
        let [r, g, b] = color.to_unit_rgb();
        self.push("RG", vec![r.into(), g.into(), b.into()])
    }

    fn set_line_width(&mut self, width: f32) -> Result<(), RenderError> {
        self.push("w", vec![width.into()])
    }

    fn set_alpha(&mut self, alpha: f32) -> Result<(), RenderError> {
        self.page()?;
        let name = self.alpha_state(alpha);
        self.push("gs", vec![Object::Name(name.into_bytes())])
    }

    fn move_to(&mut self, x: f32, y: f32) -> Result<(), RenderError> {
        let y = flip_y(y, self.page()?.size.height);
        self.push("m", vec![x.into(), y.into()])
    }

    fn line_to(&mut self, x: f32, y: f32) -> Result<(), RenderError> {
        let y = flip_y(y, self.page()?.size.height);
        self.push("l", vec![x.into(), y.into()])
    }

    fn stroke_path(&mut self) -> Result<(), RenderError> {
        self.push("S", vec![])
    }

    fn finish(&mut self, writer: &mut dyn Write) -> Result<(), RenderError> {
        if self.finished {
            return Err(RenderError::Other("surface already finished".into()));
        }
        self.flush_page()?;

        let mut properties = Dictionary::new();
        for (i, id) in self.layers.iter().enumerate() {
            properties.set(Self::layer_name(i).into_bytes(), Object::Reference(*id));
        }
        let resources = dictionary! {
            "XObject" => std::mem::replace(&mut self.xobjects, Dictionary::new()),
            "ExtGState" => std::mem::replace(&mut self.ext_gstates, Dictionary::new()),
            "Properties" => properties,
        };
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        if !self.layers.is_empty() {
            let ocgs: Vec<Object> = self.layers.iter().map(|id| Object::from(*id)).collect();
            catalog.set(
                "OCProperties",
                dictionary! {
                    "OCGs" => ocgs.clone(),
                    "D" => dictionary! {
                        "Order" => ocgs.clone(),
                        "ON" => ocgs,
                    },
                },
            );
        }
        let catalog_id = self.document.add_object(catalog);
        self.document.trailer.set("Root", catalog_id);

        let mut writer = writer;
        self.document.save_to(&mut writer)?;
        self.finished = true;
        log::debug!(
            "wrote {} page(s) with {} layer(s)",
            self.page_ids.len(),
            self.layers.len()
        );
        Ok(())
    }
}
