//! A `DrawingSurface` that records every call, for asserting on the
//! operation sequence a render produces.

use rmpdf_render_core::{BackgroundId, DrawingSurface, LayerId, RenderError};
use rmpdf_types::{Color, Rect, Size};
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    AddPage(Size),
    RegisterLayer(String),
    BeginLayer(LayerId),
    EndLayer,
    LoadBackground(usize),
    ImportBackground {
        background: BackgroundId,
        page_index: usize,
        target: Rect,
    },
    DrawColor(Color),
    LineWidth(f32),
    Alpha(f32),
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Stroke,
    Finish,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    layers: Vec<String>,
    background_pages: Vec<usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(String::as_str).collect()
    }

    pub fn count(&self, predicate: impl Fn(&SurfaceOp) -> bool) -> usize {
        self.ops.iter().filter(|op| predicate(op)).count()
    }

    pub fn strokes(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Stroke))
    }

    pub fn pages(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::AddPage(_)))
    }
}

impl DrawingSurface for RecordingSurface {
    fn add_page(&mut self, size: Size) -> Result<(), RenderError> {
        self.ops.push(SurfaceOp::AddPage(size));
        Ok(())
    }

    fn register_layer(&mut self, name: &str) -> Result<LayerId, RenderError> {
        self.layers.push(name.to_string());
        self.ops.push(SurfaceOp::RegisterLayer(name.to_string()));
        Ok(LayerId(self.layers.len() - 1))
    }

    fn begin_layer(&mut self, layer: LayerId) -> Result<(), RenderError> {
        if layer.0 >= self.layers.len() {
            return Err(RenderError::UnknownLayer(layer.0));
        }
        self.ops.push(SurfaceOp::BeginLayer(layer));
        Ok(())
    }

    fn end_layer(&mut self) -> Result<(), RenderError> {
        self.ops.push(SurfaceOp::EndLayer);
        Ok(())
    }

    /// Each background counts as one page.
    fn load_background(&mut self, pdf: &[u8]) -> Result<BackgroundId, RenderError> {
        self.background_pages.push(1);
        self.ops.push(SurfaceOp::LoadBackground(pdf.len()));
        Ok(BackgroundId(self.background_pages.len() - 1))
    }

    fn background_page_count(&self, background: BackgroundId) -> Result<usize, RenderError> {
        self.background_pages
            .get(background.0)
            .copied()
            .ok_or(RenderError::UnknownBackground(background.0))
    }

    fn import_background(
        &mut self,
        background: BackgroundId,
        page_index: usize,
        target: Rect,
    ) -> Result<(), RenderError> {
        self.ops.push(SurfaceOp::ImportBackground {
            background,
            page_index,
            target,
        });
        Ok(())
    }

    fn set_draw_color(&mut self, color: Color) -> Result<(), RenderError> {
        self.ops.push(SurfaceOp::DrawColor(color));
        Ok(())
    }

    fn set_line_width(&mut self, width: f32) -> Result<(), RenderError> {
        self.ops.push(SurfaceOp::LineWidth(width));
        Ok(())
    }

    fn set_alpha(&mut self, alpha: f32) -> Result<(), RenderError> {
        self.ops.push(SurfaceOp::Alpha(alpha));
        Ok(())
    }

    fn move_to(&mut self, x: f32, y: f32) -> Result<(), RenderError> {
        self.ops.push(SurfaceOp::MoveTo(x, y));
        Ok(())
    }

    fn line_to(&mut self, x: f32, y: f32) -> Result<(), RenderError> {
        self.ops.push(SurfaceOp::LineTo(x, y));
        Ok(())
    }

    fn stroke_path(&mut self) -> Result<(), RenderError> {
        self.ops.push(SurfaceOp::Stroke);
        Ok(())
    }

    fn finish(&mut self, _writer: &mut dyn Write) -> Result<(), RenderError> {
        self.ops.push(SurfaceOp::Finish);
        Ok(())
    }
}
