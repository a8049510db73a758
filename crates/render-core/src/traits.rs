use crate::error::RenderError;
use crate::types::{BackgroundId, LayerId};
use rmpdf_types::{Color, Rect, Size};
use std::io::Write;

/// The drawing primitives stroke rendering needs from an output backend.
///
/// Coordinates are in points with the origin at the top-left corner of the
/// current page; backends with a bottom-left origin flip them. Drawing state
/// (colour, width, alpha) persists until changed.
pub trait DrawingSurface {
    /// Starts a new page; later operations target it.
    fn add_page(&mut self, size: Size) -> Result<(), RenderError>;

    /// Creates a named layer. Every call creates a distinct layer, callers
    /// keep their own name registry.
    fn register_layer(&mut self, name: &str) -> Result<LayerId, RenderError>;

    /// Opens `layer` on the current page.
    fn begin_layer(&mut self, layer: LayerId) -> Result<(), RenderError>;

    /// Closes the most recently opened layer.
    fn end_layer(&mut self) -> Result<(), RenderError>;

    /// Loads a background document for later import.
    fn load_background(&mut self, pdf: &[u8]) -> Result<BackgroundId, RenderError>;

    /// Number of pages in a loaded background document.
    fn background_page_count(&self, background: BackgroundId) -> Result<usize, RenderError>;

    /// Draws 0-indexed page `page_index` of `background` scaled into
    /// `target` on the current page.
    fn import_background(
        &mut self,
        background: BackgroundId,
        page_index: usize,
        target: Rect,
    ) -> Result<(), RenderError>;

    fn set_draw_color(&mut self, color: Color) -> Result<(), RenderError>;

    fn set_line_width(&mut self, width: f32) -> Result<(), RenderError>;

    /// Sets stroke and fill opacity, 1.0 being opaque.
    fn set_alpha(&mut self, alpha: f32) -> Result<(), RenderError>;

    fn move_to(&mut self, x: f32, y: f32) -> Result<(), RenderError>;

    fn line_to(&mut self, x: f32, y: f32) -> Result<(), RenderError>;

    /// Strokes the current path outline; never fills.
    fn stroke_path(&mut self) -> Result<(), RenderError>;

    /// Serialises the finished document.
    fn finish(&mut self, writer: &mut dyn Write) -> Result<(), RenderError>;
}
