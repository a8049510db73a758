use crate::context::RenderContext;
use crate::geometry::PageGeometry;
use rmpdf_lines::{Stroke, StrokeDocument};
use rmpdf_render_core::{BackgroundId, DrawingSurface, RenderError};
use rmpdf_style::{PenKind, PenStyle, WeightBucket};
use std::collections::HashMap;

/// Name of the layer holding the background page.
pub const BACKGROUND_LAYER: &str = "Background";

/// Everything needed to draw one output page.
#[derive(Debug, Clone, Copy)]
pub struct PageJob<'a> {
    /// `None` for pages without a stroke file.
    pub strokes: Option<&'a StrokeDocument>,
    /// Layer names by 0-indexed layer position.
    pub layer_names: &'a [String],
    pub background: BackgroundId,
    /// 0-indexed page of `background` to draw.
    pub background_page: usize,
    pub geometry: PageGeometry,
}

/// What was drawn on one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    pub layers: usize,
    pub strokes_drawn: usize,
    pub erasers_skipped: usize,
    pub empty_strokes: usize,
}

type StyleCache = HashMap<(usize, PenKind, WeightBucket), PenStyle>;

/// The display name of a 1-indexed layer.
pub fn layer_name(names: &[String], layer_number: usize) -> String {
    layer_number
        .checked_sub(1)
        .and_then(|i| names.get(i))
        .filter(|name| !name.is_empty())
        .cloned()
        .unwrap_or_else(|| format!("Layer {}", layer_number))
}

/// Draws a page: the background in its own layer, then each stroke layer in
/// file order.
pub fn render_page<S: DrawingSurface + ?Sized>(
    ctx: &mut RenderContext,
    surface: &mut S,
    job: &PageJob<'_>,
) -> Result<PageStats, RenderError> {
    surface.add_page(job.geometry.page_size())?;

    let background_layer = ctx.layer_id(surface, BACKGROUND_LAYER)?;
    surface.begin_layer(background_layer)?;
    surface.import_background(
        job.background,
        job.background_page,
        job.geometry.background_rect(),
    )?;
    surface.end_layer()?;

    let mut stats = PageStats::default();
    let Some(doc) = job.strokes else {
        return Ok(stats);
    };

    let max = doc.max_coordinates();
    log::debug!("maximum tablet coordinates x {:.1} y {:.1}", max.x, max.y);

    let mut styles = StyleCache::new();
    for (layer_number, layer) in doc.numbered_layers() {
        let name = layer_name(job.layer_names, layer_number);
        let layer_id = ctx.layer_id(surface, &name)?;
        surface.begin_layer(layer_id)?;
        log::debug!(
            "layer {} '{}' with {} strokes",
            layer_number,
            name,
            layer.strokes.len()
        );

        for stroke in &layer.strokes {
            draw_stroke(ctx, surface, &mut styles, layer_number, stroke, job.geometry, &mut stats)?;
        }

        surface.end_layer()?;
        stats.layers += 1;
    }
    Ok(stats)
}

fn draw_stroke<S: DrawingSurface + ?Sized>(
    ctx: &mut RenderContext,
    surface: &mut S,
    styles: &mut StyleCache,
    layer_number: usize,
    stroke: &Stroke,
    geometry: PageGeometry,
    stats: &mut PageStats,
) -> Result<(), RenderError> {
    let kind = ctx.pen_kind(stroke.pen_code);
    if kind.is_eraser() {
        stats.erasers_skipped += 1;
        return Ok(());
    }
    if stroke.points.is_empty() {
        log::debug!("skipping {} stroke without points on layer {}", kind, layer_number);
        stats.empty_strokes += 1;
        return Ok(());
    }

    let weight = WeightBucket::classify(stroke.base_width);
    let style = *styles
        .entry((layer_number, kind, weight))
        .or_insert_with(|| resolve_style(ctx, layer_number, kind, weight));

    surface.set_draw_color(style.color)?;
    surface.set_line_width(style.width)?;
    let translucent = style.opacity != 1.0;
    if translucent {
        surface.set_alpha(style.opacity)?;
    }

    for (i, point) in stroke.points.iter().enumerate() {
        let (x, y) = geometry.to_page(point.x, point.y);
        if i == 0 {
            surface.move_to(x, y)?;
        } else {
            surface.line_to(x, y)?;
        }
    }
    surface.stroke_path()?;

    if translucent {
        surface.set_alpha(1.0)?;
    }
    stats.strokes_drawn += 1;
    Ok(())
}

fn resolve_style(ctx: &RenderContext, layer_number: usize, kind: PenKind, weight: WeightBucket) -> PenStyle {
    let custom = ctx.overrides().lookup(layer_number, kind, weight);
    if let Some(pen) = &custom {
        log::debug!(
            "layer {} {} {} uses configured width {} opacity {}",
            layer_number,
            kind,
            weight,
            pen.width,
            pen.opacity
        );
    }
    PenStyle::resolve(kind, weight, custom.as_ref(), ctx.layer_color(layer_number))
}
