//! The conversion driver: plans the pages of a bundle, decodes each stroke
//! file and draws it over its background.

use crate::error::ConvertError;
use crate::options::{ConvertOptions, FormatErrorPolicy};
use rmpdf_bundle::{format_page_list, Bundle, PagePlanEntry, RmPage};
use rmpdf_core::{render_page, PageGeometry, PageJob, RenderContext};
use rmpdf_lines::{decode, StrokeDocument};
use rmpdf_render_core::{BackgroundId, DrawingSurface, RenderError};
use rmpdf_render_lopdf::LopdfSurface;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// A summary of one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Output pages written.
    pub pages: usize,
    /// Pages whose stroke file was decoded and drawn.
    pub pages_drawn: usize,
    /// Pages drawn without strokes because their stroke file was unreadable.
    pub pages_skipped: usize,
    /// Stroke files that ended part way through.
    pub truncated_files: usize,
    /// 1-indexed positions of inserted pages.
    pub inserted_pages: Vec<usize>,
    /// Occurrences of each pen code that was not recognised.
    pub unknown_pens: BTreeMap<u32, usize>,
}

#[derive(Debug, Clone, Copy)]
struct Backgrounds {
    document: Option<BackgroundId>,
    template: Option<BackgroundId>,
}

impl Backgrounds {
    fn for_entry(&self, entry: &PagePlanEntry) -> Result<(BackgroundId, usize), ConvertError> {
        if entry.is_synthetic_background {
            return self.template.map(|t| (t, 0)).ok_or(ConvertError::MissingTemplate);
        }
        self.document
            .map(|d| (d, entry.background_index))
            .ok_or_else(|| RenderError::Other("bundle has no background document".into()).into())
    }
}

/// Draws every page of `bundle` onto `surface`. The surface is not
/// finished; the caller writes it out.
pub fn render_bundle<S: DrawingSurface + ?Sized>(
    bundle: &Bundle,
    options: &ConvertOptions,
    surface: &mut S,
) -> Result<ConversionReport, ConvertError> {
    let composer = bundle.composer()?;
    let mut report = ConversionReport::default();

    let inserted = composer.inserted_pages();
    if !inserted.is_empty() {
        log::info!("bundle has inserted page/s {}", format_page_list(&inserted));
    }
    report.inserted_pages = inserted.iter().map(|i| i + 1).collect();

    let backgrounds = load_backgrounds(bundle, options, composer.iter(), surface)?;
    let geometry = PageGeometry::new(bundle.orientation());
    let mut ctx = RenderContext::new()
        .with_overrides(options.overrides().clone())
        .with_layer_colors(options.layer_colors().to_vec());

    for entry in composer.iter() {
        let page = bundle.page(entry.output_index);
        let strokes = match page {
            Some(page) => load_strokes(bundle, page, options.format_policy(), &mut report)?,
            None => None,
        };
        let (background, background_page) = backgrounds.for_entry(&entry)?;
        log::debug!(
            "page {}: background page {}{}{}",
            entry.output_index + 1,
            background_page + 1,
            if entry.is_synthetic_background { " (template)" } else { "" },
            if strokes.is_some() { "" } else { ", no strokes" }
        );

        let job = PageJob {
            strokes: strokes.as_ref(),
            layer_names: page.map(|p| p.layer_names.as_slice()).unwrap_or(&[]),
            background,
            background_page,
            geometry,
        };
        let stats = render_page(&mut ctx, surface, &job)?;
        if strokes.is_some() {
            report.pages_drawn += 1;
        }
        log::debug!(
            "page {}: {} layer(s), {} stroke(s) drawn, {} eraser stroke(s) skipped",
            entry.output_index + 1,
            stats.layers,
            stats.strokes_drawn,
            stats.erasers_skipped
        );
        report.pages += 1;
    }

    ctx.report_unknown_pens();
    report.unknown_pens = ctx.unknown_pens().clone();
    Ok(report)
}

/// Converts `bundle` to a PDF written to `writer`.
pub fn convert<W: Write>(
    bundle: &Bundle,
    options: &ConvertOptions,
    mut writer: W,
) -> Result<ConversionReport, ConvertError> {
    let mut surface = LopdfSurface::new();
    let report = render_bundle(bundle, options, &mut surface)?;
    surface.finish(&mut writer)?;
    Ok(report)
}

/// Converts the bundle at `input` (`<dir>/<uuid>`, with or without an
/// extension) to a PDF file at `output`. Nothing is written unless the
/// whole conversion succeeds.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<ConversionReport, ConvertError> {
    let bundle = Bundle::from_path(input.as_ref())?;
    log::info!(
        "converting '{}' ({} page(s))",
        bundle.visible_name().unwrap_or(bundle.identifier()),
        bundle.page_count()
    );

    let mut pdf = Vec::new();
    let report = convert(&bundle, options, &mut pdf)?;
    fs::write(output.as_ref(), pdf)?;
    log::info!(
        "wrote {} page(s) to {}",
        report.pages,
        output.as_ref().display()
    );
    Ok(report)
}

fn load_backgrounds<S: DrawingSurface + ?Sized>(
    bundle: &Bundle,
    options: &ConvertOptions,
    mut plan: impl Iterator<Item = PagePlanEntry>,
    surface: &mut S,
) -> Result<Backgrounds, ConvertError> {
    let document = match bundle.background()? {
        Some(pdf) => Some(surface.load_background(&pdf)?),
        None => None,
    };

    let template = if plan.any(|entry| entry.is_synthetic_background) {
        let pdf = options.template().ok_or(ConvertError::MissingTemplate)?;
        let id = surface.load_background(pdf)?;
        if surface.background_page_count(id)? == 0 {
            return Err(ConvertError::MissingTemplate);
        }
        Some(id)
    } else {
        None
    };

    Ok(Backgrounds { document, template })
}

fn load_strokes(
    bundle: &Bundle,
    page: &RmPage,
    policy: FormatErrorPolicy,
    report: &mut ConversionReport,
) -> Result<Option<StrokeDocument>, ConvertError> {
    let Some(bytes) = bundle.strokes(page)? else {
        return Ok(None);
    };
    match decode(bytes.as_slice()) {
        Ok(doc) => {
            if doc.is_truncated() {
                report.truncated_files += 1;
            }
            Ok(Some(doc))
        }
        Err(source) if policy == FormatErrorPolicy::SkipPage => {
            log::warn!(
                "skipping strokes on page {} ({}): {}",
                page.index + 1,
                page.identifier,
                source
            );
            report.pages_skipped += 1;
            Ok(None)
        }
        Err(source) => Err(ConvertError::Format {
            page: page.index + 1,
            source,
        }),
    }
}
