#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use rmpdf::bundle::Bundle;
use rmpdf::{render_bundle, ConversionReport, ConvertError, ConvertOptions};
use rmpdf_render_lopdf::LopdfSurface;
use std::path::Path;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
    pub report: ConversionReport,
}

impl GeneratedPdf {
    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    pub fn layer_names(&self) -> Vec<String> {
        pdf_assertions::layer_names(&self.doc)
    }

    pub fn stroke_count(&self, page_number: u32) -> usize {
        pdf_assertions::stroke_count(&self.doc, page_number)
    }

    pub fn operators(&self, page_number: u32) -> Vec<String> {
        pdf_assertions::page_operators(&self.doc, page_number)
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Options with the built-in template.
pub fn default_options() -> ConvertOptions {
    ConvertOptions::new().with_builtin_template().unwrap()
}

/// Converts the fixture's bundle with uncompressed content streams so
/// operators can be inspected.
pub fn convert_fixture(
    fixture: &fixtures::BundleFixture,
    options: &ConvertOptions,
) -> Result<GeneratedPdf, ConvertError> {
    convert_input(fixture.input(), options)
}

/// Like [`convert_fixture`], for any bundle path (directory or zip).
pub fn convert_input<P: AsRef<Path>>(input: P, options: &ConvertOptions) -> Result<GeneratedPdf, ConvertError> {
    init_logger();
    let bundle = Bundle::from_path(input)?;
    let mut surface = LopdfSurface::new().with_compression(false);
    let report = render_bundle(&bundle, options, &mut surface)?;
    let bytes = surface.finish_to_vec()?;
    let doc = LopdfDocument::load_mem(&bytes).map_err(rmpdf_render_core::RenderError::from)?;
    Ok(GeneratedPdf { bytes, doc, report })
}

impl GeneratedPdf {
    pub fn forms(&self, page_number: u32) -> Vec<String> {
        pdf_assertions::painted_forms(&self.doc, page_number)
    }

    pub fn operands(&self, page_number: u32, operator: &str) -> Vec<Vec<f32>> {
        pdf_assertions::operands_of(&self.doc, page_number, operator)
    }
}
