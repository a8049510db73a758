use rmpdf_bundle::{BundleError, CompositionError};
use rmpdf_lines::FormatError;
use rmpdf_pdf_composer::ComposerError;
use rmpdf_render_core::RenderError;
use rmpdf_style::StyleConfigError;
use rmpdf_types::ColorParseError;
use thiserror::Error;

/// Everything that can abort a conversion run.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    #[error("Page composition failed: {0}")]
    Composition(#[from] CompositionError),

    #[error("Stroke file for page {page} is unreadable: {source}")]
    Format {
        /// 1-indexed output page.
        page: usize,
        #[source]
        source: FormatError,
    },

    #[error("Pen configuration is invalid: {0}")]
    StyleConfig(#[from] StyleConfigError),

    #[error("Layer colour {layer} is invalid: {source}")]
    LayerColor {
        layer: usize,
        #[source]
        source: ColorParseError,
    },

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Background import failed: {0}")]
    Composer(#[from] ComposerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("a template is required to draw pages without a background page")]
    MissingTemplate,
}
