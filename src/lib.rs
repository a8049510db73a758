//! # rmpdf
//!
//! Converts an annotated tablet bundle into a PDF: every page's strokes
//! are drawn in named layers over its background page.
//!
//! ```no_run
//! use rmpdf::{convert_file, ConvertOptions};
//!
//! let options = ConvertOptions::new().with_builtin_template()?;
//! let report = convert_file("bundles/0c3e4b0e", "out.pdf", &options)?;
//! println!("{} pages", report.pages);
//! # Ok::<(), rmpdf::ConvertError>(())
//! ```

mod convert;
mod error;
mod options;

pub use convert::{convert, convert_file, render_bundle, ConversionReport};
pub use error::ConvertError;
pub use options::{parse_layer_colors, ConvertOptions, FormatErrorPolicy};

pub use rmpdf_bundle as bundle;
pub use rmpdf_lines as lines;
pub use rmpdf_style as style;
pub use rmpdf_types as types;
