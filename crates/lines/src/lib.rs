//! Decoder for tablet `.rm` stroke files ("lines" format, version 5).
//!
//! A stroke file is decoded in full into a [`StrokeDocument`] of layers, each
//! holding the strokes drawn on it in capture order. Files whose capture was
//! interrupted are decoded up to the last complete record rather than rejected.
//!
//! ```ignore
//! let doc = rmpdf_lines::decode(std::fs::File::open("page.rm")?)?;
//! for (number, layer) in doc.numbered_layers() {
//!     println!("layer {}: {} strokes", number, layer.strokes.len());
//! }
//! ```

mod decoder;
mod error;
mod model;

pub use decoder::{decode, HEADER, HEADER_LEN, PATH_RECORD_LEN, SEGMENT_RECORD_LEN};
pub use error::FormatError;
pub use model::{Layer, MaxCoordinates, Point, Stroke, StrokeDocument};
