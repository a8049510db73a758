pub mod color;
pub mod geometry;

pub use color::{Color, ColorParseError};
pub use geometry::{Orientation, Rect, Size};
