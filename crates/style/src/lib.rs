//! Stroke styling: what each pen looks like by default, and how a user
//! configuration can change that per layer.

pub mod error;
pub mod overrides;
pub mod pen;
pub mod resolve;
pub mod weight;

pub use error::StyleConfigError;
pub use overrides::{derive_for_bucket, LayerKey, PenOverride, PenOverrides};
pub use pen::{BaseStyle, PenKind};
pub use resolve::PenStyle;
pub use weight::WeightBucket;
