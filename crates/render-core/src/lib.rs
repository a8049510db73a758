//! Core rendering abstractions for stroke output.
//!
//! This crate provides the pieces shared by drawing backends:
//! - `DrawingSurface` trait for abstracting page, layer and path operations
//! - Handle and error types
//! - Coordinate conversion helpers

mod error;
mod traits;
mod types;
pub mod utils;

pub use error::RenderError;
pub use traits::DrawingSurface;
pub use types::{BackgroundId, LayerId};
