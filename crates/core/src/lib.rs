//! # rmpdf-core
//!
//! Draws decoded stroke documents onto a [`DrawingSurface`]:
//! - **context**: run-wide state (layer registry, pen configuration, unknown pen tally)
//! - **geometry**: output page size and tablet coordinate mapping
//! - **page**: per-page rendering and stroke style resolution
//! - **recording**: a surface that records calls, for tests
//!
//! [`DrawingSurface`]: rmpdf_render_core::DrawingSurface

pub mod context;
pub mod geometry;
pub mod page;
pub mod recording;

pub use context::RenderContext;
pub use geometry::PageGeometry;
pub use page::{layer_name, render_page, PageJob, PageStats, BACKGROUND_LAYER};
pub use recording::{RecordingSurface, SurfaceOp};
