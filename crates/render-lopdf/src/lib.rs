//! PDF drawing surface using lopdf.
//!
//! The whole document is built in memory as an object graph and written
//! out when the surface is finished. Named layers become optional content
//! groups so PDF viewers can toggle them.

mod surface;

pub use surface::LopdfSurface;
