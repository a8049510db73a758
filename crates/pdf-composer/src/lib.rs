//! PDF composition utilities for drawing pages of one document onto
//! another.
//!
//! This crate provides low-level PDF manipulation using lopdf:
//! - Deep object copying with cycle detection
//! - Importing a source page as a Form XObject
//! - A generated blank A4 template

mod copier;
mod error;
mod import;
mod template;

pub use error::ComposerError;
pub use import::{ImportedPage, PageImporter};
pub use template::{blank_a4_template, A4_HEIGHT_PT, A4_WIDTH_PT};
