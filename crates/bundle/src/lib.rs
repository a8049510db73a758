//! Everything about a bundle except its strokes: where its files live,
//! what its descriptors say, and which background each output page uses.
//!
//! ## Sources
//!
//! - [`FilesystemBundleSource`]: a directory holding one or more bundles
//! - [`ZipBundleSource`]: a single bundle packed into a `.zip` archive
//! - [`InMemoryBundleSource`]: pre-populated members, mostly for tests

mod archive;
mod bundle;
mod composer;
mod content;
mod error;
mod filesystem;
mod source;

pub use archive::ZipBundleSource;
pub use bundle::{Bundle, RmPage};
pub use composer::{format_page_list, PageComposer, PageMetadata, PagePlanEntry};
pub use content::{Content, Metadata, PageLayers};
pub use error::{BundleError, CompositionError};
pub use filesystem::FilesystemBundleSource;
pub use source::{BundleSource, InMemoryBundleSource, SharedBundleData};
