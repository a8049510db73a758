use crate::archive::ZipBundleSource;
use crate::composer::{PageComposer, PageMetadata};
use crate::content::{Content, Metadata, PageLayers};
use crate::error::{BundleError, CompositionError};
use crate::filesystem::FilesystemBundleSource;
use crate::source::{BundleSource, SharedBundleData};
use chrono::{DateTime, Utc};
use rmpdf_types::Orientation;
use std::collections::BTreeSet;
use std::path::Path;

/// One page listed in the content descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmPage {
    /// 0-indexed output position.
    pub index: usize,
    /// The page uuid.
    pub identifier: String,
    /// Whether a stroke file was found. Pages without marks have none.
    pub exists: bool,
    /// Layer names by 0-indexed layer position.
    pub layer_names: Vec<String>,
    /// Member path of the stroke file, when it exists.
    pub rm_path: Option<String>,
}

/// A discovered bundle: descriptors are loaded eagerly, stroke files on
/// demand.
#[derive(Debug)]
pub struct Bundle {
    source: Box<dyn BundleSource>,
    identifier: String,
    content: Content,
    metadata: Option<Metadata>,
    pages: Vec<RmPage>,
    background_path: Option<String>,
}

impl Bundle {
    /// Opens `<dir>/<uuid>` from a filesystem path. A file extension on the
    /// last component is ignored, so `<dir>/<uuid>.pdf` works too. A path
    /// ending in `.zip` is opened as an archive holding one bundle.
    pub fn from_path<P: AsRef<Path>>(input: P) -> Result<Self, BundleError> {
        let input = input.as_ref();
        let is_zip = input
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
        if is_zip {
            let source = ZipBundleSource::open(input)?;
            let identifier = source.bundle_identifier()?;
            return Self::open(source, &identifier);
        }

        let identifier = input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BundleError::InvalidIdentifier(input.display().to_string()))?
            .to_string();
        let root = match input.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        Self::open(FilesystemBundleSource::new(root), &identifier)
    }

    /// Scans `source` for the members of bundle `identifier`.
    pub fn open<S: BundleSource + 'static>(source: S, identifier: &str) -> Result<Self, BundleError> {
        if identifier.is_empty() || identifier.contains('/') {
            return Err(BundleError::InvalidIdentifier(identifier.to_string()));
        }
        let dir_prefix = format!("{}/", identifier);
        let members: BTreeSet<String> = source
            .list(&|p: &str| p.starts_with(identifier))?
            .into_iter()
            .collect();
        log::debug!(
            "{} found {} members for bundle {}",
            source.name(),
            members.len(),
            identifier
        );

        let content_path = format!("{}.content", identifier);
        if !members.contains(&content_path) {
            return Err(BundleError::MissingContent(identifier.to_string()));
        }
        let content = Content::from_slice(&content_path, &source.open(&content_path)?)?;
        content.validate()?;

        // older bundles have no .metadata
        let metadata_path = format!("{}.metadata", identifier);
        let metadata = if members.contains(&metadata_path) {
            Some(Metadata::from_slice(&metadata_path, &source.open(&metadata_path)?)?)
        } else {
            None
        };

        let pdf_path = format!("{}.pdf", identifier);
        let background_path = members.contains(&pdf_path).then_some(pdf_path);

        let mut pages = Vec::with_capacity(content.pages.len());
        for (index, page_id) in content.pages.iter().enumerate() {
            // older exports name stroke files by page index instead of uuid
            let stem = [page_id.clone(), index.to_string()]
                .into_iter()
                .find(|stem| members.contains(&format!("{}{}.rm", dir_prefix, stem)));

            let Some(stem) = stem else {
                pages.push(RmPage {
                    index,
                    identifier: page_id.clone(),
                    exists: false,
                    layer_names: Vec::new(),
                    rm_path: None,
                });
                continue;
            };

            let layers_path = format!("{}{}-metadata.json", dir_prefix, stem);
            let layer_names = if members.contains(&layers_path) {
                PageLayers::from_slice(&layers_path, &source.open(&layers_path)?)?.into_names()
            } else {
                Vec::new()
            };
            pages.push(RmPage {
                index,
                identifier: page_id.clone(),
                exists: true,
                layer_names,
                rm_path: Some(format!("{}{}.rm", dir_prefix, stem)),
            });
        }

        Ok(Self {
            source: Box::new(source),
            identifier: identifier.to_string(),
            content,
            metadata,
            pages,
            background_path,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn visible_name(&self) -> Option<&str> {
        self.metadata.as_ref().map(|m| m.visible_name.as_str())
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.metadata.as_ref().and_then(|m| m.last_modified)
    }

    pub fn orientation(&self) -> Orientation {
        self.content.orientation()
    }

    pub fn page_count(&self) -> usize {
        self.content.page_count
    }

    pub fn pages(&self) -> &[RmPage] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&RmPage> {
        self.pages.get(index)
    }

    pub fn has_background(&self) -> bool {
        self.background_path.is_some()
    }

    pub fn background_path(&self) -> Option<&str> {
        self.background_path.as_deref()
    }

    /// Reads the background document, if the bundle has one.
    pub fn background(&self) -> Result<Option<SharedBundleData>, BundleError> {
        self.background_path
            .as_deref()
            .map(|p| self.source.open(p))
            .transpose()
    }

    /// Reads a page's stroke file, if it has one.
    pub fn strokes(&self, page: &RmPage) -> Result<Option<SharedBundleData>, BundleError> {
        page.rm_path
            .as_deref()
            .map(|p| self.source.open(p))
            .transpose()
    }

    pub fn page_metadata(&self) -> PageMetadata {
        self.content.page_metadata()
    }

    pub fn composer(&self) -> Result<PageComposer, CompositionError> {
        PageComposer::new(self.page_metadata(), self.has_background())
    }
}
