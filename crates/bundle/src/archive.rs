//! Zip-archive bundle source, for bundles downloaded as a single `.zip`.
//!
//! The archive holds the same members as a bundle directory, with the
//! `.content` descriptor at the top level naming the bundle.

use crate::error::BundleError;
use crate::source::{BundleSource, SharedBundleData};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::{Arc, Mutex};
use zip::ZipArchive;

/// Reads bundle members out of a zip archive held in memory.
pub struct ZipBundleSource {
    label: String,
    archive: Mutex<ZipArchive<Cursor<Vec<u8>>>>,
    /// Normalised member path to the name stored in the archive.
    members: BTreeMap<String, String>,
}

impl ZipBundleSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| BundleError::Io {
            path: label.clone(),
            source,
        })?;
        Self::from_bytes(label, bytes)
    }

    /// `label` names the archive in errors and logs.
    pub fn from_bytes(label: impl Into<String>, bytes: Vec<u8>) -> Result<Self, BundleError> {
        let label = label.into();
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(|source| BundleError::Zip {
            path: label.clone(),
            source,
        })?;
        let members = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(|name| (normalise(name), name.to_string()))
            .collect();
        Ok(Self {
            label,
            archive: Mutex::new(archive),
            members,
        })
    }

    /// The uuid of the bundle, taken from the top-level `.content` member.
    pub fn bundle_identifier(&self) -> Result<String, BundleError> {
        let mut found = self
            .members
            .keys()
            .filter(|m| !m.contains('/'))
            .filter_map(|m| m.strip_suffix(".content"))
            .filter(|stem| !stem.is_empty());
        let identifier = found
            .next()
            .ok_or_else(|| BundleError::MissingContent(self.label.clone()))?
            .to_string();
        if let Some(other) = found.next() {
            log::warn!("{} holds several bundles, using {} and not {}", self.label, identifier, other);
        }
        Ok(identifier)
    }
}

fn normalise(name: &str) -> String {
    name.trim_start_matches("./").trim_start_matches('/').to_string()
}

impl fmt::Debug for ZipBundleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipBundleSource")
            .field("label", &self.label)
            .field("members", &self.members.len())
            .finish()
    }
}

impl BundleSource for ZipBundleSource {
    fn open(&self, path: &str) -> Result<SharedBundleData, BundleError> {
        let stored = self
            .members
            .get(path)
            .ok_or_else(|| BundleError::NotFound(path.to_string()))?;
        let mut archive = self.archive.lock().map_err(|_| BundleError::Io {
            path: path.to_string(),
            source: std::io::Error::other("zip archive lock poisoned"),
        })?;
        let mut file = archive.by_name(stored).map_err(|source| BundleError::Zip {
            path: path.to_string(),
            source,
        })?;
        let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut data).map_err(|source| BundleError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(Arc::new(data))
    }

    fn exists(&self, path: &str) -> bool {
        self.members.contains_key(path)
    }

    fn list(&self, filter: &dyn Fn(&str) -> bool) -> Result<Vec<String>, BundleError> {
        Ok(self.members.keys().filter(|p| filter(p.as_str())).cloned().collect())
    }

    fn name(&self) -> &'static str {
        "ZipBundleSource"
    }
}
