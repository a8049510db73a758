//! The `BundleSource` trait, abstracting where bundle members come from.

use crate::error::BundleError;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};

/// Shared member contents (reference-counted bytes).
pub type SharedBundleData = Arc<Vec<u8>>;

/// Read-only access to the members of a bundle container.
///
/// Member paths are relative to the container root and use `/` as the
/// separator, e.g. `"<uuid>/<page>.rm"`.
pub trait BundleSource: Debug {
    /// Reads a member in full.
    fn open(&self, path: &str) -> Result<SharedBundleData, BundleError>;

    /// Whether a member exists.
    fn exists(&self, path: &str) -> bool;

    /// Lists every member path accepted by `filter`, sorted.
    fn list(&self, filter: &dyn Fn(&str) -> bool) -> Result<Vec<String>, BundleError>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// A bundle source backed by members added up front.
#[derive(Debug, Default)]
pub struct InMemoryBundleSource {
    members: RwLock<BTreeMap<String, SharedBundleData>>,
}

impl InMemoryBundleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a member.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::Io` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), BundleError> {
        let path = path.into();
        let mut members = self.members.write().map_err(|_| poisoned(&path))?;
        members.insert(path, Arc::new(data));
        Ok(())
    }

    /// Builder-style variant of [`add`](Self::add).
    pub fn with(self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<Self, BundleError> {
        self.add(path, data.into())?;
        Ok(self)
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.members.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(path: &str) -> BundleError {
    BundleError::Io {
        path: path.to_string(),
        source: std::io::Error::other("bundle store lock poisoned"),
    }
}

impl BundleSource for InMemoryBundleSource {
    fn open(&self, path: &str) -> Result<SharedBundleData, BundleError> {
        let members = self.members.read().map_err(|_| poisoned(path))?;
        members
            .get(path)
            .cloned()
            .ok_or_else(|| BundleError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.members
            .read()
            .map(|m| m.contains_key(path))
            .unwrap_or(false)
    }

    fn list(&self, filter: &dyn Fn(&str) -> bool) -> Result<Vec<String>, BundleError> {
        let members = self.members.read().map_err(|_| poisoned("<list>"))?;
        Ok(members.keys().filter(|p| filter(p.as_str())).cloned().collect())
    }

    fn name(&self) -> &'static str {
        "InMemoryBundleSource"
    }
}
