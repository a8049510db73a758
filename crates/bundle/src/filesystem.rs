//! Directory-backed bundle source.
//!
//! Member paths are resolved relative to the root directory. Paths that
//! would escape the root are rejected.

use crate::error::BundleError;
use crate::source::{BundleSource, SharedBundleData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Reads bundle members from a directory, typically the tablet's document
/// store holding `<uuid>.content`, `<uuid>.pdf` and a `<uuid>/` directory.
#[derive(Debug)]
pub struct FilesystemBundleSource {
    root: PathBuf,
}

impl FilesystemBundleSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `None` for absolute paths and paths containing `..`.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() {
            return None;
        }
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }

    fn walk(
        &self,
        dir: &Path,
        prefix: &str,
        filter: &dyn Fn(&str) -> bool,
        out: &mut Vec<String>,
    ) -> Result<(), BundleError> {
        let entries = std::fs::read_dir(dir).map_err(|source| BundleError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| BundleError::Io {
                path: dir.display().to_string(),
                source,
            })?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let member = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            };
            let file_type = entry.file_type().map_err(|source| BundleError::Io {
                path: member.clone(),
                source,
            })?;
            if file_type.is_dir() {
                self.walk(&entry.path(), &member, filter, out)?;
            } else if filter(&member) {
                out.push(member);
            }
        }
        Ok(())
    }
}

impl BundleSource for FilesystemBundleSource {
    fn open(&self, path: &str) -> Result<SharedBundleData, BundleError> {
        let full_path = self
            .resolve(path)
            .ok_or_else(|| BundleError::NotFound(format!("{} (outside bundle root)", path)))?;

        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BundleError::NotFound(path.to_string())
            } else {
                BundleError::Io {
                    path: path.to_string(),
                    source: e,
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn list(&self, filter: &dyn Fn(&str) -> bool) -> Result<Vec<String>, BundleError> {
        let mut members = Vec::new();
        self.walk(&self.root, "", filter, &mut members)?;
        members.sort();
        Ok(members)
    }

    fn name(&self) -> &'static str {
        "FilesystemBundleSource"
    }
}
