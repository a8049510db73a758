//! JSON descriptors found in a bundle.

use crate::composer::PageMetadata;
use crate::error::CompositionError;
use chrono::{DateTime, Utc};
use rmpdf_types::Orientation;
use serde::{de, Deserialize, Deserializer, Serialize};

/// The `<uuid>.content` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub orientation: Option<String>,
    /// Page uuids in output order.
    #[serde(default)]
    pub pages: Vec<String>,
    /// Absent from older bundles.
    #[serde(default)]
    pub redirection_page_map: Vec<i32>,
    /// Zero, negative or absent in older bundles, meaning "same as `page_count`".
    #[serde(default)]
    pub original_page_count: i64,
    #[serde(default)]
    pub page_count: usize,
}

impl Content {
    pub fn from_slice(path: &str, bytes: &[u8]) -> Result<Self, crate::BundleError> {
        serde_json::from_slice(bytes).map_err(|source| crate::BundleError::Json {
            path: path.to_string(),
            source,
        })
    }

    pub fn orientation(&self) -> Orientation {
        match self.orientation.as_deref() {
            Some(o) if o.eq_ignore_ascii_case("landscape") => Orientation::Landscape,
            _ => Orientation::Portrait,
        }
    }

    pub fn original_page_count(&self) -> usize {
        usize::try_from(self.original_page_count)
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(self.page_count)
    }

    /// The page list must match the declared page count.
    pub fn validate(&self) -> Result<(), CompositionError> {
        if self.pages.len() != self.page_count {
            return Err(CompositionError::PageListMismatch {
                expected: self.page_count,
                found: self.pages.len(),
            });
        }
        Ok(())
    }

    pub fn page_metadata(&self) -> PageMetadata {
        PageMetadata {
            original_page_count: self.original_page_count(),
            page_count: self.page_count,
            redirection: if self.redirection_page_map.is_empty() {
                None
            } else {
                Some(self.redirection_page_map.clone())
            },
        }
    }
}

/// The optional `<uuid>.metadata` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub visible_name: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "deserialize_epoch_millis")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Metadata {
    pub fn from_slice(path: &str, bytes: &[u8]) -> Result<Self, crate::BundleError> {
        serde_json::from_slice(bytes).map_err(|source| crate::BundleError::Json {
            path: path.to_string(),
            source,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EpochMillis {
    Number(i64),
    Text(String),
}

/// Milliseconds since the epoch, written either as a number or a string.
fn deserialize_epoch_millis<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = match Option::<EpochMillis>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(EpochMillis::Number(n)) => n,
        Some(EpochMillis::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| de::Error::custom(format!("invalid lastModified '{}': {}", s, e)))?,
    };
    DateTime::from_timestamp_millis(millis)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("lastModified {} out of range", millis)))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct LayerEntry {
    #[serde(default)]
    name: String,
}

/// A page's `<page>-metadata.json`, carrying the layer names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageLayers {
    #[serde(default)]
    layers: Vec<LayerEntry>,
}

impl PageLayers {
    pub fn from_slice(path: &str, bytes: &[u8]) -> Result<Self, crate::BundleError> {
        serde_json::from_slice(bytes).map_err(|source| crate::BundleError::Json {
            path: path.to_string(),
            source,
        })
    }

    pub fn into_names(self) -> Vec<String> {
        self.layers.into_iter().map(|l| l.name).collect()
    }
}
