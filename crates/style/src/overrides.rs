//! User-supplied pen style overrides, configured per layer in YAML
//!
//! ```yaml
//! all:
//!   - pen:     fineliner
//!     weight:  narrow
//!     width:   0.95
//!     color:   black
//!     opacity: 0.9
//! "1":
//!   - pen:     fineliner
//!     weight:  standard
//!     width:   0.8
//!     color:   blue
//!     opacity: 0.8
//! ```
//!
//! or the same table in JSON
//!
//! ```json
//! {
//!   "all": [
//!     { "pen": "fineliner", "weight": "narrow", "width": 0.95, "color": "black", "opacity": 0.9 }
//!   ],
//!   "1": [
//!     { "pen": "fineliner", "weight": "standard", "width": 0.8, "color": "blue", "opacity": 0.8 }
//!   ]
//! }
//! ```

use crate::error::StyleConfigError;
use crate::pen::PenKind;
use crate::weight::WeightBucket;
use rmpdf_types::Color;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

const MAX_WIDTH: f32 = 30.0;

/// Which layers a list of overrides applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKey {
    All,
    /// A 1-indexed layer number.
    Layer(u32),
}

impl LayerKey {
    pub fn parse(s: &str) -> Option<LayerKey> {
        if s == "all" {
            return Some(LayerKey::All);
        }
        match s.parse::<u32>() {
            Ok(n) if n >= 1 => Some(LayerKey::Layer(n)),
            _ => None,
        }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKey::All => f.write_str("all"),
            LayerKey::Layer(n) => write!(f, "{}", n),
        }
    }
}

/// A validated override for one pen kind at one weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenOverride {
    pub pen: PenKind,
    pub weight: WeightBucket,
    pub width: f32,
    /// When set, forces the stroke colour.
    pub color: Option<Color>,
    pub opacity: f32,
}

/// Derives an override for `requested` from an entry stored at a different
/// weight, scaling the width by the ratio of the buckets' nominal magnitudes.
pub fn derive_for_bucket(requested: WeightBucket, stored: &PenOverride) -> PenOverride {
    PenOverride {
        weight: requested,
        width: requested.nominal() / stored.weight.nominal() * stored.width,
        ..*stored
    }
}

#[derive(Deserialize)]
struct RawPenOverride {
    pen: String,
    weight: String,
    width: f32,
    #[serde(default)]
    color: Option<String>,
    #[serde(default = "default_opacity")]
    opacity: f32,
}

fn default_opacity() -> f32 {
    1.0
}

/// The full override table. Entries for a specific layer take precedence
/// over entries under `"all"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenOverrides {
    layers: BTreeMap<u32, Vec<PenOverride>>,
    all: Vec<PenOverride>,
}

impl PenOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.all.is_empty()
    }

    pub fn insert(&mut self, key: LayerKey, pen: PenOverride) {
        match key {
            LayerKey::All => self.all.push(pen),
            LayerKey::Layer(n) => self.layers.entry(n).or_default().push(pen),
        }
    }

    /// Loads and validates an override file. Files ending in `.yaml` or
    /// `.yml` are read as YAML, anything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StyleConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| StyleConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml(&contents)
        } else {
            Self::from_json(&contents)
        }
    }

    /// Parses and validates a JSON override table.
    pub fn from_json(json: &str) -> Result<Self, StyleConfigError> {
        Self::from_raw(serde_json::from_str(json)?)
    }

    /// Parses and validates a YAML override table.
    pub fn from_yaml(yaml: &str) -> Result<Self, StyleConfigError> {
        Self::from_raw(serde_yaml::from_str(yaml)?)
    }

    fn from_raw(raw: BTreeMap<String, Vec<RawPenOverride>>) -> Result<Self, StyleConfigError> {
        let mut overrides = PenOverrides::new();

        for (layer, pens) in raw {
            let key = match LayerKey::parse(&layer) {
                Some(key) => Some(key),
                // numeric but never a layer number, e.g. 0
                None if layer.parse::<i64>().is_ok() => {
                    log::warn!("pen settings for layer {} ignored, layers are numbered from 1", layer);
                    None
                }
                None => return Err(StyleConfigError::InvalidLayer(layer)),
            };
            // an empty list still shadows "all"
            if let Some(LayerKey::Layer(n)) = key {
                overrides.layers.entry(n).or_default();
            }
            for (item, pen) in pens.into_iter().enumerate() {
                let validated = validate(&layer, item, pen)?;
                if let Some(key) = key {
                    overrides.insert(key, validated);
                }
            }
        }
        Ok(overrides)
    }

    /// Finds the override for a stroke on a 1-indexed layer.
    ///
    /// A layer with its own list is looked up only in that list; `"all"`
    /// serves layers without one. A narrow or broad request without an
    /// exact entry is derived from the standard entry for the same pen. A
    /// standard request has no such fallback.
    pub fn lookup(&self, layer_number: usize, pen: PenKind, weight: WeightBucket) -> Option<PenOverride> {
        let list = u32::try_from(layer_number)
            .ok()
            .and_then(|n| self.layers.get(&n))
            .unwrap_or(&self.all);
        find_in(list, pen, weight)
    }
}

fn find_in(list: &[PenOverride], pen: PenKind, weight: WeightBucket) -> Option<PenOverride> {
    if let Some(exact) = list.iter().find(|p| p.pen == pen && p.weight == weight) {
        return Some(*exact);
    }
    if weight == WeightBucket::Standard {
        return None;
    }
    list.iter()
        .find(|p| p.pen == pen && p.weight == WeightBucket::Standard)
        .map(|standard| {
            log::debug!("deriving {} {} override from the standard entry", pen, weight);
            derive_for_bucket(weight, standard)
        })
}

fn validate(layer: &str, item: usize, raw: RawPenOverride) -> Result<PenOverride, StyleConfigError> {
    let pen = PenKind::parse(&raw.pen).ok_or_else(|| StyleConfigError::InvalidPen {
        layer: layer.to_string(),
        item,
        pen: raw.pen.clone(),
        expected: PenKind::vocabulary(),
    })?;
    let weight = WeightBucket::parse(&raw.weight).ok_or_else(|| StyleConfigError::InvalidWeight {
        layer: layer.to_string(),
        item,
        weight: raw.weight.clone(),
        expected: WeightBucket::vocabulary(),
    })?;
    if !(0.0..=1.0).contains(&raw.opacity) {
        return Err(StyleConfigError::OpacityOutOfRange {
            layer: layer.to_string(),
            item,
            opacity: raw.opacity,
        });
    }
    if !(0.0..=MAX_WIDTH).contains(&raw.width) {
        return Err(StyleConfigError::WidthOutOfRange {
            layer: layer.to_string(),
            item,
            width: raw.width,
        });
    }
    let color = match raw.color.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(name) => Some(name.parse::<Color>().map_err(|source| StyleConfigError::InvalidColor {
            layer: layer.to_string(),
            item,
            source,
        })?),
    };
    Ok(PenOverride {
        pen,
        weight,
        width: raw.width,
        color,
        opacity: raw.opacity,
    })
}
