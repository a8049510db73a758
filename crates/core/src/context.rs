use rmpdf_render_core::{DrawingSurface, LayerId, RenderError};
use rmpdf_style::{PenKind, PenOverrides};
use rmpdf_types::Color;
use std::collections::{BTreeMap, HashMap};

/// State shared by every page of one conversion run: the layer name
/// registry, the style configuration and the unknown pen tally.
#[derive(Debug, Default)]
pub struct RenderContext {
    layers: HashMap<String, LayerId>,
    unknown_pens: BTreeMap<u32, usize>,
    overrides: PenOverrides,
    layer_colors: Vec<Option<Color>>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(mut self, overrides: PenOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Colours by 0-indexed layer; `None` leaves a layer's pens alone.
    pub fn with_layer_colors(mut self, colors: Vec<Option<Color>>) -> Self {
        self.layer_colors = colors;
        self
    }

    pub fn overrides(&self) -> &PenOverrides {
        &self.overrides
    }

    /// The colour configured for a 1-indexed layer.
    pub fn layer_color(&self, layer_number: usize) -> Option<Color> {
        layer_number
            .checked_sub(1)
            .and_then(|i| self.layer_colors.get(i))
            .copied()
            .flatten()
    }

    /// Returns the handle for `name`, registering the layer on first use.
    pub fn layer_id<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        name: &str,
    ) -> Result<LayerId, RenderError> {
        if let Some(id) = self.layers.get(name) {
            return Ok(*id);
        }
        let id = surface.register_layer(name)?;
        self.layers.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn registered_layers(&self) -> usize {
        self.layers.len()
    }

    /// Maps a pen code to its kind. Unknown codes are tallied and drawn as
    /// the fallback kind.
    pub fn pen_kind(&mut self, pen_code: u32) -> PenKind {
        match PenKind::from_code(pen_code) {
            Some(kind) => kind,
            None => {
                *self.unknown_pens.entry(pen_code).or_insert(0) += 1;
                PenKind::FALLBACK
            }
        }
    }

    /// Occurrences of each unknown pen code so far.
    pub fn unknown_pens(&self) -> &BTreeMap<u32, usize> {
        &self.unknown_pens
    }

    /// Logs the unknown pen tally, if any.
    pub fn report_unknown_pens(&self) {
        for (code, count) in &self.unknown_pens {
            log::warn!(
                "unknown pen code {} used {} time(s), drawn as {}",
                code,
                count,
                PenKind::FALLBACK
            );
        }
    }
}
