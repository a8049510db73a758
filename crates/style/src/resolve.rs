use crate::overrides::PenOverride;
use crate::pen::PenKind;
use crate::weight::WeightBucket;
use rmpdf_types::Color;

/// The final appearance of one stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenStyle {
    pub width: f32,
    pub opacity: f32,
    pub color: Color,
    pub allow_color_override: bool,
}

impl PenStyle {
    /// Combines a kind's base style with an optional configured override and
    /// an optional per-layer colour.
    ///
    /// The layer colour only applies to kinds whose base style allows it.
    /// Otherwise a colour set on the override is forced, and failing that
    /// the kind's own colour is used.
    pub fn resolve(
        kind: PenKind,
        weight: WeightBucket,
        custom: Option<&PenOverride>,
        layer_color: Option<Color>,
    ) -> PenStyle {
        let base = kind.base_style();
        let (width, opacity) = match custom {
            Some(pen) => (pen.width, pen.opacity),
            None => (base.standard_width * weight.base_factor(), base.opacity),
        };
        let color = match (layer_color, custom.and_then(|p| p.color)) {
            (Some(layer), _) if base.allow_color_override => layer,
            (_, Some(forced)) => forced,
            _ => base.color,
        };
        PenStyle {
            width,
            opacity,
            color,
            allow_color_override: base.allow_color_override,
        }
    }
}
