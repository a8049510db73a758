use rmpdf_types::Color;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The named tool a raw pen code stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PenKind {
    Pen,
    Fineliner,
    Marker,
    Highlighter,
    Eraser,
    SharpPencil,
    EraseArea,
    Paint,
    MechanicalPencil,
    Pencil,
    Ballpoint,
}

impl PenKind {
    pub const ALL: [PenKind; 11] = [
        PenKind::Pen,
        PenKind::Fineliner,
        PenKind::Marker,
        PenKind::Highlighter,
        PenKind::Eraser,
        PenKind::SharpPencil,
        PenKind::EraseArea,
        PenKind::Paint,
        PenKind::MechanicalPencil,
        PenKind::Pencil,
        PenKind::Ballpoint,
    ];

    /// Substituted for pen codes that are not in the code table.
    pub const FALLBACK: PenKind = PenKind::Fineliner;

    /// Maps a raw pen code from a stroke file. Codes 12 and up are the
    /// second-generation tool set; several alias first-generation kinds.
    pub fn from_code(code: u32) -> Option<PenKind> {
        let kind = match code {
            2 | 17 => PenKind::Pen,
            3 | 16 => PenKind::Marker,
            4 => PenKind::Fineliner,
            5 | 18 => PenKind::Highlighter,
            6 => PenKind::Eraser,
            7 => PenKind::SharpPencil,
            8 => PenKind::EraseArea,
            12 => PenKind::Paint,
            13 => PenKind::MechanicalPencil,
            14 => PenKind::Pencil,
            15 => PenKind::Ballpoint,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            PenKind::Pen => "pen",
            PenKind::Fineliner => "fineliner",
            PenKind::Marker => "marker",
            PenKind::Highlighter => "highlighter",
            PenKind::Eraser => "eraser",
            PenKind::SharpPencil => "sharp-pencil",
            PenKind::EraseArea => "erase-area",
            PenKind::Paint => "paint",
            PenKind::MechanicalPencil => "mechanical-pencil",
            PenKind::Pencil => "pencil",
            PenKind::Ballpoint => "ballpoint",
        }
    }

    /// Parses a pen name. Space-separated spellings ("sharp pencil") and the
    /// historic "highligher" are accepted alongside the kebab-case names.
    pub fn parse(s: &str) -> Option<PenKind> {
        let normalized = s.trim().to_lowercase().replace(' ', "-");
        if normalized == "highligher" {
            return Some(PenKind::Highlighter);
        }
        PenKind::ALL.into_iter().find(|k| k.name() == normalized)
    }

    /// Space separated list of accepted names, for error messages.
    pub fn vocabulary() -> String {
        PenKind::ALL.map(PenKind::name).join(" ")
    }

    /// Eraser strokes remove marks on the tablet and are never drawn.
    pub fn is_eraser(self) -> bool {
        matches!(self, PenKind::Eraser | PenKind::EraseArea)
    }

    pub fn base_style(self) -> BaseStyle {
        match self {
            PenKind::Pen => BaseStyle::overridable(Color::BLACK, 2.0, 1.0),
            PenKind::Highlighter => BaseStyle::overridable(Color::BLUE, 15.0, 0.4),
            PenKind::Fineliner => BaseStyle::overridable(Color::BLUE, 1.0, 1.0),
            PenKind::Marker => BaseStyle::overridable(Color::BLACK, 3.8, 1.0),
            PenKind::Ballpoint => BaseStyle::fixed(Color::SLATE_GRAY, 1.75, 0.8),
            PenKind::Pencil => BaseStyle::fixed(Color::BLACK, 1.9, 1.0),
            PenKind::MechanicalPencil | PenKind::SharpPencil => {
                BaseStyle::fixed(Color::BLACK, 1.2, 0.7)
            }
            PenKind::Paint => BaseStyle::fixed(Color::gray(55), 4.8, 0.8),
            PenKind::Eraser | PenKind::EraseArea => BaseStyle::fixed(Color::WHITE, 9.0, 0.0),
        }
    }
}

impl fmt::Display for PenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for PenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PenKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PenKind::parse(&s).ok_or_else(|| de::Error::custom(format!("Invalid pen kind: '{}'", s)))
    }
}

/// The built-in look of a pen kind. `standard_width` is the width of the
/// standard weight before bucket scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStyle {
    pub color: Color,
    pub standard_width: f32,
    pub opacity: f32,
    /// Whether per-layer colours may replace `color`.
    pub allow_color_override: bool,
}

impl BaseStyle {
    const fn overridable(color: Color, standard_width: f32, opacity: f32) -> Self {
        Self { color, standard_width, opacity, allow_color_override: true }
    }

    const fn fixed(color: Color, standard_width: f32, opacity: f32) -> Self {
        Self { color, standard_width, opacity, allow_color_override: false }
    }
}
