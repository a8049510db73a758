use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Each tool comes in three widths, encoded in the stroke file as one of
/// three raw magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum WeightBucket {
    Narrow,
    #[default]
    Standard,
    Broad,
}

impl WeightBucket {
    pub const ALL: [WeightBucket; 3] = [WeightBucket::Narrow, WeightBucket::Standard, WeightBucket::Broad];

    /// Classifies a raw encoded width by rounding to three decimal places.
    /// Anything other than the narrow or broad magnitudes is standard.
    pub fn classify(raw_width: f32) -> WeightBucket {
        let rounded = (raw_width as f64 * 1000.0).round() / 1000.0;
        if rounded == 1.875 {
            WeightBucket::Narrow
        } else if rounded == 2.125 {
            WeightBucket::Broad
        } else {
            WeightBucket::Standard
        }
    }

    /// The raw magnitude this bucket is encoded as.
    pub fn nominal(self) -> f32 {
        match self {
            WeightBucket::Narrow => 1.875,
            WeightBucket::Standard => 2.0,
            WeightBucket::Broad => 2.125,
        }
    }

    /// Multiplier applied to a pen's standard width when no override is set.
    pub fn base_factor(self) -> f32 {
        match self {
            WeightBucket::Narrow => 0.60,
            WeightBucket::Standard => 0.85,
            WeightBucket::Broad => 1.20,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeightBucket::Narrow => "narrow",
            WeightBucket::Standard => "standard",
            WeightBucket::Broad => "broad",
        }
    }

    pub fn parse(s: &str) -> Option<WeightBucket> {
        let lower = s.trim().to_lowercase();
        WeightBucket::ALL.into_iter().find(|w| w.name() == lower)
    }

    pub fn vocabulary() -> String {
        WeightBucket::ALL.map(WeightBucket::name).join(" ")
    }
}

impl fmt::Display for WeightBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for WeightBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for WeightBucket {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        WeightBucket::parse(&s).ok_or_else(|| de::Error::custom(format!("Invalid pen weight: '{}'", s)))
    }
}
