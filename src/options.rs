use crate::error::ConvertError;
use rmpdf_pdf_composer::blank_a4_template;
use rmpdf_style::PenOverrides;
use rmpdf_types::Color;
use std::fs;
use std::io;
use std::path::Path;

/// What to do with a page whose stroke file cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatErrorPolicy {
    /// Draw the page's background only and log a warning.
    #[default]
    SkipPage,
    /// Fail the whole conversion.
    Abort,
}

/// Settings for one conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub(crate) template: Option<Vec<u8>>,
    pub(crate) overrides: PenOverrides,
    pub(crate) layer_colors: Vec<Option<Color>>,
    pub(crate) format_policy: FormatErrorPolicy,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the single-page PDF drawn behind inserted pages and behind
    /// every page of a bundle without a background document.
    pub fn with_template(mut self, pdf: Vec<u8>) -> Self {
        self.template = Some(pdf);
        self
    }

    /// Reads the template from a file.
    pub fn with_template_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let pdf = fs::read(path).map_err(|e| {
            io::Error::new(e.kind(), format!("Failed to read template '{}': {}", path.display(), e))
        })?;
        Ok(self.with_template(pdf))
    }

    /// Uses a generated blank A4 page as the template.
    pub fn with_builtin_template(self) -> Result<Self, ConvertError> {
        Ok(self.with_template(blank_a4_template()?))
    }

    pub fn with_overrides(mut self, overrides: PenOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Loads pen overrides from a YAML or JSON settings file.
    pub fn with_settings_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConvertError> {
        Ok(self.with_overrides(PenOverrides::from_file(path)?))
    }

    /// Colours by 0-indexed layer; `None` leaves that layer alone.
    pub fn with_layer_colors(mut self, colors: Vec<Option<Color>>) -> Self {
        self.layer_colors = colors;
        self
    }

    pub fn with_format_policy(mut self, policy: FormatErrorPolicy) -> Self {
        self.format_policy = policy;
        self
    }

    pub fn template(&self) -> Option<&[u8]> {
        self.template.as_deref()
    }

    pub fn overrides(&self) -> &PenOverrides {
        &self.overrides
    }

    pub fn layer_colors(&self) -> &[Option<Color>] {
        &self.layer_colors
    }

    pub fn format_policy(&self) -> FormatErrorPolicy {
        self.format_policy
    }
}

/// Parses one colour per layer in order. `"empty"` and blank values leave
/// that layer without a colour.
pub fn parse_layer_colors<S: AsRef<str>>(values: &[S]) -> Result<Vec<Option<Color>>, ConvertError> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let value = value.as_ref().trim();
            if value.is_empty() || value.eq_ignore_ascii_case("empty") {
                return Ok(None);
            }
            value
                .parse::<Color>()
                .map(Some)
                .map_err(|source| ConvertError::LayerColor { layer: i + 1, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_colors_keep_positions() {
        let colors = parse_layer_colors(&["red", "empty", "", "#00ff00"]).unwrap();
        assert_eq!(
            colors,
            vec![Some(Color::rgb(255, 0, 0)), None, None, Some(Color::rgb(0, 255, 0))]
        );
    }

    #[test]
    fn bad_layer_color_names_the_layer() {
        let err = parse_layer_colors(&["blue", "notacolour"]).unwrap_err();
        assert!(matches!(err, ConvertError::LayerColor { layer: 2, .. }));
    }

    #[test]
    fn defaults_skip_bad_pages_without_template() {
        let options = ConvertOptions::new();
        assert_eq!(options.format_policy(), FormatErrorPolicy::SkipPage);
        assert!(options.template().is_none());
        assert!(options.overrides().is_empty());
    }

    #[test]
    fn builtin_template_is_a_pdf() {
        let options = ConvertOptions::new().with_builtin_template().unwrap();
        assert!(options.template().unwrap().starts_with(b"%PDF-"));
    }
}
