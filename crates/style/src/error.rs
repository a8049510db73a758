use thiserror::Error;

/// Problems in a pen style-override configuration. `layer` is the key as
/// written in the file and `item` the 0-based position within its list.
#[derive(Error, Debug)]
pub enum StyleConfigError {
    #[error("penconfig layer {0} needs to be 'all' or a layer number")]
    InvalidLayer(String),

    #[error("layer {layer}, item {item} pen type {pen} not in\n{expected}")]
    InvalidPen {
        layer: String,
        item: usize,
        pen: String,
        expected: String,
    },

    #[error("layer {layer}, item {item} weight type {weight} not in\n{expected}")]
    InvalidWeight {
        layer: String,
        item: usize,
        weight: String,
        expected: String,
    },

    #[error("layer {layer}, item {item} opacity {opacity} invalid")]
    OpacityOutOfRange { layer: String, item: usize, opacity: f32 },

    #[error("layer {layer}, item {item} width {width} invalid")]
    WidthOutOfRange { layer: String, item: usize, width: f32 },

    #[error("layer {layer}, item {item} colour convert error: {source}")]
    InvalidColor {
        layer: String,
        item: usize,
        #[source]
        source: rmpdf_types::ColorParseError,
    },

    #[error("could not read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
