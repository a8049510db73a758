use thiserror::Error;

/// Reasons a stroke file cannot be decoded at all.
///
/// Running out of bytes part way through the body is not among them; see
/// [`crate::StrokeDocument::is_truncated`].
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("header does not match '{}'", crate::HEADER)]
    BadHeader,

    #[error("lines format version {0} is not supported (only version 5 can be read)")]
    UnsupportedVersion(u32),

    #[error("number of layers less than 1")]
    NoLayers,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
