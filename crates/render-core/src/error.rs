use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Unknown layer handle {0}")]
    UnknownLayer(usize),
    #[error("Unknown background handle {0}")]
    UnknownBackground(usize),
    #[error("Background page {page} out of range, document has {count} page(s)")]
    PageOutOfRange { page: usize, count: usize },
    #[error("Drawing operation issued before any page was added")]
    NoPage,
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

impl From<&str> for RenderError {
    fn from(s: &str) -> Self {
        RenderError::Other(s.to_string())
    }
}
