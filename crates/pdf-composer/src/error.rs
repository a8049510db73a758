use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page {page} out of range, document has {count} page(s)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("{0}")]
    Other(String),
}
