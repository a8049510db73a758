use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Bundle member not found: {0}")]
    NotFound(String),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not read zip archive '{path}': {source}")]
    Zip {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Content file {0}.content does not exist")]
    MissingContent(String),

    #[error("Invalid bundle identifier '{0}'")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Composition(#[from] CompositionError),
}

/// The page descriptors of a bundle disagree with each other.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("redirection table has {found} entries but the page count is {expected}")]
    RedirectionLengthMismatch { expected: usize, found: usize },

    #[error("number of rm pages {found} != json pageCount {expected}")]
    PageListMismatch { expected: usize, found: usize },
}
