//! Error types.

use std::io;

use ndarray::ShapeError;
use thiserror::Error;

/// `Result` type alias for operations that can fail.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Errors in constructing or querying embeddings.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more terms are not in the vocabulary.
    #[error("Unknown term(s): {}", .0.join(", "))]
    UnknownTerm(Vec<String>),

    /// A vector does not have the embedding dimensionality.
    #[error("Dimension mismatch, expected: {expected}, got: {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A raw embedding cannot be normalized.
    #[error("Embedding of '{term}' has degenerate norm {norm}")]
    DegenerateVector { term: String, norm: f32 },

    /// A bare term occurs more than once after prefix stripping.
    #[error("Duplicate term in vocabulary: {0}")]
    DuplicateTerm(String),

    /// No entry belongs to the requested namespace.
    #[error("No embeddings in namespace '{0}'")]
    EmptyNamespace(String),

    /// Invalid embedding file format.
    #[error("{0}")]
    Format(String),

    #[error("{desc}: {error}")]
    Read { desc: String, error: io::Error },

    /// `ndarray` shape error.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("Cannot parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A similarity computation resulted in NaN.
    #[error("Similarity is NaN")]
    NaN,
}

impl Error {
    pub fn read_error(desc: impl Into<String>, error: io::Error) -> Self {
        Error::Read {
            desc: desc.into(),
            error,
        }
    }

    pub(crate) fn unknown_term(term: impl Into<String>) -> Self {
        Error::UnknownTerm(vec![term.into()])
    }
}
