//! Prelude exports the most commonly-used types and traits.

pub use crate::config::{DuplicatePolicy, StoreConfig};

pub use crate::embeddings::{Embeddings, QualifiedEmbeddings};

pub use crate::error::Error;

pub use crate::features::{tokenize, SentenceEmbedding};

pub use crate::norms::{EmbeddingWithNorm, NdNorms, Norms};

pub use crate::similarity::{
    Analogy, EmbeddingSimilarity, Similarity, WordSimilarity, WordSimilarityResult,
};

pub use crate::storage::{NdArray, Storage, StorageView};

pub use crate::text::{ReadText, ReadTextDims};

pub use crate::vocab::{SimpleVocab, Vocab};
