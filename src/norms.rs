//! Embedding norms.

use std::ops::Deref;

use ndarray::{Array1, CowArray, Ix1};

/// Trait for norm storage.
pub trait Norms {
    /// Return the norm for the word at the given index.
    fn norm(&self, idx: usize) -> f32;
}

/// Embedding l2 norms.
///
/// Embeddings in a store are always l2-normalized. Sometimes it is
/// useful to get the original unnormalized embeddings. The unnormalized
/// embedding can be reconstructed by multiplying the normalized
/// embedding by its orginal l2 norm.
#[derive(Clone, Debug, PartialEq)]
pub struct NdNorms {
    inner: Array1<f32>,
}

impl NdNorms {
    pub fn new(norms: impl Into<Array1<f32>>) -> Self {
        NdNorms {
            inner: norms.into(),
        }
    }
}

impl Deref for NdNorms {
    type Target = Array1<f32>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Norms for NdNorms {
    fn norm(&self, idx: usize) -> f32 {
        self.inner[idx]
    }
}

/// An embedding with its (pre-normalization) l2 norm.
#[derive(Clone, Debug)]
pub struct EmbeddingWithNorm<'a> {
    pub embedding: CowArray<'a, f32, Ix1>,
    pub norm: f32,
}

impl<'a> EmbeddingWithNorm<'a> {
    /// Get the embedding as it was before normalization.
    pub fn into_unnormalized(self) -> Array1<f32> {
        let mut unnormalized = self.embedding.into_owned();
        unnormalized *= self.norm;
        unnormalized
    }
}
