//! Word embeddings.

use std::iter::Enumerate;
use std::slice;

use fnv::FnvHashMap;
use ndarray::{Array2, Axis, CowArray, Ix1};
use tracing::{debug, warn};

use crate::config::{DuplicatePolicy, StoreConfig};
use crate::error::{Error, Result};
use crate::norms::{EmbeddingWithNorm, NdNorms, Norms};
use crate::storage::{NdArray, Storage, StorageView, StorageViewMut};
use crate::vocab::{SimpleVocab, Vocab};

/// Raw embeddings with namespace-qualified terms.
///
/// This is the form in which an embedding source delivers its data:
/// *N* terms such as `/c/en/cat` and an unnormalized *N x D* matrix,
/// where row *i* is the embedding of term *i*.
#[derive(Clone, Debug, PartialEq)]
pub struct QualifiedEmbeddings {
    terms: Vec<String>,
    matrix: Array2<f32>,
}

impl QualifiedEmbeddings {
    /// Construct raw embeddings.
    ///
    /// Fails when the number of terms differs from the number of
    /// matrix rows.
    pub fn new(terms: Vec<String>, matrix: Array2<f32>) -> Result<Self> {
        if terms.len() != matrix.nrows() {
            return Err(Error::Format(format!(
                "Number of terms ({}) does not match number of embeddings ({})",
                terms.len(),
                matrix.nrows()
            )));
        }

        Ok(QualifiedEmbeddings { terms, matrix })
    }

    /// Construct raw embeddings from term/vector pairs.
    ///
    /// Fails with `Error::DimensionMismatch` when the vectors do not all
    /// have the same length.
    pub fn from_pairs<I, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, Vec<f32>)>,
        T: Into<String>,
    {
        let mut terms = Vec::new();
        let mut data = Vec::new();
        let mut dims = None;

        for (term, vector) in pairs {
            let expected = *dims.get_or_insert(vector.len());
            if vector.len() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    got: vector.len(),
                });
            }

            terms.push(term.into());
            data.extend(vector);
        }

        let matrix = Array2::from_shape_vec((terms.len(), dims.unwrap_or(0)), data)?;

        Ok(QualifiedEmbeddings { terms, matrix })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn matrix(&self) -> &Array2<f32> {
        &self.matrix
    }
}

/// Word embeddings.
///
/// This data structure stores l2-normalized word embeddings and
/// their vocabulary. It provides the lookups on which similarity and
/// analogy queries are built. Embeddings are immutable after
/// construction, so a single instance can be shared between threads
/// for concurrent queries.
#[derive(Clone, Debug)]
pub struct Embeddings<V, S> {
    vocab: V,
    storage: S,
    norms: NdNorms,
}

impl<V, S> Embeddings<V, S> {
    pub(crate) fn new(vocab: V, storage: S, norms: NdNorms) -> Self {
        Embeddings {
            vocab,
            storage,
            norms,
        }
    }

    /// Decompose embeddings in their vocabulary, storage, and norms.
    pub fn into_parts(self) -> (V, S, NdNorms) {
        (self.vocab, self.storage, self.norms)
    }

    /// Get the l2 norms of the embeddings before normalization.
    pub fn norms(&self) -> &NdNorms {
        &self.norms
    }

    /// Get the embedding storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get the vocabulary.
    pub fn vocab(&self) -> &V {
        &self.vocab
    }
}

impl<V, S> Embeddings<V, S>
where
    S: Storage,
{
    /// Return the length (in vector components) of the word embeddings.
    pub fn dims(&self) -> usize {
        self.storage.shape().1
    }
}

#[allow(clippy::len_without_is_empty)]
impl<V, S> Embeddings<V, S>
where
    V: Vocab,
    S: Storage,
{
    /// Get the (normalized) embedding of a word.
    pub fn embedding(&self, word: &str) -> Result<CowArray<f32, Ix1>> {
        let idx = self.vocab.offset_for(word)?;
        Ok(self.storage.embedding(idx))
    }

    /// Get the (normalized) embedding of a word with its original norm.
    pub fn embedding_with_norm(&self, word: &str) -> Result<EmbeddingWithNorm> {
        let idx = self.vocab.offset_for(word)?;
        Ok(EmbeddingWithNorm {
            embedding: self.storage.embedding(idx),
            norm: self.norms.norm(idx),
        })
    }

    /// Get the number of words in the vocabulary.
    pub fn len(&self) -> usize {
        self.vocab.words_len()
    }

    /// Get an iterator over pairs of words and the corresponding embeddings.
    pub fn iter(&self) -> Iter<S> {
        Iter {
            storage: &self.storage,
            inner: self.vocab.words().iter().enumerate(),
        }
    }
}

impl Embeddings<SimpleVocab, NdArray> {
    /// Construct embeddings from the terms of one namespace.
    ///
    /// Only terms starting with `config.namespace` are retained. The
    /// namespace prefix is stripped from retained terms, which keep
    /// their relative order. The embeddings of retained terms are
    /// l2-normalized.
    ///
    /// Construction fails when no term is in the namespace, when the
    /// embedding of a retained term has a zero or non-finite norm, or
    /// when a stripped term occurs more than once and the duplicate
    /// policy is `DuplicatePolicy::Reject`.
    pub fn from_qualified(raw: QualifiedEmbeddings, config: &StoreConfig) -> Result<Self> {
        let namespace = config.namespace.as_str();

        let mut words: Vec<String> = Vec::new();
        let mut rows = Vec::new();
        let mut positions = FnvHashMap::default();

        for (row, term) in raw.terms.iter().enumerate() {
            let word = match term.strip_prefix(namespace) {
                Some(word) if !word.is_empty() => word,
                Some(_) => {
                    warn!(term = %term, "Skipping term without a name");
                    continue;
                }
                None => continue,
            };

            if let Some(&pos) = positions.get(word) {
                match config.duplicates {
                    DuplicatePolicy::Reject => return Err(Error::DuplicateTerm(word.to_owned())),
                    DuplicatePolicy::KeepFirst => {
                        warn!(term = %term, "Ignoring duplicate term");
                    }
                    DuplicatePolicy::KeepLast => {
                        warn!(term = %term, "Replacing embedding of duplicate term");
                        rows[pos] = row;
                    }
                }
                continue;
            }

            positions.insert(word.to_owned(), words.len());
            words.push(word.to_owned());
            rows.push(row);
        }

        if words.is_empty() {
            return Err(Error::EmptyNamespace(namespace.to_owned()));
        }

        let matrix = raw.matrix.select(Axis(0), &rows);
        let embeddings = Self::from_words(words, matrix)?;

        debug!(
            namespace,
            n_qualified = raw.terms.len(),
            n_terms = embeddings.len(),
            dims = embeddings.dims(),
            "Constructed embeddings"
        );

        Ok(embeddings)
    }

    /// Construct embeddings from term/vector pairs.
    ///
    /// This is a convenience wrapper around
    /// `QualifiedEmbeddings::from_pairs` and `Embeddings::from_qualified`.
    pub fn from_pairs<I, T>(pairs: I, config: &StoreConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (T, Vec<f32>)>,
        T: Into<String>,
    {
        Self::from_qualified(QualifiedEmbeddings::from_pairs(pairs)?, config)
    }

    /// Construct embeddings from bare words and their unnormalized
    /// embeddings.
    ///
    /// Row *i* of `matrix` is the embedding of `words[i]`. Words must
    /// be unique and there must be at least one word.
    pub fn from_words(words: Vec<String>, matrix: Array2<f32>) -> Result<Self> {
        if words.is_empty() {
            return Err(Error::InvalidArgument(String::from(
                "Cannot construct embeddings without words",
            )));
        }

        if words.len() != matrix.nrows() {
            return Err(Error::Format(format!(
                "Number of words ({}) does not match number of embeddings ({})",
                words.len(),
                matrix.nrows()
            )));
        }

        let vocab = SimpleVocab::new(words)?;
        let mut storage = NdArray::new(matrix);
        let norms = storage.normalize();

        // Non-finite input components leave non-finite components after
        // normalization.
        let degenerate = norms
            .iter()
            .zip(storage.view().outer_iter())
            .position(|(&norm, row)| norm == 0. || row.iter().any(|v| !v.is_finite()));

        if let Some(idx) = degenerate {
            return Err(Error::DegenerateVector {
                term: vocab.words()[idx].clone(),
                norm: norms[idx],
            });
        }

        Ok(Embeddings::new(vocab, storage, NdNorms::new(norms)))
    }
}

impl<'a, V, S> IntoIterator for &'a Embeddings<V, S>
where
    V: Vocab,
    S: Storage,
{
    type Item = (&'a str, CowArray<'a, f32, Ix1>);
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over embeddings.
pub struct Iter<'a, S> {
    storage: &'a S,
    inner: Enumerate<slice::Iter<'a, String>>,
}

impl<'a, S> Iterator for Iter<'a, S>
where
    S: Storage,
{
    type Item = (&'a str, CowArray<'a, f32, Ix1>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(idx, word)| (word.as_str(), self.storage.embedding(idx)))
    }
}
