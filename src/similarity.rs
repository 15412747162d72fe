//! Traits and trait implementations for similarity queries.
//!
//! All queries rank the vocabulary by the dot product between a
//! query vector and the l2-normalized embeddings. For unit-length
//! queries this is the cosine similarity. Ranking is an exact scan
//! over all embeddings; the best results are selected with a bounded
//! heap.
//!
//! Results are ordered by decreasing similarity. Words with the same
//! similarity are ordered by their position in the vocabulary, so the
//! output of a query is fully determined by its input.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::convert::TryInto;
use std::f32;

use ndarray::{Array1, ArrayView1, CowArray, Ix1};
use ordered_float::NotNan;

use crate::embeddings::Embeddings;
use crate::error::{Error, Result};
use crate::storage::{Storage, StorageView};
use crate::vocab::Vocab;

/// A word with its similarity.
///
/// This data structure is used to store a pair consisting of a word and
/// its similarity to a query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordSimilarityResult<'a> {
    similarity: NotNan<f32>,
    idx: usize,
    word: &'a str,
}

impl<'a> WordSimilarityResult<'a> {
    /// Get the word's similarity in angular similarity.
    pub fn angular_similarity(&self) -> f32 {
        1f32 - (self.cosine_similarity().max(-1.).min(1.).acos() / f32::consts::PI)
    }

    /// Get the word's similarity in cosine similarity.
    ///
    /// This is the dot product of the query and the word's embedding.
    /// It is only a cosine if the query is a unit vector.
    pub fn cosine_similarity(&self) -> f32 {
        *self.similarity
    }

    /// Get the euclidean distance between the vectors.
    pub fn euclidean_distance(&self) -> f32 {
        // Trivially derived from the law of cosines
        (2f32 - 2f32 * self.cosine_similarity()).max(0.).sqrt()
    }

    /// Returns the euclidean similarity.
    ///
    /// This method returns a similarity in *[0,1]*, where *0*
    /// corresponds to a euclidean distance of *2* (the maximum
    /// distance between two unit vectors) and *1* to a euclidean
    /// distance of *0*.
    pub fn euclidean_similarity(&self) -> f32 {
        1f32 - (self.euclidean_distance() / 2f32)
    }

    /// Position of the word in the vocabulary.
    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn word(&self) -> &'a str {
        self.word
    }
}

impl<'a> Ord for WordSimilarityResult<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.similarity.cmp(&self.similarity) {
            Ordering::Equal => self.idx.cmp(&other.idx),
            ordering => ordering,
        }
    }
}

impl<'a> PartialOrd for WordSimilarityResult<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Trait for similarity between two words.
pub trait Similarity {
    /// Compute the cosine similarity of two words.
    ///
    /// Fails with `Error::UnknownTerm` if either word is not in the
    /// vocabulary. The similarity is symmetric and the similarity of
    /// a word to itself is *1* (up to rounding).
    fn similarity(&self, word1: &str, word2: &str) -> Result<f32>;
}

impl<V, S> Similarity for Embeddings<V, S>
where
    V: Vocab,
    S: Storage,
{
    fn similarity(&self, word1: &str, word2: &str) -> Result<f32> {
        let [embedding1, embedding2] = lookup_words(self, [word1, word2])?;
        Ok(embedding1.dot(&embedding2))
    }
}

/// Trait for analogy queries.
pub trait Analogy {
    /// Perform an analogy query.
    ///
    /// This method returns words that are close in vector space to the
    /// analogy query `word1` is to `word2` as `word3` is to `?`. More
    /// concretely, it ranks the embeddings by their dot product with:
    ///
    /// *embedding(word2) - embedding(word1) + embedding(word3)*
    ///
    /// The query vector is not normalized, so the similarities of the
    /// results are only meaningful relative to each other. Exactly
    /// `limit` results are returned. The query words themselves are
    /// candidates; often `word3` is the best-ranked result. Use
    /// `analogy_masked` to exclude them.
    ///
    /// `Error::UnknownTerm` is returned with the query words that are
    /// not in the vocabulary.
    fn analogy(&self, query: [&str; 3], limit: usize) -> Result<Vec<WordSimilarityResult>> {
        self.analogy_masked(query, [false, false, false], limit)
    }

    /// Perform an analogy query while excluding query words.
    ///
    /// `remove` specifies which parts of the queries are excluded from the
    /// output candidates. If `remove[0]` is `true`, `word1` cannot be
    /// returned as an answer to the query.
    fn analogy_masked(
        &self,
        query: [&str; 3],
        remove: [bool; 3],
        limit: usize,
    ) -> Result<Vec<WordSimilarityResult>>;
}

impl<V, S> Analogy for Embeddings<V, S>
where
    V: Vocab,
    S: StorageView,
{
    fn analogy_masked(
        &self,
        query: [&str; 3],
        remove: [bool; 3],
        limit: usize,
    ) -> Result<Vec<WordSimilarityResult>> {
        let [embedding1, embedding2, embedding3] = lookup_words(self, query)?;

        let mut embedding: Array1<f32> = &embedding2 - &embedding1;
        embedding += &embedding3;

        let skip = query
            .iter()
            .zip(remove.iter())
            .filter(|(_, &exclude)| exclude)
            .map(|(word, _)| *word)
            .collect();

        self.nearest_masked(embedding.view(), limit, &skip)
    }
}

/// Trait for word similarity queries.
pub trait WordSimilarity {
    /// Find words that are similar to the query word.
    ///
    /// Exactly `limit` results are returned. The query word itself is
    /// not excluded and is normally the first result.
    fn nearest_to_term(&self, word: &str, limit: usize) -> Result<Vec<WordSimilarityResult>>;
}

impl<V, S> WordSimilarity for Embeddings<V, S>
where
    V: Vocab,
    S: StorageView,
{
    fn nearest_to_term(&self, word: &str, limit: usize) -> Result<Vec<WordSimilarityResult>> {
        let embedding = self.embedding(word)?;
        self.nearest(embedding.view(), limit)
    }
}

/// Trait for embedding similarity queries.
pub trait EmbeddingSimilarity {
    /// Find the words that are most similar to the query embedding.
    ///
    /// Words are ranked by the dot product of their embeddings with
    /// the query, which is used as-is. Exactly `limit` results are
    /// returned, `limit` must be in *[1, N]* where *N* is the
    /// vocabulary size. Fails with `Error::DimensionMismatch` if the
    /// query does not have the embedding dimensionality.
    fn nearest(&self, query: ArrayView1<f32>, limit: usize) -> Result<Vec<WordSimilarityResult>> {
        self.nearest_masked(query, limit, &HashSet::new())
    }

    /// Find the words that are most similar to the query embedding
    /// while skipping certain words.
    ///
    /// `limit` must be in *[1, N - k]*, where *k* is the number of
    /// words in `skip` that are in the vocabulary.
    fn nearest_masked(
        &self,
        query: ArrayView1<f32>,
        limit: usize,
        skip: &HashSet<&str>,
    ) -> Result<Vec<WordSimilarityResult>>;
}

impl<V, S> EmbeddingSimilarity for Embeddings<V, S>
where
    V: Vocab,
    S: StorageView,
{
    fn nearest_masked(
        &self,
        query: ArrayView1<f32>,
        limit: usize,
        skip: &HashSet<&str>,
    ) -> Result<Vec<WordSimilarityResult>> {
        if query.len() != self.dims() {
            return Err(Error::DimensionMismatch {
                expected: self.dims(),
                got: query.len(),
            });
        }

        if !query.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidArgument(
                "query embedding has non-finite components".to_owned(),
            ));
        }

        let n_skip = skip
            .iter()
            .filter(|word| self.vocab().contains(word))
            .count();
        let n_candidates = self.len() - n_skip;
        if limit == 0 || limit > n_candidates {
            return Err(Error::InvalidArgument(format!(
                "number of results should be in [1, {}], got: {}",
                n_candidates, limit
            )));
        }

        let sims = self.storage().view().dot(&query);
        let mut results = BinaryHeap::with_capacity(limit);

        for (idx, (&sim, word)) in sims.iter().zip(self.vocab().words()).enumerate() {
            // Don't add words that we are explicitly asked to skip.
            if skip.contains(word.as_str()) {
                continue;
            }

            let word_similarity = WordSimilarityResult {
                word,
                idx,
                similarity: NotNan::new(sim).map_err(|_| Error::NaN)?,
            };

            if results.len() < limit {
                results.push(word_similarity);
            } else if let Some(mut worst) = results.peek_mut() {
                if word_similarity < *worst {
                    *worst = word_similarity
                }
            }
        }

        Ok(results.into_sorted_vec())
    }
}

fn lookup_words<'a, V, S, const N: usize>(
    embeddings: &'a Embeddings<V, S>,
    query: [&str; N],
) -> Result<[CowArray<'a, f32, Ix1>; N]>
where
    V: Vocab,
    S: Storage,
{
    let absent: Vec<String> = query
        .iter()
        .filter(|word| !embeddings.vocab().contains(word))
        .map(|word| (*word).to_owned())
        .collect();
    if !absent.is_empty() {
        return Err(Error::UnknownTerm(absent));
    }

    let rows: Vec<_> = query
        .iter()
        .map(|word| embeddings.embedding(word))
        .collect::<Result<_>>()?;

    rows.try_into()
        .map_err(|_| Error::InvalidArgument("embedding lookup count mismatch".to_owned()))
}
