//! A library for similarity and analogy queries over word embeddings.
//!
//! conceptvec loads embedding tables whose terms are qualified by a
//! namespace, such as ConceptNet Numberbatch (`/c/en/cat`), keeps the
//! terms of one namespace, and l2-normalizes their embeddings. The
//! resulting `Embeddings` support:
//!
//! * cosine similarity between two words (`Similarity`);
//! * ranking the vocabulary by similarity to a word or to an arbitrary
//!   vector (`WordSimilarity`, `EmbeddingSimilarity`);
//! * analogy queries by vector arithmetic (`Analogy`);
//! * averaged embeddings of texts (`SentenceEmbedding`).
//!
//! ```
//! use conceptvec::prelude::*;
//!
//! let embeddings = Embeddings::from_pairs(
//!     vec![
//!         ("/c/en/cat", vec![1., 0.]),
//!         ("/c/en/dog", vec![0.9, 0.1]),
//!         ("/c/en/car", vec![0., 1.]),
//!         ("/c/en/bus", vec![0.1, 0.9]),
//!     ],
//!     &StoreConfig::default(),
//! )
//! .unwrap();
//!
//! let similar = embeddings.nearest_to_term("cat", 2).unwrap();
//! let words: Vec<_> = similar.iter().map(|r| r.word()).collect();
//! assert_eq!(words, ["cat", "dog"]);
//! ```

pub mod config;

pub mod embeddings;

pub mod error;

pub mod features;

pub mod norms;

pub mod prelude;

pub mod similarity;

pub mod storage;

pub mod text;

pub(crate) mod util;

pub mod vocab;
