//! Embedding vocabularies

use fnv::FnvHashMap;

use crate::error::{Error, Result};

/// Embedding vocabularies.
///
/// A vocabulary maps each of its terms to the offset of the term's
/// row in the embedding matrix. Offsets form the dense range
/// *[0, words_len)*.
#[allow(clippy::len_without_is_empty)]
pub trait Vocab {
    /// Get the index of a term.
    fn idx(&self, word: &str) -> Option<usize>;

    /// Get the number of words in the vocabulary.
    fn words_len(&self) -> usize;

    /// Get the words in the vocabulary.
    fn words(&self) -> &[String];

    /// Get the index of a term, failing for unknown terms.
    fn offset_for(&self, word: &str) -> Result<usize> {
        self.idx(word).ok_or_else(|| Error::unknown_term(word))
    }

    /// Check whether the vocabulary contains a term.
    fn contains(&self, word: &str) -> bool {
        self.idx(word).is_some()
    }
}

/// Vocabulary of plain terms.
///
/// The vocabulary is immutable after construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimpleVocab {
    indices: FnvHashMap<String, usize>,
    words: Vec<String>,
}

impl SimpleVocab {
    /// Construct a new simple vocabulary.
    ///
    /// Words are assigned indices in the given order. Returns
    /// `Error::DuplicateTerm` when a word occurs more than once.
    pub fn new(words: impl Into<Vec<String>>) -> Result<Self> {
        let words = words.into();

        let mut indices = FnvHashMap::default();
        indices.reserve(words.len());
        for (idx, word) in words.iter().enumerate() {
            if indices.insert(word.clone(), idx).is_some() {
                return Err(Error::DuplicateTerm(word.clone()));
            }
        }

        Ok(SimpleVocab { indices, words })
    }
}

impl Vocab for SimpleVocab {
    fn idx(&self, word: &str) -> Option<usize> {
        self.indices.get(word).cloned()
    }

    fn words_len(&self) -> usize {
        self.words.len()
    }

    fn words(&self) -> &[String] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::{SimpleVocab, Vocab};
    use crate::error::Error;

    fn test_simple_vocab() -> SimpleVocab {
        let words = vec![
            "this".to_owned(),
            "is".to_owned(),
            "a".to_owned(),
            "test".to_owned(),
        ];

        SimpleVocab::new(words).unwrap()
    }

    #[test]
    fn offsets_follow_word_order() {
        let vocab = test_simple_vocab();
        for (idx, word) in vocab.words().iter().enumerate() {
            assert_eq!(vocab.idx(word), Some(idx));
            assert_eq!(vocab.offset_for(word).unwrap(), idx);
        }
        assert_eq!(vocab.words_len(), 4);
    }

    #[test]
    fn unknown_word_is_error() {
        let vocab = test_simple_vocab();
        assert!(!vocab.contains("banana"));
        assert!(vocab.contains("test"));
        match vocab.offset_for("banana") {
            Err(Error::UnknownTerm(terms)) => assert_eq!(terms, vec!["banana".to_owned()]),
            other => panic!("Expected unknown term error, got: {:?}", other),
        }
    }

    #[test]
    fn duplicate_words_are_rejected() {
        let words = vec!["a".to_owned(), "b".to_owned(), "a".to_owned()];
        assert!(matches!(
            SimpleVocab::new(words),
            Err(Error::DuplicateTerm(ref word)) if word == "a"
        ));
    }
}
