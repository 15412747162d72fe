//! Text features from word embeddings.
//!
//! A text is represented by the average of the embeddings of its
//! tokens. Tokens that are not in the vocabulary are skipped, so a
//! single unknown word does not prevent a text from being embedded.

use ndarray::Array1;

use crate::embeddings::Embeddings;
use crate::storage::Storage;
use crate::vocab::Vocab;

/// Split a text into lowercased word tokens.
///
/// Tokens are maximal runs of alphanumeric characters and underscores.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Averaged embeddings of token sequences.
pub trait SentenceEmbedding {
    /// Get the average embedding of the given tokens.
    ///
    /// Tokens that are not in the vocabulary are ignored. Returns
    /// `None` if none of the tokens is in the vocabulary.
    fn sentence_embedding<I, T>(&self, tokens: I) -> Option<Array1<f32>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>;

    /// Tokenize a text and get the average embedding of its tokens.
    fn text_embedding(&self, text: &str) -> Option<Array1<f32>> {
        self.sentence_embedding(tokenize(text))
    }

    /// Count the tokens that are in the vocabulary.
    ///
    /// Returns the number of known tokens and the total number of
    /// tokens.
    fn coverage<I, T>(&self, tokens: I) -> (usize, usize)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>;
}

impl<V, S> SentenceEmbedding for Embeddings<V, S>
where
    V: Vocab,
    S: Storage,
{
    fn sentence_embedding<I, T>(&self, tokens: I) -> Option<Array1<f32>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut embed = Array1::zeros((self.dims(),));
        let mut n_known = 0usize;

        for token in tokens {
            if let Some(idx) = self.vocab().idx(token.as_ref()) {
                embed += &self.storage().embedding(idx);
                n_known += 1;
            }
        }

        if n_known == 0 {
            return None;
        }

        embed /= n_known as f32;

        Some(embed)
    }

    fn coverage<I, T>(&self, tokens: I) -> (usize, usize)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        tokens
            .into_iter()
            .fold((0, 0), |(known, total), token| {
                if self.vocab().contains(token.as_ref()) {
                    (known + 1, total + 1)
                } else {
                    (known, total + 1)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{tokenize, SentenceEmbedding};
    use crate::config::StoreConfig;
    use crate::embeddings::Embeddings;
    use crate::storage::NdArray;
    use crate::vocab::SimpleVocab;

    fn test_embeddings() -> Embeddings<SimpleVocab, NdArray> {
        Embeddings::from_pairs(
            vec![
                ("/c/en/good", vec![1., 0.]),
                ("/c/en/bad", vec![0., 3.]),
                ("/c/en/movie", vec![1., 1.]),
            ],
            &StoreConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("This movie was GOOD, not bad!  snake_case 42"),
            vec!["this", "movie", "was", "good", "not", "bad", "snake_case", "42"]
        );
        assert!(tokenize(" ,.!").is_empty());
    }

    #[test]
    fn averages_known_tokens() {
        let embeds = test_embeddings();
        let embed = embeds
            .sentence_embedding(&["good", "unknown", "bad"])
            .unwrap();
        assert_abs_diff_eq!(embed[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(embed[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn no_known_tokens() {
        let embeds = test_embeddings();
        assert!(embeds.sentence_embedding(&["meh", "eh"]).is_none());
        assert!(embeds.sentence_embedding(Vec::<String>::new()).is_none());
    }

    #[test]
    fn text_embedding_tokenizes() {
        let embeds = test_embeddings();
        let embed = embeds.text_embedding("A GOOD movie.").unwrap();
        let check = embeds.sentence_embedding(&["good", "movie"]).unwrap();
        assert_eq!(embed, check);
    }

    #[test]
    fn coverage_counts_known_tokens() {
        let embeds = test_embeddings();
        assert_eq!(embeds.coverage(tokenize("a good movie")), (2, 3));
        assert_eq!(embeds.coverage(Vec::<&str>::new()), (0, 0));
    }
}
