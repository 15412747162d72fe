//! Readers for text formats.
//!
//! This module provides two readers:
//!
//! 1. `ReadText`: word embeddings in text format. In this format, each
//!    line contains a term followed by its embedding. The term and the
//!    embedding vector components are separated by a space. This format
//!    is used by GloVe.
//! 2. `ReadTextDims`: this format is the same as (1), but the data is
//!    preceded by a line with the shape of the embedding matrix. This
//!    format is used by word2vec's text output and by ConceptNet
//!    Numberbatch.
//!
//! The readers return the raw, namespace-qualified embeddings. These
//! are turned into a store with `Embeddings::from_qualified`:
//!
//! ```
//! use std::io::Cursor;
//!
//! use conceptvec::prelude::*;
//!
//! let data = "3 2\n/c/en/cat 1 0\n/c/de/katze 1 0\n/c/en/car 0 1\n";
//! let raw = QualifiedEmbeddings::read_text_dims(&mut Cursor::new(data)).unwrap();
//! let embeddings = Embeddings::from_qualified(raw, &StoreConfig::default()).unwrap();
//!
//! assert_eq!(embeddings.len(), 2);
//! assert!(embeddings.embedding("cat").is_ok());
//! ```

use std::io::BufRead;

use ndarray::Array2;
use tracing::debug;

use crate::embeddings::QualifiedEmbeddings;
use crate::error::{Error, Result};
use crate::util::read_number;

/// Method to construct `QualifiedEmbeddings` from a text file.
///
/// This trait defines an extension to `QualifiedEmbeddings` to read the
/// embeddings from a text stream. The text should contain one embedding
/// per line in the following format:
///
/// *term component_1 component_2 ... component_n*
pub trait ReadText<R>
where
    Self: Sized,
    R: BufRead,
{
    /// Read the embeddings from the given buffered reader.
    fn read_text(reader: &mut R) -> Result<Self>;

    /// Read the embeddings from the given buffered reader.
    ///
    /// In contrast to `read_text`, this constructor does not
    /// fail if a token contains invalid UTF-8. Instead, it will
    /// replace invalid UTF-8 characters by the replacement
    /// character.
    fn read_text_lossy(reader: &mut R) -> Result<Self>;
}

impl<R> ReadText<R> for QualifiedEmbeddings
where
    R: BufRead,
{
    fn read_text(reader: &mut R) -> Result<Self> {
        read_embeds(reader, None, false)
    }

    fn read_text_lossy(reader: &mut R) -> Result<Self> {
        read_embeds(reader, None, true)
    }
}

/// Method to construct `QualifiedEmbeddings` from a text file with
/// dimensions.
///
/// The text must contain as the first line the shape of the embedding
/// matrix:
///
/// *vocab_size n_components*
///
/// The remainder of the stream should contain one embedding per line in
/// the following format:
///
/// *term component_1 component_2 ... component_n*
pub trait ReadTextDims<R>
where
    Self: Sized,
    R: BufRead,
{
    /// Read the embeddings from the given buffered reader.
    fn read_text_dims(reader: &mut R) -> Result<Self>;

    /// Read the embeddings from the given buffered reader.
    ///
    /// In contrast to `read_text_dims`, this constructor does not
    /// fail if a token contains invalid UTF-8. Instead, it will
    /// replace invalid UTF-8 characters by the replacement
    /// character.
    fn read_text_dims_lossy(reader: &mut R) -> Result<Self>;
}

impl<R> ReadTextDims<R> for QualifiedEmbeddings
where
    R: BufRead,
{
    fn read_text_dims(reader: &mut R) -> Result<Self> {
        let n_words = read_number(reader, b' ')?;
        let embed_len = read_number(reader, b'\n')?;

        read_embeds(reader, Some((n_words, embed_len)), false)
    }

    fn read_text_dims_lossy(reader: &mut R) -> Result<Self> {
        let n_words = read_number(reader, b' ')?;
        let embed_len = read_number(reader, b'\n')?;

        read_embeds(reader, Some((n_words, embed_len)), true)
    }
}

fn read_embeds<R>(
    reader: &mut R,
    shape: Option<(usize, usize)>,
    lossy: bool,
) -> Result<QualifiedEmbeddings>
where
    R: BufRead,
{
    let (mut words, mut data): (Vec<String>, Vec<f32>) = if let Some((n_words, dims)) = shape {
        (
            Vec::with_capacity(n_words),
            Vec::with_capacity(n_words * dims),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    let mut dims = shape.map(|(_, dims)| dims);

    loop {
        let mut buf = Vec::new();
        match reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| Error::read_error("Cannot read line from embedding file", e))?
        {
            0 => break,
            n => {
                if buf[n - 1] == b'\n' {
                    buf.pop();
                }
            }
        };

        let line = if lossy {
            String::from_utf8_lossy(&buf).into_owned()
        } else {
            String::from_utf8(buf)
                .map_err(|e| Error::Format(format!("Token contains invalid UTF-8: {}", e)))?
        };

        let mut parts = line
            .split(|c: char| c.is_ascii_whitespace())
            .filter(|part| !part.is_empty());

        let word = parts
            .next()
            .ok_or_else(|| Error::Format(String::from("Spurious empty line")))?;

        let data_len = data.len();
        for part in parts {
            data.push(part.parse().map_err(|e| {
                Error::Format(format!("Cannot parse vector component '{}': {}", part, e))
            })?);
        }

        let row_len = data.len() - data_len;
        let expected = *dims.get_or_insert(row_len);
        if row_len != expected {
            return Err(Error::Format(format!(
                "Embedding of '{}' has {} components, expected: {}",
                word, row_len, expected
            )));
        }

        words.push(word.to_owned());
    }

    if let Some((n_words, _)) = shape {
        if words.len() != n_words {
            return Err(Error::Format(format!(
                "Incorrect vocabulary size, expected: {}, got: {}",
                n_words,
                words.len()
            )));
        }
    }

    if words.is_empty() {
        return Err(Error::Format(String::from("Embedding file is empty")));
    }

    let shape = (words.len(), dims.unwrap_or(0));
    debug!(rows = shape.0, dims = shape.1, "Read text embeddings");

    let matrix = Array2::from_shape_vec(shape, data)?;

    QualifiedEmbeddings::new(words, matrix)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{ReadText, ReadTextDims};
    use crate::embeddings::QualifiedEmbeddings;
    use crate::error::Error;

    #[test]
    fn reads_text() {
        let mut data = Cursor::new("/c/en/cat 1 0.5\n/c/en/dog -1 2e-1\n");
        let raw = QualifiedEmbeddings::read_text(&mut data).unwrap();
        assert_eq!(raw.terms(), &["/c/en/cat", "/c/en/dog"]);
        assert_eq!(raw.matrix().dim(), (2, 2));
        assert_eq!(raw.matrix()[(1, 1)], 0.2);
    }

    #[test]
    fn reads_text_without_trailing_newline() {
        let mut data = Cursor::new("/c/en/cat 1 0.5\n/c/en/dog -1 2");
        let raw = QualifiedEmbeddings::read_text(&mut data).unwrap();
        assert_eq!(raw.terms().len(), 2);
    }

    #[test]
    fn reads_text_dims() {
        let mut data = Cursor::new("2 3\n/c/en/cat 1 0 0\n/c/en/dog 0 1 0\n");
        let raw = QualifiedEmbeddings::read_text_dims(&mut data).unwrap();
        assert_eq!(raw.terms(), &["/c/en/cat", "/c/en/dog"]);
        assert_eq!(raw.matrix().dim(), (2, 3));
    }

    #[test]
    fn fails_on_wrong_vocab_size() {
        let mut data = Cursor::new("3 2\n/c/en/cat 1 0\n/c/en/dog 0 1\n");
        assert!(matches!(
            QualifiedEmbeddings::read_text_dims(&mut data),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn fails_on_wrong_dims() {
        let mut data = Cursor::new("2 3\n/c/en/cat 1 0\n/c/en/dog 0 1\n");
        assert!(QualifiedEmbeddings::read_text_dims(&mut data).is_err());
    }

    #[test]
    fn fails_on_ragged_rows() {
        let mut data = Cursor::new("/c/en/cat 1 0\n/c/en/dog 0 1 1\n");
        assert!(matches!(
            QualifiedEmbeddings::read_text(&mut data),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn fails_on_unparsable_component() {
        let mut data = Cursor::new("/c/en/cat 1 zero\n");
        assert!(QualifiedEmbeddings::read_text(&mut data).is_err());
    }

    #[test]
    fn fails_on_empty_line() {
        let mut data = Cursor::new("/c/en/cat 1 0\n\n/c/en/dog 0 1\n");
        assert!(QualifiedEmbeddings::read_text(&mut data).is_err());
    }

    #[test]
    fn fails_on_empty_input() {
        assert!(QualifiedEmbeddings::read_text(&mut Cursor::new("")).is_err());
    }

    #[test]
    fn fails_on_invalid_utf8() {
        let mut data = Cursor::new(b"/c/nl/zee\xc3n 1 0\n".to_vec());
        assert!(QualifiedEmbeddings::read_text(&mut data).is_err());
    }

    #[test]
    fn read_lossy() {
        let mut data = Cursor::new(b"/c/nl/meren 0 1\n/c/nl/zee\xc3n 1 0\n".to_vec());
        let raw = QualifiedEmbeddings::read_text_lossy(&mut data).unwrap();
        assert_eq!(raw.terms(), &["/c/nl/meren", "/c/nl/zee\u{fffd}n"]);
    }

    #[test]
    fn read_dims_lossy() {
        let mut data = Cursor::new(b"1 2\n/c/nl/zee\xc3n 1 0\n".to_vec());
        let raw = QualifiedEmbeddings::read_text_dims_lossy(&mut data).unwrap();
        assert_eq!(raw.terms(), &["/c/nl/zee\u{fffd}n"]);
    }
}
