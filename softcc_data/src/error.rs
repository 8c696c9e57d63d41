use std::io;
use thiserror::Error;

/// Errors that can arise while building or loading a [`crate::Corpus`]
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
    /// A `term:count` field had a count that was not an integer in
    /// `1..=MAX_TERM_COUNT`
    #[error("Invalid count in `{field}` on line {line}")]
    InvalidCount { line: usize, field: String },
    /// A document line had no name field
    #[error("Line {line} has no document name")]
    MissingName { line: usize },
    /// A token id was not in `0..n_words`
    #[error(
        "Document {doc_ix} has token id {word_ix}, but the vocabulary has \
        {n_words} words"
    )]
    WordIndexOutOfBounds {
        doc_ix: usize,
        word_ix: usize,
        n_words: usize,
    },
    /// The corpus contained no documents
    #[error("The corpus has no documents")]
    NoDocuments,
    /// The corpus contained no tokens at all
    #[error("The corpus has no tokens")]
    NoTokens,
}
