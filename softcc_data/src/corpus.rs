use std::path::{Path, PathBuf};

use crate::{CorpusError, Vocabulary};

/// An immutable collection of documents over a fixed vocabulary.
///
/// Documents are indexed densely in the order they were added. Each document
/// is the ordered sequence of its token ids; repeated words appear once per
/// occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Corpus {
    docs: Vec<Vec<usize>>,
    names: Vec<String>,
    vocab: Vocabulary,
    source: Option<PathBuf>,
}

impl Corpus {
    /// Create a corpus, checking that every token is in the vocabulary and
    /// that there is at least one token.
    pub fn new(
        docs: Vec<Vec<usize>>,
        names: Vec<String>,
        vocab: Vocabulary,
    ) -> Result<Self, CorpusError> {
        assert_eq!(docs.len(), names.len(), "one name per document");

        if docs.is_empty() {
            return Err(CorpusError::NoDocuments);
        }

        let n_words = vocab.len();
        for (doc_ix, doc) in docs.iter().enumerate() {
            if let Some(&word_ix) = doc.iter().find(|&&w| w >= n_words) {
                return Err(CorpusError::WordIndexOutOfBounds {
                    doc_ix,
                    word_ix,
                    n_words,
                });
            }
        }

        if docs.iter().all(|doc| doc.is_empty()) {
            return Err(CorpusError::NoTokens);
        }

        Ok(Corpus {
            docs,
            names,
            vocab,
            source: None,
        })
    }

    /// Create a corpus straight from token ids. Documents are named by their
    /// index and terms by their id.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use softcc_data::Corpus;
    /// let corpus = Corpus::from_docs(vec![vec![0, 0, 1], vec![2]], 3).unwrap();
    ///
    /// assert_eq!(corpus.n_docs(), 2);
    /// assert_eq!(corpus.n_tokens(), 4);
    /// assert_eq!(corpus.doc(0), &[0, 0, 1]);
    /// ```
    pub fn from_docs(
        docs: Vec<Vec<usize>>,
        n_words: usize,
    ) -> Result<Self, CorpusError> {
        let names = (0..docs.len()).map(|ix| ix.to_string()).collect();
        Self::new(docs, names, Vocabulary::numeric(n_words))
    }

    /// Record the file the corpus was read from
    #[must_use]
    pub fn with_source<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The number of documents, `lD`
    #[inline]
    pub fn n_docs(&self) -> usize {
        self.docs.len()
    }

    /// The vocabulary size, `lV`
    #[inline]
    pub fn n_words(&self) -> usize {
        self.vocab.len()
    }

    /// The total number of tokens over all documents
    pub fn n_tokens(&self) -> usize {
        self.docs.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn doc(&self, doc_ix: usize) -> &[usize] {
        &self.docs[doc_ix]
    }

    #[inline]
    pub fn doc_len(&self, doc_ix: usize) -> usize {
        self.docs[doc_ix].len()
    }

    pub fn name(&self, doc_ix: usize) -> &str {
        &self.names[doc_ix]
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn docs(&self) -> impl Iterator<Item = &[usize]> {
        self.docs.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_docs_counts() {
        let corpus =
            Corpus::from_docs(vec![vec![0, 1, 1], vec![], vec![2]], 4)
                .unwrap();
        assert_eq!(corpus.n_docs(), 3);
        assert_eq!(corpus.n_words(), 4);
        assert_eq!(corpus.n_tokens(), 4);
        assert_eq!(corpus.doc_len(1), 0);
        assert_eq!(corpus.name(2), "2");
        assert!(corpus.source().is_none());
    }

    #[test]
    fn word_out_of_bounds_is_an_error() {
        let res = Corpus::from_docs(vec![vec![0, 3]], 3);
        assert!(matches!(
            res,
            Err(CorpusError::WordIndexOutOfBounds {
                doc_ix: 0,
                word_ix: 3,
                n_words: 3
            })
        ));
    }

    #[test]
    fn no_documents_is_an_error() {
        let res = Corpus::from_docs(vec![], 3);
        assert!(matches!(res, Err(CorpusError::NoDocuments)));
    }

    #[test]
    fn all_empty_documents_is_an_error() {
        let res = Corpus::from_docs(vec![vec![], vec![]], 3);
        assert!(matches!(res, Err(CorpusError::NoTokens)));
    }

    #[test]
    fn with_source_records_path() {
        let corpus = Corpus::from_docs(vec![vec![0]], 1)
            .unwrap()
            .with_source("data/news.docify");
        assert_eq!(corpus.source(), Some(Path::new("data/news.docify")));
    }
}
