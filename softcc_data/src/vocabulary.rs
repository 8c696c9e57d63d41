use std::collections::HashMap;

/// Interns terms into dense ids in order of first appearance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vocabulary whose terms are the decimal ids `0..n_words`
    pub fn numeric(n_words: usize) -> Self {
        let mut vocab = Self::new();
        (0..n_words).for_each(|ix| {
            vocab.intern(&ix.to_string());
        });
        vocab
    }

    /// Return the id of `term`, adding it if it is new
    pub fn intern(&mut self, term: &str) -> usize {
        if let Some(&ix) = self.index.get(term) {
            return ix;
        }
        let ix = self.words.len();
        self.words.push(term.to_owned());
        self.index.insert(term.to_owned(), ix);
        ix
    }

    pub fn id(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, ix: usize) -> Option<&str> {
        self.words.get(ix).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_assigns_ids_in_order_of_first_appearance() {
        let mut vocab = Vocabulary::new();
        assert_eq!(vocab.intern("cat"), 0);
        assert_eq!(vocab.intern("dog"), 1);
        assert_eq!(vocab.intern("cat"), 0);
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.term(1), Some("dog"));
        assert_eq!(vocab.id("bird"), None);
    }

    #[test]
    fn numeric_vocab_maps_ids_to_themselves() {
        let vocab = Vocabulary::numeric(3);
        assert_eq!(vocab.id("2"), Some(2));
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["0", "1", "2"]);
    }
}
