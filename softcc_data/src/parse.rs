use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::{Corpus, CorpusError, Vocabulary};

/// The largest count a single `term:count` field may carry
pub const MAX_TERM_COUNT: usize = 1_000_000;

/// Parse one line of a corpus file.
///
/// A line is a document name followed by whitespace-separated fields. Each
/// field is either `term`, a single occurrence, or `term:count`. Blank lines
/// and lines starting with `#` yield `None`.
///
/// # Example
///
/// ```rust
/// # use softcc_data::{parse_line, Vocabulary};
/// let mut vocab = Vocabulary::new();
/// let (name, tokens) = parse_line("doc1 apple:2 pear", 1, &mut vocab)
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(name, "doc1");
/// assert_eq!(tokens, vec![0, 0, 1]);
/// ```
pub fn parse_line(
    line: &str,
    line_no: usize,
    vocab: &mut Vocabulary,
) -> Result<Option<(String, Vec<usize>)>, CorpusError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let name = fields
        .next()
        .ok_or(CorpusError::MissingName { line: line_no })?
        .to_owned();

    let mut tokens = Vec::new();
    for field in fields {
        let (term, count) = match field.rsplit_once(':') {
            Some((term, count)) => {
                let count = count
                    .parse::<usize>()
                    .ok()
                    .filter(|&ct| ct > 0 && ct <= MAX_TERM_COUNT)
                    .ok_or_else(|| CorpusError::InvalidCount {
                        line: line_no,
                        field: field.to_owned(),
                    })?;
                (term, count)
            }
            None => (field, 1),
        };
        let word_ix = vocab.intern(term);
        tokens.extend(std::iter::repeat(word_ix).take(count));
    }

    Ok(Some((name, tokens)))
}

impl Corpus {
    /// Read a corpus from anything line-oriented
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, CorpusError> {
        let mut vocab = Vocabulary::new();
        let mut docs = Vec::new();
        let mut names = Vec::new();

        for (ix, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some((name, tokens)) = parse_line(&line, ix + 1, &mut vocab)?
            {
                names.push(name);
                docs.push(tokens);
            }
        }

        Corpus::new(docs, names, vocab)
    }
}

/// Read a corpus file from disk
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus, CorpusError> {
    let file = File::open(path.as_ref())?;
    let corpus = Corpus::from_reader(BufReader::new(file))?
        .with_source(path.as_ref());

    info!(
        "Read {} documents ({} tokens over {} words) from {:?}",
        corpus.n_docs(),
        corpus.n_tokens(),
        corpus.n_words(),
        path.as_ref()
    );
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let mut vocab = Vocabulary::new();
        assert!(parse_line("   ", 1, &mut vocab).unwrap().is_none());
        assert!(parse_line("# header", 2, &mut vocab).unwrap().is_none());
        assert!(vocab.is_empty());
    }

    #[test]
    fn name_only_line_is_an_empty_document() {
        let mut vocab = Vocabulary::new();
        let (name, tokens) =
            parse_line("lonely", 1, &mut vocab).unwrap().unwrap();
        assert_eq!(name, "lonely");
        assert!(tokens.is_empty());
    }

    #[test]
    fn zero_count_is_an_error() {
        let mut vocab = Vocabulary::new();
        let res = parse_line("d apple:0", 4, &mut vocab);
        assert!(matches!(
            res,
            Err(CorpusError::InvalidCount { line: 4, .. })
        ));
    }

    #[test]
    fn oversized_count_is_an_error() {
        let mut vocab = Vocabulary::new();
        let res = parse_line("d apple:99999999999", 3, &mut vocab);
        assert!(matches!(
            res,
            Err(CorpusError::InvalidCount { line: 3, .. })
        ));

        let field = format!("apple:{}", MAX_TERM_COUNT + 1);
        let res = parse_line(&format!("d {field}"), 1, &mut vocab);
        assert!(matches!(res, Err(CorpusError::InvalidCount { .. })));
    }

    #[test]
    fn count_at_the_cap_is_accepted() {
        let mut vocab = Vocabulary::new();
        let field = format!("d apple:{MAX_TERM_COUNT}");
        let (_, tokens) = parse_line(&field, 1, &mut vocab).unwrap().unwrap();
        assert_eq!(tokens.len(), MAX_TERM_COUNT);
    }

    #[test]
    fn non_integer_count_is_an_error() {
        let mut vocab = Vocabulary::new();
        let res = parse_line("d apple:two", 1, &mut vocab);
        assert!(matches!(res, Err(CorpusError::InvalidCount { .. })));
    }

    #[test]
    fn from_reader_shares_vocabulary_across_documents() {
        let text = indoc! {"
            # name fields...
            a x:2 y
            b y z

            c z:3
        "};
        let corpus = Corpus::from_reader(text.as_bytes()).unwrap();

        assert_eq!(corpus.n_docs(), 3);
        assert_eq!(corpus.n_words(), 3);
        assert_eq!(corpus.doc(0), &[0, 0, 1]);
        assert_eq!(corpus.doc(1), &[1, 2]);
        assert_eq!(corpus.doc(2), &[2, 2, 2]);
        assert_eq!(corpus.name(2), "c");
        assert_eq!(corpus.vocab().term(2), Some("z"));
    }

    #[test]
    fn from_reader_with_no_documents_is_an_error() {
        let res = Corpus::from_reader("# nothing here\n".as_bytes());
        assert!(matches!(res, Err(CorpusError::NoDocuments)));
    }
}
