#![warn(unused_extern_crates)]
#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! Document corpora for the soft cross-categorization sampler.
//!
//! A [`Corpus`] is an immutable, densely indexed collection of documents,
//! each an ordered sequence of token ids into a [`Vocabulary`].
mod corpus;
mod error;
mod parse;
mod vocabulary;

pub use corpus::Corpus;
pub use error::CorpusError;
pub use parse::{parse_line, read_corpus, MAX_TERM_COUNT};
pub use vocabulary::Vocabulary;
