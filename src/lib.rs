#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! A soft cross-categorization mixture model for document corpora.
//!
//! The words of each document are softly split among several *views*, and
//! within each view the documents are clustered by a Dirichlet process
//! mixture of Dirichlet-multinomials. Inference is collapsed Gibbs sampling.
//!
//! # Example
//!
//! ```
//! use softcc::{RunConfig, Runner};
//! use softcc::cc::SamplerConfig;
//! use softcc::data::Corpus;
//!
//! let corpus = Corpus::from_docs(
//!     vec![vec![0, 0, 1], vec![1, 1, 0], vec![2, 3, 3], vec![3, 2, 2]],
//!     4,
//! ).unwrap();
//!
//! let config = RunConfig::new()
//!     .sampler(SamplerConfig::new().n_views(2))
//!     .seed(1337)
//!     .write_best(false);
//!
//! let mut runner = Runner::new(corpus, config).unwrap();
//! runner.run(10).unwrap();
//!
//! assert_eq!(runner.iter(), 10);
//! assert!(runner.best_loglike() >= runner.loglike());
//! ```
mod config;
mod error;
mod runner;
pub mod snapshot;

pub use config::RunConfig;
pub use error::RunError;
pub use runner::{IterationReport, Runner};

pub use softcc_cc as cc;
pub use softcc_data as data;
pub use softcc_utils as utils;
