use std::io;

use softcc_cc::{ConfigError, NewSamplerError};
use softcc_data::CorpusError;
use thiserror::Error;

/// Errors that can occur setting up or driving a sampler run
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid sampler config: {0}")]
    Config(#[from] ConfigError),
    #[error("Could not build the sampler: {0}")]
    NewSampler(#[from] NewSamplerError),
    #[error("Could not read corpus: {0}")]
    Corpus(#[from] CorpusError),
    #[error("Could not parse run config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Io error: {0}")]
    Io(#[from] io::Error),
}
