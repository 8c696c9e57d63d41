use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use softcc_cc::SamplerConfig;

use crate::error::RunError;

fn default_n_iters() -> usize {
    1000
}

fn default_seed() -> u64 {
    1337
}

fn default_write_best() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Configuration for a [`crate::Runner`]
///
/// Sets the sampler hyperparameters, the number of sweeps, the seed, and how
/// often snapshots are written.
///
/// # Example
///
/// ```
/// use softcc::RunConfig;
///
/// let yaml = "
/// sampler:
///   n_views: 3
///   alpha: 0.5
/// n_iters: 200
/// seed: 7
/// ";
/// let config = RunConfig::from_yaml(yaml.as_bytes()).unwrap();
///
/// assert_eq!(config.sampler.n_views, 3);
/// assert_eq!(config.n_iters, 200);
/// assert!(config.write_best);
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub sampler: SamplerConfig,
    /// Number of Gibbs sweeps
    #[serde(default = "default_n_iters")]
    pub n_iters: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Write a `sample` snapshot every this many sweeps. 0 for never.
    #[serde(default)]
    pub sample_lag: usize,
    /// Write a `best` snapshot whenever the log likelihood improves
    #[serde(default = "default_write_best")]
    pub write_best: bool,
    /// Directory snapshots are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl RunConfig {
    pub fn new() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            n_iters: default_n_iters(),
            seed: default_seed(),
            sample_lag: 0,
            write_best: default_write_best(),
            output_dir: default_output_dir(),
        }
    }

    /// Read a config from YAML
    pub fn from_yaml<R: Read>(reader: R) -> Result<Self, RunError> {
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Read a config from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, RunError> {
        let file = File::open(path)?;
        Self::from_yaml(file)
    }

    pub fn validate(&self) -> Result<(), RunError> {
        self.sampler.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    #[must_use]
    pub fn n_iters(mut self, n_iters: usize) -> Self {
        self.n_iters = n_iters;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn sample_lag(mut self, sample_lag: usize) -> Self {
        self.sample_lag = sample_lag;
        self
    }

    #[must_use]
    pub fn write_best(mut self, write_best: bool) -> Self {
        self.write_best = write_best;
        self
    }

    #[must_use]
    pub fn output_dir<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}
