use std::path::PathBuf;

use clap::Parser;
use softcc::cc::SamplerConfig;
use softcc::{RunConfig, RunError};

#[derive(Parser, Debug)]
pub struct SummarizeArgs {
    /// The path to the corpus to summarize
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// The path to the corpus. One document per line: a name followed by
    /// `term` or `term:count` fields.
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,
    /// Path to a YAML run config. Flags given on the command line override
    /// its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// The number of views
    #[arg(short = 'M', long = "n-views")]
    pub n_views: Option<usize>,
    /// The maximum number of clusters per view; -1 for unlimited
    #[arg(long = "kmax", allow_negative_numbers = true)]
    pub k_max: Option<i64>,
    /// Dirichlet process concentration of each view's clustering
    #[arg(long)]
    pub alpha: Option<f64>,
    /// Smoother on the per-document view distribution
    #[arg(long)]
    pub xi: Option<f64>,
    /// Symmetric smoother on each cluster's word distribution
    #[arg(long)]
    pub eta: Option<f64>,
    /// Pin view 0 to a single cluster shared by every document
    #[arg(long)]
    pub noise_view: bool,
    /// The PRNG seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// The number of Gibbs sweeps
    #[arg(short = 'n', long = "n-iters")]
    pub n_iters: Option<usize>,
    /// Write a sample snapshot every this many sweeps
    #[arg(long)]
    pub sample_lag: Option<usize>,
    /// Directory to write snapshots to
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,
    /// Do not write a snapshot when the log likelihood improves
    #[arg(long)]
    pub no_best: bool,
    /// Do not display run progress
    #[arg(long, short)]
    pub quiet: bool,
}

impl RunArgs {
    /// The run config: the YAML file if given (or the defaults), with every
    /// flag that was passed laid on top.
    pub fn run_config(&self) -> Result<RunConfig, RunError> {
        let mut config = match self.config {
            Some(ref path) => RunConfig::from_yaml_file(path)?,
            None => RunConfig::new(),
        };

        config.sampler = self.sampler_config(config.sampler)?;

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(n_iters) = self.n_iters {
            config.n_iters = n_iters;
        }
        if let Some(sample_lag) = self.sample_lag {
            config.sample_lag = sample_lag;
        }
        if let Some(ref output_dir) = self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if self.no_best {
            config.write_best = false;
        }

        Ok(config)
    }

    fn sampler_config(
        &self,
        mut sampler: SamplerConfig,
    ) -> Result<SamplerConfig, RunError> {
        if let Some(n_views) = self.n_views {
            sampler.n_views = n_views;
        }
        if let Some(k_max) = self.k_max {
            sampler.k_max = SamplerConfig::k_max_from_sentinel(k_max)?;
        }
        if let Some(alpha) = self.alpha {
            sampler.alpha = alpha;
        }
        if let Some(xi) = self.xi {
            sampler.xi = xi;
        }
        if let Some(eta) = self.eta {
            sampler.eta = eta;
        }
        if self.noise_view {
            sampler.noise_view = true;
        }
        Ok(sampler)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "softcc",
    author = "Promised AI",
    about = "Soft cross-categorization of document corpora",
    version
)]
pub enum Opt {
    /// Run the sampler on a corpus, writing snapshots as it goes
    #[command(name = "run")]
    Run(RunArgs),
    /// Print summary statistics of a corpus
    #[command(name = "summarize")]
    Summarize(SummarizeArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use softcc::cc::ConfigError;

    fn parse(args: &[&str]) -> RunArgs {
        let mut argv = vec!["softcc", "run"];
        argv.extend_from_slice(args);
        match Opt::try_parse_from(argv).unwrap() {
            Opt::Run(args) => args,
            Opt::Summarize(_) => panic!("expected run"),
        }
    }

    #[test]
    fn defaults_without_flags() {
        let config = parse(&["corpus.txt"]).run_config().unwrap();
        assert_eq!(config, RunConfig::new());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "corpus.txt",
            "-M",
            "3",
            "--kmax",
            "12",
            "--alpha",
            "0.5",
            "--noise-view",
            "-n",
            "40",
            "--no-best",
        ])
        .run_config()
        .unwrap();

        assert_eq!(config.sampler.n_views, 3);
        assert_eq!(config.sampler.k_max, Some(12));
        assert_eq!(config.sampler.alpha, 0.5);
        assert!(config.sampler.noise_view);
        assert_eq!(config.n_iters, 40);
        assert!(!config.write_best);
    }

    #[test]
    fn minus_one_kmax_is_unlimited() {
        let config = parse(&["corpus.txt", "--kmax", "-1"])
            .run_config()
            .unwrap();
        assert_eq!(config.sampler.k_max, None);
    }

    #[test]
    fn other_negative_kmax_is_an_error() {
        let res = parse(&["corpus.txt", "--kmax", "-5"]).run_config();
        assert!(matches!(
            res,
            Err(RunError::Config(ConfigError::InvalidKMax(-5)))
        ));
    }
}
