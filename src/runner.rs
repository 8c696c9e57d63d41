use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use softcc_cc::{SoftCrossCat, SweepSummary};
use softcc_data::Corpus;

use crate::config::RunConfig;
use crate::error::RunError;
use crate::snapshot::{save_snapshot, Fit};

/// What happened in one Gibbs sweep
#[derive(Clone, Debug)]
pub struct IterationReport {
    /// 1-based sweep number
    pub iter: usize,
    pub loglike: f64,
    pub summary: SweepSummary,
}

/// Drives a [`SoftCrossCat`] sampler through repeated sweeps, tracking the
/// best log likelihood seen and writing snapshots as configured.
pub struct Runner {
    sampler: SoftCrossCat,
    config: RunConfig,
    rng: Xoshiro256Plus,
    iter: usize,
    loglike: f64,
    best_loglike: f64,
    best_iter: usize,
}

impl Runner {
    /// Build and initialize a sampler over `corpus`
    pub fn new(corpus: Corpus, config: RunConfig) -> Result<Self, RunError> {
        config.validate()?;

        let mut rng = Xoshiro256Plus::seed_from_u64(config.seed);
        let mut sampler = SoftCrossCat::new(corpus, config.sampler.clone())?;
        sampler.batch_allocation(&mut rng);

        let loglike = sampler.log_likelihood();
        info!("{}", sampler.current_state(loglike, loglike, 0));

        Ok(Runner {
            sampler,
            config,
            rng,
            iter: 0,
            loglike,
            best_loglike: loglike,
            best_iter: 0,
        })
    }

    /// Run one sweep and write whatever snapshots are due
    pub fn step(&mut self) -> Result<IterationReport, RunError> {
        let summary = self.sampler.resample_posterior(&mut self.rng);
        self.iter += 1;
        self.loglike = self.sampler.log_likelihood();

        let improved = self.loglike > self.best_loglike;
        if improved {
            self.best_loglike = self.loglike;
            self.best_iter = self.iter;
        }

        info!(
            "{}",
            self.sampler.current_state(
                self.loglike,
                self.best_loglike,
                self.best_iter
            )
        );

        if improved && self.config.write_best {
            self.save("best")?;
        }

        let lag = self.config.sample_lag;
        if lag > 0 && self.iter % lag == 0 {
            self.save(&format!("sample-{:05}", self.iter))?;
        }

        Ok(IterationReport {
            iter: self.iter,
            loglike: self.loglike,
            summary,
        })
    }

    /// Run `n_iters` sweeps
    pub fn run(&mut self, n_iters: usize) -> Result<(), RunError> {
        self.run_with(n_iters, |_| {})
    }

    /// Run `n_iters` sweeps, handing each report to `f` as it comes in
    pub fn run_with<F>(
        &mut self,
        n_iters: usize,
        mut f: F,
    ) -> Result<(), RunError>
    where
        F: FnMut(&IterationReport),
    {
        for _ in 0..n_iters {
            let report = self.step()?;
            f(&report);
        }
        Ok(())
    }

    fn save(&self, prefix: &str) -> Result<(), RunError> {
        let fit = Fit {
            loglike: self.loglike,
            best_loglike: self.best_loglike,
            best_iter: self.best_iter,
        };
        save_snapshot(
            &self.config.output_dir,
            &self.sampler,
            self.config.seed,
            prefix,
            fit,
        )?;
        Ok(())
    }

    pub fn sampler(&self) -> &SoftCrossCat {
        &self.sampler
    }

    pub fn corpus(&self) -> &Corpus {
        self.sampler.corpus()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The number of sweeps run so far
    pub fn iter(&self) -> usize {
        self.iter
    }

    /// The log likelihood after the latest sweep
    pub fn loglike(&self) -> f64 {
        self.loglike
    }

    pub fn best_loglike(&self) -> f64 {
        self.best_loglike
    }

    /// The sweep at which the best log likelihood was reached, 0 if it was
    /// the initial state
    pub fn best_iter(&self) -> usize {
        self.best_iter
    }
}
