//! The soft cross-categorization sampler state
mod gibbs;
mod loglike;

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use log::info;
use rand::Rng;
use softcc_data::Corpus;
use softcc_utils::top_k_counts;

use crate::cluster::ClusterTable;
use crate::config::SamplerConfig;
use crate::error::NewSamplerError;
use crate::summary::{
    ClusterSummary, MoveStats, SweepSummary, ViewSummary, N_TOP_WORDS,
};

/// A soft cross-categorization of a document corpus.
///
/// Holds the corpus, the cluster of every document in every view (`c`), the
/// view of every token (`z`), and the sufficient statistics of every
/// cluster. All mutation happens through [`SoftCrossCat::batch_allocation`]
/// and the resampling kernels, which keep the three consistent.
#[derive(Clone, Debug)]
pub struct SoftCrossCat {
    config: SamplerConfig,
    corpus: Corpus,
    eta: Vec<f64>,
    eta_sum: f64,
    table: ClusterTable,
    /// `c[d][m]` is the cluster of document `d` in view `m`
    c: Vec<Vec<usize>>,
    /// `z[d][n]` is the view of token `n` of document `d`
    z: Vec<Vec<usize>>,
    cluster_moves: MoveStats,
    view_moves: MoveStats,
}

impl SoftCrossCat {
    /// An unallocated sampler with a symmetric word prior of `config.eta`
    pub fn new(
        corpus: Corpus,
        config: SamplerConfig,
    ) -> Result<Self, NewSamplerError> {
        let eta = vec![config.eta; corpus.n_words()];
        Self::with_eta(corpus, config, eta)
    }

    /// An unallocated sampler with a per-word prior
    pub fn with_eta(
        corpus: Corpus,
        config: SamplerConfig,
        eta: Vec<f64>,
    ) -> Result<Self, NewSamplerError> {
        config.validate()?;

        if eta.len() != corpus.n_words() {
            return Err(NewSamplerError::EtaLengthMismatch {
                eta_len: eta.len(),
                n_words: corpus.n_words(),
            });
        }

        if let Some((word_ix, &value)) = eta
            .iter()
            .find_position(|&&x| !(x.is_finite() && x > 0.0))
        {
            return Err(NewSamplerError::InvalidEta { word_ix, value });
        }

        let eta_sum = eta.iter().sum();
        let table = ClusterTable::new(config.n_views);

        Ok(SoftCrossCat {
            config,
            corpus,
            eta,
            eta_sum,
            table,
            c: Vec::new(),
            z: Vec::new(),
            cluster_moves: MoveStats::default(),
            view_moves: MoveStats::default(),
        })
    }

    /// A sampler started from given cluster (`c`) and view (`z`)
    /// assignments rather than from `batch_allocation`.
    pub fn from_assignment(
        corpus: Corpus,
        config: SamplerConfig,
        c: Vec<Vec<usize>>,
        z: Vec<Vec<usize>>,
    ) -> Result<Self, NewSamplerError> {
        let mut sampler = Self::new(corpus, config)?;
        sampler.check_assignment(&c, &z)?;

        for (doc_ix, (doc_c, doc_z)) in c.iter().zip(z.iter()).enumerate() {
            let doc = sampler.corpus.doc(doc_ix);
            for (view_ix, &k) in doc_c.iter().enumerate() {
                let words = routed_words(doc, doc_z, view_ix).0;
                sampler.table.insert_doc(view_ix, k, doc_ix, &words);
            }
        }

        sampler.c = c;
        sampler.z = z;
        Ok(sampler)
    }

    fn check_assignment(
        &self,
        c: &[Vec<usize>],
        z: &[Vec<usize>],
    ) -> Result<(), NewSamplerError> {
        let n_docs = self.corpus.n_docs();
        let n_views = self.config.n_views;

        for found in [c.len(), z.len()] {
            if found != n_docs {
                return Err(NewSamplerError::DocumentCountMismatch {
                    n_docs,
                    found,
                });
            }
        }

        for (doc_ix, (doc_c, doc_z)) in c.iter().zip(z.iter()).enumerate() {
            if doc_c.len() != n_views {
                return Err(NewSamplerError::ViewCountMismatch {
                    doc_ix,
                    n_views,
                    found: doc_c.len(),
                });
            }

            let doc_len = self.corpus.doc_len(doc_ix);
            if doc_z.len() != doc_len {
                return Err(NewSamplerError::TokenCountMismatch {
                    doc_ix,
                    doc_len,
                    found: doc_z.len(),
                });
            }

            if let Some((token_ix, &view_ix)) =
                doc_z.iter().find_position(|&&m| m >= n_views)
            {
                return Err(NewSamplerError::ViewIndexOutOfBounds {
                    doc_ix,
                    token_ix,
                    view_ix,
                    n_views,
                });
            }
        }

        if self.config.noise_view && !c.iter().map(|doc_c| doc_c[0]).all_equal()
        {
            return Err(NewSamplerError::NoiseViewSplit);
        }

        Ok(())
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn table(&self) -> &ClusterTable {
        &self.table
    }

    /// The number of views, `M`
    #[inline]
    pub fn n_views(&self) -> usize {
        self.config.n_views
    }

    /// The number of documents, `lD`
    #[inline]
    pub fn n_docs(&self) -> usize {
        self.corpus.n_docs()
    }

    /// The Dirichlet prior on each cluster's word distribution
    pub fn eta(&self) -> &[f64] {
        &self.eta
    }

    pub fn eta_sum(&self) -> f64 {
        self.eta_sum
    }

    /// The cluster of each view for document `doc_ix`
    pub fn doc_clusters(&self, doc_ix: usize) -> &[usize] {
        &self.c[doc_ix]
    }

    /// The view of each token in document `doc_ix`
    pub fn token_views(&self, doc_ix: usize) -> &[usize] {
        &self.z[doc_ix]
    }

    /// The cluster-move bookkeeping since the last sweep started
    pub fn cluster_moves(&self) -> MoveStats {
        self.cluster_moves
    }

    /// The view-move bookkeeping since the last sweep started
    pub fn view_moves(&self) -> MoveStats {
        self.view_moves
    }

    /// Whether every document has been given an assignment
    pub fn is_allocated(&self) -> bool {
        self.c.len() == self.corpus.n_docs()
    }

    /// Initialize the assignments.
    ///
    /// Every document starts in cluster 0 of every view and each token goes
    /// to a uniformly random view. From the second document on, the tokens of
    /// each document are resampled into views as soon as it is added, so
    /// later documents see the views that earlier ones settled into.
    pub fn batch_allocation<R: Rng>(&mut self, rng: &mut R) {
        info!("initialize");

        let n_views = self.config.n_views;
        let n_docs = self.corpus.n_docs();
        let no_words = BTreeMap::new();

        self.table = ClusterTable::new(n_views);
        if self.config.noise_view {
            self.table.seed(0, 0);
        }
        self.c = Vec::with_capacity(n_docs);
        self.z = Vec::with_capacity(n_docs);
        self.cluster_moves = MoveStats::default();
        self.view_moves = MoveStats::default();

        for doc_ix in 0..n_docs {
            self.c.push(vec![0; n_views]);
            (0..n_views).for_each(|view_ix| {
                self.table.insert_doc(view_ix, 0, doc_ix, &no_words)
            });

            let doc = self.corpus.doc(doc_ix);
            let mut doc_z = Vec::with_capacity(doc.len());
            for &word in doc {
                let view_ix = rng.gen_range(0..n_views);
                self.table.add_token(view_ix, 0, word, doc_ix);
                doc_z.push(view_ix);
            }
            self.z.push(doc_z);

            if doc_ix > 0 && n_views > 1 {
                self.resample_z_for(doc_ix, rng);
            }

            if doc_ix > 0 && doc_ix % 1000 == 0 {
                info!("Sorted {doc_ix} documents");
            }
        }
    }

    /// Run one Gibbs sweep over every document: resample the views of its
    /// tokens (if there is more than one view), then its cluster in each
    /// view.
    ///
    /// # Panics
    ///
    /// Panics if called before [`SoftCrossCat::batch_allocation`] or if the
    /// clusters of any view no longer account for every document.
    pub fn resample_posterior<R: Rng>(&mut self, rng: &mut R) -> SweepSummary {
        assert!(
            self.is_allocated(),
            "resample_posterior called before batch_allocation"
        );

        self.cluster_moves = MoveStats::default();
        self.view_moves = MoveStats::default();

        for doc_ix in 0..self.n_docs() {
            if self.n_views() > 1 {
                self.resample_z_for(doc_ix, rng);
            }
            self.resample_c_for(doc_ix, rng);
        }

        let summary = self.summarize();
        summary.log();

        if let Err(err) = self.table.check_doc_counts(self.n_docs()) {
            panic!("Lost track of documents: {err}");
        }
        debug_assert_eq!(
            self.table.validate(self.n_docs(), self.corpus.n_tokens()),
            Ok(())
        );

        summary
    }

    /// Tabulate the current clusters and move statistics
    pub fn summarize(&self) -> SweepSummary {
        let n_views = self.n_views();
        let mut feature_weight = vec![0_usize; n_views];
        let mut present: Vec<BTreeMap<usize, usize>> =
            vec![BTreeMap::new(); n_views];

        for (doc_c, doc_z) in self.c.iter().zip(self.z.iter()) {
            let mut occupied = BTreeSet::new();
            for &view_ix in doc_z {
                feature_weight[view_ix] += 1;
                occupied.insert((view_ix, doc_c[view_ix]));
            }
            for (view_ix, k) in occupied {
                *present[view_ix].entry(k).or_insert(0) += 1;
            }
        }

        let views = self
            .table
            .views()
            .enumerate()
            .map(|(view_ix, view)| ViewSummary {
                view_ix,
                feature_weight: feature_weight[view_ix],
                clusters: view
                    .iter()
                    .map(|(id, cluster)| ClusterSummary {
                        id,
                        ndsum: cluster.ndsum(),
                        n_docs_present: present[view_ix]
                            .get(&id)
                            .copied()
                            .unwrap_or(0),
                        nwsum: cluster.nwsum(),
                        top_words: top_k_counts(
                            cluster.word_counts(),
                            N_TOP_WORDS,
                        ),
                    })
                    .collect(),
            })
            .collect();

        SweepSummary {
            views,
            cluster_moves: self.cluster_moves,
            view_moves: self.view_moves,
        }
    }

    /// One-line description of the sampler and its fit
    pub fn current_state(
        &self,
        loglike: f64,
        best_loglike: f64,
        best_iter: usize,
    ) -> String {
        let cluster_sizes = self
            .table
            .views()
            .enumerate()
            .map(|(view_ix, view)| format!("[{view_ix}: c: {}]", view.len()))
            .join(" ");

        format!(
            "ll = {loglike:.6} ({best_loglike:.6} at {best_iter}) \
            alpha = {:.6} eta = {:.6} xi = {:.6} K = {cluster_sizes} M = {}",
            self.config.alpha,
            self.mean_eta(),
            self.config.xi,
            self.config.n_views,
        )
    }

    /// The average entry of the word prior
    pub fn mean_eta(&self) -> f64 {
        self.eta_sum / self.eta.len() as f64
    }
}

/// The words of `doc` whose tokens are assigned to `view_ix`, as counts,
/// along with the total number of such tokens.
fn routed_words(
    doc: &[usize],
    doc_z: &[usize],
    view_ix: usize,
) -> (BTreeMap<usize, usize>, usize) {
    let mut words = BTreeMap::new();
    let mut total = 0;
    for (&word, _) in doc.iter().zip(doc_z).filter(|&(_, &m)| m == view_ix) {
        *words.entry(word).or_insert(0) += 1;
        total += 1;
    }
    (words, total)
}
