use std::collections::BTreeMap;

use log::trace;
use rand::Rng;
use softcc_utils::{ln_pflip, ln_pflip_labeled};

use super::{routed_words, SoftCrossCat};
use crate::cluster::Cluster;
use crate::misc::ln_gamma;

impl SoftCrossCat {
    /// Resample the cluster of document `doc_ix` in every view.
    ///
    /// The document is pulled out of its cluster together with the tokens
    /// it routes to the view, then put back into a live cluster or a fresh
    /// one with probability proportional to the Chinese restaurant process
    /// prior times the Dirichlet-multinomial predictive of those tokens.
    pub fn resample_c_for<R: Rng>(&mut self, doc_ix: usize, rng: &mut R) {
        let n_docs = self.n_docs();
        let ln_denom = (n_docs as f64 - 1.0 + self.config.alpha).ln();
        let ln_alpha = self.config.alpha.ln();
        let empty = Cluster::default();

        for view_ix in 0..self.n_views() {
            let (words, n_routed) = routed_words(
                self.corpus.doc(doc_ix),
                &self.z[doc_ix],
                view_ix,
            );

            let k_old = self.c[doc_ix][view_ix];
            self.table.remove_doc(view_ix, k_old, doc_ix, &words);

            let view = self.table.view(view_ix);
            let mut candidates: Vec<(usize, f64)> = view
                .iter()
                .map(|(id, cluster)| {
                    let ln_crp = (cluster.ndsum() as f64).ln() - ln_denom;
                    let ln_dm = ln_dm_predictive(
                        cluster,
                        &words,
                        n_routed,
                        &self.eta,
                        self.eta_sum,
                    );
                    (id, ln_crp + ln_dm)
                })
                .collect();

            if self.config.may_grow(view_ix, view.len()) {
                let ln_dm = ln_dm_predictive(
                    &empty,
                    &words,
                    n_routed,
                    &self.eta,
                    self.eta_sum,
                );
                candidates.push((view.next_id(), ln_alpha - ln_denom + ln_dm));
            }

            let k_new = ln_pflip_labeled(&candidates, rng);
            trace!(
                "doc {doc_ix} view {view_ix}: {k_old} -> {k_new} \
                ({} candidates)",
                candidates.len()
            );

            self.table.insert_doc(view_ix, k_new, doc_ix, &words);
            if let Some(cluster) = self.table.cluster(view_ix, k_new) {
                assert!(
                    cluster.ndsum() <= n_docs,
                    "Cluster {k_new} of view {view_ix} holds {} documents, \
                    but there are only {n_docs}",
                    cluster.ndsum()
                );
            }

            self.c[doc_ix][view_ix] = k_new;
            self.cluster_moves.record(k_new == k_old);
        }
    }

    /// Resample the view of every token of document `doc_ix`.
    ///
    /// Each token is removed from the cluster its document occupies in its
    /// current view, then reassigned to a view with probability proportional
    /// to how well the document's cluster in that view explains the word,
    /// times how much of the document already lives there.
    pub fn resample_z_for<R: Rng>(&mut self, doc_ix: usize, rng: &mut R) {
        let n_views = self.n_views();
        let doc_len = self.corpus.doc_len(doc_ix);
        let xi = self.config.xi;
        let ln_doc_denom =
            xi.mul_add(n_views as f64, doc_len as f64 - 1.0).ln();

        let mut ln_weights = vec![0.0; n_views];
        for token_ix in 0..doc_len {
            let word = self.corpus.doc(doc_ix)[token_ix];
            let m_old = self.z[doc_ix][token_ix];
            let k_old = self.c[doc_ix][m_old];
            self.table.remove_token(m_old, k_old, word, doc_ix);

            let eta_w = self.eta[word];
            ln_weights.iter_mut().enumerate().for_each(|(view_ix, w)| {
                let k = self.c[doc_ix][view_ix];
                let (nw, nwsum, nd) = self
                    .table
                    .cluster(view_ix, k)
                    .map_or((0, 0, 0), |cluster| {
                        (cluster.nw(word), cluster.nwsum(), cluster.nd(doc_ix))
                    });
                *w = (eta_w + nw as f64).ln()
                    - (self.eta_sum + nwsum as f64).ln()
                    + (xi + nd as f64).ln()
                    - ln_doc_denom;
            });

            let m_new = ln_pflip(&ln_weights, rng);
            self.table.add_token(m_new, self.c[doc_ix][m_new], word, doc_ix);
            self.z[doc_ix][token_ix] = m_new;
            self.view_moves.record(m_new == m_old);
        }
    }
}

/// Log Dirichlet-multinomial predictive of `removed` (word counts totalling
/// `n_removed`) given the words already in `cluster`
pub(crate) fn ln_dm_predictive(
    cluster: &Cluster,
    removed: &BTreeMap<usize, usize>,
    n_removed: usize,
    eta: &[f64],
    eta_sum: f64,
) -> f64 {
    let nwsum = cluster.nwsum() as f64;
    let ln_norm =
        ln_gamma(eta_sum + nwsum) - ln_gamma(eta_sum + nwsum + n_removed as f64);

    removed.iter().fold(ln_norm, |acc, (&word, &ct)| {
        let prior = eta[word] + cluster.nw(word) as f64;
        acc + ln_gamma(prior + ct as f64) - ln_gamma(prior)
    })
}
