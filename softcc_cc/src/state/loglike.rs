use super::SoftCrossCat;
use crate::misc::ln_gamma;

impl SoftCrossCat {
    /// Collapsed log joint probability of the words, the document
    /// clustering of every view, and the token-view assignments.
    ///
    /// The clustering of a pinned noise view is fixed and contributes
    /// nothing.
    pub fn log_likelihood(&self) -> f64 {
        assert!(
            self.is_allocated(),
            "log_likelihood called before batch_allocation"
        );
        self.ln_words() + self.ln_partitions() + self.ln_token_views()
    }

    fn ln_words(&self) -> f64 {
        let ln_gamma_eta: Vec<f64> =
            self.eta.iter().map(|&eta_w| ln_gamma(eta_w)).collect();
        let ln_gamma_eta_sum = ln_gamma(self.eta_sum);

        self.table
            .views()
            .flat_map(|view| view.iter())
            .map(|(_, cluster)| {
                let ln_norm = ln_gamma_eta_sum
                    - ln_gamma(self.eta_sum + cluster.nwsum() as f64);
                cluster.word_counts().iter().fold(
                    ln_norm,
                    |acc, (&word, &ct)| {
                        acc + ln_gamma(self.eta[word] + ct as f64)
                            - ln_gamma_eta[word]
                    },
                )
            })
            .sum()
    }

    fn ln_partitions(&self) -> f64 {
        let alpha = self.config.alpha;
        let ln_norm =
            ln_gamma(alpha) - ln_gamma(alpha + self.n_docs() as f64);

        self.table
            .views()
            .enumerate()
            .filter(|(view_ix, _)| !self.config.is_noise_view(*view_ix))
            .map(|(_, view)| {
                let k = view.len() as f64;
                view.iter().fold(
                    k.mul_add(alpha.ln(), ln_norm),
                    |acc, (_, cluster)| acc + ln_gamma(cluster.ndsum() as f64),
                )
            })
            .sum()
    }

    fn ln_token_views(&self) -> f64 {
        let n_views = self.n_views();
        let xi = self.config.xi;
        let m_xi = xi * n_views as f64;
        let ln_gamma_m_xi = ln_gamma(m_xi);
        let ln_gamma_xi = ln_gamma(xi);

        let mut counts = vec![0_usize; n_views];
        self.z
            .iter()
            .map(|doc_z| {
                counts.iter_mut().for_each(|ct| *ct = 0);
                doc_z.iter().for_each(|&m| counts[m] += 1);
                counts.iter().fold(
                    ln_gamma_m_xi - ln_gamma(m_xi + doc_z.len() as f64),
                    |acc, &ct| acc + ln_gamma(xi + ct as f64) - ln_gamma_xi,
                )
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SamplerConfig;
    use crate::misc::ln_gamma;
    use crate::state::SoftCrossCat;
    use approx::*;
    use softcc_data::Corpus;

    #[test]
    fn one_doc_one_word_has_zero_loglike() {
        let corpus = Corpus::from_docs(vec![vec![0, 0, 0]], 1).unwrap();
        let c = vec![vec![0]];
        let z = vec![vec![0; 3]];
        let sampler =
            SoftCrossCat::from_assignment(corpus, SamplerConfig::new(), c, z)
                .unwrap();
        assert_relative_eq!(sampler.log_likelihood(), 0.0, epsilon = 1E-10);
    }

    #[test]
    fn two_singletons_by_hand() {
        // two one-token docs with different words, each alone in a cluster
        let corpus = Corpus::from_docs(vec![vec![0], vec![1]], 2).unwrap();
        let config = SamplerConfig::new().alpha(2.0).eta(1.0);
        let sampler = SoftCrossCat::from_assignment(
            corpus,
            config,
            vec![vec![0], vec![1]],
            vec![vec![0], vec![0]],
        )
        .unwrap();

        // each cluster: Γ(2)/Γ(3) * Γ(2)/Γ(1) = 1/2
        let words = 2.0 * 0.5_f64.ln();
        // CRP: α² Γ(1)Γ(1) Γ(α)/Γ(α + 2) = 4 / 6
        let partition = (4.0_f64 / 6.0).ln();
        assert_relative_eq!(
            sampler.log_likelihood(),
            words + partition,
            epsilon = 1E-10
        );
    }

    #[test]
    fn noise_view_partition_is_free() {
        let corpus = Corpus::from_docs(vec![vec![0], vec![1]], 2).unwrap();
        let c = vec![vec![0, 0], vec![0, 1]];
        let z = vec![vec![0], vec![1]];
        let with_noise = SoftCrossCat::from_assignment(
            corpus.clone(),
            SamplerConfig::new().n_views(2).noise_view(true),
            c.clone(),
            z.clone(),
        )
        .unwrap();
        let without = SoftCrossCat::from_assignment(
            corpus,
            SamplerConfig::new().n_views(2),
            c,
            z,
        )
        .unwrap();

        // view 0 holds both documents in one cluster:
        // ln(α) + ln Γ(α) + ln Γ(2) − ln Γ(α + 2)
        let crp_view_0 = ln_gamma(1.0) - ln_gamma(3.0);
        assert_relative_eq!(
            without.log_likelihood() - with_noise.log_likelihood(),
            crp_view_0,
            epsilon = 1E-10
        );
    }

    #[test]
    #[should_panic]
    fn unallocated_sampler_panics() {
        let corpus = Corpus::from_docs(vec![vec![0]], 1).unwrap();
        let sampler = SoftCrossCat::new(corpus, SamplerConfig::new()).unwrap();
        let _ = sampler.log_likelihood();
    }
}
