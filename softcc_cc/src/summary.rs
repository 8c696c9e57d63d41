//! Per-sweep diagnostics
use std::fmt;

use log::{info, log_enabled, Level};

/// The number of words listed per cluster in a [`SweepSummary`]
pub const N_TOP_WORDS: usize = 10;

/// Acceptance bookkeeping for one kind of Gibbs move
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveStats {
    /// Number of draws made
    pub proposed: usize,
    /// Number of draws that kept the previous assignment
    pub failed: usize,
}

impl MoveStats {
    /// Record a draw. `stayed` is true if the assignment did not change.
    #[inline]
    pub fn record(&mut self, stayed: bool) {
        self.proposed += 1;
        if stayed {
            self.failed += 1;
        }
    }

    #[inline]
    pub fn accepted(&self) -> usize {
        self.proposed - self.failed
    }

    /// Fraction of draws that changed the assignment; zero if none were made
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted() as f64 / self.proposed as f64
        }
    }
}

impl fmt::Display for MoveStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} / {} ({:.3}%)",
            self.accepted(),
            self.proposed,
            100.0 * self.acceptance_rate()
        )
    }
}

/// Occupancy of one cluster
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterSummary {
    pub id: usize,
    /// Documents assigned to the cluster
    pub ndsum: usize,
    /// Documents that route at least one token into the cluster
    pub n_docs_present: usize,
    /// Tokens in the cluster
    pub nwsum: usize,
    /// The most frequent `(word, count)` pairs, most frequent first
    pub top_words: Vec<(usize, usize)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewSummary {
    pub view_ix: usize,
    /// Tokens assigned to the view
    pub feature_weight: usize,
    pub clusters: Vec<ClusterSummary>,
}

/// State of the sampler after a sweep
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepSummary {
    pub views: Vec<ViewSummary>,
    pub cluster_moves: MoveStats,
    pub view_moves: MoveStats,
}

impl SweepSummary {
    /// The number of live clusters in each view
    pub fn n_clusters(&self) -> Vec<usize> {
        self.views.iter().map(|view| view.clusters.len()).collect()
    }

    /// Write the summary to the log, one line per entry
    pub fn log(&self) {
        if log_enabled!(Level::Info) {
            self.to_string().lines().for_each(|line| info!("{line}"));
        }
    }
}

impl fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for view in &self.views {
            writeln!(f, "M[{}] (f {})", view.view_ix, view.feature_weight)?;
            for cluster in &view.clusters {
                write!(
                    f,
                    "  C[{}] (d {}/{} nw {}) ",
                    cluster.id,
                    cluster.n_docs_present,
                    cluster.ndsum,
                    cluster.nwsum
                )?;
                for (word, ct) in &cluster.top_words {
                    write!(f, " {word}:{ct}")?;
                }
                writeln!(f)?;
            }
        }
        writeln!(f, "{} cluster moves.", self.cluster_moves)?;
        write!(f, "{} view moves.", self.view_moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn move_stats_counts() {
        let mut stats = MoveStats::default();
        stats.record(true);
        stats.record(false);
        stats.record(false);
        stats.record(false);

        assert_eq!(stats.proposed, 4);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.accepted(), 3);
        assert_relative_eq!(stats.acceptance_rate(), 0.75);
        assert_eq!(stats.to_string(), "3 / 4 (75.000%)");
    }

    #[test]
    fn empty_move_stats_have_zero_rate() {
        assert_eq!(MoveStats::default().acceptance_rate(), 0.0);
    }

    #[test]
    fn sweep_summary_display() {
        let summary = SweepSummary {
            views: vec![ViewSummary {
                view_ix: 0,
                feature_weight: 5,
                clusters: vec![ClusterSummary {
                    id: 2,
                    ndsum: 3,
                    n_docs_present: 2,
                    nwsum: 5,
                    top_words: vec![(7, 4), (1, 1)],
                }],
            }],
            cluster_moves: MoveStats {
                proposed: 2,
                failed: 2,
            },
            view_moves: MoveStats::default(),
        };

        let expected = "M[0] (f 5)\n  \
            C[2] (d 2/3 nw 5)  7:4 1:1\n\
            0 / 2 (0.000%) cluster moves.\n\
            0 / 0 (0.000%) view moves.";
        assert_eq!(summary.to_string(), expected);
        assert_eq!(summary.n_clusters(), vec![1]);
    }
}
