#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! Collapsed Gibbs sampler for the soft cross-categorization mixture model.
//!
//! Features (here, word tokens) are softly partitioned into `M` views, and
//! within each view documents are clustered under a Dirichlet process with
//! Dirichlet-multinomial components. Each token carries its own view
//! assignment; each document carries one cluster assignment per view.
//!
//! The sampler alternates two kernels per document:
//!
//! - **Token-view resampling**: each token is moved to the view whose
//!   (document's) cluster best explains its word.
//! - **Cluster resampling**: in each view, the document, together with the
//!   tokens it routes to that view, is removed from its cluster and
//!   reinserted into an existing cluster or a freshly born one.
pub mod cluster;
pub mod config;
pub mod error;
mod misc;
pub mod state;
pub mod summary;

pub use cluster::{Cluster, ClusterTable, ViewClusters};
pub use config::SamplerConfig;
pub use error::{ConfigError, NewSamplerError, TableError};
pub use state::SoftCrossCat;
pub use summary::{
    ClusterSummary, MoveStats, SweepSummary, ViewSummary, N_TOP_WORDS,
};
