use thiserror::Error;

/// Nonsensical sampler configuration
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("There must be at least one view")]
    NoViews,
    #[error("The maximum number of clusters must be positive (or unset)")]
    ZeroKMax,
    #[error(
        "The maximum number of clusters must be -1 (unlimited) or \
        positive, but was {0}"
    )]
    InvalidKMax(i64),
    #[error("{name} must be positive and finite, but was {value}")]
    InvalidSmoother { name: &'static str, value: f64 },
}

/// Errors constructing a [`crate::SoftCrossCat`]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NewSamplerError {
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error(
        "Word prior has {eta_len} entries, but the vocabulary has {n_words} \
        words"
    )]
    EtaLengthMismatch { eta_len: usize, n_words: usize },
    #[error("Word prior entry {word_ix} is {value}; all must be positive")]
    InvalidEta { word_ix: usize, value: f64 },
    #[error("Assignment covers {found} documents, but the corpus has {n_docs}")]
    DocumentCountMismatch { n_docs: usize, found: usize },
    #[error(
        "Document {doc_ix} is assigned to {found} views, but there are \
        {n_views}"
    )]
    ViewCountMismatch {
        doc_ix: usize,
        n_views: usize,
        found: usize,
    },
    #[error(
        "Document {doc_ix} has {doc_len} tokens, but {found} view \
        assignments"
    )]
    TokenCountMismatch {
        doc_ix: usize,
        doc_len: usize,
        found: usize,
    },
    #[error(
        "Token {token_ix} of document {doc_ix} is assigned to view \
        {view_ix}, but there are only {n_views} views"
    )]
    ViewIndexOutOfBounds {
        doc_ix: usize,
        token_ix: usize,
        view_ix: usize,
        n_views: usize,
    },
    #[error("The noise view must hold every document in a single cluster")]
    NoiseViewSplit,
}

/// Violated bookkeeping in a [`crate::ClusterTable`]
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error(
        "View {view_ix} clusters hold {found} documents, expected {expected}"
    )]
    DocumentCountMismatch {
        view_ix: usize,
        expected: usize,
        found: usize,
    },
    #[error("Cluster {cluster_id} of view {view_ix} has no documents")]
    EmptyCluster { view_ix: usize, cluster_id: usize },
    #[error(
        "Cluster {cluster_id} of view {view_ix} has nwsum {nwsum} but its \
        word counts sum to {word_total}"
    )]
    WordCountMismatch {
        view_ix: usize,
        cluster_id: usize,
        nwsum: usize,
        word_total: usize,
    },
    #[error(
        "Cluster {cluster_id} of view {view_ix} has nwsum {nwsum} but its \
        per-document counts sum to {doc_total}"
    )]
    DocTokenMismatch {
        view_ix: usize,
        cluster_id: usize,
        nwsum: usize,
        doc_total: usize,
    },
    #[error("Clusters hold {found} tokens, expected {expected}")]
    TokenCountMismatch { expected: usize, found: usize },
    #[error(
        "View {view_ix} holds cluster id {cluster_id}, but its next fresh id \
        is {next_id}"
    )]
    StaleNextId {
        view_ix: usize,
        cluster_id: usize,
        next_id: usize,
    },
}
