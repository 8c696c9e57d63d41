//! Sufficient statistics for the clusters of every view
use std::collections::BTreeMap;

use crate::error::TableError;

/// Sufficient statistics of a single Dirichlet-multinomial cluster
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cluster {
    ndsum: usize,
    nwsum: usize,
    nw: BTreeMap<usize, usize>,
    nd: BTreeMap<usize, usize>,
}

fn decrement(
    counts: &mut BTreeMap<usize, usize>,
    key: usize,
    by: usize,
    what: &str,
) {
    let ct = counts.get_mut(&key).unwrap_or_else(|| {
        panic!("{what}[{key}] is zero; cannot remove {by}")
    });
    assert!(*ct >= by, "{what}[{key}] = {ct}; cannot remove {by}");
    *ct -= by;
    if *ct == 0 {
        counts.remove(&key);
    }
}

impl Cluster {
    /// The number of documents assigned to this cluster
    #[inline]
    pub fn ndsum(&self) -> usize {
        self.ndsum
    }

    /// The number of tokens assigned to this cluster
    #[inline]
    pub fn nwsum(&self) -> usize {
        self.nwsum
    }

    /// The number of occurrences of `word` in this cluster
    #[inline]
    pub fn nw(&self, word: usize) -> usize {
        self.nw.get(&word).copied().unwrap_or(0)
    }

    /// The number of tokens of `doc` in this cluster
    #[inline]
    pub fn nd(&self, doc: usize) -> usize {
        self.nd.get(&doc).copied().unwrap_or(0)
    }

    /// Nonzero word counts
    pub fn word_counts(&self) -> &BTreeMap<usize, usize> {
        &self.nw
    }

    /// Nonzero per-document token counts
    pub fn doc_counts(&self) -> &BTreeMap<usize, usize> {
        &self.nd
    }

    fn observe(&mut self, word: usize, doc: usize, count: usize) {
        if count == 0 {
            return;
        }
        *self.nw.entry(word).or_insert(0) += count;
        *self.nd.entry(doc).or_insert(0) += count;
        self.nwsum += count;
    }

    fn forget(&mut self, word: usize, doc: usize, count: usize) {
        if count == 0 {
            return;
        }
        assert!(
            self.nwsum >= count,
            "nwsum = {}; cannot remove {count}",
            self.nwsum
        );
        decrement(&mut self.nw, word, count, "nw");
        decrement(&mut self.nd, doc, count, "nd");
        self.nwsum -= count;
    }
}

/// The live clusters of one view, keyed by cluster id
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewClusters {
    clusters: BTreeMap<usize, Cluster>,
    next_id: usize,
}

impl ViewClusters {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of live clusters
    #[inline]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// The id a freshly born cluster would take
    #[inline]
    pub fn next_id(&self) -> usize {
        self.next_id
    }

    pub fn get(&self, id: usize) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    pub fn contains(&self, id: usize) -> bool {
        self.clusters.contains_key(&id)
    }

    /// Live clusters in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Cluster)> {
        self.clusters.iter().map(|(&id, cluster)| (id, cluster))
    }

    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.clusters.keys().copied()
    }

    fn entry(&mut self, id: usize) -> &mut Cluster {
        if id >= self.next_id {
            self.next_id = id + 1;
        }
        self.clusters.entry(id).or_default()
    }

    fn get_mut(&mut self, id: usize) -> &mut Cluster {
        self.clusters
            .get_mut(&id)
            .unwrap_or_else(|| panic!("No live cluster {id}"))
    }
}

/// Per-view cluster records with atomic update primitives.
///
/// Token-level updates (`add_token`, `remove_token`) touch word counts only.
/// Document membership (`ndsum`) is tracked separately by `insert_doc` and
/// `remove_doc`, so a document is counted once per view no matter how many
/// of its tokens route there. A cluster whose last document leaves is erased
/// on the spot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterTable {
    views: Vec<ViewClusters>,
}

impl ClusterTable {
    /// A table of `n_views` views, each with no clusters
    pub fn new(n_views: usize) -> Self {
        ClusterTable {
            views: vec![ViewClusters::new(); n_views],
        }
    }

    #[inline]
    pub fn n_views(&self) -> usize {
        self.views.len()
    }

    #[inline]
    pub fn view(&self, view_ix: usize) -> &ViewClusters {
        &self.views[view_ix]
    }

    pub fn views(&self) -> impl Iterator<Item = &ViewClusters> {
        self.views.iter()
    }

    pub fn cluster(&self, view_ix: usize, id: usize) -> Option<&Cluster> {
        self.views[view_ix].get(id)
    }

    /// The next unused cluster id of `view_ix`
    #[inline]
    pub fn current_component(&self, view_ix: usize) -> usize {
        self.views[view_ix].next_id
    }

    /// Create an empty record for cluster `id` if there is none
    pub fn seed(&mut self, view_ix: usize, id: usize) {
        self.views[view_ix].entry(id);
    }

    /// Count one occurrence of `word` from `doc` in a cluster, creating the
    /// cluster if needed. Leaves `ndsum` alone.
    pub fn add_token(
        &mut self,
        view_ix: usize,
        id: usize,
        word: usize,
        doc: usize,
    ) {
        self.views[view_ix].entry(id).observe(word, doc, 1);
    }

    /// Inverse of [`ClusterTable::add_token`].
    ///
    /// # Panics
    ///
    /// Panics if the cluster does not exist or any count would go negative.
    pub fn remove_token(
        &mut self,
        view_ix: usize,
        id: usize,
        word: usize,
        doc: usize,
    ) {
        self.views[view_ix].get_mut(id).forget(word, doc, 1);
    }

    /// Add document `doc` to a cluster along with the tokens it routes to
    /// this view, given as word counts.
    pub fn insert_doc(
        &mut self,
        view_ix: usize,
        id: usize,
        doc: usize,
        words: &BTreeMap<usize, usize>,
    ) {
        let cluster = self.views[view_ix].entry(id);
        words
            .iter()
            .for_each(|(&word, &ct)| cluster.observe(word, doc, ct));
        cluster.ndsum += 1;
    }

    /// Remove document `doc` and its tokens (as word counts) from a cluster.
    /// Returns `true` if the cluster emptied and was erased.
    ///
    /// # Panics
    ///
    /// Panics if the cluster does not exist, holds no documents, or any
    /// count would go negative.
    pub fn remove_doc(
        &mut self,
        view_ix: usize,
        id: usize,
        doc: usize,
        words: &BTreeMap<usize, usize>,
    ) -> bool {
        let view = &mut self.views[view_ix];
        let cluster = view.get_mut(id);
        words
            .iter()
            .for_each(|(&word, &ct)| cluster.forget(word, doc, ct));

        assert!(
            cluster.ndsum > 0,
            "Cluster {id} of view {view_ix} has no documents to remove"
        );
        cluster.ndsum -= 1;

        if cluster.ndsum == 0 {
            assert_eq!(
                cluster.nwsum, 0,
                "Cluster {id} of view {view_ix} has tokens but no documents"
            );
            view.clusters.remove(&id);
            true
        } else {
            false
        }
    }

    /// Check that every view's clusters hold exactly `n_docs` documents
    pub fn check_doc_counts(&self, n_docs: usize) -> Result<(), TableError> {
        for (view_ix, view) in self.views.iter().enumerate() {
            let found: usize = view.clusters.values().map(|c| c.ndsum).sum();
            if found != n_docs {
                return Err(TableError::DocumentCountMismatch {
                    view_ix,
                    expected: n_docs,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Check all of the bookkeeping against a corpus of `n_docs` documents
    /// and `n_tokens` tokens.
    pub fn validate(
        &self,
        n_docs: usize,
        n_tokens: usize,
    ) -> Result<(), TableError> {
        self.check_doc_counts(n_docs)?;

        let mut token_total = 0;
        for (view_ix, view) in self.views.iter().enumerate() {
            for (&cluster_id, cluster) in view.clusters.iter() {
                if cluster.ndsum == 0 {
                    return Err(TableError::EmptyCluster {
                        view_ix,
                        cluster_id,
                    });
                }
                if cluster_id >= view.next_id {
                    return Err(TableError::StaleNextId {
                        view_ix,
                        cluster_id,
                        next_id: view.next_id,
                    });
                }

                let word_total: usize = cluster.nw.values().sum();
                if word_total != cluster.nwsum {
                    return Err(TableError::WordCountMismatch {
                        view_ix,
                        cluster_id,
                        nwsum: cluster.nwsum,
                        word_total,
                    });
                }

                let doc_total: usize = cluster.nd.values().sum();
                if doc_total != cluster.nwsum {
                    return Err(TableError::DocTokenMismatch {
                        view_ix,
                        cluster_id,
                        nwsum: cluster.nwsum,
                        doc_total,
                    });
                }
                token_total += cluster.nwsum;
            }
        }

        if token_total != n_tokens {
            return Err(TableError::TokenCountMismatch {
                expected: n_tokens,
                found: token_total,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;

    fn table_with_two_docs() -> ClusterTable {
        // view 0: doc 0 -> cluster 0 (words 1, 1, 2); doc 1 -> cluster 1
        // (word 3)
        let mut table = ClusterTable::new(1);
        table.insert_doc(0, 0, 0, &btreemap! { 1 => 2, 2 => 1 });
        table.insert_doc(0, 1, 1, &btreemap! { 3 => 1 });
        table
    }

    #[test]
    fn new_table_has_empty_views() {
        let table = ClusterTable::new(3);
        assert_eq!(table.n_views(), 3);
        assert!(table.views().all(|v| v.is_empty() && v.next_id() == 0));
    }

    #[test]
    fn add_token_updates_word_counts_but_not_ndsum() {
        let mut table = ClusterTable::new(2);
        table.add_token(1, 0, 5, 3);
        table.add_token(1, 0, 5, 3);
        table.add_token(1, 0, 6, 4);

        let cluster = table.cluster(1, 0).unwrap();
        assert_eq!(cluster.ndsum(), 0);
        assert_eq!(cluster.nwsum(), 3);
        assert_eq!(cluster.nw(5), 2);
        assert_eq!(cluster.nw(6), 1);
        assert_eq!(cluster.nd(3), 2);
        assert_eq!(cluster.nd(4), 1);
        assert_eq!(table.current_component(1), 1);
        assert_eq!(table.current_component(0), 0);
    }

    #[test]
    fn remove_then_add_token_restores_counts() {
        let mut table = table_with_two_docs();
        let before = table.clone();

        table.remove_token(0, 0, 1, 0);
        assert_eq!(table.cluster(0, 0).unwrap().nw(1), 1);
        table.add_token(0, 0, 1, 0);

        assert_eq!(table, before);
    }

    #[test]
    fn remove_then_insert_doc_restores_counts() {
        let mut table = table_with_two_docs();
        table.insert_doc(0, 0, 2, &btreemap! { 1 => 1 });
        let before = table.clone();

        let words = btreemap! { 1 => 1 };
        assert!(!table.remove_doc(0, 0, 2, &words));
        table.insert_doc(0, 0, 2, &words);

        assert_eq!(table, before);
    }

    #[test]
    fn removing_the_last_doc_erases_the_cluster() {
        let mut table = table_with_two_docs();
        let erased = table.remove_doc(0, 1, 1, &btreemap! { 3 => 1 });

        assert!(erased);
        assert!(!table.view(0).contains(1));
        assert_eq!(table.view(0).len(), 1);
        // ids are not recycled
        assert_eq!(table.current_component(0), 2);
    }

    #[test]
    fn zero_counts_are_dropped_from_maps() {
        let mut table = table_with_two_docs();
        table.remove_token(0, 0, 2, 0);
        let cluster = table.cluster(0, 0).unwrap();
        assert!(!cluster.word_counts().contains_key(&2));
        assert_eq!(cluster.nw(2), 0);
    }

    #[test]
    #[should_panic]
    fn removing_absent_word_panics() {
        let mut table = table_with_two_docs();
        table.remove_token(0, 1, 1, 1);
    }

    #[test]
    #[should_panic]
    fn removing_too_many_words_panics() {
        let mut table = table_with_two_docs();
        table.remove_doc(0, 1, 1, &btreemap! { 3 => 2 });
    }

    #[test]
    #[should_panic]
    fn removing_from_missing_cluster_panics() {
        let mut table = table_with_two_docs();
        table.remove_token(0, 7, 1, 0);
    }

    #[test]
    #[should_panic]
    fn erasing_cluster_with_stray_tokens_panics() {
        let mut table = table_with_two_docs();
        table.add_token(0, 1, 9, 5);
        table.remove_doc(0, 1, 1, &btreemap! { 3 => 1 });
    }

    #[test]
    fn insert_doc_past_next_id_advances_it() {
        let mut table = ClusterTable::new(1);
        table.insert_doc(0, 4, 0, &BTreeMap::new());
        assert_eq!(table.current_component(0), 5);
    }

    #[test]
    fn validate_accepts_consistent_table() {
        let table = table_with_two_docs();
        assert_eq!(table.validate(2, 4), Ok(()));
    }

    #[test]
    fn validate_catches_document_count_mismatch() {
        let table = table_with_two_docs();
        assert_eq!(
            table.validate(3, 4),
            Err(TableError::DocumentCountMismatch {
                view_ix: 0,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn validate_catches_token_count_mismatch() {
        let table = table_with_two_docs();
        assert_eq!(
            table.validate(2, 5),
            Err(TableError::TokenCountMismatch {
                expected: 5,
                found: 4
            })
        );
    }

    #[test]
    fn validate_catches_empty_cluster() {
        let mut table = table_with_two_docs();
        table.seed(0, 2);
        assert_eq!(
            table.validate(2, 4),
            Err(TableError::EmptyCluster {
                view_ix: 0,
                cluster_id: 2
            })
        );
    }
}
