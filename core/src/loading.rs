//! Ids with a request in flight.

use std::collections::BTreeSet;

/// Set of todo ids awaiting a server response.
///
/// Membership only: inserting an id twice and removing it once clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingSet {
    ids: BTreeSet<i64>,
}

impl LoadingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i64) {
        self.ids.insert(id);
    }

    pub fn extend<'a>(&mut self, ids: impl IntoIterator<Item = &'a i64>) {
        self.ids.extend(ids);
    }

    pub fn remove(&mut self, id: i64) {
        self.ids.remove(&id);
    }

    pub fn remove_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a i64>) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_insert_behaves_as_set() {
        let mut set = LoadingSet::new();
        set.insert(4);
        set.insert(4);
        assert_eq!(set.len(), 1);
        set.remove(4);
        assert!(!set.contains(4));
        assert!(set.is_empty());
    }

    #[test]
    fn remove_all_leaves_other_ids() {
        let mut set = LoadingSet::new();
        set.extend(&[1, 2, 3]);
        set.remove_all(&[1, 3]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2]);
    }
}
