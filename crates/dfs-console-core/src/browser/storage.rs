//! Lazily filled map of file path to replica hosts.

use std::collections::{HashMap, HashSet};

/// What the cache knows about one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageLookup<'a> {
    /// Never asked for.
    Unfetched,
    /// Lookup in flight.
    Loading,
    /// Answer received. May be empty (zero replicas reported).
    Fetched(&'a [String]),
}

/// Replica locations keyed by absolute file path.
///
/// "Fetched with zero replicas" is a present key with an empty list; it is
/// never confused with "unfetched". Entries are only dropped by [`clear`],
/// so a cached answer goes stale if replicas move.
///
/// [`clear`]: StorageLocationCache::clear
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageLocationCache {
    hosts: HashMap<String, Vec<String>>,
    loading: HashSet<String>,
}

impl StorageLocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, path: &str) -> StorageLookup<'_> {
        if let Some(hosts) = self.hosts.get(path) {
            StorageLookup::Fetched(hosts)
        } else if self.loading.contains(path) {
            StorageLookup::Loading
        } else {
            StorageLookup::Unfetched
        }
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.hosts.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.hosts.contains_key(path)
    }

    pub fn is_loading(&self, path: &str) -> bool {
        self.loading.contains(path)
    }

    /// Mark `path` as in flight. Returns `false` if it already was.
    pub fn begin(&mut self, path: &str) -> bool {
        self.loading.insert(path.to_string())
    }

    /// Record the answer for `path` and drop its in-flight flag.
    pub fn insert(&mut self, path: &str, hosts: Vec<String>) {
        self.loading.remove(path);
        self.hosts.insert(path.to_string(), hosts);
    }

    /// Drop the in-flight flag without recording an answer.
    pub fn abandon(&mut self, path: &str) {
        self.loading.remove(path);
    }

    pub fn clear(&mut self) {
        self.hosts.clear();
        self.loading.clear();
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfetched_vs_zero_replicas() {
        let mut cache = StorageLocationCache::new();
        assert_eq!(cache.lookup("/a"), StorageLookup::Unfetched);

        cache.insert("/a", vec![]);
        assert_eq!(cache.lookup("/a"), StorageLookup::Fetched(&[]));
        assert!(cache.contains("/a"));
        assert_eq!(cache.get("/a"), Some(&[][..]));
        assert_eq!(cache.get("/b"), None);
    }

    #[test]
    fn test_loading_lifecycle() {
        let mut cache = StorageLocationCache::new();
        assert!(cache.begin("/a"));
        assert!(!cache.begin("/a"));
        assert_eq!(cache.lookup("/a"), StorageLookup::Loading);

        cache.insert("/a", vec!["dn1".to_string()]);
        assert!(!cache.is_loading("/a"));
        assert_eq!(cache.get("/a").unwrap(), &["dn1".to_string()]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut cache = StorageLocationCache::new();
        cache.insert("/a", vec!["dn1".to_string()]);
        cache.begin("/b");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.lookup("/b"), StorageLookup::Unfetched);
    }
}
