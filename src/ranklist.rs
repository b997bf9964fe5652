use std::fmt;
use std::hash::Hash;

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::ConfigError;
use crate::level_control::LevelControl;
use crate::node::Entry;
use crate::skiplist::SkipList;

/// A ranked index that can be shared between threads.
///
/// One reader/writer lock guards the whole list. `set`, `del` and `clear`
/// hold it exclusively; every other call holds it shared, so reads run in
/// parallel with each other but never with a mutation. Results are returned
/// by value because no guard outlives the call.
pub struct RankList<K, V> {
    inner: RwLock<SkipList<K, V>>,
}

impl<K, V> RankList<K, V> {
    /// An empty list with the default configuration.
    pub fn new() -> Self {
        Self::from_list(SkipList::default())
    }

    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        Ok(Self::from_list(SkipList::with_config(config)?))
    }

    /// Uses `generator` to pick node levels, e.g. a seeded one for
    /// reproducible layouts.
    pub fn with_generator<G>(generator: G) -> Self
    where
        G: LevelControl + Send + Sync + 'static,
    {
        Self::from_list(SkipList::new(Box::new(generator)))
    }

    fn from_list(list: SkipList<K, V>) -> Self {
        RankList {
            inner: RwLock::new(list),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn level(&self) -> usize {
        self.inner.read().level()
    }

    pub fn max_level(&self) -> usize {
        self.inner.read().max_level()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl<K, V> RankList<K, V>
where
    K: Ord + Hash + Clone,
    V: Ord + Clone,
{
    /// Inserts or updates `key`. An update re-ranks the entry by its new value.
    pub fn set(&self, key: K, value: V) {
        self.inner.write().set(key, value);
    }

    /// Removes `key`, returning whether it was present.
    pub fn del(&self, key: &K) -> bool {
        self.inner.write().del(key)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    /// 1-based rank of `key`, ordering by value and then by key.
    pub fn rank(&self, key: &K) -> Option<usize> {
        self.inner.read().rank(key)
    }

    /// Entries in the rank window `start..end`; see `SkipList::range`.
    pub fn range(&self, start: usize, end: usize) -> Vec<Entry<K, V>> {
        self.inner.read().range(start, end).cloned().collect()
    }

    pub fn by_rank(&self, rank: usize) -> Option<Entry<K, V>> {
        self.inner.read().by_rank(rank).cloned()
    }

    pub fn first(&self) -> Option<Entry<K, V>> {
        self.inner.read().first().cloned()
    }

    pub fn last(&self) -> Option<Entry<K, V>> {
        self.inner.read().last().cloned()
    }

    /// Snapshot of every entry in rank order.
    pub fn entries(&self) -> Vec<Entry<K, V>> {
        self.inner.read().iter().cloned().collect()
    }
}

impl<K, V> Default for RankList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RankList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner.read(), f)
    }
}
