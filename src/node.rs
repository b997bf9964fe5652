use std::cmp::Ordering;

/// Position of a node inside the list's arena.
pub(crate) type NodeId = usize;

/// Forward link at one tier; `None` marks the tail.
pub(crate) type Link = Option<NodeId>;

/// A key paired with the value it is ranked by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Entry<K, V> {
        Entry { key, value }
    }
}

impl<K: Ord, V: Ord> Entry<K, V> {
    /// Index order: value ascending, ties broken by key ascending.
    pub(crate) fn order(&self, value: &V, key: &K) -> Ordering {
        self.value.cmp(value).then_with(|| self.key.cmp(key))
    }
}

/// The sentinel at the head of every tier. It is allocated at the maximum
/// level and never holds an entry.
#[derive(Debug)]
pub(crate) struct Head {
    pub forward: Vec<Link>,
}

impl Head {
    pub fn new(max_level: usize) -> Head {
        Head {
            forward: vec![None; max_level],
        }
    }

    pub fn clear(&mut self) {
        for link in self.forward.iter_mut() {
            *link = None;
        }
    }
}

/// A data node. `forward[i]` is the successor at tier `i`, and `span[i]` is
/// the number of rank positions gained by reaching this node through its
/// predecessor at tier `i` (always 1 at tier 0).
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub entry: Entry<K, V>,
    pub forward: Vec<Link>,
    pub span: Vec<usize>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V, level: usize) -> Node<K, V> {
        debug_assert!(level >= 1);

        Node {
            entry: Entry::new(key, value),
            forward: vec![None; level],
            span: vec![0; level],
        }
    }

    /// Number of tiers this node participates in.
    #[inline(always)]
    pub fn level(&self) -> usize {
        self.forward.len()
    }

    /// Successor at `tier`, or `None` past the tail or above this node's level.
    #[inline(always)]
    pub fn next(&self, tier: usize) -> Link {
        self.forward.get(tier).copied().flatten()
    }
}
