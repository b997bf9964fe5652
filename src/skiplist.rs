use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use log::{debug, trace};
use rand::rngs::StdRng;

use crate::config::Config;
use crate::error::ConfigError;
use crate::iter::Iter;
use crate::level_control::{GeometricGenerator, LevelControl};
use crate::node::{Entry, Head, Link, Node, NodeId};

/// Where a walk currently stands: on the header or on a data node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(NodeId),
}

/// Ordered index over `(value, key)` with O(log n) rank queries.
///
/// Nodes live in an arena and link to each other by index. Every node keeps,
/// per tier, the number of rank positions its incoming link covers, so rank
/// can be accumulated while descending instead of counting along tier 0.
///
/// This type is not synchronized; see `RankList` for the shared version.
pub struct SkipList<K, V> {
    /// Sentinel at the start of every tier. Allocated at `max_level_` and
    /// never holds an entry, so searches can always start from it.
    head_: Head,

    /// Node storage. A `None` slot has been released and is listed in `free_`.
    nodes_: Vec<Option<Node<K, V>>>,
    free_: Vec<NodeId>,

    /// Key to node, kept in lock-step with list membership.
    dict_: HashMap<K, NodeId>,

    /// Number of entries.
    length_: usize,

    /// Highest tier currently in use; 1 when empty.
    level_: usize,

    /// Cached from `controller_` so the hot paths avoid a virtual call.
    max_level_: usize,

    /// Used to generate the level of each inserted node. Only `set` calls it.
    controller_: Box<dyn LevelControl + Send + Sync>,
}

impl<K, V> SkipList<K, V> {
    pub fn new(controller: Box<dyn LevelControl + Send + Sync>) -> SkipList<K, V> {
        let max_level = std::cmp::max(controller.max_level(), 1);
        debug!("creating skip list with max_level={}", max_level);

        SkipList {
            head_: Head::new(max_level),
            nodes_: Vec::new(),
            free_: Vec::new(),
            dict_: HashMap::new(),
            length_: 0,
            level_: 1,
            max_level_: max_level,
            controller_: controller,
        }
    }

    pub fn with_config(config: Config) -> Result<SkipList<K, V>, ConfigError> {
        let generator = GeometricGenerator::from_entropy(config)?;
        Ok(SkipList::new(Box::new(generator)))
    }

    /// Returns the number of entries stored in the structure.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.length_
    }

    /// Returns `true` if there are no entries stored within the structure.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.length_ == 0
    }

    /// Highest tier currently populated.
    #[inline(always)]
    pub fn level(&self) -> usize {
        self.level_
    }

    #[inline(always)]
    pub fn max_level(&self) -> usize {
        self.max_level_
    }

    /// Removes all entries. Arena capacity is released as well.
    pub fn clear(&mut self) {
        debug!("clearing skip list with {} entries", self.length_);
        self.head_.clear();
        self.nodes_ = Vec::new();
        self.free_ = Vec::new();
        self.dict_.clear();
        self.length_ = 0;
        self.level_ = 1;
    }

    /// Entries in ascending `(value, key)` order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self, self.head_.forward[0], self.length_)
    }

    /// The lowest-ranked entry.
    pub fn first(&self) -> Option<&Entry<K, V>> {
        self.head_.forward[0].map(|id| &self.node(id).entry)
    }

    /// The highest-ranked entry.
    pub fn last(&self) -> Option<&Entry<K, V>> {
        let mut current = Cursor::Head;

        for tier in (0..self.level_).rev() {
            while let Some(next) = self.next(current, tier) {
                current = Cursor::Node(next);
            }
        }

        match current {
            Cursor::Head => None,
            Cursor::Node(id) => Some(&self.node(id).entry),
        }
    }

    /// The entry at 1-based `rank`.
    pub fn by_rank(&self, rank: usize) -> Option<&Entry<K, V>> {
        if rank == 0 || rank > self.length_ {
            return None;
        }

        self.seek(rank).map(|id| &self.node(id).entry)
    }

    /// Entries for the position window `start..end`, walking from rank
    /// `max(start, 1)`. Position 0 and position 1 both denote the first entry,
    /// so `range(0, n)` yields up to `n` entries and `range(1, n)` up to `n - 1`.
    ///
    /// Empty if `start >= end` or `start` lies past the end of the list.
    pub fn range(&self, start: usize, end: usize) -> Iter<'_, K, V> {
        if start >= end || start > self.length_ {
            return Iter::empty(self);
        }

        Iter::new(self, self.seek(std::cmp::max(start, 1)), end - start)
    }

    /// Node with 1-based `rank`, or `None` past the tail.
    fn seek(&self, rank: usize) -> Link {
        let mut traversed = 0;
        let mut current = Cursor::Head;

        for tier in (0..self.level_).rev() {
            while let Some(next) = self.next(current, tier) {
                let span = self.node(next).span[tier];
                if traversed + span >= rank {
                    break;
                }

                traversed += span;
                current = Cursor::Node(next);
            }
        }

        self.next(current, 0)
    }

    #[inline(always)]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        match self.nodes_[id] {
            Some(ref node) => node,
            None => panic!("skip list corrupted: link to released node {}", id),
        }
    }

    #[inline(always)]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.nodes_[id] {
            Some(ref mut node) => node,
            None => panic!("skip list corrupted: link to released node {}", id),
        }
    }

    #[inline(always)]
    fn next(&self, at: Cursor, tier: usize) -> Link {
        match at {
            Cursor::Head => self.head_.forward[tier],
            Cursor::Node(id) => self.node(id).next(tier),
        }
    }

    #[inline(always)]
    fn link(&mut self, at: Cursor, tier: usize, destination: Link) {
        match at {
            Cursor::Head => self.head_.forward[tier] = destination,
            Cursor::Node(id) => self.node_mut(id).forward[tier] = destination,
        }
    }

    fn allocate_node(&mut self, key: K, value: V, level: usize) -> NodeId {
        let node = Node::new(key, value, level);

        match self.free_.pop() {
            Some(id) => {
                self.nodes_[id] = Some(node);
                id
            }
            None => {
                self.nodes_.push(Some(node));
                self.nodes_.len() - 1
            }
        }
    }

    fn free_node(&mut self, id: NodeId) -> Node<K, V> {
        match self.nodes_[id].take() {
            Some(node) => {
                self.free_.push(id);
                node
            }
            None => panic!("skip list corrupted: node {} released twice", id),
        }
    }
}

impl<K: Ord + Hash + Clone, V: Ord> SkipList<K, V> {
    /// For each tier, finds the last node ordered strictly before
    /// `(value, key)`, together with that node's rank.
    fn find_predecessors(&self, value: &V, key: &K) -> (Vec<Cursor>, Vec<usize>) {
        let mut updates = vec![Cursor::Head; self.max_level_];
        let mut ranks = vec![0; self.max_level_];

        let mut current = Cursor::Head;
        let mut rank = 0;
        for tier in (0..self.level_).rev() {
            while let Some(next) = self.next(current, tier) {
                let node = self.node(next);
                if node.entry.order(value, key) == Ordering::Less {
                    rank += node.span[tier];
                    current = Cursor::Node(next);
                } else {
                    break;
                }
            }

            updates[tier] = current;
            ranks[tier] = rank;
        }

        (updates, ranks)
    }

    /// Inserts `key` with `value`, replacing any previous value. Because the
    /// value decides the position, an existing key is unlinked first and
    /// inserted again at its new place.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(&id) = self.dict_.get(&key) {
            if self.node(id).entry.value == value {
                trace!("set: value unchanged, keeping node {}", id);
                return;
            }

            self.unlink(id);
        }

        let level = self.controller_.random_level().clamp(1, self.max_level_);
        let (updates, ranks) = self.find_predecessors(&value, &key);

        // Tiers above the current level start from the header with rank 0,
        // which is what `find_predecessors` leaves there.
        if level > self.level_ {
            debug!("raising level from {} to {}", self.level_, level);
            self.level_ = level;
        }

        let position = ranks[0] + 1;
        let id = self.allocate_node(key.clone(), value, level);
        trace!("set: node {} at rank {} with level {}", id, position, level);

        for tier in 0..level {
            let successor = self.next(updates[tier], tier);
            let span = position - ranks[tier];

            {
                let node = self.node_mut(id);
                node.forward[tier] = successor;
                node.span[tier] = span;
            }
            self.link(updates[tier], tier, Some(id));

            // The successor is now reached from the new node, which covers
            // `span` of the positions it used to cover, plus one for itself.
            if let Some(successor) = successor {
                let covered = &mut self.node_mut(successor).span[tier];
                *covered = *covered + 1 - span;
            }
        }

        // Links passing over the new node now cover one more position.
        for tier in level..self.level_ {
            if let Some(successor) = self.next(updates[tier], tier) {
                self.node_mut(successor).span[tier] += 1;
            }
        }

        self.length_ += 1;
        self.dict_.insert(key, id);
    }

    /// Removes `key`. Returns `false`, touching nothing, if it was absent.
    pub fn del(&mut self, key: &K) -> bool {
        match self.dict_.get(key) {
            Some(&id) => {
                self.unlink(id);
                true
            }
            None => false,
        }
    }

    fn unlink(&mut self, id: NodeId) -> Entry<K, V> {
        let (updates, _) = {
            let entry = &self.node(id).entry;
            self.find_predecessors(&entry.value, &entry.key)
        };

        for tier in 0..self.level_ {
            match self.next(updates[tier], tier) {
                Some(next) if next == id => {
                    let (successor, span) = {
                        let node = self.node(id);
                        (node.forward[tier], node.span[tier])
                    };
                    self.link(updates[tier], tier, successor);

                    if let Some(successor) = successor {
                        self.node_mut(successor).span[tier] += span - 1;
                    }
                }
                // The target sits below this tier, under the link into `next`.
                Some(next) => {
                    debug_assert!(tier >= self.node(id).level());
                    self.node_mut(next).span[tier] -= 1;
                }
                // Nothing past the predecessor at this tier, so no span covers
                // the target here.
                None => {}
            }
        }

        let previous_level = self.level_;
        while self.level_ > 1 && self.head_.forward[self.level_ - 1].is_none() {
            self.level_ -= 1;
        }
        if self.level_ != previous_level {
            debug!("shrinking level from {} to {}", previous_level, self.level_);
        }

        let node = self.free_node(id);
        self.dict_.remove(&node.entry.key);
        self.length_ -= 1;
        trace!("del: released node {}", id);
        node.entry
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.dict_.get(key).map(|&id| &self.node(id).entry.value)
    }

    #[inline(always)]
    pub fn contains_key(&self, key: &K) -> bool {
        self.dict_.contains_key(key)
    }

    /// 1-based position of `key` under `(value, key)` order.
    pub fn rank(&self, key: &K) -> Option<usize> {
        let &id = self.dict_.get(key)?;
        let target = &self.node(id).entry;

        let mut rank = 0;
        let mut current = Cursor::Head;
        for tier in (0..self.level_).rev() {
            while let Some(next) = self.next(current, tier) {
                let node = self.node(next);
                match node.entry.order(&target.value, &target.key) {
                    Ordering::Less => {
                        rank += node.span[tier];
                        current = Cursor::Node(next);
                    }
                    // The link into the target still counts its own position.
                    Ordering::Equal => return Some(rank + node.span[tier]),
                    Ordering::Greater => break,
                }
            }
        }

        panic!("skip list corrupted: indexed node {} is not linked", id);
    }
}

impl<K, V> Default for SkipList<K, V> {
    fn default() -> Self {
        SkipList::new(Box::new(GeometricGenerator::<StdRng>::default()))
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SkipList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|entry| (&entry.key, &entry.value)))
            .finish()
    }
}

#[cfg(test)]
impl<K: Ord + Hash + Clone, V: Ord> SkipList<K, V> {
    /// Asserts every structural invariant: ordering, spans at every tier,
    /// level bounds, and agreement between the lookup table and the list.
    pub(crate) fn check_invariants(&self) {
        assert!(self.level_ >= 1 && self.level_ <= self.max_level_);
        if self.length_ == 0 {
            assert_eq!(self.level_, 1);
        } else {
            assert!(self.head_.forward[self.level_ - 1].is_some());
        }
        for tier in self.level_..self.max_level_ {
            assert!(self.head_.forward[tier].is_none());
        }

        let mut positions = HashMap::new();
        let mut position = 0;
        let mut previous: Option<&Entry<K, V>> = None;
        let mut current = self.head_.forward[0];
        while let Some(id) = current {
            let node = self.node(id);
            position += 1;

            assert!(node.level() >= 1 && node.level() <= self.level_);
            assert_eq!(node.span[0], 1);
            if let Some(previous) = previous {
                assert_eq!(
                    previous.order(&node.entry.value, &node.entry.key),
                    Ordering::Less
                );
            }
            assert_eq!(self.dict_.get(&node.entry.key), Some(&id));

            positions.insert(id, position);
            previous = Some(&node.entry);
            current = node.next(0);
        }

        assert_eq!(position, self.length_);
        assert_eq!(self.dict_.len(), self.length_);
        assert_eq!(
            self.nodes_.iter().filter(|slot| slot.is_some()).count(),
            self.length_
        );
        for &id in &self.free_ {
            assert!(self.nodes_[id].is_none());
        }

        for tier in 1..self.level_ {
            let mut reached = 0;
            let mut current = self.head_.forward[tier];
            while let Some(id) = current {
                let node = self.node(id);
                let here = positions[&id];
                assert!(node.level() > tier);
                assert_eq!(node.span[tier], here - reached, "span at tier {}", tier);

                reached = here;
                current = node.next(tier);
            }
        }
    }
}
