use crate::node::{Entry, Link};
use crate::skiplist::SkipList;

/// Ascending walk along tier 0, yielding at most `remaining` entries.
pub struct Iter<'a, K, V> {
    list_: &'a SkipList<K, V>,
    next_: Link,
    remaining_: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(list: &'a SkipList<K, V>, start: Link, limit: usize) -> Iter<'a, K, V> {
        Iter {
            list_: list,
            next_: start,
            remaining_: limit,
        }
    }

    pub(crate) fn empty(list: &'a SkipList<K, V>) -> Iter<'a, K, V> {
        Iter::new(list, None, 0)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining_ == 0 {
            return None;
        }

        let node = self.list_.node(self.next_?);
        self.next_ = node.next(0);
        self.remaining_ -= 1;
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining_))
    }
}
