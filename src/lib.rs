//! In-memory ordered key/value index with O(log n) rank queries.
//!
//! Entries are ordered by value and then by key, so equal values are broken
//! deterministically. Besides insertion, deletion and point lookups the index
//! answers "what is the 1-based rank of this key" and "which entries occupy
//! this rank window", which is what a live leaderboard needs.
//!
//! ```
//! use ranklist::RankList;
//!
//! let board = RankList::new();
//! board.set("ann", 30);
//! board.set("bob", 10);
//! board.set("cid", 20);
//!
//! assert_eq!(board.rank(&"bob"), Some(1));
//! assert_eq!(board.rank(&"ann"), Some(3));
//!
//! let top: Vec<_> = board.range(1, 3).into_iter().map(|e| e.key).collect();
//! assert_eq!(top, vec!["bob", "cid"]);
//! ```
//!
//! `SkipList` is the unsynchronized structure; `RankList` wraps it in a
//! single reader/writer lock for shared use.

mod config;
mod error;
mod iter;
mod level_control;
mod node;
mod ranklist;
mod skiplist;

pub use config::{Config, MAX_LEVEL, MAX_LEVEL_LIMIT, PROBABILITY};
pub use error::ConfigError;
pub use iter::Iter;
pub use level_control::{GeometricGenerator, LevelControl};
pub use node::Entry;
pub use ranklist::RankList;
pub use skiplist::SkipList;
