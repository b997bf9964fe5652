use std::collections::BTreeSet;

use rand::Rng;
use ranklist::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn seeded<K, V>(seed: u64) -> RankList<K, V> {
    init_logging();
    RankList::with_generator(GeometricGenerator::seeded(Config::default(), seed).unwrap())
}

fn leaderboard() -> RankList<i32, i32> {
    let list = seeded(100);
    list.set(1, 100);
    list.set(2, 120);
    list.set(3, 150);
    list.set(4, 180);
    list.set(5, 200);
    list
}

fn pairs(entries: Vec<Entry<i32, i32>>) -> Vec<(i32, i32)> {
    entries.into_iter().map(|e| (e.key, e.value)).collect()
}

#[test]
fn new() {
    let list: RankList<i32, i32> = Default::default();
    assert_eq!(list.len(), 0);
    assert!(list.is_empty());
    assert_eq!(list.level(), 1);
}

#[test]
fn set_and_get() {
    let list = seeded(1);
    list.set("a", 1);
    list.set("b", 2);
    list.set("c", 3);

    assert_eq!(list.get(&"a"), Some(1));
    assert_eq!(list.get(&"b"), Some(2));
    assert_eq!(list.get(&"c"), Some(3));
    assert_eq!(list.get(&"d"), None);
}

#[test]
fn update_replaces_value() {
    let list = seeded(2);
    list.set(1, 100);
    list.set(1, 200);
    assert_eq!(list.get(&1), Some(200));
    assert_eq!(list.len(), 1);
}

#[test]
fn del_existing_and_missing() {
    let list = seeded(3);
    list.set(1, 100);
    list.set(2, 200);
    list.set(2, 300);

    assert!(list.del(&1));
    assert_eq!(list.get(&1), None);
    assert!(!list.del(&3));
    assert_eq!(list.len(), 1);
    assert_eq!(list.get(&2), Some(300));
}

#[test]
fn ties_broken_by_key() {
    let list = seeded(4);
    list.set("a", 1);
    list.set("b", 2);
    list.set("c", 3);
    list.set("d", 3);

    assert_eq!(list.rank(&"a"), Some(1));
    assert_eq!(list.rank(&"b"), Some(2));
    assert_eq!(list.rank(&"c"), Some(3));
    assert_eq!(list.rank(&"d"), Some(4));
    assert_eq!(list.rank(&"x"), None);
}

#[test]
fn ranks_ascend_with_value() {
    let list = seeded(5);
    for i in 0..1000 {
        list.set(i, i);
    }

    for i in 0..1000 {
        assert_eq!(list.rank(&i), Some(i as usize + 1));
    }
}

#[test]
fn rank_after_transient_inserts() {
    let list = seeded(6);
    let expected = [("a", 1, 1), ("b", 2, 2), ("d", 3, 3), ("e", 4, 4), ("g", 6, 5), ("h", 7, 6)];
    for &(key, value, _) in &expected {
        list.set(key, value);
    }

    list.set("c", 3);
    list.del(&"c");
    list.set("f", 5);
    list.del(&"f");

    for &(key, _, rank) in &expected {
        assert_eq!(list.rank(&key), Some(rank), "key {}", key);
    }
}

#[test]
fn set_then_del_leaves_nothing() {
    let list = seeded(7);
    list.set(1, 100);
    assert!(list.del(&1));
    assert_eq!(list.get(&1), None);
    assert_eq!(list.rank(&1), None);
    assert!(list.is_empty());
}

#[test]
fn round_trip_restores_length() {
    let list = seeded(8);
    for i in 0..50 {
        list.set(i, i * 3 % 17);
    }
    let before = list.len();

    list.set(999, 4);
    assert!(list.del(&999));
    assert_eq!(list.get(&999), None);
    assert_eq!(list.len(), before);
}

#[test]
fn repeated_set_is_idempotent() {
    let list = seeded(9);
    for i in 0..20 {
        list.set(i, i % 5);
    }

    let rank = list.rank(&7);
    list.set(7, 2);
    list.set(7, 2);
    assert_eq!(list.get(&7), Some(2));
    assert_eq!(list.rank(&7), rank);
    assert_eq!(list.len(), 20);
}

#[test]
fn insert_then_delete_everything() {
    let list = seeded(10);
    assert_eq!(list.get(&1), None);
    assert!(!list.del(&1));

    for i in 0..1000 {
        list.set(i, i);
    }
    assert_eq!(list.len(), 1000);

    for i in 0..1000 {
        assert!(list.del(&i), "failed to delete {}", i);
    }
    assert_eq!(list.len(), 0);
    assert_eq!(list.level(), 1);
}

#[test]
fn range_simple() {
    assert_eq!(pairs(leaderboard().range(1, 3)), vec![(1, 100), (2, 120)]);
}

#[test]
fn range_full() {
    assert_eq!(
        pairs(leaderboard().range(0, 5)),
        vec![(1, 100), (2, 120), (3, 150), (4, 180), (5, 200)]
    );
}

#[test]
fn range_empty_window() {
    assert!(leaderboard().range(10, 10).is_empty());
}

#[test]
fn range_inverted_window() {
    assert!(leaderboard().range(3, 1).is_empty());
}

#[test]
fn range_end_past_tail() {
    assert_eq!(
        pairs(leaderboard().range(3, 10)),
        vec![(3, 150), (4, 180), (5, 200)]
    );
}

#[test]
fn range_start_past_tail() {
    assert!(leaderboard().range(6, 10).is_empty());
}

#[test]
fn range_on_empty_list() {
    let list: RankList<i32, i32> = seeded(11);
    assert!(list.range(0, 10).is_empty());
    assert!(list.range(1, 2).is_empty());
}

#[test]
fn range_grows_with_end() {
    let list = seeded(12);
    for i in 0..200 {
        list.set(i, (i * 37) % 101);
    }

    for start in &[0, 1, 17, 150] {
        let mut previous: Vec<Entry<i32, i32>> = Vec::new();
        for end in *start..=210 {
            let current = list.range(*start, end);
            assert!(current.len() >= previous.len());
            assert_eq!(&current[..previous.len()], &previous[..]);
            previous = current;
        }
    }
}

#[test]
fn by_rank_matches_rank() {
    let list = seeded(13);
    for i in 0..300 {
        list.set(i, (i * 7) % 50);
    }

    for i in 0..300 {
        let rank = list.rank(&i).unwrap();
        assert_eq!(list.by_rank(rank).map(|e| e.key), Some(i));
    }
    assert!(list.by_rank(0).is_none());
    assert!(list.by_rank(301).is_none());
}

#[test]
fn random_ops_match_ordered_model() {
    let mut rng = rand::thread_rng();
    let list = seeded(14);
    let mut values = std::collections::HashMap::new();
    let mut ordered = BTreeSet::new();

    for _ in 0..5000 {
        let key: u32 = rng.gen_range(0..500);
        if rng.gen_bool(0.3) {
            let removed = values.remove(&key);
            if let Some(value) = removed {
                ordered.remove(&(value, key));
            }
            assert_eq!(list.del(&key), removed.is_some());
        } else {
            let value: u32 = rng.gen_range(0..100);
            if let Some(old) = values.insert(key, value) {
                ordered.remove(&(old, key));
            }
            ordered.insert((value, key));
            list.set(key, value);
        }
    }

    assert_eq!(list.len(), ordered.len());
    for (index, &(value, key)) in ordered.iter().enumerate() {
        assert_eq!(list.get(&key), Some(value));
        assert_eq!(list.rank(&key), Some(index + 1));
    }

    let expected: Vec<(u32, u32)> = ordered.iter().map(|&(v, k)| (k, v)).collect();
    let actual: Vec<(u32, u32)> = list.entries().into_iter().map(|e| (e.key, e.value)).collect();
    assert_eq!(actual, expected);
}

#[test]
fn custom_config() {
    init_logging();
    let list = RankList::with_config(Config::new(4, 0.5)).unwrap();
    for i in 0..500 {
        list.set(i, 500 - i);
    }
    assert!(list.level() <= 4);
    assert_eq!(list.max_level(), 4);
    assert_eq!(list.rank(&499), Some(1));
    assert_eq!(list.rank(&0), Some(500));
}

#[test]
fn invalid_config_is_rejected() {
    assert_eq!(
        RankList::<i32, i32>::with_config(Config::new(0, 0.25)).err(),
        Some(ConfigError::ZeroMaxLevel)
    );
    assert!(RankList::<i32, i32>::with_config(Config::new(8, 1.0)).is_err());
}
