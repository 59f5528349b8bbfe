use avltree::Map;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::*;
use std::collections::BTreeMap;

/// Picks the entry a removal takes out of a map.
trait Take<K: Ord> {
    fn take<V>(&self, map: &mut Map<K, V>) -> Option<(K, V)>;
}

#[derive(Clone, Debug)]
struct ByKey<K>(K);

#[derive(Clone, Debug)]
struct Smallest;

#[derive(Clone, Debug)]
struct Largest;

/// The greatest key under a bound, which counts itself when the flag is set.
#[derive(Clone, Debug)]
struct Below<K>(K, bool);

/// The least key over a bound, which counts itself when the flag is set.
#[derive(Clone, Debug)]
struct Above<K>(K, bool);

impl<K: Ord> Take<K> for ByKey<K> {
    fn take<V>(&self, map: &mut Map<K, V>) -> Option<(K, V)> { map.remove(&self.0) }
}

impl<K: Ord> Take<K> for Smallest {
    fn take<V>(&self, map: &mut Map<K, V>) -> Option<(K, V)> { map.remove_first() }
}

impl<K: Ord> Take<K> for Largest {
    fn take<V>(&self, map: &mut Map<K, V>) -> Option<(K, V)> { map.remove_last() }
}

impl<K: Ord> Take<K> for Below<K> {
    fn take<V>(&self, map: &mut Map<K, V>) -> Option<(K, V)> { map.remove_pred(&self.0, self.1) }
}

impl<K: Ord> Take<K> for Above<K> {
    fn take<V>(&self, map: &mut Map<K, V>) -> Option<(K, V)> { map.remove_succ(&self.0, self.1) }
}

impl<K: Arbitrary> Arbitrary for ByKey<K> {
    fn arbitrary(gen: &mut Gen) -> Self { ByKey(K::arbitrary(gen)) }
    fn shrink(&self) -> Box<dyn Iterator<Item=Self>> { Box::new(self.0.shrink().map(ByKey)) }
}

impl Arbitrary for Smallest {
    fn arbitrary(_: &mut Gen) -> Self { Smallest }
}

impl Arbitrary for Largest {
    fn arbitrary(_: &mut Gen) -> Self { Largest }
}

macro_rules! bounded_arbitrary {
    ($($T:ident),*) => {$(
        impl<K: Arbitrary> Arbitrary for $T<K> {
            fn arbitrary(gen: &mut Gen) -> Self { $T(K::arbitrary(gen), bool::arbitrary(gen)) }

            fn shrink(&self) -> Box<dyn Iterator<Item=Self>> {
                let inclusive = self.1;
                Box::new(self.0.shrink().map(move |key| $T(key, inclusive)))
            }
        }
    )*}
}

bounded_arbitrary!{Below, Above}

/// Properties every removal must have, whichever entry it picks.
macro_rules! removal_laws {
    ($how:ty, $K:ty, $V:ty) => {
        mod removal {
            use avltree::Map;
            use quickcheck::TestResult;
            use quickcheck_macros::*;
            use crate::Take;

            #[quickcheck]
            fn taken_key_is_gone(mut map: Map<$K, $V>, how: $how) -> TestResult {
                let Some((key, _)) = how.take(&mut map) else { return TestResult::discard() };

                TestResult::from_bool(
                    !map.contains_key(&key) &&
                    map.get_mut(&key).is_none() &&
                    map.iter().all(|(k, _)| *k != key)
                )
            }

            #[quickcheck]
            fn taken_entry_was_stored(mut map: Map<$K, $V>, how: $how) -> bool {
                let before = map.clone();

                match how.take(&mut map) {
                    Some((key, value)) => before.get(&key) == Some(&value),
                    None => map == before,
                }
            }

            #[quickcheck]
            fn others_survive(mut map: Map<$K, $V>, how: $how) -> bool {
                let before: Vec<($K, $V)> = map.iter().map(|(k, v)| (*k, *v)).collect();
                let taken = how.take(&mut map).map(|(k, _)| k);

                map.into_iter().eq(before.into_iter().filter(|&(k, _)| Some(k) != taken))
            }

            #[quickcheck]
            fn len_tracks_removal(mut map: Map<$K, $V>, how: $how) -> bool {
                let len = map.len();
                let removed = how.take(&mut map).is_some() as usize;
                map.len() + removed == len
            }

            #[quickcheck]
            fn stays_balanced(mut map: Map<$K, $V>, how: $how) -> bool {
                how.take(&mut map);
                map.is_balanced()
            }
        }
    }
}

/// Properties of `insert` for keys of type `$K`.
macro_rules! insertion_laws {
    ($K:ty, $V:ty) => {
        mod insertion {
            use avltree::Map;
            use quickcheck_macros::*;

            #[quickcheck]
            fn len_grows_only_for_new_keys(mut map: Map<$K, $V>, key: $K, value: $V) -> bool {
                let fresh = !map.contains_key(&key);
                let len = map.len();
                map.insert(key, value);
                map.len() == len + fresh as usize
            }

            #[quickcheck]
            fn value_is_readable(mut map: Map<$K, $V>, key: $K, value: $V) -> bool {
                map.insert(key, value);

                map.get(&key) == Some(&value) &&
                map[&key] == value &&
                map.iter().filter(|(k, _)| **k == key).count() == 1
            }

            #[quickcheck]
            fn displaced_value_is_returned(mut map: Map<$K, $V>, key: $K, value: $V) -> bool {
                let previous = map.get(&key).copied();
                map.insert(key, value) == previous
            }

            #[quickcheck]
            fn other_entries_untouched(mut map: Map<$K, $V>, key: $K, value: $V) -> bool {
                let mut expected: Vec<($K, $V)> = map.iter()
                    .map(|(k, v)| (*k, *v))
                    .filter(|&(k, _)| k != key)
                    .collect();

                map.insert(key, value);
                let at = expected.partition_point(|&(k, _)| k < key);
                expected.insert(at, (key, value));

                map.into_iter().eq(expected)
            }

            #[quickcheck]
            fn stays_balanced(mut map: Map<$K, $V>, key: $K, value: $V) -> bool {
                map.insert(key, value);
                map.is_balanced()
            }
        }
    }
}

mod by_key {
    insertion_laws!{u32, u16}
    removal_laws!{crate::ByKey<u32>, u32, u16}
}

// Few distinct keys, so overwrites and hits are common.
mod by_key_dense {
    insertion_laws!{u8, u8}
    removal_laws!{crate::ByKey<u8>, u8, u8}
}

mod smallest {
    use avltree::Map;
    use quickcheck_macros::*;

    #[quickcheck]
    fn first_heads_the_walk(map: Map<u32, u16>) -> bool { map.first() == map.iter().next() }

    removal_laws!{crate::Smallest, u32, u16}
}

mod largest {
    use avltree::Map;
    use quickcheck_macros::*;

    #[quickcheck]
    fn last_ends_the_walk(map: Map<u32, u16>) -> bool { map.last() == map.iter().last() }

    removal_laws!{crate::Largest, u32, u16}
}

mod below {
    use avltree::Map;
    use quickcheck_macros::*;

    #[quickcheck]
    fn matches_linear_scan(map: Map<u32, u16>, bound: u32, inclusive: bool) -> bool {
        let scan = map.iter()
            .filter(|(k, _)| if inclusive { **k <= bound } else { **k < bound })
            .last();

        map.pred(&bound, inclusive) == scan
    }

    #[quickcheck]
    fn mutable_lookup_finds_the_same_entry(mut map: Map<u32, u16>, bound: u32) -> bool {
        let expected = map.pred(&bound, true).map(|(k, v)| (*k, *v));
        map.pred_mut(&bound, true).map(|(k, v)| (*k, *v)) == expected
    }

    removal_laws!{crate::Below<u32>, u32, u16}
}

mod above {
    use avltree::Map;
    use quickcheck_macros::*;

    #[quickcheck]
    fn matches_linear_scan(map: Map<u32, u16>, bound: u32, inclusive: bool) -> bool {
        let scan = map.iter().find(|(k, _)| if inclusive { **k >= bound } else { **k > bound });
        map.succ(&bound, inclusive) == scan
    }

    #[quickcheck]
    fn mutable_lookup_finds_the_same_entry(mut map: Map<u32, u16>, bound: u32) -> bool {
        let expected = map.succ(&bound, false).map(|(k, v)| (*k, *v));
        map.succ_mut(&bound, false).map(|(k, v)| (*k, *v)) == expected
    }

    removal_laws!{crate::Above<u32>, u32, u16}
}

mod iteration {
    use avltree::Map;
    use quickcheck_macros::*;
    use std::iter;

    #[quickcheck]
    fn keys_strictly_increase(map: Map<u32, u16>) -> bool {
        let keys: Vec<u32> = map.iter().map(|(k, _)| *k).collect();
        keys.windows(2).all(|pair| pair[0] < pair[1])
    }

    #[quickcheck]
    fn backwards_mirrors_forwards(map: Map<u32, u16>) -> bool {
        let mut forwards: Vec<_> = map.iter().collect();
        forwards.reverse();
        map.iter().rev().eq(forwards)
    }

    #[quickcheck]
    fn remaining_len_is_exact(map: Map<u32, u16>) -> bool {
        let mut it = map.iter();

        (0..=map.len()).rev().all(|left| {
            let exact = it.len() == left && it.size_hint() == (left, Some(left));
            it.next();
            exact
        })
    }

    #[quickcheck]
    fn both_ends_cover_each_entry_once(map: Map<u32, u16>, turns: Vec<bool>) -> bool {
        let mut it = map.iter();
        let mut front = vec![];
        let mut back = vec![];

        for from_front in turns.into_iter().chain(iter::repeat(true)) {
            let entry = if from_front { it.next() } else { it.next_back() };

            match entry {
                Some(entry) if from_front => front.push(entry),
                Some(entry) => back.push(entry),
                None => break,
            }
        }

        front.extend(back.into_iter().rev());
        map.iter().eq(front)
    }

    #[quickcheck]
    fn owning_and_mutable_walks_agree(mut map: Map<u32, u16>) -> bool {
        let shared: Vec<(u32, u16)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let mutable: Vec<(u32, u16)> = map.iter_mut().map(|(k, v)| (*k, *v)).collect();
        let reversed: Vec<(u32, u16)> = map.clone().into_iter().rev().collect();

        mutable == shared && reversed.into_iter().rev().eq(map.into_iter())
    }

    #[quickcheck]
    fn mutable_walk_writes_through(mut map: Map<u32, u16>) -> bool {
        let expected: Vec<(u32, u16)> = map.iter().map(|(k, v)| (*k, v.wrapping_mul(3))).collect();
        for (_, v) in &mut map { *v = v.wrapping_mul(3); }
        map.into_iter().eq(expected)
    }
}

#[derive(Clone, Debug)]
enum Step {
    Put(u8, u8),
    Drop(u8),
    Lookup(u8),
    PopFirst,
    PopLast,
}

impl Arbitrary for Step {
    fn arbitrary(gen: &mut Gen) -> Self {
        let key = u8::arbitrary(gen);

        match u8::arbitrary(gen) % 5 {
            0 | 1 => Step::Put(key, u8::arbitrary(gen)),
            2 => Step::Drop(key),
            3 => Step::Lookup(key),
            _ if bool::arbitrary(gen) => Step::PopFirst,
            _ => Step::PopLast,
        }
    }
}

#[quickcheck]
fn behaves_like_btree_map(steps: Vec<Step>) -> bool {
    let mut map = Map::new();
    let mut model = BTreeMap::new();

    steps.into_iter().all(|step| {
        let same = match step {
            Step::Put(k, v) => map.insert(k, v) == model.insert(k, v),
            Step::Drop(k) => map.remove(&k) == model.remove_entry(&k),
            Step::Lookup(k) => map.get(&k) == model.get(&k),
            Step::PopFirst => map.remove_first() == model.pop_first(),
            Step::PopLast => map.remove_last() == model.pop_last(),
        };

        same && map.is_balanced() && map.len() == model.len()
    }) && map.iter().eq(model.iter())
}

#[quickcheck]
fn height_within_avl_bound(keys: Vec<u16>) -> bool {
    let map: Map<u16, ()> = keys.into_iter().map(|k| (k, ())).collect();

    // The sparsest AVL tree of height h is a Fibonacci tree.
    let limit = 1.4405 * ((map.len() + 2) as f64).log2() - 0.3277;
    (map.height() as f64) <= limit
}

#[quickcheck]
fn clone_matches_original(map: Map<u32, u16>) -> bool {
    let copy = map.clone();
    copy == map && copy.height() == map.height() && copy.iter().eq(map.iter())
}

#[quickcheck]
fn clear_resets_everything(mut map: Map<u32, u16>) -> bool {
    map.clear();
    map.is_empty() && map.len() == 0 && map.first().is_none() && map.height() == 0
}
