//! `Map`, the public face of the AVL tree.
//!
//! Each entry lives in one arena node. Lookups descend from the root using the map's
//! comparator, and every insertion or removal leaves the tree with subtree heights that differ
//! by at most one at every node, so all of them stay logarithmic in the number of entries.

use compare::{Compare, Natural};
use log::trace;
use std::cmp::Ordering::{self, *};
use std::fmt::{self, Debug};
use std::hash::{self, Hash};
use std::iter;
use std::ops;
use super::node::{Left, Right, Tree};

pub use super::node::{IntoIter, Iter, IterMut};

/// A sorted key-value map kept height-balanced as an AVL tree.
///
/// `C` decides the key order. It defaults to the keys' own `Ord`, and any `compare::Compare`
/// implementation can be supplied through [`Map::with_cmp`](#method.with_cmp).
///
/// A key must not change its position in that order while it is stored. Interior mutability
/// could make that happen, and the map's behavior is then unspecified.
#[derive(Clone)]
pub struct Map<K, V, C = Natural<K>> where C: Compare<K> {
    tree: Tree<K, V>,
    cmp: C,
}

impl<K, V> Map<K, V> where K: Ord {
    /// Makes an empty map that sorts keys with their `Ord` implementation.
    ///
    /// ```
    /// let mut scores = avltree::Map::new();
    /// scores.insert("carol", 71);
    /// scores.insert("alice", 93);
    ///
    /// assert_eq!(scores.first(), Some((&"alice", &93)));
    /// ```
    pub fn new() -> Self { Map::with_cmp(compare::natural()) }
}

impl<K, V, C> Map<K, V, C> where C: Compare<K> {
    /// Makes an empty map that sorts keys with `cmp`.
    ///
    /// ```
    /// # extern crate compare;
    /// # extern crate avltree;
    /// # fn main() {
    /// use compare::{Compare, natural};
    ///
    /// let mut latest_first = avltree::Map::with_cmp(natural().rev());
    /// for year in [2019, 2023, 2021] { latest_first.insert(year, ()); }
    ///
    /// let years: Vec<_> = latest_first.iter().map(|(y, _)| *y).collect();
    /// assert_eq!(years, [2023, 2021, 2019]);
    /// # }
    /// ```
    pub fn with_cmp(cmp: C) -> Self { Map { tree: Tree::new(), cmp: cmp } }

    /// `true` when the map holds no entries.
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }

    /// The number of entries.
    pub fn len(&self) -> usize { self.tree.len() }

    /// The comparator that orders this map's keys.
    ///
    /// ```
    /// # extern crate compare;
    /// # extern crate avltree;
    /// # fn main() {
    /// use compare::{Compare, natural};
    ///
    /// let descending: avltree::Map<u8, (), _> = avltree::Map::with_cmp(natural().rev());
    /// assert!(descending.cmp().compares_lt(&9, &4));
    /// # }
    /// ```
    pub fn cmp(&self) -> &C { &self.cmp }

    /// Drops every entry and releases the node arena.
    pub fn clear(&mut self) { self.tree.clear(); }

    /// Stores `value` under `key`.
    ///
    /// A new key becomes a leaf, and the tree then rotates on the way back up wherever a
    /// subtree grew two levels taller than its sibling. An existing key keeps its node and only
    /// has its value swapped, and the displaced value is returned. That path never changes the
    /// shape of the tree.
    ///
    /// ```
    /// let mut stock = avltree::Map::new();
    /// assert_eq!(stock.insert("bolts", 40), None);
    /// assert_eq!(stock.insert("bolts", 35), Some(40));
    /// assert_eq!(stock[&"bolts"], 35);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.tree.insert(&self.cmp, key, value)
    }

    /// Takes the entry for `key` out of the map, or returns `None` if the key is absent.
    ///
    /// A node with two children first trades places with its in-order predecessor, so the
    /// node actually unlinked has at most one child. Rebalancing then climbs toward the root
    /// for as long as subtrees keep getting shorter.
    ///
    /// ```
    /// let mut map: avltree::Map<_, _> = (1..=7).map(|n| (n, n * n)).collect();
    ///
    /// assert_eq!(map.remove(&4), Some((4, 16)));
    /// assert_eq!(map.remove(&4), None);
    /// assert_eq!(map.len(), 6);
    /// assert!(map.is_balanced());
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        match self.tree.find(&self.cmp, key) {
            Some(node) => Some(self.tree.remove(node)),
            None => {
                trace!("removal of an absent key");
                None
            }
        }
    }

    /// `true` if some stored key compares equal to `key`.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        self.tree.find(&self.cmp, key).is_some()
    }

    /// The value stored under `key`, if any.
    ///
    /// The lookup key can be any type the comparator relates to `K`, such as `str` against `String`
    /// keys:
    ///
    /// ```
    /// let mut hosts = avltree::Map::new();
    /// hosts.insert("db".to_string(), 5432);
    ///
    /// assert_eq!(hosts.get("db"), Some(&5432));
    /// assert_eq!(hosts.get("cache"), None);
    /// ```
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        self.tree.find(&self.cmp, key).map(|node| self.tree[node].value())
    }

    /// Like [`get`](#method.get), with a mutable reference.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        let node = self.tree.find(&self.cmp, key)?;
        Some(self.tree[node].key_value_mut().1)
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.outermost::<Left>().map(|node| self.tree[node].key_value())
    }

    /// Takes the smallest entry out of the map.
    ///
    /// ```
    /// let mut queue: avltree::Map<_, _> = [(3, "low"), (1, "urgent"), (2, "normal")]
    ///     .into_iter()
    ///     .collect();
    ///
    /// assert_eq!(queue.remove_first(), Some((1, "urgent")));
    /// assert_eq!(queue.remove_first(), Some((2, "normal")));
    /// assert_eq!(queue.len(), 1);
    /// ```
    pub fn remove_first(&mut self) -> Option<(K, V)> {
        let node = self.tree.outermost::<Left>()?;
        Some(self.tree.remove(node))
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.outermost::<Right>().map(|node| self.tree[node].key_value())
    }

    /// Takes the largest entry out of the map.
    pub fn remove_last(&mut self) -> Option<(K, V)> {
        let node = self.tree.outermost::<Right>()?;
        Some(self.tree.remove(node))
    }

    /// The entry with the greatest key below `key`, or at or below it when `inclusive` is set.
    ///
    /// `key` itself does not have to be stored.
    ///
    /// ```
    /// let mut tariffs = avltree::Map::new();
    /// tariffs.insert(0, "free");
    /// tariffs.insert(100, "basic");
    /// tariffs.insert(1000, "bulk");
    ///
    /// // The band a quantity falls into.
    /// assert_eq!(tariffs.pred(&250, true), Some((&100, &"basic")));
    /// assert_eq!(tariffs.pred(&100, true), Some((&100, &"basic")));
    /// assert_eq!(tariffs.pred(&100, false), Some((&0, &"free")));
    /// assert_eq!(tariffs.pred(&0, false), None);
    /// ```
    pub fn pred<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.tree.closest::<Left, _, _>(&self.cmp, key, inclusive)
            .map(|node| self.tree[node].key_value())
    }

    /// [`pred`](#method.pred) with a mutable value.
    pub fn pred_mut<Q: ?Sized>(&mut self, key: &Q, inclusive: bool) -> Option<(&K, &mut V)>
        where C: Compare<Q, K> {

        let node = self.tree.closest::<Left, _, _>(&self.cmp, key, inclusive)?;
        Some(self.tree[node].key_value_mut())
    }

    /// Removes and returns the entry [`pred`](#method.pred) would find.
    pub fn remove_pred<Q: ?Sized>(&mut self, key: &Q, inclusive: bool) -> Option<(K, V)>
        where C: Compare<Q, K> {

        let node = self.tree.closest::<Left, _, _>(&self.cmp, key, inclusive)?;
        Some(self.tree.remove(node))
    }

    /// The entry with the least key above `key`, or at or above it when `inclusive` is set.
    ///
    /// ```
    /// let mut departures = avltree::Map::new();
    /// departures.insert(805, "RE 1");
    /// departures.insert(835, "RB 20");
    ///
    /// assert_eq!(departures.succ(&810, false), Some((&835, &"RB 20")));
    /// assert_eq!(departures.succ(&805, true), Some((&805, &"RE 1")));
    /// assert_eq!(departures.succ(&835, false), None);
    /// ```
    pub fn succ<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.tree.closest::<Right, _, _>(&self.cmp, key, inclusive)
            .map(|node| self.tree[node].key_value())
    }

    /// [`succ`](#method.succ) with a mutable value.
    pub fn succ_mut<Q: ?Sized>(&mut self, key: &Q, inclusive: bool) -> Option<(&K, &mut V)>
        where C: Compare<Q, K> {

        let node = self.tree.closest::<Right, _, _>(&self.cmp, key, inclusive)?;
        Some(self.tree[node].key_value_mut())
    }

    /// Removes and returns the entry [`succ`](#method.succ) would find.
    ///
    /// ```
    /// let mut slots: avltree::Map<_, _> = [(9, "a"), (11, "b"), (14, "c")].into_iter().collect();
    ///
    /// assert_eq!(slots.remove_succ(&10, false), Some((11, "b")));
    /// assert_eq!(slots.remove_succ(&14, true), Some((14, "c")));
    /// assert_eq!(slots.remove_succ(&14, true), None);
    /// ```
    pub fn remove_succ<Q: ?Sized>(&mut self, key: &Q, inclusive: bool) -> Option<(K, V)>
        where C: Compare<Q, K> {

        let node = self.tree.closest::<Right, _, _>(&self.cmp, key, inclusive)?;
        Some(self.tree.remove(node))
    }

    /// Levels on the longest root-to-leaf path; 0 when empty.
    ///
    /// The AVL shape bounds this by about 1.44 log2(n + 2):
    ///
    /// ```
    /// let map: avltree::Map<u32, ()> = (0..1000).map(|k| (k, ())).collect();
    /// assert_eq!(map.height(), 10);
    /// ```
    pub fn height(&self) -> usize { self.tree.height() }

    /// Recomputes every subtree height and checks that siblings differ by at most one level.
    ///
    /// Always `true` between calls. It walks the whole tree and is meant for tests.
    pub fn is_balanced(&self) -> bool { self.tree.is_balanced() }

    /// `true` if all leaves sit at the same depth.
    ///
    /// A node with a single child is not a leaf, so only the depths of childless nodes are
    /// compared.
    ///
    /// ```
    /// let mut map = avltree::Map::new();
    /// for k in [20, 10, 30] { map.insert(k, ()); }
    /// assert!(map.has_equal_paths());
    ///
    /// map.insert(5, ());
    /// assert!(!map.has_equal_paths());
    /// ```
    pub fn has_equal_paths(&self) -> bool { self.tree.has_equal_paths() }

    /// Walks the entries from the smallest key to the largest. The walk can also be taken from
    /// the back.
    ///
    /// ```
    /// let map: avltree::Map<_, _> = "tree".char_indices().map(|(i, c)| (c, i)).collect();
    ///
    /// let letters: String = map.iter().map(|(c, _)| *c).collect();
    /// assert_eq!(letters, "ert");
    /// assert_eq!(map.iter().next_back(), Some((&'t', &0)));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> { Iter::new(&self.tree) }

    /// Walks the entries in key order, handing out the values mutably.
    ///
    /// ```
    /// let mut balances: avltree::Map<_, _> = [("ann", 10), ("bo", 0)].into_iter().collect();
    /// for (_, cents) in balances.iter_mut() { *cents += 5; }
    ///
    /// assert_eq!(balances[&"ann"], 15);
    /// assert_eq!(balances[&"bo"], 5);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> { IterMut::new(&mut self.tree) }

    /// Orders two maps entry by entry, keys under `self`'s comparator first.
    fn compare_entries<F>(&self, other: &Self, mut values: F) -> Option<Ordering>
        where F: FnMut(&V, &V) -> Option<Ordering> {

        let mut ours = self.iter();
        let mut theirs = other.iter();

        loop {
            let (a, b) = match (ours.next(), theirs.next()) {
                (Some(a), Some(b)) => (a, b),
                (a, b) => return Some(a.is_some().cmp(&b.is_some())),
            };

            let order = match self.cmp.compare(a.0, b.0) {
                Equal => values(a.1, b.1)?,
                order => order,
            };

            if order != Equal { return Some(order); }
        }
    }

    #[cfg(test)]
    pub(crate) fn tree(&self) -> &Tree<K, V> { &self.tree }
}

impl<K, V, C> Debug for Map<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Default for Map<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self { Map::with_cmp(C::default()) }
}

impl<K, V, C> Extend<(K, V)> for Map<K, V, C> where C: Compare<K> {
    fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, entries: I) {
        entries.into_iter().for_each(|(key, value)| { self.insert(key, value); });
    }
}

impl<K, V, C> iter::FromIterator<(K, V)> for Map<K, V, C> where C: Compare<K> + Default {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(entries: I) -> Self {
        let mut map = Map::default();
        map.extend(entries);
        map
    }
}

impl<K, V, C> Hash for Map<K, V, C> where K: Hash, V: Hash, C: Compare<K> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for (key, value) in self.iter() {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<'a, K, V, C, Q: ?Sized> ops::Index<&'a Q> for Map<K, V, C>
    where C: Compare<K> + Compare<Q, K> {

    type Output = V;

    /// Panics with "key not found" when `key` is absent.
    fn index(&self, key: &Q) -> &V { self.get(key).expect("key not found") }
}

impl<'a, K, V, C> IntoIterator for &'a Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> { self.iter_mut() }
}

/// Moves the entries out in key order.
///
/// ```
/// let map: avltree::Map<_, _> = [(2, 'b'), (1, 'a')].into_iter().collect();
/// let pairs: Vec<_> = map.into_iter().collect();
/// assert_eq!(pairs, [(1, 'a'), (2, 'b')]);
/// ```
impl<K, V, C> IntoIterator for Map<K, V, C> where C: Compare<K> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> { IntoIter::new(self.tree) }
}

/// Maps are equal when they hold the same number of entries and, walked in order, every pair
/// of keys compares equal under the comparator and every pair of values is `==`.
impl<K, V, C> PartialEq for Map<K, V, C> where V: PartialEq, C: Compare<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() &&
        self.iter().zip(other.iter()).all(|(a, b)| self.cmp.compares_eq(a.0, b.0) && a.1 == b.1)
    }
}

impl<K, V, C> Eq for Map<K, V, C> where V: Eq, C: Compare<K> {}

/// Lexicographic over the entries in key order. A map that is a prefix of another is smaller.
impl<K, V, C> PartialOrd for Map<K, V, C> where V: PartialOrd, C: Compare<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare_entries(other, V::partial_cmp)
    }
}

impl<K, V, C> Ord for Map<K, V, C> where V: Ord, C: Compare<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_entries(other, |a, b| Some(Ord::cmp(a, b))).unwrap_or(Equal)
    }
}
