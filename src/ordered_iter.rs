use ordered_iter::OrderedMapIterator;
use super::map::{IntoIter, Iter, IterMut};

impl<K: Ord, V> OrderedMapIterator for IntoIter<K, V> {
    type Key = K;
    type Val = V;
}

impl<'a, K: Ord, V> OrderedMapIterator for Iter<'a, K, V> {
    type Key = &'a K;
    type Val = &'a V;
}

impl<'a, K: Ord, V> OrderedMapIterator for IterMut<'a, K, V> {
    type Key = &'a K;
    type Val = &'a mut V;
}
