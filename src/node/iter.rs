use std::marker::PhantomData;
use std::vec;
use super::{Dir, Handle, Left, Right, Tree};

/// An in-order walk over a tree's node handles, following parent links so that it needs no
/// stack.
pub struct Walk<'a, K: 'a, V: 'a> {
    tree: &'a Tree<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    size: usize,
}

impl<'a, K, V> Walk<'a, K, V> {
    pub(crate) fn new(tree: &'a Tree<K, V>) -> Self {
        Walk {
            tree: tree,
            front: tree.outermost::<Left>(),
            back: tree.outermost::<Right>(),
            size: tree.len(),
        }
    }

    fn advance<D: Dir>(&mut self, handle: Option<Handle>) -> Option<(Handle, Option<Handle>)> {
        if self.size == 0 { return None; }
        self.size -= 1;
        let handle = handle.expect("walk ended before its size was exhausted");
        Some((handle, self.tree.step::<D>(handle)))
    }
}

impl<'a, K, V> Clone for Walk<'a, K, V> {
    fn clone(&self) -> Self {
        Walk { tree: self.tree, front: self.front, back: self.back, size: self.size }
    }
}

impl<'a, K, V> Iterator for Walk<'a, K, V> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        let front = self.front;
        self.advance::<Right>(front).map(|(handle, next)| { self.front = next; handle })
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.size, Some(self.size)) }
}

impl<'a, K, V> DoubleEndedIterator for Walk<'a, K, V> {
    fn next_back(&mut self) -> Option<Handle> {
        let back = self.back;
        self.advance::<Left>(back).map(|(handle, next)| { self.back = next; handle })
    }
}

impl<'a, K, V> ExactSizeIterator for Walk<'a, K, V> {}

/// An iterator over a tree's entries in ascending order.
pub struct Iter<'a, K: 'a, V: 'a>(Walk<'a, K, V>);

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(tree: &'a Tree<K, V>) -> Self { Iter(tree.walk()) }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self { Iter(self.0.clone()) }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let tree = self.0.tree;
        self.0.next().map(|handle| tree[handle].key_value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        let tree = self.0.tree;
        self.0.next_back().map(|handle| tree[handle].key_value())
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// An iterator over a tree's entries in ascending order with mutable references to the values.
///
/// The entries are split out of the arena up front, so the walk never aliases a node it has
/// already handed out.
pub struct IterMut<'a, K: 'a, V: 'a> {
    entries: vec::IntoIter<(&'a K, &'a mut V)>,
    _mut: PhantomData<&'a mut Tree<K, V>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(tree: &'a mut Tree<K, V>) -> Self {
        let order: Vec<Handle> = tree.walk().collect();
        let mut nodes: Vec<_> = tree.slots.iter_mut().map(Option::as_mut).collect();

        let entries: Vec<_> = order.into_iter()
            .map(|handle| nodes[handle.0].take().expect("walk visited a node twice"))
            .map(|node| node.key_value_mut())
            .collect();

        IterMut { entries: entries.into_iter(), _mut: PhantomData }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<(&'a K, &'a mut V)> { self.entries.next() }

    fn size_hint(&self) -> (usize, Option<usize>) { self.entries.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> { self.entries.next_back() }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

/// An iterator that consumes a tree, yielding its entries in ascending order.
#[derive(Clone)]
pub struct IntoIter<K, V> {
    tree: Tree<K, V>,
    order: vec::IntoIter<Handle>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(tree: Tree<K, V>) -> Self {
        let order: Vec<Handle> = tree.walk().collect();
        IntoIter { tree: tree, order: order.into_iter() }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.order.next().map(|handle| self.tree.release(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.order.size_hint() }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.order.next_back().map(|handle| self.tree.release(handle))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
