//! The arena that owns every node of a tree, and the plain binary search tree operations over
//! it. Balancing lives in `balance`.

mod iter;


use compare::Compare;
use std::cmp::Ordering::{self, *};
use std::mem;
use std::ops;

pub use self::iter::{IntoIter, Iter, IterMut, Walk};

/// A handle to a node slot in a `Tree`'s arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handle(usize);

pub type Link = Option<Handle>;

#[derive(Clone, Debug)]
pub struct Node<K, V> {
    parent: Link,
    left: Link,
    right: Link,
    balance: i8,
    key: K,
    value: V,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, parent: Link) -> Self {
        Node { parent: parent, left: None, right: None, balance: 0, key: key, value: value }
    }

    pub fn key(&self) -> &K { &self.key }

    pub fn value(&self) -> &V { &self.value }

    pub fn key_value(&self) -> (&K, &V) { (&self.key, &self.value) }

    pub fn key_value_mut(&mut self) -> (&K, &mut V) { (&self.key, &mut self.value) }

    /// Replaces the node's value, returning the old one.
    pub fn set_value(&mut self, value: V) -> V { mem::replace(&mut self.value, value) }

    pub fn parent(&self) -> Link { self.parent }

    pub fn left(&self) -> Link { self.left }

    pub fn right(&self) -> Link { self.right }

    pub fn set_parent(&mut self, parent: Link) { self.parent = parent; }

    /// Returns the height of the right subtree minus the height of the left subtree.
    pub fn balance(&self) -> i8 { self.balance }

    pub fn set_balance(&mut self, balance: i8) {
        debug_assert!((-2..=2).contains(&balance), "balance factor {} out of range", balance);
        self.balance = balance;
    }

    pub fn update_balance(&mut self, diff: i8) {
        let balance = self.balance + diff;
        self.set_balance(balance);
    }

    fn into_key_value(self) -> (K, V) { (self.key, self.value) }
}

/// A side of a node.
pub trait Dir: Sized {
    type Opposite: Dir<Opposite=Self>;

    /// The sign a subtree on this side contributes to its parent's balance factor.
    const SIGN: i8;

    fn left() -> bool;

    fn forward<K, V>(node: &Node<K, V>) -> Link;
    fn set_forward<K, V>(node: &mut Node<K, V>, link: Link);
}

pub enum Left {}

impl Dir for Left {
    type Opposite = Right;

    const SIGN: i8 = -1;

    fn left() -> bool { true }

    fn forward<K, V>(node: &Node<K, V>) -> Link { node.left }
    fn set_forward<K, V>(node: &mut Node<K, V>, link: Link) { node.left = link; }
}

pub enum Right {}

impl Dir for Right {
    type Opposite = Left;

    const SIGN: i8 = 1;

    fn left() -> bool { false }

    fn forward<K, V>(node: &Node<K, V>) -> Link { node.right }
    fn set_forward<K, V>(node: &mut Node<K, V>, link: Link) { node.right = link; }
}

/// The outcome of searching for a key's position.
pub enum Search {
    /// A node with an equal key.
    Found(Handle),
    /// The node the key would hang from and the key's ordering relative to it, or `None` if
    /// the tree is empty.
    Vacant(Option<(Handle, Ordering)>),
}

/// An arena of nodes linked into a binary search tree.
///
/// Vacated slots are recycled through a free list.
#[derive(Clone)]
pub struct Tree<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<Handle>,
    root: Link,
}

impl<K, V> Tree<K, V> {
    pub fn new() -> Self { Tree { slots: vec![], free: vec![], root: None } }

    #[cfg(test)]
    pub fn root(&self) -> Link { self.root }

    pub fn is_empty(&self) -> bool { self.root.is_none() }

    pub fn len(&self) -> usize { self.slots.len() - self.free.len() }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
    }

    fn alloc(&mut self, key: K, value: V, parent: Link) -> Handle {
        let node = Some(Node::new(key, value, parent));

        match self.free.pop() {
            Some(handle) => {
                self.slots[handle.0] = node;
                handle
            }
            None => {
                self.slots.push(node);
                Handle(self.slots.len() - 1)
            }
        }
    }

    /// Vacates the node's slot, returning its key and value.
    ///
    /// The node must already be unlinked from the tree.
    pub fn release(&mut self, handle: Handle) -> (K, V) {
        let node = self.slots[handle.0].take().expect("released a vacant node slot");
        self.free.push(handle);
        node.into_key_value()
    }

    /// Creates a leaf holding the given entry at the position found by `search`.
    pub fn attach(&mut self, slot: Option<(Handle, Ordering)>, key: K, value: V) -> Handle {
        match slot {
            None => {
                assert!(self.root.is_none(), "attached a root to a non-empty tree");
                let node = self.alloc(key, value, None);
                self.root = Some(node);
                node
            }
            Some((parent, order)) => {
                let node = self.alloc(key, value, Some(parent));

                match order {
                    Less => self[parent].left = Some(node),
                    Greater => self[parent].right = Some(node),
                    Equal => panic!("attached a duplicate key"),
                }

                node
            }
        }
    }

    pub fn search<C, Q: ?Sized>(&self, cmp: &C, key: &Q) -> Search where C: Compare<Q, K> {
        let mut slot = None;
        let mut link = self.root;

        while let Some(handle) = link {
            let node = &self[handle];

            let order = cmp.compare(key, node.key());
            link = match order {
                Equal => return Search::Found(handle),
                Less => node.left,
                Greater => node.right,
            };

            slot = Some((handle, order));
        }

        Search::Vacant(slot)
    }

    pub fn find<C, Q: ?Sized>(&self, cmp: &C, key: &Q) -> Link where C: Compare<Q, K> {
        match self.search(cmp, key) {
            Search::Found(handle) => Some(handle),
            Search::Vacant(_) => None,
        }
    }

    /// Returns the node furthest in direction `D` within the subtree rooted at `handle`.
    pub fn extremum<D: Dir>(&self, mut handle: Handle) -> Handle {
        while let Some(next) = D::forward(&self[handle]) { handle = next; }
        handle
    }

    /// Returns the node furthest in direction `D` in the whole tree.
    pub fn outermost<D: Dir>(&self) -> Link { self.root.map(|root| self.extremum::<D>(root)) }

    /// Returns the in-order neighbor of the given node in direction `D`: its successor for
    /// `Right`, its predecessor for `Left`.
    pub fn step<D: Dir>(&self, mut handle: Handle) -> Link {
        if let Some(child) = D::forward(&self[handle]) {
            return Some(self.extremum::<D::Opposite>(child));
        }

        while let Some(parent) = self[handle].parent {
            if D::forward(&self[parent]) != Some(handle) { return Some(parent); }
            handle = parent;
        }

        None
    }

    /// Returns the node closest to the given key in direction `D`, which equals the key if
    /// `inclusive` is `true` and such a node exists.
    pub fn closest<D: Dir, C, Q: ?Sized>(&self, cmp: &C, key: &Q, inclusive: bool) -> Link
        where C: Compare<Q, K> {

        let mut closest = None;
        let mut link = self.root;

        while let Some(handle) = link {
            let node = &self[handle];

            link = match cmp.compare(key, node.key()) {
                Equal if inclusive => return Some(handle),
                Equal => D::forward(node),
                order => if D::left() == (order == Less) {
                    D::forward(node)
                } else {
                    closest = Some(handle);
                    D::Opposite::forward(node)
                },
            };
        }

        closest
    }

    /// Points the slot that holds `old` (a child slot of `parent`, or the root if `parent` is
    /// `None`) at `new`.
    ///
    /// Does not touch `new`'s parent link.
    pub fn replace_child(&mut self, parent: Link, old: Handle, new: Link) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = &mut self[parent];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    debug_assert!(parent.right == Some(old), "parent link is stale");
                    parent.right = new;
                }
            }
        }
    }

    /// Exchanges the tree positions of two nodes. Each node keeps its own entry and balance
    /// factor.
    pub fn swap_positions(&mut self, a: Handle, b: Handle) {
        if a == b { return; }

        // If one node is the other's child, call the parent `a`.
        let (a, b) = if self[a].parent == Some(b) { (b, a) } else { (a, b) };

        let Node { parent: a_parent, left: a_left, right: a_right, .. } = self[a];
        let Node { parent: b_parent, left: b_left, right: b_right, .. } = self[b];
        let a_is_left = a_parent.map(|p| self[p].left == Some(a));
        let b_is_left = b_parent.map(|p| self[p].left == Some(b));

        self.set_child(a_parent, a_is_left, Some(b));

        if b_parent == Some(a) {
            self[b].parent = a_parent;
            if a_left == Some(b) {
                self[b].left = Some(a);
                self[b].right = a_right;
                self.adopt(a_right, b);
            } else {
                self[b].right = Some(a);
                self[b].left = a_left;
                self.adopt(a_left, b);
            }
        } else {
            self.set_child(b_parent, b_is_left, Some(a));
            self[b].parent = a_parent;
            self[b].left = a_left;
            self[b].right = a_right;
            self.adopt(a_left, b);
            self.adopt(a_right, b);
        }

        self[a].parent = if b_parent == Some(a) { Some(b) } else { b_parent };
        self[a].left = b_left;
        self[a].right = b_right;
        self.adopt(b_left, a);
        self.adopt(b_right, a);
    }

    fn set_child(&mut self, parent: Link, is_left: Option<bool>, child: Link) {
        match (parent, is_left) {
            (Some(parent), Some(true)) => self[parent].left = child,
            (Some(parent), _) => self[parent].right = child,
            (None, _) => self.root = child,
        }
    }

    fn adopt(&mut self, child: Link, parent: Handle) {
        if let Some(child) = child { self[child].parent = Some(parent); }
    }

    /// Returns the number of levels in the tree.
    pub fn height(&self) -> usize { self.height_of(self.root) }

    fn height_of(&self, link: Link) -> usize {
        link.map_or(0, |handle| {
            let node = &self[handle];
            1 + self.height_of(node.left).max(self.height_of(node.right))
        })
    }

    /// Checks that the subtrees of every node differ in height by at most one, recomputing
    /// heights rather than trusting the stored balance factors.
    pub fn is_balanced(&self) -> bool {
        fn check<K, V>(tree: &Tree<K, V>, link: Link) -> Option<usize> {
            match link {
                None => Some(0),
                Some(handle) => {
                    let left = check(tree, tree[handle].left)?;
                    let right = check(tree, tree[handle].right)?;
                    if left.abs_diff(right) > 1 { None } else { Some(1 + left.max(right)) }
                }
            }
        }

        check(self, self.root).is_some()
    }

    /// Checks that every leaf lies at the same depth.
    pub fn has_equal_paths(&self) -> bool {
        fn check<K, V>(tree: &Tree<K, V>, link: Link, depth: usize, leaf: &mut Option<usize>)
            -> bool {

            match link {
                None => true,
                Some(handle) => {
                    let node = &tree[handle];
                    if node.left.is_none() && node.right.is_none() {
                        *leaf.get_or_insert(depth) == depth
                    } else {
                        check(tree, node.left, depth + 1, leaf) &&
                        check(tree, node.right, depth + 1, leaf)
                    }
                }
            }
        }

        check(self, self.root, 0, &mut None)
    }

    pub fn walk(&self) -> Walk<'_, K, V> { Walk::new(self) }
}

impl<K, V> ops::Index<Handle> for Tree<K, V> {
    type Output = Node<K, V>;

    fn index(&self, handle: Handle) -> &Node<K, V> {
        self.slots[handle.0].as_ref().expect("dangling node handle")
    }
}

impl<K, V> ops::IndexMut<Handle> for Tree<K, V> {
    fn index_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.slots[handle.0].as_mut().expect("dangling node handle")
    }
}
