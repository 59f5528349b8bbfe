//! AVL rebalancing over a `Tree`.
//!
//! Every node stores its balance factor: the height of its right subtree minus the height of
//! its left subtree. Between public operations each factor is -1, 0 or 1 and equals the true
//! height difference. A factor of ±2 only exists transiently while one of the walks below is
//! resolving it.

use compare::Compare;
use log::trace;
use std::cmp::Ordering::*;
use super::node::{Dir, Handle, Left, Link, Right, Search, Tree};

impl<K, V> Tree<K, V> {
    /// Inserts an entry, returning the previous value if the key was already present.
    ///
    /// Overwriting a value changes neither the structure nor any balance factor.
    pub fn insert<C>(&mut self, cmp: &C, key: K, value: V) -> Option<V> where C: Compare<K> {
        let slot = match self.search(cmp, &key) {
            Search::Found(node) => return Some(self[node].set_value(value)),
            Search::Vacant(slot) => slot,
        };

        let node = self.attach(slot, key, value);

        if let Some((parent, order)) = slot {
            if self[parent].balance() == 0 {
                self[parent].set_balance(if order == Less { Left::SIGN } else { Right::SIGN });
                self.rebalance_insert(node, parent);
            } else {
                // The new leaf filled the parent's shorter side.
                debug_assert!(self[parent].balance().abs() == 1);
                self[parent].set_balance(0);
            }
        }

        None
    }

    /// Removes the given node from the tree, returning its entry.
    pub fn remove(&mut self, node: Handle) -> (K, V) {
        if let (Some(left), Some(_)) = (self[node].left(), self[node].right()) {
            let pred = self.extremum::<Right>(left);
            self.swap(node, pred);
        }

        let parent = self[node].parent();
        let diff = self.side_sign(node).map_or(0, |sign| -sign);

        let child = self[node].left().or(self[node].right());
        self.replace_child(parent, node, child);
        if let Some(child) = child { self[child].set_parent(parent); }

        let entry = self.release(node);
        self.rebalance_remove(parent, diff);
        entry
    }

    /// Exchanges the positions of two nodes along with their balance factors, so that each
    /// position keeps the factor that describes it.
    pub fn swap(&mut self, a: Handle, b: Handle) {
        self.swap_positions(a, b);
        let (a_balance, b_balance) = (self[a].balance(), self[b].balance());
        self[a].set_balance(b_balance);
        self[b].set_balance(a_balance);
    }

    /// Rotates `node` down toward `D`: its child on the opposite side takes its place and
    /// `node` becomes that child's `D` child.
    ///
    /// `rotate::<Left>` is the classic left rotation and `rotate::<Right>` the right one.
    /// Balance factors are left to the caller.
    pub fn rotate<D: Dir>(&mut self, node: Handle) {
        let pivot = D::Opposite::forward(&self[node])
            .expect("rotated a node without a child on the rising side");
        let side = if D::left() { "left" } else { "right" };
        trace!("rotating {:?} {}, raising {:?}", node, side, pivot);

        let parent = self[node].parent();
        self.replace_child(parent, node, Some(pivot));
        self[pivot].set_parent(parent);
        self[node].set_parent(Some(pivot));

        let inner = D::forward(&self[pivot]);
        D::Opposite::set_forward(&mut self[node], inner);
        if let Some(inner) = inner { self[inner].set_parent(Some(node)); }

        D::set_forward(&mut self[pivot], Some(node));
    }

    /// Returns the balance sign of the side of its parent that `node` hangs from, or `None` for
    /// the root.
    fn side_sign(&self, node: Handle) -> Option<i8> {
        self[node].parent().map(|parent| {
            if self[parent].left() == Some(node) { Left::SIGN } else { Right::SIGN }
        })
    }

    /// Propagates the growth of `parent`'s subtree toward the root. `parent`'s balance has just
    /// moved from 0 to ±1 because `child` grew.
    fn rebalance_insert(&mut self, mut child: Handle, mut parent: Handle) {
        while let Some(grandparent) = self[parent].parent() {
            let diff = self.side_sign(parent).expect("parent has a grandparent");
            self[grandparent].update_balance(diff);

            match self[grandparent].balance() {
                0 => return,
                -1 | 1 => {
                    child = parent;
                    parent = grandparent;
                }
                -2 => return self.resolve_insert::<Left>(grandparent, parent, child),
                2 => return self.resolve_insert::<Right>(grandparent, parent, child),
                balance => unreachable!("balance factor {} after insertion", balance),
            }
        }
    }

    /// Restores a grandparent whose balance reached ±2 on side `D`, where `parent` is its `D`
    /// child and `child` is `parent`'s taller child. The subtree regains its height from before
    /// the insertion, so nothing above it changes.
    fn resolve_insert<D: Dir>(&mut self, grandparent: Handle, parent: Handle, child: Handle) {
        if D::forward(&self[parent]) == Some(child) {
            trace!("insertion: single rotation at {:?}", grandparent);
            self.rotate::<D::Opposite>(grandparent);
            self[parent].set_balance(0);
            self[grandparent].set_balance(0);
        } else {
            trace!("insertion: double rotation at {:?}", grandparent);
            let balance = self[child].balance();
            self.rotate::<D>(parent);
            self.rotate::<D::Opposite>(grandparent);

            let (parent_balance, grandparent_balance) = match balance {
                0 => (0, 0),
                b if b == D::SIGN => (0, -D::SIGN),
                _ => (D::SIGN, 0),
            };

            self[parent].set_balance(parent_balance);
            self[grandparent].set_balance(grandparent_balance);
            self[child].set_balance(0);
        }
    }

    /// Walks from `link` toward the root after a removal. `diff` is the change to apply to
    /// `link`'s balance: +1 if its left subtree got shorter, -1 if its right one did.
    fn rebalance_remove(&mut self, mut link: Link, mut diff: i8) {
        while let Some(node) = link {
            let parent = self[node].parent();
            let next_diff = self.side_sign(node).map_or(0, |sign| -sign);

            let shrunk = match self[node].balance() + diff {
                -2 => self.resolve_remove::<Left>(node),
                2 => self.resolve_remove::<Right>(node),
                0 => {
                    self[node].set_balance(0);
                    true
                }
                balance @ (-1 | 1) => {
                    self[node].set_balance(balance);
                    false
                }
                balance => unreachable!("balance factor {} after removal", balance),
            };

            if !shrunk { return; }

            link = parent;
            diff = next_diff;
        }
    }

    /// Restores a node whose balance would reach ±2 on side `D` after a removal. Returns
    /// whether the restored subtree is one level shorter than before the removal.
    fn resolve_remove<D: Dir>(&mut self, node: Handle) -> bool {
        let child = D::forward(&self[node]).expect("heavy side of a node has no child");
        let child_balance = self[child].balance();

        if child_balance == D::SIGN {
            trace!("removal: single rotation at {:?}", node);
            self.rotate::<D::Opposite>(node);
            self[child].set_balance(0);
            self[node].set_balance(0);
            true
        } else if child_balance == 0 {
            trace!("removal: single rotation at {:?}, height kept", node);
            self.rotate::<D::Opposite>(node);
            self[child].set_balance(-D::SIGN);
            self[node].set_balance(D::SIGN);
            false
        } else {
            trace!("removal: double rotation at {:?}", node);
            let grandchild = D::Opposite::forward(&self[child])
                .expect("inner side of a heavy child has no child");
            let balance = self[grandchild].balance();
            self.rotate::<D>(child);
            self.rotate::<D::Opposite>(node);

            let (node_balance, child_balance) = match balance {
                0 => (0, 0),
                b if b == D::SIGN => (-D::SIGN, 0),
                _ => (0, D::SIGN),
            };

            self[node].set_balance(node_balance);
            self[child].set_balance(child_balance);
            self[grandchild].set_balance(0);
            true
        }
    }
}
