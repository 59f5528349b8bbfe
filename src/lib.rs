//! A sorted map kept height-balanced as an AVL tree.
//!
//! Every node stores the height difference between its right and left subtrees. After an
//! insertion or removal the tree walks back toward the root, fixing those differences and
//! rotating wherever a subtree has become two levels taller than its sibling, so lookups,
//! insertions and removals all stay O(log n).
//!
//! Keys are ordered by a `compare::Compare` value, which defaults to their `Ord` impl:
//!
//! ```
//! # extern crate compare;
//! # extern crate avltree;
//! # fn main() {
//! use compare::{Compare, natural};
//!
//! let mut leaderboard = avltree::Map::with_cmp(natural().rev());
//! leaderboard.insert(870, "kim");
//! leaderboard.insert(990, "ola");
//! leaderboard.insert(910, "sam");
//!
//! assert_eq!(leaderboard.first(), Some((&990, &"ola")));
//! assert!(leaderboard.is_balanced());
//! # }
//! ```

#![deny(missing_docs)]

mod balance;
mod node;
#[cfg(feature = "ordered_iter")]
mod ordered_iter;
#[cfg(feature = "quickcheck")]
mod quickcheck;

pub mod map;

pub use map::Map;
