//! This crate provides a path-compressed binary trie (a PATRICIA trie) for IPv4 prefixes. Any
//! lookup performs longest-prefix match. It is meant for tables that are built once and then
//! queried many times, such as routing tables, ACLs, or geo/ASN databases.
//!
//! ```
//! # use ipv4_patricia::*;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut trie = PatriciaTrie::new();
//! for (cidr, value) in [("1.1.0.0/16", 16), ("1.1.2.0/24", 24), ("1.1.2.0/30", 30)] {
//!     let prefix: Ipv4Prefix = cidr.parse()?;
//!     trie.insert_value(prefix.addr(), prefix.prefix_len(), value);
//! }
//! assert_eq!(trie.lookup(parse_ipv4("1.1.2.3")), Some(30));
//! assert_eq!(trie.lookup(parse_ipv4("1.1.2.4")), Some(24));
//! assert_eq!(trie.lookup(parse_ipv4("1.1.3.1")), Some(16));
//! assert_eq!(trie.lookup(parse_ipv4("2.2.4.1")), None);
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! Each node consists of a prefix (a masked address and a prefix length), a flag telling whether
//! that prefix was inserted explicitly, an optional value, and two optional children. To descend
//! from a node, we look at the address bit at the position of the node's prefix length. If it is
//! not set, then we take the left branch, and otherwise, we take the right one.
//!
//! Nodes only exist where an inserted prefix ends, or where two inserted prefixes diverge (a
//! *branch* node). The height of the tree is therefore bounded by the number of prefixes, and every
//! operation visits at most 33 nodes.
//!
//! All nodes live in a single pool that grows in blocks of [`DEFAULT_BLOCK_SIZE`] nodes. Nodes are
//! never removed, and a [`NodeId`] returned by [`PatriciaTrie::insert`] stays valid for the lifetime
//! of the trie.
//!
//! The crate also includes [`BitTrie`], an uncompressed trie with one node per prefix bit stored in
//! parallel arrays. Both implement [`LongestPrefixMatch`].
//!
//! # Operations on the tree
//!
//! | Operation                          | Complexity |
//! |------------------------------------|------------|
//! | `insert`, `insert_value`           | `O(32)`    |
//! | `matches`, `lookup`, `contains`    | `O(32)`    |
//! | `size`, `len`, `is_empty`          | `O(1)`     |
//!
//! # Concurrency
//!
//! The trie has no internal synchronization. Build it on one thread, then share it immutably (for
//! instance behind an `Arc`), or publish a freshly built trie by swapping a pointer.

#![deny(missing_docs)]

mod bitwise;
mod fmt;
mod inner;
mod parse;
mod prefix;
pub mod table;
mod trie;

#[cfg(test)]
mod fuzzing;

pub use bitwise::{BitTrie, NULL};
pub use inner::{NodeId, DEFAULT_BLOCK_SIZE};
pub use parse::{parse_cidr, parse_ipv4, parse_ipv4_strict, ParseError};
pub use prefix::Ipv4Prefix;
pub use table::TableError;
pub use trie::{PatriciaTrie, NO_VALUE};

/// Common interface of the trie representations in this crate.
pub trait LongestPrefixMatch {
    /// Insert `prefix` and associate `value` with it.
    ///
    /// # Panics
    ///
    /// Panics if `value` is [`NULL`], which is reserved for "no value".
    fn insert_value(&mut self, prefix: Ipv4Prefix, value: u32);

    /// Check whether any stored prefix contains `addr`.
    fn matches(&self, addr: u32) -> bool;

    /// Get the value of the longest stored prefix that contains `addr`.
    fn lookup(&self, addr: u32) -> Option<u32>;

    /// Number of allocated nodes.
    fn size(&self) -> usize;
}
