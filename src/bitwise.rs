//! Uncompressed binary trie stored in parallel arrays.

use std::mem::size_of;

use crate::inner::DEFAULT_BLOCK_SIZE;
use crate::{Ipv4Prefix, LongestPrefixMatch};

/// Marks a missing child link or a missing value.
pub const NULL: u32 = 0xFFFF_FFFF;

const HIGH_BIT: u32 = 0x8000_0000;

/// Binary trie with one node per prefix bit, kept in three parallel arrays.
///
/// Node identity is an index into `lefts`, `rights` and `values`; the root is index 0. Compared to
/// [`crate::PatriciaTrie`] this uses more nodes (up to one per bit of every prefix), but each node
/// is only three integers and a lookup never compares addresses.
///
/// The value [`NULL`] is reserved to mean "no value" and cannot be stored.
///
/// ```
/// # use ipv4_patricia::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut trie = BitTrie::new();
/// trie.insert_value(parse_ipv4("10.0.0.0"), 8, 1);
/// trie.insert_value(parse_ipv4("10.1.0.0"), 16, 2);
/// assert_eq!(trie.lookup(parse_ipv4("10.1.2.3")), Some(2));
/// assert_eq!(trie.lookup(parse_ipv4("10.2.0.0")), Some(1));
/// assert!(!trie.matches(parse_ipv4("11.0.0.0")));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BitTrie {
    lefts: Vec<u32>,
    rights: Vec<u32>,
    values: Vec<u32>,
    size: u32,
    block: usize,
}

impl Default for BitTrie {
    fn default() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }
}

impl BitTrie {
    /// Create an empty trie containing only the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty trie whose arrays grow by at least `block` nodes at a time.
    pub fn with_block_size(block: usize) -> Self {
        let block = block.max(33);
        Self {
            lefts: vec![NULL; block],
            rights: vec![NULL; block],
            values: vec![NULL; block],
            size: 1,
            block,
        }
    }

    /// Insert the prefix `addr/prefix_len` with `value`. A value stored earlier for the same
    /// prefix is overwritten.
    ///
    /// # Panics
    ///
    /// Panics if `prefix_len` is larger than 32, or if `value` is [`NULL`].
    pub fn insert_value(&mut self, addr: u32, prefix_len: u8, value: u32) {
        assert_ne!(value, NULL, "NULL is reserved for missing values");
        let prefix = Ipv4Prefix::new(addr, prefix_len);

        // one insert creates at most `prefix_len` nodes
        if self.lefts.len() - (self.size as usize) < prefix_len as usize {
            self.grow();
        }

        let addr = prefix.addr();
        let mask = prefix.mask();
        let mut bit = HIGH_BIT;
        let mut node = 0usize;
        while bit & mask != 0 {
            let next = if addr & bit != 0 {
                &mut self.rights[node]
            } else {
                &mut self.lefts[node]
            };
            if *next == NULL {
                *next = self.size;
                self.size += 1;
            }
            node = *next as usize;
            bit >>= 1;
        }
        self.values[node] = value;
    }

    /// Get the value of the longest stored prefix that contains `addr`.
    pub fn lookup(&self, addr: u32) -> Option<u32> {
        let mut bit = HIGH_BIT;
        let mut node = 0u32;
        let mut value = NULL;
        while node != NULL {
            let idx = node as usize;
            if self.values[idx] != NULL {
                value = self.values[idx];
            }
            node = if addr & bit != 0 {
                self.rights[idx]
            } else {
                self.lefts[idx]
            };
            bit >>= 1;
        }
        (value != NULL).then_some(value)
    }

    /// Check whether any stored prefix contains `addr`.
    pub fn matches(&self, addr: u32) -> bool {
        self.lookup(addr).is_some()
    }

    /// Number of nodes in use, including the root.
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Bytes reserved by the three arrays and the struct itself.
    pub fn memory_usage(&self) -> usize {
        size_of::<Self>()
            + (self.lefts.capacity() + self.rights.capacity() + self.values.capacity())
                * size_of::<u32>()
    }

    fn grow(&mut self) {
        let len = self.lefts.len() + self.block;
        log::trace!("growing bit trie arrays to {len} nodes");
        self.lefts.resize(len, NULL);
        self.rights.resize(len, NULL);
        self.values.resize(len, NULL);
    }
}

impl LongestPrefixMatch for BitTrie {
    fn insert_value(&mut self, prefix: Ipv4Prefix, value: u32) {
        BitTrie::insert_value(self, prefix.addr(), prefix.prefix_len(), value)
    }

    fn matches(&self, addr: u32) -> bool {
        BitTrie::matches(self, addr)
    }

    fn lookup(&self, addr: u32) -> Option<u32> {
        BitTrie::lookup(self, addr)
    }

    fn size(&self) -> usize {
        BitTrie::size(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parse_ipv4;

    #[test]
    fn empty() {
        let trie = BitTrie::new();
        assert_eq!(trie.size(), 1);
        assert_eq!(trie.lookup(0), None);
        assert_eq!(trie.lookup(u32::MAX), None);
    }

    #[test]
    fn one_node_per_bit() {
        let mut trie = BitTrie::new();
        trie.insert_value(parse_ipv4("10.0.0.0"), 8, 1);
        assert_eq!(trie.size(), 9);
        trie.insert_value(parse_ipv4("10.0.0.0"), 16, 2);
        assert_eq!(trie.size(), 17);
        trie.insert_value(parse_ipv4("10.0.0.0"), 12, 3);
        assert_eq!(trie.size(), 17);
    }

    #[test]
    fn last_write_wins() {
        let mut trie = BitTrie::new();
        trie.insert_value(parse_ipv4("10.0.0.0"), 8, 1);
        trie.insert_value(parse_ipv4("10.9.9.9"), 8, 5);
        assert_eq!(trie.lookup(parse_ipv4("10.1.1.1")), Some(5));
    }

    #[test]
    fn default_route() {
        let mut trie = BitTrie::new();
        trie.insert_value(0, 0, 42);
        assert_eq!(trie.size(), 1);
        assert_eq!(trie.lookup(0), Some(42));
        assert_eq!(trie.lookup(u32::MAX), Some(42));
    }

    #[test]
    fn host_routes() {
        let mut trie = BitTrie::new();
        trie.insert_value(parse_ipv4("255.255.255.255"), 32, 1);
        trie.insert_value(parse_ipv4("0.0.0.0"), 32, 2);
        assert_eq!(trie.lookup(u32::MAX), Some(1));
        assert_eq!(trie.lookup(u32::MAX - 1), None);
        assert_eq!(trie.lookup(0), Some(2));
        assert_eq!(trie.lookup(1), None);
    }

    #[test]
    #[should_panic]
    fn null_value() {
        BitTrie::new().insert_value(parse_ipv4("10.0.0.0"), 8, NULL);
    }

    #[test]
    fn grows_past_first_block() {
        let mut trie = BitTrie::with_block_size(0);
        for i in 0..64u32 {
            trie.insert_value(i << 8, 24, i);
        }
        for i in 0..64u32 {
            assert_eq!(trie.lookup((i << 8) | 7), Some(i));
        }
        assert!(trie.memory_usage() >= trie.size() * 3 * size_of::<u32>());
    }
}
