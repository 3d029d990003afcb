//! Implementation of the path-compressed PATRICIA trie.

use std::mem::size_of;

use crate::inner::{Node, NodeId, NodePool, DEFAULT_BLOCK_SIZE};
use crate::prefix::{common_prefix_len, is_bit_set};
use crate::{Ipv4Prefix, LongestPrefixMatch, NULL};

/// Sentinel returned by [`PatriciaTrie::lookup_raw`] when no prefix matches.
pub const NO_VALUE: u32 = 0xFFFF_FFFF;

/// Path-compressed binary trie over IPv4 prefixes.
///
/// The trie only stores nodes where two paths diverge or where an inserted prefix ends. Each node
/// is tagged with the bit position (its prefix length) it represents, and the child to descend
/// into is chosen by the bit of the address at exactly that position.
///
/// ```
/// # use ipv4_patricia::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut trie = PatriciaTrie::new();
/// let p: Ipv4Prefix = "192.168.0.0/16".parse()?;
/// let node = trie.insert(p.addr(), p.prefix_len());
/// trie.set_value(node, 7);
/// assert!(trie.matches(parse_ipv4("192.168.1.1")));
/// assert_eq!(trie.lookup(parse_ipv4("192.168.1.1")), Some(7));
/// assert!(!trie.matches(parse_ipv4("10.0.0.1")));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PatriciaTrie {
    pub(crate) pool: NodePool,
    pub(crate) root: NodeId,
    prefixes: usize,
}

impl Default for PatriciaTrie {
    fn default() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }
}

impl PatriciaTrie {
    /// Create an empty trie that only contains the root node `0.0.0.0/0` (which is not a match
    /// point until `0.0.0.0/0` is inserted).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty trie whose node pool grows by `block` nodes at a time.
    pub fn with_block_size(block: usize) -> Self {
        let mut pool = NodePool::with_block_size(block);
        let root = pool.alloc(Ipv4Prefix::zero(), false);
        Self {
            pool,
            root,
            prefixes: 0,
        }
    }

    /// Insert the prefix `addr/prefix_len` and return the handle of the node where it ends. The
    /// address does not need to be masked. Inserting a prefix that is already present returns the
    /// existing node and changes nothing.
    ///
    /// # Panics
    ///
    /// Panics if `prefix_len` is larger than 32.
    pub fn insert(&mut self, addr: u32, prefix_len: u8) -> NodeId {
        self.insert_prefix(Ipv4Prefix::new(addr, prefix_len))
    }

    /// Insert the prefix `addr/prefix_len` and associate `value` with it, replacing any value that
    /// was set before.
    pub fn insert_value(&mut self, addr: u32, prefix_len: u8, value: u32) -> NodeId {
        let idx = self.insert(addr, prefix_len);
        self.pool[idx].value = Some(value);
        idx
    }

    /// Insert a prefix and return the handle of the node where it ends.
    ///
    /// ```
    /// # use ipv4_patricia::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = PatriciaTrie::new();
    /// let a = trie.insert_prefix("1.1.0.0/16".parse()?);
    /// let b = trie.insert_prefix("1.1.2.0/24".parse()?);
    /// assert_ne!(a, b);
    /// assert_eq!(trie.insert_prefix("1.1.0.0/16".parse()?), a);
    /// assert_eq!(trie.prefix(b), "1.1.2.0/24".parse()?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert_prefix(&mut self, prefix: Ipv4Prefix) -> NodeId {
        let mut parent = None;
        let mut cur = Some(self.root);
        while let Some(idx) = cur {
            match self.get_direction_for_insert(idx, &prefix) {
                DirectionForInsert::NewBranch {
                    branch_prefix,
                    branch_terminal,
                } => {
                    let new = self.new_node(prefix, true);
                    let branch = self.new_node(branch_prefix, branch_terminal);
                    self.attach(parent, branch);
                    self.attach(Some(branch), idx);
                    self.attach(Some(branch), new);
                    return new;
                }
                DirectionForInsert::NewParent => {
                    let new = self.new_node(prefix, true);
                    self.attach(parent, new);
                    self.attach(Some(new), idx);
                    return new;
                }
                DirectionForInsert::Reached => {
                    self.mark_terminal(idx);
                    return idx;
                }
                DirectionForInsert::Enter { right } => {
                    parent = Some(idx);
                    cur = self.pool.get_child(idx, right);
                }
            }
        }
        let new = self.new_node(prefix, true);
        self.attach(parent, new);
        new
    }

    /// Check whether any stored prefix contains `addr`.
    ///
    /// ```
    /// # use ipv4_patricia::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let trie: PatriciaTrie = ["1.2.3.4/32".parse::<Ipv4Prefix>()?].into_iter().collect();
    /// assert!(trie.matches(parse_ipv4("1.2.3.4")));
    /// assert!(!trie.matches(parse_ipv4("1.2.3.5")));
    /// # Ok(())
    /// # }
    /// ```
    pub fn matches(&self, addr: u32) -> bool {
        let mut cur = Some(self.root);
        while let Some(idx) = cur {
            let node = &self.pool[idx];
            if !node.prefix.contains_addr(addr) {
                // out of path
                return false;
            }
            if node.terminal {
                return true;
            }
            cur = self
                .pool
                .get_child(idx, is_bit_set(addr, node.prefix.prefix_len()));
        }
        false
    }

    /// Get the value of the longest stored prefix that contains `addr`. Returns `None` if no prefix
    /// matches, or if no value was set on the longest match.
    ///
    /// ```
    /// # use ipv4_patricia::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = PatriciaTrie::new();
    /// trie.insert_value(parse_ipv4("1.1.0.0"), 16, 1);
    /// trie.insert_value(parse_ipv4("1.1.2.0"), 24, 2);
    /// assert_eq!(trie.lookup(parse_ipv4("1.1.2.9")), Some(2));
    /// assert_eq!(trie.lookup(parse_ipv4("1.1.3.9")), Some(1));
    /// assert_eq!(trie.lookup(parse_ipv4("2.2.2.2")), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup(&self, addr: u32) -> Option<u32> {
        self.get_lpm_node(addr).and_then(|idx| self.pool[idx].value)
    }

    /// Same as [`Self::lookup`], but returns [`NO_VALUE`] instead of `None`.
    pub fn lookup_raw(&self, addr: u32) -> u32 {
        self.lookup(addr).unwrap_or(NO_VALUE)
    }

    /// Get the longest stored prefix that contains `addr`.
    pub fn lookup_prefix(&self, addr: u32) -> Option<Ipv4Prefix> {
        self.get_lpm_node(addr).map(|idx| self.pool[idx].prefix)
    }

    /// Check if exactly `prefix` was inserted, without using longest prefix match.
    ///
    /// ```
    /// # use ipv4_patricia::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = PatriciaTrie::new();
    /// trie.insert_prefix("10.0.0.0/8".parse()?);
    /// trie.insert_prefix("11.0.0.0/8".parse()?);
    /// assert!(trie.contains(&"10.0.0.0/8".parse()?));
    /// assert!(!trie.contains(&"10.0.0.0/7".parse()?)); // branch node, not inserted
    /// assert!(!trie.contains(&"10.0.0.0/16".parse()?));
    /// # Ok(())
    /// # }
    /// ```
    pub fn contains(&self, prefix: &Ipv4Prefix) -> bool {
        let mut cur = Some(self.root);
        while let Some(idx) = cur {
            let node = &self.pool[idx];
            if node.prefix == *prefix {
                return node.terminal;
            }
            if !node.prefix.contains(prefix) {
                return false;
            }
            cur = self
                .pool
                .get_child(idx, prefix.is_bit_set(node.prefix.prefix_len()));
        }
        false
    }

    /// Attach `value` to a node, returning the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `idx` was not returned by this trie.
    pub fn set_value(&mut self, idx: NodeId, value: u32) -> Option<u32> {
        self.pool[idx].value.replace(value)
    }

    /// The value attached to a node.
    pub fn value(&self, idx: NodeId) -> Option<u32> {
        self.pool[idx].value
    }

    /// The prefix a node represents.
    pub fn prefix(&self, idx: NodeId) -> Ipv4Prefix {
        self.pool[idx].prefix
    }

    /// Whether a node is a match point, i.e., its prefix was inserted explicitly.
    pub fn is_terminal(&self, idx: NodeId) -> bool {
        self.pool[idx].terminal
    }

    /// Number of allocated nodes, including the root and all branch nodes.
    pub fn size(&self) -> usize {
        self.pool.len()
    }

    /// Number of distinct prefixes inserted.
    pub fn len(&self) -> usize {
        self.prefixes
    }

    /// Returns `true` if no prefix was inserted.
    pub fn is_empty(&self) -> bool {
        self.prefixes == 0
    }

    /// Bytes reserved by the trie, counting pool capacity that is not yet in use.
    pub fn memory_usage(&self) -> usize {
        size_of::<Self>() + self.pool.capacity() * size_of::<Node>()
    }
}

/// Private function implementations
impl PatriciaTrie {
    /// insert a new node into the pool and return its index.
    #[inline(always)]
    fn new_node(&mut self, prefix: Ipv4Prefix, terminal: bool) -> NodeId {
        if terminal {
            self.prefixes += 1;
        }
        self.pool.alloc(prefix, terminal)
    }

    fn mark_terminal(&mut self, idx: NodeId) {
        let node = &mut self.pool[idx];
        if !node.terminal {
            node.terminal = true;
            self.prefixes += 1;
        }
    }

    /// Link `child` below `parent`, on the side given by the child's bit at the parent's prefix
    /// length. Without a parent, `child` becomes the new root.
    fn attach(&mut self, parent: Option<NodeId>, child: NodeId) {
        match parent {
            Some(parent) => {
                let right = self.pool[child]
                    .prefix
                    .is_bit_set(self.pool[parent].prefix.prefix_len());
                self.pool.set_child(parent, child, right);
            }
            None => self.root = child,
        }
    }

    /// Deepest match point on the path of `addr`.
    fn get_lpm_node(&self, addr: u32) -> Option<NodeId> {
        let mut best_match = None;
        let mut cur = Some(self.root);
        while let Some(idx) = cur {
            let node = &self.pool[idx];
            if !node.prefix.contains_addr(addr) {
                break;
            }
            if node.terminal {
                best_match = Some(idx);
            }
            cur = self
                .pool
                .get_child(idx, is_bit_set(addr, node.prefix.prefix_len()));
        }
        best_match
    }

    /// Get the directions from node `cur` to insert `prefix`.
    #[inline(always)]
    fn get_direction_for_insert(&self, cur: NodeId, prefix: &Ipv4Prefix) -> DirectionForInsert {
        let node = &self.pool[cur];
        let cur_p = &node.prefix;
        let common_mask = cur_p.mask() & prefix.mask();
        if prefix.addr() & common_mask != cur_p.addr() & common_mask {
            let len = common_prefix_len(prefix.addr(), cur_p.addr());
            DirectionForInsert::NewBranch {
                branch_prefix: Ipv4Prefix::new(prefix.addr(), len),
                branch_terminal: node.terminal && len >= 32,
            }
        } else if prefix.prefix_len() < cur_p.prefix_len() {
            DirectionForInsert::NewParent
        } else if prefix.prefix_len() == cur_p.prefix_len() {
            DirectionForInsert::Reached
        } else {
            debug_assert!(cur_p.prefix_len() < 32);
            DirectionForInsert::Enter {
                right: prefix.is_bit_set(cur_p.prefix_len()),
            }
        }
    }
}

impl LongestPrefixMatch for PatriciaTrie {
    fn insert_value(&mut self, prefix: Ipv4Prefix, value: u32) {
        assert_ne!(value, NULL, "NULL is reserved for missing values");
        let idx = self.insert_prefix(prefix);
        self.set_value(idx, value);
    }

    fn matches(&self, addr: u32) -> bool {
        PatriciaTrie::matches(self, addr)
    }

    fn lookup(&self, addr: u32) -> Option<u32> {
        PatriciaTrie::lookup(self, addr)
    }

    fn size(&self) -> usize {
        PatriciaTrie::size(self)
    }
}

impl FromIterator<Ipv4Prefix> for PatriciaTrie {
    fn from_iter<I: IntoIterator<Item = Ipv4Prefix>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl FromIterator<(Ipv4Prefix, u32)> for PatriciaTrie {
    fn from_iter<I: IntoIterator<Item = (Ipv4Prefix, u32)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl Extend<Ipv4Prefix> for PatriciaTrie {
    fn extend<I: IntoIterator<Item = Ipv4Prefix>>(&mut self, iter: I) {
        for prefix in iter {
            self.insert_prefix(prefix);
        }
    }
}

impl Extend<(Ipv4Prefix, u32)> for PatriciaTrie {
    fn extend<I: IntoIterator<Item = (Ipv4Prefix, u32)>>(&mut self, iter: I) {
        for (prefix, value) in iter {
            let idx = self.insert_prefix(prefix);
            self.set_value(idx, value);
        }
    }
}

enum DirectionForInsert {
    /// The new prefix leaves the path of the current node before either prefix length is reached.
    /// A branch node must be placed between the parent and the current node, with the current
    /// node and the new prefix as its two children.
    NewBranch {
        branch_prefix: Ipv4Prefix,
        branch_terminal: bool,
    },
    /// The new prefix is a strict ancestor of the current node and goes between it and its parent.
    NewParent,
    /// The prefix is already reached.
    Reached,
    /// Enter the child on the given side (which may be missing) and search again.
    Enter { right: bool },
}
