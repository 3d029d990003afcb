//! The node pool backing a [`crate::PatriciaTrie`].

use std::ops::{Index, IndexMut};

use crate::Ipv4Prefix;

/// Number of nodes reserved at once when the pool runs out of space.
pub const DEFAULT_BLOCK_SIZE: usize = 128;

/// Handle to a node of a [`crate::PatriciaTrie`].
///
/// A handle stays valid for the whole lifetime of the trie that returned it, as nodes are never
/// removed. Using a handle with a different trie is a logic error and may panic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub(crate) usize);

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) prefix: Ipv4Prefix,
    pub(crate) terminal: bool,
    pub(crate) value: Option<u32>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl Node {
    /// get the tuple of prefix and value, if the node is a match point.
    pub(crate) fn prefix_value(&self) -> Option<(&Ipv4Prefix, Option<u32>)> {
        self.terminal.then_some((&self.prefix, self.value))
    }
}

/// All nodes of one trie, stored contiguously. Capacity grows in whole blocks, so allocating a node
/// only touches the allocator once every `block` insertions.
#[derive(Clone)]
pub(crate) struct NodePool {
    nodes: Vec<Node>,
    block: usize,
}

impl NodePool {
    pub(crate) fn with_block_size(block: usize) -> Self {
        let block = block.max(1);
        Self {
            nodes: Vec::with_capacity(block),
            block,
        }
    }

    /// Allocate a fresh node without children.
    pub(crate) fn alloc(&mut self, prefix: Ipv4Prefix, terminal: bool) -> NodeId {
        if self.nodes.len() == self.nodes.capacity() {
            log::trace!(
                "growing node pool from {} by {} nodes",
                self.nodes.capacity(),
                self.block
            );
            self.nodes.reserve_exact(self.block);
        }
        let idx = self.nodes.len();
        self.nodes.push(Node {
            prefix,
            terminal,
            value: None,
            left: None,
            right: None,
        });
        NodeId(idx)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Get the child of a node, either to the left or the right
    #[inline(always)]
    pub(crate) fn get_child(&self, idx: NodeId, right: bool) -> Option<NodeId> {
        if right {
            self[idx].right
        } else {
            self[idx].left
        }
    }

    /// set the child of a node (either to the left or the right), and return the old child.
    #[inline(always)]
    pub(crate) fn set_child(&mut self, idx: NodeId, child: NodeId, right: bool) -> Option<NodeId> {
        if right {
            self[idx].right.replace(child)
        } else {
            self[idx].left.replace(child)
        }
    }
}

impl Index<NodeId> for NodePool {
    type Output = Node;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeId> for NodePool {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}
