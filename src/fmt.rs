//! Formatting implementation for the PatriciaTrie

use std::fmt::{Debug, Formatter, Result};

use crate::inner::NodeId;
use crate::PatriciaTrie;

impl Debug for PatriciaTrie {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugNode(self, self.root).fmt(f)
    }
}

/// A node renders as its bare prefix if it is neither a match point nor has children, and as a
/// one-entry map from its prefix to its contents otherwise.
struct DebugNode<'a>(&'a PatriciaTrie, NodeId);

/// Value of a match point; `*` if no value is attached.
struct DebugValue(Option<u32>);

/// The value (for match points) followed by the children, left first. A single item is printed
/// as is, several items as a tuple.
struct DebugContent<'a>(Option<DebugValue>, Vec<DebugNode<'a>>);

impl Debug for DebugValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.0 {
            Some(v) => v.fmt(f),
            None => f.write_str("*"),
        }
    }
}

impl Debug for DebugNode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let trie = self.0;
        let node = &trie.pool[self.1];
        let value = node.prefix_value().map(|(_, v)| DebugValue(v));
        let children: Vec<Self> = [node.left, node.right]
            .into_iter()
            .flatten()
            .map(|child| Self(trie, child))
            .collect();
        if value.is_none() && children.is_empty() {
            return node.prefix.fmt(f);
        }
        f.debug_map()
            .entry(&node.prefix, &DebugContent(value, children))
            .finish()
    }
}

impl Debug for DebugContent<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let items: Vec<&dyn Debug> = self
            .0
            .iter()
            .map(|v| v as &dyn Debug)
            .chain(self.1.iter().map(|c| c as &dyn Debug))
            .collect();
        match items.as_slice() {
            [single] => single.fmt(f),
            _ => {
                let mut tuple = f.debug_tuple("");
                for item in &items {
                    tuple.field(item);
                }
                tuple.finish()
            }
        }
    }
}
