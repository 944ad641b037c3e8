//! Balanced 2-3 tree keyed by strings.
//!
//! Leaves hold every `(key, value)` entry; internal nodes hold copies of the
//! keys split off their children and are only used for routing. A key equal
//! to a routing key always lives in the subtree to its right, so the routing
//! key is the smallest key of that subtree.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. The parent
//! link is a plain index: it is followed upward when an overflow is pushed
//! into the parent, and sideways when a scan moves on to the next leaf, but
//! it never owns anything.
//!
//! # Example
//!
//! ```
//! use permdex::permuterm::tree::TwoThreeTree;
//!
//! let mut tree = TwoThreeTree::new();
//! for (i, key) in ["og$d", "dog$", "g$do", "$dog"].iter().enumerate() {
//!     tree.insert(*key, i);
//! }
//!
//! let hits: Vec<_> = tree.search("g$").into_iter().map(|(k, _)| k).collect();
//! assert_eq!(hits, vec!["g$do"]);
//! assert!(tree.check_invariants().is_ok());
//! ```

use std::mem;

use crate::error::{PermdexError, Result};

/// Most keys a node holds once an insertion has been fully absorbed.
const MAX_KEYS: usize = 2;

/// Stable handle of a node inside the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind<V> {
    Leaf {
        entries: Vec<(String, V)>,
    },
    Internal {
        keys: Vec<String>,
        children: Vec<NodeId>,
    },
}

#[derive(Debug, Clone)]
struct Node<V> {
    parent: Option<NodeId>,
    kind: NodeKind<V>,
}

impl<V> Node<V> {
    fn key_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf { entries } => entries.len(),
            NodeKind::Internal { keys, .. } => keys.len(),
        }
    }

    fn is_overflowing(&self) -> bool {
        self.key_count() > MAX_KEYS
    }
}

/// Index of the child whose range contains `key`.
///
/// One key gives a 2-way branch, two keys a 3-way branch.
fn child_slot(keys: &[String], key: &str) -> usize {
    keys.partition_point(|k| k.as_str() <= key)
}

/// A 2-3 tree mapping string keys to values.
///
/// All leaves sit at the same depth, every internal node has one or two keys
/// and exactly one more child than keys, and an in-order walk of the leaves
/// yields the keys in ascending order.
#[derive(Debug, Clone)]
pub struct TwoThreeTree<V> {
    nodes: Vec<Node<V>>,
    root: NodeId,
    len: usize,
    height: usize,
}

impl<V> Default for TwoThreeTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TwoThreeTree<V> {
    /// Create an empty tree (a single empty leaf as root).
    pub fn new() -> Self {
        TwoThreeTree {
            nodes: vec![Node {
                parent: None,
                kind: NodeKind::Leaf {
                    entries: Vec::new(),
                },
            }],
            root: NodeId(0),
            len: 0,
            height: 1,
        }
    }

    /// Number of entries stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, counting the leaf level. An empty tree has height 1.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of allocated nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.0]
    }

    fn entries(&self, id: NodeId) -> &[(String, V)] {
        match &self.node(id).kind {
            NodeKind::Leaf { entries } => entries,
            NodeKind::Internal { .. } => &[],
        }
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Leaf { .. } => &[],
            NodeKind::Internal { children, .. } => children,
        }
    }

    /// Descend from the root to the leaf whose range contains `key`.
    fn find_leaf(&self, key: &str) -> NodeId {
        let mut current = self.root;
        loop {
            match &self.node(current).kind {
                NodeKind::Leaf { .. } => return current,
                NodeKind::Internal { keys, children } => {
                    current = children[child_slot(keys, key)];
                }
            }
        }
    }

    fn leftmost_leaf(&self, from: NodeId) -> NodeId {
        let mut current = from;
        while let Some(&first) = self.children(current).first() {
            current = first;
        }
        current
    }

    /// The leaf following `leaf` in key order, found through parent links.
    fn next_leaf(&self, leaf: NodeId) -> Option<NodeId> {
        let mut current = leaf;
        loop {
            let parent = self.node(current).parent?;
            let siblings = self.children(parent);
            let slot = siblings.iter().position(|&c| c == current)?;
            if let Some(&next) = siblings.get(slot + 1) {
                return Some(self.leftmost_leaf(next));
            }
            current = parent;
        }
    }

    /// Insert `key` with `value`.
    ///
    /// Returns the previous value if `key` was already present; the tree shape
    /// is left untouched in that case.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: V) -> Option<V> {
        let key = key.into();
        let leaf = self.find_leaf(&key);

        let NodeKind::Leaf { entries } = &mut self.node_mut(leaf).kind else {
            unreachable!("descent always ends at a leaf");
        };
        match entries.binary_search_by(|(k, _)| k.as_str().cmp(key.as_str())) {
            Ok(pos) => return Some(mem::replace(&mut entries[pos].1, value)),
            Err(pos) => entries.insert(pos, (key, value)),
        }

        self.len += 1;
        self.rebalance_from(leaf);
        None
    }

    /// Split overflowing nodes from `start` upward along the parent chain.
    ///
    /// Each round either stops at a node that absorbed the promoted key or
    /// moves exactly one level up, so the work is bounded by the height.
    fn rebalance_from(&mut self, start: NodeId) {
        let mut current = start;
        while self.node(current).is_overflowing() {
            let (separator, right) = self.split(current);
            match self.node(current).parent {
                None => {
                    self.grow_root(current, separator, right);
                    return;
                }
                Some(parent) => {
                    self.attach(parent, current, separator, right);
                    current = parent;
                }
            }
        }
    }

    /// Split an overflowing node in two.
    ///
    /// The node keeps the left half and a new sibling takes the right half.
    /// Returns the promoted separator and the new sibling.
    fn split(&mut self, id: NodeId) -> (String, NodeId) {
        let right_id = NodeId(self.nodes.len());
        let parent = self.node(id).parent;

        let (separator, right_kind, moved) = match &mut self.node_mut(id).kind {
            NodeKind::Leaf { entries } => {
                // The middle entry stays in the right leaf; only its key is copied up.
                let right_entries = entries.split_off(1);
                let separator = right_entries[0].0.clone();
                (
                    separator,
                    NodeKind::Leaf {
                        entries: right_entries,
                    },
                    Vec::new(),
                )
            }
            NodeKind::Internal { keys, children } => {
                let mut right_keys = keys.split_off(1);
                let separator = right_keys.remove(0);
                let right_children = children.split_off(2);
                let moved = right_children.clone();
                (
                    separator,
                    NodeKind::Internal {
                        keys: right_keys,
                        children: right_children,
                    },
                    moved,
                )
            }
        };

        self.nodes.push(Node {
            parent,
            kind: right_kind,
        });
        for child in moved {
            self.node_mut(child).parent = Some(right_id);
        }

        (separator, right_id)
    }

    fn grow_root(&mut self, left: NodeId, separator: String, right: NodeId) {
        let root = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            kind: NodeKind::Internal {
                keys: vec![separator],
                children: vec![left, right],
            },
        });
        self.node_mut(left).parent = Some(root);
        self.node_mut(right).parent = Some(root);
        self.root = root;
        self.height += 1;
    }

    /// Insert the promoted `separator` and its right-hand node into `parent`,
    /// directly after `left`.
    fn attach(&mut self, parent: NodeId, left: NodeId, separator: String, right: NodeId) {
        if let NodeKind::Internal { keys, children } = &mut self.node_mut(parent).kind {
            let slot = child_slot(keys, &separator);
            debug_assert_eq!(children[slot], left);
            keys.insert(slot, separator);
            children.insert(slot + 1, right);
        }
    }

    /// Look up the value stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        let entries = self.entries(self.find_leaf(key));
        entries
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|pos| &entries[pos].1)
    }

    /// In-order iterator over all entries.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            tree: self,
            leaf: Some(self.leftmost_leaf(self.root)),
            pos: 0,
        }
    }

    /// In-order iterator starting at the first key `>= lower`.
    pub fn range_from(&self, lower: &str) -> Iter<'_, V> {
        let leaf = self.find_leaf(lower);
        let pos = self
            .entries(leaf)
            .partition_point(|(k, _)| k.as_str() < lower);
        Iter {
            tree: self,
            leaf: Some(leaf),
            pos,
        }
    }

    /// Every entry whose key starts with `prefix`, in key order.
    ///
    /// Runs in O(height + matches): one descent to the lower bound, then a
    /// leaf-to-leaf scan that stops at the first non-matching key.
    pub fn search(&self, prefix: &str) -> Vec<(&str, &V)> {
        self.range_from(prefix)
            .take_while(|(key, _)| key.starts_with(prefix))
            .collect()
    }

    /// Verify the structural invariants, reporting the first violation.
    pub fn check_invariants(&self) -> Result<()> {
        let mut leaf_depth = None;
        let count = self.check_node(self.root, None, 1, None, None, &mut leaf_depth)?;

        if count != self.len {
            return Err(PermdexError::invariant(format!(
                "tree reports {} entries but leaves hold {}",
                self.len, count
            )));
        }
        if leaf_depth != Some(self.height) {
            return Err(PermdexError::invariant(format!(
                "recorded height {} does not match leaf depth {:?}",
                self.height, leaf_depth
            )));
        }
        Ok(())
    }

    fn check_node(
        &self,
        id: NodeId,
        expected_parent: Option<NodeId>,
        depth: usize,
        lower: Option<&str>,
        upper: Option<&str>,
        leaf_depth: &mut Option<usize>,
    ) -> Result<usize> {
        let node = self.node(id);
        if node.parent != expected_parent {
            return Err(PermdexError::invariant(format!(
                "node {:?} has parent {:?}, expected {:?}",
                id, node.parent, expected_parent
            )));
        }

        let keys: Vec<&str> = match &node.kind {
            NodeKind::Leaf { entries } => entries.iter().map(|(k, _)| k.as_str()).collect(),
            NodeKind::Internal { keys, .. } => keys.iter().map(String::as_str).collect(),
        };

        let empty_root = id == self.root && self.len == 0;
        if (keys.is_empty() && !empty_root) || keys.len() > MAX_KEYS {
            return Err(PermdexError::invariant(format!(
                "node {:?} holds {} keys",
                id,
                keys.len()
            )));
        }
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(PermdexError::invariant(format!(
                "keys of node {id:?} are not strictly ascending"
            )));
        }
        for key in &keys {
            let below = lower.is_some_and(|l| *key < l);
            let above = upper.is_some_and(|u| *key >= u);
            if below || above {
                return Err(PermdexError::invariant(format!(
                    "key '{key}' of node {id:?} lies outside [{lower:?}, {upper:?})"
                )));
            }
        }

        match &node.kind {
            NodeKind::Leaf { entries } => {
                match *leaf_depth {
                    None => *leaf_depth = Some(depth),
                    Some(d) if d != depth => {
                        return Err(PermdexError::invariant(format!(
                            "leaf {id:?} at depth {depth}, other leaves at depth {d}"
                        )));
                    }
                    Some(_) => {}
                }
                Ok(entries.len())
            }
            NodeKind::Internal { children, .. } => {
                if children.len() != keys.len() + 1 {
                    return Err(PermdexError::invariant(format!(
                        "node {:?} has {} keys but {} children",
                        id,
                        keys.len(),
                        children.len()
                    )));
                }
                let mut count = 0;
                for (slot, &child) in children.iter().enumerate() {
                    let child_lower = if slot == 0 { lower } else { Some(keys[slot - 1]) };
                    let child_upper = keys.get(slot).copied().or(upper);
                    count += self.check_node(
                        child,
                        Some(id),
                        depth + 1,
                        child_lower,
                        child_upper,
                        leaf_depth,
                    )?;
                }
                Ok(count)
            }
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for TwoThreeTree<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = TwoThreeTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for TwoThreeTree<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// In-order iterator over a [`TwoThreeTree`].
pub struct Iter<'a, V> {
    tree: &'a TwoThreeTree<V>,
    leaf: Option<NodeId>,
    pos: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let tree = self.tree;
            let leaf = self.leaf?;
            if let Some((key, value)) = tree.entries(leaf).get(self.pos) {
                self.pos += 1;
                return Some((key.as_str(), value));
            }
            self.leaf = tree.next_leaf(leaf);
            self.pos = 0;
        }
    }
}
