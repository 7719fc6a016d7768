//! A red-black tree of bounded unsigned integer keys.
//!
//! Nodes are stored in a generational arena and linked by arena indices, so
//! parent back-references are plain indices that never own anything.
//! Duplicate keys are allowed and are routed to the right on insertion.

use generational_arena::{Arena, Index};
use log::{debug, trace};
use std::fmt;

mod console;
mod display;
mod error;
mod loader;
mod traverse;

pub use console::Console;
pub use error::{parse_key, Error};
pub use loader::BulkLoader;
pub use traverse::{Entry, Traverse};

/// The key type stored in the tree.
pub type Key = u16;

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Color {
    RED,
    BLACK,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::RED => f.write_str("R"),
            Color::BLACK => f.write_str("B"),
        }
    }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<Index>,
    left: Option<Index>,
    right: Option<Index>,

    key: Key,
    color: Color,
}

impl Node {
    fn new(key: Key) -> Self {
        Node {
            // Tree structure
            parent: None,
            left: None,
            right: None,

            // Data
            key,
            color: Color::RED,
        }
    }

    fn child(&self, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Option<Index> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// The tree structure.
/// Stores the nodes in a generational arena and the index of the root of the tree.
pub struct Tree {
    nodes: Arena<Node>,
    root: Option<Index>,
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

impl Tree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Tree {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// The number of keys in the tree, counting duplicates.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, node: Option<Index>) -> usize {
        match node {
            Some(node) => {
                1 + self
                    .subtree_height(self.get_left(node))
                    .max(self.subtree_height(self.get_right(node)))
            }
            None => 0,
        }
    }

    /// Insert a key and rebalance the tree.
    /// Keys equal to an existing key are placed to its right, so duplicates accumulate.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    ///
    pub fn insert(&mut self, key: Key) {
        let mut current = match self.root {
            Some(root) => root,
            None => {
                let root = self.nodes.insert(Node::new(key));
                self.set_color(root, Color::BLACK);
                self.root = Some(root);
                debug!("Created root {}", key);
                return;
            }
        };

        loop {
            let side = if key < self.get_key(current) {
                Side::Left
            } else {
                Side::Right
            };
            match self.get_child(current, side) {
                Some(child) => current = child,
                None => {
                    let new_node = self.nodes.insert(Node::new(key));
                    self.set_child(current, side, Some(new_node));
                    self.set_parent(new_node, Some(current));

                    // Balance the tree
                    self.insert_rebalance(new_node);
                    return;
                }
            }
        }
    }

    /// Returns true if at least one node holds `key`.
    pub fn contains(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Delete one node holding `key` and rebalance the remaining nodes.
    /// Returns false, leaving the tree untouched, if no node holds `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove one instance of
    ///
    pub fn delete(&mut self, key: Key) -> bool {
        match self.find(key) {
            Some(node) => {
                self.delete_node(node);
                true
            }
            None => {
                trace!("Key {} not found for deletion", key);
                false
            }
        }
    }

    // Descends from the root to the first node holding `key`
    fn find(&self, key: Key) -> Option<Index> {
        let mut node = self.root;
        while let Some(current) = node {
            let current_key = self.get_key(current);
            if key == current_key {
                return Some(current);
            }
            node = if key < current_key {
                self.get_left(current)
            } else {
                self.get_right(current)
            };
        }
        None
    }

    fn delete_node(&mut self, mut node: Index) {
        if let (Some(_), Some(right)) = (self.get_left(node), self.get_right(node)) {
            // Move the successor's key up and remove the successor instead,
            // which has no left child
            let successor = self.get_leftmost(right);
            self.swap_keys(node, successor);
            node = successor;
        }

        let replacement = self.get_replacement_node(node);
        let both_black = self.get_color(Some(node)) == Color::BLACK
            && self.get_color(replacement) == Color::BLACK;
        match replacement {
            None => {
                // The node is a leaf
                if Some(node) != self.root {
                    if both_black {
                        // The fixup needs the node in place to find its sibling
                        self.fix_double_black(node);
                    } else if let Some(sibling) = self.get_sibling(node) {
                        // The node must be red, so any sibling is a red leaf already
                        self.set_color(sibling, Color::RED);
                    }
                }
                let parent = self.get_parent(node);
                self.replace_in_parent(node, parent, None);
                self.nodes.remove(node);
            }
            Some(replacement) => {
                if Some(node) == self.root {
                    // The root keeps its position and absorbs its only child
                    let key = self.get_key(replacement);
                    self.set_key(node, key);
                    self.set_left(node, None);
                    self.set_right(node, None);
                    self.nodes.remove(replacement);
                } else {
                    let parent = self.get_parent(node);
                    self.replace_in_parent(node, parent, Some(replacement));
                    self.set_parent(replacement, parent);
                    self.nodes.remove(node);
                    if both_black {
                        self.fix_double_black(replacement);
                    } else {
                        self.set_color(replacement, Color::BLACK);
                    }
                }
            }
        }
    }

    // Finds the node that will replace a deleted node with at most one child
    fn get_replacement_node(&self, node: Index) -> Option<Index> {
        let left = self.get_left(node);
        let right = self.get_right(node);
        debug_assert!(
            left.is_none() || right.is_none(),
            "Cannot find replacement node for a node with two child nodes"
        );
        left.or(right)
    }

    // Fix a double black node that has been caused by deleting a node
    fn fix_double_black(&mut self, mut node: Index) {
        while let Some(parent) = self.get_parent(node) {
            let node_side = self.side_in(parent, node);
            let sibling_side = node_side.opposite();
            let sibling = match self.get_child(parent, sibling_side) {
                Some(sibling) => sibling,
                None => {
                    // No sibling, double black is pushed up
                    debug!("Double black at {} has no sibling", self.get_key(node));
                    node = parent;
                    continue;
                }
            };

            if self.get_color(Some(sibling)) == Color::RED {
                // Rotate the red sibling above the parent, the double black stays at node
                debug!("Double black at {} has a red sibling", self.get_key(node));
                self.set_color(parent, Color::RED);
                self.set_color(sibling, Color::BLACK);
                self.rotate(parent, node_side);
                continue;
            }

            match self.get_red_child(sibling) {
                Some((red_side, red_child)) => {
                    if red_side == sibling_side {
                        // Left-Left or Right-Right
                        debug!("Double black at {} has an outer red nephew", self.get_key(node));
                        self.set_color(red_child, self.get_color(Some(sibling)));
                        self.set_color(sibling, self.get_color(Some(parent)));
                    } else {
                        // Left-Right or Right-Left
                        debug!("Double black at {} has an inner red nephew", self.get_key(node));
                        self.set_color(red_child, self.get_color(Some(parent)));
                        self.rotate(sibling, sibling_side);
                    }
                    self.rotate(parent, node_side);
                    self.set_color(parent, Color::BLACK);
                    break;
                }
                None => {
                    // 2 Black children
                    self.set_color(sibling, Color::RED);
                    if self.get_color(Some(parent)) == Color::BLACK {
                        node = parent;
                    } else {
                        self.set_color(parent, Color::BLACK);
                        break;
                    }
                }
            }
        }
    }

    // Rebalances the tree after inserting a new node
    fn insert_rebalance(&mut self, mut node: Index) {
        while Some(node) != self.root
            && self.get_color(Some(node)) == Color::RED
            && self.get_color(self.get_parent(node)) == Color::RED
        {
            // A red parent is never the root so the grandparent exists
            let (mut parent, grandparent) = match self
                .get_parent(node)
                .and_then(|parent| self.get_parent(parent).map(|grandparent| (parent, grandparent)))
            {
                Some(family) => family,
                None => break,
            };
            let parent_side = self.side_in(grandparent, parent);
            let uncle = self.get_child(grandparent, parent_side.opposite());

            if let (Color::RED, Some(uncle)) = (self.get_color(uncle), uncle) {
                // Uncle is red so we can balance by re-coloring and push the conflict up
                debug!("Red uncle above {}, recoloring", self.get_key(node));
                self.set_color(uncle, Color::BLACK);
                self.set_color(parent, Color::BLACK);
                self.set_color(grandparent, Color::RED);
                node = grandparent;
            } else {
                if self.side_in(parent, node) != parent_side {
                    // Left-right or right-left case, straighten the line first
                    debug!("Black uncle above inner grandchild {}", self.get_key(node));
                    self.rotate(parent, parent_side);
                    // The node now sits above the old parent so account for this
                    parent = node;
                }
                // Left-Left or Right-Right case, rotate the grandparent away from the conflict
                self.rotate(grandparent, parent_side.opposite());
                let parent_color = self.get_color(Some(parent));
                self.set_color(parent, self.get_color(Some(grandparent)));
                self.set_color(grandparent, parent_color);
                node = parent;
            }
        }
        if let Some(root) = self.root {
            self.set_color(root, Color::BLACK);
        }
    }

    // Rotates the nodes towards `direction`, a left rotation shown here
    //    p              q
    //   / \            / \
    //  a   q   -->    p   c
    //     / \        / \
    //    b   c      a   b
    // A right rotation is the mirror image. Colors are left untouched.
    // The rotation root must have a child on the side opposite `direction`.
    fn rotate(&mut self, rotation_root: Index, direction: Side) {
        let pivot = self.get_child(rotation_root, direction.opposite()).unwrap();
        let inner = self.get_child(pivot, direction);
        let parent = self.get_parent(rotation_root);
        trace!(
            "Rotating {:?} at {}",
            direction,
            self.get_key(rotation_root)
        );

        // The inner child of the pivot moves across to the rotation root
        self.set_child(rotation_root, direction.opposite(), inner);
        if let Some(inner) = inner {
            self.set_parent(inner, Some(rotation_root));
        }

        // The pivot replaces the rotation root in the tree
        self.set_parent(pivot, parent);
        self.replace_in_parent(rotation_root, parent, Some(pivot));

        // The rotation root hangs below the pivot
        self.set_child(pivot, direction, Some(rotation_root));
        self.set_parent(rotation_root, Some(pivot));
    }

    // Points whatever owned `node` (its parent, or the tree itself) at `replacement`
    fn replace_in_parent(&mut self, node: Index, parent: Option<Index>, replacement: Option<Index>) {
        match parent {
            Some(parent) => {
                let side = self.side_in(parent, node);
                self.set_child(parent, side, replacement);
            }
            None => self.root = replacement,
        }
    }

    fn swap_keys(&mut self, node_1: Index, node_2: Index) {
        let key_1 = self.get_key(node_1);
        self.set_key(node_1, self.get_key(node_2));
        self.set_key(node_2, key_1);
    }

    // Returns which side of `parent` the child `node` hangs from
    fn side_in(&self, parent: Index, node: Index) -> Side {
        if self.get_left(parent) == Some(node) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Returns the sibling node to the current node, that is the other node that shares the same parent
    fn get_sibling(&self, node: Index) -> Option<Index> {
        let parent = self.get_parent(node)?;
        self.get_child(parent, self.side_in(parent, node).opposite())
    }

    // Returns the first red child of a node, checking the left first
    fn get_red_child(&self, node: Index) -> Option<(Side, Index)> {
        [Side::Left, Side::Right].iter().find_map(|&side| {
            let child = self.get_child(node, side)?;
            if self.get_color(Some(child)) == Color::RED {
                Some((side, child))
            } else {
                None
            }
        })
    }

    fn get_leftmost(&self, mut node: Index) -> Index {
        while let Some(left) = self.get_left(node) {
            node = left;
        }
        node
    }

    // Getter and setters
    fn get_child(&self, node: Index, side: Side) -> Option<Index> {
        self.nodes[node].child(side)
    }

    fn set_child(&mut self, node: Index, side: Side, child: Option<Index>) {
        *self.nodes[node].child_mut(side) = child;
    }

    fn set_right(&mut self, node: Index, right: Option<Index>) {
        self.nodes[node].right = right;
    }

    fn get_right(&self, node: Index) -> Option<Index> {
        self.nodes[node].right
    }

    fn set_left(&mut self, node: Index, left: Option<Index>) {
        self.nodes[node].left = left;
    }

    fn get_left(&self, node: Index) -> Option<Index> {
        self.nodes[node].left
    }

    fn set_parent(&mut self, node: Index, parent: Option<Index>) {
        self.nodes[node].parent = parent;
    }

    fn get_parent(&self, node: Index) -> Option<Index> {
        self.nodes[node].parent
    }

    fn set_key(&mut self, node: Index, key: Key) {
        self.nodes[node].key = key;
    }

    fn get_key(&self, node: Index) -> Key {
        self.nodes[node].key
    }

    fn set_color(&mut self, node: Index, color: Color) {
        self.nodes[node].color = color;
    }

    fn get_color(&self, node: Option<Index>) -> Color {
        match node.and_then(|node| self.nodes.get(node)) {
            Some(node) => node.color,
            None => Color::BLACK,
        }
    }
}

#[cfg(test)]
mod proptests;
