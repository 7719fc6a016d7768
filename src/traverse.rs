use crate::{Color, Key, Tree};
use generational_arena::Index;

/// One node as seen by an in-order walk.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Entry {
    pub key: Key,
    pub color: Color,
    /// The parent's key, `None` for the root
    pub parent: Option<Key>,
}

/// In-order iterator over the nodes of a tree, returned by [`Tree::traverse`].
pub struct Traverse<'a> {
    tree: &'a Tree,
    stack: Vec<Index>,
    next: Option<Index>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        while let Some(node) = self.next {
            self.stack.push(node);
            self.next = self.tree.get_left(node);
        }
        let node = self.stack.pop()?;
        self.next = self.tree.get_right(node);
        Some(self.tree.entry(node))
    }
}

impl Tree {
    /// Walks the tree in key order, yielding each node's key, color and parent key.
    /// Every call starts a fresh walk from the root.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            tree: self,
            stack: Vec::new(),
            next: self.root,
        }
    }

    pub(crate) fn entry(&self, node: Index) -> Entry {
        Entry {
            key: self.get_key(node),
            color: self.get_color(Some(node)),
            parent: self.get_parent(node).map(|parent| self.get_key(parent)),
        }
    }
}
