use crate::Tree;
use generational_arena::Index;
use std::fmt;

// Columns of indentation per level of depth
const INDENT: usize = 8;

impl Tree {
    // Left subtree first so the tree reads sideways with the root on the left
    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, node: Option<Index>, depth: usize) -> fmt::Result {
        let node = match node {
            Some(node) => node,
            None => return Ok(()),
        };
        self.fmt_subtree(f, self.get_left(node), depth + 1)?;

        let entry = self.entry(node);
        write!(f, "{:width$}{}({})(p=", "", entry.key, entry.color, width = depth * INDENT)?;
        match entry.parent {
            Some(parent) => writeln!(f, "{})", parent)?,
            None => writeln!(f, "NULL)")?,
        }

        self.fmt_subtree(f, self.get_right(node), depth + 1)
    }
}

/// Renders the tree sideways, one node per line as `key(color)(p=parent)`.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_subtree(f, self.root, 0)
    }
}
