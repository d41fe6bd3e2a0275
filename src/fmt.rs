//! Formatting implementations showing the live tree structure.

use std::fmt::{Debug, Formatter, Result};

use crate::key::prefix_from_key;
use crate::tree::Tree;
use crate::{PrefixMap, PrefixMapBuilder, PrefixSet, PrefixSetBuilder};

struct DebugTree<'a, T>(&'a Tree<T>, usize);

impl<T: Debug> Debug for DebugTree<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let tree = self.0;
        let node = tree.node(self.1);
        let prefix = prefix_from_key(node.key);
        match (node.value.as_ref(), node.left, node.right) {
            (None, None, None) => prefix.fmt(f),
            (None, None, Some(child)) | (None, Some(child), None) => f
                .debug_map()
                .entry(&prefix, &Self(tree, child))
                .finish(),
            (None, Some(left), Some(right)) => f
                .debug_map()
                .entry(&prefix, &(Self(tree, left), Self(tree, right)))
                .finish(),
            (Some(v), None, None) => f.debug_map().entry(&prefix, v).finish(),
            (Some(v), None, Some(child)) | (Some(v), Some(child), None) => f
                .debug_map()
                .entry(&prefix, &(v, Self(tree, child)))
                .finish(),
            (Some(v), Some(left), Some(right)) => f
                .debug_map()
                .entry(&prefix, &(v, Self(tree, left), Self(tree, right)))
                .finish(),
        }
    }
}

impl<T: Debug> Debug for PrefixMap<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugTree(&self.tree, 0).fmt(f)
    }
}

impl<T: Debug> Debug for PrefixMapBuilder<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugTree(&self.tree, 0).fmt(f)
    }
}

impl Debug for PrefixSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugTree(&self.tree, 0).fmt(f)
    }
}

impl Debug for PrefixSetBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugTree(&self.tree, 0).fmt(f)
    }
}
