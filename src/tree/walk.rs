//! Path-directed traversal and the queries built on top of it.

use super::Tree;
use crate::key::Key;

impl<T> Tree<T> {
    /// Walks the tree from the root: first along the bits of `path` as long
    /// as nodes on the path exist, then depth-first over all remaining
    /// descendants, left before right. `f` is called for every visited node
    /// except the zero-key sentinel. Returning `true` from `f` during the
    /// path phase stops the walk; during the depth-first phase it stops the
    /// descent below that node.
    pub(crate) fn walk<F: FnMut(usize) -> bool>(&self, path: Key, mut f: F) {
        let mut idx = 0;
        loop {
            let key = self.key(idx);
            if key.len >= path.len {
                break;
            }
            if !key.is_zero() && f(idx) {
                return;
            }
            match self.child(idx, path.bit(key.len)) {
                Some(child) => idx = child,
                None => return,
            }
        }
        let mut stack = vec![idx];
        while let Some(idx) = stack.pop() {
            let key = self.key(idx);
            let stop = !key.is_zero() && f(idx);
            if !stop && key.len < Key::MAX_LEN {
                if let Some(right) = self.child(idx, true) {
                    stack.push(right);
                }
                if let Some(left) = self.child(idx, false) {
                    stack.push(left);
                }
            }
        }
    }

    /// The value stored at exactly `k`, if any.
    pub(crate) fn get(&self, k: Key) -> Option<&T> {
        let mut idx = 0;
        loop {
            let key = self.key(idx);
            if !key.is_zero() && key.len >= k.len {
                return if key.equal_from_root(k) {
                    self.node(idx).value.as_ref()
                } else {
                    None
                };
            }
            idx = self.child(idx, k.bit(key.len))?;
        }
    }

    /// Whether the exact key `k` has an entry.
    pub(crate) fn contains(&self, k: Key) -> bool {
        self.get(k).is_some()
    }

    /// Whether some entry's key is a (possibly strict) prefix of `k`.
    pub(crate) fn encompasses(&self, k: Key, strict: bool) -> bool {
        let mut found = false;
        self.walk(k, |idx| {
            let node = self.node(idx);
            found = node.value.is_some() && node.key.is_prefix_of(k, strict);
            found
        });
        found
    }

    /// The shortest entry prefix of `k`, with its value.
    pub(crate) fn root_of(&self, k: Key, strict: bool) -> Option<(Key, &T)> {
        let mut result = None;
        self.walk(k, |idx| {
            let node = self.node(idx);
            if node.key.is_prefix_of(k, strict) {
                if let Some(v) = node.value.as_ref() {
                    result = Some((node.key, v));
                    return true;
                }
            }
            false
        });
        result
    }

    /// The longest entry prefix of `k`, with its value.
    pub(crate) fn parent_of(&self, k: Key, strict: bool) -> Option<(Key, &T)> {
        let mut result = None;
        self.walk(k, |idx| {
            let node = self.node(idx);
            if node.key.is_prefix_of(k, strict) {
                if let Some(v) = node.value.as_ref() {
                    result = Some((node.key, v));
                }
            }
            false
        });
        result
    }

    /// Whether any entry's key is a prefix of `k`, or vice versa.
    pub(crate) fn overlaps_key(&self, k: Key) -> bool {
        let mut found = false;
        self.walk(k, |idx| {
            let node = self.node(idx);
            if node.value.is_some()
                && (node.key.is_prefix_of(k, false) || k.is_prefix_of(node.key, false))
            {
                found = true;
            }
            found
        });
        found
    }
}

impl<T: Clone> Tree<T> {
    /// A fresh tree holding a copy of the subtree at `k`, rerooted with
    /// offset 0. If `k` falls in the middle of a compressed segment, the
    /// subtree below it is used. The subtree root's own entry is dropped if
    /// `strict` and its key is exactly `k`. Returns an empty tree if
    /// nothing in the tree lies under `k`.
    pub(crate) fn descendants_of(&self, k: Key, strict: bool) -> Tree<T> {
        let mut ret = Tree::new();
        self.walk(k, |idx| {
            let node = self.node(idx);
            if k.is_prefix_of(node.key, false) {
                ret.copy_from(self, idx);
                ret.node_mut(0).key.offset = 0;
                if strict && node.key.equal_from_root(k) {
                    ret.node_mut(0).value = None;
                }
                return true;
            }
            false
        });
        ret
    }

    /// A fresh tree holding every entry whose key is a prefix of `k`,
    /// excluding `k` itself if `strict`.
    pub(crate) fn ancestors_of(&self, k: Key, strict: bool) -> Tree<T> {
        let mut ret = Tree::new();
        self.walk(k, |idx| {
            let node = self.node(idx);
            if !node.key.is_prefix_of(k, false) {
                return true;
            }
            if !(strict && node.key.equal_from_root(k)) {
                if let Some(v) = node.value.clone() {
                    ret.insert(0, node.key.rest(0), v);
                }
            }
            false
        });
        ret
    }
}
