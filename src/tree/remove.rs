//! Removal and subtraction: exact removal, hole-punching subtraction of a
//! single key, and subtraction of an entire tree.

use super::Tree;
use crate::key::Key;

impl<T> Tree<T> {
    /// Removes the exact key `k`. A node left without entry and with a
    /// single child is merged into that child; the deeper structure is left
    /// as is and recompressed when the tree is frozen. Returns the node
    /// taking `idx`'s place together with the removed value.
    pub(crate) fn remove(&mut self, idx: usize, k: Key) -> (Option<usize>, Option<T>) {
        let tkey = self.key(idx);
        if tkey.equal_from_root(k) {
            let value = self.node_mut(idx).value.take();
            let replacement = match (self.child(idx, false), self.child(idx, true)) {
                (None, None) if idx != 0 => None,
                (Some(child), None) | (None, Some(child)) if idx != 0 => {
                    // merge with the only child: it adopts this segment
                    self.node_mut(child).key.offset = tkey.offset;
                    Some(child)
                }
                // a shared prefix (or the root sentinel) must remain
                _ => Some(idx),
            };
            return (replacement, value);
        }
        if tkey.is_prefix_of(k, false) {
            let right = k.bit(tkey.len);
            if let Some(child) = self.child(idx, right) {
                let (replacement, value) = self.remove(child, k);
                self.set_child_at(idx, right, replacement);
                return (Some(idx), value);
            }
        }
        (Some(idx), None)
    }
}

impl<T: Clone> Tree<T> {
    /// Removes `k` and everything beneath it. If an entry above `k` covers
    /// the subtracted range, sibling entries carrying that entry's value
    /// are synthesized along the path so that the complement of `k` within
    /// the covering entry stays represented.
    pub(crate) fn subtract_key(&mut self, idx: usize, k: Key) -> Option<usize> {
        let tkey = self.key(idx);
        // the whole branch is being subtracted
        if tkey.equal_from_root(k) || k.is_prefix_of(tkey, false) {
            return None;
        }
        if tkey.is_prefix_of(k, false) {
            let right = k.bit(tkey.len);
            match self.child(idx, right) {
                Some(child) => {
                    let replacement = self.subtract_key(child, k);
                    self.set_child_at(idx, right, replacement);
                }
                None => {
                    // k lies inside this entry: punch a hole for it
                    if let Some(v) = self.node(idx).value.clone() {
                        self.insert_hole(idx, k, v);
                    }
                }
            }
            return self.prune(idx);
        }
        Some(idx)
    }

    /// Digs a hole to `k` below `idx`: entries along the path are cleared,
    /// and every sibling off the path receives an entry with value `v`, so
    /// that the key space around `k` stays covered by the minimum number of
    /// entries. The node at `k` itself is dropped.
    pub(crate) fn insert_hole(&mut self, idx: usize, k: Key, v: T) -> Option<usize> {
        let tkey = self.key(idx);
        if tkey.equal_from_root(k) {
            return None;
        }
        if !tkey.is_prefix_of(k, false) {
            return Some(idx);
        }
        self.node_mut(idx).value = None;
        let right = k.bit(tkey.len);
        if self.child(idx, !right).is_none() {
            let sibling = self.add_child(idx, tkey.next(!right));
            self.node_mut(sibling).value = Some(v.clone());
        }
        let child = match self.child(idx, right) {
            Some(child) => child,
            None => self.add_child(idx, tkey.next(right)),
        };
        let replacement = self.insert_hole(child, k, v);
        self.set_child_at(idx, right, replacement);
        Some(idx)
    }

    /// Subtracts every entry of `other` (and the key space beneath it) from
    /// this tree, punching holes in covering entries as needed. The value
    /// type of `other` is irrelevant: only its entry positions matter.
    pub(crate) fn subtract_tree<U>(
        &mut self,
        idx: usize,
        other: &Tree<U>,
        oidx: usize,
    ) -> Option<usize> {
        let tkey = self.key(idx);
        let okey = other.key(oidx);
        if other.node(oidx).value.is_some() {
            // the whole branch is being subtracted
            if okey.is_prefix_of(tkey, false) {
                return None;
            }
            // a descendant of this entry is being subtracted
            if tkey.is_prefix_of(okey, false) {
                if let Some(v) = self.node(idx).value.clone() {
                    self.insert_hole(idx, okey, v);
                }
            }
        }
        for right in [false, true] {
            if let (Some(tchild), Some(ochild)) =
                (self.child(idx, right), other.child(oidx, right))
            {
                let replacement = self.subtract_tree(tchild, other, ochild);
                self.set_child_at(idx, right, replacement);
            }
        }
        self.prune(idx)
    }

    /// Drops `idx` if it has neither an entry nor children. The root
    /// sentinel is never pruned.
    pub(crate) fn prune(&mut self, idx: usize) -> Option<usize> {
        let node = self.node(idx);
        if idx != 0 && node.value.is_none() && node.left.is_none() && node.right.is_none() {
            None
        } else {
            Some(idx)
        }
    }
}
