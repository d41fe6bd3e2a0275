//! Structural union and intersection of two trees, and filtering by a
//! presence tree.

use super::Tree;
use crate::key::Key;

impl<T: Clone> Tree<T> {
    /// Merges the entries of `other`'s subtree at `oidx` into this tree at
    /// `idx`. Values already present win over values from `other`. Returns
    /// the node occupying `idx`'s position: a parent may have been spliced
    /// in above it.
    pub(crate) fn merge_tree(&mut self, idx: usize, other: &Tree<T>, oidx: usize) -> usize {
        let tkey = self.key(idx);
        let okey = other.key(oidx);

        if tkey.equal_from_root(okey) {
            if self.node(idx).value.is_none() {
                self.node_mut(idx).value = other.node(oidx).value.clone();
            }
            for right in [false, true] {
                if let Some(ochild) = other.child(oidx, right) {
                    match self.child(idx, right) {
                        Some(tchild) => {
                            let merged = self.merge_tree(tchild, other, ochild);
                            self.set_child_at(idx, right, Some(merged));
                        }
                        None => {
                            let copy = self.copy_subtree(other, ochild);
                            self.node_mut(copy).key.offset = tkey.len;
                            self.set_child_at(idx, right, Some(copy));
                        }
                    }
                }
            }
            return idx;
        }

        let com = tkey.common_prefix_len(okey);
        if com == tkey.len {
            // this key is a prefix of other's; descend toward it
            let right = okey.bit(tkey.len);
            match self.child(idx, right) {
                Some(tchild) => {
                    let merged = self.merge_tree(tchild, other, oidx);
                    self.set_child_at(idx, right, Some(merged));
                }
                None => {
                    let copy = self.copy_subtree(other, oidx);
                    self.node_mut(copy).key.offset = tkey.len;
                    self.set_child_at(idx, right, Some(copy));
                }
            }
            idx
        } else if com == okey.len {
            // other's key is a prefix of this one; it must exist in the
            // union tree, so splice it in above and continue from there
            let parent = self.insert_parent(idx, okey);
            self.node_mut(parent).value = other.node(oidx).value.clone();
            self.merge_tree(parent, other, oidx)
        } else {
            // the keys diverge; join them under their common prefix
            let parent = self.insert_parent(idx, tkey.truncated(com));
            let copy = self.copy_subtree(other, oidx);
            self.node_mut(copy).key.offset = com;
            self.set_child(parent, copy);
            parent
        }
    }

    /// Intersects this tree with `other`: an entry survives iff it exists
    /// in both trees, or exists in one tree and has an ancestor entry in
    /// the other. `t_anc` and `o_anc` record whether an entry has been
    /// passed on the way down this tree and `other`, respectively.
    pub(crate) fn intersect_tree(
        &mut self,
        idx: usize,
        other: &Tree<T>,
        oidx: usize,
        t_anc: bool,
        o_anc: bool,
    ) -> Option<usize> {
        let tkey = self.key(idx);
        let okey = other.key(oidx);
        let t_has = self.node(idx).value.is_some();
        let o_has = other.node(oidx).value.is_some();

        if tkey.equal_from_root(okey) {
            if t_has && !(o_has || o_anc) {
                self.node_mut(idx).value = None;
            }
            // entries at this depth count as cover for everything below
            let t_cover = t_anc || t_has;
            let o_cover = o_anc || o_has;
            for right in [false, true] {
                match (self.child(idx, right), other.child(oidx, right)) {
                    (None, Some(ochild)) if t_cover => {
                        let copy = self.copy_subtree(other, ochild);
                        self.set_child_at(idx, right, Some(copy));
                    }
                    (Some(_), None) if !o_cover => {
                        self.set_child_at(idx, right, None);
                    }
                    (Some(tchild), Some(ochild)) => {
                        let replacement =
                            self.intersect_tree(tchild, other, ochild, t_cover, o_cover);
                        self.set_child_at(idx, right, replacement);
                    }
                    _ => {}
                }
            }
            return self.prune(idx);
        }

        let com = tkey.common_prefix_len(okey);
        if com == tkey.len {
            // this key is a prefix of other's
            if t_has {
                // other's node is below this entry: it is not in the
                // intersection itself unless covered from above...
                if !o_anc {
                    self.node_mut(idx).value = None;
                }
                // ...but other's entry is, because it sits under ours
                if let Some(v) = other.node(oidx).value.clone() {
                    self.insert(idx, okey, v);
                }
            }
            let right = okey.bit(com);
            match self.child(idx, right) {
                Some(tchild) => {
                    let replacement =
                        self.intersect_tree(tchild, other, oidx, t_anc || t_has, o_anc);
                    self.set_child_at(idx, right, replacement);
                }
                None if t_anc || t_has => {
                    // no fork toward other's key, but an entry here or
                    // above covers all of other's subtree
                    let copy = self.copy_subtree(other, oidx);
                    self.node_mut(copy).key.offset = tkey.len;
                    self.set_child_at(idx, right, Some(copy));
                }
                None => {}
            }
            // the child diverging from other's key survives only under an
            // ancestor entry of other
            if !o_anc {
                self.set_child_at(idx, !right, None);
            }
            self.prune(idx)
        } else if com == okey.len {
            // other's key is a prefix of this one; move other down along
            // this key. This node's descendants are handled by the
            // recursion itself.
            match other.child(oidx, tkey.bit(com)) {
                Some(ochild) => self.intersect_tree(idx, other, ochild, t_anc, o_anc || o_has),
                // no fork toward this subtree: it survives iff other has
                // an entry at or above this point
                None if o_anc || o_has => Some(idx),
                None => None,
            }
        } else if o_anc {
            // disjoint keys, but an ancestor entry of other covers this
            // whole subtree
            Some(idx)
        } else {
            None
        }
    }

    /// Keeps only the entries whose keys are encompassed by an entry of
    /// `other`.
    pub(crate) fn filter<U>(&mut self, other: &Tree<U>) {
        let mut to_remove = Vec::new();
        self.walk(Key::zero(), |idx| {
            let node = self.node(idx);
            if node.value.is_some() && !other.encompasses(node.key, false) {
                to_remove.push(node.key);
            }
            false
        });
        for k in to_remove {
            self.remove(0, k);
        }
    }
}
