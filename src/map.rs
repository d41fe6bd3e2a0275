//! The prefix-to-value map: a mutable builder and the immutable view it
//! freezes into.

use std::collections::HashMap;

use ipnet::IpNet;

use crate::iter::{Iter, Keys, PrefixesCompact, Values};
use crate::key::{key_from_prefix, prefix_from_key};
use crate::set::PrefixSet;
use crate::tree::Tree;

/// Builder for a [`PrefixMap`].
///
/// All mutation happens here; calling [`PrefixMapBuilder::build`] freezes
/// the current state into an immutable map and leaves the builder usable.
///
/// ```
/// # use netprefix::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut builder = PrefixMapBuilder::new();
/// builder.set("10.0.0.0/8".parse()?, "intern");
/// builder.set("10.1.0.0/16".parse()?, "lab");
/// let map = builder.build();
/// assert_eq!(map.get("10.1.0.0/16".parse()?), Some(&"lab"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PrefixMapBuilder<T> {
    pub(crate) tree: Tree<T>,
    lazy: bool,
}

impl<T> Default for PrefixMapBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PrefixMapBuilder<T> {
    /// Creates a builder using compressed insertion.
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            lazy: false,
        }
    }

    /// Creates a builder that defers path compression to [`build`].
    ///
    /// Lazy insertion adds one bit per node instead of re-splicing
    /// compressed segments, which is considerably faster when loading large
    /// inputs. See [`crate::PrefixSetBuilder::lazy`] for the interaction
    /// with removals.
    ///
    /// [`build`]: Self::build
    pub fn lazy() -> Self {
        Self {
            tree: Tree::new(),
            lazy: true,
        }
    }

    /// Maps `prefix` to `value`, replacing any previous value. Host bits
    /// beyond the prefix length are ignored.
    pub fn set(&mut self, prefix: IpNet, value: T) {
        let key = key_from_prefix(prefix);
        if self.lazy {
            self.tree.insert_lazy(0, key, value);
        } else {
            self.tree.insert(0, key, value);
        }
    }

    /// Removes the entry matching `prefix` exactly, returning its value.
    /// Entries under `prefix` are unaffected; use
    /// [`PrefixMapBuilder::subtract_prefix`] to clear a whole range.
    pub fn remove(&mut self, prefix: IpNet) -> Option<T> {
        self.tree.remove(0, key_from_prefix(prefix)).1
    }
}

impl<T: Clone> PrefixMapBuilder<T> {
    /// Removes every entry that is not encompassed by `set`.
    ///
    /// ```
    /// # use netprefix::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut builder = PrefixMapBuilder::new();
    /// builder.set("10.1.0.0/16".parse()?, 1);
    /// builder.set("10.2.0.0/16".parse()?, 2);
    /// builder.filter(&PrefixSet::from_iter(["10.1.0.0/16".parse()?]));
    /// assert_eq!(builder.build().prefixes().collect::<Vec<_>>(), vec!["10.1.0.0/16".parse()?]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&mut self, set: &PrefixSet) {
        self.tree.filter(&set.tree);
    }

    /// Removes the prefixes in `set`, and all of their descendants, from
    /// the map. Entries covering a subtracted prefix are broken up into
    /// entries for the remaining key space, each carrying the covering
    /// entry's value.
    pub fn subtract(&mut self, set: &PrefixSet) {
        self.tree.subtract_tree(0, &set.tree, 0);
    }

    /// Removes `prefix` and all of its descendants from the map, filling
    /// in the remaining portions of any entry covering `prefix`.
    ///
    /// ```
    /// # use netprefix::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut builder = PrefixMapBuilder::new();
    /// builder.set("10.0.0.0/7".parse()?, "wide");
    /// builder.subtract_prefix("10.0.0.0/8".parse()?);
    /// assert_eq!(builder.build().to_map(), [("11.0.0.0/8".parse()?, "wide")].into_iter().collect());
    /// # Ok(())
    /// # }
    /// ```
    pub fn subtract_prefix(&mut self, prefix: IpNet) {
        let key = key_from_prefix(prefix);
        if key.is_zero() {
            self.tree = Tree::new();
        } else {
            self.tree.subtract_key(0, key);
        }
    }

    /// Freezes the current state into an immutable [`PrefixMap`]. The live
    /// structure is deep-copied and compressed; the builder remains usable.
    pub fn build(&self) -> PrefixMap<T> {
        let mut tree = self.tree.copy();
        tree.compress(0);
        let size = tree.size();
        PrefixMap { tree, size }
    }
}

impl<T> Extend<(IpNet, T)> for PrefixMapBuilder<T> {
    fn extend<I: IntoIterator<Item = (IpNet, T)>>(&mut self, iter: I) {
        for (prefix, value) in iter {
            self.set(prefix, value);
        }
    }
}

impl<T> FromIterator<(IpNet, T)> for PrefixMapBuilder<T> {
    fn from_iter<I: IntoIterator<Item = (IpNet, T)>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

/// An immutable map from IP prefixes to values, implemented as a
/// path-compressed binary radix tree.
///
/// A `PrefixMap` is created by freezing a [`PrefixMapBuilder`]. It cannot
/// be modified, and can therefore be queried from any number of threads
/// without coordination.
///
/// ```
/// # use netprefix::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let map: PrefixMap<_> = [
///     ("10.0.0.0/8".parse()?, 1),
///     ("10.1.0.0/16".parse()?, 2),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(map.parent_of("10.1.2.3/32".parse()?), Some(("10.1.0.0/16".parse()?, &2)));
/// assert_eq!(map.root_of("10.1.2.3/32".parse()?), Some(("10.0.0.0/8".parse()?, &1)));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PrefixMap<T> {
    pub(crate) tree: Tree<T>,
    pub(crate) size: usize,
}

impl<T> PrefixMap<T> {
    /// Returns the number of entries in the map.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Get the value of an element by matching exactly on the prefix.
    ///
    /// ```
    /// # use netprefix::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let map: PrefixMap<_> = [("192.168.1.0/24".parse()?, 1)].into_iter().collect();
    /// assert_eq!(map.get("192.168.1.0/24".parse()?), Some(&1));
    /// assert_eq!(map.get("192.168.0.0/23".parse()?), None);
    /// assert_eq!(map.get("192.168.1.0/25".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, prefix: IpNet) -> Option<&T> {
        self.tree.get(key_from_prefix(prefix))
    }

    /// Get the stored prefix and value matching exactly on the prefix. The
    /// returned prefix is in canonical (masked) form.
    pub fn get_entry(&self, prefix: IpNet) -> Option<(IpNet, &T)> {
        let key = key_from_prefix(prefix);
        self.tree.get(key).map(|v| (prefix_from_key(key), v))
    }

    /// Check if the exact prefix is present in the map.
    pub fn contains(&self, prefix: IpNet) -> bool {
        self.tree.contains(key_from_prefix(prefix))
    }

    /// Whether the map contains a prefix which completely encompasses
    /// `prefix`, possibly `prefix` itself.
    pub fn encompasses(&self, prefix: IpNet) -> bool {
        self.tree.encompasses(key_from_prefix(prefix), false)
    }

    /// Whether the map contains a strict ancestor of `prefix`.
    pub fn encompasses_strict(&self, prefix: IpNet) -> bool {
        self.tree.encompasses(key_from_prefix(prefix), true)
    }

    /// Whether the map contains a prefix which overlaps `prefix`: an
    /// ancestor, a descendant, or `prefix` itself.
    pub fn overlaps_prefix(&self, prefix: IpNet) -> bool {
        self.tree.overlaps_key(key_from_prefix(prefix))
    }

    /// The shortest-prefix ancestor of `prefix` in the map, including
    /// `prefix` itself.
    pub fn root_of(&self, prefix: IpNet) -> Option<(IpNet, &T)> {
        self.tree
            .root_of(key_from_prefix(prefix), false)
            .map(|(k, v)| (prefix_from_key(k), v))
    }

    /// The shortest-prefix strict ancestor of `prefix` in the map.
    pub fn root_of_strict(&self, prefix: IpNet) -> Option<(IpNet, &T)> {
        self.tree
            .root_of(key_from_prefix(prefix), true)
            .map(|(k, v)| (prefix_from_key(k), v))
    }

    /// The longest-prefix ancestor of `prefix` in the map, including
    /// `prefix` itself (longest-prefix match).
    pub fn parent_of(&self, prefix: IpNet) -> Option<(IpNet, &T)> {
        self.tree
            .parent_of(key_from_prefix(prefix), false)
            .map(|(k, v)| (prefix_from_key(k), v))
    }

    /// The longest-prefix strict ancestor of `prefix` in the map.
    pub fn parent_of_strict(&self, prefix: IpNet) -> Option<(IpNet, &T)> {
        self.tree
            .parent_of(key_from_prefix(prefix), true)
            .map(|(k, v)| (prefix_from_key(k), v))
    }

    /// Iterate over all entries in tree order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.tree)
    }

    /// Iterate over all prefixes in tree order.
    pub fn prefixes(&self) -> Keys<'_, T> {
        Keys { inner: self.iter() }
    }

    /// Iterate over all values, in tree order of their prefixes.
    pub fn values(&self) -> Values<'_, T> {
        Values { inner: self.iter() }
    }

    /// Iterate over the shallowest entry on each path; descendants of a
    /// yielded prefix are skipped.
    pub fn prefixes_compact(&self) -> PrefixesCompact<'_, T> {
        PrefixesCompact::new(&self.tree)
    }
}

impl<T: Clone> PrefixMap<T> {
    /// A map of all entries at or under `prefix`, including `prefix`
    /// itself if it has an entry.
    ///
    /// ```
    /// # use netprefix::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let map: PrefixMap<_> = [
    ///     ("10.1.0.0/16".parse()?, 1),
    ///     ("10.1.3.0/24".parse()?, 2),
    ///     ("10.2.0.0/16".parse()?, 3),
    /// ]
    /// .into_iter()
    /// .collect();
    /// let sub = map.descendants_of("10.1.0.0/16".parse()?);
    /// assert_eq!(sub.len(), 2);
    /// assert!(sub.contains("10.1.3.0/24".parse()?));
    /// assert!(!sub.contains("10.2.0.0/16".parse()?));
    /// # Ok(())
    /// # }
    /// ```
    pub fn descendants_of(&self, prefix: IpNet) -> PrefixMap<T> {
        Self::from_tree(self.tree.descendants_of(key_from_prefix(prefix), false))
    }

    /// A map of all entries strictly under `prefix`.
    pub fn descendants_of_strict(&self, prefix: IpNet) -> PrefixMap<T> {
        Self::from_tree(self.tree.descendants_of(key_from_prefix(prefix), true))
    }

    /// A map of all entries whose prefixes encompass `prefix`, including
    /// `prefix` itself if it has an entry.
    pub fn ancestors_of(&self, prefix: IpNet) -> PrefixMap<T> {
        Self::from_tree(self.tree.ancestors_of(key_from_prefix(prefix), false))
    }

    /// A map of all entries whose prefixes strictly encompass `prefix`.
    pub fn ancestors_of_strict(&self, prefix: IpNet) -> PrefixMap<T> {
        Self::from_tree(self.tree.ancestors_of(key_from_prefix(prefix), true))
    }

    /// Materializes the entries as a flat hash map snapshot.
    pub fn to_map(&self) -> HashMap<IpNet, T> {
        self.iter().map(|(p, v)| (p, v.clone())).collect()
    }

    fn from_tree(tree: Tree<T>) -> Self {
        let size = tree.size();
        Self { tree, size }
    }
}

impl<'a, T> IntoIterator for &'a PrefixMap<T> {
    type Item = (IpNet, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone> FromIterator<(IpNet, T)> for PrefixMap<T> {
    fn from_iter<I: IntoIterator<Item = (IpNet, T)>>(iter: I) -> Self {
        PrefixMapBuilder::from_iter(iter).build()
    }
}

impl<T: PartialEq> PartialEq for PrefixMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for PrefixMap<T> {}
