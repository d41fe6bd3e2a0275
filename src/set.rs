//! The prefix set: a mutable builder with set algebra, and the immutable
//! view it freezes into.

use ipnet::IpNet;

use crate::iter::{Iter, Prefixes, PrefixesCompact};
use crate::key::{key_from_prefix, prefix_from_key};
use crate::tree::Tree;

/// Builder for a [`PrefixSet`].
///
/// Besides adding and removing individual prefixes, a set builder can be
/// combined with frozen sets: [`merge`] (union), [`intersect`],
/// [`subtract`] (difference with hole-punching), and [`filter`].
///
/// ```
/// # use netprefix::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut builder = PrefixSetBuilder::new();
/// builder.add("10.0.0.0/8".parse()?);
/// builder.subtract_prefix("10.1.0.0/16".parse()?);
/// let set = builder.build();
/// assert!(!set.encompasses("10.1.0.0/16".parse()?));
/// assert!(set.encompasses("10.2.0.0/16".parse()?));
/// # Ok(())
/// # }
/// ```
///
/// [`merge`]: Self::merge
/// [`intersect`]: Self::intersect
/// [`subtract`]: Self::subtract
/// [`filter`]: Self::filter
#[derive(Clone)]
pub struct PrefixSetBuilder {
    pub(crate) tree: Tree<()>,
    lazy: bool,
}

impl Default for PrefixSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixSetBuilder {
    /// Creates a builder using compressed insertion.
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            lazy: false,
        }
    }

    /// Creates a builder that defers path compression to [`build`].
    ///
    /// Lazy insertion adds one bit per node and is much faster for bulk
    /// loads. Removals and subtractions can leave multi-bit segments
    /// behind, and later lazy insertions treat divergence from such a
    /// segment as a no-op; workloads mixing removals with further
    /// insertions should use the compressed mode.
    ///
    /// [`build`]: Self::build
    pub fn lazy() -> Self {
        Self {
            tree: Tree::new(),
            lazy: true,
        }
    }

    /// Adds `prefix` to the set. Host bits beyond the prefix length are
    /// ignored.
    pub fn add(&mut self, prefix: IpNet) {
        let key = key_from_prefix(prefix);
        if self.lazy {
            self.tree.insert_lazy(0, key, ());
        } else {
            self.tree.insert(0, key, ());
        }
    }

    /// Removes the exact `prefix` from the set, returning whether it was
    /// present. Descendants are unaffected; see
    /// [`PrefixSetBuilder::subtract_prefix`] to remove a whole range.
    pub fn remove(&mut self, prefix: IpNet) -> bool {
        self.tree.remove(0, key_from_prefix(prefix)).1.is_some()
    }

    /// Removes every prefix that is not encompassed by `set`.
    pub fn filter(&mut self, set: &PrefixSet) {
        self.tree.filter(&set.tree);
    }

    /// Removes `prefix` and all of its descendants, leaving behind the
    /// remaining portions of affected prefixes. This may add elements to
    /// fill in the gaps around the subtracted prefix.
    ///
    /// ```
    /// # use netprefix::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut builder = PrefixSetBuilder::new();
    /// builder.add("::/126".parse()?);
    /// builder.subtract_prefix("::/128".parse()?);
    /// let set = builder.build();
    /// assert_eq!(
    ///     set.prefixes().collect::<Vec<_>>(),
    ///     vec!["::1/128".parse()?, "::2/127".parse()?],
    /// );
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

    /// Removes the prefixes in `set`, and all of their descendants, from
    /// this builder, filling in gaps around the subtracted ranges.
    pub fn subtract(&mut self, set: &PrefixSet) {
        self.tree.subtract_tree(0, &set.tree, 0);
    }

    /// Intersects this builder with `set`: a prefix is kept iff it exists
    /// in both, or exists in one and has an ancestor in the other.
    ///
    /// ```
    /// # use netprefix::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut builder = PrefixSetBuilder::new();
    /// builder.add("10.0.0.0/8".parse()?);
    /// builder.intersect(&PrefixSet::from_iter(["10.1.0.0/16".parse()?]));
    /// assert_eq!(builder.build().prefixes().collect::<Vec<_>>(), vec!["10.1.0.0/16".parse()?]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn intersect(&mut self, set: &PrefixSet) {
        self.tree.intersect_tree(0, &set.tree, 0, false, false);
    }

    /// Merges all prefixes of `set` into this builder.
    pub fn merge(&mut self, set: &PrefixSet) {
        self.tree.merge_tree(0, &set.tree, 0);
    }

    /// Freezes the current state into an immutable [`PrefixSet`]. The live
    /// structure is deep-copied and compressed; the builder remains usable.
    pub fn build(&self) -> PrefixSet {
        let mut tree = self.tree.copy();
        tree.compress(0);
        let size = tree.size();
        PrefixSet { tree, size }
    }
}

impl Extend<IpNet> for PrefixSetBuilder {
    fn extend<I: IntoIterator<Item = IpNet>>(&mut self, iter: I) {
        for prefix in iter {
            self.add(prefix);
        }
    }
}

impl FromIterator<IpNet> for PrefixSetBuilder {
    fn from_iter<I: IntoIterator<Item = IpNet>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

/// An immutable set of IP prefixes, implemented as a path-compressed
/// binary radix tree.
///
/// A `PrefixSet` is created by freezing a [`PrefixSetBuilder`]. Unlike a
/// `PrefixMap<()>`, it supports set algebra during the building stage:
/// [`PrefixSetBuilder::merge`], [`PrefixSetBuilder::intersect`], and
/// [`PrefixSetBuilder::subtract`].
///
/// ```
/// # use netprefix::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let set: PrefixSet = ["10.0.0.0/8".parse()?, "10.1.0.0/16".parse()?]
///     .into_iter()
///     .collect();
/// assert!(set.contains("10.1.0.0/16".parse()?));
/// assert!(!set.contains("10.1.0.0/24".parse()?));
/// assert!(set.encompasses("10.1.0.0/24".parse()?));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PrefixSet {
    pub(crate) tree: Tree<()>,
    pub(crate) size: usize,
}

impl PrefixSet {
    /// Returns the number of prefixes in the set.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the set contains no prefixes.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Check if the exact prefix is present in the set.
    pub fn contains(&self, prefix: IpNet) -> bool {
        self.tree.contains(key_from_prefix(prefix))
    }

    /// Whether the set contains a prefix which completely encompasses
    /// `prefix`, possibly `prefix` itself.
    pub fn encompasses(&self, prefix: IpNet) -> bool {
        self.tree.encompasses(key_from_prefix(prefix), false)
    }

    /// Whether the set contains a strict ancestor of `prefix`.
    pub fn encompasses_strict(&self, prefix: IpNet) -> bool {
        self.tree.encompasses(key_from_prefix(prefix), true)
    }

    /// Whether the set contains a prefix which overlaps `prefix`: an
    /// ancestor, a descendant, or `prefix` itself.
    pub fn overlaps_prefix(&self, prefix: IpNet) -> bool {
        self.tree.overlaps_key(key_from_prefix(prefix))
    }

    /// The shortest-prefix ancestor of `prefix` in the set, including
    /// `prefix` itself.
    pub fn root_of(&self, prefix: IpNet) -> Option<IpNet> {
        self.tree
            .root_of(key_from_prefix(prefix), false)
            .map(|(k, ())| prefix_from_key(k))
    }

    /// The shortest-prefix strict ancestor of `prefix` in the set.
    pub fn root_of_strict(&self, prefix: IpNet) -> Option<IpNet> {
        self.tree
            .root_of(key_from_prefix(prefix), true)
            .map(|(k, ())| prefix_from_key(k))
    }

    /// The longest-prefix ancestor of `prefix` in the set, including
    /// `prefix` itself (longest-prefix match).
    pub fn parent_of(&self, prefix: IpNet) -> Option<IpNet> {
        self.tree
            .parent_of(key_from_prefix(prefix), false)
            .map(|(k, ())| prefix_from_key(k))
    }

    /// The longest-prefix strict ancestor of `prefix` in the set.
    pub fn parent_of_strict(&self, prefix: IpNet) -> Option<IpNet> {
        self.tree
            .parent_of(key_from_prefix(prefix), true)
            .map(|(k, ())| prefix_from_key(k))
    }

    /// A set of all prefixes at or under `prefix`, including `prefix`
    /// itself if present.
    pub fn descendants_of(&self, prefix: IpNet) -> PrefixSet {
        Self::from_tree(self.tree.descendants_of(key_from_prefix(prefix), false))
    }

    /// A set of all prefixes strictly under `prefix`.
    pub fn descendants_of_strict(&self, prefix: IpNet) -> PrefixSet {
        Self::from_tree(self.tree.descendants_of(key_from_prefix(prefix), true))
    }

    /// A set of all prefixes encompassing `prefix`, including `prefix`
    /// itself if present.
    pub fn ancestors_of(&self, prefix: IpNet) -> PrefixSet {
        Self::from_tree(self.tree.ancestors_of(key_from_prefix(prefix), false))
    }

    /// A set of all prefixes strictly encompassing `prefix`.
    pub fn ancestors_of_strict(&self, prefix: IpNet) -> PrefixSet {
        Self::from_tree(self.tree.ancestors_of(key_from_prefix(prefix), true))
    }

    /// Iterate over all prefixes in tree order.
    pub fn prefixes(&self) -> Prefixes<'_> {
        Prefixes {
            inner: Iter::new(&self.tree),
        }
    }

    /// Iterate over all prefixes in tree order.
    pub fn iter(&self) -> Prefixes<'_> {
        self.prefixes()
    }

    /// Iterate over the shallowest prefix on each path; descendants of a
    /// yielded prefix are skipped.
    ///
    /// ```
    /// # use netprefix::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let set: PrefixSet = [
    ///     "1.2.3.0/24".parse()?,
    ///     "1.2.3.0/25".parse()?,
    ///     "1.2.3.128/25".parse()?,
    /// ]
    /// .into_iter()
    /// .collect();
    /// assert_eq!(set.prefixes_compact().collect::<Vec<_>>(), vec!["1.2.3.0/24".parse()?]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn prefixes_compact(&self) -> PrefixesCompact<'_, ()> {
        PrefixesCompact::new(&self.tree)
    }

    fn from_tree(tree: Tree<()>) -> Self {
        let size = tree.size();
        Self { tree, size }
    }
}

impl<'a> IntoIterator for &'a PrefixSet {
    type Item = IpNet;
    type IntoIter = Prefixes<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.prefixes()
    }
}

impl FromIterator<IpNet> for PrefixSet {
    fn from_iter<I: IntoIterator<Item = IpNet>>(iter: I) -> Self {
        PrefixSetBuilder::from_iter(iter).build()
    }
}

impl PartialEq for PrefixSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for PrefixSet {}
