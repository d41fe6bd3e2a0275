//! This crate provides two immutable collection types keyed by IP network
//! prefixes: [`PrefixMap`] (prefix to value) and [`PrefixSet`]. Both are
//! populated through a mutable builder and then frozen into an immutable,
//! cheaply shareable view.
//!
//! # Description of the tree
//!
//! Both types are backed by the same binary radix tree over 128-bit keys.
//! IPv6 prefixes map to keys directly; IPv4 prefixes are carried in the
//! v4-in-v6 range, with their prefix length extended by 96. A single
//! collection can therefore hold prefixes of both families.
//!
//! The tree is path-compressed: every node without an entry has two
//! children, and chains of single-child nodes are absorbed into one
//! segment. Builders can alternatively insert *lazily* (one bit per node),
//! deferring compression to the freeze; this is much faster when loading
//! large tables. Nodes live in an arena indexed by position, so a frozen
//! view is a plain `Vec` of nodes with no pointer graph behind it.
//!
//! # Queries and set algebra
//!
//! Frozen views answer hierarchy-aware queries: exact lookup, longest- and
//! shortest-prefix match ([`PrefixMap::parent_of`], [`PrefixMap::root_of`]),
//! containment ([`PrefixMap::encompasses`]), overlap, and subtree or
//! ancestor extraction. Builders combine with frozen sets:
//!
//! - [`PrefixSetBuilder::merge`]: union of the entries.
//! - [`PrefixSetBuilder::intersect`]: a prefix survives iff it is in both
//!   sets, or in one set and covered by an entry of the other.
//! - [`PrefixSetBuilder::subtract`] and `subtract_prefix` remove entire
//!   ranges, *hole-punching* covering entries: the remainder of a covering
//!   prefix is filled in with the minimum number of new entries.
//! - [`PrefixSetBuilder::filter`]: keep only entries covered by a set.
//!
//! ```
//! # use netprefix::*;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = PrefixSetBuilder::new();
//! builder.add("::/126".parse()?);
//! builder.subtract_prefix("::/128".parse()?);
//! let set = builder.build();
//! assert_eq!(
//!     set.prefixes().collect::<Vec<_>>(),
//!     vec!["::1/128".parse()?, "::2/127".parse()?],
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Freezing deep-copies the live tree, so a builder can keep evolving after
//! every [`PrefixMapBuilder::build`] call, and each view is independent.
//! Views are immutable and can be queried concurrently without
//! coordination.

#![deny(missing_docs)]

mod fmt;
mod iter;
mod key;
mod map;
mod set;
mod tree;

#[cfg(test)]
mod fuzzing;

pub use iter::{Iter, Keys, Prefixes, PrefixesCompact, Values};
pub use map::{PrefixMap, PrefixMapBuilder};
pub use set::{PrefixSet, PrefixSetBuilder};
