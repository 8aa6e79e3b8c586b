//! Semantic versioning library compatible with node-semver
//!
//! This crate provides version parsing, comparison, increment, and range
//! matching with the same grammar and shorthand (`~`, `^`, `x`, hyphen
//! ranges) as npm's `semver` package, plus range algebra (intersection,
//! subset, simplification).

pub mod grammar;
mod coerce;
mod comparator;
mod error;
mod identifier;
mod operator;
mod options;
pub mod range;
mod semver;
mod version;

pub use coerce::coerce;
pub use comparator::{Comparator, NULL_SET};
pub use error::SemverError;
pub use identifier::{compare_identifiers, Identifier};
pub use operator::Operator;
pub use options::Options;
pub use range::{min_version, outside, simplify, subset, Hilo, LruCache, Range, RangeParser};
pub use semver::{RangeLike, Semver, VersionLike};
pub use version::{PrereleaseBase, ReleaseType, Version};
