#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;

/// String hashing for bucket selection.
///
/// This module provides the DJB2 hasher used by default and the
/// [`DefaultHashBuilder`] alias, which switches to `foldhash` when the
/// `foldhash` feature is enabled.
pub mod hash;

/// The separately chained [`HashTable`] and its entry and iterator types.
pub mod hash_table;

pub use error::TableError;
pub use hash::DefaultHashBuilder;
pub use hash::Djb2;
pub use hash_table::Entry;
pub use hash_table::GrowthPolicy;
pub use hash_table::HashTable;
