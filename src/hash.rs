use core::hash::BuildHasher;
use core::hash::Hasher;

/// Initial DJB2 accumulator.
const DJB2_SEED: u64 = 5381;

/// Hashes `key` with DJB2 over its UTF-8 bytes.
///
/// The accumulator is a `u64` and every step wraps on overflow, so long keys
/// hash to a well-defined value instead of growing without bound.
///
/// # Examples
///
/// ```rust
/// use chain_hash::hash::djb2;
///
/// assert_eq!(djb2(""), 5381);
/// assert_eq!(djb2("a"), 5381 * 33 + 97);
/// ```
#[inline]
pub fn djb2(key: &str) -> u64 {
    let mut hasher = Djb2Hasher::default();
    hasher.write(key.as_bytes());
    hasher.finish()
}

/// Streaming DJB2 state.
///
/// Feeding bytes in several `write` calls produces the same hash as a single
/// call over the concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Djb2Hasher {
    state: u64,
}

impl Default for Djb2Hasher {
    #[inline]
    fn default() -> Self {
        Self { state: DJB2_SEED }
    }
}

impl Hasher for Djb2Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            // h * 33 + c
            self.state = (self.state << 5)
                .wrapping_add(self.state)
                .wrapping_add(u64::from(byte));
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// [`BuildHasher`] for [`Djb2Hasher`].
///
/// Unkeyed and deterministic: the same key lands in the same bucket in every
/// process, which keeps collision behavior reproducible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Djb2;

impl BuildHasher for Djb2 {
    type Hasher = Djb2Hasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        Djb2Hasher::default()
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher used by [`HashTable::new`](crate::HashTable::new) and
        /// friends: `foldhash`'s randomly seeded fast hasher.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else {
        /// The hasher used by [`HashTable::new`](crate::HashTable::new) and
        /// friends: deterministic [`Djb2`].
        pub type DefaultHashBuilder = Djb2;
    }
}

/// Hashes a string key the way the table does: the raw key bytes with no
/// length prefix or terminator.
#[inline]
pub(crate) fn hash_key<S: BuildHasher>(hash_builder: &S, key: &str) -> u64 {
    let mut hasher = hash_builder.build_hasher();
    hasher.write(key.as_bytes());
    hasher.finish()
}

/// Reduces `hash` to a bucket index in `[0, capacity)`.
#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (hash % capacity as u64) as usize
}
