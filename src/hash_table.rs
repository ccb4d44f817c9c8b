use alloc::alloc::handle_alloc_error;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use core::num::NonZeroUsize;

use crate::error::TableError;
use crate::hash::DefaultHashBuilder;
use crate::hash::bucket_index;
use crate::hash::hash_key;

/// Bucket count used by [`HashTable::new`] and [`Default`].
const DEFAULT_BUCKETS: NonZeroUsize = NonZeroUsize::new(8).unwrap();

type Link<V> = Option<Box<Node<V>>>;

/// One key/value pair in a bucket's chain.
struct Node<V> {
    key: String,
    value: V,
    next: Link<V>,
}

/// Walks the nodes of one chain, head first.
#[inline]
fn chain<V>(link: &Link<V>) -> impl Iterator<Item = &Node<V>> {
    core::iter::successors(link.as_deref(), |node| node.next.as_deref())
}

/// Returns the link that owns the node for `key`, or the empty link at the
/// tail of the chain when no node matches.
///
/// Each step compares the node the link currently points at, so an existing
/// key is always found before the walk can reach the tail.
#[inline]
fn find_link<'a, V>(mut link: &'a mut Link<V>, key: &str) -> &'a mut Link<V> {
    while link.as_ref().is_some_and(|node| node.key != key) {
        let Some(node) = link else { break };
        link = &mut node.next;
    }
    link
}

/// Unlinks a chain node by node. Dropping the head directly would recurse
/// once per node.
fn drop_chain<V>(mut link: Link<V>) {
    while let Some(mut node) = link {
        link = node.next.take();
    }
}

fn clone_chain<V: Clone>(link: &Link<V>) -> Link<V> {
    let mut head = None;
    let mut tail = &mut head;
    for node in chain(link) {
        tail = &mut tail
            .insert(Box::new(Node {
                key: node.key.clone(),
                value: node.value.clone(),
                next: None,
            }))
            .next;
    }
    head
}

fn try_alloc_buckets<V>(capacity: usize) -> Result<Vec<Link<V>>, TableError> {
    if capacity == 0 {
        return Err(TableError::ZeroCapacity);
    }

    let layout =
        Layout::array::<Link<V>>(capacity).map_err(|_| TableError::CapacityOverflow)?;
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|_| TableError::AllocError {
            buckets: capacity,
            layout,
        })?;
    buckets.resize_with(capacity, || None);

    Ok(buckets)
}

fn alloc_buckets<V>(capacity: usize) -> Vec<Link<V>> {
    match try_alloc_buckets(capacity) {
        Ok(buckets) => buckets,
        Err(TableError::AllocError { layout, .. }) => handle_alloc_error(layout),
        Err(err) => panic!("{err}"),
    }
}

/// Decides whether inserts grow the bucket array on their own.
///
/// The table never resizes behind the caller's back unless a policy other
/// than [`GrowthPolicy::Manual`] is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrowthPolicy {
    /// Only [`HashTable::resize`] and [`HashTable::try_resize`] change the
    /// bucket count.
    #[default]
    Manual,
    /// Before inserting, double the bucket count while the table would hold
    /// more than this many entries per bucket on average.
    ///
    /// The check is made before the key is looked up, so an insert that only
    /// overwrites an existing key may still trigger growth.
    AverageChainLength(NonZeroUsize),
}

/// A string-keyed hash table that resolves collisions with separate chaining.
///
/// The table owns a fixed array of buckets. Each bucket owns the head of a
/// singly linked chain of key/value nodes, and each node owns the next one.
/// A key is mapped to its bucket by hashing its bytes with `S` and reducing
/// the hash modulo the bucket count.
///
/// The bucket count only changes through [`resize`](Self::resize), which
/// doubles it and rehashes every node, or through an opt-in
/// [`GrowthPolicy`].
///
/// ## Example
///
/// ```rust
/// use chain_hash::HashTable;
///
/// let mut table = HashTable::try_with_capacity(2)?;
/// table.insert("line_1", "Tiny hash table");
/// table.insert("line_2", "Filled beyond capacity");
/// table.insert("line_3", "Linked list saves the day!");
///
/// assert_eq!(table.retrieve("line_3"), Some(&"Linked list saves the day!"));
///
/// table.resize();
/// assert_eq!(table.capacity(), 4);
/// assert_eq!(table.retrieve("line_1"), Some(&"Tiny hash table"));
/// # Ok::<(), chain_hash::TableError>(())
/// ```
pub struct HashTable<V, S = DefaultHashBuilder> {
    buckets: Vec<Link<V>>,
    len: usize,
    growth: GrowthPolicy,
    hash_builder: S,
}

impl<V, S> Debug for HashTable<V, S>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V, S> Clone for HashTable<V, S>
where
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.iter().map(clone_chain).collect(),
            len: self.len,
            growth: self.growth,
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<V, S> Drop for HashTable<V, S> {
    fn drop(&mut self) {
        for link in &mut self.buckets {
            drop_chain(link.take());
        }
    }
}

impl<V, S> Default for HashTable<V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_capacity_and_hasher(DEFAULT_BUCKETS, S::default())
    }
}

impl<V> HashTable<V, DefaultHashBuilder> {
    /// Creates an empty table with a small default number of buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with exactly `capacity` buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use core::num::NonZeroUsize;
    ///
    /// use chain_hash::HashTable;
    ///
    /// let table: HashTable<u32> = HashTable::with_capacity(NonZeroUsize::new(16).unwrap());
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates an empty table with exactly `capacity` buckets, rejecting a
    /// zero capacity or an allocation failure instead of panicking.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::TableError;
    ///
    /// assert_eq!(
    ///     HashTable::<u32>::try_with_capacity(0).unwrap_err(),
    ///     TableError::ZeroCapacity
    /// );
    /// assert_eq!(HashTable::<u32>::try_with_capacity(3).unwrap().capacity(), 3);
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::try_with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<V, S> HashTable<V, S> {
    /// Creates an empty table with `capacity` buckets that hashes keys with
    /// `hash_builder`.
    pub fn with_capacity_and_hasher(capacity: NonZeroUsize, hash_builder: S) -> Self {
        Self {
            buckets: alloc_buckets(capacity.get()),
            len: 0,
            growth: GrowthPolicy::Manual,
            hash_builder,
        }
    }

    /// Fallible version of [`with_capacity_and_hasher`](Self::with_capacity_and_hasher).
    pub fn try_with_capacity_and_hasher(
        capacity: usize,
        hash_builder: S,
    ) -> Result<Self, TableError> {
        Ok(Self {
            buckets: try_alloc_buckets(capacity)?,
            len: 0,
            growth: GrowthPolicy::Manual,
            hash_builder,
        })
    }

    /// Sets the growth policy, builder style.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use core::num::NonZeroUsize;
    ///
    /// use chain_hash::GrowthPolicy;
    /// use chain_hash::HashTable;
    ///
    /// let limit = NonZeroUsize::new(2).unwrap();
    /// let mut table = HashTable::try_with_capacity(1)?
    ///     .with_growth_policy(GrowthPolicy::AverageChainLength(limit));
    ///
    /// for i in 0..100 {
    ///     table.insert(&i.to_string(), i);
    /// }
    /// assert!(table.len() <= table.capacity() * 2);
    /// # Ok::<(), chain_hash::TableError>(())
    /// ```
    pub fn with_growth_policy(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Replaces the growth policy. Takes effect on the next insert.
    pub fn set_growth_policy(&mut self, growth: GrowthPolicy) {
        self.growth = growth;
    }

    /// Returns the current growth policy.
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    /// Returns the table's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets.
    ///
    /// Unlike open-addressing tables, this is not a limit on the number of
    /// entries: any bucket can hold an arbitrarily long chain.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of entries chained in `bucket`, or `None` if
    /// `bucket` is out of range.
    pub fn chain_len(&self, bucket: usize) -> Option<usize> {
        self.buckets.get(bucket).map(|link| chain(link).count())
    }

    /// Removes every entry, keeping the bucket count.
    pub fn clear(&mut self) {
        for link in &mut self.buckets {
            drop_chain(link.take());
        }
        self.len = 0;
    }

    /// Returns an iterator over the entries in bucket order, then chain
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert("a", 1);
    /// table.insert("b", 2);
    ///
    /// let mut pairs: Vec<_> = table.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [("a", &1), ("b", &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            node: None,
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Removes and yields every entry.
    ///
    /// Entries the iterator does not yield are dropped when it is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert("a", 1);
    /// table.insert("b", 2);
    ///
    /// let drained: Vec<_> = table.drain().collect();
    /// assert_eq!(drained.len(), 2);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            buckets: self.buckets.iter_mut(),
            head: None,
            len: &mut self.len,
        }
    }

    /// Computes chain lengths across all buckets: index `i` of the result is
    /// the number of buckets whose chain holds exactly `i` entries.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let mut hist = alloc::vec![0usize; 1];
        for link in &self.buckets {
            let len = chain(link).count();
            if hist.len() <= len {
                hist.resize(len + 1, 0);
            }
            hist[len] += 1;
        }
        hist
    }

    /// Returns chain and memory statistics for the current table state.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let mut occupied_buckets = 0;
        let mut longest_chain = 0;
        let mut key_bytes = 0;
        for link in &self.buckets {
            let mut len = 0;
            for node in chain(link) {
                len += 1;
                key_bytes += node.key.capacity();
            }
            if len > 0 {
                occupied_buckets += 1;
            }
            longest_chain = longest_chain.max(len);
        }

        DebugStats {
            entries: self.len,
            buckets: self.buckets.len(),
            occupied_buckets,
            longest_chain,
            load_factor: self.len as f64 / self.buckets.len() as f64,
            total_bytes: self.buckets.capacity() * core::mem::size_of::<Link<V>>()
                + self.len * core::mem::size_of::<Node<V>>()
                + key_bytes,
        }
    }

    /// Pretty-prints the chain-length histogram as a horizontal bar chart.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_chain_histogram(&self) {
        const MAX_BAR: usize = 60;

        let hist = self.chain_histogram();
        let max = hist.iter().copied().max().unwrap_or(0);
        println!(
            "chain histogram ({} entries, {} buckets):",
            self.len,
            self.buckets.len()
        );
        for (len, &count) in hist.iter().enumerate() {
            let width = if max == 0 {
                0
            } else {
                (count * MAX_BAR).div_ceil(max)
            };
            println!("{len:>3} | {} ({count})", "█".repeat(width));
        }
    }
}

impl<V, S> HashTable<V, S>
where
    S: BuildHasher,
{
    /// Returns the bucket `key` hashes to under the current bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::hash::Djb2;
    ///
    /// let table: HashTable<(), Djb2> = HashTable::try_with_capacity_and_hasher(2, Djb2)?;
    /// // DJB2 of "line_1" and "line_3" differ by 2, so they share a bucket.
    /// assert_eq!(table.bucket_of("line_1"), table.bucket_of("line_3"));
    /// # Ok::<(), chain_hash::TableError>(())
    /// ```
    #[inline]
    pub fn bucket_of(&self, key: &str) -> usize {
        bucket_index(hash_key(&self.hash_builder, key), self.buckets.len())
    }

    /// Inserts `value` under `key`.
    ///
    /// If the key is already present its value is replaced in place and the
    /// old value is returned; no second node is created. Otherwise a new node
    /// is appended to the tail of the key's chain and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// assert_eq!(table.insert("a", 1), None);
    /// assert_eq!(table.insert("a", 2), Some(1));
    /// assert_eq!(table.retrieve("a"), Some(&2));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Returns the value stored under `key`, or `None` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert("a", 1);
    /// assert_eq!(table.retrieve("a"), Some(&1));
    /// assert_eq!(table.retrieve("b"), None);
    /// ```
    pub fn retrieve(&self, key: &str) -> Option<&V> {
        chain(&self.buckets[self.bucket_of(key)])
            .find(|node| node.key == key)
            .map(|node| &node.value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_of(key);
        find_link(&mut self.buckets[index], key)
            .as_deref_mut()
            .map(|node| &mut node.value)
    }

    /// Returns `true` if the table holds `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.retrieve(key).is_some()
    }

    /// Unlinks the entry for `key` and returns its value, or `None` if the
    /// key is absent. A missing key leaves the table untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert("a", 1);
    /// assert_eq!(table.remove("a"), Some(1));
    /// assert_eq!(table.remove("a"), None);
    /// assert_eq!(table.retrieve("a"), None);
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Unlinks the entry for `key` and returns the stored key and value.
    pub fn remove_entry(&mut self, key: &str) -> Option<(String, V)> {
        let index = self.bucket_of(key);
        let link = find_link(&mut self.buckets[index], key);
        if link.is_none() {
            #[cfg(feature = "logging")]
            log::warn!("remove: key {key:?} not found in bucket {index}");
            return None;
        }

        Some(
            OccupiedEntry {
                link,
                len: &mut self.len,
            }
            .remove_entry(),
        )
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// Applies the [`GrowthPolicy`] before locating the key, so a vacant
    /// entry always points into the final bucket array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// *table.entry("hits").or_insert(0) += 1;
    /// *table.entry("hits").or_insert(0) += 1;
    /// assert_eq!(table.retrieve("hits"), Some(&2));
    /// ```
    pub fn entry<'a>(&'a mut self, key: &'a str) -> Entry<'a, V> {
        self.maybe_grow();

        let index = self.bucket_of(key);
        let link = find_link(&mut self.buckets[index], key);
        if link.is_some() {
            Entry::Occupied(OccupiedEntry {
                link,
                len: &mut self.len,
            })
        } else {
            Entry::Vacant(VacantEntry {
                link,
                len: &mut self.len,
                key,
            })
        }
    }

    /// Doubles the bucket count and rehashes every entry.
    ///
    /// # Panics
    ///
    /// Panics if the doubled bucket count overflows, and reports allocation
    /// failure through [`handle_alloc_error`]. Use
    /// [`try_resize`](Self::try_resize) to handle either case.
    pub fn resize(&mut self) {
        if let Err(err) = self.try_resize() {
            match err {
                TableError::AllocError { layout, .. } => handle_alloc_error(layout),
                err => panic!("{err}"),
            }
        }
    }

    /// Doubles the bucket count and rehashes every entry.
    ///
    /// The new bucket array is allocated before any entry moves, so on error
    /// the table is left exactly as it was.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::try_with_capacity(2)?;
    /// table.insert("a", 1);
    /// table.try_resize()?;
    /// assert_eq!(table.capacity(), 4);
    /// assert_eq!(table.retrieve("a"), Some(&1));
    /// # Ok::<(), chain_hash::TableError>(())
    /// ```
    pub fn try_resize(&mut self) -> Result<(), TableError> {
        let capacity = self
            .buckets
            .len()
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow)?;
        let buckets = try_alloc_buckets(capacity)?;
        self.rehash_into(buckets);
        Ok(())
    }

    /// Moves every node into `buckets`. Nodes are relinked, not reallocated.
    fn rehash_into(&mut self, buckets: Vec<Link<V>>) {
        let old_buckets = core::mem::replace(&mut self.buckets, buckets);
        let capacity = self.buckets.len();

        for mut link in old_buckets {
            while let Some(mut node) = link {
                link = node.next.take();
                let index = bucket_index(hash_key(&self.hash_builder, &node.key), capacity);
                let head = &mut self.buckets[index];
                node.next = head.take();
                *head = Some(node);
            }
        }

        #[cfg(feature = "logging")]
        log::debug!(
            "resized hash table to {capacity} buckets ({} entries)",
            self.len
        );
    }

    fn maybe_grow(&mut self) {
        let GrowthPolicy::AverageChainLength(limit) = self.growth else {
            return;
        };

        while self.len.saturating_add(1) > self.buckets.len().saturating_mul(limit.get()) {
            if let Err(_err) = self.try_resize() {
                #[cfg(feature = "logging")]
                log::warn!(
                    "automatic growth stopped at {} buckets: {_err}",
                    self.buckets.len()
                );
                return;
            }
        }
    }
}

impl<'k, V, S> Extend<(&'k str, V)> for HashTable<V, S>
where
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (&'k str, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, V, S> IntoIterator for &'a HashTable<V, S> {
    type IntoIter = Iter<'a, V>;
    type Item = (&'a str, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Chain and memory statistics for a [`HashTable`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries in the table
    pub entries: usize,
    /// Number of buckets
    pub buckets: usize,
    /// Number of buckets with a non-empty chain
    pub occupied_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Average chain length (entries / buckets)
    pub load_factor: f64,
    /// Bytes held by the bucket array, the nodes, and the key strings
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Entries: {} in {} buckets (load factor {:.2})",
            self.entries, self.buckets, self.load_factor
        );
        println!(
            "Occupied: {}/{} buckets ({:.2}%)",
            self.occupied_buckets,
            self.buckets,
            self.occupied_buckets as f64 / self.buckets as f64 * 100.0
        );
        println!("Longest chain: {}", self.longest_chain);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// The key is present.
    Occupied(OccupiedEntry<'a, V>),
    /// The key is absent.
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Runs `f` on the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns the entry's key.
    pub fn key(&self) -> &str {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, V> Entry<'a, V>
where
    V: Default,
{
    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    /// Always `Some`: the link owning the matching node.
    link: &'a mut Link<V>,
    len: &'a mut usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    fn node(&self) -> &Node<V> {
        match self.link.as_deref() {
            Some(node) => node,
            None => unreachable!("occupied entry points at an empty link"),
        }
    }

    fn node_mut(&mut self) -> &mut Node<V> {
        match self.link.as_deref_mut() {
            Some(node) => node,
            None => unreachable!("occupied entry points at an empty link"),
        }
    }

    /// Returns the stored key.
    pub fn key(&self) -> &str {
        &self.node().key
    }

    /// Returns the stored value.
    pub fn get(&self) -> &V {
        &self.node().value
    }

    /// Returns the stored value mutably.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.node_mut().value
    }

    /// Converts the entry into a mutable reference to the value with the
    /// table's borrow lifetime.
    pub fn into_mut(self) -> &'a mut V {
        match self.link.as_deref_mut() {
            Some(node) => &mut node.value,
            None => unreachable!("occupied entry points at an empty link"),
        }
    }

    /// Replaces the value in place and returns the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Unlinks the entry and returns its value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Unlinks the entry and returns its key and value.
    ///
    /// The link that owned the node, whether a bucket head or the previous
    /// node's `next`, is pointed at the node's successor.
    pub fn remove_entry(self) -> (String, V) {
        let Some(mut node) = self.link.take() else {
            unreachable!("occupied entry points at an empty link")
        };
        *self.link = node.next.take();
        *self.len -= 1;

        let Node { key, value, .. } = *node;
        (key, value)
    }
}

/// A view into a vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    /// The empty link at the tail of the key's chain.
    link: &'a mut Link<V>,
    len: &'a mut usize,
    key: &'a str,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Returns the key that would be inserted.
    pub fn key(&self) -> &str {
        self.key
    }

    /// Appends a new node holding the key and `value` at the tail of the
    /// chain and returns a mutable reference to the value.
    pub fn insert(self, value: V) -> &'a mut V {
        *self.len += 1;
        &mut self
            .link
            .insert(Box::new(Node {
                key: self.key.into(),
                value,
                next: None,
            }))
            .value
    }
}

/// An iterator over the entries of a [`HashTable`].
///
/// Created by [`HashTable::iter`].
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Link<V>>,
    node: Option<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.node {
                self.node = node.next.as_deref();
                self.remaining -= 1;
                return Some((node.key.as_str(), &node.value));
            }
            self.node = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// An iterator over the keys of a [`HashTable`].
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a [`HashTable`].
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the entries of a [`HashTable`].
///
/// Created by [`HashTable::drain`]. Each yielded entry is unlinked before it
/// is returned, so the table's length stays accurate even if the iterator is
/// leaked.
pub struct Drain<'a, V> {
    buckets: core::slice::IterMut<'a, Link<V>>,
    head: Option<&'a mut Link<V>>,
    len: &'a mut usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(head) = self.head.as_deref_mut()
                && let Some(mut node) = head.take()
            {
                *head = node.next.take();
                *self.len -= 1;
                let Node { key, value, .. } = *node;
                return Some((key, value));
            }
            self.head = Some(self.buckets.next()?);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (*self.len, Some(*self.len))
    }
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in self {}
    }
}
