use core::alloc::Layout;

/// Errors from constructing or growing a [`HashTable`](crate::HashTable).
///
/// Every fallible operation that returns this error leaves the table exactly
/// as it was before the call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A table needs at least one bucket.
    #[error("hash table capacity must be at least one bucket")]
    ZeroCapacity,

    /// The requested bucket count does not fit in the address space.
    #[error("bucket count overflows the maximum allocation size")]
    CapacityOverflow,

    /// The allocator could not provide the bucket array.
    #[error("failed to allocate a bucket array of {buckets} buckets ({} bytes)", .layout.size())]
    AllocError {
        /// Number of buckets that was requested.
        buckets: usize,
        /// Layout of the failed allocation.
        layout: Layout,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            TableError::ZeroCapacity.to_string(),
            "hash table capacity must be at least one bucket"
        );

        let layout = Layout::array::<usize>(4).unwrap();
        let message = TableError::AllocError { buckets: 4, layout }.to_string();
        assert!(message.contains("4 buckets"), "{message}");
        assert!(
            message.contains(&layout.size().to_string()),
            "{message}"
        );
    }
}
