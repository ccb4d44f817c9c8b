use std::num::NonZeroUsize;

use chain_hash::GrowthPolicy;
use chain_hash::HashTable;
use chain_hash::hash::Djb2;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: usize,

    #[arg(short = 'b', long = "buckets", default_value = "16")]
    buckets: NonZeroUsize,

    /// Grow automatically once the average chain would exceed this length.
    #[arg(short = 'm', long = "max_chain")]
    max_chain: Option<NonZeroUsize>,
}

fn main() {
    let args = Args::parse();

    let policy = args
        .max_chain
        .map_or(GrowthPolicy::Manual, GrowthPolicy::AverageChainLength);

    println!(
        "Creating HashTable with {} buckets ({:?})",
        args.buckets, policy
    );

    let mut table: HashTable<u64, Djb2> =
        HashTable::with_capacity_and_hasher(args.buckets, Djb2).with_growth_policy(policy);

    println!("Filling table with {} entries...", args.entries);
    for i in 0..args.entries {
        table.insert(&format!("key_{i}"), i as u64);
    }

    println!(
        "Inserted {} entries into {} buckets",
        table.len(),
        table.capacity()
    );

    table.print_chain_histogram();
    table.debug_stats().print();

    table.resize();
    println!("\nAfter resize:");
    table.debug_stats().print();
}
