use chain_hash::HashTable;
use chain_hash::hash::Djb2;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Starting bucket count. The default of 2 forces the three lines to share buckets.
    #[arg(short = 'c', long = "capacity", default_value_t = 2)]
    capacity: usize,
}

fn main() -> Result<(), chain_hash::TableError> {
    let args = Args::parse();

    let mut table = HashTable::try_with_capacity_and_hasher(args.capacity, Djb2)?;

    table.insert("line_1", "Tiny hash table");
    table.insert("line_2", "Filled beyond capacity");
    table.insert("line_3", "Linked list saves the day!");

    println!();

    // Store beyond capacity
    for key in ["line_1", "line_2", "line_3"] {
        println!(
            "{key} (bucket {}): {:?}",
            table.bucket_of(key),
            table.retrieve(key)
        );
    }

    let old_capacity = table.capacity();
    table.try_resize()?;
    let new_capacity = table.capacity();

    println!("\nResized from {old_capacity} to {new_capacity}.\n");

    // Data must be intact after resizing
    for key in ["line_1", "line_2", "line_3"] {
        println!(
            "{key} (bucket {}): {:?}",
            table.bucket_of(key),
            table.retrieve(key)
        );
    }

    println!();
    Ok(())
}
