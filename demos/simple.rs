//! Parsing and serializing compound values.
//!
//! Run with: cargo run --example simple

use compound_value::{from_str, to_string, Entry, Node};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let text = "1,2,(3,4),\"five, six\"";
    let node = from_str(text)?;

    println!("Parsed {:?}:", text);
    for (index, entry) in node.iter().enumerate() {
        match entry {
            Entry::Scalar(s) => println!("  [{index}] scalar {s:?}"),
            Entry::Group(group) => println!("  [{index}] group of {}", group.len()),
            Entry::Null => println!("  [{index}] null"),
        }
    }

    let root = node.view();
    if let Some(child) = root.child(2) {
        println!("Group at index 2 has depth {}", child.depth());
    }

    let output = to_string(&node);
    assert_eq!(output, text);
    println!("\nCanonical output: {}", output);

    let mut built = Node::new();
    built.add("Doe");
    built.add("Jane");
    built.add_value("PhD", Some(3));
    built.add_value("MD", Some(3));
    println!("Built value:      {}", built);

    match from_str("(1,2") {
        Ok(_) => unreachable!(),
        Err(err) => println!("\nRejected \"(1,2\": {}", err),
    }

    println!("✓ Round-trip successful");
    Ok(())
}
