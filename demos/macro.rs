//! Using the compound! macro for literal value construction.
//!
//! Run with: cargo run --example macro

use compound_value::{compound, from_str, to_string};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let flat = compound!["a", "b", "c"];
    let with_null = compound!["a", null, "c"];
    let nested = compound!["1", "2", ["3", "4"], "5"];
    let escaped = compound!["Doe, Jane", ["say \"hi\"", "(x)"]];

    println!("Flat:      {}", to_string(&flat));
    println!("With null: {}", to_string(&with_null));
    println!("Nested:    {}", to_string(&nested));
    println!("Escaped:   {}\n", to_string(&escaped));

    let suffixes = vec!["Jr.", "Esq."];
    let name = compound!["Doe", "John", null, null, (suffixes)];
    println!("Name:      {}", name);

    assert_eq!(nested, from_str("1,2,(3,4),5")?);
    assert_eq!(from_str(&to_string(&escaped))?, escaped);
    println!("✓ Macro values match their parsed form");

    Ok(())
}
