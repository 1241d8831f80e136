//! Rendering compound values for display.
//!
//! Run with: cargo run --example formatted_output

use compound_value::{from_str, to_formatted_string, FormatOptions};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // post office box, extended address, street, locality, region, postal code, country
    let address = from_str(",Suite 200,(123 Main St,Building B),Springfield,IL,62701,")?;

    let default = FormatOptions::default();
    println!("Default:        {}", to_formatted_string(&address, &default));

    let lines = FormatOptions::new()
        .with_indices([2, 1, 3, 4, 5])
        .with_separator(", ");
    println!("Address line:   {}", to_formatted_string(&address, &lines));

    let display = FormatOptions::display();
    println!("Display:        {}", to_formatted_string(&address, &display));

    let slots = FormatOptions::new()
        .with_separator("|")
        .with_include_empty(true);
    println!("All slots:      {}", to_formatted_string(&address, &slots));

    let name = from_str("Doe,John,(Quinlan,Q.),Mr.,")?;
    let order = FormatOptions::new().with_indices([3, 1, 2, 0, 4]);
    let full = to_formatted_string(&name, &order);
    assert_eq!(full, "Mr. John Quinlan Q. Doe");
    println!("\nFull name:      {}", full);

    Ok(())
}
