//! Decoding and encoding multi-delimiter structured values.
//!
//! Run with: cargo run --example structured_values

use compound_value::{
    decode_compound_value, encode_compound_value, to_string, Grammar, PropertyValue,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let grammar = Grammar::structured();

    let inputs = [
        "Doe;John,Johnny;;Dr.;Esq.",
        ";;123 Main St\\, Apt 4;Springfield;IL;62701;USA",
        "first line\\nsecond line",
    ];

    for text in inputs {
        let value = decode_compound_value(text, &grammar)?;
        match &value {
            PropertyValue::Text(s) => println!("{text:?}\n  text: {s:?}"),
            PropertyValue::Compound(node) => {
                println!("{text:?}\n  tree: {}", to_string(node));
            }
        }

        let encoded = encode_compound_value(&value, &grammar);
        assert_eq!(decode_compound_value(&encoded, &grammar)?, value);
        println!("  re-encoded: {encoded:?}");
    }

    let custom = Grammar::from_chars(&['^', '|', '~'])?.with_replacement('t', "\t");
    let value = custom.decode("a~b|c^|d|e^tf")?;
    println!("\nCustom grammar tree: {}", to_string(&value.into_node()));

    println!("\nAs JSON: {}", serde_json::to_string(&grammar.decode("a;b,c")?)?);

    Ok(())
}
