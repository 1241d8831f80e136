//! Base64 and Quoted-Printable property bodies.
//!
//! Run with: cargo run --example transfer_encodings

use compound_value::codec::{decode_quoted_printable, encode_quoted_printable};
use compound_value::{decode_compound_value, Charset, Grammar, TransferEncoding};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let folded = "Gr=C3=BC=C3=9Fe aus K=\r\n=C3=B6ln";
    println!("Quoted-printable: {:?}", folded);
    println!("Decoded:          {:?}", decode_quoted_printable(folded, Charset::Utf8)?);

    let latin1 = encode_quoted_printable("café", Charset::Latin1)?;
    println!("Latin-1 encoded:  {}\n", latin1);

    for label in ["BASE64", "quoted-printable"] {
        let encoding: TransferEncoding = label.parse()?;
        let encoded = encoding.encode_text("Zoë; Müller", Charset::Utf8)?;
        let decoded = encoding.decode_text(&encoded, Charset::Utf8)?;
        println!("{label:>16}: {encoded} -> {decoded}");
    }

    // Fields are split first, then each one is transfer-decoded.
    let value = decode_compound_value("M=C3=BCller;J=C3=B6rg", &Grammar::structured())?;
    let decoded = TransferEncoding::QuotedPrintable.decode_value(&value, Charset::Utf8)?;
    println!("\nStructured name:  {}", decoded.into_node());

    Ok(())
}
