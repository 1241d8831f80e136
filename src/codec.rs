//! Transfer encodings for property values.
//!
//! Property bodies may carry their text in a transfer encoding, with the
//! underlying bytes in a declared charset. This module provides stateless
//! transforms for both:
//!
//! - [`Charset`]: converts between text and bytes
//! - Base64: [`encode_base64_text`], [`decode_base64_text`]
//! - Quoted-Printable: [`encode_quoted_printable`], [`decode_quoted_printable`]
//!
//! Every decoder also has a form that walks a whole [`Node`] tree or
//! [`PropertyValue`], transforming each scalar and keeping the shape.
//!
//! ```rust
//! use compound_value::codec::{decode_quoted_printable, Charset};
//!
//! let text = decode_quoted_printable("caf=C3=A9 au lait", Charset::Utf8).unwrap();
//! assert_eq!(text, "café au lait");
//! ```

use crate::{Error, Node, PropertyValue, Result};
use base64::{engine::general_purpose, Engine as _};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Character set used to turn decoded bytes into text and back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
    Ascii,
    Utf16Le,
    Utf16Be,
}

impl Charset {
    /// The preferred label of this charset.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Ascii => "US-ASCII",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Utf16Be => "UTF-16BE",
        }
    }

    /// Converts text to bytes in this charset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Charset`] if a character cannot be represented.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Latin1 | Charset::Ascii => {
                let limit = if *self == Charset::Ascii { 0x7F } else { 0xFF };
                text.chars()
                    .map(|ch| {
                        u8::try_from(u32::from(ch))
                            .ok()
                            .filter(|&b| u32::from(b) <= limit)
                            .ok_or_else(|| {
                                Error::charset(
                                    self.name(),
                                    format!("character {ch:?} is not representable"),
                                )
                            })
                    })
                    .collect()
            }
            Charset::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Charset::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
        }
    }

    /// Converts bytes in this charset to text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Charset`] on malformed input.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Charset::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|e| Error::charset(self.name(), e.to_string())),
            Charset::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Charset::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(index) => Err(Error::charset(
                    self.name(),
                    format!("byte 0x{:02X} at offset {index} is not ASCII", bytes[index]),
                )),
                None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            },
            Charset::Utf16Le | Charset::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(Error::charset(self.name(), "odd number of bytes"));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| {
                        let pair = [pair[0], pair[1]];
                        if *self == Charset::Utf16Le {
                            u16::from_le_bytes(pair)
                        } else {
                            u16::from_be_bytes(pair)
                        }
                    })
                    .collect();
                String::from_utf16(&units).map_err(|e| Error::charset(self.name(), e.to_string()))
            }
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = Error;

    /// Parses a charset label, ignoring case.
    fn from_str(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Charset::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" => Ok(Charset::Latin1),
            "us-ascii" | "ascii" => Ok(Charset::Ascii),
            "utf-16le" | "utf16le" => Ok(Charset::Utf16Le),
            "utf-16be" | "utf16be" => Ok(Charset::Utf16Be),
            _ => Err(Error::custom(format!("unsupported charset: {label}"))),
        }
    }
}

/// Transfer encoding declared for a property value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferEncoding {
    Base64,
    QuotedPrintable,
}

impl TransferEncoding {
    /// Decodes one piece of text.
    ///
    /// # Errors
    ///
    /// See [`decode_base64_text`] and [`decode_quoted_printable`].
    pub fn decode_text(&self, text: &str, charset: Charset) -> Result<String> {
        match self {
            TransferEncoding::Base64 => decode_base64_text(text, charset),
            TransferEncoding::QuotedPrintable => decode_quoted_printable(text, charset),
        }
    }

    /// Encodes one piece of text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Charset`] if the text cannot be represented in `charset`.
    pub fn encode_text(&self, text: &str, charset: Charset) -> Result<String> {
        match self {
            TransferEncoding::Base64 => encode_base64_text(text, charset),
            TransferEncoding::QuotedPrintable => encode_quoted_printable(text, charset),
        }
    }

    /// Decodes every scalar of a property value.
    ///
    /// # Errors
    ///
    /// Stops at the first scalar that fails to decode.
    pub fn decode_value(&self, value: &PropertyValue, charset: Charset) -> Result<PropertyValue> {
        map_value(value, |s| self.decode_text(s, charset))
    }
}

impl FromStr for TransferEncoding {
    type Err = Error;

    /// Parses an `ENCODING` parameter value, ignoring case.
    fn from_str(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "b" | "base64" => Ok(TransferEncoding::Base64),
            "quoted-printable" | "qp" => Ok(TransferEncoding::QuotedPrintable),
            _ => Err(Error::custom(format!("unsupported transfer encoding: {label}"))),
        }
    }
}

fn map_value<F>(value: &PropertyValue, mut f: F) -> Result<PropertyValue>
where
    F: FnMut(&str) -> Result<String>,
{
    match value {
        PropertyValue::Text(s) => f(s).map(PropertyValue::Text),
        PropertyValue::Compound(node) => node.try_map_scalars(f).map(PropertyValue::Compound),
    }
}

/// Encode text as standard Base64 of its bytes in `charset`.
///
/// # Errors
///
/// Returns [`Error::Charset`] if the text cannot be represented in `charset`.
///
/// # Examples
///
/// ```rust
/// use compound_value::codec::{encode_base64_text, Charset};
///
/// assert_eq!(encode_base64_text("hello", Charset::Utf8).unwrap(), "aGVsbG8=");
/// ```
pub fn encode_base64_text(text: &str, charset: Charset) -> Result<String> {
    Ok(general_purpose::STANDARD.encode(charset.encode(text)?))
}

/// Decode standard Base64 and interpret the bytes in `charset`.
///
/// ASCII whitespace inside the payload (left over from line folding) is
/// ignored.
///
/// # Errors
///
/// Returns [`Error::InvalidBase64`] for a malformed payload and
/// [`Error::Charset`] if the bytes are not valid in `charset`.
///
/// # Examples
///
/// ```rust
/// use compound_value::codec::{decode_base64_text, Charset};
///
/// assert_eq!(decode_base64_text("aGVs bG8=", Charset::Utf8).unwrap(), "hello");
/// ```
pub fn decode_base64_text(text: &str, charset: Charset) -> Result<String> {
    let compact: String = text.chars().filter(|ch| !ch.is_ascii_whitespace()).collect();
    let bytes = general_purpose::STANDARD.decode(compact)?;
    charset.decode(&bytes)
}

/// Base64-encode every scalar of a tree.
///
/// # Errors
///
/// See [`encode_base64_text`].
pub fn encode_base64_node(node: &Node, charset: Charset) -> Result<Node> {
    node.try_map_scalars(|s| encode_base64_text(s, charset))
}

/// Base64-decode every scalar of a tree.
///
/// # Errors
///
/// See [`decode_base64_text`].
pub fn decode_base64_node(node: &Node, charset: Charset) -> Result<Node> {
    node.try_map_scalars(|s| decode_base64_text(s, charset))
}

/// Base64-decode a property value, whether plain text or a tree.
///
/// # Errors
///
/// See [`decode_base64_text`].
pub fn decode_base64_value(value: &PropertyValue, charset: Charset) -> Result<PropertyValue> {
    TransferEncoding::Base64.decode_value(value, charset)
}

/// Decode Quoted-Printable text.
///
/// Soft line breaks (`=` followed by CRLF or LF) are removed. Each run of
/// `=XX` escapes is collected into bytes and decoded in one pass, so
/// multi-byte characters split across escapes come out whole. A `=` that
/// starts no valid escape is kept as is.
///
/// # Errors
///
/// Returns [`Error::Charset`] if an escaped run is not valid in `charset`.
///
/// # Examples
///
/// ```rust
/// use compound_value::codec::{decode_quoted_printable, Charset};
///
/// let folded = "Gr=C3=BC=\r\n=C3=9Fe";
/// assert_eq!(decode_quoted_printable(folded, Charset::Utf8).unwrap(), "Grüße");
/// ```
pub fn decode_quoted_printable(text: &str, charset: Charset) -> Result<String> {
    let bytes = text.as_bytes();
    let mut output = String::with_capacity(text.len());
    let mut pending: Vec<u8> = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            i += 1;
            continue;
        }

        if literal_start < i {
            flush_bytes(&mut output, &mut pending, charset)?;
            output.push_str(&text[literal_start..i]);
        }

        let rest = &bytes[i + 1..];
        if rest.starts_with(b"\r\n") {
            i += 3;
        } else if rest.starts_with(b"\n") {
            i += 2;
        } else if let Some(byte) = hex_byte(rest) {
            pending.push(byte);
            i += 3;
        } else {
            warn!(position = i, "malformed quoted-printable escape kept verbatim");
            flush_bytes(&mut output, &mut pending, charset)?;
            output.push('=');
            i += 1;
        }
        literal_start = i;
    }

    if literal_start < bytes.len() {
        flush_bytes(&mut output, &mut pending, charset)?;
        output.push_str(&text[literal_start..]);
    }
    flush_bytes(&mut output, &mut pending, charset)?;
    Ok(output)
}

fn hex_byte(rest: &[u8]) -> Option<u8> {
    let mut byte = [0u8; 1];
    hex::decode_to_slice(rest.get(..2)?, &mut byte).ok()?;
    Some(byte[0])
}

fn flush_bytes(output: &mut String, pending: &mut Vec<u8>, charset: Charset) -> Result<()> {
    if !pending.is_empty() {
        output.push_str(&charset.decode(pending)?);
        pending.clear();
    }
    Ok(())
}

/// Encode text as Quoted-Printable bytes in `charset`.
///
/// Printable ASCII other than `=` is written as is; everything else,
/// including whitespace at the end of the text, becomes an `=XX` escape.
/// Lines are not folded.
///
/// # Errors
///
/// Returns [`Error::Charset`] if the text cannot be represented in `charset`.
///
/// # Examples
///
/// ```rust
/// use compound_value::codec::{encode_quoted_printable, Charset};
///
/// assert_eq!(
///     encode_quoted_printable("café = 1 ", Charset::Utf8).unwrap(),
///     "caf=C3=A9 =3D 1=20"
/// );
/// ```
pub fn encode_quoted_printable(text: &str, charset: Charset) -> Result<String> {
    let bytes = charset.encode(text)?;
    let trailing = bytes
        .iter()
        .rposition(|&b| b != b' ' && b != b'\t')
        .map_or(0, |index| index + 1);

    let mut output = String::with_capacity(bytes.len());
    for (i, &byte) in bytes.iter().enumerate() {
        let literal = match byte {
            b' ' | b'\t' => i < trailing,
            b'=' => false,
            33..=126 => true,
            _ => false,
        };
        if literal {
            output.push(char::from(byte));
        } else {
            output.push('=');
            output.push_str(&hex::encode_upper([byte]));
        }
    }
    Ok(output)
}

/// Quoted-Printable-decode every scalar of a tree.
///
/// # Errors
///
/// See [`decode_quoted_printable`].
pub fn decode_quoted_printable_node(node: &Node, charset: Charset) -> Result<Node> {
    node.try_map_scalars(|s| decode_quoted_printable(s, charset))
}

/// Quoted-Printable-decode a property value, whether plain text or a tree.
///
/// # Errors
///
/// See [`decode_quoted_printable`].
pub fn decode_quoted_printable_value(
    value: &PropertyValue,
    charset: Charset,
) -> Result<PropertyValue> {
    TransferEncoding::QuotedPrintable.decode_value(value, charset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entry;

    #[test]
    fn test_charset_labels() {
        assert_eq!("UTF-8".parse::<Charset>().unwrap(), Charset::Utf8);
        assert_eq!("Latin1".parse::<Charset>().unwrap(), Charset::Latin1);
        assert_eq!(" us-ascii ".parse::<Charset>().unwrap(), Charset::Ascii);
        assert!("klingon".parse::<Charset>().is_err());
        assert_eq!(Charset::Utf16Be.to_string(), "UTF-16BE");
    }

    #[test]
    fn test_latin1_and_ascii() {
        assert_eq!(Charset::Latin1.encode("é").unwrap(), vec![0xE9]);
        assert_eq!(Charset::Latin1.decode(&[0xE9]).unwrap(), "é");
        assert!(Charset::Latin1.encode("€").is_err());
        assert!(Charset::Ascii.encode("é").is_err());
        assert!(Charset::Ascii.decode(&[0x80]).is_err());
    }

    #[test]
    fn test_utf16() {
        let bytes = Charset::Utf16Le.encode("hi").unwrap();
        assert_eq!(bytes, vec![b'h', 0, b'i', 0]);
        assert_eq!(Charset::Utf16Le.decode(&bytes).unwrap(), "hi");
        assert_eq!(Charset::Utf16Be.decode(&[0, b'h']).unwrap(), "h");
        assert!(Charset::Utf16Be.decode(&[0]).is_err());
    }

    #[test]
    fn test_base64_with_charset() {
        let encoded = encode_base64_text("é", Charset::Latin1).unwrap();
        assert_eq!(encoded, "6Q==");
        assert_eq!(decode_base64_text(&encoded, Charset::Latin1).unwrap(), "é");
        assert!(decode_base64_text(&encoded, Charset::Utf8).is_err());
    }

    #[test]
    fn test_base64_invalid() {
        let err = decode_base64_text("not base64!", Charset::Utf8).unwrap_err();
        assert!(matches!(err, Error::InvalidBase64(_)));
    }

    #[test]
    fn test_base64_node() {
        let node = Node::from_iter([Entry::from("aGk="), Entry::Null, Entry::from(vec!["Ynll"])]);
        let decoded = decode_base64_node(&node, Charset::Utf8).unwrap();
        assert_eq!(decoded.to_string(), "hi,,(bye)");
        assert_eq!(encode_base64_node(&decoded, Charset::Utf8).unwrap(), node);
    }

    #[test]
    fn test_quoted_printable_runs() {
        assert_eq!(
            decode_quoted_printable("=E2=82=AC 5", Charset::Utf8).unwrap(),
            "€ 5"
        );
        assert_eq!(
            decode_quoted_printable("a=3db", Charset::Utf8).unwrap(),
            "a=b"
        );
    }

    #[test]
    fn test_quoted_printable_soft_breaks() {
        assert_eq!(
            decode_quoted_printable("long=\r\nline=\nend", Charset::Utf8).unwrap(),
            "longlineend"
        );
    }

    #[test]
    fn test_quoted_printable_lenient() {
        assert_eq!(
            decode_quoted_printable("1+1=2 =", Charset::Utf8).unwrap(),
            "1+1=2 ="
        );
        assert_eq!(
            decode_quoted_printable("=E9t=E9", Charset::Latin1).unwrap(),
            "été"
        );
    }

    #[test]
    fn test_hex_byte() {
        assert_eq!(hex_byte(b"3D"), Some(b'='));
        assert_eq!(hex_byte(b"c3rest"), Some(0xC3));
        assert_eq!(hex_byte(b"G1"), None);
        assert_eq!(hex_byte(b"A"), None);
        assert_eq!(hex_byte(b""), None);
    }

    #[test]
    fn test_encode_quoted_printable_uppercase_hex() {
        assert_eq!(
            encode_quoted_printable("\u{7f}\u{0}", Charset::Utf8).unwrap(),
            "=7F=00"
        );
        assert_eq!(encode_quoted_printable("ÿ", Charset::Latin1).unwrap(), "=FF");
    }

    #[test]
    fn test_quoted_printable_invalid_sequence() {
        let err = decode_quoted_printable("=C3", Charset::Utf8).unwrap_err();
        assert!(matches!(err, Error::Charset { .. }));
    }

    #[test]
    fn test_encode_quoted_printable() {
        assert_eq!(
            encode_quoted_printable("a\r\nb\t", Charset::Utf8).unwrap(),
            "a=0D=0Ab=09"
        );
        let text = "Grüße, 100% = sure";
        let encoded = encode_quoted_printable(text, Charset::Utf8).unwrap();
        assert_eq!(decode_quoted_printable(&encoded, Charset::Utf8).unwrap(), text);
    }

    #[test]
    fn test_transfer_encoding_value() {
        let encoding: TransferEncoding = "QUOTED-PRINTABLE".parse().unwrap();
        let value = PropertyValue::Compound(Node::from_iter(["caf=C3=A9", "ok"]));
        let decoded = encoding.decode_value(&value, Charset::Utf8).unwrap();
        assert_eq!(decoded.as_node().and_then(|n| n.get_str(0)), Some("café"));

        let text = decode_base64_value(&PropertyValue::from("aGk="), Charset::Utf8).unwrap();
        assert_eq!(text.as_text(), Some("hi"));
        assert!("7bit".parse::<TransferEncoding>().is_err());
    }
}
