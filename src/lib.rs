//! # compound_value
//!
//! A parser and serializer for compound property values: nested lists of
//! fields written on a single line of text.
//!
//! ## What is a Compound Value?
//!
//! Structured documents such as vCard-like records store property values
//! that may be a scalar, a flat list of values, or a list of lists. This
//! crate represents them with an RFC 4180 (CSV) inspired grammar extended
//! with parenthesized groups:
//!
//! ```text
//! 1,2,(3,4),5
//! "a,b",c
//! ```
//!
//! ## Key Features
//!
//! - **Strict Parsing**: Stray quotes, unbalanced groups and raw line breaks
//!   are reported with their position, never repaired
//! - **Round-trip Serialization**: Canonical output quotes only when needed
//!   and parses back to an equal tree
//! - **Formatted Output**: Field selection and custom separators for display
//! - **Structured Grammars**: A lenient multi-delimiter decoder for
//!   escape-based property syntaxes like `Doe;John,Johnny;;Dr.`
//! - **Transfer Encodings**: Base64 and Quoted-Printable with charset support
//!
//! ## Quick Start
//!
//! ```rust
//! use compound_value::{from_str, to_string, Entry, Node};
//!
//! let node = from_str("1,2,(3,4),5").unwrap();
//!
//! assert_eq!(node.len(), 4);
//! assert_eq!(node.get_str(0), Some("1"));
//! assert_eq!(node.get_node(2), Some(&Node::from_iter(["3", "4"])));
//!
//! assert_eq!(to_string(&node), "1,2,(3,4),5");
//! ```
//!
//! ### Building Values
//!
//! ```rust
//! use compound_value::{compound, Node};
//!
//! let mut node = compound!["Doe", "John"];
//! node.add_value("Jr.", Some(3));
//! node.add_value("Esq.", Some(3));
//!
//! assert_eq!(node.to_string(), "Doe,John,,(Jr.,Esq.)");
//! ```
//!
//! ### Formatted Output
//!
//! ```rust
//! use compound_value::{from_str, to_formatted_string, FormatOptions};
//!
//! let node = from_str("a,,b").unwrap();
//!
//! assert_eq!(to_formatted_string(&node, &FormatOptions::new()), "a b");
//! assert_eq!(
//!     to_formatted_string(&node, &FormatOptions::new().with_include_empty(true)),
//!     "a  b"
//! );
//! ```
//!
//! ### Structured Values
//!
//! ```rust
//! use compound_value::{decode_compound_value, Grammar};
//!
//! let value = decode_compound_value("Doe;John;;;", &Grammar::structured()).unwrap();
//! let node = value.as_node().unwrap();
//! assert_eq!(node.len(), 5);
//! assert_eq!(node.get_str(1), Some("John"));
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`trace` for group structure, `debug`
//! for parse summaries, `warn` for leniently accepted input). Install any
//! subscriber to see them; nothing is printed otherwise.
//!
//! ## Thread Safety
//!
//! All types are plain owned data. Parsing and serialization share no state,
//! so independent values can be processed from any number of threads.

pub mod codec;
pub mod de;
pub mod error;
pub mod grammar;
pub mod macros;
pub mod options;
pub mod ser;
pub mod structured;
pub mod value;

pub use codec::{Charset, TransferEncoding};
pub use de::Parser;
pub use error::{Error, Result};
pub use grammar::Grammar;
pub use options::FormatOptions;
pub use structured::{decode_compound_value, encode_compound_value, PropertyValue};
pub use value::{Entry, Node, NodeRef};

/// Parse a compound value into a [`Node`] tree.
///
/// Empty input gives an empty node.
///
/// # Examples
///
/// ```rust
/// use compound_value::from_str;
///
/// let node = from_str("\"a,b\",c").unwrap();
/// assert_eq!(node.get_str(0), Some("a,b"));
/// assert_eq!(node.get_str(1), Some("c"));
/// ```
///
/// # Errors
///
/// Returns a syntax error if the text does not follow the grammar, for
/// example [`Error::UnbalancedOpen`] for `"(1,2"` or
/// [`Error::MissingSeparatorAfterGroup`] for `"(1,2)x"`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(input: &str) -> Result<Node> {
    de::from_str(input)
}

/// Parse a compound value from bytes of UTF-8 text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or the text does not
/// follow the grammar.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Node> {
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

/// Serialize a [`Node`] to its canonical, round-trip safe text form.
///
/// # Examples
///
/// ```rust
/// use compound_value::{to_string, Node};
///
/// let node = Node::from_iter(["a,b", "c"]);
/// assert_eq!(to_string(&node), "\"a,b\",c");
/// ```
#[must_use]
pub fn to_string(node: &Node) -> String {
    ser::to_string(node)
}

/// Serialize a [`Node`] to a display string shaped by `options`.
///
/// The result is meant for people, not for parsing: nothing is escaped.
///
/// # Examples
///
/// ```rust
/// use compound_value::{from_str, to_formatted_string, FormatOptions};
///
/// let node = from_str("1,(2,3)").unwrap();
/// let options = FormatOptions::new().with_separator("-").with_wrappers("<", ">");
/// assert_eq!(to_formatted_string(&node, &options), "1-<2-3>");
/// ```
#[must_use]
pub fn to_formatted_string(node: &Node, options: &FormatOptions) -> String {
    ser::to_formatted_string(node, options)
}
