//! Compound value serialization.
//!
//! Two output modes are provided:
//!
//! - **Canonical** ([`to_string`]): the exact inverse of the parser. Scalars
//!   are enquoted only when they contain a delimiter, so parsing the output
//!   gives back an equal tree.
//! - **Formatted** ([`to_formatted_string`]): a display projection with field
//!   selection and custom separators. No escaping is done and the output is
//!   not meant to be parsed again.
//!
//! ## Usage
//!
//! ```rust
//! use compound_value::{from_str, to_formatted_string, to_string, FormatOptions};
//!
//! let node = from_str("Doe,John,(Jr.,Esq.)").unwrap();
//! assert_eq!(to_string(&node), "Doe,John,(Jr.,Esq.)");
//!
//! let options = FormatOptions::new().with_indices([1, 0, 2]);
//! assert_eq!(to_formatted_string(&node, &options), "John Doe Jr. Esq.");
//! ```

use crate::grammar::{needs_quotes, GROUP_CLOSE, GROUP_OPEN, QUOTE, SEPARATOR};
use crate::{Entry, FormatOptions, Node};

/// Serialize a node to its canonical text form.
#[must_use]
pub fn to_string(node: &Node) -> String {
    // Typical property values are short; start with a modest buffer.
    let mut output = String::with_capacity(64);
    write_canonical(&mut output, node);
    output
}

/// Append the canonical form of a root node to `output`.
pub fn write_canonical(output: &mut String, node: &Node) {
    write_entries(output, node);
}

/// Append the canonical form of a single entry to `output`.
///
/// Groups are wrapped in parentheses, nulls produce nothing.
pub fn write_entry(output: &mut String, entry: &Entry) {
    match entry {
        Entry::Null => {}
        Entry::Scalar(s) => write_scalar(output, s),
        Entry::Group(child) => {
            output.push(GROUP_OPEN);
            write_entries(output, child);
            output.push(GROUP_CLOSE);
        }
    }
}

fn write_entries(output: &mut String, node: &Node) {
    for (i, entry) in node.iter().enumerate() {
        if i > 0 {
            output.push(SEPARATOR);
        }
        write_entry(output, entry);
    }
}

#[inline]
fn write_scalar(output: &mut String, s: &str) {
    if needs_quotes(s) {
        output.push(QUOTE);
        for ch in s.chars() {
            if ch == QUOTE {
                output.push(QUOTE);
            }
            output.push(ch);
        }
        output.push(QUOTE);
    } else {
        output.push_str(s);
    }
}

/// Serialize a node to its display form.
///
/// `options.indices` selects and orders the top-level fields; nested groups
/// always render every field. Unless `options.include_empty` is set, empty
/// fields are dropped together with their separator and wrappers.
#[must_use]
pub fn to_formatted_string(node: &Node, options: &FormatOptions) -> String {
    match &options.indices {
        Some(indices) => join_pieces(
            indices
                .iter()
                .map(|&index| format_slot(node.get_value(index), options)),
            options,
        ),
        None => format_all(node, options),
    }
}

fn format_all(node: &Node, options: &FormatOptions) -> String {
    join_pieces(
        node.iter().map(|entry| format_slot(Some(entry), options)),
        options,
    )
}

fn format_slot(entry: Option<&Entry>, options: &FormatOptions) -> String {
    match entry {
        None | Some(Entry::Null) => String::new(),
        Some(Entry::Scalar(s)) => s.clone(),
        Some(Entry::Group(child)) => {
            let inner = format_all(child, options);
            match (&options.open, &options.close) {
                (None, None) => inner,
                _ if inner.is_empty() && !options.include_empty => inner,
                (open, close) => {
                    let open = open.as_deref().unwrap_or_default();
                    let close = close.as_deref().unwrap_or_default();
                    format!("{open}{inner}{close}")
                }
            }
        }
    }
}

fn join_pieces(pieces: impl Iterator<Item = String>, options: &FormatOptions) -> String {
    let mut output = String::new();
    let mut first = true;
    for piece in pieces {
        if piece.is_empty() && !options.include_empty {
            continue;
        }
        if !first {
            output.push_str(&options.separator);
        }
        output.push_str(&piece);
        first = false;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_str;

    #[test]
    fn test_canonical_flat() {
        let node = Node::from_iter(["a", "b"]);
        assert_eq!(to_string(&node), "a,b");
    }

    #[test]
    fn test_canonical_nested_and_null() {
        let node = Node::from_iter([
            Entry::from("1"),
            Entry::Null,
            Entry::from(vec!["2", "3"]),
            Entry::from(Node::new()),
        ]);
        assert_eq!(to_string(&node), "1,,(2,3),()");
    }

    #[test]
    fn test_canonical_escaping() {
        let node = Node::from_iter(["a,b", "say \"hi\"", "(x)", "line\nbreak", "plain"]);
        assert_eq!(
            to_string(&node),
            "\"a,b\",\"say \"\"hi\"\"\",\"(x)\",\"line\nbreak\",plain"
        );
    }

    #[test]
    fn test_empty_root() {
        assert_eq!(to_string(&Node::new()), "");
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(Entry::from("a,b").to_string(), "\"a,b\"");
        assert_eq!(Entry::from(vec!["x"]).to_string(), "(x)");
        assert_eq!(Entry::Null.to_string(), "");
    }

    #[test]
    fn test_formatted_defaults() {
        let node = from_str("a,,b").unwrap();
        assert_eq!(to_formatted_string(&node, &FormatOptions::default()), "a b");

        let keep = FormatOptions::new().with_include_empty(true);
        assert_eq!(to_formatted_string(&node, &keep), "a  b");
    }

    #[test]
    fn test_formatted_flattens_groups() {
        let node = from_str("1,(2,3),4").unwrap();
        assert_eq!(to_formatted_string(&node, &FormatOptions::new()), "1 2 3 4");
    }

    #[test]
    fn test_formatted_wrappers() {
        let node = from_str("1,(2,3),(),4").unwrap();
        let options = FormatOptions::new()
            .with_separator(", ")
            .with_wrappers("[", "]");
        assert_eq!(to_formatted_string(&node, &options), "1, [2, 3], 4");

        let keep = options.with_include_empty(true);
        assert_eq!(to_formatted_string(&node, &keep), "1, [2, 3], [], 4");
    }

    #[test]
    fn test_formatted_indices() {
        let node = from_str("Doe,John,,Dr.").unwrap();
        let options = FormatOptions::new().with_indices([3, 1, 2, 0, 9]);
        assert_eq!(to_formatted_string(&node, &options), "Dr. John Doe");

        let keep = options.with_include_empty(true);
        assert_eq!(to_formatted_string(&node, &keep), "Dr. John  Doe ");
    }

    #[test]
    fn test_formatted_does_not_escape() {
        let node = Node::from_iter(["a,b", "\"q\""]);
        assert_eq!(
            to_formatted_string(&node, &FormatOptions::new().with_separator("|")),
            "a,b|\"q\""
        );
    }
}
