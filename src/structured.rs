//! Multi-delimiter structured values.
//!
//! Structured property grammars (vCard `N`, `ADR`, `ORG` and friends) do not
//! use parenthesized groups. Instead each delimiter of a [`Grammar`] stands
//! for one nesting depth, and a single escape character protects literal
//! delimiters. Decoding produces a [`PropertyValue`]: plain text when the
//! value had no delimiters, a [`Node`] tree otherwise.
//!
//! Unlike the strict parser in [`crate::de`], escapes are handled leniently:
//! an escape followed by a character the grammar does not know is kept as is.
//!
//! ```rust
//! use compound_value::{decode_compound_value, Grammar, PropertyValue};
//!
//! let grammar = Grammar::structured();
//!
//! let value = decode_compound_value("Doe;John,Johnny;;Dr.", &grammar).unwrap();
//! let node = value.as_node().unwrap();
//! assert_eq!(node.get_str(0), Some("Doe"));
//! assert_eq!(node.get_node(1).map(|n| n.len()), Some(2));
//!
//! let value = decode_compound_value("line one\\nline two", &grammar).unwrap();
//! assert_eq!(value, PropertyValue::Text("line one\nline two".to_string()));
//! ```

use crate::{Entry, Error, Grammar, Node, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A decoded property value: plain text or a tree of fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Compound(Node),
}

impl PropertyValue {
    /// If the value is plain text, returns it.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Compound(_) => None,
        }
    }

    /// If the value is compound, returns its tree.
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            PropertyValue::Compound(node) => Some(node),
            PropertyValue::Text(_) => None,
        }
    }

    /// Returns `true` if the value has fields.
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, PropertyValue::Compound(_))
    }

    /// Converts into a tree; plain text becomes a single-field node.
    #[must_use]
    pub fn into_node(self) -> Node {
        match self {
            PropertyValue::Text(s) => Node::from_iter([s]),
            PropertyValue::Compound(node) => node,
        }
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<Node> for PropertyValue {
    fn from(value: Node) -> Self {
        PropertyValue::Compound(value)
    }
}

/// Decode `text` using the delimiters and escapes of `grammar`.
///
/// # Errors
///
/// Returns [`Error::InvalidGrammar`] if the grammar fails
/// [`Grammar::validate`], and [`Error::StackUnderflow`] if decoding tries to
/// leave the root level.
pub fn decode_compound_value(text: &str, grammar: &Grammar) -> Result<PropertyValue> {
    grammar.validate()?;

    let mut decoder = Decoder::new();
    let mut chars = text.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        if ch == grammar.escape {
            match chars.peek().map(|&(_, next)| next) {
                Some(next) if next == grammar.escape || grammar.depth_of(next).is_some() => {
                    decoder.buffer.push(next);
                    chars.next();
                }
                Some(next) => {
                    match grammar.replacements.get(&next) {
                        Some(replacement) => decoder.buffer.push_str(replacement),
                        // Unknown escape: leave both characters alone.
                        None => {
                            decoder.buffer.push(ch);
                            decoder.buffer.push(next);
                        }
                    }
                    chars.next();
                }
                None => decoder.buffer.push(ch),
            }
        } else if let Some(depth) = grammar.depth_of(ch) {
            decoder.split(depth, position)?;
        } else {
            decoder.buffer.push(ch);
        }
    }

    decoder.finish(text.len())
}

struct Decoder {
    // stack[0] holds depth-1 fields, stack[1] depth-2 members, and so on.
    stack: Vec<Node>,
    buffer: String,
    split_seen: bool,
}

impl Decoder {
    fn new() -> Self {
        Decoder {
            stack: vec![Node::new()],
            buffer: String::new(),
            split_seen: false,
        }
    }

    fn top(&mut self) -> &mut Node {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn flush(&mut self) {
        let text = std::mem::take(&mut self.buffer);
        self.top().add(Entry::Scalar(text));
    }

    fn split(&mut self, depth: usize, position: usize) -> Result<()> {
        self.split_seen = true;
        while self.stack.len() < depth {
            self.stack.push(Node::new());
            trace!(position, depth = self.stack.len(), "descend");
        }
        self.flush();
        while self.stack.len() > depth {
            self.pop(position)?;
        }
        Ok(())
    }

    fn pop(&mut self, position: usize) -> Result<()> {
        if self.stack.len() <= 1 {
            return Err(Error::StackUnderflow { position });
        }
        let child = self.stack.pop().unwrap_or_default();
        trace!(position, members = child.len(), "ascend");
        self.top().add(Entry::Group(child));
        Ok(())
    }

    fn finish(mut self, end: usize) -> Result<PropertyValue> {
        if !self.split_seen {
            return Ok(PropertyValue::Text(self.buffer));
        }
        self.flush();
        while self.stack.len() > 1 {
            self.pop(end)?;
        }
        let root = self.stack.pop().unwrap_or_default();
        debug!(fields = root.len(), "decoded structured value");
        Ok(PropertyValue::Compound(root))
    }
}

/// Encode a value with the delimiters and escapes of `grammar`.
///
/// Literal escape and delimiter characters are escaped, and characters that
/// a single-character replacement produces are written back as their escape.
/// Groups nested deeper than the grammar has delimiters are joined with the
/// deepest delimiter.
///
/// # Examples
///
/// ```rust
/// use compound_value::{encode_compound_value, Entry, Grammar, Node, PropertyValue};
///
/// let node = Node::from_iter([
///     Entry::from("Main St; Apt 4"),
///     Entry::from(vec!["home", "work"]),
/// ]);
/// let text = encode_compound_value(&PropertyValue::Compound(node), &Grammar::structured());
/// assert_eq!(text, "Main St\\; Apt 4;home,work");
/// ```
#[must_use]
pub fn encode_compound_value(value: &PropertyValue, grammar: &Grammar) -> String {
    let mut output = String::new();
    match value {
        PropertyValue::Text(s) => escape_into(&mut output, s, grammar),
        PropertyValue::Compound(node) => encode_node(&mut output, node, 1, grammar),
    }
    output
}

fn encode_node(output: &mut String, node: &Node, depth: usize, grammar: &Grammar) {
    let index = depth.min(grammar.max_depth()).saturating_sub(1);
    let delimiter = grammar.delimiters.get(index).copied();
    for (i, entry) in node.iter().enumerate() {
        if i > 0 {
            if let Some(delimiter) = delimiter {
                output.push(delimiter);
            }
        }
        match entry {
            Entry::Null => {}
            Entry::Scalar(s) => escape_into(output, s, grammar),
            Entry::Group(child) => encode_node(output, child, depth + 1, grammar),
        }
    }
}

fn escape_into(output: &mut String, text: &str, grammar: &Grammar) {
    for ch in text.chars() {
        if ch == grammar.escape || grammar.depth_of(ch).is_some() {
            output.push(grammar.escape);
            output.push(ch);
        } else if let Some(key) = replacement_key(ch, grammar) {
            output.push(grammar.escape);
            output.push(key);
        } else {
            output.push(ch);
        }
    }
}

fn replacement_key(ch: char, grammar: &Grammar) -> Option<char> {
    grammar.replacements.iter().find_map(|(&key, text)| {
        let mut chars = text.chars();
        (chars.next() == Some(ch) && chars.next().is_none()).then_some(key)
    })
}

impl Grammar {
    /// Decodes `text` with this grammar. See [`decode_compound_value`].
    ///
    /// # Errors
    ///
    /// See [`decode_compound_value`].
    pub fn decode(&self, text: &str) -> Result<PropertyValue> {
        decode_compound_value(text, self)
    }

    /// Encodes `value` with this grammar. See [`encode_compound_value`].
    #[must_use]
    pub fn encode(&self, value: &PropertyValue) -> String {
        encode_compound_value(value, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> PropertyValue {
        decode_compound_value(text, &Grammar::structured()).unwrap()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(decode("hello"), PropertyValue::Text("hello".into()));
        assert_eq!(decode(""), PropertyValue::Text(String::new()));
    }

    #[test]
    fn test_fields_and_members() {
        let value = decode("Doe;John,Johnny;;Dr.");
        let expected = Node::from_iter([
            Entry::from("Doe"),
            Entry::from(vec!["John", "Johnny"]),
            Entry::from(""),
            Entry::from("Dr."),
        ]);
        assert_eq!(value, PropertyValue::Compound(expected));
    }

    #[test]
    fn test_trailing_delimiters() {
        let value = decode("a;");
        assert_eq!(value.into_node(), Node::from_iter(["a", ""]));
    }

    #[test]
    fn test_members_only() {
        let value = decode("a,b");
        let expected = Node::from_iter([Entry::from(vec!["a", "b"])]);
        assert_eq!(value, PropertyValue::Compound(expected));
    }

    #[test]
    fn test_member_list_then_field() {
        let value = decode("b,c;d");
        let expected = Node::from_iter([Entry::from(vec!["b", "c"]), Entry::from("d")]);
        assert_eq!(value.into_node(), expected);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(decode("a\\;b"), PropertyValue::Text("a;b".into()));
        assert_eq!(decode("a\\,b"), PropertyValue::Text("a,b".into()));
        assert_eq!(decode("a\\\\b"), PropertyValue::Text("a\\b".into()));
        assert_eq!(decode("a\\Nb"), PropertyValue::Text("a\nb".into()));
    }

    #[test]
    fn test_unknown_escape_passes_through() {
        assert_eq!(decode("a\\xb"), PropertyValue::Text("a\\xb".into()));
        assert_eq!(decode("trailing\\"), PropertyValue::Text("trailing\\".into()));
    }

    #[test]
    fn test_skipping_a_level() {
        let grammar = Grammar::new('\\', [';', ',', ':']);
        let value = decode_compound_value("a:b;c", &grammar).unwrap();
        let inner = Node::from_iter(["a", "b"]);
        let expected = Node::from_iter([
            Entry::Group(Node::from_iter([Entry::Group(inner)])),
            Entry::from("c"),
        ]);
        assert_eq!(value.into_node(), expected);
    }

    #[test]
    fn test_invalid_grammar() {
        let err = decode_compound_value("a", &Grammar::new('\\', [])).unwrap_err();
        assert!(matches!(err, Error::InvalidGrammar(_)));
    }

    #[test]
    fn test_underflow_guard() {
        let mut decoder = Decoder::new();
        assert_eq!(
            decoder.pop(7).unwrap_err(),
            Error::StackUnderflow { position: 7 }
        );
    }

    #[test]
    fn test_encode_round_trip() {
        let grammar = Grammar::structured();
        for text in ["Doe;John,Johnny;;Dr.", "a\\;b;c\\,d,e", "x\\ny"] {
            let value = decode_compound_value(text, &grammar).unwrap();
            let encoded = encode_compound_value(&value, &grammar);
            assert_eq!(decode_compound_value(&encoded, &grammar).unwrap(), value);
        }
    }

    #[test]
    fn test_encode_replacements() {
        let grammar = Grammar::structured();
        let value = PropertyValue::Text("one\ntwo\\".into());
        assert_eq!(encode_compound_value(&value, &grammar), "one\\ntwo\\\\");
    }

    #[test]
    fn test_encode_flattens_excess_depth() {
        let grammar = Grammar::structured();
        let deep = Node::from_iter([Entry::from(vec![
            Entry::from("a"),
            Entry::from(vec!["b", "c"]),
        ])]);
        assert_eq!(
            encode_compound_value(&PropertyValue::Compound(deep), &grammar),
            "a,b,c"
        );
    }
}
