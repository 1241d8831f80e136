//! Property-based tests for the compound value grammar.
//!
//! These cover the guarantees the unit tests only show by example: canonical
//! output parses back to the same tree, canonical form is a fixed point, and
//! formatted output never leaves stray separators behind.

use compound_value::{
    decode_compound_value, encode_compound_value, from_str, to_formatted_string, to_string, Entry,
    FormatOptions, Grammar, Node, PropertyValue,
};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = String> {
    "[a-z ,\"()\\r\\n;é]{0,8}"
}

fn entry() -> impl Strategy<Value = Entry> {
    let leaf = scalar().prop_map(Entry::Scalar);
    // Groups are never empty: "()" reads back as a group holding one empty field.
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(|entries| Entry::Group(Node::from(entries)))
    })
}

fn node() -> impl Strategy<Value = Node> {
    prop::collection::vec(entry(), 1..6)
        .prop_map(Node::from)
        // A root holding a single empty field prints as "", which is the empty root.
        .prop_filter("single empty field", |node| {
            !(node.len() == 1 && node.get_str(0) == Some(""))
        })
}

fn entry_with_nulls() -> impl Strategy<Value = Entry> {
    let leaf = prop_oneof![
        3 => scalar().prop_map(Entry::Scalar),
        1 => Just(Entry::Null),
    ];
    // Empty groups allowed here, as `set_value` padding and `Node::new` produce them.
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(|entries| Entry::Group(Node::from(entries)))
    })
}

fn structured_scalar() -> impl Strategy<Value = String> {
    "[a-z ;,\\\\\\n]{0,6}"
}

fn structured_node() -> impl Strategy<Value = Node> {
    let field = prop_oneof![
        structured_scalar().prop_map(Entry::Scalar),
        // A single member would read back as a plain field.
        prop::collection::vec(structured_scalar(), 2..4).prop_map(Entry::from),
    ];
    // A single top-level field would read back as plain text.
    prop::collection::vec(field, 2..5).prop_map(Node::from)
}

proptest! {
    #[test]
    fn prop_round_trip(node in node()) {
        let text = to_string(&node);
        let parsed = from_str(&text);
        prop_assert_eq!(parsed, Ok(node), "canonical text was {:?}", text);
    }

    #[test]
    fn prop_canonical_is_fixed_point(input in "[a-c,\"()]{0,12}") {
        if let Ok(node) = from_str(&input) {
            let once = to_string(&node);
            let twice = to_string(&from_str(&once).unwrap());
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn prop_scalar_escaping(s in scalar()) {
        let node = Node::from_iter([s.as_str(), "tail"]);
        let parsed = from_str(&to_string(&node)).unwrap();
        prop_assert_eq!(parsed.get_str(0), Some(s.as_str()));
    }

    #[test]
    fn prop_formatted_has_no_stray_separators(
        fields in prop::collection::vec("[a-z]{0,3}", 0..8)
    ) {
        let node: Node = fields.iter().map(String::as_str).collect();
        let formatted = to_formatted_string(&node, &FormatOptions::default());
        prop_assert!(!formatted.starts_with(' '));
        prop_assert!(!formatted.ends_with(' '));
        prop_assert!(!formatted.contains("  "));
    }

    #[test]
    fn prop_include_empty_keeps_slots(
        fields in prop::collection::vec("[a-z]{0,3}", 1..8)
    ) {
        let node: Node = fields.iter().map(String::as_str).collect();
        let options = FormatOptions::new().with_separator("|").with_include_empty(true);
        let formatted = to_formatted_string(&node, &options);
        prop_assert_eq!(formatted.matches('|').count(), fields.len() - 1);
    }

    #[test]
    fn prop_canonical_stable_with_nulls(
        entries in prop::collection::vec(entry_with_nulls(), 0..6)
    ) {
        let node = Node::from(entries);
        let text = to_string(&node);
        let reparsed = from_str(&text);
        prop_assert!(reparsed.is_ok(), "canonical text {:?} did not parse", text);
        prop_assert_eq!(to_string(&reparsed.unwrap()), text);
    }

    #[test]
    fn prop_structured_round_trip(node in structured_node()) {
        let grammar = Grammar::structured();
        let value = PropertyValue::Compound(node);
        let encoded = encode_compound_value(&value, &grammar);
        let decoded = decode_compound_value(&encoded, &grammar);
        prop_assert_eq!(decoded, Ok(value), "encoded text was {:?}", encoded);
    }

    #[test]
    fn prop_structured_text_round_trip(text in structured_scalar()) {
        let grammar = Grammar::structured();
        let value = PropertyValue::Text(text);
        let encoded = encode_compound_value(&value, &grammar);
        prop_assert_eq!(decode_compound_value(&encoded, &grammar), Ok(value));
    }
}
