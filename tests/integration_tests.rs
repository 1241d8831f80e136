use compound_value::{
    compound, decode_compound_value, encode_compound_value, from_str, to_formatted_string,
    to_string, Entry, FormatOptions, Grammar, Node, PropertyValue,
};

#[test]
fn test_build_then_parse() {
    let mut node = Node::new();
    node.add("Smith");
    node.add("Jane");
    node.set_value(4, "PhD");
    node.add_value("Dr.", Some(3));
    node.add_value("Prof.", Some(3));

    let text = to_string(&node);
    assert_eq!(text, "Smith,Jane,,(Dr.,Prof.),PhD");

    let parsed = from_str(&text).unwrap();
    assert_eq!(parsed.get_str(0), Some("Smith"));
    assert_eq!(parsed.get_str(2), Some(""));
    assert_eq!(parsed.get_node(3), Some(&Node::from_iter(["Dr.", "Prof."])));
}

#[test]
fn test_from_iterator_construction() {
    let node: Node = vec!["a", "b", "c"].into_iter().collect();
    assert_eq!(node.to_string(), "a,b,c");

    let mut extended = node.clone();
    extended.extend([Entry::from(vec!["d", "e"])]);
    assert_eq!(extended.to_string(), "a,b,c,(d,e)");
}

#[test]
fn test_get_value_out_of_range() {
    let node = from_str("x").unwrap();
    assert_eq!(node.get_value(0), Some(&Entry::from("x")));
    assert_eq!(node.get_value(1), None);
    assert_eq!(node.get_str(5), None);
    assert_eq!(node.get_node(0), None);
}

#[test]
fn test_get_mut_replaces_in_place() {
    let mut node = from_str("a,(b,c)").unwrap();
    if let Some(group) = node.get_mut(1).and_then(Entry::as_node_mut) {
        group.set_value(0, "B");
    }
    assert_eq!(node.to_string(), "a,(B,c)");
}

#[test]
fn test_leaves_of_parsed_value() {
    let node = from_str("1,(2,(3)),\"4,5\"").unwrap();
    assert_eq!(node.leaves().collect::<Vec<_>>(), ["1", "2", "3", "4,5"]);
}

#[test]
fn test_formatted_name() {
    // family, given, additional, prefix, suffix
    let name = from_str("Doe,John,(Quinlan,Q.),Mr.,").unwrap();
    let options = FormatOptions::new().with_indices([3, 1, 2, 0, 4]);
    assert_eq!(
        to_formatted_string(&name, &options),
        "Mr. John Quinlan Q. Doe"
    );

    let display = FormatOptions::display();
    assert_eq!(
        to_formatted_string(&name, &display),
        "Doe; John; (Quinlan; Q.); Mr."
    );
}

#[test]
fn test_serde_json_shape() {
    let node = compound!["a", null, ["b", "c"]];
    let json = serde_json::to_string(&node).unwrap();
    assert_eq!(json, r#"["a",null,["b","c"]]"#);

    let back: Node = serde_json::from_str(&json).unwrap();
    assert_eq!(back, node);
}

#[test]
fn test_serde_json_from_canonical_string() {
    let node: Node = serde_json::from_str(r#""1,(2,3)""#).unwrap();
    assert_eq!(node, compound!["1", ["2", "3"]]);

    let err = serde_json::from_str::<Node>(r#""(1""#).unwrap_err();
    assert!(err.to_string().contains("opening delimiter"));
}

#[test]
fn test_property_value_serde() {
    let text = PropertyValue::Text("plain".into());
    assert_eq!(serde_json::to_string(&text).unwrap(), r#""plain""#);

    let compound: PropertyValue = serde_json::from_str(r#"["a",["b"]]"#).unwrap();
    assert_eq!(compound, PropertyValue::Compound(compound!["a", ["b"]]));
}

#[test]
fn test_structured_to_canonical() {
    let grammar = Grammar::structured();
    let value = decode_compound_value("Doe;John,Johnny;;Dr.\\, Esq.", &grammar).unwrap();
    let node = value.clone().into_node();

    assert_eq!(to_string(&node), "Doe,(John,Johnny),,\"Dr., Esq.\"");
    assert_eq!(encode_compound_value(&value, &grammar), "Doe;John,Johnny;;Dr.\\, Esq.");
}

#[test]
fn test_structured_custom_grammar() {
    let grammar = Grammar::from_chars(&['^', '|', '~'])
        .unwrap()
        .with_replacement('t', "\t");
    let value = grammar.decode("a~b|c^|d|e^tf").unwrap();
    let expected = compound![["a", "b"], "c|d", "e\tf"];
    assert_eq!(value, PropertyValue::Compound(expected));
}

#[test]
fn test_lenient_and_strict_differ() {
    // The structured decoder keeps unknown escapes, the strict parser rejects stray quotes.
    let lenient = decode_compound_value("say \\\"hi\\\"", &Grammar::structured()).unwrap();
    assert_eq!(lenient.as_text(), Some("say \\\"hi\\\""));
    assert!(from_str("say \"hi\"").is_err());
}

#[test]
fn test_independent_values_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let text = format!("{i},({i},\"{i},{i}\")");
                let node = from_str(&text).unwrap();
                to_string(&node) == text
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
