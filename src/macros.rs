/// Builds a [`Node`](crate::Node) from a literal list.
///
/// Strings (or any expression in one token tree that converts into an
/// [`Entry`](crate::Entry)) become scalars, `null` becomes a null entry and
/// `[...]` becomes a nested group.
///
/// ```rust
/// use compound_value::{compound, from_str};
///
/// let node = compound!["1", "2", ["3", "4"], null, "5"];
/// assert_eq!(node.to_string(), "1,2,(3,4),,5");
/// assert_eq!(compound![], from_str("").unwrap());
/// ```
#[macro_export]
macro_rules! compound {
    () => {
        $crate::Node::new()
    };

    ($($elem:tt),+ $(,)?) => {{
        let mut node = $crate::Node::new();
        $(
            node.add($crate::compound_entry!($elem));
        )+
        node
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! compound_entry {
    (null) => {
        $crate::Entry::Null
    };

    ([]) => {
        $crate::Entry::Group($crate::Node::new())
    };

    ([ $($elem:tt),+ $(,)? ]) => {
        $crate::Entry::Group($crate::compound!($($elem),+))
    };

    // Anything else goes through `Entry::from`
    ($other:expr) => {
        $crate::Entry::from($other)
    };
}
