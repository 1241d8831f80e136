//! Configuration options for formatted output.
//!
//! [`FormatOptions`] controls how [`crate::to_formatted_string`] projects a
//! [`crate::Node`] into display text: which top-level fields appear and in
//! which order, the separator placed between them, the wrappers placed
//! around nested groups, and whether empty fields keep their slot.
//!
//! ## Examples
//!
//! ```rust
//! use compound_value::{from_str, FormatOptions};
//!
//! let adr = from_str(",,123 Main St,Springfield,IL,62701,USA").unwrap();
//!
//! // Street, city and postal code only
//! let options = FormatOptions::new()
//!     .with_indices([2, 3, 5])
//!     .with_separator(", ");
//! assert_eq!(adr.to_formatted_string(&options), "123 Main St, Springfield, 62701");
//! ```

/// Options for [`crate::to_formatted_string`].
///
/// # Examples
///
/// ```rust
/// use compound_value::FormatOptions;
///
/// // Defaults: every field, single space, groups flattened, empties dropped
/// let options = FormatOptions::new();
/// assert_eq!(options.separator, " ");
/// assert!(options.indices.is_none());
/// assert!(!options.include_empty);
///
/// // Custom configuration
/// let options = FormatOptions::new()
///     .with_indices([0, 2])
///     .with_separator("; ")
///     .with_wrappers("(", ")")
///     .with_include_empty(true);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FormatOptions {
    pub indices: Option<Vec<usize>>,
    pub separator: String,
    pub open: Option<String>,
    pub close: Option<String>,
    pub include_empty: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            indices: None,
            separator: " ".to_string(),
            open: None,
            close: None,
            include_empty: false,
        }
    }
}

impl FormatOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a readable rendering that keeps nesting visible:
    /// fields separated by `"; "` and groups wrapped in parentheses.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compound_value::{from_str, FormatOptions};
    ///
    /// let node = from_str("a,(b,c)").unwrap();
    /// assert_eq!(node.to_formatted_string(&FormatOptions::display()), "a; (b; c)");
    /// ```
    #[must_use]
    pub fn display() -> Self {
        FormatOptions {
            separator: "; ".to_string(),
            open: Some("(".to_string()),
            close: Some(")".to_string()),
            ..Default::default()
        }
    }

    /// Selects and orders the top-level fields to render.
    ///
    /// Indices past the end of the node are treated as empty fields.
    #[must_use]
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices = Some(indices.into_iter().collect());
        self
    }

    /// Sets the text placed between fields.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the text placed before and after each nested group.
    #[must_use]
    pub fn with_wrappers(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open = Some(open.into());
        self.close = Some(close.into());
        self
    }

    /// Keeps separators and wrappers for empty fields when `true`.
    #[must_use]
    pub fn with_include_empty(mut self, include_empty: bool) -> Self {
        self.include_empty = include_empty;
        self
    }
}
