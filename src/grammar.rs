//! Compound value grammar.
//!
//! This module defines the delimiter set shared by the parser and the
//! canonical serializer, and the [`Grammar`] configuration used by the
//! multi-delimiter structured decoder.
//!
//! # Compound Values
//!
//! A compound value is a single line of text following an RFC 4180 style
//! grammar extended with parenthesized groups:
//!
//! ```text
//! value   = field *( "," field )
//! field   = plain / quoted / group
//! plain   = *( any char except , " ( ) CR LF )
//! quoted  = DQUOTE *( any char except DQUOTE / 2DQUOTE ) DQUOTE
//! group   = "(" value ")"
//! ```
//!
//! | Delimiter | Character | Meaning |
//! |-----------|-----------|---------|
//! | Separator | `,` | Ends a field |
//! | Quote | `"` | Encloses a field containing delimiters; `""` is a literal quote |
//! | Group open | `(` | Starts a nested list |
//! | Group close | `)` | Ends a nested list; must be followed by `,` or end of input |
//!
//! **Rules**:
//! - A quote or group open is only legal at the very start of a field
//! - Raw CR and LF are only legal inside a quoted field
//! - A field is either quoted or a group, never both
//!
//! **Examples**:
//! ```text
//! 1,2,(3,4),5       # [ "1", "2", ["3", "4"], "5" ]
//! "a,b",c           # [ "a,b", "c" ]
//! "say ""hi"""      # [ "say \"hi\"" ]
//! a,,b              # [ "a", "", "b" ]
//! ```
//!
//! # Structured Values
//!
//! Property grammars layered on top (for example vCard's `N` or `ADR`
//! properties) use a flat syntax where each delimiter marks one nesting
//! depth and a single escape character protects literal delimiters:
//!
//! ```text
//! Doe;John,Johnny;;Dr.     # [ "Doe", ["John", "Johnny"], "", "Dr." ]
//! Main St\; Apt 4          # "Main St; Apt 4"
//! ```
//!
//! The structured decoder is lenient: an escape followed by a
//! character it does not know is copied through unchanged. See
//! [`crate::structured`].

use indexmap::IndexMap;

/// Separates fields.
pub const SEPARATOR: char = ',';

/// Encloses fields containing delimiters.
pub const QUOTE: char = '"';

/// Opens a nested group.
pub const GROUP_OPEN: char = '(';

/// Closes a nested group.
pub const GROUP_CLOSE: char = ')';

/// Every character that is significant to the parser, including the
/// control characters that may only appear inside quotes.
pub const DELIMITERS: [char; 6] = [SEPARATOR, QUOTE, GROUP_OPEN, GROUP_CLOSE, '\r', '\n'];

/// Returns `true` if `ch` is significant to the compound value grammar.
///
/// # Examples
///
/// ```rust
/// use compound_value::grammar::is_delimiter;
///
/// assert!(is_delimiter(','));
/// assert!(is_delimiter('\n'));
/// assert!(!is_delimiter(';'));
/// ```
#[inline]
#[must_use]
pub const fn is_delimiter(ch: char) -> bool {
    matches!(ch, SEPARATOR | QUOTE | GROUP_OPEN | GROUP_CLOSE | '\r' | '\n')
}

/// Returns `true` if a scalar must be enquoted to survive a round trip.
///
/// # Examples
///
/// ```rust
/// use compound_value::grammar::needs_quotes;
///
/// assert!(needs_quotes("a,b"));
/// assert!(needs_quotes("(x)"));
/// assert!(!needs_quotes("plain text"));
/// assert!(!needs_quotes(""));
/// ```
#[inline]
#[must_use]
pub fn needs_quotes(s: &str) -> bool {
    s.contains(is_delimiter)
}

/// Finds the next delimiter at or after byte offset `from`.
#[inline]
pub(crate) fn find_delimiter(input: &str, from: usize) -> Option<(usize, char)> {
    input[from..]
        .char_indices()
        .find(|&(_, ch)| is_delimiter(ch))
        .map(|(offset, ch)| (from + offset, ch))
}

/// Delimiter configuration for the structured decoder.
///
/// `delimiters` are listed in order of increasing nesting depth: the first
/// separates top-level fields, the second separates members within a field,
/// and so on. `replacements` maps an escaped character to the literal text it
/// stands for (for example `n` to a newline).
///
/// # Examples
///
/// ```rust
/// use compound_value::Grammar;
///
/// let grammar = Grammar::new('\\', [';', ','])
///     .with_replacement('n', "\n")
///     .with_replacement('N', "\n");
///
/// assert_eq!(grammar.depth_of(';'), Some(1));
/// assert_eq!(grammar.depth_of(','), Some(2));
/// assert_eq!(grammar.depth_of(':'), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grammar {
    pub escape: char,
    pub delimiters: Vec<char>,
    pub replacements: IndexMap<char, String>,
}

impl Grammar {
    /// Creates a grammar with the given escape character and depth-ordered
    /// delimiters, without replacements.
    #[must_use]
    pub fn new(escape: char, delimiters: impl IntoIterator<Item = char>) -> Self {
        Grammar {
            escape,
            delimiters: delimiters.into_iter().collect(),
            replacements: IndexMap::new(),
        }
    }

    /// Creates a grammar from a flat character list whose first element is
    /// the escape character and whose remaining elements are the delimiters.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidGrammar`] if fewer than two characters
    /// are given or a character is listed twice.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compound_value::Grammar;
    ///
    /// let grammar = Grammar::from_chars(&['\\', ';', ',']).unwrap();
    /// assert_eq!(grammar.escape, '\\');
    /// assert_eq!(grammar.delimiters, vec![';', ',']);
    ///
    /// assert!(Grammar::from_chars(&['\\']).is_err());
    /// ```
    pub fn from_chars(chars: &[char]) -> crate::Result<Self> {
        match chars.split_first() {
            Some((&escape, delimiters)) if !delimiters.is_empty() => {
                let grammar = Grammar::new(escape, delimiters.iter().copied());
                grammar.validate()?;
                Ok(grammar)
            }
            _ => Err(crate::Error::invalid_grammar(
                "expected an escape character followed by at least one delimiter",
            )),
        }
    }

    /// The grammar used by vCard-style structured properties: `;` separates
    /// fields, `,` separates members, `\` escapes and `\n`/`\N` stand for a
    /// line break.
    #[must_use]
    pub fn structured() -> Self {
        Grammar::new('\\', [';', ','])
            .with_replacement('n', "\n")
            .with_replacement('N', "\n")
    }

    /// Adds a replacement for `escape` followed by `key`.
    #[must_use]
    pub fn with_replacement(mut self, key: char, text: impl Into<String>) -> Self {
        self.replacements.insert(key, text.into());
        self
    }

    /// Returns the nesting depth (starting at 1) a delimiter stands for.
    #[inline]
    #[must_use]
    pub fn depth_of(&self, ch: char) -> Option<usize> {
        self.delimiters
            .iter()
            .position(|&d| d == ch)
            .map(|index| index + 1)
    }

    /// Returns the deepest nesting level this grammar can express.
    #[inline]
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.delimiters.len()
    }

    /// Checks that the grammar can be used for decoding.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidGrammar`] when there are no delimiters
    /// or a character is used for two roles.
    pub fn validate(&self) -> crate::Result<()> {
        if self.delimiters.is_empty() {
            return Err(crate::Error::invalid_grammar("no delimiters configured"));
        }
        for (i, &d) in self.delimiters.iter().enumerate() {
            if d == self.escape || self.delimiters[..i].contains(&d) {
                return Err(crate::Error::invalid_grammar(format!(
                    "character {d:?} is used more than once"
                )));
            }
        }
        Ok(())
    }
}
