//! Error types for compound value parsing, decoding and transfer codecs.
//!
//! Every error in this crate is a local, synchronous data-validation failure
//! for a single value. Nothing is retried and no partial result is returned:
//! the caller decides whether to skip the offending value or abort.
//!
//! ## Error Categories
//!
//! - **Grammar errors**: stray delimiters, unterminated quotes, unbalanced
//!   groups and raw control characters found by the strict parser
//! - **Structured decoding errors**: depth underflow and invalid delimiter
//!   configurations in the multi-delimiter decoder
//! - **Codec errors**: malformed Base64 payloads and text that cannot be
//!   represented in (or decoded from) the requested charset
//!
//! ## Examples
//!
//! ```rust
//! use compound_value::{from_str, Error};
//!
//! let err = from_str("(1,2").unwrap_err();
//! assert_eq!(err, Error::UnbalancedOpen { depth: 1 });
//! assert!(err.to_string().contains("without closing"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A `"`, `(` or `)` appeared in the middle of a field.
    #[error("unescaped delimiter '{delimiter}' at position {position}: delimiters must start a field or be enquoted")]
    UnescapedDelimiter { delimiter: char, position: usize },

    /// The closing quote of a quoted field was never found.
    #[error("unterminated quoted field starting at position {position}")]
    UnterminatedQuotedField { position: usize },

    /// Content directly follows a `)` that is neither end of input nor `,`.
    #[error("missing separator after group at position {position}")]
    MissingSeparatorAfterGroup { position: usize },

    /// Content directly follows the closing quote of a quoted field.
    #[error("missing separator after enquoted value at position {position}")]
    MissingSeparatorAfterQuotedField { position: usize },

    /// A `)` was found with no open group to close.
    #[error("closing delimiter without opening delimiter at position {position}")]
    UnbalancedClose { position: usize },

    /// Input ended while `depth` groups were still open.
    #[error("opening delimiter without closing delimiter ({depth} group(s) left open)")]
    UnbalancedOpen { depth: usize },

    /// Raw CR or LF outside a quoted field.
    #[error("illegal unescaped control character at position {position}")]
    IllegalControlCharacter { position: usize },

    /// The structured decoder tried to leave the root level.
    #[error("delimiter stack underflow at position {position}")]
    StackUnderflow { position: usize },

    /// A structured grammar cannot be used for decoding.
    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    /// A Base64 payload could not be decoded.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),

    /// Text could not be converted to or from the given charset.
    #[error("{charset} conversion failed: {msg}")]
    Charset { charset: &'static str, msg: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a charset conversion error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compound_value::Error;
    ///
    /// let err = Error::charset("US-ASCII", "character 'é' is not representable");
    /// assert!(err.to_string().starts_with("US-ASCII conversion failed"));
    /// ```
    pub fn charset(charset: &'static str, msg: impl Into<String>) -> Self {
        Error::Charset {
            charset,
            msg: msg.into(),
        }
    }

    /// Creates an invalid grammar error.
    pub fn invalid_grammar(msg: impl Into<String>) -> Self {
        Error::InvalidGrammar(msg.into())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compound_value::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the byte offset in the input at which the error was detected,
    /// for errors that have one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compound_value::from_str;
    ///
    /// let err = from_str("a\"b").unwrap_err();
    /// assert_eq!(err.position(), Some(1));
    /// ```
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::UnescapedDelimiter { position, .. }
            | Error::UnterminatedQuotedField { position }
            | Error::MissingSeparatorAfterGroup { position }
            | Error::MissingSeparatorAfterQuotedField { position }
            | Error::UnbalancedClose { position }
            | Error::IllegalControlCharacter { position }
            | Error::StackUnderflow { position } => Some(*position),
            _ => None,
        }
    }

    /// Returns `true` if this error came from the strict grammar parser.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::UnescapedDelimiter { .. }
                | Error::UnterminatedQuotedField { .. }
                | Error::MissingSeparatorAfterGroup { .. }
                | Error::MissingSeparatorAfterQuotedField { .. }
                | Error::UnbalancedClose { .. }
                | Error::UnbalancedOpen { .. }
                | Error::IllegalControlCharacter { .. }
        )
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::InvalidBase64(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
