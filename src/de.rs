//! Compound value parsing.
//!
//! This module provides the [`Parser`] that turns a single line of text into
//! a [`Node`] tree.
//!
//! ## Overview
//!
//! - **Single-pass parsing**: one left-to-right scan with no backtracking
//! - **Strict grammar**: a delimiter in the wrong place is an error, never
//!   silently repaired
//! - **Error reporting**: every error carries the byte offset where it was found
//!
//! ## Usage
//!
//! ```rust
//! use compound_value::{from_str, Entry, Node};
//!
//! let node = from_str("1,2,(3,4),5").unwrap();
//! assert_eq!(node.len(), 4);
//! assert_eq!(node.get_node(2), Some(&Node::from_iter(["3", "4"])));
//! ```

use crate::grammar::{find_delimiter, GROUP_CLOSE, GROUP_OPEN, QUOTE, SEPARATOR};
use crate::{Entry, Error, Node, Result};
use tracing::{debug, trace};

/// Parse a compound value.
///
/// # Errors
///
/// Returns a syntax error (see [`Error::is_syntax`]) if the text does not
/// follow the compound value grammar.
pub fn from_str(input: &str) -> Result<Node> {
    Parser::new(input).parse()
}

/// The compound value parser.
///
/// The parser keeps an explicit stack of the groups that are still open. The
/// top of the stack is the node fields are appended to; closing a group pops
/// it and appends it to the node below, which is its parent.
pub struct Parser<'a> {
    input: &'a str,
    start: usize,
    stack: Vec<Node>,
    // Cleared right after a group closes, so no trailing empty field is added.
    field_pending: bool,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            start: 0,
            stack: vec![Node::new()],
            field_pending: true,
            max_depth: 0,
        }
    }

    /// Consumes the parser and returns the root node.
    ///
    /// # Errors
    ///
    /// See [`from_str`].
    pub fn parse(mut self) -> Result<Node> {
        if self.input.is_empty() {
            return Ok(Node::new());
        }

        while let Some((position, ch)) = find_delimiter(self.input, self.start) {
            match ch {
                SEPARATOR => {
                    self.push_field(position);
                    self.start = position + 1;
                    self.field_pending = true;
                }
                QUOTE => self.parse_quoted(position)?,
                GROUP_OPEN => self.open_group(position)?,
                GROUP_CLOSE => self.close_group(position)?,
                _ => return Err(Error::IllegalControlCharacter { position }),
            }
        }

        if self.field_pending {
            self.push_field(self.input.len());
        }

        if self.stack.len() > 1 {
            return Err(Error::UnbalancedOpen {
                depth: self.stack.len() - 1,
            });
        }

        let root = self.stack.pop().unwrap_or_default();
        debug!(entries = root.len(), depth = self.max_depth, "parsed compound value");
        Ok(root)
    }

    fn current(&mut self) -> &mut Node {
        // The root is never popped, so the stack always has an element.
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn push_field(&mut self, end: usize) {
        let text = self.input[self.start..end].to_string();
        self.current().add(Entry::Scalar(text));
    }

    fn parse_quoted(&mut self, position: usize) -> Result<()> {
        if position != self.start {
            return Err(Error::UnescapedDelimiter {
                delimiter: QUOTE,
                position,
            });
        }

        let bytes = self.input.as_bytes();
        let mut value = String::new();
        let mut segment = position + 1;
        let mut cursor = segment;

        let close = loop {
            match self.input[cursor..].find(QUOTE) {
                None => return Err(Error::UnterminatedQuotedField { position }),
                Some(offset) => {
                    let quote = cursor + offset;
                    if bytes.get(quote + 1) == Some(&b'"') {
                        // Doubled quote: keep one and carry on.
                        value.push_str(&self.input[segment..=quote]);
                        segment = quote + 2;
                        cursor = segment;
                    } else {
                        value.push_str(&self.input[segment..quote]);
                        break quote;
                    }
                }
            }
        };

        let after = close + 1;
        self.current().add(Entry::Scalar(value));
        match bytes.get(after) {
            None => {
                self.start = after;
                self.field_pending = false;
            }
            Some(b',') => {
                self.start = after + 1;
                self.field_pending = true;
            }
            Some(b')') => {
                // The close handler would add the (empty) text before it.
                self.field_pending = false;
                self.finish_group(after)?;
            }
            Some(b'\r' | b'\n') => {
                return Err(Error::IllegalControlCharacter { position: after })
            }
            Some(_) => return Err(Error::MissingSeparatorAfterQuotedField { position: after }),
        }
        Ok(())
    }

    fn open_group(&mut self, position: usize) -> Result<()> {
        if position != self.start {
            return Err(Error::UnescapedDelimiter {
                delimiter: GROUP_OPEN,
                position,
            });
        }
        self.stack.push(Node::new());
        self.max_depth = self.max_depth.max(self.stack.len() - 1);
        trace!(position, depth = self.stack.len() - 1, "open group");
        self.start = position + 1;
        self.field_pending = true;
        Ok(())
    }

    fn close_group(&mut self, position: usize) -> Result<()> {
        if self.stack.len() == 1 {
            return Err(Error::UnbalancedClose { position });
        }
        self.push_field(position);
        self.finish_group(position)
    }

    /// Pops the innermost group (whose last field is already added) and
    /// checks what follows the `)` at `position`. A run of `)` closes one
    /// group per character.
    fn finish_group(&mut self, mut position: usize) -> Result<()> {
        loop {
            if self.stack.len() == 1 {
                return Err(Error::UnbalancedClose { position });
            }
            let group = self.stack.pop().unwrap_or_default();
            trace!(position, entries = group.len(), "close group");
            self.current().add(Entry::Group(group));

            let after = position + 1;
            match self.input.as_bytes().get(after) {
                None => {
                    self.start = after;
                    self.field_pending = false;
                    return Ok(());
                }
                Some(b',') => {
                    self.start = after + 1;
                    self.field_pending = true;
                    return Ok(());
                }
                Some(b')') => position = after,
                Some(b'\r' | b'\n') => {
                    return Err(Error::IllegalControlCharacter { position: after })
                }
                Some(_) => return Err(Error::MissingSeparatorAfterGroup { position: after }),
            }
        }
    }
}
