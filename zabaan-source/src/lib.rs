//! Source text representation and diagnostic accumulation.

use std::{cell::RefCell, fmt};

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
    /// Accumulated diagnostics.
    pub errors: Diagnostics,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in content.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            content,
            line_starts,
            errors: Diagnostics::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated diagnostics. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }

    /// Maps a byte offset into 1-based `(line, column)` coordinates.
    /// Offsets past the end of the content map to the end of the last line.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        (line + 1, offset - self.line_starts[line] + 1)
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// A recorded, non-fatal description of a detected problem.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An ordinary semantic error. Analysis continues past these.
    Error(String),
    /// A structural failure that terminated analysis early.
    Exception(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Error(message) => write!(f, "ERROR: {}", message),
            Diagnostic::Exception(message) => write!(f, "EXCEPTION: {}", message),
        }
    }
}

/// Manages all the diagnostics for one analysis run, in detection order.
pub struct Diagnostics {
    entries: RefCell<Vec<Diagnostic>>,
}

impl Diagnostics {
    /// Create an empty `Diagnostics`.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Records an error diagnostic.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, message: impl ToString) {
        self.entries
            .borrow_mut()
            .push(Diagnostic::Error(message.to_string()));
    }

    /// Records an exception diagnostic.
    pub fn add_exception(&self, message: impl ToString) {
        self.entries
            .borrow_mut()
            .push(Diagnostic::Exception(message.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Renders every diagnostic as its own line, in detection order.
    pub fn to_strings(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| entry.to_string())
            .collect()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.borrow();
        for entry in entries.iter() {
            writeln!(f, "{}", entry)?;
        }

        Ok(())
    }
}
