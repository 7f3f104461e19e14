//! Results of buffer mutations.
//!
//! Bad coordinates are not errors: edits aimed at lines that no longer exist,
//! or at empty/inverted ranges, are skipped and reported as
//! [`EditOutcome::Ignored`]. Only a store refusing a splice is a
//! [`BufferError`].

use std::fmt;

use crate::store::StoreError;

/// What a mutation did to the buffer.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Content changed and the line cache was repaired
    Applied,
    /// Nothing changed
    Ignored(IgnoreReason),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn is_ignored(&self) -> bool {
        !self.is_applied()
    }
}

/// Why a mutation was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Nothing to insert
    EmptyText,
    /// Line is outside `1..=line_count()`
    LineOutOfRange { line: usize },
    /// Range end does not come after its start
    EmptyRange { start_line: usize, end_line: usize },
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "empty text"),
            Self::LineOutOfRange { line } => write!(f, "line {} out of range", line),
            Self::EmptyRange {
                start_line,
                end_line,
            } => write!(f, "empty range (lines {}..{})", start_line, end_line),
        }
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::Ignored(reason) => write!(f, "ignored: {}", reason),
        }
    }
}

/// Hard failures of a buffer mutation. The buffer is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The store refused the splice
    Store(StoreError),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "store error: {}", e),
        }
    }
}

impl std::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
        }
    }
}

impl From<StoreError> for BufferError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
