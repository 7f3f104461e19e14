//! Byte storage backends for the line-indexed buffer.
//!
//! [`ByteStore`] is the whole surface the buffer needs from its storage:
//! splice bytes in at an offset, cut a byte range out, report the size, and
//! hand back the content as an ordered run of contiguous byte slices.
//!
//! Three implementations are provided:
//! - [`GapStore`]: byte gap buffer, the default; accepts arbitrary bytes
//! - [`RopeStore`]: backed by `ropey::Rope`; content must stay valid UTF-8
//! - [`VecStore`]: backed by a plain `Vec<u8>`, for tests and tiny inputs

use ropey::Rope;
use std::fmt;

/// Offset-addressed byte storage with ordered run iteration.
///
/// Run boundaries are an implementation detail of the store. Callers must not
/// assume they line up with lines, words or characters.
pub trait ByteStore: Default {
    /// Splice `bytes` in at `offset` (`0..=total_size()`)
    fn insert_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StoreError>;

    /// Remove `len` bytes starting at `offset`
    fn delete_range(&mut self, offset: usize, len: usize) -> Result<(), StoreError>;

    /// Total content length in bytes
    fn total_size(&self) -> usize;

    /// Content as contiguous byte runs, in document order
    fn chunks(&self) -> impl Iterator<Item = &[u8]>;

    /// A new, empty store with the same settings as this one
    fn empty_like(&self) -> Self {
        Self::default()
    }
}

/// Reasons a store refuses a splice. The store is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Range reaches past the end of the content
    OutOfBounds { offset: usize, len: usize, size: usize },
    /// Offset falls inside a multi-byte UTF-8 sequence
    NotCharBoundary { offset: usize },
    /// Inserted bytes are not valid UTF-8
    InvalidUtf8 { valid_up_to: usize },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { offset, len, size } => write!(
                f,
                "range {}..{} is out of bounds for {} bytes",
                offset,
                offset.saturating_add(*len),
                size
            ),
            Self::NotCharBoundary { offset } => {
                write!(f, "byte offset {} is not on a char boundary", offset)
            }
            Self::InvalidUtf8 { valid_up_to } => {
                write!(f, "invalid UTF-8 after {} bytes", valid_up_to)
            }
        }
    }
}

impl std::error::Error for StoreError {}

fn check_range(offset: usize, len: usize, size: usize) -> Result<usize, StoreError> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(end),
        _ => Err(StoreError::OutOfBounds { offset, len, size }),
    }
}

// =============================================================================
// GapStore - byte gap buffer
// =============================================================================

const INITIAL_GAP: usize = 64;

/// ByteStore implementation using a gap buffer of raw bytes.
///
/// Content is stored as `[before gap | gap | after gap]`. Splices move the
/// gap to the edit offset first, so runs of nearby edits only copy the bytes
/// between them. Any byte sequence is accepted and every offset in
/// `0..=total_size()` is a valid splice point.
#[derive(Debug, Clone, Default)]
pub struct GapStore {
    data: Vec<u8>,
    /// First unused slot
    gap_start: usize,
    /// First used slot after the gap
    gap_end: usize,
}

impl GapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `bytes`, with the gap at the end
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let capacity = bytes.len() + INITIAL_GAP;
        let mut data = Vec::with_capacity(capacity);
        data.extend_from_slice(bytes);
        data.resize(capacity, 0);
        Self {
            data,
            gap_start: bytes.len(),
            gap_end: capacity,
        }
    }

    #[cfg(test)]
    fn gap_position(&self) -> usize {
        self.gap_start
    }

    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Move the gap to logical offset `pos` (`pos <= total_size()`)
    fn move_gap_to(&mut self, pos: usize) {
        if pos < self.gap_start {
            let shift = self.gap_start - pos;
            self.data.copy_within(pos..self.gap_start, self.gap_end - shift);
            self.gap_start = pos;
            self.gap_end -= shift;
        } else if pos > self.gap_start {
            let shift = pos - self.gap_start;
            self.data.copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    /// Grow the gap in place to at least `min_size` bytes
    fn ensure_gap(&mut self, min_size: usize) {
        if self.gap_len() >= min_size {
            return;
        }
        let growth = (min_size - self.gap_len()).max(self.data.len()).max(INITIAL_GAP);
        let old_len = self.data.len();
        let tail = old_len - self.gap_end;
        self.data.resize(old_len + growth, 0);
        let new_gap_end = self.data.len() - tail;
        self.data.copy_within(self.gap_end..old_len, new_gap_end);
        self.gap_end = new_gap_end;
    }
}

impl ByteStore for GapStore {
    fn insert_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StoreError> {
        check_range(offset, 0, self.total_size())?;
        if bytes.is_empty() {
            return Ok(());
        }
        self.move_gap_to(offset);
        self.ensure_gap(bytes.len());
        let end = self.gap_start + bytes.len();
        self.data[self.gap_start..end].copy_from_slice(bytes);
        self.gap_start = end;
        Ok(())
    }

    fn delete_range(&mut self, offset: usize, len: usize) -> Result<(), StoreError> {
        check_range(offset, len, self.total_size())?;
        self.move_gap_to(offset);
        self.gap_end += len;
        Ok(())
    }

    fn total_size(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        [&self.data[..self.gap_start], &self.data[self.gap_end..]]
            .into_iter()
            .filter(|run| !run.is_empty())
    }
}

// =============================================================================
// RopeStore - for multi-line document editing
// =============================================================================

/// ByteStore implementation wrapping ropey::Rope.
///
/// The rope holds UTF-8, so splices must keep it valid: inserted bytes must
/// decode, and every offset must sit on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct RopeStore {
    rope: Rope,
}

impl RopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RopeStore from a string slice
    pub fn from_text(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    /// Access the underlying Rope for rope-specific operations
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Convert a byte offset into a rope char index
    fn char_index(&self, offset: usize) -> Result<usize, StoreError> {
        let size = self.rope.len_bytes();
        if offset > size {
            return Err(StoreError::OutOfBounds {
                offset,
                len: 0,
                size,
            });
        }
        let char_idx = self.rope.byte_to_char(offset);
        if self.rope.char_to_byte(char_idx) != offset {
            return Err(StoreError::NotCharBoundary { offset });
        }
        Ok(char_idx)
    }
}

impl ByteStore for RopeStore {
    fn insert_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StoreError> {
        let text = std::str::from_utf8(bytes).map_err(|e| StoreError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })?;
        let char_idx = self.char_index(offset)?;
        self.rope.insert(char_idx, text);
        Ok(())
    }

    fn delete_range(&mut self, offset: usize, len: usize) -> Result<(), StoreError> {
        let end = check_range(offset, len, self.rope.len_bytes())?;
        let start_char = self.char_index(offset)?;
        let end_char = self.char_index(end)?;
        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
        Ok(())
    }

    fn total_size(&self) -> usize {
        self.rope.len_bytes()
    }

    fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.rope.chunks().map(str::as_bytes)
    }
}

// =============================================================================
// VecStore - flat byte vector with configurable run length
// =============================================================================

/// ByteStore implementation wrapping `Vec<u8>`.
///
/// Accepts arbitrary bytes. `chunks()` yields runs of at most `run_len` bytes,
/// which lets tests place run boundaries anywhere in the document.
#[derive(Debug, Clone)]
pub struct VecStore {
    bytes: Vec<u8>,
    run_len: usize,
}

impl VecStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose runs are at most `run_len` bytes (minimum 1)
    pub fn with_run_len(run_len: usize) -> Self {
        Self {
            bytes: Vec::new(),
            run_len: run_len.max(1),
        }
    }

    pub fn run_len(&self) -> usize {
        self.run_len
    }
}

impl Default for VecStore {
    fn default() -> Self {
        Self {
            bytes: Vec::new(),
            run_len: usize::MAX,
        }
    }
}

impl ByteStore for VecStore {
    fn insert_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StoreError> {
        check_range(offset, 0, self.bytes.len())?;
        self.bytes.splice(offset..offset, bytes.iter().copied());
        Ok(())
    }

    fn delete_range(&mut self, offset: usize, len: usize) -> Result<(), StoreError> {
        let end = check_range(offset, len, self.bytes.len())?;
        self.bytes.drain(offset..end);
        Ok(())
    }

    fn total_size(&self) -> usize {
        self.bytes.len()
    }

    fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks(self.run_len)
    }

    fn empty_like(&self) -> Self {
        Self::with_run_len(self.run_len)
    }
}
