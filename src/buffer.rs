//! Line/column addressed editing over a byte store.
//!
//! [`LineIndexedBuffer`] owns a [`ByteStore`] plus a cache of line start
//! offsets. Every public operation leaves the cache consistent with the
//! store. Coordinates are 1-indexed for both line and column; byte offsets
//! never leave this module.
//!
//! The buffer is single-owner: mutation and reads go through `&mut self` /
//! `&self`, so sharing across threads needs external synchronization.

use std::fmt;

use crate::config::{BufferConfig, CacheStrategy};
use crate::extract::copy_range;
use crate::line_cache::LineCache;
use crate::outcome::{BufferError, EditOutcome, IgnoreReason};
use crate::store::{ByteStore, GapStore};

/// Editable text addressed by (line, column), backed by a byte store.
#[derive(Debug, Clone)]
pub struct LineIndexedBuffer<S: ByteStore = GapStore> {
    store: S,
    lines: LineCache,
    /// Staging area for `get_line`; overwritten by the next call
    scratch: Vec<u8>,
    strategy: CacheStrategy,
}

impl LineIndexedBuffer<GapStore> {
    /// Empty gap-buffer-backed buffer with default configuration
    pub fn new() -> Self {
        Self::with_config(&BufferConfig::default())
    }
}

impl<S: ByteStore> Default for LineIndexedBuffer<S> {
    fn default() -> Self {
        Self::with_config(&BufferConfig::default())
    }
}

impl<S: ByteStore> LineIndexedBuffer<S> {
    /// Empty buffer: one empty line
    pub fn with_config(config: &BufferConfig) -> Self {
        Self {
            store: S::default(),
            lines: LineCache::new(),
            scratch: Vec::with_capacity(config.scratch_capacity),
            strategy: config.cache_strategy,
        }
    }

    /// Adopt an already populated store, indexing its content
    pub fn with_store(store: S, config: &BufferConfig) -> Self {
        let mut buffer = Self::with_config(config);
        buffer.store = store;
        buffer.lines.rebuild(buffer.store.chunks());
        buffer
    }

    pub fn strategy(&self) -> CacheStrategy {
        self.strategy
    }

    /// Read-only access to the backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace all content with `text` and rebuild the line cache.
    ///
    /// On error the previous content is kept.
    pub fn set_text(&mut self, text: &[u8]) -> Result<(), BufferError> {
        let mut store = self.store.empty_like();
        if !text.is_empty() {
            store.insert_at(0, text)?;
        }
        self.store = store;
        self.lines.rebuild(self.store.chunks());
        tracing::debug!(
            "set_text: {} bytes, {} lines",
            self.store.total_size(),
            self.line_count()
        );
        Ok(())
    }

    /// Insert `text` at (`line`, `col`).
    ///
    /// Columns past the end of the line are clamped to the end of the line.
    /// A line outside `1..=line_count()` or empty `text` leaves the buffer
    /// untouched.
    pub fn insert(
        &mut self,
        line: usize,
        col: usize,
        text: &[u8],
    ) -> Result<EditOutcome, BufferError> {
        if text.is_empty() {
            return Ok(EditOutcome::Ignored(IgnoreReason::EmptyText));
        }
        let Some(offset) = self.position_to_offset(line, col) else {
            tracing::debug!("insert at {}:{} ignored: line out of range", line, col);
            return Ok(EditOutcome::Ignored(IgnoreReason::LineOutOfRange { line }));
        };

        self.store.insert_at(offset, text)?;
        match self.strategy {
            CacheStrategy::Rescan => self.lines.rebuild_from(line, self.store.chunks()),
            CacheStrategy::Shift => self.lines.shift_after_insert(line, offset, text),
        }
        tracing::trace!(
            line,
            col,
            offset,
            len = text.len(),
            lines = self.line_count(),
            "insert"
        );
        Ok(EditOutcome::Applied)
    }

    /// Remove the bytes from (`line1`, `col1`) up to, not including,
    /// (`line2`, `col2`).
    ///
    /// Out-of-range lines, empty ranges and inverted ranges leave the buffer
    /// untouched.
    pub fn remove(
        &mut self,
        line1: usize,
        col1: usize,
        line2: usize,
        col2: usize,
    ) -> Result<EditOutcome, BufferError> {
        let range = match self.offset_range(line1, col1, line2, col2) {
            Ok(range) => range,
            Err(reason) => {
                tracing::debug!(
                    "remove {}:{}..{}:{} ignored: {}",
                    line1,
                    col1,
                    line2,
                    col2,
                    reason
                );
                return Ok(EditOutcome::Ignored(reason));
            }
        };

        self.store.delete_range(range.start, range.end - range.start)?;
        match self.strategy {
            CacheStrategy::Rescan => self.lines.rebuild_from(line1, self.store.chunks()),
            CacheStrategy::Shift => self.lines.shift_after_remove(line1, range.clone()),
        }
        tracing::trace!(
            line1,
            col1,
            line2,
            col2,
            len = range.end - range.start,
            lines = self.line_count(),
            "remove"
        );
        Ok(EditOutcome::Applied)
    }

    /// Drop all content, leaving one empty line
    pub fn clear(&mut self) {
        self.store = self.store.empty_like();
        self.lines.reset();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Content of `line`, without its separator.
    ///
    /// Out-of-range lines read as empty. The slice borrows the buffer's
    /// scratch space, so it must be copied out before the next call.
    pub fn get_line(&mut self, line: usize) -> &[u8] {
        self.scratch.clear();
        let Some(span) = self.lines.line_span(line, self.store.total_size()) else {
            return &[];
        };
        copy_range(&self.store, span.start, span.end, &mut self.scratch);
        &self.scratch
    }

    /// Copy of the bytes from (`line1`, `col1`) up to (`line2`, `col2`).
    ///
    /// Invalid lines and inverted ranges read as empty.
    pub fn get_text(&self, line1: usize, col1: usize, line2: usize, col2: usize) -> Vec<u8> {
        let Ok(range) = self.offset_range(line1, col1, line2, col2) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(range.end - range.start);
        copy_range(&self.store, range.start, range.end, &mut out);
        out
    }

    /// Byte length of `line`, excluding its separator
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.lines
            .line_span(line, self.store.total_size())
            .map(|span| span.len())
    }

    /// Number of addressable lines (always >= 1).
    ///
    /// A trailing separator does not start a new line: `"a\nb\n"` has 2.
    pub fn line_count(&self) -> usize {
        self.lines.line_count(self.store.total_size())
    }

    /// Total content length in bytes
    pub fn byte_size(&self) -> usize {
        self.store.total_size()
    }

    pub fn is_empty(&self) -> bool {
        self.byte_size() == 0
    }

    /// The whole document, including any trailing separator
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_size());
        copy_range(&self.store, 0, self.byte_size(), &mut out);
        out
    }

    // =========================================================================
    // Coordinate translation
    // =========================================================================

    /// Convert (`line`, `col`) to a byte offset.
    ///
    /// `None` if the line is not addressable. The column is clamped into
    /// `1..=line_len + 1`, the last value being the caret after the line's
    /// final byte.
    fn position_to_offset(&self, line: usize, col: usize) -> Option<usize> {
        let span = self.lines.line_span(line, self.store.total_size())?;
        let col = col.clamp(1, span.len() + 1);
        Some(span.start + col - 1)
    }

    fn offset_range(
        &self,
        line1: usize,
        col1: usize,
        line2: usize,
        col2: usize,
    ) -> Result<std::ops::Range<usize>, IgnoreReason> {
        let start = self
            .position_to_offset(line1, col1)
            .ok_or(IgnoreReason::LineOutOfRange { line: line1 })?;
        let end = self
            .position_to_offset(line2, col2)
            .ok_or(IgnoreReason::LineOutOfRange { line: line2 })?;
        if start >= end {
            return Err(IgnoreReason::EmptyRange {
                start_line: line1,
                end_line: line2,
            });
        }
        Ok(start..end)
    }
}

impl<S: ByteStore> fmt::Display for LineIndexedBuffer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Buffer ({} lines, {} bytes)",
            self.line_count(),
            self.byte_size()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{RopeStore, StoreError, VecStore};

    fn config(strategy: CacheStrategy) -> BufferConfig {
        BufferConfig {
            cache_strategy: strategy,
            ..BufferConfig::default()
        }
    }

    /// The incrementally repaired cache must equal a full rebuild
    fn assert_cache_converged<S: ByteStore>(buf: &LineIndexedBuffer<S>) {
        let mut rebuilt = LineCache::new();
        rebuilt.rebuild(buf.store.chunks());
        assert_eq!(
            buf.lines.starts(),
            rebuilt.starts(),
            "cache diverged for {:?}",
            String::from_utf8_lossy(&buf.to_bytes())
        );
    }

    fn each_buffer(text: &[u8], mut check: impl FnMut(&mut LineIndexedBuffer<VecStore>)) {
        for strategy in [CacheStrategy::Rescan, CacheStrategy::Shift] {
            for run_len in [1, 2, 3, 7, usize::MAX] {
                let store = VecStore::with_run_len(run_len);
                let mut buf = LineIndexedBuffer::with_store(store, &config(strategy));
                buf.set_text(text).unwrap();
                check(&mut buf);
            }
        }
    }

    #[test]
    fn test_new_buffer_has_one_empty_line() {
        let mut buf = LineIndexedBuffer::new();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.byte_size(), 0);
        assert_eq!(buf.get_line(1), b"");
        assert_eq!(buf.lines.starts(), &[0]);
    }

    #[test]
    fn test_set_text_keeps_store_settings() {
        let mut buf: LineIndexedBuffer<VecStore> =
            LineIndexedBuffer::with_store(VecStore::with_run_len(2), &BufferConfig::default());
        buf.set_text(b"abcdef").unwrap();
        assert_eq!(buf.store().run_len(), 2);
        buf.clear();
        assert_eq!(buf.store().run_len(), 2);
    }

    #[test]
    fn test_set_text_twice_gives_same_cache() {
        let mut buf = LineIndexedBuffer::new();
        buf.set_text(b"a\nbb\n\nccc").unwrap();
        let first = buf.lines.clone();
        buf.set_text(b"a\nbb\n\nccc").unwrap();
        assert_eq!(buf.lines, first);
    }

    #[test]
    fn test_position_to_offset_clamps_column() {
        let mut buf = LineIndexedBuffer::new();
        buf.set_text(b"abc\nde").unwrap();
        assert_eq!(buf.position_to_offset(1, 0), Some(0));
        assert_eq!(buf.position_to_offset(1, 1), Some(0));
        assert_eq!(buf.position_to_offset(1, 4), Some(3));
        assert_eq!(buf.position_to_offset(1, 10_000), Some(3));
        assert_eq!(buf.position_to_offset(2, 2), Some(5));
        assert_eq!(buf.position_to_offset(0, 1), None);
        assert_eq!(buf.position_to_offset(3, 1), None);
    }

    #[test]
    fn test_insert_converges_at_every_position() {
        let text = b"ab\n\ncd\nef\n";
        let inserts: [&[u8]; 5] = [b"X", b"\n", b"1\n2", b"\n\n", b"tail\n"];
        for insert in inserts {
            each_buffer(text, |buf| {
                let original = buf.clone();
                for line in 1..=original.line_count() {
                    for col in 1..=original.line_len(line).unwrap() + 2 {
                        let mut edited = original.clone();
                        let outcome = edited.insert(line, col, insert).unwrap();
                        assert!(outcome.is_applied());
                        assert_cache_converged(&edited);
                    }
                }
            });
        }
    }

    #[test]
    fn test_remove_converges_for_every_range() {
        each_buffer(b"ab\n\ncd\nef\n", |buf| {
            let lines = buf.line_count();
            for line1 in 1..=lines {
                for col1 in 1..=buf.line_len(line1).unwrap() + 1 {
                    for line2 in line1..=lines {
                        for col2 in 1..=buf.line_len(line2).unwrap() + 1 {
                            let mut edited = buf.clone();
                            let _ = edited.remove(line1, col1, line2, col2).unwrap();
                            assert_cache_converged(&edited);
                        }
                    }
                }
            }
        });
    }

    #[test]
    fn test_edit_sequence_converges() {
        each_buffer(b"", |buf| {
            let _ = buf.insert(1, 1, b"fn main() {\n}\n").unwrap();
            let _ = buf.insert(2, 1, b"    println!(\"hi\");\n").unwrap();
            let _ = buf.insert(1, 100, b" // entry").unwrap();
            assert_cache_converged(buf);
            let _ = buf.remove(1, 11, 2, 1).unwrap();
            assert_cache_converged(buf);
            let _ = buf.remove(1, 1, 2, 1).unwrap();
            assert_cache_converged(buf);
            assert_eq!(buf.to_bytes(), b"}\n");
            assert_eq!(buf.line_count(), 1);
        });
    }

    #[test]
    fn test_ignored_edits_leave_cache_alone() {
        each_buffer(b"ab\ncd", |buf| {
            let before = buf.lines.clone();
            assert!(buf.insert(3, 1, b"x").unwrap().is_ignored());
            assert!(buf.insert(1, 1, b"").unwrap().is_ignored());
            assert!(buf.remove(2, 1, 1, 1).unwrap().is_ignored());
            assert!(buf.remove(1, 2, 1, 2).unwrap().is_ignored());
            assert_eq!(buf.lines, before);
            assert_eq!(buf.to_bytes(), b"ab\ncd");
        });
    }

    #[test]
    fn test_default_store_edits_inside_multibyte_sequence() {
        let mut buf = LineIndexedBuffer::new();
        buf.set_text("héllo\nworld".as_bytes()).unwrap();
        // Column 3 is byte 2, the middle of 'é'
        assert_eq!(buf.get_text(1, 1, 1, 3), b"h\xc3");
        assert!(buf.insert(1, 3, b"X").unwrap().is_applied());
        assert_eq!(buf.get_line(1), b"h\xc3X\xa9llo");
        assert!(buf.remove(1, 1, 1, 3).unwrap().is_applied());
        assert_eq!(buf.get_line(1), b"X\xa9llo");
        assert_cache_converged(&buf);
    }

    #[test]
    fn test_default_store_accepts_non_utf8() {
        let mut buf = LineIndexedBuffer::new();
        buf.set_text(&[b'a', 0xff, b'\n', b'b']).unwrap();
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.get_line(1), &[b'a', 0xff]);
        assert_eq!(buf.get_text(1, 1, 2, 2), &[b'a', 0xff, b'\n', b'b']);
    }

    #[test]
    fn test_rope_store_error_leaves_buffer_unchanged() {
        let mut buf = LineIndexedBuffer::with_store(RopeStore::new(), &BufferConfig::default());
        buf.set_text("héllo\nworld".as_bytes()).unwrap();
        // Column 3 lands inside 'é'
        let err = buf.insert(1, 3, b"X").unwrap_err();
        assert_eq!(err, BufferError::Store(StoreError::NotCharBoundary { offset: 2 }));
        assert!(buf.set_text(&[0xff]).is_err());
        assert_eq!(buf.to_bytes(), "héllo\nworld".as_bytes());
        assert_cache_converged(&buf);
    }

    #[test]
    fn test_display_summary() {
        let mut buf = LineIndexedBuffer::new();
        buf.set_text(b"one\ntwo\n").unwrap();
        assert_eq!(buf.to_string(), "Buffer (2 lines, 8 bytes)");
    }
}
