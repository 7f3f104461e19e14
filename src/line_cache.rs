//! Line-start cache for the line-indexed buffer.
//!
//! Keeps the byte offset where each line begins. `starts[0] == 0` always, and
//! every further entry is the offset just past a `\n` in the document, in
//! ascending order. Lines are addressed 1-indexed at this module's API.

use memchr::memchr_iter;
use std::ops::Range;

/// Tracks line boundaries as byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineCache {
    starts: Vec<usize>,
}

impl LineCache {
    /// A cache for the empty document: one empty line.
    pub fn new() -> Self {
        Self { starts: vec![0] }
    }

    pub fn reset(&mut self) {
        self.starts.clear();
        self.starts.push(0);
    }

    /// Rebuild from scratch by scanning every run.
    pub fn rebuild<'a>(&mut self, runs: impl Iterator<Item = &'a [u8]>) {
        self.reset();
        scan_line_starts(runs, 0, &mut self.starts);
    }

    /// Drop the starts of lines after `line` and rescan from the start of `line`
    /// to the end of the document.
    pub fn rebuild_from<'a>(&mut self, line: usize, runs: impl Iterator<Item = &'a [u8]>) {
        self.starts.truncate(line.max(1));
        let scan_from = self.starts.last().copied().unwrap_or(0);
        scan_line_starts(runs, scan_from, &mut self.starts);
    }

    /// Account for `inserted` having been spliced in at `offset` on `line`.
    ///
    /// `offset` must lie on `line` at or before its separator.
    pub fn shift_after_insert(&mut self, line: usize, offset: usize, inserted: &[u8]) {
        let line = line.clamp(1, self.starts.len());
        let delta = inserted.len();
        for start in &mut self.starts[line..] {
            *start += delta;
        }
        let new_starts = memchr_iter(b'\n', inserted).map(|i| offset + i + 1);
        self.starts.splice(line..line, new_starts);
    }

    /// Account for `removed` having been cut out, starting on `line`.
    ///
    /// Line starts inside `(removed.start, removed.end]` lost their separator
    /// and are dropped; later starts move back by the removed length.
    pub fn shift_after_remove(&mut self, line: usize, removed: Range<usize>) {
        let line = line.clamp(1, self.starts.len());
        let delta = removed.end - removed.start;
        let first_kept = line + self.starts[line..].partition_point(|&s| s <= removed.end);
        for start in &mut self.starts[first_kept..] {
            *start -= delta;
        }
        self.starts.drain(line..first_kept);
    }

    /// Number of addressable lines in a document of `total_size` bytes.
    ///
    /// A trailing separator does not open a new line.
    pub fn line_count(&self, total_size: usize) -> usize {
        let count = self.starts.len();
        if count > 1 && self.starts[count - 1] == total_size {
            count - 1
        } else {
            count
        }
    }

    /// Byte offset where `line` starts, if it is addressable.
    pub fn line_start(&self, line: usize, total_size: usize) -> Option<usize> {
        if line < 1 || line > self.line_count(total_size) {
            return None;
        }
        Some(self.starts[line - 1])
    }

    /// Byte range of `line`'s content, excluding its own separator.
    pub fn line_span(&self, line: usize, total_size: usize) -> Option<Range<usize>> {
        let start = self.line_start(line, total_size)?;
        // The next start sits one past this line's separator. The last line
        // (including one closed by a trailing separator) is handled the same way,
        // since its closing `\n` still has an entry.
        let end = self
            .starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(total_size);
        Some(start..end)
    }

    #[cfg(test)]
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }
}

impl Default for LineCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Append `offset + 1` for every `\n` at or after `from`.
fn scan_line_starts<'a>(
    runs: impl Iterator<Item = &'a [u8]>,
    from: usize,
    out: &mut Vec<usize>,
) {
    let mut run_start = 0;
    for run in runs {
        let run_end = run_start + run.len();
        if run_end <= from {
            run_start = run_end;
            continue;
        }
        let skip = from.saturating_sub(run_start);
        out.extend(memchr_iter(b'\n', &run[skip..]).map(|i| run_start + skip + i + 1));
        run_start = run_end;
    }
}
