//! Copying byte ranges out of a store's run sequence.

use crate::store::ByteStore;

/// Append the bytes in `[start, end)` to `out`, walking the store's runs.
///
/// Runs entirely before `start` are skipped, iteration stops at the first run
/// beginning at or after `end`, and runs straddling either edge contribute only
/// their overlapping part. Returns the number of bytes written.
pub(crate) fn copy_range<S: ByteStore>(
    store: &S,
    start: usize,
    end: usize,
    out: &mut Vec<u8>,
) -> usize {
    if start >= end {
        return 0;
    }

    let before = out.len();
    let mut run_start = 0;
    for run in store.chunks() {
        let run_end = run_start + run.len();
        if run_end <= start {
            run_start = run_end;
            continue;
        }
        if run_start >= end {
            break;
        }

        let from = start.saturating_sub(run_start);
        let to = run.len().min(end - run_start);
        out.extend_from_slice(&run[from..to]);
        run_start = run_end;
    }
    out.len() - before
}
