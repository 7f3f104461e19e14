//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use linebuf::{
    BufferConfig, ByteStore, CacheStrategy, LineIndexedBuffer, RopeStore, VecStore,
};

/// Both cache repair strategies, for tests that must hold under either
pub const STRATEGIES: [CacheStrategy; 2] = [CacheStrategy::Rescan, CacheStrategy::Shift];

/// Create a default (gap-buffer-backed) buffer holding `text`
pub fn test_buffer(text: &str) -> LineIndexedBuffer {
    let mut buffer = LineIndexedBuffer::new();
    buffer.set_text(text.as_bytes()).unwrap();
    buffer
}

/// Create a default buffer holding `text` using `strategy`
pub fn test_buffer_with(text: &str, strategy: CacheStrategy) -> LineIndexedBuffer {
    let config = BufferConfig {
        cache_strategy: strategy,
        ..BufferConfig::default()
    };
    let mut buffer: LineIndexedBuffer = LineIndexedBuffer::with_config(&config);
    buffer.set_text(text.as_bytes()).unwrap();
    buffer
}

/// Create a rope-backed buffer holding `text`
pub fn rope_buffer(text: &str) -> LineIndexedBuffer<RopeStore> {
    LineIndexedBuffer::with_store(RopeStore::from_text(text), &BufferConfig::default())
}

/// Create a Vec-backed buffer whose store yields runs of `run_len` bytes
pub fn chunked_buffer(
    text: &[u8],
    run_len: usize,
    strategy: CacheStrategy,
) -> LineIndexedBuffer<VecStore> {
    let config = BufferConfig {
        cache_strategy: strategy,
        ..BufferConfig::default()
    };
    let mut buffer = LineIndexedBuffer::with_store(VecStore::with_run_len(run_len), &config);
    buffer.set_text(text).unwrap();
    buffer
}

/// Document content as a String
pub fn buffer_to_string<S: ByteStore>(buffer: &LineIndexedBuffer<S>) -> String {
    String::from_utf8(buffer.to_bytes()).unwrap()
}

/// Line `n` as a String (empty if out of range)
pub fn line_string<S: ByteStore>(buffer: &mut LineIndexedBuffer<S>, n: usize) -> String {
    String::from_utf8_lossy(buffer.get_line(n)).into_owned()
}

/// Every addressable line, in order
pub fn all_lines<S: ByteStore>(buffer: &mut LineIndexedBuffer<S>) -> Vec<Vec<u8>> {
    (1..=buffer.line_count())
        .map(|n| buffer.get_line(n).to_vec())
        .collect()
}

/// Expected lines for `text`, computed independently of the buffer
pub fn expected_lines(text: &[u8]) -> Vec<Vec<u8>> {
    let mut lines: Vec<Vec<u8>> = text.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect();
    if lines.len() > 1 && text.ends_with(b"\n") {
        lines.pop();
    }
    lines
}

/// Assert the buffer reads back exactly as a fresh buffer built from its content
pub fn assert_matches_fresh<S: ByteStore>(buffer: &mut LineIndexedBuffer<S>) {
    let content = buffer.to_bytes();
    assert_eq!(buffer.byte_size(), content.len());
    assert_eq!(
        all_lines(buffer),
        expected_lines(&content),
        "lines diverged for {:?}",
        String::from_utf8_lossy(&content)
    );
}
