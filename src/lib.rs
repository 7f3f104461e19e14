//! linebuf - line/column addressed byte buffer
//!
//! This crate provides a byte buffer addressed by 1-indexed (line, column)
//! coordinates, layered over a splice-friendly store (a byte gap buffer by
//! default, a rope on request) with an incrementally repaired cache of line
//! start offsets. Content is never interpreted: any byte sequence is a valid
//! document.

pub mod buffer;
pub mod cli;
pub mod config;
pub mod config_paths;
mod extract;
mod line_cache;
pub mod outcome;
pub mod script;
pub mod store;
pub mod tracing;

// Re-export commonly used types
pub use buffer::LineIndexedBuffer;
pub use config::{BufferConfig, CacheStrategy};
pub use outcome::{BufferError, EditOutcome, IgnoreReason};
pub use store::{ByteStore, GapStore, RopeStore, StoreError, VecStore};
