//! Edit scripts: a serialized list of buffer operations to replay.
//!
//! Scripts are YAML (or JSON, picked by file extension) with one entry per
//! operation, tagged by `op`:
//!
//! ```yaml
//! ops:
//!   - op: set_text
//!     text: "ab\ncd\nef"
//!   - op: insert
//!     line: 2
//!     col: 3
//!     text: "X"
//!   - op: get_line
//!     line: 2
//! ```
//!
//! `text` is either a string or a list of raw byte values, e.g.
//! `text: [97, 255, 10]`, for content that is not UTF-8.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::buffer::LineIndexedBuffer;
use crate::outcome::{BufferError, EditOutcome};
use crate::store::ByteStore;

/// Bytes carried by `set_text` and `insert`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptText {
    Utf8(String),
    Bytes(Vec<u8>),
}

impl ScriptText {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Utf8(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }
}

impl From<&str> for ScriptText {
    fn from(text: &str) -> Self {
        Self::Utf8(text.to_string())
    }
}

impl From<Vec<u8>> for ScriptText {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// One buffer operation, named as callers of the buffer know it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    SetText {
        text: ScriptText,
    },
    Insert {
        line: usize,
        col: usize,
        text: ScriptText,
    },
    Remove {
        line1: usize,
        col1: usize,
        line2: usize,
        col2: usize,
    },
    Clear,
    GetLine {
        line: usize,
    },
    GetText {
        line1: usize,
        col1: usize,
        line2: usize,
        col2: usize,
    },
    LineCount,
    ByteSize,
}

impl EditOp {
    /// The operation's tag as written in scripts
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetText { .. } => "set_text",
            Self::Insert { .. } => "insert",
            Self::Remove { .. } => "remove",
            Self::Clear => "clear",
            Self::GetLine { .. } => "get_line",
            Self::GetText { .. } => "get_text",
            Self::LineCount => "line_count",
            Self::ByteSize => "byte_size",
        }
    }
}

/// An ordered list of operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript {
    #[serde(default)]
    pub ops: Vec<EditOp>,
}

impl EditScript {
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).context("Failed to parse YAML edit script")
    }

    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("Failed to parse JSON edit script")
    }

    /// Load a script, treating `.json` files as JSON and anything else as YAML
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read edit script {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let script = if is_json {
            Self::from_json(&source)
        } else {
            Self::from_yaml(&source)
        }
        .with_context(|| format!("Invalid edit script {}", path.display()))?;

        tracing::debug!(
            "Loaded {} ops from {}",
            script.ops.len(),
            path.display()
        );
        Ok(script)
    }
}

/// What one replayed operation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutput {
    /// `set_text` / `clear` completed
    Done,
    /// Result of `insert` / `remove`
    Edit(EditOutcome),
    /// Bytes read by `get_line` / `get_text`
    Bytes(Vec<u8>),
    /// Result of `line_count` / `byte_size`
    Count(usize),
}

impl fmt::Display for StepOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "ok"),
            Self::Edit(outcome) => write!(f, "{}", outcome),
            Self::Bytes(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Self::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Apply a single operation to `buffer`
pub fn apply<S: ByteStore>(
    buffer: &mut LineIndexedBuffer<S>,
    op: &EditOp,
) -> Result<StepOutput, BufferError> {
    let output = match op {
        EditOp::SetText { text } => {
            buffer.set_text(text.as_bytes())?;
            StepOutput::Done
        }
        EditOp::Insert { line, col, text } => {
            StepOutput::Edit(buffer.insert(*line, *col, text.as_bytes())?)
        }
        EditOp::Remove {
            line1,
            col1,
            line2,
            col2,
        } => StepOutput::Edit(buffer.remove(*line1, *col1, *line2, *col2)?),
        EditOp::Clear => {
            buffer.clear();
            StepOutput::Done
        }
        EditOp::GetLine { line } => StepOutput::Bytes(buffer.get_line(*line).to_vec()),
        EditOp::GetText {
            line1,
            col1,
            line2,
            col2,
        } => StepOutput::Bytes(buffer.get_text(*line1, *col1, *line2, *col2)),
        EditOp::LineCount => StepOutput::Count(buffer.line_count()),
        EditOp::ByteSize => StepOutput::Count(buffer.byte_size()),
    };
    Ok(output)
}

/// Replay every operation in order, stopping at the first hard error
pub fn run<S: ByteStore>(
    buffer: &mut LineIndexedBuffer<S>,
    script: &EditScript,
) -> Result<Vec<StepOutput>, BufferError> {
    script.ops.iter().map(|op| apply(buffer, op)).collect()
}
