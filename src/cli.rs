//! Command-line argument parsing for the replay binary

use clap::Parser;
use std::path::PathBuf;

use crate::config::{BufferConfig, CacheStrategy};

/// Backing store for the replayed buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreKind {
    /// Byte gap buffer; accepts any content
    #[default]
    Gap,
    /// ropey rope; content must stay valid UTF-8
    Rope,
}

/// Replay an edit script against a line-indexed buffer
#[derive(Parser, Debug)]
#[command(
    name = "linebuf",
    version,
    about = "Replay line/column edit scripts against a text buffer"
)]
pub struct CliArgs {
    /// Edit script to replay (YAML, or JSON with a .json extension)
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// File whose content seeds the buffer before the script runs
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Config file to use instead of ~/.config/linebuf/config.yaml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the configured line cache strategy
    #[arg(long, value_enum)]
    pub strategy: Option<CacheStrategy>,

    /// Backing store to edit
    #[arg(long, value_enum, default_value_t = StoreKind::Gap)]
    pub store: StoreKind,

    /// Print the final document after the script
    #[arg(short, long)]
    pub print: bool,
}

impl CliArgs {
    /// Apply command-line overrides on top of a loaded config
    pub fn apply_overrides(&self, mut config: BufferConfig) -> BufferConfig {
        if let Some(strategy) = self.strategy {
            config.cache_strategy = strategy;
        }
        config
    }
}
