use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use linebuf::cli::{CliArgs, StoreKind};
use linebuf::config::BufferConfig;
use linebuf::script::{self, EditScript};
use linebuf::{ByteStore, GapStore, LineIndexedBuffer, RopeStore};

fn main() -> Result<()> {
    linebuf::tracing::init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => BufferConfig::load_from(path)?,
        None => BufferConfig::load(),
    };
    let config = args.apply_overrides(config);
    tracing::debug!("Using config {:?}, store {:?}", config, args.store);

    let script = EditScript::load(&args.script)?;

    match args.store {
        StoreKind::Gap => replay(
            LineIndexedBuffer::<GapStore>::with_config(&config),
            &args,
            &script,
        ),
        StoreKind::Rope => replay(
            LineIndexedBuffer::<RopeStore>::with_config(&config),
            &args,
            &script,
        ),
    }
}

fn replay<S: ByteStore>(
    mut buffer: LineIndexedBuffer<S>,
    args: &CliArgs,
    script: &EditScript,
) -> Result<()> {
    if let Some(input) = &args.input {
        let text = std::fs::read(input)
            .with_context(|| format!("Failed to read input {}", input.display()))?;
        buffer
            .set_text(&text)
            .with_context(|| format!("Failed to load {}", input.display()))?;
        tracing::info!("Seeded buffer from {}: {}", input.display(), buffer);
    }

    for (step, op) in script.ops.iter().enumerate() {
        let output = script::apply(&mut buffer, op)
            .with_context(|| format!("Step {} ({:?}) failed", step + 1, op))?;
        println!("{:>4}  {:<10} {}", step + 1, op.name(), output);
    }

    println!("{}", buffer);
    if args.print {
        std::io::stdout()
            .write_all(&buffer.to_bytes())
            .context("Failed to write document")?;
    }

    Ok(())
}
