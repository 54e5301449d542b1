//! Patch rendering command.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use voltage_config::EngineConfig;
use voltage_core::{ProcessContext, Processor};

use crate::patches::DemoPatch;
use crate::wav::write_wav;

#[derive(Args)]
pub struct RenderArgs {
    /// Patch to render
    #[arg(value_enum, value_name = "PATCH")]
    patch: DemoPatch,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Duration in seconds
    #[arg(long, default_value = "2.0")]
    seconds: f64,

    /// Engine settings file (defaults to the user config file if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sample rate, overriding the settings file
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Block size, overriding the settings file
    #[arg(long)]
    block_size: Option<usize>,

    /// Seed for the random patches
    #[arg(long)]
    seed: Option<u64>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.seconds.is_finite() && args.seconds > 0.0,
        "duration must be positive, got {}",
        args.seconds
    );

    let mut config = EngineConfig::load_or_default(args.config.as_deref())?;
    if let Some(sample_rate) = args.sample_rate {
        config = config.with_sample_rate(sample_rate);
    }
    if let Some(block_size) = args.block_size {
        config = config.with_block_size(block_size);
    }
    let mut ctx = config.context()?;

    tracing::info!(
        patch = args.patch.name(),
        sample_rate = config.sample_rate,
        block_size = config.block_size,
        "rendering"
    );

    let mut root = args.patch.build(&mut ctx, args.seed);
    let total = (args.seconds * config.sample_rate).round() as usize;
    let samples = render(root.as_mut(), &mut ctx, total);

    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    tracing::debug!(peak, "render finished");

    write_wav(&args.output, &samples, config.sample_rate.round() as u32)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Wrote {} samples ({:.2}s) of '{}' to {}",
        samples.len(),
        args.seconds,
        args.patch.name(),
        args.output.display()
    );
    Ok(())
}

/// Pulls `root` block by block until `total` samples are produced.
///
/// The last block is truncated; every block is processed at full size so the
/// patch always sees the context's block size.
pub fn render(root: &mut dyn Processor, ctx: &mut ProcessContext, total: usize) -> Vec<f32> {
    let block_size = ctx.block_size();
    let mut block = vec![0.0; block_size];
    let mut samples = Vec::with_capacity(total);

    while samples.len() < total {
        ctx.tick();
        root.process(ctx, &mut block);
        let take = (total - samples.len()).min(block_size);
        samples.extend_from_slice(&block[..take]);
    }
    samples
}
