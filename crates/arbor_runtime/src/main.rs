//! Arbor demo runtime
//!
//! Profiles a small simulated frame loop spread over several threads and
//! prints the report in both sort orders.
//!
//! Usage: `arbor [settings.json] [frames]`

use anyhow::{anyhow, Context, Result};
use arbor_core::{ProfilerSettings, SortBy};
use std::thread;

mod workload;

const DEFAULT_FRAMES: u32 = 60;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Arbor v{}", arbor_core::VERSION);

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => ProfilerSettings::load(&path)
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => ProfilerSettings::default(),
    };
    let frames = match args.next() {
        Some(count) => count
            .parse()
            .with_context(|| format!("invalid frame count '{count}'"))?,
        None => DEFAULT_FRAMES,
    };
    arbor_profiler::init(settings).context("failed to install profiler")?;

    let loader = thread::Builder::new()
        .name("loader".into())
        .spawn(move || workload::stream_assets(frames / 4))
        .context("failed to spawn loader thread")?;

    tracing::info!(frames, "running frame loop");
    for frame in 0..frames {
        workload::frame(frame);
    }
    loader
        .join()
        .map_err(|_| anyhow!("loader thread panicked"))?;

    arbor_profiler::display(SortBy::ExecutionOrder);
    arbor_profiler::display(SortBy::TotalTime);

    tracing::info!("Profiling run finished");
    Ok(())
}
