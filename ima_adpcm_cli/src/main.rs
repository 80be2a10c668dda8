use std::{env, io::Cursor, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Parser;
use log::{info, warn, LevelFilter};

use ima_adpcm::{interleave, BenchMetrics, BlockLayout, DecodeMetrics, Decoder, DecoderOptions, NoopMetrics};
use ima_adpcm_wav::{extract_adpcm, write_float_wav};

/// Decodes an IMA ADPCM wave file into 32-bit float samples.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// IMA ADPCM wave file
    input: PathBuf,

    /// Write the decoded signal to this file as a float wave file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of decode workers, defaults to the available parallelism capped at 4
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Log decode timings
    #[arg(long)]
    bench: bool,

    /// Decode a second time on a single worker and compare the results
    #[arg(long)]
    verify: bool,

    #[arg(short, long)]
    verbose: bool,
}

struct Decoded {
    channel_count: u16,
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

fn decode_file(file: &[u8], options: DecoderOptions, bench: bool, verify: bool) -> anyhow::Result<Decoded> {
    let stream = extract_adpcm(file)?;
    let channel_count = stream.channel_count as usize;
    let block_size = stream.block_size as usize;

    let layout = BlockLayout::new(channel_count, block_size)?;
    if let Some(x) = stream.samples_per_block.filter(|&x| x as usize != layout.samples_per_block()) {
        warn!("fmt chunk claims {} samples per block, block align gives {}", x, layout.samples_per_block());
    }

    let decoder = Decoder::new(options)?;
    let metrics = BenchMetrics::new();
    let recorder: &dyn DecodeMetrics = if bench { &metrics } else { &NoopMetrics };

    let channels = decoder.decode_with_metrics(stream.data, channel_count, block_size, recorder)?;

    for (label, timing) in metrics.timings() {
        info!(
            "{}: {:?} average over {} ({:?} total)",
            label,
            timing.average().unwrap_or_default(),
            timing.count,
            timing.total
        );
    }

    if verify {
        let reference = Decoder::new(DecoderOptions { workers: 1 })?.decode(stream.data, channel_count, block_size)?;
        let total = reference.iter().map(Vec::len).sum::<usize>();
        let diffs = reference
            .iter()
            .zip(&channels)
            .flat_map(|(a, b)| a.iter().zip(b))
            .filter(|(a, b)| a.to_bits() != b.to_bits())
            .count();

        info!("total diffs {} ({:.2}%)", diffs, diffs as f64 * 100.0 / total.max(1) as f64);
        anyhow::ensure!(diffs == 0, "{} workers disagree with a single worker on {} samples", decoder.workers(), diffs);
    }

    Ok(Decoded {
        channel_count: stream.channel_count,
        sample_rate: stream.sample_rate,
        channels,
    })
}

fn init_logger(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose { LevelFilter::Debug } else { LevelFilter::Info });
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let file = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let options = args.workers.map(|workers| DecoderOptions { workers }).unwrap_or_default();
    let (bench, verify) = (args.bench, args.verify);
    let decoded = tokio::task::spawn_blocking(move || decode_file(&file, options, bench, verify)).await??;

    let frames = decoded.channels.first().map_or(0, Vec::len);
    info!(
        "decoded {} frames ({:?}) of {} channel(s) at {} hz",
        frames,
        Duration::from_secs_f64(frames as f64 / decoded.sample_rate.max(1) as f64),
        decoded.channel_count,
        decoded.sample_rate
    );

    if let Some(output) = args.output {
        let signal = interleave(&decoded.channels);
        let mut data = Cursor::new(Vec::with_capacity(signal.len() * 4 + 80));
        write_float_wav(&mut data, decoded.channel_count, decoded.sample_rate, &signal)?;

        tokio::fs::write(&output, data.into_inner())
            .await
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!("wrote {}", output.display());
    }

    Ok(())
}
