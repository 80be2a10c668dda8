use core::{
    mem,
    num::NonZeroUsize,
    ops::Range,
    sync::atomic::{AtomicBool, Ordering},
};
use std::{thread, time::Instant};

use log::{debug, trace, warn};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

use crate::{
    block::{decode_block, BlockLayout},
    metrics::{DecodeMetrics, NoopMetrics},
    partition::BlockPartition,
    AdpcmError, Result,
};

/// Upper bound for the default worker count.
pub const MAX_DEFAULT_WORKERS: usize = 4;

pub fn default_worker_count() -> usize {
    let available = thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1);

    usize::min(available, MAX_DEFAULT_WORKERS)
}

/// Samples allocated per channel for `raw_len` bytes of adpcm data (two samples per byte).
pub fn output_len(raw_len: usize, channel_count: usize) -> usize {
    (raw_len * 2).checked_div(channel_count).unwrap_or(0)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecoderOptions {
    pub workers: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            workers: default_worker_count(),
        }
    }
}

/// Decodes whole adpcm streams on a fixed set of workers.
///
/// Each worker gets a contiguous range of blocks together with the matching regions of every
/// channel buffer, so no two workers ever touch the same samples.
pub struct Decoder {
    workers: usize,
    pool: Option<ThreadPool>,
}

impl Decoder {
    pub fn new(options: DecoderOptions) -> Result<Self> {
        let workers = options.workers.max(1);

        // a single worker decodes on the calling thread
        let pool = if workers > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("adpcm-decode-{}", i))
                .build()
                .map_err(|e| AdpcmError::WorkerPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self { workers, pool })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn decode(&self, raw: &[u8], channel_count: usize, block_size: usize) -> Result<Vec<Vec<f32>>> {
        self.decode_with_metrics(raw, channel_count, block_size, &NoopMetrics)
    }

    pub fn decode_with_metrics(&self, raw: &[u8], channel_count: usize, block_size: usize, metrics: &dyn DecodeMetrics) -> Result<Vec<Vec<f32>>> {
        let layout = BlockLayout::new(channel_count, block_size)?;
        let mut outputs = vec![vec![0.0; output_len(raw.len(), channel_count)]; channel_count];

        self.run(raw, layout, &mut outputs, metrics)?;

        Ok(outputs)
    }

    /// Decodes into caller-owned buffers, which must hold exactly [`output_len`] samples each.
    ///
    /// # Panics
    ///
    /// Panics if the number or size of the buffers does not match the stream.
    pub fn decode_into<O: AsMut<[f32]>>(
        &self,
        raw: &[u8],
        channel_count: usize,
        block_size: usize,
        outputs: &mut [O],
        metrics: &dyn DecodeMetrics,
    ) -> Result<()> {
        let layout = BlockLayout::new(channel_count, block_size)?;

        assert_eq!(outputs.len(), channel_count, "output buffer count does not match channel count");
        let expected = output_len(raw.len(), channel_count);
        for (channel, output) in outputs.iter_mut().enumerate() {
            let len = output.as_mut().len();
            assert_eq!(len, expected, "output buffer of channel {} is not sized for the stream", channel);
        }

        self.run(raw, layout, outputs, metrics)
    }

    fn run<O: AsMut<[f32]>>(&self, raw: &[u8], layout: BlockLayout, outputs: &mut [O], metrics: &dyn DecodeMetrics) -> Result<()> {
        let started = Instant::now();

        let partition = BlockPartition::new(raw.len(), layout.block_size());
        if partition.trailing_bytes() > 0 {
            warn!(
                "ignoring {} trailing bytes after {} whole blocks",
                partition.trailing_bytes(),
                partition.block_count()
            );
        }

        let ranges = partition.worker_ranges(self.workers);
        debug!(
            "decoding {} blocks of {} bytes, {} channel(s), on {} worker(s)",
            partition.block_count(),
            layout.block_size(),
            layout.channel_count(),
            self.workers
        );

        let mut jobs = ranges
            .into_iter()
            .filter(|x| !x.is_empty())
            .map(|blocks| Job {
                input: &raw[partition.byte_range(&blocks)],
                outputs: Vec::with_capacity(layout.channel_count()),
                blocks,
            })
            .collect::<Vec<_>>();

        let stride = layout.samples_per_block();
        for output in outputs.iter_mut() {
            let mut rest = &mut output.as_mut()[..partition.block_count() * stride];
            for job in jobs.iter_mut() {
                let (region, tail) = mem::take(&mut rest).split_at_mut(job.blocks.len() * stride);
                job.outputs.push(region);
                rest = tail;
            }
        }

        let abort = AtomicBool::new(false);
        let run_job = |job: Job<'_>| job.run(layout, &abort, metrics);
        match &self.pool {
            Some(pool) => pool.install(|| jobs.into_par_iter().try_for_each(run_job))?,
            None => jobs.into_iter().try_for_each(run_job)?,
        }

        metrics.record("decode", started.elapsed(), 1);

        Ok(())
    }
}

struct Job<'a> {
    blocks: Range<usize>,
    input: &'a [u8],
    outputs: Vec<&'a mut [f32]>,
}

impl Job<'_> {
    fn run(mut self, layout: BlockLayout, abort: &AtomicBool, metrics: &dyn DecodeMetrics) -> Result<()> {
        let started = Instant::now();
        let mut offset = 0;

        for block in self.input.chunks_exact(layout.block_size()) {
            if abort.load(Ordering::Relaxed) {
                trace!("abandoning blocks {:?}", self.blocks);
                return Ok(());
            }

            offset = decode_block(block, layout.channel_count(), &mut self.outputs, offset).inspect_err(|_| abort.store(true, Ordering::Relaxed))?;
        }

        trace!("decoded blocks {:?}", self.blocks);
        metrics.record("block", started.elapsed(), self.blocks.len());

        Ok(())
    }
}

/// Decodes a whole stream with `workers` workers, or [`default_worker_count`] when `None`.
pub fn decode(raw: &[u8], channel_count: usize, block_size: usize, workers: Option<usize>) -> Result<Vec<Vec<f32>>> {
    let options = workers.map(|workers| DecoderOptions { workers }).unwrap_or_default();

    Decoder::new(options)?.decode(raw, channel_count, block_size)
}
