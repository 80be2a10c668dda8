mod block;
mod decoder;
mod metrics;
mod partition;
mod signal;
mod tables;

use core::result;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdpcmError {
    #[error("malformed block header on channel {channel} (step index {step_index}, reserved {reserved:#04x})")]
    MalformedBlockHeader { channel: usize, step_index: u8, reserved: u8 },
    #[error("block size {block_size} does not fit ima adpcm framing for {channel_count} channel(s)")]
    InvalidBlockSize { block_size: usize, channel_count: usize },
    #[error("channel count must be at least 1")]
    InvalidChannelCount,
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

pub type Result<T> = result::Result<T, AdpcmError>;

pub use self::{
    block::{decode_block, BlockLayout, ChannelState, HEADER_BYTES_PER_CHANNEL},
    decoder::{decode, default_worker_count, output_len, Decoder, DecoderOptions, MAX_DEFAULT_WORKERS},
    metrics::{BenchMetrics, DecodeMetrics, NoopMetrics, Timing},
    partition::{BlockDescriptor, BlockPartition},
    signal::{int16_to_float, interleave},
    tables::{INDEX_TABLE, MAX_STEP_INDEX, STEP_TABLE},
};
