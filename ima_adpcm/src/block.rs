// ima adpcm block decoding, as framed in wav files
// see https://github.com/dbry/adpcm-xq/blob/master/adpcm-lib.c

use crate::{
    signal::int16_to_float,
    tables::{INDEX_TABLE, MAX_STEP_INDEX, STEP_TABLE},
    AdpcmError, Result,
};

/// Bytes of block header per channel: predictor (i16 le), step index, reserved.
pub const HEADER_BYTES_PER_CHANNEL: usize = 4;
const CHUNK_BYTES_PER_CHANNEL: usize = 4;

/// Framing of one block, derived from the channel count and the container's block align.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockLayout {
    channel_count: usize,
    block_size: usize,
    chunk_count: usize,
}

impl BlockLayout {
    pub fn new(channel_count: usize, block_size: usize) -> Result<Self> {
        if channel_count == 0 {
            return Err(AdpcmError::InvalidChannelCount);
        }

        let header_size = channel_count * HEADER_BYTES_PER_CHANNEL;
        let chunk_size = channel_count * CHUNK_BYTES_PER_CHANNEL;
        if block_size < header_size || (block_size - header_size) % chunk_size != 0 {
            return Err(AdpcmError::InvalidBlockSize { block_size, channel_count });
        }

        Ok(Self {
            channel_count,
            block_size,
            chunk_count: (block_size - header_size) / chunk_size,
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of interleaved 4-byte-per-channel groups following the headers.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Samples produced per channel: the header sample plus two per body byte.
    pub fn samples_per_block(&self) -> usize {
        1 + self.chunk_count * CHUNK_BYTES_PER_CHANNEL * 2
    }
}

/// Decoder state of a single channel. Lives for one block only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChannelState {
    predictor: i32,
    step_index: u8,
}

impl ChannelState {
    pub fn new(predictor: i16, step_index: u8) -> Self {
        Self {
            predictor: predictor as i32,
            step_index: step_index.min(MAX_STEP_INDEX),
        }
    }

    fn from_header(channel: usize, header: &[u8]) -> Result<Self> {
        let predictor = i16::from_le_bytes([header[0], header[1]]);
        let step_index = header[2];
        let reserved = header[3];

        if step_index > MAX_STEP_INDEX || reserved != 0 {
            return Err(AdpcmError::MalformedBlockHeader {
                channel,
                step_index,
                reserved,
            });
        }

        Ok(Self::new(predictor, step_index))
    }

    pub fn predictor(&self) -> i16 {
        self.predictor as i16
    }

    pub fn step_index(&self) -> u8 {
        self.step_index
    }

    /// Applies one 4-bit code and returns the reconstructed sample.
    pub fn expand_nibble(&mut self, nibble: u8) -> i16 {
        let step = STEP_TABLE[self.step_index as usize];
        let mut delta = step >> 3;

        if nibble & 1 != 0 {
            delta += step >> 2;
        }
        if nibble & 2 != 0 {
            delta += step >> 1;
        }
        if nibble & 4 != 0 {
            delta += step;
        }
        if nibble & 8 != 0 {
            delta = -delta;
        }

        self.predictor = i32::clamp(self.predictor + delta, i16::MIN as i32, i16::MAX as i32);
        let step_index = self.step_index as i32 + INDEX_TABLE[(nibble & 0x7) as usize] as i32;
        self.step_index = i32::clamp(step_index, 0, MAX_STEP_INDEX as i32) as u8;

        self.predictor as i16
    }
}

/// Decodes one block into `outputs[ch][output_offset..]` for every channel and returns the offset
/// just past the last written sample.
///
/// Every channel header is validated before anything is written, so a malformed block leaves the
/// outputs untouched.
///
/// # Panics
///
/// Panics if fewer than `channel_count` outputs are given or an output is too short to hold
/// [`BlockLayout::samples_per_block`] samples from `output_offset`.
pub fn decode_block<O: AsMut<[f32]>>(block: &[u8], channel_count: usize, outputs: &mut [O], output_offset: usize) -> Result<usize> {
    let layout = BlockLayout::new(channel_count, block.len())?;
    assert!(
        outputs.len() >= channel_count,
        "{} output buffers given for {} channels",
        outputs.len(),
        channel_count
    );

    let (headers, body) = block.split_at(channel_count * HEADER_BYTES_PER_CHANNEL);
    let states = headers
        .chunks_exact(HEADER_BYTES_PER_CHANNEL)
        .enumerate()
        .map(|(channel, header)| ChannelState::from_header(channel, header))
        .collect::<Result<Vec<_>>>()?;

    let end = output_offset + layout.samples_per_block();
    let chunk_stride = channel_count * CHUNK_BYTES_PER_CHANNEL;

    // channels share no state, so each one is decoded across the whole block in turn
    for (channel, (mut state, output)) in states.into_iter().zip(outputs.iter_mut()).enumerate() {
        let output = output.as_mut();
        assert!(
            output.len() >= end,
            "output buffer of channel {} holds {} samples, block needs {}",
            channel,
            output.len(),
            end
        );
        let output = &mut output[output_offset..end];
        output[0] = int16_to_float(state.predictor());

        let bytes = body
            .chunks_exact(chunk_stride)
            .flat_map(|chunk| &chunk[channel * CHUNK_BYTES_PER_CHANNEL..(channel + 1) * CHUNK_BYTES_PER_CHANNEL]);

        for (&byte, samples) in bytes.zip(output[1..].chunks_exact_mut(2)) {
            samples[0] = int16_to_float(state.expand_nibble(byte & 0x0F));
            samples[1] = int16_to_float(state.expand_nibble(byte >> 4));
        }
    }

    Ok(end)
}
