use log::debug;

use crate::{constants::FormatTag, wav::Wav, Result, WavError};

/// Raw ima adpcm payload of a wave file along with what is needed to decode it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AdpcmStream<'a> {
    pub channel_count: u16,
    pub block_size: u32, // block align of the fmt chunk
    pub sample_rate: u32,
    pub samples_per_block: Option<u16>,
    pub data: &'a [u8],
}

/// Locates the ima adpcm stream of a wave file.
///
/// Any format other than ima adpcm is rejected before the data chunk is looked at.
pub fn extract_adpcm(file: &[u8]) -> Result<AdpcmStream<'_>> {
    let wav = Wav::parse(file)?;

    let fmt = wav.format().ok_or(WavError::MissingChunk("fmt "))?;
    if fmt.format() != FormatTag::ImaAdpcm {
        return Err(WavError::UnsupportedFormat(fmt.format()));
    }

    let data = wav.data().ok_or(WavError::MissingChunk("data"))?;

    debug!(
        "ima adpcm stream: {} channel(s), {} hz, block align {}, {} bytes",
        fmt.channel_count,
        fmt.sample_rate,
        fmt.block_align,
        data.len()
    );

    Ok(AdpcmStream {
        channel_count: fmt.channel_count,
        block_size: fmt.block_align as u32,
        sample_rate: fmt.sample_rate,
        samples_per_block: fmt.samples_per_block(),
        data,
    })
}
