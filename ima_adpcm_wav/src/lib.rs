mod chunks;
mod constants;
mod stream;
mod wav;
mod writer;

use core::result;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WavError {
    #[error("failed to parse wave file: {0}")]
    ParseError(String),
    #[error("wave file has no {0:?} chunk")]
    MissingChunk(&'static str),
    #[error("unsupported wave format {0:?}, expected ima adpcm")]
    UnsupportedFormat(FormatTag),
    #[error("failed to write wave file: {0}")]
    Write(#[from] hound::Error),
}

pub type Result<T> = result::Result<T, WavError>;

pub use self::{
    chunks::{FmtChunk, WavChunk},
    constants::{FormatTag, WAVE_FORMAT_EXTENSIBLE, WAVE_FORMAT_IEEE_FLOAT, WAVE_FORMAT_IMA_ADPCM, WAVE_FORMAT_PCM},
    stream::{extract_adpcm, AdpcmStream},
    wav::Wav,
    writer::write_float_wav,
};
