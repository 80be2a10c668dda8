use std::io::{Seek, Write};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::Result;

/// Writes interleaved samples as a 32-bit float wave file.
pub fn write_float_wav<W: Write + Seek>(writer: W, channel_count: u16, sample_rate: u32, samples: &[f32]) -> Result<()> {
    let spec = WavSpec {
        channels: channel_count,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::new(writer, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}
