use nom::{
    combinator::rest,
    number::complete::le_u16,
    sequence::tuple,
    IResult,
};
use nom_derive::NomLE;

use crate::constants::FormatTag;

#[derive(NomLE)]
#[nom(Complete)]
pub struct FmtChunk<'a> {
    pub format_tag: u16,
    pub channel_count: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    #[nom(Parse = "rest")]
    pub extension: &'a [u8], // cbSize followed by format specific data, if any
}

impl FmtChunk<'_> {
    pub fn format(&self) -> FormatTag {
        FormatTag::from(self.format_tag)
    }

    /// Frames per block as stored in the ima adpcm fmt extension.
    pub fn samples_per_block(&self) -> Option<u16> {
        let result: IResult<&[u8], (u16, u16)> = tuple((le_u16, le_u16))(self.extension);
        let (_, (extension_size, samples_per_block)) = result.ok()?;

        (extension_size >= 2).then_some(samples_per_block)
    }
}
