use nom::{
    combinator::complete,
    multi::many0,
};
use nom_derive::{NomLE, Parse};

use crate::{
    chunks::{FmtChunk, WavChunk},
    Result, WavError,
};

#[derive(NomLE)]
#[nom(Complete)]
pub struct Wav<'a> {
    #[nom(Tag(b"RIFF"))]
    pub riff: &'a [u8],
    pub length: u32,
    #[nom(Tag(b"WAVE"))]
    pub wave: &'a [u8],
    #[nom(Parse = "many0(complete(WavChunk::parse))")]
    pub chunks: Vec<WavChunk<'a>>,
}

impl<'a> Wav<'a> {
    pub fn parse(file: &'a [u8]) -> Result<Self> {
        Ok(Parse::parse(file).map_err(|e| parse_error(file, e))?.1)
    }

    /// First `fmt ` chunk of the file.
    pub fn format(&self) -> Option<&FmtChunk<'a>> {
        self.chunks.iter().find_map(|x| if let WavChunk::Format(x) = x { Some(x) } else { None })
    }

    /// First `data` chunk of the file.
    pub fn data(&self) -> Option<&'a [u8]> {
        self.chunks.iter().find_map(|x| if let WavChunk::Data(x) = x { Some(*x) } else { None })
    }
}

fn parse_error(file: &[u8], e: nom::Err<nom::error::Error<&[u8]>>) -> WavError {
    match e {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let offset = (e.input.as_ptr() as usize).saturating_sub(file.as_ptr() as usize);
            WavError::ParseError(format!("{:?} at offset {}", e.code, offset))
        }
        nom::Err::Incomplete(_) => WavError::ParseError("incomplete input".into()),
    }
}
