mod fmt;

use log::warn;
use nom::{
    bytes::complete::take,
    combinator::{all_consuming, cond, cut, opt},
    number::complete::le_u32,
    sequence::tuple,
    IResult,
};
use nom_derive::Parse;

pub use self::fmt::FmtChunk;

pub enum WavChunk<'a> {
    Format(FmtChunk<'a>),        // fmt
    Data(&'a [u8]),              // data
    Unknown([u8; 4], &'a [u8]), // LIST, fact, ...
}

impl<'a> Parse<&'a [u8]> for WavChunk<'a> {
    fn parse(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let header: IResult<&[u8], (&[u8], u32)> = tuple((take(4usize), le_u32))(data);
        let (remaining, (tag, size)) = header?;

        // truncated files keep whatever data they hold
        let size = match size as usize {
            x if tag == b"data" && x > remaining.len() => {
                warn!("data chunk declares {} bytes, file holds {}", x, remaining.len());
                remaining.len()
            }
            x => x,
        };

        // past the header, damage fails the whole file instead of ending the chunk list
        let body: IResult<&[u8], &[u8]> = cut(take(size))(remaining);
        let (remaining, body) = body?;

        // odd sized chunks are followed by a pad byte, which truncated files tend to lack
        let padding: IResult<&[u8], Option<Option<&[u8]>>> = cond(body.len() % 2 == 1, opt(take(1usize)))(remaining);
        let (remaining, _) = padding?;

        let chunk = match tag {
            b"fmt " => {
                let fmt: IResult<&[u8], FmtChunk> = cut(all_consuming(FmtChunk::parse))(body);
                Self::Format(fmt?.1)
            }
            b"data" => Self::Data(body),
            _ => {
                let mut id = [0; 4];
                id.copy_from_slice(tag);
                Self::Unknown(id, body)
            }
        };

        Ok((remaining, chunk))
    }
}
