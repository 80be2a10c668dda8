pub const WAVE_FORMAT_PCM: u16 = 0x0001;
pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
pub const WAVE_FORMAT_IMA_ADPCM: u16 = 0x0011;
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum FormatTag {
    Pcm,
    IeeeFloat,
    ImaAdpcm,
    Extensible,
    Other(u16),
}

impl From<u16> for FormatTag {
    fn from(value: u16) -> Self {
        match value {
            WAVE_FORMAT_PCM => Self::Pcm,
            WAVE_FORMAT_IEEE_FLOAT => Self::IeeeFloat,
            WAVE_FORMAT_IMA_ADPCM => Self::ImaAdpcm,
            WAVE_FORMAT_EXTENSIBLE => Self::Extensible,
            x => Self::Other(x),
        }
    }
}

impl From<FormatTag> for u16 {
    fn from(value: FormatTag) -> Self {
        match value {
            FormatTag::Pcm => WAVE_FORMAT_PCM,
            FormatTag::IeeeFloat => WAVE_FORMAT_IEEE_FLOAT,
            FormatTag::ImaAdpcm => WAVE_FORMAT_IMA_ADPCM,
            FormatTag::Extensible => WAVE_FORMAT_EXTENSIBLE,
            FormatTag::Other(x) => x,
        }
    }
}
