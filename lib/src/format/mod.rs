pub mod chunk;
pub mod mat;
pub mod param;
pub mod reader;
pub mod strg;

use std::fmt::{Debug, Display, Formatter, Write};

use binrw::binrw;
use thiserror::Error;

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

#[binrw]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    #[inline]
    pub fn from_u32(value: u32) -> Self {
        Self([(value >> 24) as u8, (value >> 16) as u8, (value >> 8) as u8, value as u8])
    }

    #[inline]
    pub fn as_u32(&self) -> u32 {
        ((self.0[0] as u32) << 24)
            | ((self.0[1] as u32) << 16)
            | ((self.0[2] as u32) << 8)
            | (self.0[3] as u32)
    }
}

impl Display for FourCC {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for c in self.0 {
            f.write_char(c as char)?;
        }
        Ok(())
    }
}

impl Debug for FourCC {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_char('"')?;
        for c in self.0 {
            f.write_char(c as char)?;
        }
        f.write_char('"')?;
        Ok(())
    }
}

impl PartialEq<[u8; 4]> for FourCC {
    fn eq(&self, other: &[u8; 4]) -> bool { &self.0 == other }
}

/// Fatal decode failure. The offset is the position at which the failing
/// read began; decoding never resumes past one of these.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset:#x}")]
pub struct DecodeError {
    pub offset: u64,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(offset: u64, kind: DecodeErrorKind) -> Self { Self { offset, kind } }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("read past end of buffer")]
    OutOfBounds,
    #[error("string terminator missing")]
    TruncatedString,
    #[error("unknown material parameter type {0}")]
    UnknownParameterType(u32),
    #[error("declared size {declared} exceeds remaining {remaining} bytes")]
    SizeMismatch { declared: u64, remaining: u64 },
}
