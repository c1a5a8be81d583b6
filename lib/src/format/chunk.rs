use std::borrow::Cow;

use binrw::{binread, BinRead};

use crate::format::{reader::TagReader, FourCC, Result};

// Tag reference (path payload)
pub const K_CHUNK_TGRF: FourCC = FourCC(*b"tgrf");
// Tag instance string
pub const K_CHUNK_TGIS: FourCC = FourCC(*b"tgis");
// Tag struct
pub const K_CHUNK_TGST: FourCC = FourCC(*b"tgst");
// Tag block
pub const K_CHUNK_TGBL: FourCC = FourCC(*b"tgbl");
// Tag data (pad-aligned payload)
pub const K_CHUNK_TGDA: FourCC = FourCC(*b"tgda");

#[binread]
#[br(little)]
struct ChunkHeader {
    // Byteswapped, like the rest of the engine's group tags
    #[br(map = FourCC::from_u32)]
    magic: FourCC,
    unk: u32,
    size: u32,
}

/// One tagged chunk: `{ magic, unk, size }` plus whatever payload the
/// caller-requested shape carries.
///
/// Magics are captured for diagnostics but never validated; the format is
/// not self-verifying beyond its length bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub struct TagChunk {
    pub magic: FourCC,
    pub unk: u32,
    pub size: u32,
    pub data: Vec<u8>,
}

impl TagChunk {
    fn read_header(reader: &mut TagReader) -> Result<Self> {
        let header = reader.record(ChunkHeader::read_le)?;
        Ok(Self { magic: header.magic, unk: header.unk, size: header.size, data: Vec::new() })
    }

    /// Name-payload shape (`tgrf`, `tgis`): `size` bytes of text follow the
    /// header. `size` may be 0.
    pub fn read_name(reader: &mut TagReader) -> Result<Self> {
        let mut chunk = Self::read_header(reader)?;
        reader.check_size(chunk.size as u64)?;
        chunk.data = reader.bytes(chunk.size as usize)?;
        Ok(chunk)
    }

    /// Metadata-only shape (`tgst`, `tgbl`): the header is the whole chunk.
    pub fn read_meta(reader: &mut TagReader) -> Result<Self> { Self::read_header(reader) }

    /// Size-tagged shape (`tgst` + data): an explicit data region of `size`
    /// bytes follows the header.
    pub fn read_sized(reader: &mut TagReader) -> Result<Self> { Self::read_name(reader) }

    /// Padded shape (`tgda`): a declared size below 4 consumes a fixed
    /// 4-byte pad region instead of a variable payload, keeping whatever
    /// follows aligned.
    pub fn read_padded(reader: &mut TagReader) -> Result<Self> {
        let mut chunk = Self::read_header(reader)?;
        if chunk.size < 4 {
            chunk.data = reader.bytes(4)?;
        } else {
            reader.check_size(chunk.size as u64)?;
            chunk.data = reader.bytes(chunk.size as usize)?;
        }
        Ok(chunk)
    }

    /// Payload as text, stopping at the first NUL.
    pub fn text(&self) -> Cow<'_, str> {
        let end = self.data.iter().position(|&b| b == 0).unwrap_or(self.data.len());
        String::from_utf8_lossy(&self.data[..end])
    }
}
