use std::borrow::Cow;

use crate::format::{
    chunk::TagChunk,
    param::{MaterialParameter, MaterialParameterData, PARAMETER_BYTES},
    reader::TagReader,
    strg::StringTable,
    FourCC, Result,
};

// Material tag body
pub const K_CHUNK_BDAT: FourCC = FourCC(*b"BDat");

/// Fixed 32-bit words in the tag header.
pub const TAG_HEADER_WORDS: usize = 42;
/// Opaque length-delimited blocks between the string table and the body.
pub const BLOCK_COUNT: usize = 11;

/// The fixed tag header. Three words are relative offsets into the file;
/// they are recorded for diagnostics and cross-referencing, but the
/// sequential parse never dereferences them.
#[derive(Clone, Debug, PartialEq)]
pub struct TagHeader {
    pub words: [u32; TAG_HEADER_WORDS],
}

impl TagHeader {
    pub const PHYSICS_MATERIAL_WORD: usize = 18;
    pub const STRUCT_CHUNK_WORD: usize = 19;
    pub const BODY_WORD: usize = 20;

    pub fn read(reader: &mut TagReader) -> Result<Self> {
        let mut words = [0u32; TAG_HEADER_WORDS];
        for word in &mut words {
            *word = reader.u32()?;
        }
        Ok(Self { words })
    }

    /// Relative offset of the physics material type string.
    pub fn physics_material_offset(&self) -> u32 { self.words[Self::PHYSICS_MATERIAL_WORD] }

    /// Relative offset of the size-tagged struct chunk.
    pub fn struct_chunk_offset(&self) -> u32 { self.words[Self::STRUCT_CHUNK_WORD] }

    /// Relative offset of the material body.
    pub fn body_offset(&self) -> u32 { self.words[Self::BODY_WORD] }

    /// All header words as read-only (index, value) pairs.
    pub fn fields(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.words.iter().copied().enumerate()
    }
}

/// One opaque, self-delimited block.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub tag: [u8; 8],
    pub size: u32,
    pub data: Vec<u8>,
}

impl Block {
    pub fn read(reader: &mut TagReader) -> Result<Self> {
        let tag = reader.fixed::<8>()?;
        let size = reader.u32()?;
        reader.check_size(size as u64)?;
        let data = reader.bytes(size as usize)?;
        Ok(Self { tag, size, data })
    }
}

/// Blend mode selector stored on the material body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Opaque,
    Additive,
    Multiply,
    AlphaBlend,
    DoubleMultiply,
    PreMultipliedAlpha,
    Maximum,
    MultiplyAdd,
    AddSrcTimesDstAlpha,
    AddSrcTimesSrcAlpha,
    InvAlphaBlend,
    MotionBlurStatic,
    MotionBlurInhibit,
    ApplyShadowIntoShadowMask,
    AlphaBlendConstant,
    OverdrawApply,
    WetScreenEffect,
    Minimum,
    ReverseSubtract,
    ForgeLightmap,
    ForgeLightmapInv,
    ReplaceAllChannels,
    AlphaBlendMax,
    OpaqueAlphaBlend,
    AlphaBlendAdditiveTransparent,
    Unknown(u8),
}

impl BlendMode {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Opaque,
            1 => Self::Additive,
            2 => Self::Multiply,
            3 => Self::AlphaBlend,
            4 => Self::DoubleMultiply,
            5 => Self::PreMultipliedAlpha,
            6 => Self::Maximum,
            7 => Self::MultiplyAdd,
            8 => Self::AddSrcTimesDstAlpha,
            9 => Self::AddSrcTimesSrcAlpha,
            10 => Self::InvAlphaBlend,
            11 => Self::MotionBlurStatic,
            12 => Self::MotionBlurInhibit,
            13 => Self::ApplyShadowIntoShadowMask,
            14 => Self::AlphaBlendConstant,
            15 => Self::OverdrawApply,
            16 => Self::WetScreenEffect,
            17 => Self::Minimum,
            18 => Self::ReverseSubtract,
            19 => Self::ForgeLightmap,
            20 => Self::ForgeLightmapInv,
            21 => Self::ReplaceAllChannels,
            22 => Self::AlphaBlendMax,
            23 => Self::OpaqueAlphaBlend,
            24 => Self::AlphaBlendAdditiveTransparent,
            n => Self::Unknown(n),
        }
    }
}

/// How transparent surfaces participate in shadow rendering.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransparentShadowPolicy {
    None,
    RenderAsDecal,
    RenderWithMaterial,
    Unknown(u32),
}

impl TransparentShadowPolicy {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::RenderAsDecal,
            2 => Self::RenderWithMaterial,
            n => Self::Unknown(n),
        }
    }
}

/// One parameter plus its auxiliary chunk chain. The file stores the two
/// as separately-lengthed runs; they are combined here so an index can
/// never drift between them.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSlot {
    pub parameter: MaterialParameter,
    pub data: MaterialParameterData,
}

impl ParameterSlot {
    pub fn name(&self) -> Cow<'_, str> { self.data.name.text() }

    pub fn bitmap_path(&self) -> Cow<'_, str> { self.data.bitmap_path.text() }

    pub fn default_path(&self) -> Cow<'_, str> { self.data.default_path.text() }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterTable {
    pub magic: FourCC,
    pub unk0: u32,
    pub size: u32,
    pub unk2: u32,
    pub entries: Vec<ParameterSlot>,
}

impl ParameterTable {
    pub fn read(reader: &mut TagReader) -> Result<Self> {
        let magic = FourCC::from_u32(reader.u32()?);
        let unk0 = reader.u32()?;
        let size = reader.u32()?;
        let count = reader.u32()?;
        let unk2 = reader.u32()?;
        log::debug!("parameter table {magic:?}: {count} entries, size {size:#x}");
        // Every slot occupies at least the common record width.
        reader.check_size(count as u64 * PARAMETER_BYTES)?;
        let mut parameters = Vec::with_capacity(count as usize);
        for _ in 0..count {
            parameters.push(MaterialParameter::read(reader)?);
        }
        let mut chains = Vec::with_capacity(count as usize);
        for _ in 0..count {
            chains.push(MaterialParameterData::read(reader)?);
        }
        let entries = parameters
            .into_iter()
            .zip(chains)
            .map(|(parameter, data)| ParameterSlot { parameter, data })
            .collect();
        Ok(Self { magic, unk0, size, unk2, entries })
    }
}

/// The `BDat` material body.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialBody {
    pub magic: FourCC,
    pub unused: u32,
    pub size: u32,
    pub inner_block: TagChunk,
    pub blend_mode: BlendMode,
    pub shadow_policy: TransparentShadowPolicy,
    pub struct_chunk: TagChunk,
    pub shader: TagChunk,
    pub table: ParameterTable,
}

impl MaterialBody {
    pub fn read(reader: &mut TagReader) -> Result<Self> {
        let magic = FourCC::from_u32(reader.u32()?);
        let unused = reader.u32()?;
        let size = reader.u32()?;
        log::debug!("material body {magic:?} size {size:#x}");
        let inner_block = TagChunk::read_meta(reader)?;
        reader.skip(64)?;
        let blend_mode = BlendMode::from_raw(reader.u8()?);
        reader.skip(3)?;
        let shadow_policy = TransparentShadowPolicy::from_raw(reader.u32()?);
        let struct_chunk = TagChunk::read_meta(reader)?;
        let shader = TagChunk::read_name(reader)?;
        let table = ParameterTable::read(reader)?;
        Ok(Self {
            magic,
            unused,
            size,
            inner_block,
            blend_mode,
            shadow_policy,
            struct_chunk,
            shader,
            table,
        })
    }

    /// Full tag path of the material shader.
    pub fn shader_path(&self) -> Cow<'_, str> { self.shader.text() }

    /// Shader name with its tag-path directories stripped.
    pub fn shader_name(&self) -> String {
        let path = self.shader_path();
        path.rsplit('\\').next().unwrap_or_default().to_string()
    }
}

/// A fully decoded material tag.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialTag {
    pub header: TagHeader,
    pub string_table: StringTable,
    pub blocks: Vec<Block>,
    pub body: MaterialBody,
    /// Bytes left unconsumed after the body. Later format revisions may
    /// append data, so this is a diagnostic, not an error.
    pub trailing_bytes: u64,
}

impl MaterialTag {
    /// Decodes one material tag file. Fails fast: any structural
    /// inconsistency aborts the whole decode and no partial model is
    /// returned.
    pub fn read(data: &[u8]) -> Result<Self> {
        let mut reader = TagReader::new(data);
        let header = TagHeader::read(&mut reader)?;
        let string_table = StringTable::read(&mut reader)?;
        let mut blocks = Vec::with_capacity(BLOCK_COUNT);
        for _ in 0..BLOCK_COUNT {
            blocks.push(Block::read(&mut reader)?);
        }
        let body = MaterialBody::read(&mut reader)?;
        let trailing_bytes = reader.remaining();
        if trailing_bytes > 0 {
            log::debug!("{trailing_bytes} trailing bytes after material body");
        }
        Ok(Self { header, string_table, blocks, body, trailing_bytes })
    }

    pub fn shader_path(&self) -> Cow<'_, str> { self.body.shader_path() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_records_offset_words() {
        let mut buf = Vec::new();
        for word in 0..TAG_HEADER_WORDS as u32 {
            buf.extend_from_slice(&word.to_le_bytes());
        }
        let mut r = TagReader::new(&buf);
        let header = TagHeader::read(&mut r).unwrap();
        assert_eq!(r.position(), 168);
        assert_eq!(header.physics_material_offset(), 18);
        assert_eq!(header.struct_chunk_offset(), 19);
        assert_eq!(header.body_offset(), 20);
        assert_eq!(header.fields().count(), TAG_HEADER_WORDS);
    }

    #[test]
    fn block_is_self_delimited() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"mat!data");
        buf.extend_from_slice(&3u32.to_le_bytes());
        buf.extend_from_slice(b"xyz rest");
        let mut r = TagReader::new(&buf);
        let block = Block::read(&mut r).unwrap();
        assert_eq!(&block.tag, b"mat!data");
        assert_eq!(block.data, b"xyz");
        assert_eq!(r.position(), 15);
    }

    #[test]
    fn blend_mode_table_matches_engine_order() {
        assert_eq!(BlendMode::from_raw(0), BlendMode::Opaque);
        assert_eq!(BlendMode::from_raw(3), BlendMode::AlphaBlend);
        assert_eq!(BlendMode::from_raw(24), BlendMode::AlphaBlendAdditiveTransparent);
        assert_eq!(BlendMode::from_raw(25), BlendMode::Unknown(25));
        assert_eq!(TransparentShadowPolicy::from_raw(1), TransparentShadowPolicy::RenderAsDecal);
        assert_eq!(TransparentShadowPolicy::from_raw(9), TransparentShadowPolicy::Unknown(9));
    }
}
