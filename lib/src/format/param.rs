use binrw::{binread, BinRead};

use crate::format::{
    chunk::TagChunk,
    reader::TagReader,
    DecodeError, DecodeErrorKind, Result,
};

/// Common record width of the bitmap/real/boolean/color parameter slots,
/// leading pad and discriminant included.
pub const PARAMETER_BYTES: u64 = 168;
/// Record width of the int slot. The asymmetry is part of the format.
pub const INT_PARAMETER_BYTES: u64 = 708;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ParameterType {
    Bitmap = 0,
    Real = 1,
    Int = 2,
    Boolean = 3,
    Color = 4,
}

impl ParameterType {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Bitmap),
            1 => Some(Self::Real),
            2 => Some(Self::Int),
            3 => Some(Self::Boolean),
            4 => Some(Self::Color),
            _ => None,
        }
    }

    /// Total bytes one slot of this type occupies on disk.
    pub fn byte_size(self) -> u64 {
        match self {
            Self::Int => INT_PARAMETER_BYTES,
            _ => PARAMETER_BYTES,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterMode {
    Trilinear,
    Point,
    Bilinear,
    Unused0,
    AnisotropicTwoExpensive,
    Unused1,
    AnisotropicFourExpensive,
    LightprobeTextureArray,
    TextureArrayQuadlinear,
    TextureArrayQuadanisotropicTwo,
    Unknown(u16),
}

impl FilterMode {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::Trilinear,
            1 => Self::Point,
            2 => Self::Bilinear,
            3 => Self::Unused0,
            4 => Self::AnisotropicTwoExpensive,
            5 => Self::Unused1,
            6 => Self::AnisotropicFourExpensive,
            7 => Self::LightprobeTextureArray,
            8 => Self::TextureArrayQuadlinear,
            9 => Self::TextureArrayQuadanisotropicTwo,
            n => Self::Unknown(n),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WrapMode {
    Wrap,
    Clamp,
    Mirror,
    BlackBorder,
    MirrorOnce,
    MirrorOnceBorder,
    Unknown(u16),
}

impl WrapMode {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::Wrap,
            1 => Self::Clamp,
            2 => Self::Mirror,
            3 => Self::BlackBorder,
            4 => Self::MirrorOnce,
            5 => Self::MirrorOnceBorder,
            n => Self::Unknown(n),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SharpenMode {
    Blur200,
    Blur175,
    Blur150,
    Blur125,
    Blur100,
    Blur075,
    Blur050,
    Blur025,
    Neutral,
    Sharpen025,
    Sharpen050,
    Sharpen075,
    Sharpen100,
    Unknown(u16),
}

impl SharpenMode {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::Blur200,
            1 => Self::Blur175,
            2 => Self::Blur150,
            3 => Self::Blur125,
            4 => Self::Blur100,
            5 => Self::Blur075,
            6 => Self::Blur050,
            7 => Self::Blur025,
            8 => Self::Neutral,
            9 => Self::Sharpen025,
            10 => Self::Sharpen050,
            11 => Self::Sharpen075,
            12 => Self::Sharpen100,
            n => Self::Unknown(n),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExternMode {
    UseBitmapAsNormal,
    AlbedoBuffer,
    NormalBuffer,
    DynamicUi,
    DepthCamera,
    Unknown(u16),
}

impl ExternMode {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::UseBitmapAsNormal,
            1 => Self::AlbedoBuffer,
            2 => Self::NormalBuffer,
            3 => Self::DynamicUi,
            4 => Self::DepthCamera,
            n => Self::Unknown(n),
        }
    }
}

#[binread]
#[br(little)]
#[derive(Clone, Debug, PartialEq)]
pub struct BitmapParameter {
    #[br(pad_before = 40)]
    pub scale: [f32; 2],
    pub offset: [f32; 2],
    #[br(pad_before = 6, map = FilterMode::from_raw)]
    pub filter_mode: FilterMode,
    #[br(map = WrapMode::from_raw)]
    pub wrap_mode: WrapMode,
    #[br(map = WrapMode::from_raw)]
    pub wrap_mode_u: WrapMode,
    #[br(map = WrapMode::from_raw)]
    pub wrap_mode_v: WrapMode,
    #[br(map = SharpenMode::from_raw)]
    pub sharpen_mode: SharpenMode,
    #[br(map = ExternMode::from_raw, pad_after = 86)]
    pub extern_mode: ExternMode,
}

#[binread]
#[br(little)]
#[derive(Clone, Debug, PartialEq)]
pub struct RealParameter {
    #[br(pad_before = 40, pad_after = 116)]
    pub value: f32,
}

#[binread]
#[br(little)]
#[derive(Clone, Debug, PartialEq)]
pub struct IntParameter {
    #[br(pad_before = 64)]
    pub parameter_index: u32,
    pub value: u32,
    #[br(pad_after = 604)]
    pub aux: [f32; 6],
}

#[binread]
#[br(little)]
#[derive(Clone, Debug, PartialEq)]
pub struct BooleanParameter {
    #[br(pad_before = 56, pad_after = 100, map = |raw: u32| raw != 0)]
    pub value: bool,
}

#[binread]
#[br(little)]
#[derive(Clone, Debug, PartialEq)]
pub struct ColorParameter {
    #[br(pad_before = 24)]
    pub alpha: f32,
    pub red: f32,
    pub green: f32,
    #[br(pad_after = 120)]
    pub blue: f32,
}

/// One material parameter record: 4 bytes of leading pad, a 32-bit
/// discriminant, then the variant's fixed-layout body.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialParameter {
    Bitmap(BitmapParameter),
    Real(RealParameter),
    Int(IntParameter),
    Boolean(BooleanParameter),
    Color(ColorParameter),
}

impl MaterialParameter {
    pub fn kind(&self) -> ParameterType {
        match self {
            Self::Bitmap(_) => ParameterType::Bitmap,
            Self::Real(_) => ParameterType::Real,
            Self::Int(_) => ParameterType::Int,
            Self::Boolean(_) => ParameterType::Boolean,
            Self::Color(_) => ParameterType::Color,
        }
    }

    pub fn read(reader: &mut TagReader) -> Result<Self> {
        let start = reader.position();
        reader.skip(4)?;
        let type_pos = reader.position();
        let raw = reader.u32()?;
        let Some(kind) = ParameterType::from_raw(raw) else {
            return Err(DecodeError::new(type_pos, DecodeErrorKind::UnknownParameterType(raw)));
        };
        let parameter = match kind {
            ParameterType::Bitmap => Self::Bitmap(reader.record(BitmapParameter::read_le)?),
            ParameterType::Real => Self::Real(reader.record(RealParameter::read_le)?),
            ParameterType::Int => Self::Int(reader.record(IntParameter::read_le)?),
            ParameterType::Boolean => Self::Boolean(reader.record(BooleanParameter::read_le)?),
            ParameterType::Color => Self::Color(reader.record(ColorParameter::read_le)?),
        };
        debug_assert_eq!(reader.position() - start, kind.byte_size());
        Ok(parameter)
    }
}

/// Auxiliary chunk chain paired with every parameter slot.
///
/// Always present and always fully consumed, whatever the parameter's
/// discriminant; the path chunks only carry content for bitmap slots.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialParameterData {
    pub data_chunk: TagChunk,
    pub name: TagChunk,
    pub bitmap_path: TagChunk,
    pub default_path: TagChunk,
    pub trailing: Vec<u8>,
}

impl MaterialParameterData {
    pub fn read(reader: &mut TagReader) -> Result<Self> {
        let data_chunk = TagChunk::read_sized(reader)?;
        reader.skip(12)?;
        let name = TagChunk::read_name(reader)?;
        let bitmap_path = TagChunk::read_name(reader)?;
        let default_path = TagChunk::read_name(reader)?;
        reader.skip(8)?;
        let count = reader.u32()?;
        reader.skip(36)?;
        reader.check_size(count as u64)?;
        let trailing = reader.bytes(count as usize)?;
        Ok(Self { data_chunk, name, bitmap_path, default_path, trailing })
    }
}
