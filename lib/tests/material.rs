use blamlib::format::{
    chunk::{K_CHUNK_TGBL, K_CHUNK_TGIS, K_CHUNK_TGRF, K_CHUNK_TGST},
    mat::{BlendMode, MaterialTag, TransparentShadowPolicy, K_CHUNK_BDAT, TAG_HEADER_WORDS},
    param::MaterialParameter,
    DecodeErrorKind, FourCC,
};

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn push_f32(buf: &mut Vec<u8>, value: f32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn push_chunk(buf: &mut Vec<u8>, magic: FourCC, payload: &[u8]) {
    push_u32(buf, magic.as_u32());
    push_u32(buf, 0);
    push_u32(buf, payload.len() as u32);
    buf.extend_from_slice(payload);
}

fn push_meta_chunk(buf: &mut Vec<u8>, magic: FourCC, size: u32) {
    push_u32(buf, magic.as_u32());
    push_u32(buf, 0);
    push_u32(buf, size);
}

fn push_real_parameter(buf: &mut Vec<u8>, value: f32) {
    buf.extend_from_slice(&[0u8; 4]);
    push_u32(buf, 1);
    buf.extend_from_slice(&[0u8; 40]);
    push_f32(buf, value);
    buf.extend_from_slice(&[0u8; 116]);
}

fn push_bitmap_parameter(buf: &mut Vec<u8>, scale: [f32; 2], offset: [f32; 2]) {
    buf.extend_from_slice(&[0u8; 4]);
    push_u32(buf, 0);
    buf.extend_from_slice(&[0u8; 40]);
    push_f32(buf, scale[0]);
    push_f32(buf, scale[1]);
    push_f32(buf, offset[0]);
    push_f32(buf, offset[1]);
    buf.extend_from_slice(&[0u8; 6]);
    for mode in [0u16, 0, 0, 0, 8, 0] {
        buf.extend_from_slice(&mode.to_le_bytes());
    }
    buf.extend_from_slice(&[0u8; 86]);
}

fn push_parameter_data(buf: &mut Vec<u8>, name: &[u8], path: &[u8], default: &[u8]) {
    push_chunk(buf, K_CHUNK_TGST, &[]);
    buf.extend_from_slice(&[0u8; 12]);
    push_chunk(buf, K_CHUNK_TGIS, name);
    push_chunk(buf, K_CHUNK_TGRF, path);
    push_chunk(buf, K_CHUNK_TGIS, default);
    buf.extend_from_slice(&[0u8; 8]);
    push_u32(buf, 0);
    buf.extend_from_slice(&[0u8; 36]);
}

struct BodyOpts<'a> {
    blend_mode: u8,
    shadow_policy: u32,
    shader: &'a [u8],
}

/// Builds a complete synthetic tag: header, string table, 11 empty
/// blocks, then a `BDat` body whose parameter region is `parameters`
/// followed by `chains`.
fn build_file(opts: &BodyOpts, count: u32, parameters: &[u8], chains: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    for word in 0..TAG_HEADER_WORDS {
        push_u32(&mut buf, if (18..=20).contains(&word) { 0x100 + word as u32 } else { 0 });
    }
    buf.extend_from_slice(b"sgtb");
    push_u32(&mut buf, 0);
    push_u32(&mut buf, 4);
    buf.extend_from_slice(b"\0\0\0\0");
    for index in 0..11u8 {
        buf.extend_from_slice(b"blok 00.");
        let len = buf.len();
        buf[len - 3] = b'0' + index / 10;
        buf[len - 2] = b'0' + index % 10;
        push_u32(&mut buf, 0);
    }
    push_u32(&mut buf, K_CHUNK_BDAT.as_u32());
    push_u32(&mut buf, 0);
    push_u32(&mut buf, 0);
    push_meta_chunk(&mut buf, K_CHUNK_TGBL, 1);
    buf.extend_from_slice(&[0u8; 64]);
    buf.push(opts.blend_mode);
    buf.extend_from_slice(&[0u8; 3]);
    push_u32(&mut buf, opts.shadow_policy);
    push_meta_chunk(&mut buf, K_CHUNK_TGST, 0);
    push_chunk(&mut buf, K_CHUNK_TGRF, opts.shader);
    push_u32(&mut buf, FourCC(*b"prms").as_u32());
    push_u32(&mut buf, 0);
    push_u32(&mut buf, 0);
    push_u32(&mut buf, count);
    push_u32(&mut buf, 0);
    buf.extend_from_slice(parameters);
    buf.extend_from_slice(chains);
    buf
}

const SHADER: &[u8] = b"shaders\\materials\\srf_blinn";

fn minimal_file() -> Vec<u8> {
    let mut parameters = Vec::new();
    push_real_parameter(&mut parameters, 3.5);
    let mut chains = Vec::new();
    push_parameter_data(&mut chains, b"intensity", b"", b"");
    let opts = BodyOpts { blend_mode: 3, shadow_policy: 1, shader: SHADER };
    build_file(&opts, 1, &parameters, &chains)
}

#[test]
fn minimal_file_decodes() {
    let file = minimal_file();
    let tag = MaterialTag::read(&file).unwrap();

    assert_eq!(tag.header.physics_material_offset(), 0x112);
    assert_eq!(tag.string_table.byte_budget, 4);
    assert_eq!(tag.string_table.strings, vec![""; 4]);
    assert_eq!(tag.blocks.len(), 11);
    assert!(tag.blocks.iter().all(|b| b.data.is_empty()));
    assert_eq!(&tag.blocks[10].tag, b"blok 10.");

    assert_eq!(tag.body.magic, K_CHUNK_BDAT);
    assert_eq!(tag.body.blend_mode, BlendMode::AlphaBlend);
    assert_eq!(tag.body.shadow_policy, TransparentShadowPolicy::RenderAsDecal);
    assert_eq!(tag.shader_path(), "shaders\\materials\\srf_blinn");
    assert_eq!(tag.body.shader_name(), "srf_blinn");

    assert_eq!(tag.body.table.entries.len(), 1);
    let slot = &tag.body.table.entries[0];
    assert_eq!(slot.name(), "intensity");
    let MaterialParameter::Real(real) = &slot.parameter else { panic!("expected real") };
    assert_eq!(real.value, 3.5);
    assert_eq!(tag.trailing_bytes, 0);
}

#[test]
fn decoding_is_deterministic() {
    let file = minimal_file();
    let first = MaterialTag::read(&file).unwrap();
    let second = MaterialTag::read(&file).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parameter_and_data_arrays_stay_parallel() {
    let mut parameters = Vec::new();
    push_bitmap_parameter(&mut parameters, [2.0, 2.0], [0.0, 0.5]);
    push_real_parameter(&mut parameters, 0.25);
    let mut chains = Vec::new();
    push_parameter_data(&mut chains, b"base_map", b"data\\env\\tile_floor", b"grey50");
    push_parameter_data(&mut chains, b"alpha_multiplier", b"", b"");
    let opts = BodyOpts { blend_mode: 0, shadow_policy: 2, shader: SHADER };
    let file = build_file(&opts, 2, &parameters, &chains);

    let tag = MaterialTag::read(&file).unwrap();
    let entries = &tag.body.table.entries;
    assert_eq!(entries.len(), 2);

    let MaterialParameter::Bitmap(bitmap) = &entries[0].parameter else { panic!("expected bitmap") };
    assert_eq!(bitmap.scale, [2.0, 2.0]);
    assert_eq!(entries[0].name(), "base_map");
    assert_eq!(entries[0].bitmap_path(), "data\\env\\tile_floor");
    assert_eq!(entries[0].default_path(), "grey50");

    // The non-bitmap slot still owns a fully parsed (degenerate) chain.
    let MaterialParameter::Real(real) = &entries[1].parameter else { panic!("expected real") };
    assert_eq!(real.value, 0.25);
    assert_eq!(entries[1].name(), "alpha_multiplier");
    assert_eq!(entries[1].bitmap_path(), "");
    assert_eq!(tag.trailing_bytes, 0);
}

#[test]
fn trailing_bytes_are_counted_not_rejected() {
    let mut file = minimal_file();
    file.extend_from_slice(&[0xcc; 7]);
    let tag = MaterialTag::read(&file).unwrap();
    assert_eq!(tag.trailing_bytes, 7);
}

#[test]
fn truncated_file_fails_out_of_bounds() {
    let file = minimal_file();
    let err = MaterialTag::read(&file[..file.len() - 60]).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::OutOfBounds);
}

#[test]
fn overlong_parameter_count_is_a_size_mismatch() {
    let opts = BodyOpts { blend_mode: 0, shadow_policy: 0, shader: b"" };
    let file = build_file(&opts, 100, &[], &[]);
    let err = MaterialTag::read(&file).unwrap_err();
    assert!(matches!(err.kind, DecodeErrorKind::SizeMismatch { declared: 16800, .. }));
}

#[test]
fn unknown_parameter_type_aborts_the_decode() {
    let mut parameters = vec![0u8; 4];
    push_u32(&mut parameters, 99);
    parameters.extend_from_slice(&[0u8; 160]);
    let opts = BodyOpts { blend_mode: 0, shadow_policy: 0, shader: b"" };
    let file = build_file(&opts, 1, &parameters, &[]);
    let err = MaterialTag::read(&file).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::UnknownParameterType(99));
}
