use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use argh::FromArgs;
use blamlib::{
    format::mat::{MaterialTag, ParameterSlot},
    format::param::MaterialParameter,
    util::file::map_file,
};
use serde_json::{json, Value};

#[derive(FromArgs, PartialEq, Debug)]
/// process material tag files
#[argh(subcommand, name = "mat")]
pub struct Args {
    #[argh(subcommand)]
    command: SubCommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
enum SubCommand {
    Info(InfoArgs),
    Scan(ScanArgs),
}

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// dump a decoded material tag
#[argh(subcommand, name = "info")]
pub struct InfoArgs {
    #[argh(positional)]
    /// input file
    input: PathBuf,
    #[argh(switch)]
    /// print as JSON
    json: bool,
}

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// count shader usage across a tag tree
#[argh(subcommand, name = "scan")]
pub struct ScanArgs {
    #[argh(positional)]
    /// tag root directory
    root: PathBuf,
}

pub fn run(args: Args) -> Result<()> {
    match args.command {
        SubCommand::Info(c_args) => info(c_args),
        SubCommand::Scan(c_args) => scan(c_args),
    }
}

fn info(args: InfoArgs) -> Result<()> {
    let mmap = map_file(&args.input)?;
    let tag = MaterialTag::read(&mmap)
        .with_context(|| format!("Failed to decode '{}'", args.input.display()))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tag_json(&tag))?);
        return Ok(());
    }

    println!("Shader: {}", tag.shader_path());
    println!("Blend mode: {:?}", tag.body.blend_mode);
    println!("Shadow policy: {:?}", tag.body.shadow_policy);
    if !tag.string_table.strings.is_empty() {
        println!("Strings: {:?}", tag.string_table.strings);
    }
    println!("Parameters ({}):", tag.body.table.entries.len());
    for slot in &tag.body.table.entries {
        match &slot.parameter {
            MaterialParameter::Bitmap(p) => {
                println!("- {} (bitmap): {}", slot.name(), slot.bitmap_path());
                println!(
                    "    scale {:?} offset {:?} filter {:?} wrap {:?}/{:?}/{:?} sharpen {:?} extern {:?}",
                    p.scale,
                    p.offset,
                    p.filter_mode,
                    p.wrap_mode,
                    p.wrap_mode_u,
                    p.wrap_mode_v,
                    p.sharpen_mode,
                    p.extern_mode
                );
            }
            MaterialParameter::Real(p) => println!("- {} (real): {}", slot.name(), p.value),
            MaterialParameter::Int(p) => println!("- {} (int): {}", slot.name(), p.value),
            MaterialParameter::Boolean(p) => println!("- {} (boolean): {}", slot.name(), p.value),
            MaterialParameter::Color(p) => println!(
                "- {} (color): argb({}, {}, {}, {})",
                slot.name(),
                p.alpha,
                p.red,
                p.green,
                p.blue
            ),
        }
    }
    if tag.trailing_bytes > 0 {
        println!("Trailing bytes: {}", tag.trailing_bytes);
    }
    Ok(())
}

fn tag_json(tag: &MaterialTag) -> Value {
    json!({
        "shader": tag.shader_path(),
        "blend_mode": format!("{:?}", tag.body.blend_mode),
        "shadow_policy": format!("{:?}", tag.body.shadow_policy),
        "strings": tag.string_table.strings,
        "header": tag.header.words.to_vec(),
        "blocks": tag.blocks.iter().map(|b| json!({
            "tag": String::from_utf8_lossy(&b.tag),
            "size": b.size,
        })).collect::<Vec<_>>(),
        "parameters": tag.body.table.entries.iter().map(slot_json).collect::<Vec<_>>(),
        "trailing_bytes": tag.trailing_bytes,
    })
}

fn slot_json(slot: &ParameterSlot) -> Value {
    match &slot.parameter {
        MaterialParameter::Bitmap(p) => json!({
            "name": slot.name(),
            "type": "bitmap",
            "path": slot.bitmap_path(),
            "default_path": slot.default_path(),
            "scale": p.scale,
            "offset": p.offset,
            "filter_mode": format!("{:?}", p.filter_mode),
            "wrap_mode": format!("{:?}", p.wrap_mode),
            "wrap_mode_u": format!("{:?}", p.wrap_mode_u),
            "wrap_mode_v": format!("{:?}", p.wrap_mode_v),
            "sharpen_mode": format!("{:?}", p.sharpen_mode),
            "extern_mode": format!("{:?}", p.extern_mode),
        }),
        MaterialParameter::Real(p) => json!({
            "name": slot.name(),
            "type": "real",
            "value": p.value,
        }),
        MaterialParameter::Int(p) => json!({
            "name": slot.name(),
            "type": "int",
            "parameter_index": p.parameter_index,
            "value": p.value,
            "aux": p.aux,
        }),
        MaterialParameter::Boolean(p) => json!({
            "name": slot.name(),
            "type": "boolean",
            "value": p.value,
        }),
        MaterialParameter::Color(p) => json!({
            "name": slot.name(),
            "type": "color",
            "argb": [p.alpha, p.red, p.green, p.blue],
        }),
    }
}

fn scan(args: ScanArgs) -> Result<()> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    visit(&args.root, &mut counts)?;
    let mut entries: Vec<_> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (name, count) in entries {
        println!("{name:50} {count}");
    }
    Ok(())
}

fn visit(dir: &Path, counts: &mut HashMap<String, usize>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            visit(&path, counts)?;
        } else if path.extension().map_or(false, |ext| ext == "material") {
            let mmap = map_file(&path)?;
            match MaterialTag::read(&mmap) {
                Ok(tag) => *counts.entry(tag.body.shader_name()).or_default() += 1,
                Err(e) => log::warn!("{}: {e}", path.display()),
            }
        }
    }
    Ok(())
}
