use crate::format::{reader::TagReader, FourCC, Result};

/// Length-budgeted table of null-terminated strings.
///
/// The region is exactly `byte_budget` bytes; strings fill the front and
/// the cursor always leaves positioned at the end of the region.
#[derive(Clone, Debug, PartialEq)]
pub struct StringTable {
    pub magic: FourCC,
    pub unused: u32,
    pub byte_budget: u32,
    pub strings: Vec<String>,
}

impl StringTable {
    pub fn read(reader: &mut TagReader) -> Result<Self> {
        let magic = FourCC(reader.fixed::<4>()?);
        let unused = reader.u32()?;
        let byte_budget = reader.u32()?;
        let start = reader.position();
        let end = start + byte_budget as u64;
        let mut strings = Vec::new();
        while reader.position() < end {
            match reader.cstring(end - reader.position())? {
                Some(text) => strings.push(text),
                None => {
                    // Unterminated tail inside the budget: padding, skip it.
                    let skipped = end - reader.position();
                    log::debug!("string table: skipping {skipped} unterminated bytes");
                    reader.skip(skipped)?;
                }
            }
        }
        Ok(Self { magic, unused, byte_budget, strings })
    }
}
