use std::io::Cursor;

use binrw::{BinReaderExt, BinResult};

use crate::format::{DecodeError, DecodeErrorKind, Result};

/// Bounds-checked forward-only reader over a borrowed buffer.
///
/// All multi-byte reads are little-endian; no read ever advances past the
/// end of the backing slice.
pub struct TagReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> TagReader<'a> {
    pub fn new(data: &'a [u8]) -> Self { Self { cursor: Cursor::new(data) } }

    #[inline]
    fn data(&self) -> &'a [u8] { self.cursor.get_ref() }

    #[inline]
    pub fn position(&self) -> u64 { self.cursor.position() }

    #[inline]
    pub fn remaining(&self) -> u64 { (self.data().len() as u64).saturating_sub(self.position()) }

    pub fn u8(&mut self) -> Result<u8> {
        let pos = self.position();
        self.cursor.read_le::<u8>().map_err(|_| out_of_bounds(pos))
    }

    pub fn u16(&mut self) -> Result<u16> {
        let pos = self.position();
        self.cursor.read_le::<u16>().map_err(|_| out_of_bounds(pos))
    }

    pub fn u32(&mut self) -> Result<u32> {
        let pos = self.position();
        self.cursor.read_le::<u32>().map_err(|_| out_of_bounds(pos))
    }

    pub fn u64(&mut self) -> Result<u64> {
        let pos = self.position();
        self.cursor.read_le::<u64>().map_err(|_| out_of_bounds(pos))
    }

    pub fn i8(&mut self) -> Result<i8> {
        let pos = self.position();
        self.cursor.read_le::<i8>().map_err(|_| out_of_bounds(pos))
    }

    pub fn i16(&mut self) -> Result<i16> {
        let pos = self.position();
        self.cursor.read_le::<i16>().map_err(|_| out_of_bounds(pos))
    }

    pub fn i32(&mut self) -> Result<i32> {
        let pos = self.position();
        self.cursor.read_le::<i32>().map_err(|_| out_of_bounds(pos))
    }

    pub fn i64(&mut self) -> Result<i64> {
        let pos = self.position();
        self.cursor.read_le::<i64>().map_err(|_| out_of_bounds(pos))
    }

    pub fn f32(&mut self) -> Result<f32> {
        let pos = self.position();
        self.cursor.read_le::<f32>().map_err(|_| out_of_bounds(pos))
    }

    /// Reads a binrw record, tagging any failure with the record's start
    /// offset. Interior padding is seek-based, so a record whose trailing
    /// pad lands past the end of the buffer is rejected here.
    pub fn record<T>(&mut self, read: fn(&mut Cursor<&'a [u8]>) -> BinResult<T>) -> Result<T> {
        let pos = self.position();
        let value = read(&mut self.cursor).map_err(|_| out_of_bounds(pos))?;
        if self.position() > self.data().len() as u64 {
            return Err(out_of_bounds(pos));
        }
        Ok(value)
    }

    /// Reads a fixed-length byte span.
    pub fn fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let pos = self.position();
        if (N as u64) > self.remaining() {
            return Err(out_of_bounds(pos));
        }
        let start = pos as usize;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data()[start..start + N]);
        self.cursor.set_position(pos + N as u64);
        Ok(out)
    }

    /// Reads `n` raw bytes into an owned buffer.
    pub fn bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let pos = self.position();
        if (n as u64) > self.remaining() {
            return Err(out_of_bounds(pos));
        }
        let start = pos as usize;
        let out = self.data()[start..start + n].to_vec();
        self.cursor.set_position(pos + n as u64);
        Ok(out)
    }

    /// Advances past `n` bytes without reading them.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        let pos = self.position();
        if n > self.remaining() {
            return Err(out_of_bounds(pos));
        }
        self.cursor.set_position(pos + n);
        Ok(())
    }

    /// Guards a length-field-driven payload read: fails with `SizeMismatch`
    /// before anything is allocated when `declared` overruns the buffer.
    pub fn check_size(&self, declared: u64) -> Result<()> {
        if declared > self.remaining() {
            return Err(DecodeError::new(
                self.position(),
                DecodeErrorKind::SizeMismatch { declared, remaining: self.remaining() },
            ));
        }
        Ok(())
    }

    /// Reads a null-terminated string, scanning no further than `limit`
    /// bytes past the current position.
    ///
    /// Returns `None` when the in-buffer limit is reached without a
    /// terminator, leaving the cursor where scanning began. A scan cut
    /// short by the end of the buffer fails with `TruncatedString`.
    pub fn cstring(&mut self, limit: u64) -> Result<Option<String>> {
        let pos = self.position();
        let span = limit.min(self.remaining()) as usize;
        let start = pos as usize;
        let window = &self.data()[start..start + span];
        match window.iter().position(|&b| b == 0) {
            Some(idx) => {
                let text = String::from_utf8_lossy(&window[..idx]).into_owned();
                self.cursor.set_position(pos + idx as u64 + 1);
                Ok(Some(text))
            }
            None if (span as u64) < limit => {
                Err(DecodeError::new(pos, DecodeErrorKind::TruncatedString))
            }
            None => Ok(None),
        }
    }
}

#[inline]
fn out_of_bounds(pos: u64) -> DecodeError { DecodeError::new(pos, DecodeErrorKind::OutOfBounds) }
