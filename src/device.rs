use std::io::{self, Read, Seek, SeekFrom};

use scroll::{ctx::TryFromCtx, IOread, Pread, LE};

use crate::error::{Error, Result};

/// Any seekable byte source a disk image can be decoded from.
pub trait Device: Seek + Read {}

impl<T: Seek + Read> Device for T {}

/// Forward/absolute reader over a [`Device`] that keeps track of its byte position.
pub struct ByteCursor<D: Device> {
    device: D,
    pos: u64,
}

impl<D: Device> ByteCursor<D> {
    pub fn new(mut device: D) -> Result<Self> {
        let pos = device.stream_position()?;
        Ok(ByteCursor { device, pos })
    }

    pub fn into_inner(self) -> D {
        self.device
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn seek_absolute(&mut self, pos: u64) -> Result<()> {
        log::trace!("seek 0x{:X} -> 0x{:X}", self.pos, pos);
        self.device.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.device.ioread_with::<u8>(LE).map_err(|e| self.eof(e))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        let value = self.device.ioread_with::<u16>(LE).map_err(|e| self.eof(e))?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let value = self.device.ioread_with::<u32>(LE).map_err(|e| self.eof(e))?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.device.read_exact(&mut buf).map_err(|e| self.eof(e))?;
        self.pos += N as u64;
        Ok(buf)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.device.read_exact(&mut buf).map_err(|e| self.eof(e))?;
        self.pos += n as u64;
        Ok(buf)
    }

    /// Reads `size` bytes and parses them as a little-endian fixed-layout record.
    pub fn read_record<T>(&mut self, size: usize) -> Result<T>
    where
        T: for<'a> TryFromCtx<'a, scroll::Endian, Error = scroll::Error>,
    {
        let buf = self.read_bytes(size)?;
        Ok(buf.pread_with::<T>(0, LE)?)
    }

    /// Consumes `n` bytes, failing if the device ends first.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        let skipped = io::copy(&mut (&mut self.device).take(n), &mut io::sink())?;
        self.pos += skipped;
        if skipped < n {
            return Err(Error::Eof { offset: self.pos });
        }
        Ok(())
    }

    fn eof(&self, e: io::Error) -> Error {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::Eof { offset: self.pos },
            _ => Error::Io(e),
        }
    }
}
