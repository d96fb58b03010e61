use std::fs::{self, File};
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::mem;
use std::path::Path;
use encoding_rs::WINDOWS_1252;
use log::trace;
use crate::dta::error::{Error, Result};


/// Byte order of the 16/32-bit fields stored in the archive.
/// Resolved once when the cursor is created, reads convert explicitly
/// so the host order never leaks into decoded values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}


#[inline]
pub fn dta_read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    type V = u8;
    let mut buff = [0; mem::size_of::<V>()];
    reader.read_exact(&mut buff)?;
    Ok(V::from_le_bytes(buff))
}

#[inline]
pub fn dta_read_u16<R: Read>(reader: &mut R, order: ByteOrder) -> io::Result<u16> {
    type V = u16;
    let mut buff = [0; mem::size_of::<V>()];
    reader.read_exact(&mut buff)?;
    Ok(match order {
        ByteOrder::Little => V::from_le_bytes(buff),
        ByteOrder::Big => V::from_be_bytes(buff),
    })
}

#[inline]
pub fn dta_read_u32<R: Read>(reader: &mut R, order: ByteOrder) -> io::Result<u32> {
    type V = u32;
    let mut buff = [0; mem::size_of::<V>()];
    reader.read_exact(&mut buff)?;
    Ok(match order {
        ByteOrder::Little => V::from_le_bytes(buff),
        ByteOrder::Big => V::from_be_bytes(buff),
    })
}


/// Decodes archive text: everything up to the first NUL, Windows-1252.
pub fn decode_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(&bytes[..end]);
    text.into_owned()
}


#[derive(Debug)]
enum Source {
    Memory(Cursor<Vec<u8>>),
    File(BufReader<File>),
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Memory(c) => c.read(buf),
            Source::File(f) => f.read(buf),
        }
    }
}

impl Seek for Source {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Source::Memory(c) => c.seek(pos),
            Source::File(f) => f.seek(pos),
        }
    }
}


/// Absolute read position over the archive bytes.
///
/// The position can be moved anywhere, but every read checks
/// `position + width <= len` first and fails with `Error::OutOfBounds`
/// without moving. For file-backed sources the handle is re-seeked
/// to the absolute position whenever it drifted from it.
#[derive(Debug)]
pub struct ByteCursor {
    source: Source,
    len: u64,
    pos: u64,
    source_pos: u64,    // where the underlying handle currently stands
    order: ByteOrder,
}

impl ByteCursor {
    pub fn from_bytes(data: Vec<u8>, order: ByteOrder) -> Self {
        let len = data.len() as u64;
        Self {
            source: Source::Memory(Cursor::new(data)),
            len,
            pos: 0,
            source_pos: 0,
            order,
        }
    }

    /// Reads the whole archive into memory.
    pub fn preload(path: &Path, order: ByteOrder) -> Result<Self> {
        trace!("ByteCursor::preload");
        let data = fs::read(path).map_err(|source| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(data, order))
    }

    /// Keeps the archive on disk, every read goes through the file handle.
    pub fn open(path: &Path, order: ByteOrder) -> Result<Self> {
        trace!("ByteCursor::open");
        let unavailable = |source| Error::SourceUnavailable { path: path.to_path_buf(), source };
        let f = File::open(path).map_err(unavailable)?;
        let len = f.metadata().map_err(unavailable)?.len();

        Ok(Self {
            source: Source::File(BufReader::new(f)),
            len,
            pos: 0,
            source_pos: 0,
            order,
        })
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn is_file_backed(&self) -> bool {
        matches!(self.source, Source::File(_))
    }

    #[inline]
    pub fn seek_to(&mut self, pos: u64) {
        self.pos = pos;
    }

    /// Relative seek, clamped at the start of the archive.
    #[inline]
    pub fn seek_by(&mut self, delta: i64) {
        self.pos = self.pos.saturating_add_signed(delta);
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.prepare(1)?;
        let v = dta_read_u8(&mut self.source)?;
        self.advance(1);
        Ok(v)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.prepare(2)?;
        let v = dta_read_u16(&mut self.source, self.order)?;
        self.advance(2);
        Ok(v)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.prepare(4)?;
        let v = dta_read_u32(&mut self.source, self.order)?;
        self.advance(4);
        Ok(v)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.prepare(n as u64)?;
        let mut buff = vec![0; n];
        self.source.read_exact(&mut buff)?;
        self.advance(n as u64);
        Ok(buff)
    }

    /// 4 raw bytes, used for chunk tags
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        self.prepare(4)?;
        let mut tag = [0; 4];
        self.source.read_exact(&mut tag)?;
        self.advance(4);
        Ok(tag)
    }

    /// Consumes exactly `n` bytes and returns the text before the first NUL.
    pub fn read_fixed_string(&mut self, n: usize) -> Result<String> {
        let bytes = self.read_bytes(n)?;
        Ok(decode_text(&bytes))
    }

    /// u16 length followed by that many raw bytes.
    pub fn read_prefixed_bytes(&mut self) -> Result<Vec<u8>> {
        let n = self.read_u16()? as usize;
        self.read_bytes(n)
    }

    /// Reads a u16 at an absolute offset and leaves the position untouched.
    pub fn read_u16_at(&mut self, offset: u64) -> Result<u16> {
        let pos = self.pos;
        self.pos = offset;
        let v = self.read_u16();
        self.pos = pos;
        v
    }

    fn prepare(&mut self, n: u64) -> Result<()> {
        if self.pos + n > self.len {
            return Err(Error::OutOfBounds { offset: self.pos, need: n, len: self.len });
        }

        if self.source_pos != self.pos {
            self.source.seek(SeekFrom::Start(self.pos))?;
            self.source_pos = self.pos;
        }
        Ok(())
    }

    #[inline]
    fn advance(&mut self, n: u64) {
        self.pos += n;
        self.source_pos = self.pos;
    }
}
