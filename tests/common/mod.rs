#![allow(dead_code)]

use dta_loader_lib::dta::{ByteCursor, ByteOrder, GameVariant, Palette, Result};
use dta_loader_lib::loader::{AssetTables, Dispatcher, NoRefresh, TextureStore};


/// Writes synthetic archives, little-endian.
#[derive(Default)]
pub struct ArchiveBuilder {
    bytes: Vec<u8>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// offset the next write lands at
    pub fn position(&self) -> u32 {
        self.bytes.len() as u32
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn zeros(&mut self, n: usize) -> &mut Self {
        self.bytes.resize(self.bytes.len() + n, 0);
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.raw(&v.to_le_bytes())
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.raw(&v.to_le_bytes())
    }

    /// NUL padded to `width`
    pub fn fixed(&mut self, text: &str, width: usize) -> &mut Self {
        let mut field = text.as_bytes().to_vec();
        field.resize(width, 0);
        self.raw(&field)
    }

    /// tag, u32 payload length, payload
    pub fn chunk(&mut self, tag: &[u8; 4], payload: &[u8]) -> &mut Self {
        self.raw(tag).u32(payload.len() as u32).raw(payload)
    }

    pub fn vers(&mut self, version: u32) -> &mut Self {
        self.raw(b"VERS").u32(version)
    }

    /// Yoda ZONE header
    pub fn zone_yoda(&mut self, count: u16) -> &mut Self {
        self.raw(b"ZONE").u16(count).u16(0).u32(0)
    }

    /// Indy ZONE header
    pub fn zone_indy(&mut self, count: u16) -> &mut Self {
        self.raw(b"ZONE").u32(0).u16(count)
    }

    /// index chunk whose length counts from the tag, followed by `body` bytes
    pub fn index(&mut self, tag: &[u8; 4], body: &[u8]) -> &mut Self {
        self.raw(tag).u32(8 + body.len() as u32).raw(body)
    }

    pub fn endf(&mut self) -> &mut Self {
        self.raw(b"ENDF")
    }

    pub fn build(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}


pub fn load_with_textures(bytes: Vec<u8>, variant: GameVariant) -> Result<(AssetTables, TextureStore)> {
    let mut textures = TextureStore::default();
    let mut refresh = NoRefresh;
    let cursor = ByteCursor::from_bytes(bytes, ByteOrder::Little);
    let tables = Dispatcher::new(cursor, variant, Palette::for_variant(variant), &mut textures, &mut refresh).run()?;
    Ok((tables, textures))
}

pub fn load(bytes: Vec<u8>, variant: GameVariant) -> Result<AssetTables> {
    load_with_textures(bytes, variant).map(|(tables, _)| tables)
}
