use std::fmt;
use std::mem;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use crate::dta::NO_NAME;


/*
    dta raw structures
 */
#[allow(dead_code)]
#[repr(C, packed)]
struct DtaTileCell {
    flags: u32,
    pixels: [u8; TILE_PIXELS],
}

pub const TILE_WIDTH: u32 = 32;
pub const TILE_PIXELS: usize = (TILE_WIDTH * TILE_WIDTH) as usize;

// MUST BE 1028 bytes, TILE chunks hold len / 1028 whole cells
pub const TILE_CELL_SIZE: u64 = mem::size_of::<DtaTileCell>() as u64;

/// Texture slots 0..0x2000 belong to tiles, the startup screen goes right after them.
pub const TILE_TEXTURE_SLOTS: u32 = 0x2000;
pub const STARTUP_TEXTURE_SLOT: u32 = TILE_TEXTURE_SLOTS;
pub const STARTUP_WIDTH: u32 = 288;

/// u16 ids, so the name table always covers every possible tile
pub const TILE_NAME_SLOTS: usize = 0x10000;


#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TileFlags {
    Transparent = 0x0000_0001,
    Floor       = 0x0000_0002,
    Object      = 0x0000_0004,
    Draggable   = 0x0000_0008,
    Roof        = 0x0000_0010,
    Locator     = 0x0000_0020,
    Weapon      = 0x0000_0040,
    Item        = 0x0000_0080,
    Character   = 0x0000_0100,
}


#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct TileRecord {
    pub index: u32,
    pub flags: u32,
}

impl TileRecord {
    #[inline]
    pub fn has(&self, flag: TileFlags) -> bool {
        self.flags & flag as u32 != 0
    }
}


/// TileTable stores the metadata of every tile in archive order,
/// pixels are handed to the texture sink while decoding and not kept.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct TileTable {
    flags: Vec<u32>,
}

impl TileTable {
    pub fn with_capacity(count: usize) -> Self {
        Self { flags: Vec::with_capacity(count) }
    }

    pub fn push(&mut self, flags: u32) -> u32 {
        self.flags.push(flags);
        (self.flags.len() - 1) as u32
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<TileRecord> {
        self.flags.get(index as usize).map(|&flags| TileRecord { index, flags })
    }

    pub fn iter(&self) -> impl Iterator<Item = TileRecord> + '_ {
        self.flags.iter().enumerate().map(|(i, &flags)| TileRecord { index: i as u32, flags })
    }
}


/// Names of tiles by id. Every one of the 65536 slots exists,
/// slots never assigned read as `NO_NAME`.
pub struct TileNames {
    names: Vec<Option<String>>,
}

impl TileNames {
    pub fn new() -> Self {
        Self { names: vec![None; TILE_NAME_SLOTS] }
    }

    /// sets every slot back to `NO_NAME`
    pub fn clear(&mut self) {
        self.names.iter_mut().for_each(|n| *n = None);
    }

    pub fn set(&mut self, id: u16, name: String) {
        self.names[id as usize] = Some(name);
    }

    pub fn unset(&mut self, id: u16) {
        self.names[id as usize] = None;
    }

    pub fn get(&self, id: u16) -> &str {
        self.names[id as usize].as_deref().unwrap_or(NO_NAME)
    }

    pub fn is_named(&self, id: u16) -> bool {
        self.names[id as usize].is_some()
    }

    /// count of explicitly named tiles
    pub fn named(&self) -> usize {
        self.names.iter().filter(|n| n.is_some()).count()
    }
}

impl fmt::Debug for TileNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileNames").field("named", &self.named()).finish()
    }
}

impl Default for TileNames {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for TileNames {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.named()))?;
        for (id, name) in self.names.iter().enumerate() {
            if let Some(name) = name {
                map.serialize_entry(&id, name)?;
            }
        }
        map.end()
    }
}
