use serde::Serialize;
use crate::dta::{CharacterTable, GameVariant, PuzzleTable, SoundNames, TileNames, TileTable, ZoneEntry, ZoneTable};


/// Things the dispatcher absorbed instead of failing.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// known chunks dispatched, ENDF excluded
    pub chunks: u32,
    /// unknown tags that started a resync scan
    pub resyncs: u32,
    /// bytes skipped by those scans
    pub skipped_bytes: u64,
    /// ids pointing at zones, characters or sounds that were never decoded
    pub dangling_references: u32,
    /// tiles past the texture slot range, decoded but not submitted
    pub untextured_tiles: u32,
    /// the archive ran out before ENDF
    pub truncated: bool,
}


/// Stores every table decoded from one archive.
/// Handed out only after the load finished successfully.
#[derive(Debug, Serialize)]
pub struct AssetTables {
    pub variant: GameVariant,
    /// VERS value, advisory
    pub version: Option<u32>,
    pub startup_image: bool,
    pub zones: ZoneTable,
    pub tiles: TileTable,
    pub tile_names: TileNames,
    pub characters: CharacterTable,
    pub puzzles: PuzzleTable,
    pub sounds: SoundNames,
    pub stats: LoadStats,
}

impl AssetTables {
    pub fn new(variant: GameVariant) -> Self {
        Self {
            variant,
            version: None,
            startup_image: false,
            zones: ZoneTable::default(),
            tiles: TileTable::default(),
            tile_names: TileNames::new(),
            characters: CharacterTable::default(),
            puzzles: PuzzleTable::default(),
            sounds: SoundNames::default(),
            stats: LoadStats::default(),
        }
    }

    /// count of maps declared by the ZONE chunk
    pub fn map_count(&self) -> usize {
        self.zones.len()
    }

    /// 0-based zone access for the map loader
    pub fn zone(&self, index: usize) -> Option<&ZoneEntry> {
        self.zones.get(index)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} maps, {} tiles ({} named), {} characters, {} puzzles, {} sounds; {} chunks, {} resyncs ({} bytes skipped), {} dangling references",
            self.map_count(),
            self.tiles.len(),
            self.tile_names.named(),
            self.characters.len(),
            self.puzzles.len(),
            self.sounds.len(),
            self.stats.chunks,
            self.stats.resyncs,
            self.stats.skipped_bytes,
            self.stats.dangling_references,
        )
    }
}
