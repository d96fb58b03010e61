/// Every chunk tag the dispatcher knows. Anything else triggers a resync scan.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChunkTag {
    Vers,   // VERSion
    Stup,   // STartUP screen
    Zone,   // ZONEs (maps)
    Izon,   // Index of ZONE
    Zaux,   // Zone AUXiliary
    Izax,
    Zax2,
    Izx2,
    Zax3,
    Izx3,
    Zax4,
    Izx4,
    Htsp,   // HoTSPots
    Actn,   // ACTioNs
    Iact,
    Snds,   // SouNDS
    Tile,
    Puz2,   // puzzles
    Ipuz,
    Char,   // CHARacters
    Chwp,   // CHaracter WeaPons
    Caux,   // Character AUXiliary
    Anam,   // Action NAMes
    Pnam,   // Puzzle NAMes
    Tnam,   // Tile NAMes
    Endf,   // END of File
}

impl ChunkTag {
    /// Exact, case sensitive match.
    pub fn from_bytes(tag: &[u8; 4]) -> Option<Self> {
        let tag = match tag {
            b"VERS" => ChunkTag::Vers,
            b"STUP" => ChunkTag::Stup,
            b"ZONE" => ChunkTag::Zone,
            b"IZON" => ChunkTag::Izon,
            b"ZAUX" => ChunkTag::Zaux,
            b"IZAX" => ChunkTag::Izax,
            b"ZAX2" => ChunkTag::Zax2,
            b"IZX2" => ChunkTag::Izx2,
            b"ZAX3" => ChunkTag::Zax3,
            b"IZX3" => ChunkTag::Izx3,
            b"ZAX4" => ChunkTag::Zax4,
            b"IZX4" => ChunkTag::Izx4,
            b"HTSP" => ChunkTag::Htsp,
            b"ACTN" => ChunkTag::Actn,
            b"IACT" => ChunkTag::Iact,
            b"SNDS" => ChunkTag::Snds,
            b"TILE" => ChunkTag::Tile,
            b"PUZ2" => ChunkTag::Puz2,
            b"IPUZ" => ChunkTag::Ipuz,
            b"CHAR" => ChunkTag::Char,
            b"CHWP" => ChunkTag::Chwp,
            b"CAUX" => ChunkTag::Caux,
            b"ANAM" => ChunkTag::Anam,
            b"PNAM" => ChunkTag::Pnam,
            b"TNAM" => ChunkTag::Tnam,
            b"ENDF" => ChunkTag::Endf,
            _ => return None,
        };
        Some(tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChunkTag::Vers => "VERS",
            ChunkTag::Stup => "STUP",
            ChunkTag::Zone => "ZONE",
            ChunkTag::Izon => "IZON",
            ChunkTag::Zaux => "ZAUX",
            ChunkTag::Izax => "IZAX",
            ChunkTag::Zax2 => "ZAX2",
            ChunkTag::Izx2 => "IZX2",
            ChunkTag::Zax3 => "ZAX3",
            ChunkTag::Izx3 => "IZX3",
            ChunkTag::Zax4 => "ZAX4",
            ChunkTag::Izx4 => "IZX4",
            ChunkTag::Htsp => "HTSP",
            ChunkTag::Actn => "ACTN",
            ChunkTag::Iact => "IACT",
            ChunkTag::Snds => "SNDS",
            ChunkTag::Tile => "TILE",
            ChunkTag::Puz2 => "PUZ2",
            ChunkTag::Ipuz => "IPUZ",
            ChunkTag::Char => "CHAR",
            ChunkTag::Chwp => "CHWP",
            ChunkTag::Caux => "CAUX",
            ChunkTag::Anam => "ANAM",
            ChunkTag::Pnam => "PNAM",
            ChunkTag::Tnam => "TNAM",
            ChunkTag::Endf => "ENDF",
        }
    }
}

/// first byte of anything that may start a tag
#[inline]
pub fn is_tag_start(b: u8) -> bool {
    b.is_ascii_uppercase()
}
