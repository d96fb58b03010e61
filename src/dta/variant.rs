use serde::Serialize;


/// The two sibling archive layouts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum GameVariant {
    /// Yoda Stories, `YODESK.DTA`
    Yoda,
    /// Indiana Jones' Desktop Adventures, `DESKTOP.DAW`
    Indy,
}

impl GameVariant {
    pub fn layout(self) -> &'static VariantLayout {
        match self {
            GameVariant::Yoda => &YODA_LAYOUT,
            GameVariant::Indy => &INDY_LAYOUT,
        }
    }

    /// archive name the game ships with
    pub fn default_archive(self, demo: bool) -> &'static str {
        match (self, demo) {
            (GameVariant::Yoda, true) => "YodaDemo.dta",
            (GameVariant::Yoda, false) => "YODESK.DTA",
            (GameVariant::Indy, _) => "DESKTOP.DAW",
        }
    }
}


/// Field order of the ZONE header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ZoneHeader {
    /// u16 count, u16 unknown, u32 length
    CountFirst,
    /// u32 length, u16 count
    LengthFirst,
}


/// Everything that differs between the variants, resolved once per load.
#[derive(Debug)]
pub struct VariantLayout {
    pub variant: GameVariant,

    pub zone_header: ZoneHeader,
    /// bytes from the ZONE tag to the first byte after its header
    pub zone_header_size: u64,

    /// IZAX moves the current zone forward after recording its offset
    pub izax_advances_zone: bool,
    /// the first IACT of a zone moves the current zone forward once its group was scanned
    pub iact_advances_zone: bool,
    /// IACT chunks carry a usable length, the dispatcher reseeks past them
    pub iact_has_length: bool,

    /// IPUZ carries a class for the second item
    pub puzzle_has_item_b_class: bool,
    /// IPUZ ends with a second item id
    pub puzzle_has_item_b: bool,

    /// size of one CHAR record including its id
    pub character_record_size: u64,

    /// width of a TNAM name, the entry is 2 bytes larger
    pub tile_name_width: usize,
}

impl VariantLayout {
    pub fn tile_name_entry_size(&self) -> u64 {
        self.tile_name_width as u64 + 2
    }
}


pub static YODA_LAYOUT: VariantLayout = VariantLayout {
    variant: GameVariant::Yoda,
    zone_header: ZoneHeader::CountFirst,
    zone_header_size: 12,
    izax_advances_zone: false,
    iact_advances_zone: false,
    iact_has_length: true,
    puzzle_has_item_b_class: true,
    puzzle_has_item_b: true,
    character_record_size: 0x54,
    tile_name_width: 24,
};

pub static INDY_LAYOUT: VariantLayout = VariantLayout {
    variant: GameVariant::Indy,
    zone_header: ZoneHeader::LengthFirst,
    zone_header_size: 10,
    izax_advances_zone: true,
    iact_advances_zone: true,
    iact_has_length: false,
    puzzle_has_item_b_class: false,
    puzzle_has_item_b: false,
    character_record_size: 0x4E,
    tile_name_width: 16,
};
