use std::collections::BTreeMap;
use serde::Serialize;
use crate::dta::dtareader::ByteCursor;
use crate::dta::error::Result;


pub const CHARACTER_NAME_WIDTH: usize = 0x10;
pub const CHARACTER_FRAMES: usize = 26;

/// shown in place of a character id that has no record
pub const MISSING_CHARACTER: &str = "<missing character>";

const FLAG_WEAPON: u32 = 0x0000_0004;


#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterRecord {
    pub id: u16,
    pub magic: u32,
    pub length: u32,
    pub name: String,
    pub flags: u32,
    pub misc_a: u16,
    pub misc_b: u32,
    pub frames: [u16; CHARACTER_FRAMES],
}

impl CharacterRecord {
    /// Reads the fields that follow the id, `end` is where the record stops.
    /// Frames that do not fit before `end` stay 0.
    pub fn read(c: &mut ByteCursor, id: u16, end: u64) -> Result<Self> {
        let magic = c.read_u32()?;
        let length = c.read_u32()?;
        let name = c.read_fixed_string(CHARACTER_NAME_WIDTH)?;
        let flags = c.read_u32()?;
        let misc_a = c.read_u16()?;
        let misc_b = c.read_u32()?;

        let mut frames = [0; CHARACTER_FRAMES];
        for frame in frames.iter_mut() {
            if c.position() + 2 > end {
                break;
            }
            *frame = c.read_u16()?;
        }

        Ok(Self { id, magic, length, name, flags, misc_a, misc_b, frames })
    }

    pub fn is_weapon(&self) -> bool {
        self.flags & FLAG_WEAPON != 0
    }
}


/// CHWP entry: which weapon a character carries, for weapons the second id is a sound.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct WeaponAssignment {
    pub character: u16,
    pub reference: u16,
    pub health: u16,
}

/// CAUX entry
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct AmbientDamage {
    pub character: u16,
    pub damage: u16,
}


/// Characters by id. Ids are read per record and may be sparse.
#[derive(Debug, Default, Serialize)]
pub struct CharacterTable {
    characters: BTreeMap<u16, CharacterRecord>,
    pub weapons: Vec<WeaponAssignment>,
    pub ambient_damage: Vec<AmbientDamage>,
}

impl CharacterTable {
    pub fn insert(&mut self, record: CharacterRecord) {
        self.characters.insert(record.id, record);
    }

    pub fn get(&self, id: u16) -> Option<&CharacterRecord> {
        self.characters.get(&id)
    }

    /// name of a character, `MISSING_CHARACTER` for ids without a record
    pub fn name(&self, id: u16) -> &str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or(MISSING_CHARACTER)
    }

    /// false for ids without a record
    pub fn is_weapon(&self, id: u16) -> bool {
        self.get(id).map(|c| c.is_weapon()).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterRecord> {
        self.characters.values()
    }
}
