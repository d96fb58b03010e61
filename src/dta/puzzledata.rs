use std::collections::BTreeMap;
use serde::Serialize;
use crate::dta::dtareader::{decode_text, ByteCursor};
use crate::dta::error::Result;
use crate::dta::variant::VariantLayout;


#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleRecord {
    pub id: u16,
    /// length field of the IPUZ chunk
    pub length: u32,
    pub kind: u32,
    pub item_a_class: u32,
    pub item_b_class: Option<u32>,
    pub unknown: u16,
    pub texts: [String; 4],
    /// length-prefixed block after the texts, kept raw
    pub trailing: Vec<u8>,
    pub item_a: u16,
    pub item_b: Option<u16>,
}

impl PuzzleRecord {
    /// Reads an IPUZ payload starting right after its tag.
    pub fn read(c: &mut ByteCursor, layout: &VariantLayout, id: u16) -> Result<Self> {
        let length = c.read_u32()?;
        let kind = c.read_u32()?;
        let item_a_class = c.read_u32()?;
        let item_b_class = if layout.puzzle_has_item_b_class { Some(c.read_u32()?) } else { None };
        let unknown = c.read_u16()?;

        let texts = [
            decode_text(&c.read_prefixed_bytes()?),
            decode_text(&c.read_prefixed_bytes()?),
            decode_text(&c.read_prefixed_bytes()?),
            decode_text(&c.read_prefixed_bytes()?),
        ];
        let trailing = c.read_prefixed_bytes()?;

        let item_a = c.read_u16()?;
        let item_b = if layout.puzzle_has_item_b { Some(c.read_u16()?) } else { None };

        Ok(Self { id, length, kind, item_a_class, item_b_class, unknown, texts, trailing, item_a, item_b })
    }
}


/// Puzzles by id, created by PUZ2 and filled by IPUZ.
#[derive(Debug, Default, Serialize)]
pub struct PuzzleTable {
    puzzles: BTreeMap<u16, PuzzleRecord>,
    /// number of IPUZ chunks decoded, duplicates included
    pub decoded: u32,
}

impl PuzzleTable {
    pub fn insert(&mut self, record: PuzzleRecord) {
        self.decoded += 1;
        self.puzzles.insert(record.id, record);
    }

    pub fn get(&self, id: u16) -> Option<&PuzzleRecord> {
        self.puzzles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PuzzleRecord> {
        self.puzzles.values()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::dta::dtareader::ByteOrder;
    use crate::dta::variant::GameVariant;

    fn prefixed(b: &mut Vec<u8>, s: &[u8]) {
        b.extend_from_slice(&(s.len() as u16).to_le_bytes());
        b.extend_from_slice(s);
    }

    fn payload(yoda: bool) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&0x40u32.to_le_bytes());
        b.extend_from_slice(&1u32.to_le_bytes());
        b.extend_from_slice(&2u32.to_le_bytes());
        if yoda {
            b.extend_from_slice(&3u32.to_le_bytes());
        }
        b.extend_from_slice(&4u16.to_le_bytes());
        prefixed(&mut b, b"Bring me the");
        prefixed(&mut b, b"thanks");
        prefixed(&mut b, b"");
        prefixed(&mut b, b"hint\0");
        prefixed(&mut b, &[0, 0]);
        b.extend_from_slice(&0x1A2u16.to_le_bytes());
        if yoda {
            b.extend_from_slice(&0x1A3u16.to_le_bytes());
        }
        b
    }

    #[test]
    fn yoda_record() {
        let mut c = ByteCursor::from_bytes(payload(true), ByteOrder::Little);
        let p = PuzzleRecord::read(&mut c, GameVariant::Yoda.layout(), 9).unwrap();
        assert_eq!(p.id, 9);
        assert_eq!(p.length, 0x40);
        assert_eq!(p.item_b_class, Some(3));
        assert_eq!(p.unknown, 4);
        assert_eq!(p.texts[0], "Bring me the");
        assert_eq!(p.texts[2], "");
        assert_eq!(p.texts[3], "hint");
        assert_eq!(p.trailing, vec![0, 0]);
        assert_eq!(p.item_a, 0x1A2);
        assert_eq!(p.item_b, Some(0x1A3));
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn indy_record() {
        let mut c = ByteCursor::from_bytes(payload(false), ByteOrder::Little);
        let p = PuzzleRecord::read(&mut c, GameVariant::Indy.layout(), 1).unwrap();
        assert_eq!(p.item_b_class, None);
        assert_eq!(p.item_b, None);
        assert_eq!(p.item_a, 0x1A2);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn truncated_text_fails() {
        let mut bytes = payload(true);
        bytes.truncate(20);
        let mut c = ByteCursor::from_bytes(bytes, ByteOrder::Little);
        assert!(PuzzleRecord::read(&mut c, GameVariant::Yoda.layout(), 0).unwrap_err().is_out_of_bounds());
    }
}
