use std::fs;
use std::path::Path;
use log::trace;
use crate::dta::error::{Error, Result};
use crate::dta::variant::GameVariant;


/// 256 colors, 4 bytes each, stored B, G, R, unused
pub const PALETTE_SIZE: usize = 0x400;

// decoded color format is |31..24|23..16|15..8|7..0|
//                         |   A  |   B  |  G  |  R |
// so `to_le_bytes` of a color gives RGBA8, index 0 is the only transparent one

const BLUE_SHIFT: u32 = 16;
const GREEN_SHIFT: u32 = 8;
const RED_SHIFT: u32 = 0;
const OPAQUE: u32 = 0xFF00_0000;


/// Palette maps the indexed pixels of tiles and the startup screen to colors.
#[derive(Clone)]
pub struct Palette {
    entries: [u8; PALETTE_SIZE],
}

impl Palette {
    /// Palette used by the Indy archives.
    pub const fn indy() -> Self {
        Self { entries: INDY_PALETTE }
    }

    /// Palette used by the Yoda archives.
    ///
    /// No Yoda table ships with the loader, every entry is zero: all Yoda
    /// textures decode to opaque black (index 0 to transparent black).
    /// Load the game's palette with `Palette::read` to get real colors.
    pub const fn yoda() -> Self {
        Self { entries: YODA_PALETTE }
    }

    pub fn for_variant(variant: GameVariant) -> Self {
        match variant {
            GameVariant::Yoda => Self::yoda(),
            GameVariant::Indy => Self::indy(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let entries: [u8; PALETTE_SIZE] = bytes.try_into().ok()?;
        Some(Self { entries })
    }

    /// Loads a raw 1024 byte BGRA palette from disk.
    pub fn read(path: &Path) -> Result<Self> {
        trace!("Palette::read");
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes).ok_or_else(|| Error::Palette {
            path: path.to_path_buf(),
            found: bytes.len(),
        })
    }

    /// returns the color of a palette index, alpha is set for every index except 0
    pub fn color(&self, index: u8) -> u32 {
        let i = index as usize * 4;
        let color = ((self.entries[i] as u32) << BLUE_SHIFT)
            | ((self.entries[i + 1] as u32) << GREEN_SHIFT)
            | ((self.entries[i + 2] as u32) << RED_SHIFT);

        if index != 0 { color | OPAQUE } else { color }
    }

    pub fn decode_pixels(&self, indices: &[u8]) -> Vec<u32> {
        indices.iter().map(|&i| self.color(i)).collect()
    }
}

/// splits a decoded color into r, g, b, a
#[inline]
pub fn to_rgba(color: u32) -> [u8; 4] {
    color.to_le_bytes()
}


const YODA_PALETTE: [u8; PALETTE_SIZE] = [0; PALETTE_SIZE];

#[rustfmt::skip]
const INDY_PALETTE: [u8; PALETTE_SIZE] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc1, 0xcc, 0xd9, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, 0xd7, 0x00,
    0x00, 0x00, 0xb3, 0x00, 0x00, 0x00, 0x8b, 0x00, 0x00, 0x00, 0x67, 0x00, 0x00, 0x00, 0x43, 0x00,
    0xfb, 0xfb, 0xfb, 0x00, 0xe3, 0xe3, 0xe3, 0x00, 0xd3, 0xd3, 0xd3, 0x00, 0xc3, 0xc3, 0xc3, 0x00,
    0xb3, 0xb3, 0xb3, 0x00, 0xab, 0xab, 0xab, 0x00, 0x9b, 0x9b, 0x9b, 0x00, 0x8b, 0x8b, 0x8b, 0x00,
    0x7b, 0x7b, 0x7b, 0x00, 0x73, 0x73, 0x73, 0x00, 0x63, 0x63, 0x63, 0x00, 0x53, 0x53, 0x53, 0x00,
    0x4b, 0x4b, 0x4b, 0x00, 0x3b, 0x3b, 0x3b, 0x00, 0x2b, 0x2b, 0x2b, 0x00, 0x23, 0x23, 0x23, 0x00,
    0x00, 0xc7, 0x43, 0x00, 0x00, 0xb7, 0x3f, 0x00, 0x00, 0xab, 0x3f, 0x00, 0x00, 0x9f, 0x3b, 0x00,
    0x00, 0x93, 0x37, 0x00, 0x00, 0x87, 0x33, 0x00, 0x00, 0x7b, 0x33, 0x00, 0x00, 0x6f, 0x2f, 0x00,
    0x00, 0x63, 0x2b, 0x00, 0x00, 0x53, 0x23, 0x00, 0x00, 0x47, 0x1f, 0x00, 0x00, 0x37, 0x17, 0x00,
    0x00, 0x27, 0x0f, 0x00, 0x00, 0x1b, 0x0b, 0x00, 0x00, 0x0b, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x3b, 0xfb, 0x7b, 0x00, 0x6b, 0x7b, 0xc3, 0x00, 0x5b, 0x53, 0xab, 0x00, 0x53, 0x43, 0x93, 0x00,
    0x53, 0x2b, 0x7b, 0x00, 0x4b, 0x1b, 0x63, 0x00, 0x3b, 0x13, 0x3b, 0x00, 0xab, 0xd7, 0xff, 0x00,
    0x8f, 0xc3, 0xf3, 0x00, 0x73, 0xb3, 0xe7, 0x00, 0x5b, 0xa3, 0xdb, 0x00, 0x43, 0x97, 0xcf, 0x00,
    0x2f, 0x8b, 0xc3, 0x00, 0x1b, 0x7f, 0xb7, 0x00, 0x0b, 0x73, 0xaf, 0x00, 0x00, 0x6b, 0xa3, 0x00,
    0xeb, 0xff, 0xff, 0x00, 0xd7, 0xf3, 0xf3, 0x00, 0xc7, 0xe7, 0xe7, 0x00, 0xb7, 0xdb, 0xdb, 0x00,
    0xa3, 0xcf, 0xcf, 0x00, 0x97, 0xc3, 0xc3, 0x00, 0x7f, 0xb3, 0xb3, 0x00, 0x63, 0xa3, 0xa3, 0x00,
    0x4f, 0x93, 0x93, 0x00, 0x3b, 0x83, 0x83, 0x00, 0x2b, 0x73, 0x73, 0x00, 0x1b, 0x5f, 0x5f, 0x00,
    0x0f, 0x4f, 0x4f, 0x00, 0x07, 0x3f, 0x3f, 0x00, 0x00, 0x2f, 0x2f, 0x00, 0x00, 0x1f, 0x1f, 0x00,
    0x5b, 0xfb, 0xd3, 0x00, 0x43, 0xfb, 0xc3, 0x00, 0x23, 0xfb, 0xb3, 0x00, 0x00, 0xfb, 0xa3, 0x00,
    0x00, 0xe3, 0x93, 0x00, 0x00, 0xcb, 0x83, 0x00, 0x00, 0xb3, 0x73, 0x00, 0x00, 0x9b, 0x63, 0x00,
    0x00, 0x5b, 0x8b, 0x00, 0x00, 0x4f, 0x77, 0x00, 0x00, 0x43, 0x67, 0x00, 0x00, 0x37, 0x57, 0x00,
    0x00, 0x2f, 0x47, 0x00, 0x00, 0x23, 0x37, 0x00, 0x00, 0x17, 0x27, 0x00, 0x00, 0x0f, 0x17, 0x00,
    0x00, 0xfb, 0x4f, 0x00, 0x00, 0xef, 0x4b, 0x00, 0x00, 0xdf, 0x47, 0x00, 0x00, 0xd3, 0x47, 0x00,
    0x00, 0x9f, 0x67, 0x00, 0x00, 0x7f, 0x5b, 0x00, 0x00, 0x63, 0x43, 0x00, 0x00, 0x47, 0x27, 0x00,
    0x00, 0x2b, 0x1b, 0x00, 0x23, 0x23, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x8b, 0x37, 0xdb, 0x00, 0x77, 0x2b, 0xb3, 0x00,
    0xfb, 0xfb, 0xdb, 0x00, 0xfb, 0xfb, 0xbb, 0x00, 0xfb, 0xfb, 0x9b, 0x00, 0xfb, 0xfb, 0x7b, 0x00,
    0xfb, 0xfb, 0x5b, 0x00, 0xfb, 0xfb, 0x43, 0x00, 0xfb, 0xfb, 0x23, 0x00, 0xfb, 0xfb, 0x00, 0x00,
    0xe3, 0xe3, 0x00, 0x00, 0xcb, 0xcb, 0x00, 0x00, 0xb3, 0xb3, 0x00, 0x00, 0x9b, 0x9b, 0x00, 0x00,
    0x83, 0x83, 0x00, 0x00, 0x73, 0x73, 0x00, 0x00, 0x5b, 0x5b, 0x00, 0x00, 0x43, 0x43, 0x00, 0x00,
    0xff, 0xbf, 0x47, 0x00, 0xf7, 0xaf, 0x33, 0x00, 0xef, 0xa3, 0x1f, 0x00, 0xe7, 0x97, 0x0f, 0x00,
    0xe3, 0x8b, 0x00, 0x00, 0xcb, 0x7b, 0x00, 0x00, 0xb3, 0x6b, 0x00, 0x00, 0x9b, 0x5b, 0x00, 0x00,
    0x7b, 0x47, 0x00, 0x00, 0x5f, 0x37, 0x00, 0x00, 0x43, 0x27, 0x00, 0x00, 0x27, 0x17, 0x00, 0x00,
    0xfb, 0x63, 0x5b, 0x00, 0xfb, 0x43, 0x43, 0x00, 0xfb, 0x23, 0x23, 0x00, 0xfb, 0x00, 0x00, 0x00,
    0xfb, 0x00, 0x00, 0x00, 0xdb, 0x00, 0x00, 0x00, 0xc3, 0x00, 0x00, 0x00, 0xab, 0x00, 0x00, 0x00,
    0x8b, 0x00, 0x00, 0x00, 0x73, 0x00, 0x00, 0x00, 0x5b, 0x00, 0x00, 0x00, 0x43, 0x00, 0x00, 0x00,
    0xbf, 0xbb, 0xfb, 0x00, 0xaf, 0xab, 0xf7, 0x00, 0xa3, 0x9b, 0xf3, 0x00, 0x97, 0x8f, 0xef, 0x00,
    0x87, 0x7f, 0xeb, 0x00, 0x7f, 0x73, 0xe7, 0x00, 0x6b, 0x5b, 0xdf, 0x00, 0x47, 0x3b, 0xcb, 0x00,
    0xf7, 0xb3, 0x43, 0x00, 0xf7, 0xbb, 0x4f, 0x00, 0xf7, 0xc7, 0x5b, 0x00, 0xf7, 0xcf, 0x6b, 0x00,
    0xf7, 0xd7, 0x77, 0x00, 0xf7, 0xdf, 0x83, 0x00, 0xf7, 0xe7, 0x93, 0x00, 0xf7, 0xcf, 0x6b, 0x00,
    0x00, 0x43, 0xcb, 0x00, 0x00, 0x33, 0xbb, 0x00, 0x00, 0x23, 0xa3, 0x00, 0x00, 0x1b, 0x93, 0x00,
    0x00, 0x0b, 0x7b, 0x00, 0x00, 0x00, 0x6b, 0x00, 0x00, 0x00, 0x53, 0x00, 0x00, 0x00, 0x43, 0x00,
    0x00, 0xff, 0xff, 0x00, 0x00, 0xe3, 0xf7, 0x00, 0x00, 0xcf, 0xf3, 0x00, 0x00, 0xb7, 0xef, 0x00,
    0x00, 0xa3, 0xeb, 0x00, 0x00, 0x8b, 0xe7, 0x00, 0x00, 0x77, 0xdf, 0x00, 0x00, 0x63, 0xdb, 0x00,
    0x00, 0x4f, 0xd7, 0x00, 0x00, 0x3f, 0xd3, 0x00, 0x00, 0x2f, 0xcf, 0x00, 0x77, 0xc7, 0xe3, 0x00,
    0x6b, 0xb7, 0xdb, 0x00, 0x63, 0xa7, 0xd3, 0x00, 0x5b, 0x97, 0xcb, 0x00, 0x53, 0x8b, 0xc3, 0x00,
    0xdb, 0xeb, 0xfb, 0x00, 0xd3, 0xe3, 0xfb, 0x00, 0xc3, 0xdb, 0xfb, 0x00, 0xbb, 0xd3, 0xfb, 0x00,
    0xb3, 0xcb, 0xfb, 0x00, 0xa3, 0xc3, 0xfb, 0x00, 0x9b, 0xbb, 0xfb, 0x00, 0x8f, 0xb7, 0xfb, 0x00,
    0x83, 0xb3, 0xfb, 0x00, 0x73, 0xa3, 0xfb, 0x00, 0x63, 0x9b, 0xfb, 0x00, 0x5b, 0x93, 0xf3, 0x00,
    0x5b, 0x8b, 0xeb, 0x00, 0x53, 0x8b, 0xdb, 0x00, 0x53, 0x83, 0xd3, 0x00, 0x4b, 0x7b, 0xcb, 0x00,
    0x4b, 0x7b, 0xbb, 0x00, 0x43, 0x73, 0xb3, 0x00, 0x43, 0x6b, 0xab, 0x00, 0x3b, 0x63, 0xa3, 0x00,
    0x3b, 0x63, 0x9b, 0x00, 0x33, 0x5b, 0x93, 0x00, 0x33, 0x5b, 0x8b, 0x00, 0x2b, 0x53, 0x83, 0x00,
    0x2b, 0x4b, 0x73, 0x00, 0x23, 0x4b, 0x6b, 0x00, 0x23, 0x43, 0x5b, 0x00, 0x1b, 0x3b, 0x53, 0x00,
    0x1b, 0x3b, 0x4b, 0x00, 0x1b, 0x33, 0x43, 0x00, 0x13, 0x2b, 0x3b, 0x00, 0x0b, 0x23, 0x2b, 0x00,
    0x00, 0xab, 0x6f, 0x00, 0x00, 0xa3, 0x6b, 0x00, 0x00, 0x9f, 0x67, 0x00, 0x00, 0xa3, 0x6b, 0x00,
    0x00, 0xab, 0x6f, 0x00, 0xe7, 0x93, 0x07, 0x00, 0xe7, 0x97, 0x0f, 0x00, 0xeb, 0x9f, 0x17, 0x00,
    0xef, 0xa3, 0x23, 0x00, 0xf3, 0xab, 0x2b, 0x00, 0xf7, 0xb3, 0x37, 0x00, 0xef, 0xa7, 0x27, 0x00,
    0xeb, 0x9f, 0x1b, 0x00, 0xe7, 0x97, 0x0f, 0x00, 0x0b, 0xcb, 0xfb, 0x00, 0x0b, 0xa3, 0xfb, 0x00,
    0x0b, 0x73, 0xfb, 0x00, 0x0b, 0x4b, 0xfb, 0x00, 0x0b, 0x23, 0xfb, 0x00, 0x0b, 0x73, 0xfb, 0x00,
    0x00, 0x13, 0x93, 0x00, 0x00, 0x0b, 0xd3, 0x00, 0x00, 0x00, 0x00, 0x00, 0x83, 0x99, 0xb1, 0x00,
    0x4f, 0x65, 0x7d, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0x00,
];


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_zero_is_transparent() {
        for palette in [Palette::indy(), Palette::yoda()] {
            assert_eq!(palette.color(0) >> 24, 0);
            for index in 1..=255u8 {
                assert_eq!(palette.color(index) >> 24, 0xFF, "index {index}");
            }
        }
    }

    #[test]
    fn bgra_entries_become_rgba() {
        let mut bytes = [0u8; PALETTE_SIZE];
        bytes[4..8].copy_from_slice(&[0x10, 0x20, 0x30, 0x00]);
        let palette = Palette::from_bytes(&bytes).unwrap();

        assert_eq!(palette.color(1), 0xFF10_2030);
        assert_eq!(to_rgba(palette.color(1)), [0x30, 0x20, 0x10, 0xFF]);
    }

    #[test]
    fn indy_table_is_not_blank() {
        let palette = Palette::indy();
        assert_eq!(to_rgba(palette.color(255)), [0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(to_rgba(palette.color(7)), [0xD9, 0xCC, 0xC1, 0xFF]);
    }

    #[test]
    fn built_in_yoda_table_is_black() {
        let yoda = Palette::yoda();
        assert_eq!(yoda.color(0), 0);
        for index in 1..=255u8 {
            assert_eq!(to_rgba(yoda.color(index)), [0, 0, 0, 0xFF]);
        }
    }

    #[test]
    fn wrong_size_is_rejected() {
        assert!(Palette::from_bytes(&[0; 12]).is_none());
        assert!(Palette::from_bytes(&[0; PALETTE_SIZE]).is_some());
    }

    #[test]
    fn decode_keeps_pixel_order() {
        let palette = Palette::indy();
        let pixels = palette.decode_pixels(&[0, 255, 0]);
        assert_eq!(pixels, vec![palette.color(0), palette.color(255), palette.color(0)]);
    }
}
