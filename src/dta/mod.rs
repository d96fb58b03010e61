pub mod error;
pub mod dtareader;
pub mod variant;
pub mod palette;
pub mod zonedata;
pub mod tiledata;
pub mod chardata;
pub mod puzzledata;
pub mod sounddata;


/// end-of-list id in HTSP, CHWP, CAUX and TNAM
pub const SENTINEL_ID: u16 = 0xFFFF;

/// what name tables return for ids nobody assigned
pub const NO_NAME: &str = "NO NAME";


pub use error::{Error, Result};
pub use dtareader::{ByteCursor, ByteOrder};
pub use variant::{GameVariant, VariantLayout};
pub use palette::Palette;
pub use zonedata::{ZoneCursor, ZoneEntry, ZoneTable};
pub use tiledata::{TileFlags, TileNames, TileRecord, TileTable};
pub use chardata::{AmbientDamage, CharacterRecord, CharacterTable, WeaponAssignment};
pub use puzzledata::{PuzzleRecord, PuzzleTable};
pub use sounddata::SoundNames;
