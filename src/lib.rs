pub mod config;
pub mod dta;
pub mod loader;
pub mod export;

pub use config::{Access, LoaderConfig};
pub use dta::{Error, GameVariant, Result};
pub use loader::{load_archive, AssetTables, LoadStats};
