pub mod tags;
pub mod collaborators;
pub mod assets;
pub mod dispatcher;

use std::time::Instant;
use log::{info, trace};

use crate::config::{Access, LoaderConfig};
use crate::dta::{ByteCursor, Palette, Result};

pub use assets::{AssetTables, LoadStats};
pub use collaborators::{DiscardTextures, LogRefresh, NoRefresh, ScreenRefresh, TextureSink, TextureStore};
pub use dispatcher::{DispatchState, Dispatcher};
pub use tags::ChunkTag;


/// Opens the configured archive and runs the dispatcher over it.
pub fn load_archive(
    config: &LoaderConfig,
    textures: &mut dyn TextureSink,
    refresh: &mut dyn ScreenRefresh,
) -> Result<AssetTables> {
    trace!("load_archive");
    let start = Instant::now();

    let palette = match &config.palette {
        Some(path) => Palette::read(path)?,
        None => Palette::for_variant(config.variant),
    };

    let cursor = match config.access {
        Access::Preload => ByteCursor::preload(&config.archive, config.byte_order)?,
        Access::Stream => ByteCursor::open(&config.archive, config.byte_order)?,
    };
    info!("loading {:?} ({:?}), {} bytes", config.archive, config.variant, cursor.len());

    let tables = Dispatcher::new(cursor, config.variant, palette, textures, refresh).run()?;
    info!("loaded in {:?}", start.elapsed());
    Ok(tables)
}
