use std::collections::BTreeMap;
use log::info;


/// Receives decoded textures. Colors come from `Palette::color`,
/// `pixels.len() == width * width`, row-major from the top left corner.
pub trait TextureSink {
    fn submit_tile_texture(&mut self, width: u32, pixels: &[u32], slot: u32);
}

/// Called synchronously at progress milestones so a loading screen can redraw.
pub trait ScreenRefresh {
    fn refresh(&mut self, progress: f32);
}


/// Drops every texture.
#[derive(Debug, Default)]
pub struct DiscardTextures;

impl TextureSink for DiscardTextures {
    fn submit_tile_texture(&mut self, _width: u32, _pixels: &[u32], _slot: u32) {}
}


/// Keeps every submitted texture in memory, by slot.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: BTreeMap<u32, (u32, Vec<u32>)>,
}

impl TextureStore {
    pub fn get(&self, slot: u32) -> Option<(u32, &[u32])> {
        self.textures.get(&slot).map(|(w, p)| (*w, p.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// (slot, width, pixels) in slot order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &[u32])> {
        self.textures.iter().map(|(&slot, (w, p))| (slot, *w, p.as_slice()))
    }
}

impl TextureSink for TextureStore {
    fn submit_tile_texture(&mut self, width: u32, pixels: &[u32], slot: u32) {
        self.textures.insert(slot, (width, pixels.to_vec()));
    }
}


/// Does nothing on refresh.
#[derive(Debug, Default)]
pub struct NoRefresh;

impl ScreenRefresh for NoRefresh {
    fn refresh(&mut self, _progress: f32) {}
}


/// Reports loading progress through the log.
#[derive(Debug, Default)]
pub struct LogRefresh;

impl ScreenRefresh for LogRefresh {
    fn refresh(&mut self, progress: f32) {
        info!("loading assets... {:.0}%", progress * 100.0);
    }
}
