use std::fs;
use std::path::{Path, PathBuf};
use image::{ImageBuffer, Rgba, RgbaImage};
use log::{debug, info, trace};
use crate::dta::palette::to_rgba;
use crate::dta::tiledata::STARTUP_TEXTURE_SLOT;
use crate::dta::{Error, Result};
use crate::loader::TextureStore;


/// Builds an image from a submitted texture, `None` when the pixel count does not match the width.
pub fn texture_image(width: u32, pixels: &[u32]) -> Option<RgbaImage> {
    if pixels.len() != (width * width) as usize {
        return None;
    }

    let mut image = ImageBuffer::new(width, width);
    for (i, &color) in pixels.iter().enumerate() {
        let px = i as u32 % width;
        let py = i as u32 / width;
        image.put_pixel(px, py, Rgba(to_rgba(color)));
    }
    Some(image)
}


fn texture_file_name(slot: u32) -> String {
    if slot == STARTUP_TEXTURE_SLOT {
        String::from("startup.png")
    } else {
        format!("tile_{slot:04}.png")
    }
}


/// Writes every texture of the store as PNG into `dir`, creating it when missing.
/// Returns the written paths in slot order.
pub fn export_textures(store: &TextureStore, dir: &Path) -> Result<Vec<PathBuf>> {
    trace!("export_textures");
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(store.len());
    for (slot, width, pixels) in store.iter() {
        let path = dir.join(texture_file_name(slot));
        let image = texture_image(width, pixels).ok_or_else(|| Error::Export {
            what: path.display().to_string(),
            message: format!("{} pixels for width {width}", pixels.len()),
        })?;

        image.save(&path).map_err(|e| Error::Export {
            what: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("slot {slot:#x} written to {path:?}");
        written.push(path);
    }

    info!("{} textures exported to {dir:?}", written.len());
    Ok(written)
}
