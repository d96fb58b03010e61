pub mod tiles;
pub mod json;

pub use tiles::{export_textures, texture_image};
pub use json::{dump_json, tables_to_json};
