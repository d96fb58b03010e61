use std::fs::File;
use std::io::Write;
use std::path::Path;
use log::{info, trace};
use crate::dta::{Error, Result};
use crate::loader::AssetTables;


pub fn tables_to_json(tables: &AssetTables) -> Result<String> {
    serde_json::to_string_pretty(tables).map_err(|e| Error::Export {
        what: String::from("asset tables"),
        message: e.to_string(),
    })
}


/// Writes the decoded tables as pretty printed JSON.
pub fn dump_json(tables: &AssetTables, path: &Path) -> Result<()> {
    trace!("dump_json");
    let state = tables_to_json(tables)?;

    let mut file = File::create(path)?;
    file.write_all(state.as_bytes())?;
    info!("tables written to {path:?}");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::dta::GameVariant;

    #[test]
    fn json_carries_tables_and_stats() {
        let mut tables = AssetTables::new(GameVariant::Indy);
        tables.version = Some(0x200);
        tables.zones.allocate(2);
        tables.tile_names.set(7, String::from("Rock"));
        tables.stats.resyncs = 3;

        let value: serde_json::Value = serde_json::from_str(&tables_to_json(&tables).unwrap()).unwrap();
        assert_eq!(value["variant"], "Indy");
        assert_eq!(value["version"], 0x200);
        assert_eq!(value["stats"]["resyncs"], 3);
        assert_eq!(value["tile_names"]["7"], "Rock");
        assert_eq!(value["zones"].as_array().map(|z| z.len()), Some(2));
    }

    #[test]
    fn dump_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.json");
        dump_json(&AssetTables::new(GameVariant::Yoda), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"variant\": \"Yoda\""));
    }
}
