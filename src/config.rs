use std::path::PathBuf;
use clap::ArgMatches;
use crate::dta::{ByteOrder, GameVariant};


/// How the archive bytes are reached.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Access {
    /// read the whole file into memory first
    #[default]
    Preload,
    /// keep the file open and seek on it for every read
    Stream,
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub archive: PathBuf,
    pub variant: GameVariant,
    pub demo: bool,
    pub access: Access,
    pub byte_order: ByteOrder,
    /// 1024 byte BGRA table replacing the built-in palette
    pub palette: Option<PathBuf>,
}

impl LoaderConfig {
    /// Config for the variant's default archive in the working directory.
    pub fn new(variant: GameVariant, demo: bool) -> Self {
        Self {
            archive: PathBuf::from(variant.default_archive(demo)),
            variant,
            demo,
            access: Access::default(),
            byte_order: ByteOrder::default(),
            palette: None,
        }
    }

    pub fn with_archive(mut self, archive: impl Into<PathBuf>) -> Self {
        self.archive = archive.into();
        self
    }

    /// Reads the loader options out of parsed command line arguments.
    ///
    /// Expects the ids `ARCHIVE`, `variant`, `demo`, `stream`, `big-endian` and `palette`.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let variant = match matches.get_one::<String>("variant").map(String::as_str) {
            Some("indy") => GameVariant::Indy,
            _ => GameVariant::Yoda,
        };
        let demo = matches.get_flag("demo");

        let mut config = Self::new(variant, demo);
        if let Some(archive) = matches.get_one::<String>("ARCHIVE") {
            config.archive = PathBuf::from(archive);
        }
        if matches.get_flag("stream") {
            config.access = Access::Stream;
        }
        if matches.get_flag("big-endian") {
            config.byte_order = ByteOrder::Big;
        }
        config.palette = matches.get_one::<String>("palette").map(PathBuf::from);

        config
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::{arg, ArgAction, Command};

    fn command() -> Command {
        Command::new("test")
            .arg(arg!([ARCHIVE]))
            .arg(arg!(--variant <VARIANT>).default_value("yoda").value_parser(["yoda", "indy"]))
            .arg(arg!(--demo).action(ArgAction::SetTrue))
            .arg(arg!(--stream).action(ArgAction::SetTrue))
            .arg(arg!(--"big-endian").action(ArgAction::SetTrue))
            .arg(arg!(--palette <FILE>).required(false))
    }

    #[test]
    fn defaults_follow_the_variant() {
        let config = LoaderConfig::from_matches(&command().get_matches_from(["test"]));
        assert_eq!(config, LoaderConfig::new(GameVariant::Yoda, false));
        assert_eq!(config.archive, PathBuf::from("YODESK.DTA"));

        let config = LoaderConfig::from_matches(&command().get_matches_from(["test", "--variant", "yoda", "--demo"]));
        assert_eq!(config.archive, PathBuf::from("YodaDemo.dta"));

        let config = LoaderConfig::from_matches(&command().get_matches_from(["test", "--variant", "indy"]));
        assert_eq!(config.archive, PathBuf::from("DESKTOP.DAW"));
        assert_eq!(config.variant, GameVariant::Indy);
    }

    #[test]
    fn explicit_options() {
        let matches = command().get_matches_from([
            "test", "data/game.dta", "--stream", "--big-endian", "--palette", "pal.bin",
        ]);
        let config = LoaderConfig::from_matches(&matches);
        assert_eq!(config.archive, PathBuf::from("data/game.dta"));
        assert_eq!(config.access, Access::Stream);
        assert_eq!(config.byte_order, ByteOrder::Big);
        assert_eq!(config.palette, Some(PathBuf::from("pal.bin")));
    }
}
