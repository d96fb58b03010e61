use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;
use log::{debug, error, info, LevelFilter};

use dta_loader_lib::config::LoaderConfig;
use dta_loader_lib::export::{dump_json, export_textures};
use dta_loader_lib::loader::{load_archive, DiscardTextures, LogRefresh, TextureSink, TextureStore};
use dta_loader_lib::Result;

use clap::{arg, ArgAction, ArgMatches, Command, command};
use clap::parser::ValueSource;
use simplelog::{ColorChoice, CombinedLogger, TerminalMode, TermLogger, WriteLogger, Config};


fn run_loader(matches: &ArgMatches) -> Result<()> {
    let start = Instant::now();
    let config = LoaderConfig::from_matches(matches);
    debug!("{config:?}");

    let export_dir = matches.get_one::<String>("export-tiles");
    let mut store = TextureStore::default();
    let mut discard = DiscardTextures;
    let textures: &mut dyn TextureSink = if export_dir.is_some() { &mut store } else { &mut discard };

    let tables = load_archive(&config, textures, &mut LogRefresh)?;

    if let Some(dir) = export_dir {
        export_textures(&store, Path::new(dir))?;
    }
    if let Some(file_name) = matches.get_one::<String>("dump-json") {
        dump_json(&tables, Path::new(file_name))?;
    }

    if tables.stats.truncated {
        info!("archive has no ENDF, tables may be incomplete");
    }
    println!("{}", tables.summary());
    info!("done in {:?}", start.elapsed());
    Ok(())
}


fn cli() -> Command {
    command!()
        .next_line_help(true)
        .arg(
            arg!([ARCHIVE])
                .help("Archive to load, defaults to the file the selected game ships with")
        )
        .arg(
            arg!(--variant <VARIANT>)
                .required(false)
                .default_value("yoda")
                .value_parser(["yoda", "indy"])
                .action(ArgAction::Set)
        )
        .arg(
            arg!(--demo)
                .action(ArgAction::SetTrue)
                .help("Defaults to the demo archive")
        )
        .arg(
            arg!(--stream)
                .action(ArgAction::SetTrue)
                .help("Reads through the file handle instead of preloading the archive")
        )
        .arg(
            arg!(--"big-endian")
                .action(ArgAction::SetTrue)
                .help("Archive fields are stored big-endian")
        )
        .arg(
            arg!(--palette <FILE>)
                .required(false)
                .action(ArgAction::Set)
                .help("Raw 1024 byte BGRA palette replacing the built-in one")
        )
        .arg(
            arg!(--"export-tiles" <DIR>)
                .required(false)
                .action(ArgAction::Set)
                .help("Writes every decoded texture as PNG into DIR")
        )
        .arg(
            arg!(--"dump-json" <FILE>)
                .required(false)
                .action(ArgAction::Set)
                .help("Writes the decoded tables as JSON")
        )
        .arg(
            arg!(--loglevel <LEVEL>)
                .required(false)
                .default_value("info")
                .value_parser(["trace", "debug", "info", "warn", "error", "off" ])
                .action(ArgAction::Set)
        )
        .arg(
            arg!(--logfile [FILE_NAME])
                .required(false)
                .default_value("dta_loader.log")
                .action(ArgAction::Set)
                .help("Enables logging to a file. Disabled by default")
        )
        .arg(
            arg!(-q --quiet)
                .required(false)
                .action(ArgAction::SetTrue)
                .help("Disables output to the terminal")
        )
}


fn initialize_logging(matches: &ArgMatches) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let loglevel = match matches.get_one::<String>("loglevel") {
        None => LevelFilter::Off,
        Some(level) => {
            match level.as_str() {
                "trace" => LevelFilter::Trace,
                "debug" => LevelFilter::Debug,
                "info" => LevelFilter::Info,
                "warn" => LevelFilter::Warn,
                "error" => LevelFilter::Error,
                "off" => LevelFilter::Off,
                _ => unreachable!(),
            }
        }
    };
    let quiet = matches.get_flag("quiet");
    let term_loglevel = if quiet { LevelFilter::Off } else { loglevel };

    let logfile = match (matches.value_source("logfile"), matches.get_one::<String>("logfile")) {
        (Some(ValueSource::CommandLine), Some(file_name)) => {
            Some(file_name)
        },
        _ => None,
    };

    if let Some(logfile) = logfile {
        CombinedLogger::init(
            vec![
                TermLogger::new(term_loglevel, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
                WriteLogger::new(loglevel, Config::default(), File::create(logfile)?)
            ]
        ).map_err(|e| e.to_string())?;
    } else {
        TermLogger::init(term_loglevel, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    if let Err(e) = initialize_logging(&matches) {
        eprintln!("unable to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_loader(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
