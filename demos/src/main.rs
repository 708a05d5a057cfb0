// SPDX-License-Identifier: Apache-2.0

//! Prints the elements of a document's root array, or the members of its
//! root object, one per line. Each element is decoded only when reached.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::LevelFilter;
use stajson::{
    ArrayView, CursorConfig, DecodeContext, Event, ObjectView, SliceCursor, StajError,
    TokenStream, Value, DEFAULT_MAX_DEPTH,
};

#[derive(Parser)]
#[command(name = "staj-demo", version)]
#[command(about = "Lazily iterate the root container of a JSON document")]
struct Cli {
    /// JSON file to read, stdin when omitted
    file: Option<PathBuf>,

    /// Iterate the members of a root object instead of a root array
    #[arg(long)]
    object: bool,

    /// Keep what decoded and report the failure at the end instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Nesting limit for both the tokenizer and element decoding
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(level_for(cli.verbose))
        .parse_default_env()
        .init();

    let input = read_input(cli.file.as_deref())?;
    let config = CursorConfig {
        max_depth: cli.max_depth,
    };
    let mut cursor = SliceCursor::with_config(&input, config)?;
    let context = DecodeContext::with_max_depth(cli.max_depth);

    let expected = if cli.object {
        Event::StartObject
    } else {
        Event::StartArray
    };
    if cursor.current() != &expected {
        log::warn!(
            "root is {:?}, not {:?}; nothing to iterate",
            cursor.current(),
            expected
        );
    }

    let mut printed = 0usize;
    let mut error: Option<StajError> = None;
    if cli.object {
        let mut view = ObjectView::<_, Value>::with_context(&mut cursor, context);
        if cli.lenient {
            for (key, value) in view.iter_with(&mut error) {
                println!("{key}: {value}");
                printed += 1;
            }
        } else {
            for member in &mut view {
                let (key, value) = member?;
                println!("{key}: {value}");
                printed += 1;
            }
        }
    } else {
        let mut view = ArrayView::<_, Value>::with_context(&mut cursor, context);
        if cli.lenient {
            for value in view.iter_with(&mut error) {
                println!("{value}");
                printed += 1;
            }
        } else {
            for value in &mut view {
                println!("{}", value?);
                printed += 1;
            }
        }
    }

    log::info!("printed {printed} elements");
    if let Some(e) = error {
        eprintln!("stopped after {printed} elements: {e}");
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_verbose_flag_raises_one_level() {
        let levels: Vec<LevelFilter> = (0..=4).map(level_for).collect();
        assert_eq!(
            levels,
            [
                LevelFilter::Warn,
                LevelFilter::Info,
                LevelFilter::Debug,
                LevelFilter::Trace,
                LevelFilter::Trace,
            ]
        );
    }

    #[test]
    fn test_verbose_count_parsing() {
        let cli = Cli::try_parse_from(["staj-demo", "-vv", "data.json"]).unwrap();
        assert_eq!(level_for(cli.verbose), LevelFilter::Debug);
        assert_eq!(cli.file, Some(PathBuf::from("data.json")));
    }
}
