//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;
use stacknote_bytecode::ByteOrder;
use stacknote_compiler::CompileOptions;

use super::{ColorChoice, Stream};
use crate::commands::check::CheckArgs;
use crate::commands::compile::{CompileArgs, Output};
use crate::commands::dump::DumpArgs;

pub struct CompileParams {
    pub source_path: PathBuf,
    pub output: Option<PathBuf>,
    pub listing: bool,
    pub byte_order: ByteOrder,
    pub optimize: bool,
    pub color: ColorChoice,
}

impl CompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: source_path(m),
            output: m.get_one::<PathBuf>("output").cloned(),
            listing: m.get_flag("listing"),
            byte_order: parse_byte_order(m),
            optimize: !m.get_flag("no_opt"),
            color: parse_color(m),
        }
    }
}

impl From<CompileParams> for CompileArgs {
    fn from(p: CompileParams) -> Self {
        let output = match p.output {
            Some(path) if path.as_os_str() == "-" => Output::Stdout,
            Some(path) => Output::File(path),
            None => {
                let extension = if p.listing { "S" } else { "note" };
                Output::File(p.source_path.with_extension(extension))
            }
        };
        let listing_color = matches!(output, Output::Stdout) && p.color.enabled_for(Stream::Stdout);
        Self {
            source_path: p.source_path,
            output,
            listing: p.listing,
            options: CompileOptions {
                byte_order: p.byte_order,
                optimize: p.optimize,
            },
            color: p.color.enabled_for(Stream::Stderr),
            listing_color,
        }
    }
}

pub struct CheckParams {
    pub source_path: PathBuf,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: source_path(m),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            source_path: p.source_path,
            color: p.color.enabled_for(Stream::Stderr),
        }
    }
}

pub struct DumpParams {
    pub notes_path: PathBuf,
    pub json: bool,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            notes_path: m
                .get_one::<PathBuf>("notes_path")
                .cloned()
                .unwrap_or_default(),
            json: m.get_flag("json"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            notes_path: p.notes_path,
            json: p.json,
            color: !p.json && p.color.enabled_for(Stream::Stdout),
        }
    }
}

/// Log filter for the `-v` count, used when `STACKNOTE_LOG` is unset.
pub fn log_filter(m: &ArgMatches) -> &'static str {
    match m.get_count("verbose") {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn source_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("source_path")
        .cloned()
        .unwrap_or_default()
}

fn parse_byte_order(m: &ArgMatches) -> ByteOrder {
    match m.get_one::<String>("byte_order").map(|s| s.as_str()) {
        Some("big") => ByteOrder::Big,
        Some("native") => ByteOrder::native(),
        _ => ByteOrder::Little,
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    ColorChoice::from_flag(m.get_one::<String>("color").map(String::as_str))
}
