//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so commands can compose the same
//! definition.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Source file to compile (positional).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Source file")
}

/// Note file to decode (positional).
pub fn notes_path_arg() -> Arg {
    Arg::new("notes_path")
        .value_name("NOTES")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Note file")
}

/// Output path (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help("Output file, `-` for stdout (default: <stem>.note, or <stem>.S with -S)")
}

/// Listing instead of binary (-S).
pub fn listing_arg() -> Arg {
    Arg::new("listing")
        .short('S')
        .action(ArgAction::SetTrue)
        .help("Write a human-readable listing instead of the binary note file")
}

/// Target byte order (--byte-order).
pub fn byte_order_arg() -> Arg {
    Arg::new("byte_order")
        .long("byte-order")
        .value_name("ORDER")
        .default_value("little")
        .value_parser(["little", "big", "native"])
        .help("Byte order of code operands")
}

/// Skip branch elimination (--no-opt).
pub fn no_opt_arg() -> Arg {
    Arg::new("no_opt")
        .long("no-opt")
        .action(ArgAction::SetTrue)
        .help("Skip branch elimination")
}

/// JSON output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the decoded notes as JSON")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Log verbosity (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Log more (-v debug, -vv trace); STACKNOTE_LOG overrides")
}
