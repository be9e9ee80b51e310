//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("stacknote")
        .about("Compile stack-language functions into binary notes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(compile_command())
        .subcommand(check_command())
        .subcommand(dump_command())
}

/// Compile a source file into a note file.
pub fn compile_command() -> Command {
    Command::new("compile")
        .about("Compile a source file into a note file")
        .after_help(
            r#"EXAMPLES:
  stacknote compile fact.sn                 # writes fact.note
  stacknote compile fact.sn -S              # writes the listing to fact.S
  stacknote compile fact.sn -S -o -         # prints the listing
  stacknote compile fact.sn --byte-order big --no-opt"#,
        )
        .arg(source_path_arg())
        .arg(output_arg())
        .arg(listing_arg())
        .arg(byte_order_arg())
        .arg(no_opt_arg())
        .arg(color_arg())
}

/// Report errors without writing anything.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Check a source file and report errors")
        .after_help(
            r#"EXAMPLES:
  stacknote check fact.sn                   # silent on success"#,
        )
        .arg(source_path_arg())
        .arg(color_arg())
}

/// Decode a note file.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Decode a note file and print its contents")
        .after_help(
            r#"EXAMPLES:
  stacknote dump fact.note
  stacknote dump fact.note --json | jq '.notes[0].max_stack'"#,
        )
        .arg(notes_path_arg())
        .arg(json_arg())
        .arg(color_arg())
}
