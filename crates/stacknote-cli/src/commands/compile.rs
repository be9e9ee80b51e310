use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::info;
use stacknote_bytecode::dump;
use stacknote_compiler::CompileOptions;
use stacknote_core::Colors;

use super::CliError;
use super::source::compile_file;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

pub struct CompileArgs {
    pub source_path: PathBuf,
    pub output: Output,
    /// Write the dump listing instead of the binary.
    pub listing: bool,
    pub options: CompileOptions,
    /// Color diagnostics.
    pub color: bool,
    pub listing_color: bool,
}

/// Compile and write the note file; nothing is written if any function fails.
pub fn run(args: CompileArgs) -> Result<(), CliError> {
    let compilation = compile_file(&args.source_path, &args.options, args.color)?;
    let count = compilation.notes.len();
    let encode_error = |source| CliError::Encode {
        path: args.source_path.clone(),
        source,
    };

    let bytes = if args.listing {
        let file = compilation.into_note_file().map_err(encode_error)?;
        dump(&file, Colors::new(args.listing_color)).into_bytes()
    } else {
        compilation.into_bytes().map_err(encode_error)?
    };

    match &args.output {
        Output::Stdout => write_stdout(&bytes),
        Output::File(path) => {
            write_file(path, &bytes)?;
            info!("wrote {count} note(s) to {}", path.display());
            Ok(())
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_stdout(bytes: &[u8]) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(bytes)
        .and_then(|()| stdout.flush())
        .map_err(|source| CliError::Write {
            path: PathBuf::from("-"),
            source,
        })
}
