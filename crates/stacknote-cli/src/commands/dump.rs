use std::fs;
use std::path::PathBuf;

use stacknote_bytecode::{NoteFile, dump};
use stacknote_core::Colors;

use super::CliError;
use super::json::FileView;

pub struct DumpArgs {
    pub notes_path: PathBuf,
    pub json: bool,
    pub color: bool,
}

pub fn run(args: DumpArgs) -> Result<(), CliError> {
    print!("{}", render(&args)?);
    Ok(())
}

pub fn render(args: &DumpArgs) -> Result<String, CliError> {
    let bytes = fs::read(&args.notes_path).map_err(|source| CliError::Read {
        path: args.notes_path.clone(),
        source,
    })?;
    let file = NoteFile::from_bytes(&bytes).map_err(|source| CliError::Format {
        path: args.notes_path.clone(),
        source,
    })?;

    if args.json {
        let mut out = serde_json::to_string_pretty(&FileView::from(&file))?;
        out.push('\n');
        return Ok(out);
    }
    Ok(dump(&file, Colors::new(args.color)))
}
