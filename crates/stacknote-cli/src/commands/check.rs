use std::path::PathBuf;

use stacknote_compiler::CompileOptions;

use super::CliError;
use super::source::compile_file;

pub struct CheckArgs {
    pub source_path: PathBuf,
    pub color: bool,
}

/// Silent on success.
pub fn run(args: CheckArgs) -> Result<(), CliError> {
    compile_file(&args.source_path, &CompileOptions::default(), args.color)?;
    Ok(())
}
