//! Loading source text and reporting its diagnostics.

use std::fs;
use std::path::Path;

use stacknote_compiler::{Compilation, CompileOptions, compile};

use super::CliError;

pub fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Compile `path`, printing any diagnostics to stderr.
pub fn compile_file(
    path: &Path,
    options: &CompileOptions,
    color: bool,
) -> Result<Compilation, CliError> {
    let source = read_source(path)?;
    let compilation = compile(&source, options);
    if compilation.is_ok() {
        return Ok(compilation);
    }

    let display = path.display().to_string();
    eprint!(
        "{}",
        compilation
            .diagnostics
            .printer()
            .source(&source)
            .path(&display)
            .colored(color)
            .render()
    );
    Err(CliError::Failed {
        path: path.to_path_buf(),
        errors: compilation.diagnostics.error_count(),
    })
}
