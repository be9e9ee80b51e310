use std::io;
use std::path::PathBuf;

use stacknote_bytecode::FormatError;

/// Why a command failed. Source diagnostics are printed before the command
/// returns [`CliError::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write `{}`: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("could not compile `{}` ({errors} error(s))", path.display())]
    Failed { path: PathBuf, errors: usize },

    #[error("cannot encode notes of `{}`: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: stacknote_compiler::Error,
    },

    #[error("invalid note file `{}`: {source}", path.display())]
    Format { path: PathBuf, source: FormatError },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
