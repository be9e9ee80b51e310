//! Errors raised while turning a checked graph into a note.

use stacknote_bytecode::{FormatError, VerifyError};

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("branch at offset {from} cannot reach offset {to}: displacement exceeds 16 bits")]
    BranchOutOfRange { from: usize, to: usize },
    #[error("too many external functions: {0} (max 65536)")]
    TooManyExternals(usize),
    #[error("slot {0} is too deep for `pick`")]
    SlotTooDeep(usize),
    #[error("`{0}` has no resolution")]
    Unresolved(String),
    #[error("cannot emit `{0}` inside a block")]
    Unexpected(String),
    #[error("jump to {0}, which is not laid out")]
    MissingBlock(String),
    #[error("emitted code fails verification: {0}")]
    Verify(#[from] VerifyError),
    #[error("checker computed max_stack {checked} but the emitted code needs {verified}")]
    MaxStackMismatch { checked: u16, verified: usize },
    #[error("{block} at offset {offset}: checker depth {checked}, verified depth {verified:?}")]
    DepthMismatch {
        block: String,
        offset: usize,
        checked: usize,
        verified: Option<usize>,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
}
