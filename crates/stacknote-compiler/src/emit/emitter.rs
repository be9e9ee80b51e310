//! Note assembly for one checked function.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};
use stacknote_bytecode::{ByteOrder, CodeInfo, DepthReport, Note, Signature, verify_note};

use super::EmitError;
use super::layout::{Assembled, assemble};
use super::lower::lower;
use crate::cfg::{BlockId, Cfg};
use crate::check::CheckResult;

/// Emit the note for `signature`'s body, then verify it the way a consumer
/// would.
pub fn emit_function(
    signature: &Signature,
    cfg: &Cfg,
    check: &CheckResult,
    signatures: &IndexMap<String, Signature>,
    byte_order: ByteOrder,
) -> Result<Note, EmitError> {
    let lowered = lower(cfg, check, signatures)?;
    let Assembled { code, block_starts } = assemble(&lowered, byte_order)?;
    trace!("{}: {} code byte(s)", signature.name, code.len());

    let note = Note::new(
        signature.clone(),
        CodeInfo {
            byte_order,
            max_stack: check.max_stack,
        },
        lowered.externals.into_values().collect(),
        code,
    );

    let report = verify_note(&note)?;
    compare_block_depths(check, &block_starts, &report, note.code.len())?;
    if report.max_stack != check.max_stack as usize {
        return Err(EmitError::MaxStackMismatch {
            checked: check.max_stack,
            verified: report.max_stack,
        });
    }
    debug!(
        "{}: emitted {} byte(s), max_stack {}, {} external(s)",
        signature.name,
        note.code.len(),
        note.code_info.max_stack,
        note.externals.len()
    );
    Ok(note)
}

/// Every checked block must start at the depth the verifier derives from the
/// bytes. A block laid out at the very end has no instruction to compare.
pub(super) fn compare_block_depths(
    check: &CheckResult,
    block_starts: &HashMap<BlockId, usize>,
    report: &DepthReport,
    code_len: usize,
) -> Result<(), EmitError> {
    for (id, state) in &check.entry_states {
        let offset = *block_starts
            .get(id)
            .ok_or_else(|| EmitError::MissingBlock(id.to_string()))?;
        if offset == code_len {
            continue;
        }
        let verified = report.depth_at(offset);
        if verified != Some(state.depth()) {
            return Err(EmitError::DepthMismatch {
                block: id.to_string(),
                offset,
                checked: state.depth(),
                verified,
            });
        }
    }
    Ok(())
}
