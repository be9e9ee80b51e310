//! Consumer-side stack verification of decoded code.
//!
//! Re-derives the stack at every reachable instruction from the note alone,
//! so a consumer can check `max_stack` without trusting the producer.

use std::collections::HashMap;

use log::trace;

use crate::error::FormatError;
use crate::instruction::{Instruction, Operand, decode};
use crate::note::Note;
use crate::opcode::Opcode;
use crate::signature::Signature;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("stack underflow at {offset:#06x}: needs {needed}, depth {depth}")]
    Underflow {
        offset: usize,
        needed: usize,
        depth: usize,
    },
    #[error("function reference used as a value at {offset:#06x}")]
    NotAValue { offset: usize },
    #[error("call at {offset:#06x} without a function reference on top")]
    NotCallable { offset: usize },
    #[error("external {index} at {offset:#06x} out of range ({count} externals)")]
    ExternalOutOfRange {
        offset: usize,
        index: u16,
        count: usize,
    },
    #[error("inconsistent stack at {offset:#06x}: depth {expected} vs {found}")]
    InconsistentStack {
        offset: usize,
        expected: usize,
        found: usize,
    },
    #[error("return point reached without a value on top of the stack")]
    MissingResult,
    #[error("declared max_stack {declared} is below the computed {computed}")]
    MaxStackExceeded { declared: u16, computed: usize },
    #[error("{0}")]
    Format(String),
}

impl From<FormatError> for VerifyError {
    fn from(err: FormatError) -> Self {
        Self::Format(err.to_string())
    }
}

/// What the abstract stack holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Value,
    Function(u16),
}

/// Result of a successful verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthReport {
    /// Depth on entry to each reachable instruction, by offset.
    pub depths: Vec<(usize, usize)>,
    /// Highest depth reached, arguments included.
    pub peak: usize,
    /// `peak` minus the number of arguments.
    pub max_stack: usize,
}

impl DepthReport {
    pub fn depth_at(&self, offset: usize) -> Option<usize> {
        self.depths
            .iter()
            .find_map(|&(o, d)| (o == offset).then_some(d))
    }
}

/// Decode and verify a note, including its declared `max_stack`.
pub fn verify_note(note: &Note) -> Result<DepthReport, VerifyError> {
    let code = decode(&note.code, note.code_info.byte_order)?;
    let report = verify(
        &code,
        note.code.len(),
        note.signature.params.len(),
        &note.externals,
    )?;
    if report.max_stack > note.code_info.max_stack as usize {
        return Err(VerifyError::MaxStackExceeded {
            declared: note.code_info.max_stack,
            computed: report.max_stack,
        });
    }
    Ok(report)
}

/// Verify decoded instructions of a function taking `arg_count` values.
pub fn verify(
    code: &[Instruction],
    code_len: usize,
    arg_count: usize,
    externals: &[Signature],
) -> Result<DepthReport, VerifyError> {
    let index: HashMap<usize, usize> = code
        .iter()
        .enumerate()
        .map(|(i, instr)| (instr.offset, i))
        .collect();

    let mut states: Vec<Option<Vec<Slot>>> = vec![None; code.len()];
    let mut returns = false;
    let mut worklist = Vec::new();
    let entry = vec![Slot::Value; arg_count];
    let mut peak = arg_count;

    // The end of the code is the return point: only the top slot matters
    // there, so paths may reach it at different depths.
    let flow = |target: usize,
                stack: &[Slot],
                states: &mut Vec<Option<Vec<Slot>>>,
                returns: &mut bool,
                worklist: &mut Vec<usize>|
     -> Result<(), VerifyError> {
        if target == code_len {
            if stack.last() != Some(&Slot::Value) {
                return Err(VerifyError::MissingResult);
            }
            *returns = true;
            return Ok(());
        }
        let idx = index.get(&target).copied().ok_or_else(|| {
            VerifyError::Format(format!("offset {target} is not an instruction boundary"))
        })?;
        let slot = &mut states[idx];
        if let Some(existing) = slot.as_ref() {
            if existing.as_slice() != stack {
                return Err(VerifyError::InconsistentStack {
                    offset: target,
                    expected: existing.len(),
                    found: stack.len(),
                });
            }
            return Ok(());
        }
        *slot = Some(stack.to_vec());
        worklist.push(idx);
        Ok(())
    };

    flow(0, &entry, &mut states, &mut returns, &mut worklist)?;

    while let Some(i) = worklist.pop() {
        let instr = &code[i];
        let mut stack = states[i].clone().unwrap_or_default();
        trace!("{:04x} {} depth {}", instr.offset, instr, stack.len());
        step(instr, &mut stack, externals)?;
        peak = peak.max(stack.len());

        if let Some(target) = instr.branch_target() {
            let target = usize::try_from(target).map_err(|_| {
                VerifyError::Format(format!("negative branch target at {:#06x}", instr.offset))
            })?;
            flow(target, &stack, &mut states, &mut returns, &mut worklist)?;
            if instr.opcode == Opcode::Skip {
                continue;
            }
        }
        flow(instr.end(), &stack, &mut states, &mut returns, &mut worklist)?;
    }

    if !returns {
        return Err(VerifyError::MissingResult);
    }

    let depths = code
        .iter()
        .zip(&states)
        .filter_map(|(instr, s)| s.as_ref().map(|s| (instr.offset, s.len())))
        .collect();

    Ok(DepthReport {
        depths,
        peak,
        max_stack: peak.saturating_sub(arg_count),
    })
}

fn step(
    instr: &Instruction,
    stack: &mut Vec<Slot>,
    externals: &[Signature],
) -> Result<(), VerifyError> {
    let offset = instr.offset;
    let need = |stack: &Vec<Slot>, needed: usize| {
        if stack.len() < needed {
            return Err(VerifyError::Underflow {
                offset,
                needed,
                depth: stack.len(),
            });
        }
        Ok(())
    };
    let pop_value = |stack: &mut Vec<Slot>| match stack.pop() {
        Some(Slot::Value) => Ok(()),
        _ => Err(VerifyError::NotAValue { offset }),
    };

    match instr.opcode {
        Opcode::Dup | Opcode::Over | Opcode::Pick => {
            let depth = match (instr.opcode, instr.operand) {
                (Opcode::Over, _) => 1,
                (Opcode::Pick, Operand::Index(n)) => n as usize,
                _ => 0,
            };
            need(stack, depth + 1)?;
            stack.push(stack[stack.len() - 1 - depth]);
        }
        Opcode::Drop => {
            need(stack, 1)?;
            stack.pop();
        }
        Opcode::Swap => {
            need(stack, 2)?;
            let n = stack.len();
            stack.swap(n - 1, n - 2);
        }
        Opcode::Rot => {
            need(stack, 3)?;
            let n = stack.len();
            stack[n - 3..].rotate_right(1);
        }
        Opcode::LoadExternal => {
            let Operand::External(index) = instr.operand else {
                return Err(VerifyError::NotCallable { offset });
            };
            if index as usize >= externals.len() {
                return Err(VerifyError::ExternalOutOfRange {
                    offset,
                    index,
                    count: externals.len(),
                });
            }
            stack.push(Slot::Function(index));
        }
        Opcode::Call => {
            need(stack, 1)?;
            let Some(Slot::Function(index)) = stack.pop() else {
                return Err(VerifyError::NotCallable { offset });
            };
            let params = externals[index as usize].params.len();
            need(stack, params)?;
            for _ in 0..params {
                pop_value(stack)?;
            }
            stack.push(Slot::Value);
        }
        _ => {
            let Some(effect) = instr.stack_effect() else {
                return Ok(());
            };
            need(stack, effect.needs)?;
            for _ in 0..effect.needs {
                pop_value(stack)?;
            }
            let pushed = (effect.needs as isize + effect.delta) as usize;
            stack.extend(std::iter::repeat_n(Slot::Value, pushed));
        }
    }
    Ok(())
}
