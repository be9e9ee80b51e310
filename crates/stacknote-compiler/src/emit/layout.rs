//! Byte offsets and jump displacements.
//!
//! Jumps have a fixed size, so one pass over the items fixes every offset.

use std::collections::HashMap;

use stacknote_bytecode::{ByteOrder, Instruction, Operand};

use super::EmitError;
use super::lower::{Item, Lowered, Target};
use crate::cfg::BlockId;

/// Encoded code plus where each laid-out block begins.
pub struct Assembled {
    pub code: Vec<u8>,
    pub block_starts: HashMap<BlockId, usize>,
}

pub fn assemble(lowered: &Lowered, order: ByteOrder) -> Result<Assembled, EmitError> {
    let mut starts: HashMap<BlockId, usize> = HashMap::new();
    let mut offset = 0;
    for (id, items) in &lowered.blocks {
        starts.insert(*id, offset);
        offset += items.iter().map(Item::size).sum::<usize>();
    }
    let end = offset;

    let mut code = Vec::with_capacity(end);
    for (_, items) in &lowered.blocks {
        for item in items {
            let at = code.len();
            match item {
                Item::Instr(instr) => instr.encode(order, &mut code),
                Item::Jump { opcode, target } => {
                    let to = match target {
                        Target::Block(id) => *starts
                            .get(id)
                            .ok_or(EmitError::MissingBlock(id.to_string()))?,
                        Target::End => end,
                    };
                    let from = at + item.size();
                    let displacement = to as i64 - from as i64;
                    let displacement = i16::try_from(displacement)
                        .map_err(|_| EmitError::BranchOutOfRange { from: at, to })?;
                    Instruction::new(*opcode, Operand::Offset(displacement)).encode(order, &mut code);
                }
            }
        }
    }
    Ok(Assembled {
        code,
        block_starts: starts,
    })
}
