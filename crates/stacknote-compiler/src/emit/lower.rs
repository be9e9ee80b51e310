//! Blocks to bytecode items, with jump targets still symbolic.

use indexmap::IndexMap;
use stacknote_bytecode::{Instruction, Opcode, Operand as ByteOperand, Signature, encode_literal};

use super::EmitError;
use crate::cfg::{BlockId, Cfg, Terminator};
use crate::check::{CheckResult, Resolution};
use crate::ir::{Operand, Operation};
use crate::operator::{Comparison, Operator};

/// Where a jump lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Block(BlockId),
    /// One past the last instruction: the return point.
    End,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Instr(Instruction),
    /// `bra` or `skip`; always three bytes.
    Jump { opcode: Opcode, target: Target },
}

impl Item {
    pub fn size(&self) -> usize {
        match self {
            Self::Instr(instr) => instr.size(),
            Self::Jump { opcode, .. } => opcode.size(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Lowered {
    /// Items per block, in layout order.
    pub blocks: Vec<(BlockId, Vec<Item>)>,
    /// Functions referenced by `load_external`, in order of first use.
    pub externals: IndexMap<String, Signature>,
}

pub fn lower(
    cfg: &Cfg,
    check: &CheckResult,
    signatures: &IndexMap<String, Signature>,
) -> Result<Lowered, EmitError> {
    let mut lowered = Lowered::default();
    for (index, block) in cfg.blocks().enumerate() {
        let next = cfg.order.get(index + 1).copied();
        let mut items = Vec::new();
        for op in &block.ops {
            if let Some(instr) = lower_operation(op, check, signatures, &mut lowered.externals)? {
                items.push(Item::Instr(instr));
            }
        }
        lower_terminator(&block.terminator, next, &mut items);
        lowered.blocks.push((block.id, items));
    }
    Ok(lowered)
}

/// `pick 0` and `pick 1` have one-byte forms.
fn pick(depth: usize) -> Result<Instruction, EmitError> {
    Ok(match depth {
        0 => Instruction::simple(Opcode::Dup),
        1 => Instruction::simple(Opcode::Over),
        n => {
            let n = u8::try_from(n).map_err(|_| EmitError::SlotTooDeep(n))?;
            Instruction::new(Opcode::Pick, ByteOperand::Index(n))
        }
    })
}

fn comparison_opcode(cmp: Comparison) -> Opcode {
    match cmp {
        Comparison::Eq => Opcode::Eq,
        Comparison::Ne => Opcode::Ne,
        Comparison::Lt => Opcode::Lt,
        Comparison::Le => Opcode::Le,
        Comparison::Gt => Opcode::Gt,
        Comparison::Ge => Opcode::Ge,
    }
}

fn lower_operation(
    op: &Operation,
    check: &CheckResult,
    signatures: &IndexMap<String, Signature>,
    externals: &mut IndexMap<String, Signature>,
) -> Result<Option<Instruction>, EmitError> {
    let simple = |opcode: Opcode| -> Result<Option<Instruction>, EmitError> {
        Ok(Some(Instruction::simple(opcode)))
    };
    match (op.op, &op.operand) {
        (Operator::Load, Operand::Int(value)) => Ok(Some(encode_literal(*value))),
        (Operator::Load, Operand::Name(name)) => match check.resolution(op.id) {
            Some(Resolution::Slot(depth)) => pick(*depth).map(Some),
            Some(Resolution::Function(function)) => {
                let signature = signatures
                    .get(function)
                    .ok_or_else(|| EmitError::Unresolved(name.clone()))?;
                let (index, _) = externals.insert_full(function.clone(), signature.clone());
                let index =
                    u16::try_from(index).map_err(|_| EmitError::TooManyExternals(index + 1))?;
                Ok(Some(Instruction::new(
                    Opcode::LoadExternal,
                    ByteOperand::External(index),
                )))
            }
            None => Err(EmitError::Unresolved(name.clone())),
        },
        (Operator::Pick, Operand::Index(n)) => pick(*n as usize).map(Some),
        (Operator::Dup, _) => simple(Opcode::Dup),
        (Operator::Over, _) => simple(Opcode::Over),
        (Operator::Drop, _) => simple(Opcode::Drop),
        (Operator::Swap, _) => simple(Opcode::Swap),
        (Operator::Rot, _) => simple(Opcode::Rot),
        (Operator::Cast | Operator::Name, _) => Ok(None),
        (Operator::Deref, _) => simple(Opcode::Deref),
        (Operator::Abs, _) => simple(Opcode::Abs),
        (Operator::Neg, _) => simple(Opcode::Neg),
        (Operator::Not, _) => simple(Opcode::Not),
        (Operator::Add, _) => simple(Opcode::Plus),
        (Operator::Sub, _) => simple(Opcode::Minus),
        (Operator::And, _) => simple(Opcode::And),
        (Operator::Div, _) => simple(Opcode::Div),
        (Operator::Mod, _) => simple(Opcode::Mod),
        (Operator::Mul, _) => simple(Opcode::Mul),
        (Operator::Or, _) => simple(Opcode::Or),
        (Operator::Shl, _) => simple(Opcode::Shl),
        (Operator::Shr, _) => simple(Opcode::Shr),
        (Operator::Shra, _) => simple(Opcode::Shra),
        (Operator::Xor, _) => simple(Opcode::Xor),
        (Operator::Call, _) => simple(Opcode::Call),
        (other, _) => match other.comparison() {
            Some(cmp) => simple(comparison_opcode(cmp)),
            None => Err(EmitError::Unexpected(op.to_string())),
        },
    }
}

fn jump(opcode: Opcode, target: BlockId) -> Item {
    Item::Jump {
        opcode,
        target: Target::Block(target),
    }
}

fn lower_terminator(terminator: &Terminator, next: Option<BlockId>, items: &mut Vec<Item>) {
    match *terminator {
        Terminator::FallThrough(target) | Terminator::Goto { target, .. } => {
            if Some(target) != next {
                items.push(jump(Opcode::Skip, target));
            }
        }
        Terminator::Branch {
            cmp,
            taken,
            fallthrough,
            ..
        } => {
            items.push(Item::Instr(Instruction::simple(comparison_opcode(cmp))));
            items.push(jump(Opcode::Bra, taken));
            if Some(fallthrough) != next {
                items.push(jump(Opcode::Skip, fallthrough));
            }
        }
        Terminator::Return { .. } => {
            if next.is_some() {
                items.push(Item::Jump {
                    opcode: Opcode::Skip,
                    target: Target::End,
                });
            }
        }
    }
}
