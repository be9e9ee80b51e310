//! Operation and block equivalence, as used by arm merging.

use crate::cfg::{Block, Terminator};
use crate::ir::{Operand, Operation};
use crate::operator::Operator;

/// `dup` and `over` are spelled as the `pick` they stand for.
fn canonical(op: &Operation) -> (Operator, Operand) {
    match op.op {
        Operator::Dup => (Operator::Pick, Operand::Index(0)),
        Operator::Over => (Operator::Pick, Operand::Index(1)),
        other => (other, op.operand.clone()),
    }
}

/// Slots consumed and produced, once the operand is known.
///
/// `None` when the effect depends on a callee.
fn stack_effect(op: Operator, operand: &Operand) -> Option<(usize, usize)> {
    let info = op.info();
    match (op, operand) {
        (Operator::Pick, Operand::Index(n)) => Some((*n as usize + 1, *n as usize + 2)),
        (Operator::Name, _) => Some((0, 0)),
        (Operator::Call, _) => None,
        _ => info.pops.map(|pops| (pops as usize, info.pushes as usize)),
    }
}

/// Whether `a` and `b` do the same thing to any stack they both accept.
pub fn equivalent(a: &Operation, b: &Operation) -> bool {
    let (a_op, a_operand) = canonical(a);
    let (b_op, b_operand) = canonical(b);
    a_op == b_op
        && a_operand == b_operand
        && stack_effect(a_op, &a_operand) == stack_effect(b_op, &b_operand)
}

/// Same transfer regardless of ids and spans. A goto and a fall-through to
/// the same block count as the same.
pub fn same_terminator(a: &Terminator, b: &Terminator) -> bool {
    use Terminator::*;
    match (a, b) {
        (FallThrough(x) | Goto { target: x, .. }, FallThrough(y) | Goto { target: y, .. }) => {
            x == y
        }
        (
            Branch {
                cmp: c1,
                taken: t1,
                fallthrough: f1,
                ..
            },
            Branch {
                cmp: c2,
                taken: t2,
                fallthrough: f2,
                ..
            },
        ) => c1 == c2 && t1 == t2 && f1 == f2,
        (Return { .. }, Return { .. }) => true,
        _ => false,
    }
}

/// Pairwise-equivalent operations followed by the same terminator.
pub fn blocks_equivalent(a: &Block, b: &Block) -> bool {
    a.ops.len() == b.ops.len()
        && a.ops.iter().zip(&b.ops).all(|(x, y)| equivalent(x, y))
        && same_terminator(&a.terminator, &b.terminator)
}
