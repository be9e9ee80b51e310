use super::equivalence::{blocks_equivalent, equivalent, same_terminator};
use crate::cfg::{Block, BlockId, Terminator};
use crate::diagnostics::Span;
use crate::ir::{OpId, Operand, Operation};
use crate::operator::Operator;

fn op(id: u32, op: Operator, operand: Operand) -> Operation {
    Operation::new(OpId(id), op, operand, Span::empty(id as usize))
}

fn block(id: u32, ops: Vec<Operation>, terminator: Terminator) -> Block {
    Block {
        id: BlockId(id),
        label: None,
        ops,
        terminator,
        span: Span::default(),
    }
}

#[test]
fn dup_and_over_are_picks() {
    let pick0 = op(0, Operator::Pick, Operand::Index(0));
    let pick1 = op(1, Operator::Pick, Operand::Index(1));
    let dup = op(2, Operator::Dup, Operand::None);
    let over = op(3, Operator::Over, Operand::None);

    assert!(equivalent(&dup, &pick0));
    assert!(equivalent(&pick1, &over));
    assert!(!equivalent(&dup, &over));
    assert!(!equivalent(&dup, &pick1));
}

#[test]
fn operands_must_match() {
    let one = op(0, Operator::Load, Operand::Int(1));
    let two = op(1, Operator::Load, Operand::Int(2));
    let name = op(2, Operator::Load, Operand::Name("x".into()));

    assert!(equivalent(&one, &op(9, Operator::Load, Operand::Int(1))));
    assert!(!equivalent(&one, &two));
    assert!(!equivalent(&one, &name));
    assert!(!equivalent(
        &op(0, Operator::Add, Operand::None),
        &op(1, Operator::Sub, Operand::None)
    ));
}

#[test]
fn ids_and_spans_are_ignored() {
    let a = op(0, Operator::Call, Operand::None);
    let b = op(7, Operator::Call, Operand::None);
    assert!(equivalent(&a, &b));
}

#[test]
fn terminators_compare_targets() {
    let goto = Terminator::Goto {
        id: OpId(0),
        span: Span::empty(0),
        target: BlockId(3),
    };
    assert!(same_terminator(&goto, &Terminator::FallThrough(BlockId(3))));
    assert!(!same_terminator(&goto, &Terminator::FallThrough(BlockId(4))));
    assert!(same_terminator(
        &Terminator::Return { span: None },
        &Terminator::Return {
            span: Some(Span::empty(5))
        }
    ));
    assert!(!same_terminator(&goto, &Terminator::Return { span: None }));
}

#[test]
fn blocks_differing_in_length_are_not_equivalent() {
    let ret = || Terminator::Return { span: None };
    let a = block(1, vec![op(0, Operator::Load, Operand::Int(1))], ret());
    let b = block(
        2,
        vec![
            op(1, Operator::Load, Operand::Int(1)),
            op(2, Operator::Load, Operand::Int(1)),
        ],
        ret(),
    );
    let c = block(3, vec![op(3, Operator::Load, Operand::Int(1))], ret());

    assert!(!blocks_equivalent(&a, &b));
    assert!(blocks_equivalent(&a, &c));
}

#[test]
fn blocks_with_different_types_are_not_equivalent() {
    use stacknote_bytecode::ValueType;
    let ret = || Terminator::Return { span: None };
    let a = block(1, vec![op(0, Operator::Cast, Operand::Type(ValueType::Int))], ret());
    let b = block(2, vec![op(1, Operator::Cast, Operand::Type(ValueType::Ptr))], ret());
    assert!(!blocks_equivalent(&a, &b));
}
