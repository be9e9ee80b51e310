//! Partition a function body into basic blocks.
//!
//! A new block starts at every label and after every branch, `goto` and
//! `return`. Calls stay inside their block.

use std::collections::HashMap;

use log::trace;

use super::{Block, BlockId, Cfg, Terminator};
use crate::diagnostics::{DiagnosticMessage, ErrorKind, Span};
use crate::ir::{OpIds, Operand, Operation};
use crate::operator::Operator;
use crate::parser::{Function, LabelDecl, Statement};

/// A block whose jump targets are still label names.
#[derive(Default)]
struct Pending {
    label: Option<LabelDecl>,
    ops: Vec<Operation>,
    terminator: Option<Operation>,
}

impl Pending {
    fn is_blank(&self) -> bool {
        self.label.is_none() && self.ops.is_empty() && self.terminator.is_none()
    }
}

pub fn build(func: &Function) -> Result<Cfg, DiagnosticMessage> {
    let mut pending = Vec::new();
    let mut current = Pending::default();

    for stmt in &func.body {
        match stmt {
            Statement::Label(label) => {
                if !current.is_blank() {
                    pending.push(std::mem::take(&mut current));
                }
                current.label = Some(label.clone());
            }
            Statement::Op(op) if op.op.is_terminator() => {
                current.terminator = Some(op.clone());
                pending.push(std::mem::take(&mut current));
            }
            Statement::Op(op) => current.ops.push(op.clone()),
        }
    }
    pending.push(current);

    let mut labels: HashMap<String, BlockId> = HashMap::new();
    for (i, block) in pending.iter().enumerate() {
        let Some(label) = &block.label else {
            continue;
        };
        if labels.insert(label.name.clone(), BlockId(i as u32)).is_some() {
            return Err(DiagnosticMessage::new(
                ErrorKind::Syntax,
                label.span,
                format!("label `{}` is already defined", label.name),
            ));
        }
    }

    let count = pending.len();
    let mut blocks = Vec::with_capacity(count);
    for (i, p) in pending.into_iter().enumerate() {
        let id = BlockId(i as u32);
        let next = (i + 1 < count).then(|| BlockId(i as u32 + 1));
        let terminator = match &p.terminator {
            None => match next {
                Some(next) => Terminator::FallThrough(next),
                None => Terminator::Return { span: None },
            },
            Some(op) => resolve(op, next, &labels)?,
        };
        let span = p
            .label
            .as_ref()
            .map(|l| l.span)
            .or_else(|| p.ops.first().map(|op| op.span))
            .or_else(|| terminator.span())
            .unwrap_or(Span::empty(func.name_span.end));
        blocks.push(Block {
            id,
            label: p.label.map(|l| l.name),
            ops: p.ops,
            terminator,
            span,
        });
    }

    let cfg = Cfg::new(blocks, OpIds::starting_at(func.next_op_id));
    trace!("cfg of `{}`:\n{cfg}", func.name);
    Ok(cfg)
}

fn resolve(
    op: &Operation,
    next: Option<BlockId>,
    labels: &HashMap<String, BlockId>,
) -> Result<Terminator, DiagnosticMessage> {
    if op.op == Operator::Return {
        return Ok(Terminator::Return {
            span: Some(op.span),
        });
    }

    let Operand::Label(name) = &op.operand else {
        return Err(DiagnosticMessage::new(
            ErrorKind::Internal,
            op.span,
            format!("`{}` without a label", op.op),
        ));
    };
    let target = labels.get(name.as_str()).copied().ok_or_else(|| {
        DiagnosticMessage::new(
            ErrorKind::Syntax,
            op.span,
            format!("undefined label `{name}`"),
        )
    })?;

    match op.op.branch_comparison() {
        Some(cmp) => {
            let fallthrough = next.ok_or_else(|| {
                DiagnosticMessage::new(ErrorKind::Internal, op.span, "branch without fall-through")
            })?;
            Ok(Terminator::Branch {
                cmp,
                id: op.id,
                span: op.span,
                taken: target,
                fallthrough,
            })
        }
        None => Ok(Terminator::Goto {
            id: op.id,
            span: op.span,
            target,
        }),
    }
}
