//! Worklist abstract interpretation over the block graph.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::trace;
use stacknote_bytecode::{Signature, ValueType};

use super::stack::{Slot, StackState, Type};
use super::{CheckResult, Resolution};
use crate::cfg::{BlockId, Cfg, Terminator};
use crate::diagnostics::{DiagnosticMessage, ErrorKind, Span};
use crate::ir::{Operand, Operation, SlotRef};
use crate::operator::Operator;
use crate::parser::Argument;

/// Deepest slot `pick` can address.
const MAX_PICK: usize = u8::MAX as usize;

type CheckError = DiagnosticMessage;

fn stack_error(span: Span, message: impl Into<String>) -> CheckError {
    DiagnosticMessage::new(ErrorKind::Stack, span, message)
}

fn type_error(span: Span, message: impl Into<String>) -> CheckError {
    DiagnosticMessage::new(ErrorKind::Type, span, message)
}

fn name_error(span: Span, message: impl Into<String>) -> CheckError {
    DiagnosticMessage::new(ErrorKind::Name, span, message)
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

pub(super) struct Checker<'a> {
    cfg: &'a Cfg,
    returns: ValueType,
    signatures: &'a IndexMap<String, Signature>,
    states: HashMap<BlockId, StackState>,
    resolutions: HashMap<crate::ir::OpId, Resolution>,
    peak: usize,
}

impl<'a> Checker<'a> {
    pub(super) fn new(
        cfg: &'a Cfg,
        returns: ValueType,
        signatures: &'a IndexMap<String, Signature>,
    ) -> Self {
        Self {
            cfg,
            returns,
            signatures,
            states: HashMap::new(),
            resolutions: HashMap::new(),
            peak: 0,
        }
    }

    pub(super) fn run(mut self, args: &[Argument]) -> Result<CheckResult, CheckError> {
        let entry = StackState::new(
            args.iter()
                .map(|a| Slot::named(a.ty.into(), a.name.clone()))
                .collect(),
        );
        self.peak = entry.depth();

        let cfg = self.cfg;
        let entry_id = cfg.entry();
        self.states.insert(entry_id, entry);
        let mut worklist = vec![entry_id];

        while let Some(id) = worklist.pop() {
            let block = cfg.block(id);
            let mut state = self.states[&id].clone();
            trace!("{id} entry {state}");

            for op in &block.ops {
                self.apply(op, &mut state)?;
                self.peak = self.peak.max(state.depth());
            }

            match &block.terminator {
                Terminator::FallThrough(target) | Terminator::Goto { target, .. } => {
                    let span = block.terminator.span().unwrap_or(block.span);
                    self.flow(*target, &state, span, &mut worklist)?;
                }
                Terminator::Branch {
                    cmp,
                    span,
                    taken,
                    fallthrough,
                    ..
                } => {
                    let op = cmp.branch_operator();
                    self.compare_operands(op, *span, &mut state)?;
                    self.flow(*taken, &state, *span, &mut worklist)?;
                    self.flow(*fallthrough, &state, *span, &mut worklist)?;
                }
                Terminator::Return { span } => {
                    self.check_return(span.unwrap_or(block.span), span.is_none(), &state)?;
                }
            }
        }

        let arg_count = args.len();
        let above_args = self.peak.saturating_sub(arg_count);
        let max_stack = u16::try_from(above_args).map_err(|_| {
            stack_error(
                cfg.block(entry_id).span,
                format!("stack depth {above_args} exceeds the encodable maximum"),
            )
        })?;

        Ok(CheckResult {
            max_stack,
            peak: self.peak,
            resolutions: self.resolutions,
            entry_states: self.states,
        })
    }

    /// Hand `state` to `target`, or compare it with what `target` already has.
    fn flow(
        &mut self,
        target: BlockId,
        state: &StackState,
        span: Span,
        worklist: &mut Vec<BlockId>,
    ) -> Result<(), CheckError> {
        match self.states.get(&target) {
            Some(existing) if existing != state => {
                let at = match &self.cfg.block(target).label {
                    Some(label) => format!(" at `{label}`"),
                    None => String::new(),
                };
                Err(stack_error(
                    span,
                    format!("inconsistent stack{at}: {existing} vs {state}"),
                ))
            }
            Some(_) => Ok(()),
            None => {
                self.states.insert(target, state.clone());
                worklist.push(target);
                Ok(())
            }
        }
    }

    fn need(&self, op: Operator, span: Span, state: &StackState, n: usize) -> Result<(), CheckError> {
        if state.depth() >= n {
            return Ok(());
        }
        Err(stack_error(
            span,
            format!(
                "`{op}` needs {n} stack slot{}, found {}",
                plural(n),
                state.depth()
            ),
        ))
    }

    fn pop(state: &mut StackState) -> Slot {
        state.pop().unwrap_or(Slot::unnamed(Type::Int))
    }

    fn apply(&mut self, operation: &Operation, state: &mut StackState) -> Result<(), CheckError> {
        let op = operation.op;
        let span = operation.span;
        if let Some(pops) = op.info().pops {
            self.need(op, span, state, pops as usize)?;
        }

        match (op, &operation.operand) {
            (Operator::Load, Operand::Int(_)) => state.push(Slot::unnamed(Type::Int)),
            (Operator::Load, Operand::Name(name)) => {
                let resolution = self.resolve(name, span, state)?;
                let ty = match &resolution {
                    Resolution::Slot(k) => state.peek(*k).map(|s| s.ty.clone()),
                    Resolution::Function(f) => {
                        self.signatures.get(f).map(|sig| Type::Func(Box::new(sig.clone())))
                    }
                };
                state.push(Slot::unnamed(ty.unwrap_or(Type::Int)));
                self.resolutions.insert(operation.id, resolution);
            }
            (Operator::Pick | Operator::Dup | Operator::Over, operand) => {
                let n = match (op, operand) {
                    (Operator::Pick, Operand::Index(n)) => *n as usize,
                    (Operator::Over, _) => 1,
                    _ => 0,
                };
                self.need(op, span, state, n + 1)?;
                let ty = state.peek(n).map(|s| s.ty.clone()).unwrap_or(Type::Int);
                state.push(Slot::unnamed(ty));
            }
            (Operator::Drop, _) => {
                state.pop();
            }
            (Operator::Swap, _) => state.swap(),
            (Operator::Rot, _) => state.rot(),
            (Operator::Name, Operand::Rename { slot, name }) => {
                let n = match slot {
                    SlotRef::Position(p) => {
                        let p = *p as usize;
                        self.need(op, span, state, p + 1)?;
                        p
                    }
                    SlotRef::Name(existing) => state
                        .find(existing)
                        .ok_or_else(|| name_error(span, format!("no slot named `{existing}`")))?,
                };
                state.rename(n, name);
            }
            (Operator::Abs | Operator::Neg | Operator::Not, _) => {
                let a = Self::pop(state);
                if a.ty != Type::Int {
                    return Err(type_error(span, format!("`{op}` expects int, found {}", a.ty)));
                }
                state.push(Slot::unnamed(Type::Int));
            }
            (Operator::Cast, Operand::Type(to)) => {
                let top = state.peek_mut(0).ok_or_else(|| stack_error(span, "empty stack"))?;
                if !top.ty.is_value() {
                    return Err(type_error(span, format!("`cast` cannot convert {}", top.ty)));
                }
                top.ty = (*to).into();
            }
            (Operator::Deref, Operand::Type(to)) => {
                let a = Self::pop(state);
                if a.ty != Type::Ptr {
                    return Err(type_error(span, format!("`deref` expects ptr, found {}", a.ty)));
                }
                state.push(Slot::unnamed((*to).into()));
            }
            (Operator::Call, _) => self.call(span, state)?,
            (op, _) if op.comparison().is_some() => {
                self.compare_operands(op, span, state)?;
                state.push(Slot::unnamed(Type::Int));
            }
            (op, _) if op.info().pops == Some(2) && op.info().pushes == 1 => {
                let b = Self::pop(state);
                let a = Self::pop(state);
                let ty = binary_result(op, &a.ty, &b.ty).ok_or_else(|| {
                    type_error(span, format!("`{op}` cannot combine {} and {}", a.ty, b.ty))
                })?;
                state.push(Slot::unnamed(ty));
            }
            _ => {
                return Err(DiagnosticMessage::new(
                    ErrorKind::Internal,
                    span,
                    format!("unexpected operation `{operation}` inside a block"),
                ));
            }
        }
        Ok(())
    }

    /// Slot names shadow function names.
    fn resolve(&self, name: &str, span: Span, state: &StackState) -> Result<Resolution, CheckError> {
        if let Some(k) = state.find(name) {
            if k > MAX_PICK {
                return Err(stack_error(
                    span,
                    format!("slot `{name}` is {k} deep, beyond the reach of `pick`"),
                ));
            }
            return Ok(Resolution::Slot(k));
        }
        if self.signatures.contains_key(name) {
            return Ok(Resolution::Function(name.to_string()));
        }
        Err(name_error(span, format!("`{name}` is not a slot or function")))
    }

    /// Pops two operands of the same value type.
    fn compare_operands(
        &self,
        op: Operator,
        span: Span,
        state: &mut StackState,
    ) -> Result<(), CheckError> {
        self.need(op, span, state, 2)?;
        let b = Self::pop(state);
        let a = Self::pop(state);
        if a.ty != b.ty || !a.ty.is_value() {
            return Err(type_error(
                span,
                format!("`{op}` cannot compare {} with {}", a.ty, b.ty),
            ));
        }
        Ok(())
    }

    fn call(&self, span: Span, state: &mut StackState) -> Result<(), CheckError> {
        self.need(Operator::Call, span, state, 1)?;
        let top = state.peek(0).map(|s| s.ty.clone()).unwrap_or(Type::Int);
        let Type::Func(callee) = top else {
            return Err(type_error(
                span,
                format!("`call` expects a function reference on top, found {top}"),
            ));
        };
        let needed = 1 + callee.params.len();
        if state.depth() < needed {
            return Err(stack_error(
                span,
                format!(
                    "call to `{}` needs {needed} stack slot{}, found {}",
                    callee.name,
                    plural(needed),
                    state.depth()
                ),
            ));
        }
        state.pop();
        for (i, param) in callee.params.iter().enumerate().rev() {
            let arg = Self::pop(state);
            if arg.ty != Type::from(*param) {
                return Err(type_error(
                    span,
                    format!(
                        "argument {} of `{}` expects {param}, found {}",
                        i + 1,
                        callee.name,
                        arg.ty
                    ),
                ));
            }
        }
        state.push(Slot::unnamed(callee.returns.into()));
        Ok(())
    }

    fn check_return(&self, span: Span, implicit: bool, state: &StackState) -> Result<(), CheckError> {
        let Some(top) = state.peek(0) else {
            let message = if implicit {
                format!("function ends with an empty stack, expected {}", self.returns)
            } else {
                "`return` needs 1 stack slot, found 0".to_string()
            };
            return Err(stack_error(span, message));
        };
        if top.ty != Type::from(self.returns) {
            return Err(type_error(
                span,
                format!("return value must be {}, found {}", self.returns, top.ty),
            ));
        }
        Ok(())
    }
}

fn binary_result(op: Operator, a: &Type, b: &Type) -> Option<Type> {
    use Type::{Int, Ptr};
    match (op, a, b) {
        (_, Int, Int) => Some(Int),
        (Operator::Add, Ptr, Int) | (Operator::Add, Int, Ptr) => Some(Ptr),
        (Operator::Sub, Ptr, Int) => Some(Ptr),
        (Operator::Sub, Ptr, Ptr) => Some(Int),
        _ => None,
    }
}
