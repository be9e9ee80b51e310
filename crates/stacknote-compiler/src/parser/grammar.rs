//! Grammar productions.
//!
//! ```text
//! unit      := { function }
//! function  := 'define' NAME 'returns' TYPE END { 'argument' TYPE NAME END } { stmt }
//! stmt      := NAME ':' [op] END | op END
//! op        := OPNAME [ operand { ',' operand } ]
//! ```

use log::trace;
use stacknote_bytecode::ValueType;

use super::ast::{Argument, Function, LabelDecl, SourceUnit, Statement};
use super::core::{PResult, Parser, Reported};
use super::lexer::{TokenKind, parse_int};
use crate::diagnostics::{ErrorKind, Span};
use crate::ir::{OpIds, Operand, Operation, SlotRef};
use crate::operator::{OperandShape, Operator};

/// Operand as written, before its meaning is known.
#[derive(Clone, Debug)]
enum RawOperand {
    Int(i64, Span),
    Ident(String, Span),
}

impl RawOperand {
    fn span(&self) -> Span {
        match self {
            Self::Int(_, span) | Self::Ident(_, span) => *span,
        }
    }
}

impl Parser<'_> {
    pub fn parse_unit(&mut self) -> SourceUnit {
        let mut unit = SourceUnit::default();
        loop {
            self.skip_terminators();
            if self.eof() {
                break;
            }
            if !self.currently_is(TokenKind::KwDefine) {
                self.function = None;
                self.error_here(format!("expected `define`, found {}", self.found()));
                self.pos += 1;
                self.recover_to_define();
                continue;
            }
            if let Some(func) = self.function_def() {
                unit.functions.push(func);
            }
        }
        unit
    }

    /// Returns `None` only when the header itself is unusable.
    fn function_def(&mut self) -> Option<Function> {
        self.bump();
        self.function = None;
        self.ids = OpIds::new();

        let (name, name_span, returns) = match self.header() {
            Ok(header) => header,
            Err(Reported) => {
                self.recover_to_define();
                return None;
            }
        };
        trace!("parsing function `{name}`");
        self.function = Some(name.clone());

        let mut func = Function {
            name,
            name_span,
            returns,
            args: Vec::new(),
            body: Vec::new(),
            next_op_id: 0,
            broken: false,
        };

        if self.body(&mut func).is_err() {
            func.broken = true;
            self.recover_to_define();
        }
        func.next_op_id = self.ids.peek();
        Some(func)
    }

    fn header(&mut self) -> PResult<(String, Span, ValueType)> {
        let name = self.expect(TokenKind::Ident, "function name")?;
        self.expect(TokenKind::KwReturns, "`returns`")?;
        let returns = self.type_name()?;
        self.expect_end()?;
        Ok((self.text(&name).to_string(), name.span, returns))
    }

    fn body(&mut self, func: &mut Function) -> PResult<()> {
        loop {
            self.skip_terminators();
            match self.current() {
                None | Some(TokenKind::KwDefine) => return Ok(()),
                Some(TokenKind::KwArgument) => {
                    if !func.body.is_empty() {
                        return Err(self.error_here("arguments must come before operations"));
                    }
                    let arg = self.argument()?;
                    if func.args.iter().any(|a| a.name == arg.name) {
                        let message = format!("argument `{}` is already defined", arg.name);
                        return Err(self.error_at(ErrorKind::Name, arg.span, message));
                    }
                    func.args.push(arg);
                }
                Some(_) => self.statement(&mut func.body)?,
            }
        }
    }

    fn argument(&mut self) -> PResult<Argument> {
        self.bump();
        let ty = self.type_name()?;
        let name = self.expect(TokenKind::Ident, "argument name")?;
        self.expect_end()?;
        Ok(Argument {
            ty,
            name: self.text(&name).to_string(),
            span: name.span,
        })
    }

    fn type_name(&mut self) -> PResult<ValueType> {
        let token = self.expect(TokenKind::Ident, "type")?;
        let text = self.text(&token);
        ValueType::from_name(text).ok_or_else(|| {
            let message = format!("unknown type `{text}`, expected `int` or `ptr`");
            self.error_at(ErrorKind::Syntax, token.span, message)
        })
    }

    fn statement(&mut self, body: &mut Vec<Statement>) -> PResult<()> {
        if self.currently_is(TokenKind::Ident) && self.nth(1) == Some(TokenKind::Colon) {
            let name = self.bump();
            self.bump();
            body.push(Statement::Label(LabelDecl {
                name: self.text(&name).to_string(),
                span: name.span,
            }));
            if self.at_end_of_statement() {
                return self.expect_end();
            }
        }

        let ops = self.operation()?;
        body.extend(ops.into_iter().map(Statement::Op));
        self.expect_end()
    }

    /// One source operation, expanded into one or two operations when it
    /// carries a folded load.
    fn operation(&mut self) -> PResult<Vec<Operation>> {
        let name = self.expect(TokenKind::Ident, "operation")?;
        let text = self.text(&name);
        let Some(op) = Operator::from_name(text) else {
            let message = format!("unknown operation `{text}`");
            return Err(self.error_at(ErrorKind::Syntax, name.span, message));
        };

        let mut operands = self.operand_list()?;
        let span = operands
            .last()
            .map_or(name.span, |last| name.span.cover(last.span()));

        let info = op.info();
        let rest = info.shape.count();
        let mut ops = Vec::with_capacity(2);

        match operands.len() {
            n if n == rest => {}
            n if n == rest + 1 && info.foldable => {
                let folded = operands.remove(0);
                let load_span = folded.span();
                let operand = self.value_operand(folded);
                ops.push(Operation::new(
                    self.ids.fresh(),
                    Operator::Load,
                    operand,
                    load_span,
                ));
            }
            n if n == rest + 1 && rest > 0 => {
                let message = format!("`{op}` cannot take a folded load");
                return Err(self.error_at(ErrorKind::Syntax, span, message));
            }
            n => {
                let message = arity_message(op, rest, info.foldable, n);
                return Err(self.error_at(ErrorKind::Syntax, span, message));
            }
        }

        let operand = self.shaped_operand(op, info.shape, operands)?;
        ops.push(Operation::new(self.ids.fresh(), op, operand, span));
        Ok(ops)
    }

    fn operand_list(&mut self) -> PResult<Vec<RawOperand>> {
        let mut operands = Vec::new();
        if self.at_end_of_statement() || self.currently_is(TokenKind::KwDefine) {
            return Ok(operands);
        }
        loop {
            operands.push(self.raw_operand()?);
            if !self.eat(TokenKind::Comma) {
                return Ok(operands);
            }
        }
    }

    fn raw_operand(&mut self) -> PResult<RawOperand> {
        match self.current() {
            Some(TokenKind::Int) => {
                let token = self.bump();
                let text = self.text(&token);
                match parse_int(text) {
                    Some(value) => Ok(RawOperand::Int(value, token.span)),
                    None => {
                        let message = format!("integer `{text}` does not fit in 64 bits");
                        Err(self.error_at(ErrorKind::Syntax, token.span, message))
                    }
                }
            }
            Some(TokenKind::Ident) => {
                let token = self.bump();
                Ok(RawOperand::Ident(self.text(&token).to_string(), token.span))
            }
            _ => Err(self.error_here(format!("expected operand, found {}", self.found()))),
        }
    }

    fn value_operand(&self, raw: RawOperand) -> Operand {
        match raw {
            RawOperand::Int(value, _) => Operand::Int(value),
            RawOperand::Ident(name, _) => Operand::Name(name),
        }
    }

    fn shaped_operand(
        &mut self,
        op: Operator,
        shape: OperandShape,
        operands: Vec<RawOperand>,
    ) -> PResult<Operand> {
        let mut operands = operands.into_iter();
        let mut next = || operands.next();

        let operand = match shape {
            OperandShape::None => Operand::None,
            OperandShape::Value => match next() {
                Some(raw) => self.value_operand(raw),
                None => Operand::None,
            },
            OperandShape::Label => match next() {
                Some(RawOperand::Ident(name, _)) => Operand::Label(name),
                Some(raw) => {
                    let message = format!("`{op}` expects a label");
                    return Err(self.error_at(ErrorKind::Syntax, raw.span(), message));
                }
                None => Operand::None,
            },
            OperandShape::Index => match next() {
                Some(raw) => Operand::Index(self.slot_index(op, raw)?),
                None => Operand::None,
            },
            OperandShape::Type => match next() {
                Some(RawOperand::Ident(name, span)) => match ValueType::from_name(&name) {
                    Some(ty) => Operand::Type(ty),
                    None => {
                        let message = format!("unknown type `{name}`, expected `int` or `ptr`");
                        return Err(self.error_at(ErrorKind::Syntax, span, message));
                    }
                },
                Some(raw) => {
                    let message = format!("`{op}` expects a type");
                    return Err(self.error_at(ErrorKind::Syntax, raw.span(), message));
                }
                None => Operand::None,
            },
            OperandShape::Rename => {
                let (Some(slot), Some(name)) = (next(), next()) else {
                    return Ok(Operand::None);
                };
                let slot = match slot {
                    RawOperand::Ident(name, _) => SlotRef::Name(name),
                    raw => SlotRef::Position(self.slot_index(op, raw)?),
                };
                let name_span = name.span();
                let RawOperand::Ident(name, _) = name else {
                    let message = "`name` expects a name as its second operand";
                    return Err(self.error_at(ErrorKind::Syntax, name_span, message));
                };
                Operand::Rename { slot, name }
            }
        };
        Ok(operand)
    }

    fn slot_index(&mut self, op: Operator, raw: RawOperand) -> PResult<u8> {
        if let RawOperand::Int(value, _) = raw
            && let Ok(index) = u8::try_from(value)
        {
            return Ok(index);
        }
        let message = format!("`{op}` expects a slot index between 0 and 255");
        Err(self.error_at(ErrorKind::Syntax, raw.span(), message))
    }
}

fn arity_message(op: Operator, rest: usize, foldable: bool, got: usize) -> String {
    let expected = match (rest, foldable) {
        (0, false) => return format!("`{op}` takes no operands"),
        (0, true) => "no operands or one folded load".to_string(),
        (1, _) => "1 operand".to_string(),
        (n, _) => format!("{n} operands"),
    };
    format!("`{op}` takes {expected}, got {got}")
}
