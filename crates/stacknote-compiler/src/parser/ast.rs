//! Parsed functions, before control-flow construction.

use stacknote_bytecode::{Signature, ValueType};

use crate::diagnostics::Span;
use crate::ir::Operation;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
    pub ty: ValueType,
    pub name: String,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelDecl {
    pub name: String,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    Label(LabelDecl),
    Op(Operation),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub name_span: Span,
    pub returns: ValueType,
    pub args: Vec<Argument>,
    pub body: Vec<Statement>,
    /// Next free operation id, for passes that add operations.
    pub next_op_id: u32,
    /// A syntax error was reported inside the body; only the header is
    /// usable.
    pub broken: bool,
}

impl Function {
    pub fn signature(&self) -> Signature {
        Signature::new(
            self.name.clone(),
            self.returns,
            self.args.iter().map(|a| a.ty).collect(),
        )
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.body.iter().filter_map(|s| match s {
            Statement::Op(op) => Some(op),
            Statement::Label(_) => None,
        })
    }
}

/// Every function of one source file, in definition order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceUnit {
    pub functions: Vec<Function>,
}
