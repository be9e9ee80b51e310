//! Stack and type checking.
//!
//! Runs once on the freshly built graph and again after optimization; the
//! second run's result drives emission.

mod checker;
pub mod stack;


use std::collections::HashMap;

use indexmap::IndexMap;
use stacknote_bytecode::Signature;

pub use stack::{Slot, StackState, Type};

use crate::cfg::{BlockId, Cfg};
use crate::diagnostics::DiagnosticMessage;
use crate::ir::OpId;
use crate::parser::Function;

/// What a `load <name>` refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Copy of the slot this many positions below the top.
    Slot(usize),
    /// Reference to a function of the unit.
    Function(String),
}

#[derive(Clone, Debug)]
pub struct CheckResult {
    /// Slots needed above the incoming arguments.
    pub max_stack: u16,
    /// Deepest the stack gets, arguments included.
    pub peak: usize,
    pub resolutions: HashMap<OpId, Resolution>,
    /// Stack at the start of every reachable block.
    pub entry_states: HashMap<BlockId, StackState>,
}

impl CheckResult {
    pub fn resolution(&self, id: OpId) -> Option<&Resolution> {
        self.resolutions.get(&id)
    }
}

/// Check `cfg`, the body of `func`, against the unit's `signatures`.
pub fn check(
    cfg: &Cfg,
    func: &Function,
    signatures: &IndexMap<String, Signature>,
) -> Result<CheckResult, DiagnosticMessage> {
    checker::Checker::new(cfg, func.returns, signatures).run(&func.args)
}
