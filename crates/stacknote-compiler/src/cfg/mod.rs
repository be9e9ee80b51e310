//! Basic blocks in an arena, addressed by [`BlockId`].
//!
//! Layout order lives in [`Cfg::order`]; the arena itself only grows, so
//! ids stay valid after blocks are dropped from the layout.

mod builder;


use std::collections::HashMap;
use std::fmt;

pub use builder::build;

use crate::diagnostics::Span;
use crate::ir::{OpId, OpIds, Operation};
use crate::operator::Comparison;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminator {
    FallThrough(BlockId),
    /// `b<cmp>`: pops two values, jumps to `taken` when the comparison holds.
    Branch {
        cmp: Comparison,
        id: OpId,
        span: Span,
        taken: BlockId,
        fallthrough: BlockId,
    },
    Goto {
        id: OpId,
        span: Span,
        target: BlockId,
    },
    /// `span` is `None` when control falls off the end of the function.
    Return { span: Option<Span> },
}

impl Terminator {
    pub fn successors(&self) -> Vec<BlockId> {
        match *self {
            Self::FallThrough(t) | Self::Goto { target: t, .. } => vec![t],
            Self::Branch {
                taken, fallthrough, ..
            } => vec![taken, fallthrough],
            Self::Return { .. } => Vec::new(),
        }
    }

    pub fn successors_mut(&mut self) -> Vec<&mut BlockId> {
        match self {
            Self::FallThrough(t) | Self::Goto { target: t, .. } => vec![t],
            Self::Branch {
                taken, fallthrough, ..
            } => vec![taken, fallthrough],
            Self::Return { .. } => Vec::new(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match *self {
            Self::FallThrough(_) => None,
            Self::Branch { span, .. } | Self::Goto { span, .. } => Some(span),
            Self::Return { span } => span,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub label: Option<String>,
    pub ops: Vec<Operation>,
    pub terminator: Terminator,
    /// Label, first operation or terminator; used for diagnostics.
    pub span: Span,
}

impl Block {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Control-flow graph of one function.
#[derive(Clone, Debug)]
pub struct Cfg {
    blocks: Vec<Block>,
    /// Live blocks in layout order; the first is the entry.
    pub order: Vec<BlockId>,
    pub ids: OpIds,
}

impl Cfg {
    pub(crate) fn new(blocks: Vec<Block>, ids: OpIds) -> Self {
        let order = blocks.iter().map(|b| b.id).collect();
        Self { blocks, order, ids }
    }

    pub fn entry(&self) -> BlockId {
        self.order[0]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0 as usize]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0 as usize]
    }

    /// Live blocks in layout order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.order.iter().map(|&id| self.block(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Block laid out right after `id`.
    pub fn next_in_layout(&self, id: BlockId) -> Option<BlockId> {
        let pos = self.order.iter().position(|&b| b == id)?;
        self.order.get(pos + 1).copied()
    }

    /// Incoming edge count per live block; a branch with both arms to the
    /// same block counts twice.
    pub fn predecessor_counts(&self) -> HashMap<BlockId, usize> {
        let mut counts: HashMap<BlockId, usize> = self.order.iter().map(|&id| (id, 0)).collect();
        for block in self.blocks() {
            for succ in block.terminator.successors() {
                *counts.entry(succ).or_default() += 1;
            }
        }
        counts
    }

    pub fn operation_count(&self) -> usize {
        self.blocks().map(|b| b.ops.len()).sum()
    }
}

impl fmt::Display for Cfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in self.blocks() {
            match &block.label {
                Some(label) => writeln!(f, "{} ({label}):", block.id)?,
                None => writeln!(f, "{}:", block.id)?,
            }
            for op in &block.ops {
                writeln!(f, "  {op}")?;
            }
            match &block.terminator {
                Terminator::FallThrough(t) => writeln!(f, "  -> {t}")?,
                Terminator::Branch {
                    cmp,
                    taken,
                    fallthrough,
                    ..
                } => writeln!(f, "  {} {taken} else {fallthrough}", cmp.branch_operator())?,
                Terminator::Goto { target, .. } => writeln!(f, "  goto {target}")?,
                Terminator::Return { span: Some(_) } => writeln!(f, "  return")?,
                Terminator::Return { span: None } => writeln!(f, "  return (end)")?,
            }
        }
        Ok(())
    }
}
