//! Individual rewrites. Each returns whether it changed the graph.

use std::collections::HashSet;

use log::trace;

use super::equivalence::blocks_equivalent;
use crate::cfg::{BlockId, Cfg, Terminator};
use crate::ir::{Operand, Operation};
use crate::operator::{Comparison, Operator};

/// `<cmp>; load 0; bne L` becomes `b<cmp> L`; `beq` takes the inverse.
pub fn fuse_compare_branches(cfg: &mut Cfg) -> bool {
    let mut changed = false;
    for id in cfg.order.clone() {
        let block = cfg.block_mut(id);
        let Terminator::Branch { cmp: branch, .. } = block.terminator else {
            continue;
        };
        if !matches!(branch, Comparison::Eq | Comparison::Ne) {
            continue;
        }
        let [.., compare, zero] = block.ops.as_slice() else {
            continue;
        };
        let Some(tested) = compare.op.comparison() else {
            continue;
        };
        if !(zero.op == Operator::Load && zero.operand == Operand::Int(0)) {
            continue;
        }

        let fused = match branch {
            Comparison::Ne => tested,
            _ => tested.inverse(),
        };
        trace!("{id}: fusing {} with {}", compare.op, branch.branch_operator());
        let keep = block.ops.len() - 2;
        block.ops.truncate(keep);
        if let Terminator::Branch { cmp, .. } = &mut block.terminator {
            *cmp = fused;
        }
        changed = true;
    }
    changed
}

/// A branch whose arms do the same thing drops its operands and jumps.
pub fn merge_equivalent_arms(cfg: &mut Cfg) -> bool {
    let mut changed = false;
    for id in cfg.order.clone() {
        let Terminator::Branch {
            id: op_id,
            span,
            taken,
            fallthrough,
            ..
        } = cfg.block(id).terminator
        else {
            continue;
        };
        let same = taken == fallthrough
            || blocks_equivalent(cfg.block(taken), cfg.block(fallthrough));
        if !same {
            continue;
        }

        trace!("{id}: arms {taken} and {fallthrough} are equivalent");
        let drops = [cfg.ids.fresh(), cfg.ids.fresh()]
            .map(|fresh| Operation::new(fresh, Operator::Drop, Operand::None, span));
        let block = cfg.block_mut(id);
        block.ops.extend(drops);
        block.terminator = Terminator::Goto {
            id: op_id,
            span,
            target: fallthrough,
        };
        changed = true;
    }
    changed
}

/// Where control ends up after passing through empty forwarding blocks.
///
/// `None` when the chain loops.
fn forward_target(cfg: &Cfg, start: BlockId) -> Option<BlockId> {
    let mut current = start;
    let mut visited = HashSet::new();
    loop {
        if !visited.insert(current) {
            return None;
        }
        let block = cfg.block(current);
        if !block.is_empty() {
            return Some(current);
        }
        match block.terminator {
            Terminator::Goto { target, .. } | Terminator::FallThrough(target) => {
                current = target;
            }
            _ => return Some(current),
        }
    }
}

/// Retarget edges that land on an empty block which only jumps elsewhere.
pub fn thread_jumps(cfg: &mut Cfg) -> bool {
    let mut changed = false;
    for id in cfg.order.clone() {
        let successors = cfg.block(id).terminator.successors();
        let targets: Vec<Option<BlockId>> =
            successors.iter().map(|&s| forward_target(cfg, s)).collect();

        let block = cfg.block_mut(id);
        for (slot, target) in block.terminator.successors_mut().into_iter().zip(targets) {
            if let Some(target) = target
                && *slot != target
            {
                trace!("{id}: threading {} to {target}", *slot);
                *slot = target;
                changed = true;
            }
        }
    }
    changed
}

/// A `goto` to the block laid out next becomes a fall-through.
pub fn remove_trivial_gotos(cfg: &mut Cfg) -> bool {
    let mut changed = false;
    for id in cfg.order.clone() {
        let next = cfg.next_in_layout(id);
        let block = cfg.block_mut(id);
        if let Terminator::Goto { target, .. } = block.terminator
            && Some(target) == next
        {
            block.terminator = Terminator::FallThrough(target);
            changed = true;
        }
    }
    changed
}

/// Fold a fall-through target with a single predecessor into it.
pub fn merge_blocks(cfg: &mut Cfg) -> bool {
    let mut changed = false;
    let mut index = 0;
    while index < cfg.order.len() {
        let id = cfg.order[index];
        let Terminator::FallThrough(next) = cfg.block(id).terminator else {
            index += 1;
            continue;
        };
        let preds = cfg.predecessor_counts();
        if next == id || next == cfg.entry() || preds.get(&next) != Some(&1) {
            index += 1;
            continue;
        }

        trace!("merging {next} into {id}");
        let absorbed = cfg.block(next).clone();
        let block = cfg.block_mut(id);
        block.ops.extend(absorbed.ops);
        block.terminator = absorbed.terminator;
        cfg.order.retain(|&b| b != next);
        changed = true;
        // `id` may now fall through again
    }
    changed
}
