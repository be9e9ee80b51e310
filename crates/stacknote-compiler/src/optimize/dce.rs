//! Unreachable block removal.

use std::collections::HashSet;

use crate::cfg::{BlockId, Cfg};

/// Drop blocks with no path from the entry. Returns whether any were dropped.
pub fn remove_unreachable(cfg: &mut Cfg) -> bool {
    let reachable = compute_reachable(cfg);
    let before = cfg.order.len();
    cfg.order.retain(|id| reachable.contains(id));
    cfg.order.len() != before
}

fn compute_reachable(cfg: &Cfg) -> HashSet<BlockId> {
    let mut reachable = HashSet::new();
    let mut queue = vec![cfg.entry()];

    while let Some(id) = queue.pop() {
        if !reachable.insert(id) {
            continue;
        }
        queue.extend(cfg.block(id).terminator.successors());
    }

    reachable
}
