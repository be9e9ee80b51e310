//! Branch elimination.
//!
//! Passes run in a fixed order until a whole round changes nothing:
//!
//! 1. **Fusion**: `<cmp>; load 0; bne` becomes a single conditional branch
//! 2. **Equivalent arms**: a branch whose arms agree becomes `drop; drop; goto`
//! 3. **Jump threading**: edges skip empty forwarding blocks
//! 4. **Trivial gotos**: a goto to the next block becomes a fall-through
//! 5. **Merging**: a block absorbs its sole-predecessor fall-through target
//! 6. **Unreachable removal**: blocks without a path from the entry go away
//!
//! Every pass strictly shrinks the number of branches, operations, blocks or
//! non-forwarding edges, so the loop terminates.

mod dce;
pub mod equivalence;
mod passes;

#[cfg(test)]
mod equivalence_tests;

use log::debug;

pub use dce::remove_unreachable;
pub use equivalence::equivalent;

use crate::cfg::Cfg;

/// Rewrite `cfg` in place. Returns the number of rounds that changed it.
pub fn optimize(cfg: &mut Cfg) -> usize {
    let mut rounds = 0;
    loop {
        let mut changed = passes::fuse_compare_branches(cfg);
        changed |= passes::merge_equivalent_arms(cfg);
        changed |= passes::thread_jumps(cfg);
        changed |= passes::remove_trivial_gotos(cfg);
        changed |= passes::merge_blocks(cfg);
        changed |= remove_unreachable(cfg);
        if !changed {
            break;
        }
        rounds += 1;
    }
    debug!(
        "optimized in {rounds} round(s): {} block(s), {} operation(s)",
        cfg.len(),
        cfg.operation_count()
    );
    rounds
}
