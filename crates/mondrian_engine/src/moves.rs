//! Randomized local moves over a sequence pair, with exact undo.
//!
//! Every move kind is self-inverse, so undoing a batch is replaying its log
//! in reverse with the same operation. Undo must restore the pre-move state
//! bit for bit; anything less corrupts the permutation invariant the
//! evaluator relies on.

use crate::eval::SequencePair;
use mondrian_common::BlockId;
use mondrian_model::Floorplan;
use rand::Rng;

/// One local perturbation of the search state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Exchange positions `i` and `j` in the X sequence.
    SwapX {
        /// First position.
        i: usize,
        /// Second position.
        j: usize,
    },
    /// Exchange positions `i` and `j` in the Y sequence.
    SwapY {
        /// First position.
        i: usize,
        /// Second position.
        j: usize,
    },
    /// Exchange positions `i` and `j` in both sequences, swapping the two
    /// blocks' full relative-order identity.
    SwapBoth {
        /// First position.
        i: usize,
        /// Second position.
        j: usize,
    },
    /// Rotate the block with the given rank 90 degrees.
    Rotate {
        /// The block's rank in `1..=n`.
        rank: usize,
    },
}

/// Applies one move. Every variant is its own inverse.
pub fn apply(sp: &mut SequencePair, plan: &mut Floorplan, mv: Move) {
    match mv {
        Move::SwapX { i, j } => sp.x.swap(i, j),
        Move::SwapY { i, j } => sp.y.swap(i, j),
        Move::SwapBoth { i, j } => {
            sp.x.swap(i, j);
            sp.y.swap(i, j);
        }
        Move::Rotate { rank } => {
            plan.block_mut(BlockId::from_raw((rank - 1) as u32)).rotate90();
        }
    }
}

/// Applies `depth` random moves and returns the log, in application order.
///
/// Positions are drawn uniformly from `[1, n]` (a draw may pair a position
/// with itself — a no-op, still logged), the move kind uniformly from the
/// four variants. Returns an empty log when the plan has no blocks.
pub fn perturb<R: Rng>(
    sp: &mut SequencePair,
    plan: &mut Floorplan,
    rng: &mut R,
    depth: usize,
) -> Vec<Move> {
    let n = plan.block_count();
    if n == 0 {
        return Vec::new();
    }

    let mut log = Vec::with_capacity(depth);
    for _ in 0..depth {
        let i = rng.gen_range(1..=n);
        let j = rng.gen_range(1..=n);
        let mv = match rng.gen_range(0..4) {
            0 => Move::SwapX { i, j },
            1 => Move::SwapY { i, j },
            2 => Move::SwapBoth { i, j },
            _ => Move::Rotate { rank: i },
        };
        apply(sp, plan, mv);
        log.push(mv);
    }
    log
}

/// Undoes a batch by replaying its log in reverse order.
pub fn undo(sp: &mut SequencePair, plan: &mut Floorplan, log: &[Move]) {
    for &mv in log.iter().rev() {
        apply(sp, plan, mv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mondrian_common::{Outline, Point};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_plan(n: usize) -> (Floorplan, SequencePair) {
        let mut plan = Floorplan::new(Outline::new(100, 100));
        for i in 0..n {
            plan.add_block(format!("b{i}"), (i as i64 % 3) + 1, (i as i64 % 4) + 1);
        }
        (plan, SequencePair::identity(n))
    }

    fn state_fingerprint(plan: &Floorplan, sp: &SequencePair) -> (Vec<usize>, Vec<usize>, Vec<(Point, i64, i64, bool)>) {
        (
            sp.x.clone(),
            sp.y.clone(),
            plan.blocks
                .iter()
                .map(|b| (b.origin, b.width(), b.height(), b.is_rotated()))
                .collect(),
        )
    }

    #[test]
    fn each_variant_is_self_inverse() {
        let (mut plan, mut sp) = test_plan(4);
        let before = state_fingerprint(&plan, &sp);
        for mv in [
            Move::SwapX { i: 1, j: 3 },
            Move::SwapY { i: 2, j: 4 },
            Move::SwapBoth { i: 1, j: 2 },
            Move::Rotate { rank: 3 },
        ] {
            apply(&mut sp, &mut plan, mv);
            apply(&mut sp, &mut plan, mv);
            assert_eq!(state_fingerprint(&plan, &sp), before, "{mv:?}");
        }
    }

    #[test]
    fn undo_restores_state_exactly() {
        let (mut plan, mut sp) = test_plan(6);
        let mut rng = StdRng::seed_from_u64(42);
        for depth in [1, 2, 5, 20] {
            let before = state_fingerprint(&plan, &sp);
            let log = perturb(&mut sp, &mut plan, &mut rng, depth);
            assert_eq!(log.len(), depth);
            undo(&mut sp, &mut plan, &log);
            assert_eq!(state_fingerprint(&plan, &sp), before);
        }
    }

    #[test]
    fn permutation_invariant_after_move_storm() {
        let (mut plan, mut sp) = test_plan(7);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let log = perturb(&mut sp, &mut plan, &mut rng, 3);
            assert!(sp.is_permutation());
            if rng.gen_bool(0.5) {
                undo(&mut sp, &mut plan, &log);
                assert!(sp.is_permutation());
            }
        }
    }

    #[test]
    fn self_swap_is_noop_but_logged() {
        let (mut plan, mut sp) = test_plan(3);
        let before = state_fingerprint(&plan, &sp);
        apply(&mut sp, &mut plan, Move::SwapBoth { i: 2, j: 2 });
        assert_eq!(state_fingerprint(&plan, &sp), before);
    }

    #[test]
    fn empty_plan_yields_empty_log() {
        let (mut plan, mut sp) = test_plan(0);
        let mut rng = StdRng::seed_from_u64(1);
        let log = perturb(&mut sp, &mut plan, &mut rng, 5);
        assert!(log.is_empty());
    }

    #[test]
    fn rotate_changes_only_the_target_block() {
        let (mut plan, mut sp) = test_plan(3);
        apply(&mut sp, &mut plan, Move::Rotate { rank: 2 });
        assert!(plan.blocks[1].is_rotated());
        assert!(!plan.blocks[0].is_rotated());
        assert!(!plan.blocks[2].is_rotated());
        assert_eq!(sp, SequencePair::identity(3));
    }
}
