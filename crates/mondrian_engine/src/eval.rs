//! Sequence-pair evaluation and wirelength.
//!
//! A sequence pair encodes a packing as two permutations of block ranks:
//! block `a` left of block `b` iff `a` precedes `b` in both sequences, and
//! below `b` iff `a` follows in X but precedes in Y. Coordinates fall out of
//! a longest-common-weighted-subsequence sweep: scanning one sequence while
//! tracking, per position in the other, the extent of the best partial
//! packing ending there. The live positions are kept in an [`OrderSet`] so
//! each step costs a predecessor query, an insert, and the discard of any
//! positions it dominates.

use crate::order_set::OrderSet;
use mondrian_common::BlockId;
use mondrian_model::{Floorplan, Net};
use serde::{Deserialize, Serialize};

/// The placement axis being evaluated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
    /// Horizontal: coordinates from block widths.
    X,
    /// Vertical: coordinates from block heights.
    Y,
}

/// A pair of permutations of the block ranks `{1..n}`.
///
/// Index 0 of each array is an unused slot for the reserved rank 0, the
/// implicit origin anchor; real blocks occupy ranks `1..=n` (`rank = raw
/// block ID + 1`). Between moves both arrays are always full permutations —
/// every move and every undo preserves this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePair {
    /// The X sequence (left-of precedence).
    pub x: Vec<usize>,
    /// The Y sequence (below precedence, read jointly with X).
    pub y: Vec<usize>,
}

impl SequencePair {
    /// Creates the identity pair over `n` blocks: both sequences `1..=n`.
    pub fn identity(n: usize) -> Self {
        Self {
            x: (0..=n).collect(),
            y: (0..=n).collect(),
        }
    }

    /// Returns the number of blocks encoded.
    pub fn block_count(&self) -> usize {
        self.x.len() - 1
    }

    /// Returns whether both sequences are permutations of `{1..n}`.
    pub fn is_permutation(&self) -> bool {
        let n = self.block_count();
        if self.y.len() != n + 1 {
            return false;
        }
        let full = |seq: &[usize]| {
            let mut seen = vec![false; n + 1];
            seq[1..].iter().all(|&r| {
                r >= 1 && r <= n && !std::mem::replace(&mut seen[r], true)
            })
        };
        full(&self.x) && full(&self.y)
    }
}

/// Evaluates one axis of the packing encoded by `sp`.
///
/// Writes every block's coordinate on that axis into `plan` and returns the
/// packed extent. Idempotent for an unchanged pair. The X axis scans the X
/// sequence forward; the Y axis scans it in reverse, which turns left-of
/// precedence into below precedence without mutating the pair.
pub fn evaluate_axis(plan: &mut Floorplan, sp: &SequencePair, axis: Axis) -> i64 {
    let n = plan.block_count();
    debug_assert_eq!(sp.block_count(), n);
    debug_assert!(sp.is_permutation());
    if n == 0 {
        return 0;
    }

    // match_pos[rank] = position of that rank in the Y sequence.
    let mut match_pos = vec![0usize; n + 1];
    for i in 1..=n {
        match_pos[sp.y[i]] = i;
    }

    let mut live = OrderSet::new(n);
    live.insert(0);
    // bucket[p] = extent of the best partial packing whose last block sits at
    // Y-position p; None marks a discarded (dominated) position. Position 0
    // is the origin anchor.
    let mut buckets: Vec<Option<i64>> = vec![None; n + 1];
    buckets[0] = Some(0);

    for step in 0..n {
        let rank = match axis {
            Axis::X => sp.x[step + 1],
            Axis::Y => sp.x[n - step],
        };
        let p = match_pos[rank];
        live.insert(p);
        let pred = live.predecessor(p).expect("origin anchor is always live");
        let start = buckets[pred].expect("live predecessor has a bucket");

        let block = plan.block_mut(BlockId::from_raw((rank - 1) as u32));
        let extent = match axis {
            Axis::X => {
                block.origin.x = start;
                start + block.width()
            }
            Axis::Y => {
                block.origin.y = start;
                start + block.height()
            }
        };
        buckets[p] = Some(extent);

        // Discard positions after p whose extent p now dominates. Live
        // extents are strictly increasing in position, so the first survivor
        // ends the walk.
        let mut cursor = live.successor(p);
        while let Some(s) = cursor {
            if buckets[s].expect("live member has a bucket") > extent {
                break;
            }
            cursor = live.successor(s);
            live.remove(s);
            buckets[s] = None;
        }
    }

    let top = live.maximum().expect("origin anchor is always live");
    buckets[top].expect("maximum is live")
}

/// Computes the half-perimeter wirelength of one net over block centers and
/// terminal points. An empty net contributes 0.
///
/// Both axes must have been evaluated since the last move for the result to
/// reflect the current packing.
pub fn net_hpwl(plan: &Floorplan, net: &Net) -> i64 {
    if net.blocks.is_empty() && net.terminals.is_empty() {
        return 0;
    }

    let mut min_x = i64::MAX;
    let mut max_x = i64::MIN;
    let mut min_y = i64::MAX;
    let mut max_y = i64::MIN;

    for &id in &net.blocks {
        let c = plan.block(id).center();
        min_x = min_x.min(c.x);
        max_x = max_x.max(c.x);
        min_y = min_y.min(c.y);
        max_y = max_y.max(c.y);
    }

    for &id in &net.terminals {
        let p = plan.terminal(id).position;
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    (max_x - min_x) + (max_y - min_y)
}

/// Computes the total half-perimeter wirelength over all nets.
pub fn total_hpwl(plan: &Floorplan) -> i64 {
    plan.nets.iter().map(|net| net_hpwl(plan, net)).sum()
}
