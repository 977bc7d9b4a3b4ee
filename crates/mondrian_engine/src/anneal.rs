//! Simulated-annealing search over sequence-pair space.
//!
//! Each [`Annealer`] owns one floorplan instance and walks it through
//! randomized local moves, accepting improvements outright and regressions
//! with a temperature-dependent probability. The acceptance rules run in two
//! phases: before any placement fits the outline the search chases
//! feasibility dimension by dimension; once inside, it minimizes the weighted
//! area/wirelength cost and refuses to leave the outline except through an
//! uphill draw. When the temperature cools past its floor the annealer
//! "reforges": reheats, kicks the state with one large perturbation, and
//! periodically rewinds to the best solution seen, until a stall limit or
//! the wall-clock budget ends the run.

use crate::eval::{evaluate_axis, total_hpwl, Axis, SequencePair};
use crate::moves;
use mondrian_common::Point;
use mondrian_model::Floorplan;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Tunable annealing schedule.
///
/// The defaults are the production values; tests shrink them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Starting temperature.
    pub initial_temp: f64,
    /// Base of the reheat temperature applied at each reforge.
    pub reforge_base: f64,
    /// Per-block contribution to the reheat temperature.
    pub reforge_per_block: f64,
    /// Geometric cooling rate, strictly less than 1.
    pub cooling_rate: f64,
    /// Temperature floor that triggers a reforge.
    pub temp_floor: f64,
    /// Trials per outer iteration.
    pub steps_per_temp: u32,
    /// Rewind to the overall best every this many reforges.
    pub revert_every: u32,
    /// Terminate after this many reforges without improvement.
    pub stall_limit: u32,
    /// Random shuffles drawn by [`Annealer::initialize`].
    pub init_shuffles: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            initial_temp: 10_000.0,
            reforge_base: 1_800.0,
            reforge_per_block: 10.0,
            cooling_rate: 0.9999,
            temp_floor: 10.0,
            steps_per_temp: 10,
            revert_every: 3,
            stall_limit: 40,
            init_shuffles: 4_000,
        }
    }
}

/// Counters accumulated across one [`Annealer::run`].
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SearchStats {
    /// Moves proposed.
    pub trials: u64,
    /// Moves accepted, directly or uphill.
    pub accepted: u64,
    /// Moves accepted through the uphill probability draw.
    pub uphill: u64,
    /// Moves rejected and undone.
    pub rejected: u64,
    /// Reheat events.
    pub reforges: u64,
}

/// A complete copyable placement: sequence pair, block origins, rotations.
///
/// The unit of cross-worker solution sharing; applying one to a
/// structurally-identical floorplan reproduces the packing exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The sequence pair.
    pub sp: SequencePair,
    /// Per-block bottom-left corners, in block-ID order.
    pub origins: Vec<Point>,
    /// Per-block rotation flags, in block-ID order.
    pub rotated: Vec<bool>,
}

/// Which acceptance regime the search is in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    /// No placement inside the outline found yet.
    Seeking,
    /// A feasible placement exists; minimize cost without leaving the outline.
    Refining,
}

/// One simulated-annealing search worker.
///
/// Owns its floorplan instance and its random stream exclusively; workers
/// share state only through explicit [`Solution`] copies.
pub struct Annealer {
    plan: Floorplan,
    sp: SequencePair,
    alpha: f64,
    schedule: Schedule,
    rng: StdRng,
    stats: SearchStats,
}

impl Annealer {
    /// Creates a worker over its own floorplan instance, with the identity
    /// sequence pair and a private random stream seeded from `seed`.
    pub fn new(plan: Floorplan, alpha: f64, seed: u64, schedule: Schedule) -> Self {
        let n = plan.block_count();
        Self {
            plan,
            sp: SequencePair::identity(n),
            alpha,
            schedule,
            rng: StdRng::seed_from_u64(seed),
            stats: SearchStats::default(),
        }
    }

    /// Returns the floorplan in its current search state.
    pub fn plan(&self) -> &Floorplan {
        &self.plan
    }

    /// Returns the current sequence pair.
    pub fn sequence_pair(&self) -> &SequencePair {
        &self.sp
    }

    /// Returns the area/wirelength tradeoff weight.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the counters accumulated so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Evaluates one axis of the current sequence pair, updating block
    /// coordinates on that axis, and returns the packed extent.
    pub fn evaluate(&mut self, axis: Axis) -> i64 {
        evaluate_axis(&mut self.plan, &self.sp, axis)
    }

    /// Returns the total half-perimeter wirelength of the current placement.
    ///
    /// Both axes must have been evaluated since the last move.
    pub fn total_wirelength(&self) -> i64 {
        total_hpwl(&self.plan)
    }

    /// The weighted cost of a placement with the given extents:
    /// `alpha * area + (1 - alpha) * wirelength`.
    pub fn cost(&self, len_x: i64, len_y: i64) -> f64 {
        self.alpha * (len_x * len_y) as f64 + (1.0 - self.alpha) * self.total_wirelength() as f64
    }

    /// Captures the current placement as a copyable [`Solution`].
    pub fn solution(&self) -> Solution {
        Solution {
            sp: self.sp.clone(),
            origins: self.plan.blocks.iter().map(|b| b.origin).collect(),
            rotated: self.plan.blocks.iter().map(|b| b.is_rotated()).collect(),
        }
    }

    /// Overwrites the live search state with a previously captured solution.
    ///
    /// The solution must come from a structurally-identical floorplan (same
    /// blocks in the same order); nets and terminals are untouched.
    pub fn apply_solution(&mut self, solution: &Solution) {
        assert_eq!(
            solution.rotated.len(),
            self.plan.block_count(),
            "solution comes from a different topology"
        );
        self.sp = solution.sp.clone();
        for (i, block) in self.plan.blocks.iter_mut().enumerate() {
            block.origin = solution.origins[i];
            if block.is_rotated() != solution.rotated[i] {
                block.rotate90();
            }
        }
    }

    /// Copies another worker's full solution state into this one.
    pub fn copy_solution_from(&mut self, other: &Annealer) {
        self.apply_solution(&other.solution());
    }

    /// Randomized initialization: draws `init_shuffles` random sequence
    /// pairs and keeps the cheapest. Returns its extents.
    pub fn initialize(&mut self) -> (i64, i64) {
        let n = self.plan.block_count();
        self.sp = SequencePair::identity(n);
        if n == 0 {
            return (0, 0);
        }

        let mut best_cost = f64::INFINITY;
        let mut best_sp = self.sp.clone();
        let mut best_ext = (0, 0);
        for _ in 0..self.schedule.init_shuffles {
            self.sp.x[1..].shuffle(&mut self.rng);
            self.sp.y[1..].shuffle(&mut self.rng);
            let len_x = self.evaluate(Axis::X);
            let len_y = self.evaluate(Axis::Y);
            let cost = self.cost(len_x, len_y);
            if cost < best_cost {
                best_cost = cost;
                best_sp = self.sp.clone();
                best_ext = (len_x, len_y);
            }
        }
        self.sp = best_sp;
        self.evaluate(Axis::X);
        self.evaluate(Axis::Y);
        best_ext
    }

    /// Runs the annealing loop until the wall-clock budget is exhausted or
    /// the search stalls.
    ///
    /// Returns the best feasible cost found, or `None` if no trial ever fit
    /// the outline — a valid outcome, not an error. On `Some`, the live
    /// state holds the returned solution; on `None` it is left as last
    /// evaluated.
    pub fn run(&mut self, budget: Duration) -> Option<f64> {
        let start = Instant::now();
        let n = self.plan.block_count();

        let mut best_x = self.evaluate(Axis::X);
        let mut best_y = self.evaluate(Axis::Y);
        let mut best_cost = self.cost(best_x, best_y);
        let mut best_size = best_x * best_y;

        let mut phase = if self.plan.outline.contains(best_x, best_y) {
            Phase::Refining
        } else {
            Phase::Seeking
        };
        let mut overall: Option<(f64, Solution)> = match phase {
            Phase::Refining => Some((best_cost, self.solution())),
            Phase::Seeking => None,
        };

        if n == 0 {
            return overall.map(|(cost, _)| cost);
        }

        let reforge_temp = self.schedule.reforge_base + self.schedule.reforge_per_block * n as f64;
        let mut temp = self.schedule.initial_temp;
        let mut finish_count: u32 = 0;

        loop {
            for _ in 0..self.schedule.steps_per_temp {
                self.stats.trials += 1;
                let log = moves::perturb(&mut self.sp, &mut self.plan, &mut self.rng, 1);
                let len_x = self.evaluate(Axis::X);
                let len_y = self.evaluate(Axis::Y);
                let size = len_x * len_y;
                let fits = self.plan.outline.contains(len_x, len_y);

                let mut cost = f64::INFINITY;
                let mut accept = match phase {
                    Phase::Seeking => {
                        if fits {
                            phase = Phase::Refining;
                            cost = self.cost(len_x, len_y);
                            true
                        } else if len_x <= self.plan.outline.width {
                            len_y <= best_y
                        } else if len_y <= self.plan.outline.height {
                            len_x <= best_x
                        } else {
                            size < best_size
                        }
                    }
                    Phase::Refining => {
                        cost = self.cost(len_x, len_y);
                        // Never regress out of feasibility on cost alone.
                        cost < best_cost && fits
                    }
                };

                if !accept {
                    let prob = match phase {
                        Phase::Refining => ((best_cost - cost) / temp).exp(),
                        Phase::Seeking => ((best_size - size) as f64 / temp).exp(),
                    };
                    if self.rng.gen::<f64>() < prob {
                        accept = true;
                        self.stats.uphill += 1;
                        if !fits {
                            phase = Phase::Seeking;
                        }
                    } else {
                        moves::undo(&mut self.sp, &mut self.plan, &log);
                        self.stats.rejected += 1;
                    }
                }

                if accept {
                    self.stats.accepted += 1;
                    best_cost = cost;
                    best_size = size;
                    best_x = len_x;
                    best_y = len_y;
                    let improves = overall.as_ref().map_or(true, |(c, _)| cost < *c);
                    if fits && improves {
                        overall = Some((cost, self.solution()));
                        finish_count = 0;
                    }
                }
            }

            if temp < self.schedule.temp_floor {
                temp = reforge_temp;
                // Escape kick; deliberately not undoable.
                moves::perturb(&mut self.sp, &mut self.plan, &mut self.rng, n);
                self.stats.reforges += 1;
                if let Some((_, solution)) = &overall {
                    if finish_count == self.schedule.stall_limit {
                        break;
                    }
                    if finish_count % self.schedule.revert_every == 0 {
                        let solution = solution.clone();
                        self.apply_solution(&solution);
                    }
                    finish_count += 1;
                }
            }

            if start.elapsed() > budget {
                break;
            }

            temp *= self.schedule.cooling_rate;
        }

        match overall {
            Some((cost, solution)) => {
                self.apply_solution(&solution);
                Some(cost)
            }
            None => None,
        }
    }
}
