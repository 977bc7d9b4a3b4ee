//! Parallel coordination of independent annealing workers.
//!
//! K workers search clones of the same floorplan with independently seeded
//! random streams. Each round is a fork–join: all workers run one wall-clock
//! slice concurrently, the join is the barrier, and the sequential merge
//! copies the cheapest worker's solution into every other worker before the
//! next round begins. No worker ever observes another's state inside a round.

use crate::anneal::{Annealer, Schedule};
use mondrian_model::Floorplan;
use rayon::prelude::*;
use std::time::Duration;

/// Runs several [`Annealer`]s concurrently and periodically collapses them
/// onto the globally best solution found so far.
pub struct Coordinator {
    workers: Vec<Annealer>,
    rounds: u32,
    slice: Duration,
}

impl Coordinator {
    /// Creates `workers` annealers over independent clones of `plan`.
    ///
    /// Worker `i` is seeded with `base_seed + i`, so runs with the same base
    /// seed are reproducible while workers stay decorrelated. At least one
    /// worker is always created.
    pub fn new(
        plan: &Floorplan,
        alpha: f64,
        schedule: Schedule,
        workers: usize,
        rounds: u32,
        slice: Duration,
        base_seed: u64,
    ) -> Self {
        let workers = workers.max(1);
        Self {
            workers: (0..workers)
                .map(|i| {
                    Annealer::new(
                        plan.clone(),
                        alpha,
                        base_seed.wrapping_add(i as u64),
                        schedule.clone(),
                    )
                })
                .collect(),
            rounds,
            slice,
        }
    }

    /// Returns the number of workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Returns a shared reference to a worker.
    pub fn worker(&self, index: usize) -> &Annealer {
        &self.workers[index]
    }

    /// Returns a mutable reference to a worker.
    pub fn worker_mut(&mut self, index: usize) -> &mut Annealer {
        &mut self.workers[index]
    }

    /// Randomly initializes every worker, in parallel.
    pub fn initialize(&mut self) {
        self.workers.par_iter_mut().for_each(|w| {
            w.initialize();
        });
    }

    /// Runs the full round protocol and returns the final winner's index and
    /// reported cost (`None` if no worker ever found a feasible placement).
    pub fn run(&mut self) -> (usize, Option<f64>) {
        let mut costs: Vec<Option<f64>> = vec![None; self.workers.len()];

        for _ in 0..self.rounds {
            let slice = self.slice;
            // Fork–join: collect() is the round barrier.
            costs = self
                .workers
                .par_iter_mut()
                .map(|w| w.run(slice))
                .collect();

            let winner = best_index(&costs);
            let solution = self.workers[winner].solution();
            for (i, worker) in self.workers.iter_mut().enumerate() {
                if i != winner {
                    worker.apply_solution(&solution);
                }
            }
        }

        let winner = best_index(&costs);
        (winner, costs[winner])
    }
}

/// Returns the index of the cheapest reported cost. Infeasible workers
/// (`None`) rank last; ties go to the lowest index.
fn best_index(costs: &[Option<f64>]) -> usize {
    let mut best = 0;
    for (i, cost) in costs.iter().enumerate().skip(1) {
        if cost.unwrap_or(f64::INFINITY) < costs[best].unwrap_or(f64::INFINITY) {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Axis;
    use mondrian_common::Outline;

    fn quick_schedule() -> Schedule {
        Schedule {
            init_shuffles: 50,
            ..Schedule::default()
        }
    }

    fn two_block_plan() -> Floorplan {
        let mut plan = Floorplan::new(Outline::new(4, 4));
        let a = plan.add_block("a", 2, 2);
        let b = plan.add_block("b", 2, 2);
        plan.add_net(vec![a, b], vec![]);
        plan
    }

    #[test]
    fn best_index_prefers_lowest_cost() {
        assert_eq!(best_index(&[Some(5.0), Some(3.0), Some(4.0)]), 1);
    }

    #[test]
    fn best_index_ranks_infeasible_last() {
        assert_eq!(best_index(&[None, Some(100.0), None]), 1);
        assert_eq!(best_index(&[None, None]), 0);
    }

    #[test]
    fn best_index_breaks_ties_low() {
        assert_eq!(best_index(&[Some(2.0), Some(2.0), Some(2.0)]), 0);
    }

    #[test]
    fn worker_count_is_at_least_one() {
        let plan = two_block_plan();
        let c = Coordinator::new(
            &plan,
            1.0,
            quick_schedule(),
            0,
            1,
            Duration::from_millis(10),
            1,
        );
        assert_eq!(c.worker_count(), 1);
    }

    #[test]
    fn round_protocol_converges_workers() {
        let plan = two_block_plan();
        let mut c = Coordinator::new(
            &plan,
            1.0,
            quick_schedule(),
            3,
            2,
            Duration::from_millis(40),
            0xC0FFEE,
        );
        c.initialize();
        let (winner, cost) = c.run();
        assert!(winner < 3);
        assert_eq!(cost, Some(8.0));

        // After the final merge every worker holds the same solution.
        let mut costs = Vec::new();
        for i in 0..c.worker_count() {
            let w = c.worker_mut(i);
            let len_x = w.evaluate(Axis::X);
            let len_y = w.evaluate(Axis::Y);
            costs.push(w.cost(len_x, len_y));
        }
        assert!(costs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn coordinator_handles_infeasible_instance() {
        let mut plan = Floorplan::new(Outline::new(2, 2));
        plan.add_block("huge", 9, 9);
        let mut c = Coordinator::new(
            &plan,
            1.0,
            quick_schedule(),
            2,
            1,
            Duration::from_millis(20),
            7,
        );
        c.initialize();
        let (winner, cost) = c.run();
        assert_eq!(winner, 0);
        assert_eq!(cost, None);
    }
}
