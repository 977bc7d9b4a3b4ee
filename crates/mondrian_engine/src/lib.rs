//! Search engine for the Mondrian floorplanner.
//!
//! Takes a loaded [`Floorplan`](mondrian_model::Floorplan) and searches for a
//! low-cost packing inside its outline. Placement is encoded as a sequence
//! pair — two permutations of block ranks that jointly constrain relative
//! left-of and below ordering — and decoded into coordinates by a
//! longest-common-weighted-subsequence sweep.
//!
//! # Pipeline
//!
//! 1. **Initialize** — best-of-N random shuffles of the sequence pair
//! 2. **Anneal** — randomized local moves with exact undo, driven by a
//!    two-phase acceptance state machine with periodic reheating
//! 3. **Coordinate** — K independent annealers, periodically collapsed onto
//!    the globally best solution
//!
//! # Usage
//!
//! ```ignore
//! use mondrian_engine::{Coordinator, Schedule};
//!
//! let mut coordinator = Coordinator::new(&plan, alpha, Schedule::default(), workers, rounds, slice, seed);
//! coordinator.initialize();
//! let (winner, cost) = coordinator.run();
//! ```

#![warn(missing_docs)]

pub mod anneal;
pub mod eval;
pub mod moves;
pub mod order_set;
pub mod parallel;
pub mod report;

pub use anneal::{Annealer, Schedule, SearchStats, Solution};
pub use eval::{evaluate_axis, net_hpwl, total_hpwl, Axis, SequencePair};
pub use moves::Move;
pub use order_set::OrderSet;
pub use parallel::Coordinator;
pub use report::{BlockRect, PlacementReport};
