//! Shared foundational types for the Mondrian floorplanner.
//!
//! This crate provides opaque entity IDs, the integer geometry primitives
//! used throughout the placer, and the thread-safe warning sink that the
//! loader reports recoverable input problems through.

#![warn(missing_docs)]

pub mod geom;
pub mod ids;
pub mod sink;

pub use geom::{Outline, Point};
pub use ids::{BlockId, NetId, TerminalId};
pub use sink::WarningSink;
