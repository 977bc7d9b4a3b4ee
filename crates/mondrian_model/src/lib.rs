//! Entity model and input loading for the Mondrian floorplanner.
//!
//! This crate defines the floorplan registry — blocks, terminals, nets, and
//! the target outline — and the loader for the block/terminal and net
//! description text formats. The registry is owned exclusively by one search
//! worker; parallel search clones it once per worker.

#![warn(missing_docs)]

pub mod data;
pub mod loader;

pub use data::{Block, Floorplan, Net, Terminal};
pub use loader::{load_blocks_file, load_blocks_str, load_nets_file, load_nets_str, LoadError};
