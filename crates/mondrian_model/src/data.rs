//! Core floorplan data structures.
//!
//! Defines the entities the search engine operates on: rectangular [`Block`]s
//! with a mutable position and rotation state, fixed [`Terminal`] points,
//! [`Net`]s holding non-owning member handles, and the [`Floorplan`] registry
//! that owns them all together with the target outline.

use mondrian_common::{BlockId, NetId, Outline, Point, TerminalId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A rectangular module to be placed.
///
/// The bottom-left corner is mutable and rewritten by every evaluation pass.
/// Width and height are only ever changed together, by [`rotate90`](Self::rotate90).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// The block's ID in the registry.
    pub id: BlockId,
    /// The block's name, unique within one floorplan.
    pub name: String,
    /// Bottom-left corner of the block.
    pub origin: Point,
    width: i64,
    height: i64,
    rotated: bool,
}

impl Block {
    /// Creates an unplaced, unrotated block with the given dimensions.
    pub fn new(id: BlockId, name: impl Into<String>, width: i64, height: i64) -> Self {
        Self {
            id,
            name: name.into(),
            origin: Point::default(),
            width,
            height,
            rotated: false,
        }
    }

    /// Returns the current width (after any rotation).
    pub fn width(&self) -> i64 {
        self.width
    }

    /// Returns the current height (after any rotation).
    pub fn height(&self) -> i64 {
        self.height
    }

    /// Returns whether the block is currently rotated 90 degrees.
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// Rotates the block 90 degrees: swaps width and height and toggles the
    /// rotation flag. Self-inverse.
    pub fn rotate90(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
        self.rotated = !self.rotated;
    }

    /// Returns the center of the block, used as its pin location for
    /// wirelength estimation.
    pub fn center(&self) -> Point {
        Point::new(self.origin.x + self.width / 2, self.origin.y + self.height / 2)
    }
}

/// A fixed connection point outside the packed region.
///
/// Never moved after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terminal {
    /// The terminal's ID in the registry.
    pub id: TerminalId,
    /// The terminal's name, unique within one floorplan.
    pub name: String,
    /// The terminal's fixed position.
    pub position: Point,
}

/// A multi-pin net connecting blocks and terminals.
///
/// Members are held as registry handles, never owned. Immutable after load;
/// used only to compute half-perimeter wirelength.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// The net's ID in the registry.
    pub id: NetId,
    /// Member blocks, by handle.
    pub blocks: Vec<BlockId>,
    /// Member terminals, by handle.
    pub terminals: Vec<TerminalId>,
}

/// The floorplan registry: all entities of one problem instance plus the
/// target outline.
///
/// Owned exclusively by one search worker. Parallel search clones the
/// registry once per worker; the clones share nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floorplan {
    /// The fixed target outline.
    pub outline: Outline,
    /// All blocks.
    pub blocks: Vec<Block>,
    /// All terminals.
    pub terminals: Vec<Terminal>,
    /// All nets.
    pub nets: Vec<Net>,
    /// Auxiliary index: block name to ID (rebuilt on deserialization).
    #[serde(skip)]
    block_by_name: HashMap<String, BlockId>,
    /// Auxiliary index: terminal name to ID (rebuilt on deserialization).
    #[serde(skip)]
    terminal_by_name: HashMap<String, TerminalId>,
}

impl Floorplan {
    /// Creates an empty floorplan with the given outline.
    pub fn new(outline: Outline) -> Self {
        Self {
            outline,
            blocks: Vec::new(),
            terminals: Vec::new(),
            nets: Vec::new(),
            block_by_name: HashMap::new(),
            terminal_by_name: HashMap::new(),
        }
    }

    /// Adds a block and returns its ID.
    pub fn add_block(&mut self, name: impl Into<String>, width: i64, height: i64) -> BlockId {
        let id = BlockId::from_raw(self.blocks.len() as u32);
        let block = Block::new(id, name, width, height);
        self.block_by_name.insert(block.name.clone(), id);
        self.blocks.push(block);
        id
    }

    /// Adds a terminal and returns its ID.
    pub fn add_terminal(&mut self, name: impl Into<String>, position: Point) -> TerminalId {
        let id = TerminalId::from_raw(self.terminals.len() as u32);
        let name = name.into();
        self.terminal_by_name.insert(name.clone(), id);
        self.terminals.push(Terminal { id, name, position });
        id
    }

    /// Adds a net over the given member handles and returns its ID.
    pub fn add_net(&mut self, blocks: Vec<BlockId>, terminals: Vec<TerminalId>) -> NetId {
        let id = NetId::from_raw(self.nets.len() as u32);
        self.nets.push(Net {
            id,
            blocks,
            terminals,
        });
        id
    }

    /// Returns the block with the given ID.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the block with the given ID.
    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.as_raw() as usize]
    }

    /// Returns the terminal with the given ID.
    pub fn terminal(&self, id: TerminalId) -> &Terminal {
        &self.terminals[id.as_raw() as usize]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.as_raw() as usize]
    }

    /// Looks up a block ID by name.
    pub fn block_named(&self, name: &str) -> Option<BlockId> {
        self.block_by_name.get(name).copied()
    }

    /// Looks up a terminal ID by name.
    pub fn terminal_named(&self, name: &str) -> Option<TerminalId> {
        self.terminal_by_name.get(name).copied()
    }

    /// Returns the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the number of terminals.
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Rebuilds auxiliary name indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.block_by_name.clear();
        for (i, block) in self.blocks.iter().enumerate() {
            self.block_by_name
                .insert(block.name.clone(), BlockId::from_raw(i as u32));
        }
        self.terminal_by_name.clear();
        for (i, terminal) in self.terminals.iter().enumerate() {
            self.terminal_by_name
                .insert(terminal.name.clone(), TerminalId::from_raw(i as u32));
        }
    }

    /// Returns the sum of all block widths (an upper bound on any packed
    /// X extent).
    pub fn total_width(&self) -> i64 {
        self.blocks.iter().map(|b| b.width()).sum()
    }

    /// Returns the sum of all block heights (an upper bound on any packed
    /// Y extent).
    pub fn total_height(&self) -> i64 {
        self.blocks.iter().map(|b| b.height()).sum()
    }
}
