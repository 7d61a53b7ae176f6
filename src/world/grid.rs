//! In-memory world backed by a sparse block map
//!
//! Reference implementation of [`WorldAccess`], used by tests and by hosts
//! that want a standalone world (standalone servers, simulations). Regions
//! partition the horizontal plane into fixed-size squares.

use std::collections::{HashMap, HashSet};

use crate::core::types::{BlockPos, RegionKey};
use crate::world::block::{Block, Species};
use crate::world::{RemoveFailure, WorldAccess};

/// Default edge length of a region in blocks
pub const DEFAULT_REGION_SIZE: i32 = 512;

/// Sparse in-memory world
///
/// Every position not present in the map reads as [`Block::Air`].
pub struct GridWorld {
    /// Map from position to non-air blocks
    blocks: HashMap<BlockPos, Block>,
    /// Edge length of a host region in blocks
    region_size: i32,
    /// Regions marked unloaded (removals there fail)
    unloaded: HashSet<RegionKey>,
}

impl GridWorld {
    /// Create an empty world with the default region size
    pub fn new() -> Self {
        Self::with_region_size(DEFAULT_REGION_SIZE)
    }

    /// Create an empty world with a custom region edge length
    pub fn with_region_size(region_size: i32) -> Self {
        assert!(region_size > 0, "region size must be positive");
        Self {
            blocks: HashMap::new(),
            region_size,
            unloaded: HashSet::new(),
        }
    }

    /// Place a block, replacing whatever was there
    pub fn set_block(&mut self, pos: BlockPos, block: Block) {
        if block.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
    }

    /// Number of non-air blocks in the world
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Mark a region as unloaded; removals inside it fail from now on
    pub fn unload_region(&mut self, region: RegionKey) {
        self.unloaded.insert(region);
    }

    /// Mark a region as loaded again
    pub fn load_region(&mut self, region: RegionKey) {
        self.unloaded.remove(&region);
    }

    /// Plant an idealized tree: a 1x1 vertical trunk capped by a cubic canopy
    ///
    /// The canopy is a (2r+1)^3 cube of leaves centered on the top trunk
    /// block. Useful as a fixture for tests and demos.
    pub fn plant_tree(
        &mut self,
        base: BlockPos,
        species: Species,
        trunk_height: i32,
        cap_radius: i32,
    ) {
        for dy in 0..trunk_height {
            self.set_block(base.offset(0, dy, 0), Block::log(species));
        }
        let top = base.offset(0, trunk_height - 1, 0);
        for dx in -cap_radius..=cap_radius {
            for dy in -cap_radius..=cap_radius {
                for dz in -cap_radius..=cap_radius {
                    let pos = top.offset(dx, dy, dz);
                    if self.blocks.get(&pos).is_none_or(|b| !b.is_log()) {
                        self.set_block(pos, Block::leaves(species));
                    }
                }
            }
        }
    }
}

impl WorldAccess for GridWorld {
    fn block_at(&self, pos: BlockPos) -> Block {
        self.blocks.get(&pos).copied().unwrap_or(Block::Air)
    }

    fn remove_block(&mut self, pos: BlockPos) -> std::result::Result<Block, RemoveFailure> {
        if self.unloaded.contains(&self.region_of(pos)) {
            return Err(RemoveFailure::Unloaded);
        }
        Ok(self.blocks.remove(&pos).unwrap_or(Block::Air))
    }

    fn region_of(&self, pos: BlockPos) -> RegionKey {
        RegionKey::new(
            pos.x.div_euclid(self.region_size),
            pos.z.div_euclid(self.region_size),
        )
    }

    fn is_loaded(&self, pos: BlockPos) -> bool {
        !self.unloaded.contains(&self.region_of(pos))
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new()
    }
}
