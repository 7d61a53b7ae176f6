//! Per-block structure classifier
//!
//! Decides whether a candidate block belongs to the tree being discovered,
//! blocks further expansion, or is simply not tree material. Pure with
//! respect to world state: repeated calls in the same tick agree.

use crate::core::types::BlockPos;
use crate::world::block::{Block, Species};
use crate::world::WorldAccess;

/// Verdict for a single candidate block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Part of the tree; include and keep expanding
    TreeBlock,
    /// Player-structure signal; exclude and stop expanding through it
    Foreign,
    /// Not tree material; exclude, nothing to expand through
    Unknown,
}

/// Classifies candidate blocks against one tree's seed species
pub struct TreeClassifier {
    species: Species,
}

impl TreeClassifier {
    /// Classifier for a tree seeded by a log of the given species
    pub fn new(species: Species) -> Self {
        Self { species }
    }

    /// Classify the block at `pos`
    ///
    /// A log or leaf block of the seed species is a tree block unless a
    /// structure block sits face-adjacent to it; builds disguised as trees
    /// hang torches, signs, and planks off the blocks they reuse. Logs of
    /// another species are foreign: natural trees are single-species, so a
    /// connected off-species log means an adjacent tree or a build.
    pub fn classify(&self, world: &dyn WorldAccess, pos: BlockPos) -> Classification {
        match world.block_at(pos) {
            Block::Log { species, .. } if species == self.species => {
                self.check_surroundings(world, pos)
            }
            Block::Log { .. } => Classification::Foreign,
            Block::Leaves { species } if species == self.species => {
                self.check_surroundings(world, pos)
            }
            Block::Structure(_) => Classification::Foreign,
            _ => Classification::Unknown,
        }
    }

    fn check_surroundings(&self, world: &dyn WorldAccess, pos: BlockPos) -> Classification {
        if pos
            .neighbors6()
            .any(|n| world.block_at(n).is_structure())
        {
            Classification::Foreign
        } else {
            Classification::TreeBlock
        }
    }
}
