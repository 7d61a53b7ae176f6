//! Block and material model
//!
//! Collapses the host's full block palette to the categories the felling
//! engine cares about: tree trunks, foliage, structure blocks, and everything
//! else.

use serde::{Deserialize, Serialize};

/// Wood species, shared between trunk and foliage blocks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Oak,
    Spruce,
    Birch,
    Jungle,
    Acacia,
    DarkOak,
    Mangrove,
    Cherry,
    PaleOak,
    Crimson,
    Warped,
}

impl Species {
    /// All known species
    pub const ALL: [Species; 11] = [
        Species::Oak,
        Species::Spruce,
        Species::Birch,
        Species::Jungle,
        Species::Acacia,
        Species::DarkOak,
        Species::Mangrove,
        Species::Cherry,
        Species::PaleOak,
        Species::Crimson,
        Species::Warped,
    ];
}

/// Axis a log block is oriented along
///
/// Naturally grown trunks are Y-aligned; X/Z logs are a strong signal of a
/// player-built structure (walls, roofs, bridges).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogAxis {
    X,
    Y,
    Z,
}

impl LogAxis {
    /// Whether this orientation is horizontal (structure indicator)
    pub fn is_horizontal(&self) -> bool {
        !matches!(self, LogAxis::Y)
    }
}

/// Block categories that indicate a player-built structure when found
/// attached to a tree (the "treehouse" case)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    Planks,
    Slab,
    Stairs,
    Fence,
    Door,
    Trapdoor,
    Ladder,
    Torch,
    Glass,
    Sign,
    Chest,
    CraftingTable,
    Furnace,
    Bed,
    Wool,
    Carpet,
    Banner,
}

/// A block as seen by the felling engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Block {
    /// Empty space (also what unloaded positions read as)
    Air,
    /// Tree trunk block
    Log { species: Species, axis: LogAxis },
    /// Foliage block
    Leaves { species: Species },
    /// Typical building material
    Structure(StructureKind),
    /// Anything else (terrain, ores, plants, ...)
    Other,
}

impl Block {
    /// Vertical log of the given species (the common natural case)
    pub const fn log(species: Species) -> Self {
        Block::Log {
            species,
            axis: LogAxis::Y,
        }
    }

    /// Leaves of the given species
    pub const fn leaves(species: Species) -> Self {
        Block::Leaves { species }
    }

    pub fn is_air(&self) -> bool {
        matches!(self, Block::Air)
    }

    pub fn is_log(&self) -> bool {
        matches!(self, Block::Log { .. })
    }

    pub fn is_leaves(&self) -> bool {
        matches!(self, Block::Leaves { .. })
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, Block::Structure(_))
    }

    /// Species of a log or leaves block, if any
    pub fn species(&self) -> Option<Species> {
        match self {
            Block::Log { species, .. } | Block::Leaves { species } => Some(*species),
            _ => None,
        }
    }
}
