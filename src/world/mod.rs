//! World access boundary and block model
//!
//! The host owns all mutable world state. Every read and write the engine
//! performs goes through the [`WorldAccess`] capability, scoped by the host to
//! the region context the engine was invoked in. Nothing read through it is
//! cached across ticks, since the world can change between ticks.

pub mod block;
pub mod grid;

pub use block::{Block, LogAxis, Species, StructureKind};
pub use grid::GridWorld;

use crate::core::types::{BlockPos, RegionKey};

/// Why a block removal was refused by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveFailure {
    /// The chunk holding the block is not loaded
    Unloaded,
    /// The block is not owned by the calling region context
    Unowned,
}

/// Capability for reading and mutating host-owned world state
///
/// Implementations are provided by the host. All calls are made from the
/// owning region's execution context; the engine never holds one across a
/// tick boundary.
pub trait WorldAccess {
    /// Current block at the given position
    ///
    /// Unloaded positions read as [`Block::Air`].
    fn block_at(&self, pos: BlockPos) -> Block;

    /// Remove the block at the given position, returning what was removed
    ///
    /// A successful return is the host's confirmation that the removal was
    /// applied. Failure is terminal for the batch that issued it.
    fn remove_block(&mut self, pos: BlockPos) -> std::result::Result<Block, RemoveFailure>;

    /// The host region that owns the given position
    fn region_of(&self, pos: BlockPos) -> RegionKey;

    /// Whether the chunk holding the position is currently loaded
    fn is_loaded(&self, pos: BlockPos) -> bool;
}
