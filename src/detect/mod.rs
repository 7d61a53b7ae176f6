//! Tree discovery: classification, bounded flood fill, naturalness verdict
//!
//! A discovered tree is a [`TreeVolume`]: the connected log and leaf sets,
//! nearby structure-block candidates, and a verdict on whether the whole
//! thing looks like a natural tree rather than a player build.

pub mod classifier;
pub mod walker;

pub use classifier::{Classification, TreeClassifier};
pub use walker::discover;

use std::collections::BTreeSet;

use crate::core::types::{BlockPos, Vec3};
use crate::world::block::Species;

/// Why a discovered volume was rejected as not a natural tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailReason {
    /// Fewer connected logs than the configured minimum
    MinLogs,
    /// Fewer associated leaves than the configured minimum
    MinLeaves,
    /// Horizontally oriented logs with a small canopy (structure indicator)
    HorizontalLogs,
    /// Connected logs of multiple wood species (structure indicator)
    MixedSpecies,
    /// No log above the seed block; natural trees grow upward
    NoLogsAbove,
}

/// The discovered block set of one tree instance
///
/// Built once per chop attempt and owned exclusively by the job that chops
/// it. Sets are ordered so enumeration is independent of traversal order.
#[derive(Clone, Debug)]
pub struct TreeVolume {
    /// The block that triggered discovery
    pub seed: BlockPos,
    /// Wood species of the seed log
    pub species: Species,
    /// All connected trunk blocks
    pub logs: BTreeSet<BlockPos>,
    /// All connected foliage blocks
    pub leaves: BTreeSet<BlockPos>,
    /// Structure blocks found near the trunk, pending a placement-log check
    pub structure_candidates: BTreeSet<BlockPos>,
    /// `None` if the volume passed all naturalness checks
    pub fail_reason: Option<FailReason>,
}

impl TreeVolume {
    /// Total block count (logs + leaves)
    pub fn block_count(&self) -> usize {
        self.logs.len() + self.leaves.len()
    }

    /// Whether the volume passed all naturalness checks
    pub fn is_natural(&self) -> bool {
        self.fail_reason.is_none()
    }

    /// Whether the position is part of the volume
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.logs.contains(&pos) || self.leaves.contains(&pos)
    }

    /// World-space center of mass of the trunk, for host effects
    pub fn centroid(&self) -> Vec3 {
        if self.logs.is_empty() {
            return self.seed.center();
        }
        let sum: Vec3 = self.logs.iter().map(|p| p.center()).sum();
        sum / self.logs.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume_with_logs(logs: &[BlockPos]) -> TreeVolume {
        TreeVolume {
            seed: logs[0],
            species: Species::Oak,
            logs: logs.iter().copied().collect(),
            leaves: BTreeSet::new(),
            structure_candidates: BTreeSet::new(),
            fail_reason: None,
        }
    }

    #[test]
    fn test_centroid_of_straight_trunk() {
        let volume = volume_with_logs(&[
            BlockPos::new(0, 0, 0),
            BlockPos::new(0, 1, 0),
            BlockPos::new(0, 2, 0),
        ]);
        assert_eq!(volume.centroid(), Vec3::new(0.5, 1.5, 0.5));
    }

    #[test]
    fn test_contains_checks_both_sets() {
        let mut volume = volume_with_logs(&[BlockPos::new(0, 0, 0)]);
        volume.leaves.insert(BlockPos::new(1, 1, 1));
        assert!(volume.contains(BlockPos::new(0, 0, 0)));
        assert!(volume.contains(BlockPos::new(1, 1, 1)));
        assert!(!volume.contains(BlockPos::new(2, 2, 2)));
    }
}
