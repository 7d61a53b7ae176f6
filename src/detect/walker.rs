//! Bounded flood fill over connected tree blocks
//!
//! Breadth-first over 26-neighbor connectivity, clamped horizontally around
//! the seed column so adjacent trees never chain into one volume, and clamped
//! to the host region that owns the seed. Exceeding the configured size cap
//! aborts discovery with nothing retained.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::config::TimberConfig;
use crate::core::error::Error;
use crate::core::types::{BlockPos, Result};
use crate::detect::classifier::{Classification, TreeClassifier};
use crate::detect::{FailReason, TreeVolume};
use crate::world::block::{Block, Species};
use crate::world::WorldAccess;

/// Canopies at least this leafy get the benefit of the doubt on horizontal
/// logs; big natural trees do grow sideways branches.
const NATURAL_CANOPY_LEAVES: usize = 50;

/// Discover the connected tree volume rooted at `seed`
///
/// The caller guarantees the seed is a log of `species`. Fails with
/// [`Error::RegionTooLarge`] once the volume would exceed
/// `detection.max_tree_size`, discarding all partial work; no world state is
/// touched either way. Membership of the result does not depend on traversal
/// order.
pub fn discover(
    world: &dyn WorldAccess,
    seed: BlockPos,
    species: Species,
    config: &TimberConfig,
) -> Result<TreeVolume> {
    let detection = &config.detection;
    let tree = &config.tree;
    let home = world.region_of(seed);
    let classifier = TreeClassifier::new(species);

    let mut logs: BTreeSet<BlockPos> = BTreeSet::new();
    let mut leaves: BTreeSet<BlockPos> = BTreeSet::new();
    let mut visited: HashSet<BlockPos> = HashSet::new();
    let mut queue: VecDeque<BlockPos> = VecDeque::new();

    let mut saw_horizontal = false;
    let mut saw_mixed = false;

    visited.insert(seed);
    queue.push_back(seed);

    while let Some(pos) = queue.pop_front() {
        let block = world.block_at(pos);

        // Spread clamps, keyed by block kind: trunks stay near the seed
        // column, foliage may reach leaf_radius further out.
        let within_bounds = match block {
            Block::Log { .. } => {
                pos.horizontal_distance(seed) <= detection.horizontal_spread
                    && pos.y - seed.y <= tree.max_trunk_height
            }
            Block::Leaves { .. } => {
                pos.horizontal_distance(seed)
                    <= detection.horizontal_spread + tree.leaf_radius
                    && pos.y - seed.y <= tree.max_trunk_height + tree.leaf_radius
            }
            _ => true,
        };
        if !within_bounds {
            continue;
        }

        match classifier.classify(world, pos) {
            Classification::TreeBlock => {
                match block {
                    Block::Log { axis, .. } => {
                        if axis.is_horizontal() {
                            saw_horizontal = true;
                        }
                        logs.insert(pos);
                    }
                    Block::Leaves { .. } => {
                        leaves.insert(pos);
                    }
                    // Classifier only returns TreeBlock for logs and leaves
                    _ => continue,
                }

                let size = logs.len() + leaves.len();
                if size > detection.max_tree_size {
                    log::debug!(
                        "discovery at {:?} aborted: {} blocks exceeds cap {}",
                        seed,
                        size,
                        detection.max_tree_size
                    );
                    return Err(Error::RegionTooLarge {
                        size,
                        max: detection.max_tree_size,
                    });
                }

                for neighbor in pos.neighbors26() {
                    if world.region_of(neighbor) != home {
                        continue;
                    }
                    if visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }
            Classification::Foreign => {
                if block.is_log() && block.species() != Some(species) {
                    saw_mixed = true;
                }
            }
            Classification::Unknown => {}
        }
    }

    let structure_candidates = if config.protection.check_structures {
        collect_structure_candidates(world, &logs, config.protection.structure_scan_radius)
    } else {
        BTreeSet::new()
    };

    let fail_reason = verdict(
        seed,
        &logs,
        &leaves,
        saw_horizontal,
        saw_mixed,
        config,
    );

    Ok(TreeVolume {
        seed,
        species,
        logs,
        leaves,
        structure_candidates,
        fail_reason,
    })
}

/// Collect structure-material blocks near the trunk for the treehouse check
fn collect_structure_candidates(
    world: &dyn WorldAccess,
    logs: &BTreeSet<BlockPos>,
    radius: i32,
) -> BTreeSet<BlockPos> {
    let mut candidates = BTreeSet::new();
    let mut scanned: HashSet<BlockPos> = HashSet::new();
    for &log in logs {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                for dz in -radius..=radius {
                    let pos = log.offset(dx, dy, dz);
                    if !scanned.insert(pos) {
                        continue;
                    }
                    if world.block_at(pos).is_structure() {
                        candidates.insert(pos);
                    }
                }
            }
        }
    }
    candidates
}

/// Validate the discovered volume as a natural tree
fn verdict(
    seed: BlockPos,
    logs: &BTreeSet<BlockPos>,
    leaves: &BTreeSet<BlockPos>,
    saw_horizontal: bool,
    saw_mixed: bool,
    config: &TimberConfig,
) -> Option<FailReason> {
    let detection = &config.detection;

    if logs.len() < detection.min_logs {
        return Some(FailReason::MinLogs);
    }
    if leaves.len() < detection.min_leaves {
        return Some(FailReason::MinLeaves);
    }
    if detection.check_horizontal_logs && saw_horizontal && leaves.len() < NATURAL_CANOPY_LEAVES {
        return Some(FailReason::HorizontalLogs);
    }
    if detection.check_mixed_logs && saw_mixed {
        return Some(FailReason::MixedSpecies);
    }
    // Structure columns don't have logs directly above their base.
    if logs.len() > 1 && !logs.iter().any(|p| p.y > seed.y) {
        return Some(FailReason::NoLogsAbove);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::block::{LogAxis, StructureKind};
    use crate::world::GridWorld;

    fn oak_log_x() -> Block {
        Block::Log {
            species: Species::Oak,
            axis: LogAxis::X,
        }
    }

    /// 1x1x5 trunk with a 3x3x3 cap, the shape from the scenario tests
    fn plant_standard_tree(world: &mut GridWorld, base: BlockPos) {
        world.plant_tree(base, Species::Oak, 5, 1);
    }

    #[test]
    fn test_discover_full_tree() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        plant_standard_tree(&mut world, base);

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();

        assert_eq!(volume.logs.len(), 5);
        assert_eq!(volume.leaves.len(), 25);
        assert_eq!(volume.block_count(), 30);
        assert!(volume.is_natural());
    }

    #[test]
    fn test_discover_exceeding_cap_fails() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        plant_standard_tree(&mut world, base);
        let before = world.block_count();

        let mut config = TimberConfig::default();
        config.detection.max_tree_size = 10;

        let result = discover(&world, base, Species::Oak, &config);
        assert!(matches!(result, Err(Error::RegionTooLarge { max: 10, .. })));
        // Discovery never mutates the world
        assert_eq!(world.block_count(), before);
    }

    #[test]
    fn test_torch_clips_volume() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        plant_standard_tree(&mut world, base);

        // Replace a corner leaf of the cap with a torch
        let torch = base.offset(1, 5, 1);
        world.set_block(torch, Block::Structure(StructureKind::Torch));

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();

        assert!(!volume.contains(torch));
        // The torch itself plus its three face-adjacent cap leaves are out
        assert_eq!(volume.leaves.len(), 25 - 4);
        assert!(!volume.contains(base.offset(0, 5, 1)));
        assert!(!volume.contains(base.offset(1, 4, 1)));
        assert!(!volume.contains(base.offset(1, 5, 0)));
        assert!(volume.is_natural());
    }

    #[test]
    fn test_horizontal_spread_stops_adjacent_chaining() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        plant_standard_tree(&mut world, base);

        // Log bridge heading away from the trunk at canopy height
        for x in 1..=6 {
            world.set_block(BlockPos::new(x, 66, 0), oak_log_x());
        }

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();

        // Bridge logs inside the spread are picked up, the rest are not
        assert!(volume.logs.contains(&BlockPos::new(3, 66, 0)));
        assert!(!volume.logs.contains(&BlockPos::new(4, 66, 0)));
        assert!(!volume.logs.contains(&BlockPos::new(6, 66, 0)));
    }

    #[test]
    fn test_walk_clamped_to_seed_region() {
        let mut world = GridWorld::with_region_size(16);
        let base = BlockPos::new(15, 64, 5);
        for dy in 0..5 {
            world.set_block(base.offset(0, dy, 0), Block::log(Species::Oak));
            // Touching parallel trunk on the far side of the region boundary
            world.set_block(BlockPos::new(16, 64 + dy, 5), Block::log(Species::Oak));
        }

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();

        assert_eq!(volume.logs.len(), 5);
        assert!(!volume.contains(BlockPos::new(16, 64, 5)));
    }

    #[test]
    fn test_bare_trunk_fails_min_leaves() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        for dy in 0..5 {
            world.set_block(base.offset(0, dy, 0), Block::log(Species::Oak));
        }

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();
        assert_eq!(volume.fail_reason, Some(FailReason::MinLeaves));
    }

    #[test]
    fn test_single_log_fails_min_logs() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        world.set_block(base, Block::log(Species::Oak));

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();
        assert_eq!(volume.fail_reason, Some(FailReason::MinLogs));
    }

    #[test]
    fn test_mixed_species_fails_verdict() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        plant_standard_tree(&mut world, base);
        world.set_block(base.offset(1, 0, 0), Block::log(Species::Birch));

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();

        assert!(!volume.contains(base.offset(1, 0, 0)));
        assert_eq!(volume.fail_reason, Some(FailReason::MixedSpecies));
    }

    #[test]
    fn test_horizontal_log_small_canopy_fails() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        plant_standard_tree(&mut world, base);
        world.set_block(base.offset(1, 2, 0), oak_log_x());

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();
        assert_eq!(volume.fail_reason, Some(FailReason::HorizontalLogs));
    }

    #[test]
    fn test_horizontal_log_large_canopy_is_natural() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        // Radius-2 cap gives well over NATURAL_CANOPY_LEAVES leaves
        world.plant_tree(base, Species::Oak, 5, 2);
        world.set_block(base.offset(1, 1, 0), oak_log_x());

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();
        assert!(volume.leaves.len() >= NATURAL_CANOPY_LEAVES);
        assert!(volume.is_natural());
    }

    #[test]
    fn test_flat_log_row_fails_no_logs_above() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        for x in 0..3 {
            world.set_block(base.offset(x, 0, 0), Block::log(Species::Oak));
        }
        // Enough foliage to get past the minimum-leaves check
        for z in 1..=5 {
            world.set_block(base.offset(0, 0, z), Block::leaves(Species::Oak));
        }

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();
        assert_eq!(volume.fail_reason, Some(FailReason::NoLogsAbove));
    }

    #[test]
    fn test_structure_candidates_collected() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        plant_standard_tree(&mut world, base);

        // Plank platform two blocks out from the trunk
        let plank = base.offset(2, 2, 0);
        world.set_block(plank, Block::Structure(StructureKind::Planks));

        let config = TimberConfig::default();
        let volume = discover(&world, base, Species::Oak, &config).unwrap();
        assert!(volume.structure_candidates.contains(&plank));
    }

    #[test]
    fn test_structure_scan_disabled() {
        let mut world = GridWorld::new();
        let base = BlockPos::new(0, 64, 0);
        plant_standard_tree(&mut world, base);
        world.set_block(base.offset(2, 2, 0), Block::Structure(StructureKind::Planks));

        let mut config = TimberConfig::default();
        config.protection.check_structures = false;

        let volume = discover(&world, base, Species::Oak, &config).unwrap();
        assert!(volume.structure_candidates.is_empty());
    }
}
