//! Deterministic felling order and batch math
//!
//! The discovered volume is enumerated canopy-first, top-down, so partial
//! removal (after a mid-job cancellation) leaves a shorter tree rather than a
//! floating canopy. The order depends only on set membership, never on how
//! discovery happened to traverse.

use std::cmp::Reverse;

use crate::core::types::BlockPos;
use crate::detect::TreeVolume;

/// Enumerate the volume in removal order
///
/// Leaves come before logs, each group sorted top-down. When `break_leaves`
/// is off only the trunk is enumerated.
pub fn felling_order(volume: &TreeVolume, break_leaves: bool) -> Vec<BlockPos> {
    let mut order: Vec<BlockPos> = Vec::with_capacity(volume.block_count());
    if break_leaves {
        let mut leaves: Vec<BlockPos> = volume.leaves.iter().copied().collect();
        sort_top_down(&mut leaves);
        order.extend(leaves);
    }
    let mut logs: Vec<BlockPos> = volume.logs.iter().copied().collect();
    sort_top_down(&mut logs);
    order.extend(logs);
    order
}

fn sort_top_down(blocks: &mut [BlockPos]) {
    blocks.sort_by_key(|p| (Reverse(p.y), p.x, p.z));
}

/// Number of batches needed to remove `blocks` blocks at `batch_size`
pub fn batch_count(blocks: usize, batch_size: usize) -> usize {
    blocks.div_ceil(batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::block::Species;
    use std::collections::BTreeSet;

    fn volume() -> TreeVolume {
        let seed = BlockPos::new(0, 64, 0);
        let logs: BTreeSet<_> = (0..3).map(|dy| seed.offset(0, dy, 0)).collect();
        let leaves: BTreeSet<_> = [seed.offset(1, 2, 0), seed.offset(0, 3, 0)]
            .into_iter()
            .collect();
        TreeVolume {
            seed,
            species: Species::Oak,
            logs,
            leaves,
            structure_candidates: BTreeSet::new(),
            fail_reason: None,
        }
    }

    #[test]
    fn test_leaves_before_logs() {
        let vol = volume();
        let order = felling_order(&vol, true);
        assert_eq!(order.len(), 5);
        assert!(vol.leaves.contains(&order[0]));
        assert!(vol.leaves.contains(&order[1]));
        assert!(vol.logs.contains(&order[2]));
    }

    #[test]
    fn test_logs_removed_top_down() {
        let order = felling_order(&volume(), false);
        assert_eq!(
            order,
            vec![
                BlockPos::new(0, 66, 0),
                BlockPos::new(0, 65, 0),
                BlockPos::new(0, 64, 0),
            ]
        );
    }

    #[test]
    fn test_break_leaves_off_skips_canopy() {
        let vol = volume();
        let order = felling_order(&vol, false);
        assert_eq!(order.len(), vol.logs.len());
        assert!(order.iter().all(|p| vol.logs.contains(p)));
    }

    #[test]
    fn test_batch_count_rounds_up() {
        assert_eq!(batch_count(0, 16), 0);
        assert_eq!(batch_count(1, 16), 1);
        assert_eq!(batch_count(16, 16), 1);
        assert_eq!(batch_count(17, 16), 2);
        assert_eq!(batch_count(30, 7), 5);
    }
}
