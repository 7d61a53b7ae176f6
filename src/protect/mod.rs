//! Protection gate and external oracle boundary
//!
//! Land-claim plugins and block-history loggers are optional collaborators.
//! Each is modeled as a trait with registration at startup; an oracle that is
//! not installed is simply never registered, which reads as an automatic
//! allow. If any registered oracle denies, the gate denies.

use crate::config::TimberConfig;
use crate::core::types::{BlockPos, PlayerId};
use crate::detect::TreeVolume;

/// Block-history oracle (e.g. a logging plugin's database)
///
/// Answers whether a block was placed by a player rather than grown or
/// generated. Calls may be slow; the gate is only consulted from a job's
/// approval tick, never from the break-event handler.
pub trait PlacementLog: Send + Sync {
    /// Human-readable oracle name, for logs
    fn name(&self) -> &str;

    /// Whether a player placed the block at `pos` within the last
    /// `lookup_days` days
    fn placed_by_player(&self, pos: BlockPos, lookup_days: u32) -> bool;
}

/// Land-claim oracle (e.g. a region protection plugin)
pub trait BuildProtector: Send + Sync {
    /// Human-readable oracle name, for logs
    fn name(&self) -> &str;

    /// Whether `player` may alter the block at `pos`
    fn may_build(&self, player: PlayerId, pos: BlockPos) -> bool;
}

/// Why the gate refused a chop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Denial {
    /// A land-claim oracle refused the coordinate for this player
    Claimed(BlockPos),
    /// Part of the tree itself was placed by a player
    PlayerPlaced(BlockPos),
    /// A player-placed structure block is attached to the tree
    Treehouse(BlockPos),
}

/// Combines all registered oracles into a single allow/deny decision
#[derive(Default)]
pub struct ProtectionGate {
    placement_logs: Vec<Box<dyn PlacementLog>>,
    protectors: Vec<Box<dyn BuildProtector>>,
}

impl ProtectionGate {
    /// Gate with no oracles; allows everything
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Register a block-history oracle
    pub fn register_placement_log(&mut self, oracle: Box<dyn PlacementLog>) {
        log::info!("placement log registered: {}", oracle.name());
        self.placement_logs.push(oracle);
    }

    /// Register a land-claim oracle
    pub fn register_protector(&mut self, oracle: Box<dyn BuildProtector>) {
        log::info!("build protector registered: {}", oracle.name());
        self.protectors.push(oracle);
    }

    /// Whether any oracles are registered at all
    pub fn has_oracles(&self) -> bool {
        !self.placement_logs.is_empty() || !self.protectors.is_empty()
    }

    /// Whether `player` may alter the single coordinate `pos`
    pub fn is_allowed(&self, player: PlayerId, pos: BlockPos) -> bool {
        self.protectors.iter().all(|p| p.may_build(player, pos))
    }

    /// Full pre-removal check for a discovered volume
    ///
    /// Land-claim oracles are consulted for every block that will be removed,
    /// regardless of bypass. Placement-log checks (was this tree or an
    /// attached structure built by a player) are skipped for players the host
    /// granted bypass.
    pub fn approve(
        &self,
        player: PlayerId,
        bypass: bool,
        volume: &TreeVolume,
        config: &TimberConfig,
    ) -> std::result::Result<(), Denial> {
        for &pos in volume.logs.iter().chain(volume.leaves.iter()) {
            if !self.is_allowed(player, pos) {
                return Err(Denial::Claimed(pos));
            }
        }

        if bypass || !config.protection.use_placement_log {
            return Ok(());
        }
        let days = config.protection.placement_lookup_days;

        for &pos in &volume.logs {
            if self
                .placement_logs
                .iter()
                .any(|o| o.placed_by_player(pos, days))
            {
                return Err(Denial::PlayerPlaced(pos));
            }
        }
        for &pos in &volume.structure_candidates {
            if self
                .placement_logs
                .iter()
                .any(|o| o.placed_by_player(pos, days))
            {
                return Err(Denial::Treehouse(pos));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::block::Species;
    use std::collections::BTreeSet;

    struct DenyAll;
    impl BuildProtector for DenyAll {
        fn name(&self) -> &str {
            "deny-all"
        }
        fn may_build(&self, _player: PlayerId, _pos: BlockPos) -> bool {
            false
        }
    }

    struct PlacedAt(BlockPos);
    impl PlacementLog for PlacedAt {
        fn name(&self) -> &str {
            "placed-at"
        }
        fn placed_by_player(&self, pos: BlockPos, _lookup_days: u32) -> bool {
            pos == self.0
        }
    }

    fn volume() -> TreeVolume {
        let seed = BlockPos::new(0, 64, 0);
        let logs: BTreeSet<_> = (0..3).map(|dy| seed.offset(0, dy, 0)).collect();
        TreeVolume {
            seed,
            species: Species::Oak,
            logs,
            leaves: BTreeSet::new(),
            structure_candidates: BTreeSet::new(),
            fail_reason: None,
        }
    }

    fn player() -> PlayerId {
        PlayerId(7)
    }

    #[test]
    fn test_gate_without_oracles_allows() {
        let gate = ProtectionGate::permissive();
        assert!(!gate.has_oracles());
        assert!(gate.is_allowed(player(), BlockPos::new(0, 0, 0)));
        assert!(gate.approve(player(), false, &volume(), &TimberConfig::default()).is_ok());
    }

    #[test]
    fn test_denying_protector_blocks_everything() {
        let mut gate = ProtectionGate::permissive();
        gate.register_protector(Box::new(DenyAll));

        let result = gate.approve(player(), false, &volume(), &TimberConfig::default());
        assert!(matches!(result, Err(Denial::Claimed(_))));
    }

    #[test]
    fn test_protector_applies_even_with_bypass() {
        let mut gate = ProtectionGate::permissive();
        gate.register_protector(Box::new(DenyAll));

        let result = gate.approve(player(), true, &volume(), &TimberConfig::default());
        assert!(matches!(result, Err(Denial::Claimed(_))));
    }

    #[test]
    fn test_player_placed_log_denied() {
        let vol = volume();
        let placed = *vol.logs.iter().next().unwrap();

        let mut gate = ProtectionGate::permissive();
        gate.register_placement_log(Box::new(PlacedAt(placed)));

        let result = gate.approve(player(), false, &vol, &TimberConfig::default());
        assert_eq!(result, Err(Denial::PlayerPlaced(placed)));
    }

    #[test]
    fn test_bypass_skips_placement_checks() {
        let vol = volume();
        let placed = *vol.logs.iter().next().unwrap();

        let mut gate = ProtectionGate::permissive();
        gate.register_placement_log(Box::new(PlacedAt(placed)));

        assert!(gate.approve(player(), true, &vol, &TimberConfig::default()).is_ok());
    }

    #[test]
    fn test_player_placed_structure_is_treehouse() {
        let mut vol = volume();
        let plank = BlockPos::new(2, 66, 0);
        vol.structure_candidates.insert(plank);

        let mut gate = ProtectionGate::permissive();
        gate.register_placement_log(Box::new(PlacedAt(plank)));

        let result = gate.approve(player(), false, &vol, &TimberConfig::default());
        assert_eq!(result, Err(Denial::Treehouse(plank)));
    }

    #[test]
    fn test_placement_checks_respect_config_switch() {
        let vol = volume();
        let placed = *vol.logs.iter().next().unwrap();

        let mut gate = ProtectionGate::permissive();
        gate.register_placement_log(Box::new(PlacedAt(placed)));

        let mut config = TimberConfig::default();
        config.protection.use_placement_log = false;
        assert!(gate.approve(player(), false, &vol, &config).is_ok());
    }
}
