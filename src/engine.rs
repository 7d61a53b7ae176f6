//! Engine facade: break-event entry, per-region ticking, toggles, reload
//!
//! The host forwards block-break events to [`TimberEngine::handle_break`] and
//! calls [`TimberEngine::tick`] once per simulation tick per region, from
//! that region's execution context. Everything else (commands, permissions,
//! effects, drops) stays host-side and talks to the engine through plain
//! methods.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::chop::{BatchReceipt, CancelReason, ChopJob, JobId, TickOutcome};
use crate::config::{ConfigHandle, TimberConfig};
use crate::core::error::Error;
use crate::core::types::{BlockPos, PlayerId, RegionKey, Result, Vec3};
use crate::detect::{discover, FailReason};
use crate::protect::{Denial, ProtectionGate};
use crate::world::block::Block;
use crate::world::WorldAccess;

/// A block-break event as reported by the host
#[derive(Clone, Copy, Debug)]
pub struct BreakEvent {
    pub player: PlayerId,
    pub pos: BlockPos,
    /// Player is sneaking (matters when `require_sneak` is on)
    pub sneaking: bool,
    /// Player holds an axe (matters when `require_axe` is on)
    pub holding_axe: bool,
}

/// Short player-facing message; the host localizes and formats it
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notice {
    /// Discovery rejected the volume as a build rather than a tree
    NotNatural(FailReason),
    /// The connected tree exceeds the configured size cap
    TreeTooLarge { size: usize, max: usize },
    /// A protection oracle refused the chop
    Protected,
    /// A player-placed structure is attached to the tree
    Treehouse,
    /// Removal stopped early (chunk unloaded, host refused a batch)
    Aborted,
    /// The whole tree came down
    Felled {
        logs: usize,
        leaves: usize,
        centroid: Vec3,
    },
}

/// One batch applied during a tick, surfaced for host-side effects
///
/// The receipt lists every removed block, so the host can compute drops,
/// damage the tool, and play break effects per block.
#[derive(Debug)]
pub struct FelledBatch {
    pub player: PlayerId,
    pub job: JobId,
    pub receipt: BatchReceipt,
}

/// Sink for player-facing messages, implemented by the host
pub trait Notifier {
    fn notify(&mut self, player: PlayerId, notice: Notice);
}

/// Notifier that drops everything, for hosts without chat
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _player: PlayerId, _notice: Notice) {}
}

/// The tree-felling engine
///
/// Owns the live configuration, the protection gate, and all in-flight chop
/// jobs, keyed by the region of their seed block. Holds no world state of its
/// own and no threads; the host drives it.
pub struct TimberEngine {
    config: ConfigHandle,
    gate: ProtectionGate,
    jobs: HashMap<RegionKey, Vec<ChopJob>>,
    /// Blocks claimed by in-flight volumes; a block is in at most one
    claimed: HashSet<BlockPos>,
    /// Players with a live job (re-entrancy guard)
    busy: HashSet<PlayerId>,
    /// Per-player toggle state; absent means the configured default
    player_enabled: HashMap<PlayerId, bool>,
    /// Players the host granted protection bypass
    bypass: HashSet<PlayerId>,
    next_job_id: u64,
}

impl TimberEngine {
    /// Create an engine from a validated configuration and oracle gate
    pub fn new(config: TimberConfig, gate: ProtectionGate) -> Self {
        Self {
            config: ConfigHandle::new(config),
            gate,
            jobs: HashMap::new(),
            claimed: HashSet::new(),
            busy: HashSet::new(),
            player_enabled: HashMap::new(),
            bypass: HashSet::new(),
            next_job_id: 0,
        }
    }

    /// Current configuration snapshot
    pub fn config(&self) -> Arc<TimberConfig> {
        self.config.current()
    }

    /// Reload configuration from a file; keeps the old one on any error
    ///
    /// In-flight jobs continue under the snapshot they started with.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<()> {
        self.config.reload_from(path)
    }

    /// Whether timber is active for this player
    pub fn is_enabled_for(&self, player: PlayerId) -> bool {
        *self
            .player_enabled
            .get(&player)
            .unwrap_or(&self.config.current().general.default_enabled)
    }

    /// Flip the per-player toggle, returning the new state
    pub fn toggle(&mut self, player: PlayerId) -> bool {
        let next = !self.is_enabled_for(player);
        self.player_enabled.insert(player, next);
        next
    }

    /// Grant or revoke protection bypass for a player
    pub fn set_bypass(&mut self, player: PlayerId, bypass: bool) {
        if bypass {
            self.bypass.insert(player);
        } else {
            self.bypass.remove(&player);
        }
    }

    /// Number of in-flight jobs across all regions
    pub fn active_jobs(&self) -> usize {
        self.jobs.values().map(|v| v.len()).sum()
    }

    /// Consume a block-break event, possibly starting a chop job
    ///
    /// Runs discovery synchronously (bounded by the size cap) and never
    /// blocks on protection oracles; those run on the job's first tick.
    /// Returns true if a job was started.
    pub fn handle_break(
        &mut self,
        event: &BreakEvent,
        world: &dyn WorldAccess,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let config = self.config.current();
        if !config.general.enabled || !self.is_enabled_for(event.player) {
            return false;
        }
        let Block::Log { species, .. } = world.block_at(event.pos) else {
            return false;
        };
        if !config.tree.allows(species) {
            return false;
        }
        if config.general.require_axe && !event.holding_axe {
            return false;
        }
        if config.general.require_sneak && !event.sneaking {
            return false;
        }
        if self.busy.contains(&event.player) {
            return false;
        }

        let volume = match discover(world, event.pos, species, &config) {
            Ok(volume) => volume,
            Err(Error::RegionTooLarge { size, max }) => {
                notifier.notify(event.player, Notice::TreeTooLarge { size, max });
                return false;
            }
            Err(e) => {
                log::warn!("discovery at {:?} failed: {}", event.pos, e);
                return false;
            }
        };

        if let Some(reason) = volume.fail_reason {
            notifier.notify(event.player, Notice::NotNatural(reason));
            return false;
        }
        if volume.logs.iter().chain(volume.leaves.iter()).any(|p| self.claimed.contains(p)) {
            log::debug!("volume at {:?} overlaps an in-flight job, ignoring", event.pos);
            return false;
        }

        let region = world.region_of(event.pos);
        self.claimed.extend(volume.logs.iter().copied());
        self.claimed.extend(volume.leaves.iter().copied());
        self.busy.insert(event.player);

        self.next_job_id += 1;
        let id = JobId(self.next_job_id);
        let job = ChopJob::new(id, event.player, self.bypass.contains(&event.player), region, volume, config);
        log::debug!(
            "job {:?} started at {:?} for player {:?} ({} batches)",
            id,
            event.pos,
            event.player,
            job.total_batches()
        );
        self.jobs.entry(region).or_default().push(job);
        true
    }

    /// Advance every job owned by `region` by one batch
    ///
    /// Must be called from that region's execution context with a
    /// `WorldAccess` scoped to it. Returns the batches applied this tick;
    /// the host computes drops and effects from their removed-block lists.
    pub fn tick(
        &mut self,
        region: RegionKey,
        world: &mut dyn WorldAccess,
        notifier: &mut dyn Notifier,
    ) -> Vec<FelledBatch> {
        let Self {
            jobs, gate, claimed, busy, ..
        } = self;
        let Some(region_jobs) = jobs.get_mut(&region) else {
            return Vec::new();
        };

        let mut felled = Vec::new();
        for job in region_jobs.iter_mut() {
            match job.tick(world, gate) {
                TickOutcome::Approved => {
                    log::debug!("job {:?} approved", job.id());
                }
                TickOutcome::Batch(receipt) => {
                    if receipt.last {
                        let report = job.report();
                        notifier.notify(
                            job.player(),
                            Notice::Felled {
                                logs: report.logs,
                                leaves: report.leaves,
                                centroid: report.centroid,
                            },
                        );
                    }
                    felled.push(FelledBatch {
                        player: job.player(),
                        job: job.id(),
                        receipt,
                    });
                }
                TickOutcome::Cancelled(reason) => {
                    if let Some(notice) = cancel_notice(reason) {
                        notifier.notify(job.player(), notice);
                    }
                }
                TickOutcome::Idle => {}
            }
        }

        region_jobs.retain(|job| {
            if job.state().is_terminal() {
                release(claimed, busy, job);
                false
            } else {
                true
            }
        });
        if region_jobs.is_empty() {
            jobs.remove(&region);
        }
        felled
    }

    /// Cancel all jobs of a player who left the game
    pub fn cancel_player(&mut self, player: PlayerId) {
        self.cancel_where(|job| job.player() == player, CancelReason::PlayerLeft);
    }

    /// Cancel all jobs in a region being unloaded
    pub fn cancel_region(&mut self, region: RegionKey) {
        self.cancel_where(|job| job.region() == region, CancelReason::RegionUnloaded);
    }

    fn cancel_where(&mut self, mut predicate: impl FnMut(&ChopJob) -> bool, reason: CancelReason) {
        let Self {
            jobs, claimed, busy, ..
        } = self;
        for region_jobs in jobs.values_mut() {
            region_jobs.retain_mut(|job| {
                if predicate(job) {
                    job.cancel(reason);
                }
                if job.state().is_terminal() {
                    release(claimed, busy, job);
                    false
                } else {
                    true
                }
            });
        }
        jobs.retain(|_, v| !v.is_empty());
    }
}

/// Release a finished job's claims and its player's busy flag
fn release(claimed: &mut HashSet<BlockPos>, busy: &mut HashSet<PlayerId>, job: &ChopJob) {
    for pos in job.volume().logs.iter().chain(job.volume().leaves.iter()) {
        claimed.remove(pos);
    }
    busy.remove(&job.player());
}

/// Player-facing message for a cancellation, if one is warranted
fn cancel_notice(reason: CancelReason) -> Option<Notice> {
    match reason {
        CancelReason::Denied(Denial::Claimed(_)) | CancelReason::Denied(Denial::PlayerPlaced(_)) => {
            Some(Notice::Protected)
        }
        CancelReason::Denied(Denial::Treehouse(_)) => Some(Notice::Treehouse),
        CancelReason::RemovalFailed(_) => Some(Notice::Aborted),
        CancelReason::RegionUnloaded | CancelReason::PlayerLeft => None,
    }
}
