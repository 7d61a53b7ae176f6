//! Chop jobs: batched, tick-bound removal of a discovered tree
//!
//! A [`ChopJob`] owns one [`TreeVolume`] and walks it in fixed-size batches,
//! one batch per host tick, on the region context of its seed block. State
//! machine: `AwaitingApproval -> Removing -> Done`, with any state able to
//! move to `Cancelled`. Terminal states never transition again. Removal is
//! not transactional: batches already applied when a job cancels stay
//! applied.

pub mod order;

pub use order::{batch_count, felling_order};

use std::sync::Arc;

use crate::config::TimberConfig;
use crate::core::types::{BlockPos, PlayerId, RegionKey, Vec3};
use crate::detect::TreeVolume;
use crate::protect::{Denial, ProtectionGate};
use crate::world::block::Block;
use crate::world::WorldAccess;

/// Engine-assigned job identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JobId(pub u64);

/// Why a job stopped short of completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// The protection gate refused the volume
    Denied(Denial),
    /// The host refused a removal (chunk unloaded, coordinate not owned)
    RemovalFailed(BlockPos),
    /// The owning region was unloaded
    RegionUnloaded,
    /// The triggering player left
    PlayerLeft,
}

/// Lifecycle state of a chop job
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    /// Discovered, waiting for the protection gate verdict
    AwaitingApproval,
    /// Gate passed; removal batches in flight
    Removing,
    /// All batches applied
    Done,
    /// Stopped; already-applied batches are not rolled back
    Cancelled(CancelReason),
}

impl JobState {
    /// Whether the job will never act again
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Cancelled(_))
    }
}

/// What one batch actually removed
#[derive(Debug)]
pub struct BatchReceipt {
    /// Removed blocks, in felling order, with what each position held
    pub removed: Vec<(BlockPos, Block)>,
    /// Trunk blocks removed in this batch
    pub logs: usize,
    /// Foliage blocks removed in this batch
    pub leaves: usize,
    /// Whether this was the final batch of the job
    pub last: bool,
}

/// Completion summary for host effects and player feedback
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FellReport {
    pub logs: usize,
    pub leaves: usize,
    /// Trunk center of mass, where the host plays sound/particles
    pub centroid: Vec3,
}

/// What a single tick of a job produced
#[derive(Debug)]
pub enum TickOutcome {
    /// Gate passed; removal starts next tick
    Approved,
    /// One batch was applied
    Batch(BatchReceipt),
    /// The job just cancelled
    Cancelled(CancelReason),
    /// Terminal job, nothing to do
    Idle,
}

/// A chop in progress
///
/// Confined to the region context of its seed block; the engine only ticks it
/// from that region's execution context. Holds the config snapshot it started
/// under, so reloads never change a job mid-flight.
pub struct ChopJob {
    id: JobId,
    player: PlayerId,
    bypass: bool,
    region: RegionKey,
    volume: TreeVolume,
    order: Vec<BlockPos>,
    cursor: usize,
    state: JobState,
    config: Arc<TimberConfig>,
    logs_broken: usize,
    leaves_broken: usize,
}

impl ChopJob {
    /// Create a job for an approved-for-discovery volume
    pub fn new(
        id: JobId,
        player: PlayerId,
        bypass: bool,
        region: RegionKey,
        volume: TreeVolume,
        config: Arc<TimberConfig>,
    ) -> Self {
        let order = felling_order(&volume, config.chopping.break_leaves);
        Self {
            id,
            player,
            bypass,
            region,
            volume,
            order,
            cursor: 0,
            state: JobState::AwaitingApproval,
            config,
            logs_broken: 0,
            leaves_broken: 0,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn region(&self) -> RegionKey {
        self.region
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn volume(&self) -> &TreeVolume {
        &self.volume
    }

    /// Batches this job will issue in total
    pub fn total_batches(&self) -> usize {
        batch_count(self.order.len(), self.config.chopping.batch_size)
    }

    /// Completion summary; totals reflect what was actually removed so far
    pub fn report(&self) -> FellReport {
        FellReport {
            logs: self.logs_broken,
            leaves: self.leaves_broken,
            centroid: self.volume.centroid(),
        }
    }

    /// Cancel the job; no-op if already terminal
    pub fn cancel(&mut self, reason: CancelReason) {
        if !self.state.is_terminal() {
            log::debug!("job {:?} cancelled: {:?}", self.id, reason);
            self.state = JobState::Cancelled(reason);
        }
    }

    /// Advance the job by one tick on its owning region's context
    ///
    /// At most one batch of work happens per call; the job then yields back
    /// to the host scheduler.
    pub fn tick(&mut self, world: &mut dyn WorldAccess, gate: &ProtectionGate) -> TickOutcome {
        match self.state {
            JobState::AwaitingApproval => self.tick_approval(gate),
            JobState::Removing => self.tick_batch(world),
            JobState::Done | JobState::Cancelled(_) => TickOutcome::Idle,
        }
    }

    fn tick_approval(&mut self, gate: &ProtectionGate) -> TickOutcome {
        match gate.approve(self.player, self.bypass, &self.volume, &self.config) {
            Ok(()) => {
                self.state = JobState::Removing;
                TickOutcome::Approved
            }
            Err(denial) => {
                let reason = CancelReason::Denied(denial);
                self.state = JobState::Cancelled(reason);
                TickOutcome::Cancelled(reason)
            }
        }
    }

    fn tick_batch(&mut self, world: &mut dyn WorldAccess) -> TickOutcome {
        let end = (self.cursor + self.config.chopping.batch_size).min(self.order.len());
        let mut removed = Vec::with_capacity(end - self.cursor);
        let mut logs = 0;
        let mut leaves = 0;

        for i in self.cursor..end {
            let pos = self.order[i];

            // The world can change between ticks; re-check ownership and
            // chunk load state, and re-read every block through the
            // capability.
            if world.region_of(pos) != self.region || !world.is_loaded(pos) {
                let reason = CancelReason::RemovalFailed(pos);
                self.state = JobState::Cancelled(reason);
                return TickOutcome::Cancelled(reason);
            }
            if world.block_at(pos).is_air() {
                continue;
            }

            match world.remove_block(pos) {
                Ok(block) => {
                    if block.is_log() {
                        logs += 1;
                    } else if block.is_leaves() {
                        leaves += 1;
                    }
                    removed.push((pos, block));
                }
                Err(failure) => {
                    log::warn!("removal failed at {:?}: {:?}", pos, failure);
                    let reason = CancelReason::RemovalFailed(pos);
                    self.state = JobState::Cancelled(reason);
                    return TickOutcome::Cancelled(reason);
                }
            }
        }

        // Cursor moves only once the whole batch is confirmed applied.
        self.cursor = end;
        self.logs_broken += logs;
        self.leaves_broken += leaves;

        let last = self.cursor == self.order.len();
        if last {
            self.state = JobState::Done;
        }
        TickOutcome::Batch(BatchReceipt {
            removed,
            logs,
            leaves,
            last,
        })
    }
}
