//! Timber - structure-aware tree felling for region-threaded voxel servers
//!
//! A player chops the base of a tree; the engine discovers the connected
//! tree, checks it is not somebody's build, asks the installed protection
//! oracles, and fells it batch by batch across host ticks without ever
//! leaving the owning region's execution context.

pub mod core;
pub mod world;
pub mod config;
pub mod detect;
pub mod protect;
pub mod chop;
pub mod engine;

pub use engine::{BreakEvent, FelledBatch, Notice, Notifier, TimberEngine};
