//! Engine configuration
//!
//! Loaded from a JSON file at startup and on explicit reload. A failed reload
//! keeps the previous configuration. In-flight chop jobs hold the `Arc`
//! snapshot they started with and are unaffected by reloads.

use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::world::block::Species;

/// What counts as a tree: eligible species plus shape limits
///
/// Immutable once loaded; shared by reference with every job that starts
/// under it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeDefinition {
    /// Species eligible for felling
    pub species: Vec<Species>,
    /// Maximum trunk height above the seed block
    pub max_trunk_height: i32,
    /// Maximum horizontal radius of foliage around the trunk
    pub leaf_radius: i32,
}

impl Default for TreeDefinition {
    fn default() -> Self {
        Self {
            species: Species::ALL.to_vec(),
            max_trunk_height: 32,
            leaf_radius: 6,
        }
    }
}

impl TreeDefinition {
    /// Whether the given species may be felled
    pub fn allows(&self, species: Species) -> bool {
        self.species.contains(&species)
    }
}

/// Tree discovery and naturalness-check settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Hard cap on discovered volume size (logs + leaves)
    pub max_tree_size: usize,
    /// Minimum connected logs for a natural tree
    pub min_logs: usize,
    /// Minimum associated leaves for a natural tree
    pub min_leaves: usize,
    /// Maximum horizontal trunk spread from the seed column
    /// (prevents chaining adjacent trees into one volume)
    pub horizontal_spread: i32,
    /// Treat horizontally oriented logs as a structure indicator
    pub check_horizontal_logs: bool,
    /// Treat connected logs of mixed species as a structure indicator
    pub check_mixed_logs: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_tree_size: 256,
            min_logs: 3,
            min_leaves: 5,
            horizontal_spread: 3,
            check_horizontal_logs: true,
            check_mixed_logs: true,
        }
    }
}

/// Structure and protection-oracle settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    /// Scan for attached structure blocks (treehouse detection)
    pub check_structures: bool,
    /// Radius around each log to scan for structure blocks
    pub structure_scan_radius: i32,
    /// Consult block-history oracles before approving a chop
    pub use_placement_log: bool,
    /// How far back placement lookups reach, in days
    pub placement_lookup_days: u32,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            check_structures: true,
            structure_scan_radius: 2,
            use_placement_log: true,
            placement_lookup_days: 30,
        }
    }
}

/// Removal batching settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoppingConfig {
    /// Blocks removed per tick per job
    pub batch_size: usize,
    /// Remove the canopy along with the trunk
    pub break_leaves: bool,
}

impl Default for ChoppingConfig {
    fn default() -> Self {
        Self {
            batch_size: 16,
            break_leaves: true,
        }
    }
}

/// Top-level engine configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimberConfig {
    pub general: GeneralConfig,
    pub tree: TreeDefinition,
    pub detection: DetectionConfig,
    pub protection: ProtectionConfig,
    pub chopping: ChoppingConfig,
}

/// Global on/off switches and trigger requirements
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Master switch for the whole engine
    pub enabled: bool,
    /// Default per-player toggle state
    pub default_enabled: bool,
    /// Only trigger when the player holds an axe
    pub require_axe: bool,
    /// Only trigger when the player is sneaking
    pub require_sneak: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_enabled: true,
            require_axe: true,
            require_sneak: false,
        }
    }
}

impl TimberConfig {
    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: TimberConfig = serde_json::from_str(&text)
            .map_err(|e| Error::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency, rejecting values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.tree.species.is_empty() {
            return Err(Error::ConfigInvalid("tree.species is empty".into()));
        }
        if self.tree.max_trunk_height < 1 {
            return Err(Error::ConfigInvalid(
                "tree.max_trunk_height must be at least 1".into(),
            ));
        }
        if self.tree.leaf_radius < 0 {
            return Err(Error::ConfigInvalid("tree.leaf_radius is negative".into()));
        }
        if self.detection.max_tree_size == 0 {
            return Err(Error::ConfigInvalid(
                "detection.max_tree_size must be at least 1".into(),
            ));
        }
        if self.detection.min_logs == 0 {
            return Err(Error::ConfigInvalid(
                "detection.min_logs must be at least 1".into(),
            ));
        }
        if self.detection.horizontal_spread < 0 {
            return Err(Error::ConfigInvalid(
                "detection.horizontal_spread is negative".into(),
            ));
        }
        if self.protection.structure_scan_radius < 0 {
            return Err(Error::ConfigInvalid(
                "protection.structure_scan_radius is negative".into(),
            ));
        }
        if self.chopping.batch_size == 0 {
            return Err(Error::ConfigInvalid(
                "chopping.batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Shared handle to the live configuration, supporting hot reload
///
/// Readers take a cheap `Arc` snapshot; a reload swaps the snapshot without
/// touching jobs that already hold the previous one.
pub struct ConfigHandle {
    inner: RwLock<Arc<TimberConfig>>,
}

impl ConfigHandle {
    /// Wrap an already-validated configuration
    pub fn new(config: TimberConfig) -> Self {
        Self {
            inner: RwLock::new(Arc::new(config)),
        }
    }

    /// Current configuration snapshot
    pub fn current(&self) -> Arc<TimberConfig> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the configuration with a freshly loaded file
    ///
    /// On any error the previous configuration stays in place.
    pub fn reload_from(&self, path: impl AsRef<Path>) -> Result<()> {
        let config = TimberConfig::load(path)?;
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(config);
        log::info!("configuration reloaded");
        Ok(())
    }

    /// Replace the configuration with an in-memory value
    pub fn replace(&self, config: TimberConfig) -> Result<()> {
        config.validate()?;
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(config);
        Ok(())
    }
}
