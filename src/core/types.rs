//! Core type aliases and re-exports

pub use glam::{IVec3, Vec3};

/// Standard Result type for the engine
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Integer coordinate identifying a single block in the world grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// Create a new block position
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position offset by the given deltas
    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Iterate the 26 orthogonal and diagonal neighbors
    pub fn neighbors26(&self) -> impl Iterator<Item = BlockPos> + '_ {
        let center = *self;
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                (-1..=1).filter_map(move |dz| {
                    if dx == 0 && dy == 0 && dz == 0 {
                        None
                    } else {
                        Some(center.offset(dx, dy, dz))
                    }
                })
            })
        })
    }

    /// Iterate the 6 face-adjacent neighbors
    pub fn neighbors6(&self) -> impl Iterator<Item = BlockPos> + '_ {
        const FACES: [(i32, i32, i32); 6] = [
            (1, 0, 0),
            (-1, 0, 0),
            (0, 1, 0),
            (0, -1, 0),
            (0, 0, 1),
            (0, 0, -1),
        ];
        let center = *self;
        FACES
            .iter()
            .map(move |&(dx, dy, dz)| center.offset(dx, dy, dz))
    }

    /// Chebyshev distance on the horizontal plane (ignores y)
    pub fn horizontal_distance(&self, other: BlockPos) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// Center of the block in world space
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            self.x as f32 + 0.5,
            self.y as f32 + 0.5,
            self.z as f32 + 0.5,
        )
    }
}

impl From<BlockPos> for IVec3 {
    fn from(pos: BlockPos) -> Self {
        IVec3::new(pos.x, pos.y, pos.z)
    }
}

impl From<IVec3> for BlockPos {
    fn from(v: IVec3) -> Self {
        BlockPos::new(v.x, v.y, v.z)
    }
}

/// Identifier of a host-managed spatial partition
///
/// The host owns one execution context per region; the engine never touches
/// blocks outside the region context it was invoked in. Regions partition the
/// horizontal plane, so the key is two-dimensional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey {
    pub x: i32,
    pub z: i32,
}

impl RegionKey {
    /// Create a new region key
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Opaque identifier of a player, assigned by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u64);
