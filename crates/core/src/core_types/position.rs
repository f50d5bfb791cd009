//! Integer voxel coordinates, face directions and box iteration.
//!
//! Coordinates follow the host world's convention: `y` points up, north is `-z`
//! and east is `+x`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Integer position of one voxel in the world.
///
/// This is a simple alias for `nalgebra::Vector3<i32>` so offsets can be added
/// with ordinary vector arithmetic and positions can key hash maps directly.
pub type BlockPos = Vector3<i32>;

/// One of the six faces of a voxel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Every face, in a fixed order
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Faces fire can cling to when it is not resting on the block below
    pub const LATERAL_AND_UP: [Direction; 5] = [
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Unit offset pointing out of this face
    pub fn offset(self) -> BlockPos {
        match self {
            Direction::Down => BlockPos::new(0, -1, 0),
            Direction::Up => BlockPos::new(0, 1, 0),
            Direction::North => BlockPos::new(0, 0, -1),
            Direction::South => BlockPos::new(0, 0, 1),
            Direction::West => BlockPos::new(-1, 0, 0),
            Direction::East => BlockPos::new(1, 0, 0),
        }
    }

    /// The face pointing the other way
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }
}

/// Offsets a fire cell looks at when spreading or burning.
///
/// Every position in the surrounding 3×3×3 cube except the cell itself and
/// the block straight below it (26 entries). The order is fixed; callers pick a
/// starting index with [`rotated_neighbors`].
pub const NEIGHBOR_OFFSETS: [[i32; 3]; 26] = build_neighbor_offsets();

const fn build_neighbor_offsets() -> [[i32; 3]; 26] {
    let mut offsets = [[0; 3]; 26];
    let mut i = 0;
    let mut x = -1;
    while x <= 1 {
        let mut y = -1;
        while y <= 1 {
            let mut z = -1;
            while z <= 1 {
                if !(x == 0 && z == 0 && (y == -1 || y == 0)) {
                    offsets[i] = [x, y, z];
                    i += 1;
                }
                z += 1;
            }
            y += 1;
        }
        x += 1;
    }
    offsets
}

/// Iterate the neighbours of `pos`, starting at `(x + y + z) mod 26` and wrapping.
///
/// The start index depends only on the position, so two fires at different
/// places prefer different directions while a seeded run stays reproducible.
pub fn rotated_neighbors(pos: BlockPos) -> impl Iterator<Item = BlockPos> {
    let len = NEIGHBOR_OFFSETS.len();
    let sum = i64::from(pos.x) + i64::from(pos.y) + i64::from(pos.z);
    let start = sum.rem_euclid(len as i64) as usize;
    (0..len).map(move |i| {
        let [dx, dy, dz] = NEIGHBOR_OFFSETS[(start + i) % len];
        pos + BlockPos::new(dx, dy, dz)
    })
}

/// The six face-adjacent neighbours of `pos`, paired with the direction leading to them
pub fn face_neighbors(pos: BlockPos) -> impl Iterator<Item = (Direction, BlockPos)> {
    Direction::ALL
        .into_iter()
        .map(move |direction| (direction, pos + direction.offset()))
}

/// Inclusive axis-aligned box of voxels.
///
/// Built from any two opposite corners; the corners are normalised so that
/// `minimum <= maximum` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockBox {
    minimum: BlockPos,
    maximum: BlockPos,
}

impl BlockBox {
    /// Create a box spanning two corners in any order
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            minimum: a.inf(&b),
            maximum: a.sup(&b),
        }
    }

    /// Cube of side `2 * radius + 1` centred on `center`, cut off at the
    /// edges of the coordinate range
    pub fn around(center: BlockPos, radius: u32) -> Self {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        Self {
            minimum: center.map(|c| c.saturating_sub(r)),
            maximum: center.map(|c| c.saturating_add(r)),
        }
    }

    pub fn minimum(&self) -> BlockPos {
        self.minimum
    }

    pub fn maximum(&self) -> BlockPos {
        self.maximum
    }

    /// Number of voxels inside the box
    pub fn volume(&self) -> u64 {
        (0..3)
            .map(|axis| {
                let span = i64::from(self.maximum[axis]) - i64::from(self.minimum[axis]) + 1;
                span.unsigned_abs()
            })
            .fold(1u64, u64::saturating_mul)
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        (0..3).all(|axis| self.minimum[axis] <= pos[axis] && pos[axis] <= self.maximum[axis])
    }

    /// Visit every voxel, `z` fastest, then `y`, then `x`
    pub fn iter(&self) -> BlockBoxIter {
        BlockBoxIter {
            bounds: *self,
            next: Some(self.minimum),
        }
    }
}

impl IntoIterator for BlockBox {
    type Item = BlockPos;
    type IntoIter = BlockBoxIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &BlockBox {
    type Item = BlockPos;
    type IntoIter = BlockBoxIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the voxels of a [`BlockBox`]
#[derive(Debug, Clone)]
pub struct BlockBoxIter {
    bounds: BlockBox,
    next: Option<BlockPos>,
}

impl Iterator for BlockBoxIter {
    type Item = BlockPos;

    fn next(&mut self) -> Option<BlockPos> {
        let current = self.next?;
        let (min, max) = (self.bounds.minimum, self.bounds.maximum);

        self.next = if current.z < max.z {
            Some(BlockPos::new(current.x, current.y, current.z + 1))
        } else if current.y < max.y {
            Some(BlockPos::new(current.x, current.y + 1, min.z))
        } else if current.x < max.x {
            Some(BlockPos::new(current.x + 1, min.y, min.z))
        } else {
            None
        };

        Some(current)
    }
}
