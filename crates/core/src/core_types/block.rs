//! Block kinds, their collision geometry, and the per-voxel state stored in the grid.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core_types::position::Direction;

/// Kind of block occupying a voxel.
///
/// Covers the blocks the minigame maps are built from. Geometry is coarse:
/// either a face is completely covered or it isn't.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    #[default]
    Air,
    Fire,
    Stone,
    Dirt,
    Grass,
    Glass,
    Water,
    Brick,
    IronBlock,
    OakPlanks,
    OakLog,
    OakLeaves,
    Wool,
    Bookshelf,
    HayBale,
    OakStairs,
    /// Bottom half slab: only its underside is a full face
    OakSlab,
    OakFence,
    Carpet,
    Tnt,
    CoalBlock,
}

impl BlockType {
    /// Every block type, in id order
    pub const ALL: [BlockType; 21] = [
        BlockType::Air,
        BlockType::Fire,
        BlockType::Stone,
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Glass,
        BlockType::Water,
        BlockType::Brick,
        BlockType::IronBlock,
        BlockType::OakPlanks,
        BlockType::OakLog,
        BlockType::OakLeaves,
        BlockType::Wool,
        BlockType::Bookshelf,
        BlockType::HayBale,
        BlockType::OakStairs,
        BlockType::OakSlab,
        BlockType::OakFence,
        BlockType::Carpet,
        BlockType::Tnt,
        BlockType::CoalBlock,
    ];

    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Air only; fire is not air and can't be ignited again
    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }

    pub fn is_fire(self) -> bool {
        self == BlockType::Fire
    }

    /// Whether this block's collision shape completely covers `face`
    pub fn is_face_full(self, face: Direction) -> bool {
        match self {
            BlockType::Air
            | BlockType::Fire
            | BlockType::Water
            | BlockType::OakFence
            | BlockType::Carpet => false,
            // Stairs also have a full back, but the underside is the only face
            // that is full in every orientation
            BlockType::OakSlab | BlockType::OakStairs => face == Direction::Down,
            _ => true,
        }
    }

    /// Snake-case identifier, as used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            BlockType::Air => "air",
            BlockType::Fire => "fire",
            BlockType::Stone => "stone",
            BlockType::Dirt => "dirt",
            BlockType::Grass => "grass",
            BlockType::Glass => "glass",
            BlockType::Water => "water",
            BlockType::Brick => "brick",
            BlockType::IronBlock => "iron_block",
            BlockType::OakPlanks => "oak_planks",
            BlockType::OakLog => "oak_log",
            BlockType::OakLeaves => "oak_leaves",
            BlockType::Wool => "wool",
            BlockType::Bookshelf => "bookshelf",
            BlockType::HayBale => "hay_bale",
            BlockType::OakStairs => "oak_stairs",
            BlockType::OakSlab => "oak_slab",
            BlockType::OakFence => "oak_fence",
            BlockType::Carpet => "carpet",
            BlockType::Tnt => "tnt",
            BlockType::CoalBlock => "coal_block",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Faces a fire block visually clings to.
///
/// Only meaningful on fire voxels. An empty set means the fire rests on the
/// block below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FireFaces(u8);

impl FireFaces {
    pub const NONE: FireFaces = FireFaces(0);

    fn bit(direction: Direction) -> u8 {
        match direction {
            Direction::Down => 0,
            Direction::Up => 1 << 0,
            Direction::North => 1 << 1,
            Direction::South => 1 << 2,
            Direction::West => 1 << 3,
            Direction::East => 1 << 4,
        }
    }

    /// Add a face. `Down` is implied by an empty set and is ignored.
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= Self::bit(direction);
    }

    pub fn contains(self, direction: Direction) -> bool {
        let bit = Self::bit(direction);
        bit != 0 && self.0 & bit != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Raw bit pattern (up, north, south, west, east from the low bit)
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::LATERAL_AND_UP
            .into_iter()
            .filter(move |&direction| self.contains(direction))
    }
}

impl FromIterator<Direction> for FireFaces {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut faces = FireFaces::NONE;
        for direction in iter {
            faces.insert(direction);
        }
        faces
    }
}

/// State of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Voxel {
    pub block: BlockType,
    /// Fire connectivity; empty for every block except fire
    pub faces: FireFaces,
}

impl Voxel {
    pub const AIR: Voxel = Voxel {
        block: BlockType::Air,
        faces: FireFaces::NONE,
    };

    /// A voxel of a plain block (no fire faces)
    pub fn new(block: BlockType) -> Self {
        Self {
            block,
            faces: FireFaces::NONE,
        }
    }

    pub fn fire(faces: FireFaces) -> Self {
        Self {
            block: BlockType::Fire,
            faces,
        }
    }
}

impl From<BlockType> for Voxel {
    fn from(block: BlockType) -> Self {
        Voxel::new(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_conversion() {
        for block in BlockType::ALL {
            assert_eq!(BlockType::from_u8(block.as_u8()), Some(block));
        }
        assert_eq!(BlockType::from_u8(0), Some(BlockType::Air));
        assert_eq!(BlockType::from_u8(1), Some(BlockType::Fire));
        assert_eq!(BlockType::from_u8(200), None);
    }

    #[test]
    fn test_face_geometry() {
        for face in Direction::ALL {
            assert!(BlockType::Stone.is_face_full(face));
            assert!(BlockType::OakPlanks.is_face_full(face));
            assert!(!BlockType::Air.is_face_full(face));
            assert!(!BlockType::Fire.is_face_full(face));
            assert!(!BlockType::OakFence.is_face_full(face));
        }
        assert!(BlockType::OakSlab.is_face_full(Direction::Down));
        assert!(!BlockType::OakSlab.is_face_full(Direction::Up));
    }

    #[test]
    fn test_fire_faces_ignore_down() {
        let mut faces = FireFaces::NONE;
        faces.insert(Direction::Down);
        assert!(faces.is_empty());

        let faces: FireFaces = [Direction::North, Direction::Up, Direction::North]
            .into_iter()
            .collect();
        assert_eq!(faces.len(), 2);
        assert!(faces.contains(Direction::North));
        assert!(faces.contains(Direction::Up));
        assert!(!faces.contains(Direction::Down));
        assert_eq!(
            faces.iter().collect::<Vec<_>>(),
            vec![Direction::Up, Direction::North]
        );
    }

    #[test]
    fn test_block_names_match_serde() {
        for block in BlockType::ALL {
            let json = serde_json::to_string(&block).unwrap();
            assert_eq!(json, format!("\"{}\"", block.name()));
        }
    }
}
