//! Which blocks burn, and how eagerly.
//!
//! The default values follow the block game the maps are built in: the
//! spread weight is how strongly a fuel encourages fire next to it to
//! spread, the burn weight how quickly the fuel itself is consumed.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

use crate::config::ConfigError;
use crate::core_types::block::BlockType;

/// Flammability of one block type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlammabilityEntry {
    pub flammable: bool,
    /// Unitless multiplier on the base spread chance
    pub spread_weight: f64,
    /// Unitless multiplier on the base burn chance
    pub burn_weight: f64,
}

impl FlammabilityEntry {
    /// A flammable block with the given weights
    pub const fn flammable(spread_weight: f64, burn_weight: f64) -> Self {
        Self {
            flammable: true,
            spread_weight,
            burn_weight,
        }
    }
}

/// Weights as written in a flammability override file
#[derive(Debug, Clone, Copy, Deserialize)]
struct EntryFile {
    spread_weight: f64,
    burn_weight: f64,
    #[serde(default = "default_true")]
    flammable: bool,
}

fn default_true() -> bool {
    true
}

/// Static lookup from block type to flammability.
///
/// Block types without an entry are never flammable: lookups return `false`
/// or `None`, never a zero weight.
#[derive(Debug, Clone)]
pub struct FlammabilityTable {
    entries: FxHashMap<BlockType, FlammabilityEntry>,
}

impl Default for FlammabilityTable {
    fn default() -> Self {
        Self::vanilla()
    }
}

impl FlammabilityTable {
    /// Table with no flammable blocks
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Vanilla block-game values (encouragement / flammability)
    pub fn vanilla() -> Self {
        let mut table = Self::empty();
        for block in [
            BlockType::OakPlanks,
            BlockType::OakStairs,
            BlockType::OakSlab,
            BlockType::OakFence,
        ] {
            table.insert(block, FlammabilityEntry::flammable(5.0, 20.0));
        }
        table.insert(BlockType::Bookshelf, FlammabilityEntry::flammable(30.0, 20.0));
        table.insert(BlockType::OakLog, FlammabilityEntry::flammable(5.0, 5.0));
        table.insert(BlockType::OakLeaves, FlammabilityEntry::flammable(30.0, 60.0));
        table.insert(BlockType::Wool, FlammabilityEntry::flammable(30.0, 60.0));
        table.insert(BlockType::Carpet, FlammabilityEntry::flammable(60.0, 20.0));
        table.insert(BlockType::HayBale, FlammabilityEntry::flammable(60.0, 20.0));
        table.insert(BlockType::Tnt, FlammabilityEntry::flammable(15.0, 100.0));
        table.insert(BlockType::CoalBlock, FlammabilityEntry::flammable(5.0, 5.0));
        table
    }

    /// Parse a table from JSON.
    ///
    /// The document maps block names to weights, e.g.
    /// `{"oak_planks": {"spread_weight": 5, "burn_weight": 20}}`. Blocks that
    /// aren't listed are not flammable.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown block names
    /// and [`ConfigError::Invalid`] for negative or non-finite weights.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<BlockType, EntryFile> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Parse a table from a JSON reader. See [`FlammabilityTable::from_json`].
    ///
    /// # Errors
    /// Same as [`FlammabilityTable::from_json`], plus [`ConfigError::Io`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let raw: BTreeMap<BlockType, EntryFile> = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: BTreeMap<BlockType, EntryFile>) -> Result<Self, ConfigError> {
        let mut table = Self::empty();
        for (block, entry) in raw {
            for (field, weight) in [
                ("spread_weight", entry.spread_weight),
                ("burn_weight", entry.burn_weight),
            ] {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "{block}: {field} must be finite and non-negative, got {weight}"
                    )));
                }
            }
            table.insert(
                block,
                FlammabilityEntry {
                    flammable: entry.flammable,
                    spread_weight: entry.spread_weight,
                    burn_weight: entry.burn_weight,
                },
            );
        }
        Ok(table)
    }

    pub fn insert(&mut self, block: BlockType, entry: FlammabilityEntry) {
        self.entries.insert(block, entry);
    }

    fn flammable_entry(&self, block: BlockType) -> Option<&FlammabilityEntry> {
        self.entries.get(&block).filter(|entry| entry.flammable)
    }

    pub fn is_flammable(&self, block: BlockType) -> bool {
        self.flammable_entry(block).is_some()
    }

    /// Spread weight, or `None` when the block never feeds a spreading fire
    pub fn spread_weight(&self, block: BlockType) -> Option<f64> {
        self.flammable_entry(block).map(|entry| entry.spread_weight)
    }

    /// Burn weight, or `None` when the block can't be consumed by fire
    pub fn burn_weight(&self, block: BlockType) -> Option<f64> {
        self.flammable_entry(block).map(|entry| entry.burn_weight)
    }

    /// Number of flammable block types
    pub fn len(&self) -> usize {
        self.entries.values().filter(|entry| entry.flammable).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
