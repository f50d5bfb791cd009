//! Region definitions read from a JSON configuration document.
//!
//! A document holds region sets under named keys, one per game stage:
//!
//! ```json
//! {
//!   "stage1": [
//!     { "name": "Farmhouse", "start": { "x": 10, "y": 64, "z": -3, "yaw": 90.0 }, "end": [18, 72, 5] }
//!   ]
//! }
//! ```
//!
//! Names are plain strings or text components (`{"text": "Farm", "extra":
//! [{"text": "house"}]}`), flattened to their text.
//! Corners are either `{x, y, z}` objects (extra keys such as `yaw` or
//! `pitch` are ignored, fractional coordinates are floored) or `[x, y, z]`
//! arrays. Entries that don't parse are skipped with a warning so that one
//! bad region never takes down the rest of the set.

use std::io::Read;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::ConfigError;
use crate::core_types::position::{BlockBox, BlockPos};
use crate::regions::region::BurnableRegion;

/// Corner as written in configuration
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum CornerFile {
    Object { x: f64, y: f64, z: f64 },
    Array([f64; 3]),
}

impl CornerFile {
    fn to_block_pos(self) -> Option<BlockPos> {
        let [x, y, z] = match self {
            CornerFile::Object { x, y, z } => [x, y, z],
            CornerFile::Array(coords) => coords,
        };
        let floor = |c: f64| {
            let c = c.floor();
            // Float-to-int `as` saturates, so range-check first
            (f64::from(i32::MIN)..=f64::from(i32::MAX))
                .contains(&c)
                .then_some(c as i32)
        };
        Some(BlockPos::new(floor(x)?, floor(y)?, floor(z)?))
    }
}

/// Name as written in configuration: a plain string or a chat text
/// component whose `extra` children are appended in order
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NameFile {
    Plain(String),
    Component {
        text: String,
        #[serde(default)]
        extra: Vec<NameFile>,
    },
}

impl NameFile {
    fn into_plain(self) -> String {
        match self {
            NameFile::Plain(text) => text,
            NameFile::Component { mut text, extra } => {
                for child in extra {
                    text.push_str(&child.into_plain());
                }
                text
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegionFile {
    name: NameFile,
    start: CornerFile,
    end: CornerFile,
}

/// One `{name, start, end}` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDefinition {
    pub name: String,
    pub start: BlockPos,
    pub end: BlockPos,
}

impl RegionDefinition {
    /// Parse a single entry.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] when a field is missing or mistyped and
    /// [`ConfigError::Invalid`] for coordinates outside the `i32` range.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let file = RegionFile::deserialize(value)?;
        let name = file.name.into_plain();
        let corner = |corner: CornerFile, which: &str| {
            corner.to_block_pos().ok_or_else(|| {
                ConfigError::Invalid(format!("region '{name}' has an out of range {which}"))
            })
        };
        Ok(Self {
            start: corner(file.start, "start")?,
            end: corner(file.end, "end")?,
            name,
        })
    }

    pub fn bounds(&self) -> BlockBox {
        BlockBox::new(self.start, self.end)
    }

    /// Fresh region with no baseline
    pub fn to_region(&self) -> BurnableRegion {
        BurnableRegion::new(self.name.clone(), self.bounds())
    }
}

/// JSON document holding region sets under named keys
#[derive(Debug, Clone, Default)]
pub struct RegionSource {
    document: Value,
}

impl RegionSource {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    /// Parse a document from a JSON string.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Parse a document from a reader.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when reading fails and
    /// [`ConfigError::Parse`] for malformed JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(Self::new(serde_json::from_reader(reader)?))
    }

    /// Keys at the top level of the document
    pub fn keys(&self) -> Vec<&str> {
        self.document
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every valid definition under `key`, in document order.
    ///
    /// A missing key or a value that isn't a list yields an empty set.
    /// Malformed entries are dropped with a warning.
    pub fn definitions(&self, key: &str) -> Vec<RegionDefinition> {
        let Some(value) = self.document.get(key) else {
            warn!(key, "No region set under configuration key");
            return Vec::new();
        };
        let Some(entries) = value.as_array() else {
            warn!(key, "Region set is not a list");
            return Vec::new();
        };

        entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match RegionDefinition::from_value(entry) {
                Ok(definition) => Some(definition),
                Err(err) => {
                    warn!(key, index, error = %err, "Skipping malformed region");
                    None
                }
            })
            .collect()
    }
}
