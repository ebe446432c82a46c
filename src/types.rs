//! Core value types and configuration for the clustering engine.
//!
//! This module provides the validated value types flowing through the
//! pipeline together with a serializable configuration that can be loaded
//! from JSON or other formats with minimal ceremony.

use crate::error::{Result, TileClusterError};
use crate::tile;
use geo::Point;
use serde::{Deserialize, Serialize};

/// Address of one quadtree cell in the Web-Mercator tiling scheme.
///
/// Row 0 is the northernmost row at every level. `new` validates that the
/// address actually lies inside the `2^level x 2^level` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAddress {
    pub column: u32,
    pub row: u32,
    pub level: u32,
}

impl TileAddress {
    /// Parses and validates a tile address.
    ///
    /// Returns `Err(TileClusterError::InvalidTile)` when the zoom level
    /// exceeds [`tile::MAX_LEVEL`] or the column/row fall outside the grid
    /// at that level.
    pub fn new(column: u32, row: u32, level: u32) -> Result<Self> {
        if level > tile::MAX_LEVEL {
            return Err(TileClusterError::InvalidTile(format!(
                "zoom level {} exceeds maximum {}",
                level,
                tile::MAX_LEVEL
            )));
        }
        let span = 1u32 << level;
        if column >= span || row >= span {
            return Err(TileClusterError::InvalidTile(format!(
                "tile {}/{} outside the {}x{} grid at level {}",
                column, row, span, span, level
            )));
        }
        Ok(Self { column, row, level })
    }
}

impl std::fmt::Display for TileAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.column, self.row)
    }
}

/// One charging station: a geographic location plus its slot counts.
///
/// Stations are immutable once created; the dataset they live in is only
/// ever replaced wholesale through the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    /// Location with x = longitude, y = latitude in degrees.
    pub location: Point,
    /// Number of free charging slots.
    pub free: u32,
    /// Number of occupied charging slots.
    pub occupied: u32,
}

impl Station {
    /// Creates a station, validating that the location is finite and that
    /// the station exposes at least one slot.
    pub fn new(location: Point, free: u32, occupied: u32) -> Result<Self> {
        if !location.x().is_finite() || !location.y().is_finite() {
            return Err(TileClusterError::InvalidInput(
                "station location must have finite coordinates".into(),
            ));
        }
        if free + occupied == 0 {
            return Err(TileClusterError::InvalidInput(
                "station must expose at least one charging slot".into(),
            ));
        }
        Ok(Self {
            location,
            free,
            occupied,
        })
    }

    /// Total number of slots at this station.
    pub fn total_slots(&self) -> u32 {
        self.free + self.occupied
    }
}

/// Monotonic identifier for the dataset state.
///
/// Starts at `{1, 0}` in the populated state; every effective
/// populated/empty toggle bumps `major` and flips `has_data`, so the
/// versions of the two states are always distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataVersion {
    pub major: u32,
    pub minor: u32,
    /// Whether the dataset is currently in the populated state.
    pub has_data: bool,
}

impl DataVersion {
    pub(crate) const INITIAL: DataVersion = DataVersion {
        major: 1,
        minor: 0,
        has_data: true,
    };

    pub(crate) fn toggled(self, has_data: bool) -> Self {
        Self {
            major: self.major + 1,
            minor: self.minor,
            has_data,
        }
    }
}

impl std::fmt::Display for DataVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// How the representative location of a cluster is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepresentativePolicy {
    /// The member closest to its grid cell center; ties broken by input order.
    #[default]
    ClosestToCenter,
    /// The first member in input order.
    First,
}

/// The aggregated output unit: one feature per non-empty grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterFeature {
    /// Representative location of the cluster.
    pub location: Point,
    /// Summed free slots across all members.
    pub free: u32,
    /// Summed occupied slots across all members.
    pub occupied: u32,
    /// Total slots, always `free + occupied`.
    pub count: u32,
    /// Occupancy percentage discretized to the configured resolution.
    pub bucket: u32,
}

impl ClusterFeature {
    /// Display asset identifier for the renderer, embedding the bucket
    /// percentage.
    pub fn asset_name(&self) -> String {
        format!("occupancy_{}", self.bucket)
    }
}

/// Result of a single tile request.
#[derive(Debug, Clone, PartialEq)]
pub struct TileData {
    pub features: Vec<ClusterFeature>,
    pub version: DataVersion,
}

/// Clustering configuration.
///
/// Designed to be easily serializable and loadable from JSON while keeping
/// complexity minimal.
///
/// # Example
///
/// ```rust
/// use tilecluster::{ClusterConfig, RepresentativePolicy};
///
/// let config = ClusterConfig::default();
/// assert_eq!(config.grid_divider, 4);
///
/// let json = r#"{
///     "grid_divider": 8,
///     "representative": "first"
/// }"#;
/// let config: ClusterConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.representative, RepresentativePolicy::First);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Per-axis subdivision of a tile's bounding box into grid cells.
    #[serde(default = "ClusterConfig::default_grid_divider")]
    pub grid_divider: u32,

    /// Occupancy bucket resolution in percent (1-100, default: 5).
    #[serde(default = "ClusterConfig::default_bucket_resolution")]
    pub bucket_resolution: u32,

    /// Representative selection policy.
    #[serde(default)]
    pub representative: RepresentativePolicy,
}

impl ClusterConfig {
    const fn default_grid_divider() -> u32 {
        4
    }

    const fn default_bucket_resolution() -> u32 {
        5
    }

    /// Checks that all fields are inside their valid ranges.
    pub fn validate(&self) -> Result<()> {
        if self.grid_divider == 0 {
            return Err(TileClusterError::InvalidInput(
                "grid divider must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.bucket_resolution) {
            return Err(TileClusterError::InvalidInput(format!(
                "bucket resolution {} outside 1-100",
                self.bucket_resolution
            )));
        }
        Ok(())
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            grid_divider: Self::default_grid_divider(),
            bucket_resolution: Self::default_bucket_resolution(),
            representative: RepresentativePolicy::default(),
        }
    }
}
