//! Builder for assembling a tile source.

use crate::error::Result;
use crate::source::TileSource;
use crate::types::{ClusterConfig, RepresentativePolicy, Station};

/// Fluent configuration for [`TileSource`] creation.
///
/// # Example
///
/// ```rust
/// use tilecluster::{RepresentativePolicy, TileSourceBuilder};
///
/// let source = TileSourceBuilder::new()
///     .grid_divider(8)
///     .bucket_resolution(10)
///     .representative(RepresentativePolicy::First)
///     .build()?;
/// assert_eq!(source.config().grid_divider, 8);
/// # Ok::<(), tilecluster::TileClusterError>(())
/// ```
#[derive(Debug, Default)]
pub struct TileSourceBuilder {
    config: ClusterConfig,
    stations: Vec<Station>,
}

impl TileSourceBuilder {
    /// Creates a builder with the default configuration and no stations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole clustering configuration.
    pub fn config(mut self, config: ClusterConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the per-axis grid subdivision used for clustering.
    pub fn grid_divider(mut self, divider: u32) -> Self {
        self.config.grid_divider = divider;
        self
    }

    /// Sets the occupancy bucket resolution in percent.
    pub fn bucket_resolution(mut self, resolution: u32) -> Self {
        self.config.bucket_resolution = resolution;
        self
    }

    /// Sets the representative selection policy.
    pub fn representative(mut self, policy: RepresentativePolicy) -> Self {
        self.config.representative = policy;
        self
    }

    /// Seeds the initial station dataset.
    pub fn stations(mut self, stations: Vec<Station>) -> Self {
        self.stations = stations;
        self
    }

    /// Builds the tile source. Configuration errors surface here.
    pub fn build(self) -> Result<TileSource> {
        TileSource::new(self.config, self.stations)
    }
}
