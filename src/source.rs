//! Tile source facade orchestrating the clustering pipeline.
//!
//! A [`TileSource`] answers tile requests for the rendering collaborator:
//! tile geometry, station filtering, grid binning, and aggregation, plus
//! the data-version bookkeeping the map layer uses to decide when cached
//! tile content is stale.

use crate::aggregate;
use crate::error::Result;
use crate::grid;
use crate::store::StationStore;
use crate::tile;
use crate::types::{ClusterConfig, DataVersion, Station, TileAddress, TileData};
use parking_lot::Mutex;

/// Callback invoked with the new data version after an effective
/// populated/empty transition.
pub type VersionListener = Box<dyn Fn(DataVersion) + Send + Sync>;

/// Serves clustered station features for quadtree map tiles.
///
/// Each request is an independent, synchronous computation over the current
/// dataset snapshot; concurrent requests from multiple rendering threads
/// are safe. At most one version listener is registered at a time; the
/// listener slot is owned by the facade, not global.
pub struct TileSource {
    store: StationStore,
    config: ClusterConfig,
    listener: Mutex<Option<VersionListener>>,
}

impl TileSource {
    /// Creates a tile source over an initial station dataset.
    ///
    /// Fails if the configuration is out of range.
    pub fn new(config: ClusterConfig, stations: Vec<Station>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: StationStore::new(stations),
            config,
            listener: Mutex::new(None),
        })
    }

    /// Starts building a tile source with the default configuration.
    pub fn builder() -> crate::builder::TileSourceBuilder {
        crate::builder::TileSourceBuilder::new()
    }

    /// Computes the cluster features for one tile.
    ///
    /// In the empty state this returns immediately with no features and the
    /// empty-state version; the pipeline does not run. Otherwise the tile
    /// address is projected to its bounding box, stations inside the box
    /// are binned into the configured grid, and every non-empty cell is
    /// reduced to one feature.
    pub fn request_tile(&self, address: TileAddress) -> TileData {
        let version = self.store.version();
        if !version.has_data {
            return TileData {
                features: Vec::new(),
                version,
            };
        }

        let bounds = tile::tile_bounds(address);
        let (stations, version) = self.store.stations_within(&bounds);
        if !version.has_data {
            // The store was toggled while we computed the bounds; the
            // returned pair must stay consistent.
            return TileData {
                features: Vec::new(),
                version,
            };
        }

        let groups = grid::cluster_stations(&bounds, self.config.grid_divider, &stations);
        let features = groups
            .iter()
            .map(|group| {
                aggregate::reduce(
                    group,
                    self.config.representative,
                    self.config.bucket_resolution,
                )
            })
            .collect();
        TileData { features, version }
    }

    /// Current data version, without running the pipeline.
    ///
    /// The version is dataset-wide; the address only mirrors the
    /// renderer's per-tile calling convention.
    pub fn query_version(&self, _address: TileAddress) -> DataVersion {
        self.store.version()
    }

    /// Registers the version listener, replacing any previous one.
    ///
    /// The listener lock is held for the duration of a notification, so a
    /// callback may request tiles but must not register or unregister
    /// listeners.
    pub fn register_version_listener(
        &self,
        listener: impl Fn(DataVersion) + Send + Sync + 'static,
    ) {
        *self.listener.lock() = Some(Box::new(listener));
    }

    /// Removes the registered version listener, if any.
    pub fn unregister_version_listener(&self) {
        *self.listener.lock() = None;
    }

    /// Toggles the populated/empty state, returning whether it changed.
    ///
    /// On an effective transition the currently registered listener is
    /// notified synchronously, exactly once, with the new version. A no-op
    /// toggle neither bumps the version nor notifies. No tile request is
    /// dispatched automatically; the owning map layer re-requests affected
    /// tiles itself.
    pub fn set_has_data(&self, has_data: bool) -> bool {
        let Some(version) = self.store.set_has_data(has_data) else {
            return false;
        };
        let listener = self.listener.lock();
        if let Some(callback) = listener.as_ref() {
            callback(version);
        }
        true
    }

    /// Replaces the whole station dataset.
    pub fn replace_stations(&self, stations: Vec<Station>) {
        self.store.replace_all(stations);
    }

    /// Number of stations currently in the dataset.
    pub fn station_count(&self) -> usize {
        self.store.len()
    }

    /// The active clustering configuration.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }
}

// Ensure TileSource can be shared across rendering threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<TileSource>;
};
