//! Versioned in-memory station dataset.
//!
//! The store owns the full station set and the populated/empty version
//! flag. Readers always see a complete snapshot: the dataset is only ever
//! replaced wholesale, never mutated in place.

use crate::types::{DataVersion, Station};
use geo::Rect;
use parking_lot::RwLock;

struct StoreInner {
    stations: Vec<Station>,
    version: DataVersion,
}

/// Thread-safe owner of the station dataset and its data version.
pub struct StationStore {
    inner: RwLock<StoreInner>,
}

impl StationStore {
    /// Creates a store seeded with the given dataset, starting in the
    /// populated state.
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                stations,
                version: DataVersion::INITIAL,
            }),
        }
    }

    /// Stations inside `bounds`, inclusive on all four edges, paired with
    /// the version the filter ran against.
    ///
    /// Input order is preserved. An uninitialized or empty store yields an
    /// empty list, never an error.
    pub fn stations_within(&self, bounds: &Rect) -> (Vec<Station>, DataVersion) {
        let inner = self.inner.read();
        let min = bounds.min();
        let max = bounds.max();
        let stations = inner
            .stations
            .iter()
            .filter(|station| {
                let lon = station.location.x();
                let lat = station.location.y();
                lon >= min.x && lon <= max.x && lat >= min.y && lat <= max.y
            })
            .copied()
            .collect();
        (stations, inner.version)
    }

    /// Replaces the whole dataset.
    pub fn replace_all(&self, stations: Vec<Station>) {
        self.inner.write().stations = stations;
    }

    /// Sets the populated/empty flag.
    ///
    /// Returns the bumped version when the flag actually changed and `None`
    /// for a no-op toggle. Flag and version move together under one write
    /// lock, so no reader ever observes an inconsistent pair.
    pub fn set_has_data(&self, has_data: bool) -> Option<DataVersion> {
        let mut inner = self.inner.write();
        if inner.version.has_data == has_data {
            return None;
        }
        inner.version = inner.version.toggled(has_data);
        Some(inner.version)
    }

    /// Current data version.
    pub fn version(&self) -> DataVersion {
        self.inner.read().version
    }

    /// Whether the store is in the populated state.
    pub fn has_data(&self) -> bool {
        self.inner.read().version.has_data
    }

    /// Number of stations in the dataset.
    pub fn len(&self) -> usize {
        self.inner.read().stations.len()
    }

    /// Whether the dataset holds no stations at all.
    pub fn is_empty(&self) -> bool {
        self.inner.read().stations.is_empty()
    }
}

impl Default for StationStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
