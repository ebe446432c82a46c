//! Fixed-grid spatial binning of stations within a tile's bounding box.
//!
//! The bounding box is subdivided into `divider x divider` cells;
//! stations landing in the same cell form one cluster group. Cell keys are
//! plain integer pairs scoped to a single clustering call.

use crate::types::Station;
use geo::Rect;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Smallest bin span in degrees; guards degenerate bounding boxes.
const MIN_BIN_SPAN: f64 = 1e-12;

/// Identifier of one grid cell, `(latitude bin, longitude bin)`.
///
/// Structural equality only; keys are never compared across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(pub i32, pub i32);

/// One station together with its offset from the cell center.
#[derive(Debug, Clone, Copy)]
pub struct GridMember {
    pub station: Station,
    /// Euclidean distance from the cell center in fractional grid units.
    pub center_distance: f64,
}

/// All stations that fell into one grid cell.
#[derive(Debug, Clone)]
pub struct ClusterGroup {
    pub key: CellKey,
    pub members: SmallVec<[GridMember; 8]>,
}

/// Partitions `stations` into a `divider x divider` grid over `bounds`.
///
/// Fractional grid coordinates are measured from the box's north-east
/// corner inward, each axis divided by its own bin size; the bin key is
/// `(floor(grid_lat), floor(grid_lon))`. Two stations share a cluster iff
/// their floored coordinates are equal. Cells without members are never
/// emitted. Within a cell, members keep the input iteration order; the
/// groups themselves come back ordered by cell key so the output is stable
/// across runs.
pub fn cluster_stations(bounds: &Rect, divider: u32, stations: &[Station]) -> Vec<ClusterGroup> {
    debug_assert!(divider > 0, "grid divider must be at least 1");
    let divider = f64::from(divider.max(1));
    let sw = bounds.min();
    let ne = bounds.max();
    let lon_bin = bin_span(ne.x - sw.x, divider);
    let lat_bin = bin_span(ne.y - sw.y, divider);

    let mut cells: FxHashMap<CellKey, ClusterGroup> = FxHashMap::default();
    for station in stations {
        let grid_lon = (ne.x - station.location.x()) / lon_bin;
        let grid_lat = (ne.y - station.location.y()) / lat_bin;
        let key = CellKey(grid_lat.floor() as i32, grid_lon.floor() as i32);

        let d_lat = grid_lat.fract() - 0.5;
        let d_lon = grid_lon.fract() - 0.5;
        let center_distance = (d_lat * d_lat + d_lon * d_lon).sqrt();

        cells
            .entry(key)
            .or_insert_with(|| ClusterGroup {
                key,
                members: SmallVec::new(),
            })
            .members
            .push(GridMember {
                station: *station,
                center_distance,
            });
    }

    let mut groups: Vec<ClusterGroup> = cells.into_values().collect();
    groups.sort_by_key(|group| group.key);
    groups
}

fn bin_span(span: f64, divider: f64) -> f64 {
    debug_assert!(span >= 0.0, "bounding box has negative span");
    let bin = span / divider;
    if !(bin >= MIN_BIN_SPAN) {
        log::warn!("Degenerate bounding box span {}; clamping bin size", span);
        return MIN_BIN_SPAN;
    }
    bin
}
