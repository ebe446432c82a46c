//! Tile-scoped spatial clustering engine for point features on quadtree
//! map tiles.
//!
//! For every requested tile the engine converts the quadtree address into
//! a geographic bounding box, selects the stations inside it, bins them
//! into a fixed grid of clusters, and reduces each cluster to a single
//! renderable feature with summed slot counts and an occupancy bucket.
//!
//! ```rust
//! use geo::Point;
//! use tilecluster::{Station, TileAddress, TileSource};
//!
//! let stations = vec![
//!     Station::new(Point::new(13.40, 52.52), 3, 1)?,
//!     Station::new(Point::new(13.41, 52.53), 0, 2)?,
//! ];
//! let source = TileSource::builder().stations(stations).build()?;
//!
//! let tile = TileAddress::new(550, 335, 10)?;
//! let data = source.request_tile(tile);
//! assert!(data.version.has_data);
//! # Ok::<(), tilecluster::TileClusterError>(())
//! ```

pub mod aggregate;
pub mod builder;
pub mod error;
pub mod grid;
pub mod source;
pub mod store;
pub mod tile;
pub mod types;
pub mod wire;

pub use builder::TileSourceBuilder;
pub use error::{Result, TileClusterError};
pub use source::{TileSource, VersionListener};
pub use store::StationStore;

pub use geo::{Point, Rect};

pub use aggregate::{occupancy_bucket, reduce};
pub use grid::{CellKey, ClusterGroup, GridMember, cluster_stations};
pub use tile::{MAX_LEVEL, TILE_SIZE, tile_at, tile_bounds};

pub use types::{
    ClusterConfig, ClusterFeature, DataVersion, RepresentativePolicy, Station, TileAddress,
    TileData,
};

pub use wire::{tile_to_geojson, tile_to_geojson_string};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Result, TileClusterError, TileSource, TileSourceBuilder};

    pub use geo::{Point, Rect};

    pub use crate::{
        ClusterConfig, ClusterFeature, DataVersion, RepresentativePolicy, Station, TileAddress,
        TileData,
    };

    pub use crate::tile::{tile_at, tile_bounds};
}
