//! Quadtree tile geometry for the Web-Mercator tiling scheme.
//!
//! Pure functions mapping a tile address (column, row, zoom level) to the
//! geographic bounding box it covers, plus the forward projection helpers
//! needed to go the other way. No state.

use crate::types::TileAddress;
use geo::{Point, Rect, coord};
use std::f64::consts::PI;

/// Pixel width and height of one tile.
pub const TILE_SIZE: u32 = 256;

/// WGS84 spherical Earth radius in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Meters per pixel at zoom level 0.
const INITIAL_RESOLUTION: f64 = 2.0 * PI * EARTH_RADIUS / TILE_SIZE as f64;

/// Half the extent of the Mercator plane in meters.
const ORIGIN_SHIFT: f64 = PI * EARTH_RADIUS;

/// Highest supported zoom level; `1 << 31` would overflow the 32-bit tile
/// span.
pub const MAX_LEVEL: u32 = 30;

fn clamp_level(level: u32) -> u32 {
    debug_assert!(level <= MAX_LEVEL, "zoom level {level} out of range");
    if level > MAX_LEVEL {
        log::warn!("Clamping zoom level {} to {}", level, MAX_LEVEL);
        MAX_LEVEL
    } else {
        level
    }
}

/// Meters-per-pixel resolution at the given zoom level.
fn resolution(level: u32) -> f64 {
    INITIAL_RESOLUTION / (1u64 << level) as f64
}

/// Converts an absolute pixel coordinate to a signed Mercator meter
/// coordinate.
///
/// The magnitude is the pixel's distance from the projection origin; the
/// sign follows which side of the tile-space half-width the pixel falls on.
/// Pixel rows are measured from the south edge of the pixel plane.
fn pixel_to_meters(pixel: f64, level: u32) -> f64 {
    let half_width = TILE_SIZE as f64 * (1u64 << level) as f64 / 2.0;
    let magnitude = (pixel * resolution(level) - ORIGIN_SHIFT).abs();
    if pixel >= half_width {
        magnitude
    } else {
        -magnitude
    }
}

/// Converts a Mercator meter x coordinate to degrees longitude.
fn meters_to_lon(meters: f64) -> f64 {
    meters / ORIGIN_SHIFT * 180.0
}

/// Converts a Mercator meter y coordinate to degrees latitude through the
/// inverse Mercator transform.
fn meters_to_lat(meters: f64) -> f64 {
    let lat = meters / ORIGIN_SHIFT * 180.0;
    180.0 / PI * (2.0 * (lat * PI / 180.0).exp().atan() - PI / 2.0)
}

/// Geographic bounding box of a quadtree tile.
///
/// Row 0 is the northernmost row at every level; the row is flipped to the
/// south-origin convention before the inverse projection, so the returned
/// rect always has its minimum corner at the south-west.
pub fn tile_bounds(tile: TileAddress) -> Rect {
    let level = clamp_level(tile.level);
    let span = 1u64 << level;
    let south_origin_row = (span - 1).saturating_sub(u64::from(tile.row));

    let tile_size = f64::from(TILE_SIZE);
    let west_px = u64::from(tile.column) as f64 * tile_size;
    let east_px = (u64::from(tile.column) + 1) as f64 * tile_size;
    let south_px = south_origin_row as f64 * tile_size;
    let north_px = (south_origin_row + 1) as f64 * tile_size;

    let south_west = coord! {
        x: meters_to_lon(pixel_to_meters(west_px, level)),
        y: meters_to_lat(pixel_to_meters(south_px, level)),
    };
    let north_east = coord! {
        x: meters_to_lon(pixel_to_meters(east_px, level)),
        y: meters_to_lat(pixel_to_meters(north_px, level)),
    };
    Rect::new(south_west, north_east)
}

/// Projects a geographic point forward to Mercator meters.
pub fn point_to_meters(point: Point) -> (f64, f64) {
    let mx = point.x() / 180.0 * ORIGIN_SHIFT;
    let my_deg = ((90.0 + point.y()) * PI / 360.0).tan().ln() / (PI / 180.0);
    let my = my_deg / 180.0 * ORIGIN_SHIFT;
    (mx, my)
}

/// Converts Mercator meters to absolute pixel coordinates at a zoom level,
/// pixel rows measured from the south edge.
pub fn meters_to_pixels(mx: f64, my: f64, level: u32) -> (f64, f64) {
    let res = resolution(clamp_level(level));
    ((mx + ORIGIN_SHIFT) / res, (my + ORIGIN_SHIFT) / res)
}

/// Address of the tile covering the given geographic point at a zoom level.
pub fn tile_at(point: Point, level: u32) -> TileAddress {
    let level = clamp_level(level);
    let (mx, my) = point_to_meters(point);
    let (px, py) = meters_to_pixels(mx, my, level);

    let span = 1i64 << level;
    let tile_size = f64::from(TILE_SIZE);
    let column = ((px / tile_size).floor() as i64).clamp(0, span - 1) as u32;
    let south_row = ((py / tile_size).floor() as i64).clamp(0, span - 1) as u32;
    TileAddress {
        column,
        row: (span as u32 - 1) - south_row,
        level,
    }
}
