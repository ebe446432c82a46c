//! Seeds a synthetic charging-station dataset around Berlin, requests a few
//! tiles at different zoom levels, demonstrates the empty-state fast path,
//! and prints one tile as GeoJSON.
//!
//! Run with `cargo run --example charging_map`.

use geo::Point;
use tilecluster::prelude::*;
use tilecluster::{tile_to_geojson_string, VERSION};

const BERLIN: (f64, f64) = (13.4050, 52.5200);

fn synthetic_stations(count: usize) -> Result<Vec<Station>> {
    let mut stations = Vec::with_capacity(count);
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    for _ in 0..count {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let dx = ((state >> 16) % 3000) as f64 / 10_000.0 - 0.15;
        let dy = ((state >> 40) % 3000) as f64 / 10_000.0 - 0.15;
        let free = ((state >> 8) % 6) as u32;
        let occupied = 1 + ((state >> 4) % 4) as u32;
        stations
            .push(Station::new(Point::new(BERLIN.0 + dx, BERLIN.1 + dy), free, occupied)?);
    }
    Ok(stations)
}

fn main() -> Result<()> {
    env_logger::init();

    println!("tilecluster {VERSION}");

    let source = TileSourceBuilder::new()
        .grid_divider(4)
        .stations(synthetic_stations(500)?)
        .build()?;
    println!("Seeded {} stations around Berlin", source.station_count());

    source.register_version_listener(|version| {
        println!(
            "  -> data version changed to {} (has data: {})",
            version, version.has_data
        );
    });

    let center = Point::new(BERLIN.0, BERLIN.1);
    for level in [8, 10, 12, 14] {
        let tile = tile_at(center, level);
        let data = source.request_tile(tile);
        let slots: u32 = data.features.iter().map(|f| f.count).sum();
        println!(
            "Tile {tile}: {} clusters, {} slots total",
            data.features.len(),
            slots
        );
        for feature in data.features.iter().take(3) {
            println!(
                "  cluster at ({:.4}, {:.4}): free={} occupied={} icon={}",
                feature.location.x(),
                feature.location.y(),
                feature.free,
                feature.occupied,
                feature.asset_name()
            );
        }
    }

    println!("Toggling the dataset off:");
    source.set_has_data(false);
    let tile = tile_at(center, 12);
    let empty = source.request_tile(tile);
    println!(
        "Tile {tile} while empty: {} clusters (version {})",
        empty.features.len(),
        empty.version
    );

    println!("Toggling the dataset back on:");
    source.set_has_data(true);
    let data = source.request_tile(tile);
    println!("GeoJSON for tile {tile}:");
    println!("{}", tile_to_geojson_string(&data)?);

    Ok(())
}
