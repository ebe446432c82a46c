use geo::Point;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tilecluster::{
    ClusterConfig, RepresentativePolicy, Station, TileSource, TileSourceBuilder, tile_at,
    tile_bounds, tile_to_geojson,
};

const BERLIN: (f64, f64) = (13.4050, 52.5200);

/// Deterministic synthetic dataset spread around the Berlin city center.
fn city_stations(count: usize) -> Vec<Station> {
    let mut stations = Vec::with_capacity(count);
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    for _ in 0..count {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let dx = ((state >> 16) % 2000) as f64 / 10_000.0 - 0.1;
        let dy = ((state >> 40) % 2000) as f64 / 10_000.0 - 0.1;
        let free = ((state >> 8) % 5) as u32;
        let occupied = 1 + ((state >> 4) % 3) as u32;
        stations.push(
            Station::new(Point::new(BERLIN.0 + dx, BERLIN.1 + dy), free, occupied).unwrap(),
        );
    }
    stations
}

#[test]
fn test_city_dataset_pipeline_conserves_slot_counts() {
    let stations = city_stations(200);
    let source = TileSourceBuilder::new()
        .stations(stations.clone())
        .build()
        .unwrap();

    for level in [8, 10, 12] {
        let tile = tile_at(Point::new(BERLIN.0, BERLIN.1), level);
        let data = source.request_tile(tile);

        let bounds = tile_bounds(tile);
        let min = bounds.min();
        let max = bounds.max();
        let inside: Vec<&Station> = stations
            .iter()
            .filter(|station| {
                let lon = station.location.x();
                let lat = station.location.y();
                lon >= min.x && lon <= max.x && lat >= min.y && lat <= max.y
            })
            .collect();

        let expected_free: u32 = inside.iter().map(|station| station.free).sum();
        let expected_occupied: u32 = inside.iter().map(|station| station.occupied).sum();
        let clustered_free: u32 = data.features.iter().map(|f| f.free).sum();
        let clustered_occupied: u32 = data.features.iter().map(|f| f.occupied).sum();

        assert_eq!(clustered_free, expected_free, "free slots at level {level}");
        assert_eq!(
            clustered_occupied, expected_occupied,
            "occupied slots at level {level}"
        );
        for feature in &data.features {
            assert_eq!(feature.count, feature.free + feature.occupied);
        }
    }
}

#[test]
fn test_cluster_count_is_bounded_by_the_grid() {
    let divider = 4u32;
    let source = TileSourceBuilder::new()
        .grid_divider(divider)
        .stations(city_stations(500))
        .build()
        .unwrap();

    let tile = tile_at(Point::new(BERLIN.0, BERLIN.1), 11);
    let data = source.request_tile(tile);
    assert!(!data.features.is_empty());
    // Stations on the south-west edges spill into one extra boundary bin
    // per axis, so the cap is (divider + 1)^2 rather than divider^2.
    assert!(data.features.len() <= ((divider + 1) * (divider + 1)) as usize);
}

#[test]
fn test_representative_is_an_actual_member_location() {
    let stations = city_stations(100);
    for policy in [RepresentativePolicy::ClosestToCenter, RepresentativePolicy::First] {
        let source = TileSourceBuilder::new()
            .representative(policy)
            .stations(stations.clone())
            .build()
            .unwrap();
        let data = source.request_tile(tile_at(Point::new(BERLIN.0, BERLIN.1), 10));
        for feature in &data.features {
            assert!(
                stations
                    .iter()
                    .any(|station| station.location == feature.location)
            );
        }
    }
}

#[test]
fn test_version_lifecycle_with_listener() {
    let source = TileSourceBuilder::new()
        .stations(city_stations(50))
        .build()
        .unwrap();
    let tile = tile_at(Point::new(BERLIN.0, BERLIN.1), 10);

    let notifications = Arc::new(Mutex::new(Vec::new()));
    {
        let notifications = Arc::clone(&notifications);
        source.register_version_listener(move |version| {
            notifications.lock().push(version);
        });
    }

    let populated = source.query_version(tile);
    assert!(populated.has_data);

    assert!(source.set_has_data(false));
    let empty_data = source.request_tile(tile);
    assert!(empty_data.features.is_empty());
    assert_ne!(empty_data.version, populated);

    // Requests never fire the listener, only transitions do.
    source.request_tile(tile);
    source.request_tile(tile);
    assert!(source.set_has_data(true));
    assert!(!source.set_has_data(true));

    let seen = notifications.lock();
    assert_eq!(seen.len(), 2);
    assert!(!seen[0].has_data);
    assert!(seen[1].has_data);
    assert!(seen[1].major > seen[0].major);
}

#[test]
fn test_concurrent_requests_during_toggles() {
    let source = Arc::new(
        TileSourceBuilder::new()
            .stations(city_stations(300))
            .build()
            .unwrap(),
    );
    let checked = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for worker in 0..4u32 {
        let source = Arc::clone(&source);
        let checked = Arc::clone(&checked);
        handles.push(thread::spawn(move || {
            let tile = tile_at(Point::new(BERLIN.0, BERLIN.1), 9 + worker % 3);
            for _ in 0..50 {
                let data = source.request_tile(tile);
                // An empty-state version must never arrive with features.
                if !data.version.has_data {
                    assert!(data.features.is_empty());
                }
                checked.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    for round in 0..20 {
        source.set_has_data(round % 2 == 0);
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(checked.load(Ordering::Relaxed), 200);
    // Leave the source populated again.
    source.set_has_data(true);
    assert!(source.query_version(tile_at(Point::new(BERLIN.0, BERLIN.1), 9)).has_data);
}

#[test]
fn test_geojson_export_of_a_requested_tile() {
    let source = TileSourceBuilder::new()
        .stations(city_stations(80))
        .build()
        .unwrap();
    let data = source.request_tile(tile_at(Point::new(BERLIN.0, BERLIN.1), 10));
    assert!(!data.features.is_empty());

    let collection = tile_to_geojson(&data);
    assert_eq!(collection.features.len(), data.features.len());
    for feature in &collection.features {
        let properties = feature.properties.as_ref().unwrap();
        assert!(properties.contains_key("free"));
        assert!(properties.contains_key("occupied"));
        assert!(properties.contains_key("count"));
        let icon = properties["icon"].as_str().unwrap();
        assert!(icon.starts_with("occupancy_"));
    }
}

#[test]
fn test_replace_stations_changes_results() {
    let source = TileSourceBuilder::new()
        .stations(city_stations(40))
        .build()
        .unwrap();
    let tile = tile_at(Point::new(BERLIN.0, BERLIN.1), 10);
    assert!(!source.request_tile(tile).features.is_empty());

    // Swap in a dataset on the other side of the planet.
    let elsewhere = vec![Station::new(Point::new(-73.99, 40.73), 2, 1).unwrap()];
    source.replace_stations(elsewhere);
    assert!(source.request_tile(tile).features.is_empty());

    let nyc_tile = tile_at(Point::new(-73.99, 40.73), 10);
    let data = source.request_tile(nyc_tile);
    assert_eq!(data.features.len(), 1);
    assert_eq!(data.features[0].free, 2);
    assert_eq!(data.features[0].occupied, 1);
}

#[test]
fn test_config_driven_source_from_json() {
    let config: ClusterConfig =
        serde_json::from_str(r#"{"grid_divider": 2, "bucket_resolution": 10}"#).unwrap();
    let source = TileSource::new(config, city_stations(60)).unwrap();
    let data = source.request_tile(tile_at(Point::new(BERLIN.0, BERLIN.1), 12));
    for feature in &data.features {
        assert_eq!(feature.bucket % 10, 0);
    }
}
