//! Reduction of grid cell groups into renderable cluster features.

use crate::grid::ClusterGroup;
use crate::types::{ClusterFeature, RepresentativePolicy};
use std::cmp::Ordering;

/// Reduces one grid cell group to a single cluster feature.
///
/// The representative location is chosen per `policy` with ties broken by
/// input order; slot counts are summed across all members; the bucket is
/// the summed occupancy percentage discretized to `bucket_resolution`.
///
/// The group must be non-empty. The clusterer never emits empty groups.
pub fn reduce(
    group: &ClusterGroup,
    policy: RepresentativePolicy,
    bucket_resolution: u32,
) -> ClusterFeature {
    debug_assert!(!group.members.is_empty(), "cluster group without members");

    let representative = match policy {
        RepresentativePolicy::First => &group.members[0],
        RepresentativePolicy::ClosestToCenter => group
            .members
            .iter()
            .min_by(|a, b| {
                a.center_distance
                    .partial_cmp(&b.center_distance)
                    .unwrap_or(Ordering::Equal)
            })
            .unwrap_or(&group.members[0]),
    };

    let free: u32 = group.members.iter().map(|member| member.station.free).sum();
    let occupied: u32 = group
        .members
        .iter()
        .map(|member| member.station.occupied)
        .sum();

    ClusterFeature {
        location: representative.station.location,
        free,
        occupied,
        count: free + occupied,
        bucket: occupancy_bucket(free, occupied, bucket_resolution),
    }
}

/// Occupancy percentage of a cluster, discretized to the nearest multiple
/// of `resolution`.
///
/// Percentages already on a multiple come back unchanged; a remainder above
/// half the resolution rounds up, anything else rounds down. A cluster with
/// zero slots violates the station invariant and yields bucket 0 after a
/// warning.
pub fn occupancy_bucket(free: u32, occupied: u32, resolution: u32) -> u32 {
    let count = free + occupied;
    debug_assert!(count > 0, "cluster with zero charging slots");
    if count == 0 {
        log::warn!("Cluster with zero charging slots; defaulting occupancy bucket to 0");
        return 0;
    }

    let resolution = resolution.max(1);
    let raw = (100.0 * f64::from(occupied) / f64::from(count)).round() as u32;
    let remainder = raw % resolution;
    if remainder > resolution / 2 {
        raw + (resolution - remainder)
    } else {
        raw - remainder
    }
}
