//! Nearest-neighbour sequencing with 2-opt refinement.
//!
//! The optimizer trusts its input: coordinates are assumed present and
//! valid, enforced upstream by the stop-creation layer. Non-finite
//! coordinates propagate NaN distances rather than failing; the returned
//! sequence stays contiguous regardless.

use serde::{Deserialize, Serialize};

use crate::stop::{OrderedStop, Stop};

/// Tuning for [`optimize`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizeOptions {
    /// Run the 2-opt refinement pass after the greedy ordering.
    pub refine: bool,

    /// Upper bound on refinement rescans. `None` runs to convergence,
    /// which is fine at interactive stop counts but worst-case O(N³).
    pub max_refine_passes: Option<usize>,
}

/// Orders stops for visiting, greedy-only or refined per `options`.
#[must_use]
pub fn optimize(stops: &[Stop], options: &OptimizeOptions) -> Vec<OrderedStop> {
    if options.refine {
        refine(stops, options.max_refine_passes)
    } else {
        optimize_greedy(stops)
    }
}

/// Nearest-neighbour ordering anchored at the first input stop.
///
/// The route always starts at the first stop in input order; alternative
/// anchors are never tried. Ties go to the first minimal candidate in
/// input order, which makes the output fully deterministic for a given
/// input. O(N²).
#[must_use]
pub fn optimize_greedy(stops: &[Stop]) -> Vec<OrderedStop> {
    if stops.len() <= 1 {
        return number(stops.to_vec());
    }

    let tour = nearest_neighbor_tour(stops);
    number(tour.into_iter().map(|index| stops[index].clone()).collect())
}

/// Greedy ordering followed by 2-opt local search.
///
/// Scans all pairs `(i, j)` with `j >= i + 2`, reversing the segment
/// strictly between them whenever that shortens the open-path tour, and
/// restarts the scan after each accepted reversal. Terminates when a full
/// scan finds no improvement: locally optimal with respect to single
/// segment reversals, never worse than the greedy tour.
#[must_use]
pub fn optimize_refined(stops: &[Stop]) -> Vec<OrderedStop> {
    refine(stops, None)
}

/// Total open-path distance of an ordered route, in kilometres. There is
/// no return-to-origin leg.
#[must_use]
pub fn path_distance_km(route: &[OrderedStop]) -> f64 {
    route.windows(2).map(|pair| pair[0].stop.position.distance_km(pair[1].stop.position)).sum()
}

fn nearest_neighbor_tour(stops: &[Stop]) -> Vec<usize> {
    let mut visited = vec![false; stops.len()];
    let mut tour = Vec::with_capacity(stops.len());

    let mut current = 0;
    visited[0] = true;
    tour.push(0);

    while tour.len() < stops.len() {
        let mut nearest: Option<usize> = None;
        let mut nearest_distance = f64::INFINITY;

        for (index, stop) in stops.iter().enumerate() {
            if visited[index] {
                continue;
            }
            let distance = stops[current].position.distance_km(stop.position);
            if distance < nearest_distance {
                nearest_distance = distance;
                nearest = Some(index);
            }
        }

        // NaN distances compare false against everything; fall back to
        // input order so the sequence stays contiguous.
        let next = nearest.unwrap_or_else(|| {
            visited.iter().position(|seen| !seen).expect("unvisited stop remains")
        });

        visited[next] = true;
        tour.push(next);
        current = next;
    }

    tour
}

fn refine(stops: &[Stop], max_passes: Option<usize>) -> Vec<OrderedStop> {
    let ordered = optimize_greedy(stops);
    if ordered.len() <= 2 {
        return ordered;
    }

    let mut route: Vec<Stop> = ordered.into_iter().map(|entry| entry.stop).collect();
    let mut best = path_length(&route);
    let mut passes = 0;

    'scan: loop {
        if let Some(limit) = max_passes
            && passes >= limit
        {
            break;
        }
        passes += 1;

        for i in 0..route.len() {
            for j in (i + 2)..route.len() {
                route[i + 1..j].reverse();
                let length = path_length(&route);
                if length < best {
                    best = length;
                    continue 'scan;
                }
                route[i + 1..j].reverse();
            }
        }

        break;
    }

    number(route)
}

fn path_length(route: &[Stop]) -> f64 {
    route.windows(2).map(|pair| pair[0].position.distance_km(pair[1].position)).sum()
}

#[allow(clippy::cast_possible_truncation)]
fn number(route: Vec<Stop>) -> Vec<OrderedStop> {
    route
        .into_iter()
        .enumerate()
        .map(|(index, stop)| OrderedStop { stop, sequence: index as u32 + 1 })
        .collect()
}

#[cfg(test)]
mod tests {
    use geo::GeoPoint;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::stop::StopKind;

    fn stop(latitude: f64, longitude: f64) -> Stop {
        Stop {
            kind: StopKind::Dropoff,
            address: format!("{latitude},{longitude}"),
            position: GeoPoint::new(latitude, longitude),
            notes: None,
        }
    }

    #[test]
    fn greedy_picks_nearest_each_step() {
        // anchor, then two stops where the farther one comes first in input
        let stops = vec![stop(0.0, 0.0), stop(2.0, 0.0), stop(1.0, 0.0)];
        let route = optimize_greedy(&stops);

        let addresses: Vec<&str> =
            route.iter().map(|entry| entry.stop.address.as_str()).collect();
        assert_eq!(addresses, vec!["0,0", "1,0", "2,0"]);
    }

    #[test]
    fn ties_break_by_input_order() {
        // both candidates are exactly one degree of latitude away
        let stops = vec![stop(0.0, 0.0), stop(1.0, 0.0), stop(-1.0, 0.0)];
        let route = optimize_greedy(&stops);

        assert_eq!(route[1].stop.address, "1,0");
    }

    #[test]
    fn refinement_pass_cap_keeps_greedy_order() {
        let stops = vec![stop(0.0, 0.0), stop(1.0, 0.0), stop(1.8, 0.9), stop(2.0, 0.0)];
        let capped =
            optimize(&stops, &OptimizeOptions { refine: true, max_refine_passes: Some(0) });

        assert_eq!(capped, optimize_greedy(&stops));
    }

    #[test]
    fn nan_coordinates_still_produce_contiguous_sequences() {
        let stops = vec![stop(0.0, 0.0), stop(f64::NAN, 0.0), stop(1.0, f64::NAN), stop(2.0, 2.0)];

        for route in [optimize_greedy(&stops), optimize_refined(&stops)] {
            let mut sequences: Vec<u32> = route.iter().map(|entry| entry.sequence).collect();
            sequences.sort_unstable();
            assert_eq!(sequences, vec![1, 2, 3, 4]);
        }
    }
}
