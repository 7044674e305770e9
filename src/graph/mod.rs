use crate::catalog::Catalog;
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Price distance (in currency units) that halves the similarity.
const PRICE_SCALE: f64 = 1000.0;

/// Undirected weighted graph over bundle ids. Neighbour lists keep insertion
/// order, which is the tie-breaker for recommendations.
#[derive(Debug, Default)]
pub struct SimilarityGraph {
    adjacency: HashMap<u32, Vec<(u32, f64)>>,
}

impl SimilarityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relates every unordered pair of distinct bundles in the catalog.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut graph = Self::new();
        let bundles = catalog.list_all();

        for (i, a) in bundles.iter().enumerate() {
            for b in &bundles[i + 1..] {
                graph.add_relation(a.id, b.id, similarity(a.price, b.price));
            }
        }

        tracing::debug!(
            "Similarity graph built: {} nodes, {} edges",
            graph.adjacency.len(),
            graph.edge_count()
        );
        graph
    }

    pub fn add_relation(&mut self, a: u32, b: u32, weight: f64) {
        self.adjacency.entry(a).or_default().push((b, weight));
        self.adjacency.entry(b).or_default().push((a, weight));
    }

    /// Up to `k` neighbour ids, heaviest first. Unknown ids get nothing.
    pub fn recommend(&self, bundle_id: u32, k: usize) -> Vec<u32> {
        let Some(neighbours) = self.adjacency.get(&bundle_id) else {
            return Vec::new();
        };

        let mut ranked = neighbours.clone();
        // stable: equal weights stay in insertion order
        ranked.sort_by_key(|&(_, weight)| Reverse(OrderedFloat(weight)));
        ranked.into_iter().take(k).map(|(id, _)| id).collect()
    }

    /// Weight of the first edge between `a` and `b`, if any.
    pub fn weight(&self, a: u32, b: u32) -> Option<f64> {
        self.adjacency
            .get(&a)?
            .iter()
            .find(|&&(id, _)| id == b)
            .map(|&(_, weight)| weight)
    }

    fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }
}

/// 1 / (1 + |a - b| / 1000), in (0, 1].
pub fn similarity(a: Decimal, b: Decimal) -> f64 {
    let distance = (a - b).abs().to_f64().unwrap_or(f64::MAX);
    1.0 / (1.0 + distance / PRICE_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity(dec!(15000), dec!(15000)), 1.0);
        assert!((similarity(dec!(15000), dec!(9000)) - 1.0 / 7.0).abs() < 1e-12);
        assert_eq!(similarity(dec!(9000), dec!(15000)), similarity(dec!(15000), dec!(9000)));
        assert!(similarity(dec!(0), dec!(1000000000)) > 0.0);
    }

    #[test]
    fn relations_are_symmetric() {
        let graph = SimilarityGraph::from_catalog(&Catalog::default());
        let ids: Vec<u32> = (1..=9).collect();

        for &a in &ids {
            for &b in &ids {
                if a == b {
                    assert_eq!(graph.weight(a, b), None);
                } else {
                    let w = graph.weight(a, b).unwrap();
                    assert_eq!(Some(w), graph.weight(b, a));
                    assert!(w > 0.0 && w <= 1.0);
                }
            }
        }
        assert_eq!(graph.edge_count(), 36);
    }

    #[test]
    fn recommends_closest_prices() {
        let graph = SimilarityGraph::from_catalog(&Catalog::default());

        // bundle 1 costs 15000: 9000 (2), 29000 (7), 45000 (8) are nearest
        assert_eq!(graph.recommend(1, 3), vec![2, 7, 8]);
        // bundle 4 costs 127000: 137000 (5), 109000 (9), 91000 (6)
        assert_eq!(graph.recommend(4, 3), vec![5, 9, 6]);
    }

    #[test]
    fn recommendations_are_descending_and_exclude_self() {
        let graph = SimilarityGraph::from_catalog(&Catalog::default());

        for id in 1..=9 {
            let recs = graph.recommend(id, 3);
            assert_eq!(recs.len(), 3);
            assert!(!recs.contains(&id));

            let weights: Vec<f64> = recs.iter().map(|&r| graph.weight(id, r).unwrap()).collect();
            assert!(weights.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut graph = SimilarityGraph::new();
        graph.add_relation(1, 2, 0.5);
        graph.add_relation(1, 3, 0.9);
        graph.add_relation(1, 4, 0.5);

        assert_eq!(graph.recommend(1, 3), vec![3, 2, 4]);
    }

    #[test]
    fn unknown_id_and_small_k() {
        let graph = SimilarityGraph::from_catalog(&Catalog::default());
        assert!(graph.recommend(999, 3).is_empty());
        assert!(graph.recommend(1, 0).is_empty());
        assert_eq!(graph.recommend(1, 20).len(), 8);
    }
}
