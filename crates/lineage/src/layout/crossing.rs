//! Edge crossing counting between adjacent ranks.

use crate::structure::VertexIndex;

/// Binary indexed tree over lower-rank positions.
struct FenwickTree {
    counts: Vec<usize>,
}

impl FenwickTree {
    fn new(len: usize) -> Self {
        Self {
            counts: vec![0; len + 1],
        }
    }

    fn add(&mut self, position: usize) {
        let mut i = position + 1;
        while i < self.counts.len() {
            self.counts[i] += 1;
            i += i & i.wrapping_neg();
        }
    }

    /// Number of inserted positions `<= position`.
    fn prefix_sum(&self, position: usize) -> usize {
        let mut i = (position + 1).min(self.counts.len() - 1);
        let mut sum = 0;
        while i > 0 {
            sum += self.counts[i];
            i -= i & i.wrapping_neg();
        }
        sum
    }
}

/// Counts the crossings among `edges` running between two adjacent ranks.
///
/// Each edge is an `(upper, lower)` vertex pair, `position` maps a vertex to
/// its index within its rank and `lower_width` is the number of vertices in
/// the lower rank. Two edges cross when their endpoints are ordered
/// differently in the two ranks; edges sharing an endpoint never cross.
pub(crate) fn bilayer_crossings(
    edges: &[(VertexIndex, VertexIndex)],
    position: &[usize],
    lower_width: usize,
) -> usize {
    let mut pairs: Vec<(usize, usize)> = edges
        .iter()
        .map(|(upper, lower)| (position[upper.index()], position[lower.index()]))
        .collect();
    pairs.sort_unstable();

    let mut tree = FenwickTree::new(lower_width);
    let mut crossings = 0;
    for (inserted, &(_, lower)) in pairs.iter().enumerate() {
        crossings += inserted - tree.prefix_sum(lower);
        tree.add(lower);
    }
    crossings
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn v(i: usize) -> VertexIndex {
        VertexIndex::new(i)
    }

    /// Quadratic reference count.
    fn naive(edges: &[(usize, usize)]) -> usize {
        let mut count = 0;
        for (i, a) in edges.iter().enumerate() {
            for b in &edges[i + 1..] {
                if (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_no_edges() {
        assert_eq!(bilayer_crossings(&[], &[], 0), 0);
    }

    #[test]
    fn test_single_crossing() {
        // upper: 0 1, lower: 2 3; 0 -> 3 and 1 -> 2 cross
        let position = vec![0, 1, 0, 1];
        let edges = vec![(v(0), v(3)), (v(1), v(2))];
        assert_eq!(bilayer_crossings(&edges, &position, 2), 1);
    }

    #[test]
    fn test_shared_endpoint_does_not_cross() {
        let position = vec![0, 1, 0];
        let edges = vec![(v(0), v(2)), (v(1), v(2))];
        assert_eq!(bilayer_crossings(&edges, &position, 1), 0);
    }

    #[test]
    fn test_complete_bipartite() {
        // K(2,2) drawn in any order has exactly one crossing.
        let position = vec![0, 1, 0, 1];
        let edges = vec![(v(0), v(2)), (v(0), v(3)), (v(1), v(2)), (v(1), v(3))];
        assert_eq!(bilayer_crossings(&edges, &position, 2), 1);
    }

    proptest! {
        #[test]
        fn prop_matches_naive_count(
            raw in prop::collection::vec((0usize..6, 0usize..6), 0..20)
        ) {
            // Upper vertices are 0..6, lower vertices are 6..12.
            let position: Vec<usize> = (0..12).map(|i| i % 6).collect();
            let edges: Vec<(VertexIndex, VertexIndex)> =
                raw.iter().map(|&(u, l)| (v(u), v(l + 6))).collect();

            prop_assert_eq!(bilayer_crossings(&edges, &position, 6), naive(&raw));
        }
    }
}
