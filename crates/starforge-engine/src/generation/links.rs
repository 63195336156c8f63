//! Travel links between systems: k-nearest neighbours, made symmetric.

use glam::DVec2;

/// Neighbours per system.
pub const LINK_K: usize = 3;

/// Build an undirected k-nearest-neighbour graph.
/// Returns sorted, deduplicated `(a, b)` pairs with `a < b`.
pub fn build_links(positions: &[DVec2], k: usize) -> Vec<(usize, usize)> {
    let n = positions.len();
    let mut edges = Vec::with_capacity(n * k);
    let mut candidates: Vec<(f64, usize)> = Vec::with_capacity(n);

    for (i, pi) in positions.iter().enumerate() {
        candidates.clear();
        candidates.extend(
            positions
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(j, pj)| (pi.distance_squared(*pj), j)),
        );
        // Ties break on index so the graph is stable.
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        for &(_, j) in candidates.iter().take(k) {
            edges.push((i.min(j), i.max(j)));
        }
    }

    edges.sort_unstable();
    edges.dedup();
    edges
}

/// Adjacency of `index` in an edge list.
pub fn neighbors_of(edges: &[(usize, usize)], index: usize) -> Vec<usize> {
    let mut out: Vec<usize> = edges
        .iter()
        .filter_map(|&(a, b)| {
            if a == index {
                Some(b)
            } else if b == index {
                Some(a)
            } else {
                None
            }
        })
        .collect();
    out.sort_unstable();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_of_points() {
        let pts: Vec<DVec2> = (0..6).map(|i| DVec2::new(i as f64, 0.0)).collect();
        let edges = build_links(&pts, 1);
        assert_eq!(edges, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
    }

    #[test]
    fn edges_are_symmetric_and_unique() {
        let pts: Vec<DVec2> = (0..40)
            .map(|i| {
                let f = i as f64;
                DVec2::new((f * 12.9898).sin() * 50.0, (f * 78.233).cos() * 50.0)
            })
            .collect();
        let edges = build_links(&pts, LINK_K);
        for w in edges.windows(2) {
            assert!(w[0] < w[1], "not sorted/deduplicated");
        }
        for &(a, b) in &edges {
            assert!(a < b);
            assert!(neighbors_of(&edges, a).contains(&b));
            assert!(neighbors_of(&edges, b).contains(&a));
        }
        for i in 0..pts.len() {
            assert!(neighbors_of(&edges, i).len() >= LINK_K);
        }
    }

    #[test]
    fn tiny_inputs() {
        assert!(build_links(&[], 3).is_empty());
        assert!(build_links(&[DVec2::ZERO], 3).is_empty());
        assert_eq!(build_links(&[DVec2::ZERO, DVec2::ONE], 3), vec![(0, 1)]);
    }
}
