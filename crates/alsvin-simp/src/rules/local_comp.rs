//! Local complementation at a ±π/2 spider.

use alsvin_zx::{EdgeKind, VertexId, VertexKind, ZxGraph};

use crate::error::SimpResult;
use crate::rule::{RewriteMatch, RewriteRule, select_non_overlapping};
use crate::rules::{claims_with_neighbors, ensure};

/// Remove a Z-spider of phase ±π/2 whose neighbourhood is all-Z and
/// pure-Hadamard, complementing the edges among its neighbours.
///
/// Match tuple: `[v]`. Every unordered neighbour pair has its Hadamard edge
/// toggled and every neighbour's phase is decremented by `phase(v)`.
pub struct LocalComplementation;

fn interior_hadamard_z_neighborhood(graph: &ZxGraph, v: VertexId) -> bool {
    graph
        .neighbors(v)
        .all(|(n, k)| k == EdgeKind::Hadamard && graph.kind(n) == VertexKind::Z)
}

impl RewriteRule for LocalComplementation {
    fn name(&self) -> &'static str {
        "local-complementation"
    }

    fn find(&self, graph: &ZxGraph) -> Vec<RewriteMatch> {
        let mut candidates = Vec::new();
        for (v, vert) in graph.vertices() {
            if vert.kind != VertexKind::Z
                || !vert.phase.is_proper_clifford()
                || !interior_hadamard_z_neighborhood(graph, v)
            {
                continue;
            }
            candidates.push(RewriteMatch::with_claims(
                vec![v],
                claims_with_neighbors(graph, &[v]),
            ));
        }
        select_non_overlapping(candidates)
    }

    fn apply(&self, graph: &mut ZxGraph, m: &RewriteMatch) -> SimpResult<()> {
        let [v] = m.vertices[..] else {
            return Err(crate::error::SimpError::InvalidMatch {
                rule: self.name(),
                reason: "expected [v]",
            });
        };
        ensure(
            graph.contains(v) && graph.phase(v).is_proper_clifford(),
            self.name(),
            "pivot vertex changed",
        )?;
        let phase = graph.phase(v);
        let neighbors: Vec<VertexId> = graph.neighbor_ids(v).collect();
        graph.remove_vertex(v)?;

        for (i, &a) in neighbors.iter().enumerate() {
            for &b in &neighbors[i + 1..] {
                graph.toggle_hadamard_edge(a, b);
            }
        }
        for &n in &neighbors {
            graph.add_phase(n, -phase)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_types::Phase;

    /// A π/2 spider with three Hadamard-connected Z-neighbours.
    #[test]
    fn test_local_complementation_triangle() {
        let mut g = ZxGraph::new();
        let v = g.add_spider(VertexKind::Z, Phase::new(1, 2), 0.0, 0.0);
        let mut ns = Vec::new();
        for i in 0..3 {
            let n = g.add_spider(VertexKind::Z, Phase::new(1, 4), 1.0, f64::from(i));
            g.add_edge(v, n, EdgeKind::Hadamard).unwrap();
            ns.push(n);
        }

        let rule = LocalComplementation;
        let matches = rule.find(&g);
        assert_eq!(matches.len(), 1);
        rule.apply(&mut g, &matches[0]).unwrap();

        assert!(!g.contains(v));
        // Every pair of former neighbours now shares a toggled Hadamard edge.
        for (i, &a) in ns.iter().enumerate() {
            for &b in &ns[i + 1..] {
                assert!(g.has_edge(a, b, EdgeKind::Hadamard));
            }
            // Each neighbour's phase decreased by π/2.
            assert_eq!(g.phase(a), Phase::new(-1, 4));
        }
    }

    #[test]
    fn test_existing_edges_are_toggled_off() {
        let mut g = ZxGraph::new();
        let v = g.add_spider(VertexKind::Z, Phase::new(-1, 2), 0.0, 0.0);
        let a = g.add_spider(VertexKind::Z, Phase::zero(), 1.0, 0.0);
        let b = g.add_spider(VertexKind::Z, Phase::zero(), 1.0, 1.0);
        g.add_edge(v, a, EdgeKind::Hadamard).unwrap();
        g.add_edge(v, b, EdgeKind::Hadamard).unwrap();
        g.add_edge(a, b, EdgeKind::Hadamard).unwrap();

        let rule = LocalComplementation;
        let matches = rule.find(&g);
        // Only v qualifies: a and b have phase 0.
        assert_eq!(matches.len(), 1);
        rule.apply(&mut g, &matches[0]).unwrap();

        assert!(!g.has_edge(a, b, EdgeKind::Hadamard));
        assert_eq!(g.phase(a), Phase::new(1, 2));
    }

    #[test]
    fn test_pauli_phase_does_not_match() {
        let mut g = ZxGraph::new();
        let v = g.add_spider(VertexKind::Z, Phase::pi(), 0.0, 0.0);
        let a = g.add_spider(VertexKind::Z, Phase::zero(), 1.0, 0.0);
        g.add_edge(v, a, EdgeKind::Hadamard).unwrap();
        // Neither v (phase π) nor a (phase 0) has a ±π/2 phase.
        assert!(LocalComplementation.find(&g).is_empty());
    }

    #[test]
    fn test_simple_edge_blocks_match() {
        let mut g = ZxGraph::new();
        let v = g.add_spider(VertexKind::Z, Phase::new(1, 2), 0.0, 0.0);
        let a = g.add_spider(VertexKind::Z, Phase::zero(), 1.0, 0.0);
        g.add_edge(v, a, EdgeKind::Simple).unwrap();
        assert!(LocalComplementation.find(&g).is_empty());
    }
}
