//! Bialgebra contraction of a complete bipartite Z/X block.

use alsvin_types::Phase;
use alsvin_zx::{EdgeKind, VertexId, VertexKind, ZxGraph};
use rustc_hash::FxHashSet;

use crate::error::SimpResult;
use crate::rule::{RewriteMatch, RewriteRule, select_non_overlapping};
use crate::rules::ensure;

/// Contract a complete bipartite subgraph K_{m,n} between phase-0
/// Z-spiders and phase-0 X-spiders (m·n ≥ 2, Simple edges, one external
/// edge per member) into a single Z–X pair.
///
/// Match tuple: the Z group followed by the X group, with `split` marking
/// the boundary. The fresh X-spider inherits the Z group's external wires
/// and vice versa.
pub struct Bialgebra;

fn phase_zero_spider(graph: &ZxGraph, v: VertexId, kind: VertexKind) -> bool {
    graph
        .vertex(v)
        .is_some_and(|vert| vert.kind == kind && vert.phase.is_zero())
}

/// Neighbours of `v` of the given kind over exclusively-Simple connections.
fn simple_partners(graph: &ZxGraph, v: VertexId, kind: VertexKind) -> Vec<VertexId> {
    graph
        .neighbor_ids(v)
        .filter(|&n| {
            phase_zero_spider(graph, n, kind)
                && graph.edge_set(v, n).len() == 1
                && graph.has_edge(v, n, EdgeKind::Simple)
        })
        .collect()
}

/// The one `(neighbor, kind)` leg of `v` outside `group`, provided the
/// degree works out to `group.len() + 1`.
fn external_leg(
    graph: &ZxGraph,
    v: VertexId,
    group: &FxHashSet<VertexId>,
) -> Option<(VertexId, EdgeKind)> {
    if graph.degree(v) != group.len() + 1 {
        return None;
    }
    let mut external = None;
    for (n, k) in graph.neighbors(v) {
        if group.contains(&n) {
            continue;
        }
        if external.is_some() {
            return None;
        }
        external = Some((n, k));
    }
    external
}

impl RewriteRule for Bialgebra {
    fn name(&self) -> &'static str {
        "bialgebra"
    }

    fn find(&self, graph: &ZxGraph) -> Vec<RewriteMatch> {
        let mut candidates = Vec::new();
        let mut seen: FxHashSet<Vec<VertexId>> = FxHashSet::default();

        for (u, v, kind) in graph.edges() {
            if kind != EdgeKind::Simple {
                continue;
            }
            let (z, x) = match (graph.kind(u), graph.kind(v)) {
                (VertexKind::Z, VertexKind::X) => (u, v),
                (VertexKind::X, VertexKind::Z) => (v, u),
                _ => continue,
            };
            if !phase_zero_spider(graph, z, VertexKind::Z)
                || !phase_zero_spider(graph, x, VertexKind::X)
            {
                continue;
            }

            let zs = simple_partners(graph, x, VertexKind::Z);
            let xs = simple_partners(graph, z, VertexKind::X);
            if zs.len() * xs.len() < 2 {
                continue;
            }
            let zs_set: FxHashSet<VertexId> = zs.iter().copied().collect();
            let xs_set: FxHashSet<VertexId> = xs.iter().copied().collect();

            let mut externals = Vec::new();
            let complete = zs.iter().all(|&zv| {
                xs.iter().all(|&xv| {
                    graph.has_edge(zv, xv, EdgeKind::Simple) && graph.edge_set(zv, xv).len() == 1
                }) && match external_leg(graph, zv, &xs_set) {
                    Some((n, _)) if !zs_set.contains(&n) && !xs_set.contains(&n) => {
                        externals.push(n);
                        true
                    }
                    _ => false,
                }
            }) && xs.iter().all(|&xv| {
                match external_leg(graph, xv, &zs_set) {
                    Some((n, _)) if !zs_set.contains(&n) && !xs_set.contains(&n) => {
                        externals.push(n);
                        true
                    }
                    _ => false,
                }
            });
            if !complete {
                continue;
            }

            let mut key: Vec<VertexId> = zs.iter().chain(&xs).copied().collect();
            key.sort_unstable();
            if !seen.insert(key.clone()) {
                continue;
            }

            let mut claims = key;
            claims.extend(externals);
            claims.sort_unstable();
            claims.dedup();

            let mut vertices = zs.clone();
            let split = vertices.len();
            vertices.extend(&xs);
            candidates.push(RewriteMatch {
                vertices,
                claims,
                split,
            });
        }
        select_non_overlapping(candidates)
    }

    fn apply(&self, graph: &mut ZxGraph, m: &RewriteMatch) -> SimpResult<()> {
        let zs = &m.vertices[..m.split];
        let xs = &m.vertices[m.split..];
        ensure(
            !zs.is_empty() && !xs.is_empty(),
            self.name(),
            "empty group",
        )?;

        let zs_set: FxHashSet<VertexId> = zs.iter().copied().collect();
        let xs_set: FxHashSet<VertexId> = xs.iter().copied().collect();

        let mut z_externals = Vec::new();
        for &zv in zs {
            let leg = external_leg(graph, zv, &xs_set).ok_or(
                crate::error::SimpError::InvalidMatch {
                    rule: self.name(),
                    reason: "z-group external leg vanished",
                },
            )?;
            z_externals.push(leg);
        }
        let mut x_externals = Vec::new();
        for &xv in xs {
            let leg = external_leg(graph, xv, &zs_set).ok_or(
                crate::error::SimpError::InvalidMatch {
                    rule: self.name(),
                    reason: "x-group external leg vanished",
                },
            )?;
            x_externals.push(leg);
        }

        let (row, col) = {
            let first = graph.vertex(zs[0]).expect("live vertex");
            (first.row, first.col)
        };

        for &v in zs.iter().chain(xs) {
            graph.remove_vertex(v)?;
        }

        let new_x = graph.add_spider(VertexKind::X, Phase::zero(), row, col);
        let new_z = graph.add_spider(VertexKind::Z, Phase::zero(), row, col + 1.0);
        for (n, k) in z_externals {
            graph.connect_normalized(new_x, n, k);
        }
        for (n, k) in x_externals {
            graph.connect_normalized(new_z, n, k);
        }
        graph.connect_normalized(new_x, new_z, EdgeKind::Simple);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// K_{2,2} with one external wire per member contracts to one Z–X pair.
    #[test]
    fn test_bialgebra_k22() {
        let mut g = ZxGraph::new();
        let ez: Vec<_> = (0..2)
            .map(|i| g.add_spider(VertexKind::Z, Phase::new(1, 4), -1.0, f64::from(i)))
            .collect();
        let zs: Vec<_> = (0..2)
            .map(|i| g.add_spider(VertexKind::Z, Phase::zero(), 0.0, f64::from(i)))
            .collect();
        let xs: Vec<_> = (0..2)
            .map(|i| g.add_spider(VertexKind::X, Phase::zero(), 1.0, f64::from(i)))
            .collect();
        let ex: Vec<_> = (0..2)
            .map(|i| g.add_spider(VertexKind::X, Phase::new(1, 4), 2.0, f64::from(i)))
            .collect();
        for i in 0..2 {
            g.add_edge(ez[i], zs[i], EdgeKind::Simple).unwrap();
            g.add_edge(xs[i], ex[i], EdgeKind::Simple).unwrap();
            for j in 0..2 {
                g.add_edge(zs[i], xs[j], EdgeKind::Simple).unwrap();
            }
        }

        let rule = Bialgebra;
        let matches = rule.find(&g);
        assert_eq!(matches.len(), 1);
        let before = g.num_vertices();
        rule.apply(&mut g, &matches[0]).unwrap();
        assert_eq!(g.num_vertices(), before - 2);

        // The fresh X-spider carries the old Z-group externals.
        let new_x = g
            .vertices()
            .find(|(_, v)| v.kind == VertexKind::X && v.phase.is_zero())
            .map(|(id, _)| id)
            .unwrap();
        let mut x_neighbors: Vec<_> = g.neighbor_ids(new_x).collect();
        x_neighbors.retain(|&n| ez.contains(&n));
        assert_eq!(x_neighbors.len(), 2);
        assert!(g.check_consistency());
    }

    #[test]
    fn test_k11_is_not_matched() {
        let mut g = ZxGraph::new();
        let a = g.add_spider(VertexKind::Z, Phase::new(1, 4), 0.0, 0.0);
        let z = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 1.0);
        let x = g.add_spider(VertexKind::X, Phase::zero(), 0.0, 2.0);
        let b = g.add_spider(VertexKind::X, Phase::new(1, 4), 0.0, 3.0);
        g.add_edge(a, z, EdgeKind::Simple).unwrap();
        g.add_edge(z, x, EdgeKind::Simple).unwrap();
        g.add_edge(x, b, EdgeKind::Simple).unwrap();
        assert!(Bialgebra.find(&g).is_empty());
    }

    #[test]
    fn test_nonzero_phase_blocks_match() {
        let mut g = ZxGraph::new();
        let zs: Vec<_> = (0..2)
            .map(|i| g.add_spider(VertexKind::Z, Phase::pi(), 0.0, f64::from(i)))
            .collect();
        let x = g.add_spider(VertexKind::X, Phase::zero(), 1.0, 0.0);
        let ext = g.add_spider(VertexKind::Z, Phase::zero(), 2.0, 0.0);
        for &z in &zs {
            g.add_edge(z, x, EdgeKind::Simple).unwrap();
        }
        g.add_edge(x, ext, EdgeKind::Simple).unwrap();
        assert!(Bialgebra.find(&g).is_empty());
    }
}
