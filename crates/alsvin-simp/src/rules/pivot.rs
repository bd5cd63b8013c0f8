//! Pivot on a Hadamard edge between two Pauli-phase spiders.

use alsvin_types::Phase;
use alsvin_zx::{EdgeKind, VertexId, VertexKind, ZxGraph};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::SimpResult;
use crate::rule::{RewriteMatch, RewriteRule, select_non_overlapping};
use crate::rules::{claims_with_neighbors, ensure};

/// Pivot along an interior Hadamard edge whose endpoints carry phases in
/// {0, π}.
///
/// Match tuple: `[u, v]`. With `Nu = N(u)\{v}`, `Nv = N(v)\{u}` and
/// `Nuv = Nu ∩ Nv`, the rewrite toggles a Hadamard edge for every pair in
/// `Nu × Nv` (pairs inside `Nuv × Nuv` cancel, self-pairs are skipped),
/// adds `phase(v)` to `Nu\Nv`, `phase(u)` to `Nv\Nu`, and
/// `phase(u)+phase(v)+π` to `Nuv`, then removes `u` and `v`.
pub struct Pivot;

fn pauli_interior_z(graph: &ZxGraph, v: VertexId) -> bool {
    graph.kind(v) == VertexKind::Z
        && graph.phase(v).is_pauli()
        && graph
            .neighbors(v)
            .all(|(n, k)| k == EdgeKind::Hadamard && graph.kind(n) == VertexKind::Z)
}

impl RewriteRule for Pivot {
    fn name(&self) -> &'static str {
        "pivot"
    }

    fn find(&self, graph: &ZxGraph) -> Vec<RewriteMatch> {
        let mut candidates = Vec::new();
        for (u, v, kind) in graph.edges() {
            if kind != EdgeKind::Hadamard {
                continue;
            }
            if !pauli_interior_z(graph, u) || !pauli_interior_z(graph, v) {
                continue;
            }
            candidates.push(RewriteMatch::with_claims(
                vec![u, v],
                claims_with_neighbors(graph, &[u, v]),
            ));
        }
        select_non_overlapping(candidates)
    }

    fn apply(&self, graph: &mut ZxGraph, m: &RewriteMatch) -> SimpResult<()> {
        let [u, v] = m.vertices[..] else {
            return Err(crate::error::SimpError::InvalidMatch {
                rule: self.name(),
                reason: "expected [u, v]",
            });
        };
        ensure(
            graph.has_edge(u, v, EdgeKind::Hadamard),
            self.name(),
            "pivot edge vanished",
        )?;
        let pu = graph.phase(u);
        let pv = graph.phase(v);
        let nu: Vec<VertexId> = graph.neighbor_ids(u).filter(|&n| n != v).collect();
        let nv: Vec<VertexId> = graph.neighbor_ids(v).filter(|&n| n != u).collect();
        let nu_set: FxHashSet<VertexId> = nu.iter().copied().collect();
        let nv_set: FxHashSet<VertexId> = nv.iter().copied().collect();

        graph.remove_vertex(u)?;
        graph.remove_vertex(v)?;

        // Toggle parity over Nu × Nv; a pair inside Nuv × Nuv shows up in
        // both orders and cancels.
        let mut parity: FxHashMap<(VertexId, VertexId), u32> = FxHashMap::default();
        for &a in &nu {
            for &b in &nv {
                if a == b {
                    continue;
                }
                let key = if a < b { (a, b) } else { (b, a) };
                *parity.entry(key).or_default() += 1;
            }
        }
        let mut toggles: Vec<(VertexId, VertexId)> = parity
            .into_iter()
            .filter_map(|(pair, count)| (count % 2 == 1).then_some(pair))
            .collect();
        toggles.sort_unstable();
        for (a, b) in toggles {
            graph.toggle_hadamard_edge(a, b);
        }

        for &n in &nu {
            if nv_set.contains(&n) {
                graph.add_phase(n, pu + pv + Phase::pi())?;
            } else {
                graph.add_phase(n, pv)?;
            }
        }
        for &n in &nv {
            if !nu_set.contains(&n) {
                graph.add_phase(n, pu)?;
            }
        }
        Ok(())
    }
}
