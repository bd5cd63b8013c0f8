//! Phase-gadget fusion: gadgets over the same target set merge their
//! phases.

use alsvin_zx::{EdgeKind, VertexId, VertexKind, ZxGraph};
use rustc_hash::FxHashMap;

use crate::error::SimpResult;
use crate::rule::{RewriteMatch, RewriteRule, select_non_overlapping};
use crate::rules::ensure;

/// Fuse two phase gadgets sharing their target neighbourhood.
///
/// A gadget is a degree-1 Z-spider (the leaf, arbitrary phase) attached by
/// a Hadamard edge to a phase-0 Z-spider (the hub) whose remaining edges
/// are Hadamard wires into Z-spiders. Match tuple: `[h1, l1, h2, l2]`;
/// `l1` absorbs `l2`'s phase and the second gadget disappears.
pub struct GadgetFusion;

fn gadget_at(graph: &ZxGraph, leaf: VertexId) -> Option<(VertexId, Vec<VertexId>)> {
    let vert = graph.vertex(leaf)?;
    if vert.kind != VertexKind::Z || graph.degree(leaf) != 1 {
        return None;
    }
    let (hub, kind) = graph.neighbors(leaf).next()?;
    if kind != EdgeKind::Hadamard {
        return None;
    }
    let hub_vert = graph.vertex(hub)?;
    if hub_vert.kind != VertexKind::Z || !hub_vert.phase.is_zero() {
        return None;
    }
    let mut targets = Vec::new();
    for (n, k) in graph.neighbors(hub) {
        if n == leaf {
            continue;
        }
        if k != EdgeKind::Hadamard || graph.kind(n) != VertexKind::Z {
            return None;
        }
        targets.push(n);
    }
    if targets.is_empty() {
        return None;
    }
    Some((hub, targets))
}

impl RewriteRule for GadgetFusion {
    fn name(&self) -> &'static str {
        "gadget-fusion"
    }

    fn find(&self, graph: &ZxGraph) -> Vec<RewriteMatch> {
        let mut groups: FxHashMap<Vec<VertexId>, Vec<(VertexId, VertexId)>> = FxHashMap::default();
        for (leaf, _) in graph.vertices() {
            if let Some((hub, targets)) = gadget_at(graph, leaf) {
                groups.entry(targets).or_default().push((hub, leaf));
            }
        }

        let mut candidates = Vec::new();
        for (targets, mut gadgets) in groups {
            if gadgets.len() < 2 {
                continue;
            }
            gadgets.sort_unstable();
            for pair in gadgets.chunks_exact(2) {
                let [(h1, l1), (h2, l2)] = pair else {
                    unreachable!()
                };
                let mut claims = vec![*h1, *l1, *h2, *l2];
                claims.extend(&targets);
                claims.sort_unstable();
                candidates.push(RewriteMatch::with_claims(vec![*h1, *l1, *h2, *l2], claims));
            }
        }
        select_non_overlapping(candidates)
    }

    fn apply(&self, graph: &mut ZxGraph, m: &RewriteMatch) -> SimpResult<()> {
        let [h1, l1, h2, l2] = m.vertices[..] else {
            return Err(crate::error::SimpError::InvalidMatch {
                rule: self.name(),
                reason: "expected [h1, l1, h2, l2]",
            });
        };
        ensure(
            graph.contains(h1) && graph.contains(l1) && graph.contains(h2) && graph.contains(l2),
            self.name(),
            "gadget vanished",
        )?;
        let absorbed = graph.phase(l2);
        graph.add_phase(l1, absorbed)?;
        graph.remove_vertex(l2)?;
        graph.remove_vertex(h2)?;
        Ok(())
    }
}
