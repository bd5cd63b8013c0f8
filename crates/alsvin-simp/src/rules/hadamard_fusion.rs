//! Hadamard fusion: two adjacent arity-2 H-boxes cancel.

use alsvin_zx::{EdgeKind, VertexId, VertexKind, ZxGraph};

use crate::error::SimpResult;
use crate::rule::{RewriteMatch, RewriteRule, select_non_overlapping};
use crate::rules::ensure;

/// Cancel a pair of adjacent phase-π, arity-2 H-boxes.
///
/// Match tuple: `[h1, h2]`. The boxes' outer neighbours are reconnected by
/// a wire whose kind accounts for the two Hadamards plus the Hadamard
/// parity of the three path segments.
pub struct HadamardFusion;

fn plain_hadamard_box(graph: &ZxGraph, v: VertexId) -> bool {
    graph
        .vertex(v)
        .is_some_and(|vert| vert.kind == VertexKind::HBox && vert.phase.is_pi())
        && graph.degree(v) == 2
}

fn outer_leg(graph: &ZxGraph, h: VertexId, other: VertexId) -> Option<(VertexId, EdgeKind)> {
    graph.neighbors(h).find(|&(n, _)| n != other)
}

impl RewriteRule for HadamardFusion {
    fn name(&self) -> &'static str {
        "hadamard-fusion"
    }

    fn find(&self, graph: &ZxGraph) -> Vec<RewriteMatch> {
        let mut candidates = Vec::new();
        for (h1, h2, _) in graph.edges() {
            if !plain_hadamard_box(graph, h1) || !plain_hadamard_box(graph, h2) {
                continue;
            }
            let (Some((a, _)), Some((b, _))) = (outer_leg(graph, h1, h2), outer_leg(graph, h2, h1))
            else {
                continue;
            };
            // A pair suspended between two boundaries would splice back
            // into a buffered wire of the same size; leave it alone.
            if graph.kind(a) == VertexKind::Boundary && graph.kind(b) == VertexKind::Boundary {
                continue;
            }
            candidates.push(RewriteMatch::with_claims(vec![h1, h2], vec![h1, h2, a, b]));
        }
        select_non_overlapping(candidates)
    }

    fn apply(&self, graph: &mut ZxGraph, m: &RewriteMatch) -> SimpResult<()> {
        let [h1, h2] = m.vertices[..] else {
            return Err(crate::error::SimpError::InvalidMatch {
                rule: self.name(),
                reason: "expected [h1, h2]",
            });
        };
        ensure(
            plain_hadamard_box(graph, h1) && plain_hadamard_box(graph, h2),
            self.name(),
            "h-box changed",
        )?;
        let middle = graph
            .edge_set(h1, h2)
            .kinds()
            .next()
            .ok_or(crate::error::SimpError::InvalidMatch {
                rule: self.name(),
                reason: "joining edge vanished",
            })?;
        let (a, k1) = outer_leg(graph, h1, h2).ok_or(crate::error::SimpError::InvalidMatch {
            rule: self.name(),
            reason: "missing outer leg",
        })?;
        let (b, k2) = outer_leg(graph, h2, h1).ok_or(crate::error::SimpError::InvalidMatch {
            rule: self.name(),
            reason: "missing outer leg",
        })?;

        // Two H-boxes plus the segment parity decide the spliced wire kind.
        let hadamards = 2 + [k1, middle, k2]
            .iter()
            .filter(|&&k| k == EdgeKind::Hadamard)
            .count();
        let kind = if hadamards % 2 == 1 {
            EdgeKind::Hadamard
        } else {
            EdgeKind::Simple
        };

        graph.remove_vertex(h1)?;
        graph.remove_vertex(h2)?;
        graph.connect_normalized(a, b, kind);
        Ok(())
    }
}
