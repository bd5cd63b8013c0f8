//! Spider fusion: two same-colour spiders joined by a Simple edge merge
//! into one, adding phases.

use alsvin_types::Phase;
use alsvin_zx::{EdgeKind, ZxGraph};

use crate::error::SimpResult;
use crate::rule::{RewriteMatch, RewriteRule, select_non_overlapping};
use crate::rules::{claims_with_neighbors, ensure};

/// Fuse Simple-connected same-colour spider pairs.
///
/// Match tuple: `[u, v]`; `u` survives and absorbs `v`'s phase and edges.
/// A parallel Hadamard wire between the pair collapses to a self-loop and
/// contributes π to the surviving phase.
pub struct SpiderFusion;

impl RewriteRule for SpiderFusion {
    fn name(&self) -> &'static str {
        "spider-fusion"
    }

    fn find(&self, graph: &ZxGraph) -> Vec<RewriteMatch> {
        let mut candidates = Vec::new();
        for (u, v, kind) in graph.edges() {
            if kind != EdgeKind::Simple {
                continue;
            }
            let (Some(vu), Some(vv)) = (graph.vertex(u), graph.vertex(v)) else {
                continue;
            };
            if !vu.is_spider() || vu.kind != vv.kind {
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
            graph.has_edge(u, v, EdgeKind::Simple),
            self.name(),
            "fused edge vanished",
        )?;
        let absorbed = graph.phase(v);
        graph.add_phase(u, absorbed)?;

        let moved: Vec<(alsvin_zx::VertexId, EdgeKind)> = graph.neighbors(v).collect();
        graph.remove_vertex(v)?;
        for (n, kind) in moved {
            if n == u {
                if kind == EdgeKind::Hadamard {
                    graph.add_phase(u, Phase::pi())?;
                }
            } else {
                graph.connect_normalized(u, n, kind);
            }
        }
        Ok(())
    }
}
