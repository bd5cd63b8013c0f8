//! Identity removal: a phase-0 spider of degree two whose incident edges
//! have the same kind is a plain wire.

use alsvin_zx::{EdgeKind, ZxGraph};

use crate::error::SimpResult;
use crate::rule::{RewriteMatch, RewriteRule, select_non_overlapping};
use crate::rules::ensure;

/// Remove degree-2, phase-0 spiders whose two edges share a kind.
///
/// Match tuple: `[v, n1, n2]` with `n1 < n2` the two neighbors. The
/// neighbors are reconnected with a Simple edge (two equal kinds compose
/// to the identity wire).
pub struct IdentityRemoval;

impl RewriteRule for IdentityRemoval {
    fn name(&self) -> &'static str {
        "identity-removal"
    }

    fn find(&self, graph: &ZxGraph) -> Vec<RewriteMatch> {
        let mut candidates = Vec::new();
        for (id, vert) in graph.vertices() {
            if !vert.is_spider() || !vert.phase.is_zero() {
                continue;
            }
            let incident: Vec<_> = graph.neighbors(id).collect();
            let [(n1, k1), (n2, k2)] = incident[..] else {
                continue;
            };
            if k1 != k2 || n1 == n2 {
                continue;
            }
            candidates.push(RewriteMatch::new(vec![id, n1, n2]));
        }
        select_non_overlapping(candidates)
    }

    fn apply(&self, graph: &mut ZxGraph, m: &RewriteMatch) -> SimpResult<()> {
        let [v, n1, n2] = m.vertices[..] else {
            return Err(crate::error::SimpError::InvalidMatch {
                rule: self.name(),
                reason: "expected [v, n1, n2]",
            });
        };
        ensure(graph.contains(v), self.name(), "vertex vanished")?;
        graph.remove_vertex(v)?;
        graph.connect_normalized(n1, n2, EdgeKind::Simple);
        Ok(())
    }
}
