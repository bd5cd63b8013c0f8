//! State copy: a degree-1 Pauli state copies through an adjacent spider of
//! the opposite colour.

use alsvin_zx::ZxGraph;

use crate::error::SimpResult;
use crate::rule::{RewriteMatch, RewriteRule, select_non_overlapping};
use crate::rules::{apply_copy, claims_with_neighbors, ensure};

/// Copy a degree-1 state with phase 0 or π through an opposite-colour
/// spider of any phase.
///
/// Match tuple: `[v, w]` with `v` the spider, `w` the state. The spider's
/// phase only contributes a scalar, so the rewrite is the same copy as
/// [`PiCopy`](crate::rules::PiCopy) without the π precondition.
pub struct StateCopy;

impl RewriteRule for StateCopy {
    fn name(&self) -> &'static str {
        "state-copy"
    }

    fn find(&self, graph: &ZxGraph) -> Vec<RewriteMatch> {
        let mut candidates = Vec::new();
        for (w, state) in graph.vertices() {
            if !state.is_spider() || !state.phase.is_pauli() || graph.degree(w) != 1 {
                continue;
            }
            let (v, _) = graph.neighbors(w).next().expect("degree 1");
            let Some(vert) = graph.vertex(v) else {
                continue;
            };
            if vert.kind != state.kind.toggled() {
                continue;
            }
            candidates.push(RewriteMatch::with_claims(
                vec![v, w],
                claims_with_neighbors(graph, &[v, w]),
            ));
        }
        select_non_overlapping(candidates)
    }

    fn apply(&self, graph: &mut ZxGraph, m: &RewriteMatch) -> SimpResult<()> {
        let [v, w] = m.vertices[..] else {
            return Err(crate::error::SimpError::InvalidMatch {
                rule: self.name(),
                reason: "expected [v, w]",
            });
        };
        ensure(
            graph.contains(v) && graph.degree(w) == 1,
            self.name(),
            "state detached",
        )?;
        apply_copy(graph, v, w)
    }

    fn monovariant(&self, graph: &ZxGraph) -> u64 {
        graph.num_edges() as u64
    }
}
