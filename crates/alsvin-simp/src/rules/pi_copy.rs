//! Pi-copy: a Pauli state hanging off a phase-π spider of the opposite
//! colour copies through it.

use alsvin_zx::ZxGraph;

use crate::error::SimpResult;
use crate::rule::{RewriteMatch, RewriteRule, select_non_overlapping};
use crate::rules::{apply_copy, claims_with_neighbors, ensure};

/// Copy a degree-1 Pauli state through an adjacent phase-π spider of the
/// opposite colour.
///
/// Match tuple: `[v, w]` where `v` is the phase-π spider and `w` the
/// degree-1 state with phase 0 or π. Both are removed; every other leg of
/// `v` receives a copy of the state. Only Pauli states copy, so the matcher
/// requires `w`'s phase to be 0 or π.
pub struct PiCopy;

impl RewriteRule for PiCopy {
    fn name(&self) -> &'static str {
        "pi-copy"
    }

    fn find(&self, graph: &ZxGraph) -> Vec<RewriteMatch> {
        let mut candidates = Vec::new();
        for (v, vert) in graph.vertices() {
            if !vert.is_spider() || !vert.phase.is_pi() {
                continue;
            }
            for w in graph.neighbor_ids(v) {
                let Some(state) = graph.vertex(w) else {
                    continue;
                };
                if state.kind != vert.kind.toggled()
                    || graph.degree(w) != 1
                    || !state.phase.is_pauli()
                {
                    continue;
                }
                candidates.push(RewriteMatch::with_claims(
                    vec![v, w],
                    claims_with_neighbors(graph, &[v, w]),
                ));
            }
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
