//! The rewrite rule library.
//!
//! Each rule is a unit struct implementing [`RewriteRule`](crate::rule::RewriteRule);
//! strategies are ordered sequences of boxed rules.

mod bialgebra;
mod gadget_fusion;
mod hadamard_fusion;
mod identity;
mod local_comp;
mod pi_copy;
mod pivot;
mod spider_fusion;
mod state_copy;

pub use bialgebra::Bialgebra;
pub use gadget_fusion::GadgetFusion;
pub use hadamard_fusion::HadamardFusion;
pub use identity::IdentityRemoval;
pub use local_comp::LocalComplementation;
pub use pi_copy::PiCopy;
pub use pivot::Pivot;
pub use spider_fusion::SpiderFusion;
pub use state_copy::StateCopy;

use alsvin_zx::{VertexId, ZxGraph};
use rustc_hash::FxHashSet;

use crate::error::{SimpError, SimpResult};
use crate::rule::RewriteRule;

/// The rule sequence of the Clifford simplification strategy.
pub fn clifford_rules() -> Vec<Box<dyn RewriteRule>> {
    vec![
        Box::new(SpiderFusion),
        Box::new(IdentityRemoval),
        Box::new(PiCopy),
        Box::new(Pivot),
        Box::new(LocalComplementation),
    ]
}

/// Every rule in the library, for callers driving rules individually.
pub fn all_rules() -> Vec<Box<dyn RewriteRule>> {
    vec![
        Box::new(IdentityRemoval),
        Box::new(SpiderFusion),
        Box::new(PiCopy),
        Box::new(Bialgebra),
        Box::new(StateCopy),
        Box::new(HadamardFusion),
        Box::new(LocalComplementation),
        Box::new(Pivot),
        Box::new(GadgetFusion),
    ]
}

/// The core vertices plus every distinct neighbor of theirs.
pub(crate) fn claims_with_neighbors(graph: &ZxGraph, core: &[VertexId]) -> Vec<VertexId> {
    let mut set: FxHashSet<VertexId> = core.iter().copied().collect();
    for &v in core {
        set.extend(graph.neighbor_ids(v));
    }
    let mut claims: Vec<VertexId> = set.into_iter().collect();
    claims.sort_unstable();
    claims
}

pub(crate) fn ensure(cond: bool, rule: &'static str, reason: &'static str) -> SimpResult<()> {
    if cond {
        Ok(())
    } else {
        Err(SimpError::InvalidMatch { rule, reason })
    }
}

/// Copy a Pauli state `w` through its opposite-colour neighbor `v`: both
/// disappear and every other leg of `v` receives a fresh degree-1 state of
/// `w`'s colour and phase.
pub(crate) fn apply_copy(graph: &mut ZxGraph, v: VertexId, w: VertexId) -> SimpResult<()> {
    let state = graph
        .vertex(w)
        .ok_or(SimpError::InvalidMatch {
            rule: "copy",
            reason: "state vertex vanished",
        })?
        .clone();
    let legs: Vec<(VertexId, alsvin_zx::EdgeKind)> =
        graph.neighbors(v).filter(|&(n, _)| n != w).collect();
    let (row, col) = graph
        .vertex(v)
        .map(|vert| (vert.row, vert.col))
        .unwrap_or_default();

    graph.remove_vertex(w)?;
    graph.remove_vertex(v)?;
    for (n, kind) in legs {
        let s = graph.add_spider(state.kind, state.phase, row, col);
        graph.connect_normalized(s, n, kind);
    }
    Ok(())
}
