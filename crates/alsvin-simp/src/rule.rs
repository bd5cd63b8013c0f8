//! The rewrite-rule capability trait and match bookkeeping.

use alsvin_zx::{VertexId, ZxGraph};
use rustc_hash::FxHashSet;

use crate::error::SimpResult;

/// One occurrence of a rule's pattern.
///
/// `vertices` is the positional tuple the rule's `apply` interprets (each
/// rule documents its layout). `claims` is the full set of vertices the
/// rewrite touches; the match engine guarantees the claims of the returned
/// matches are pairwise disjoint, so a whole pass can be applied as a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteMatch {
    /// Positional vertex tuple, rule-specific.
    pub vertices: Vec<VertexId>,
    /// Every vertex the rewrite reads or mutates.
    pub claims: Vec<VertexId>,
    /// Split point into `vertices` for rules with two variable-size groups.
    pub split: usize,
}

impl RewriteMatch {
    /// A match whose claims equal its tuple.
    pub fn new(vertices: Vec<VertexId>) -> Self {
        let claims = vertices.clone();
        Self {
            vertices,
            claims,
            split: 0,
        }
    }

    /// A match claiming more vertices than its tuple names.
    pub fn with_claims(vertices: Vec<VertexId>, claims: Vec<VertexId>) -> Self {
        Self {
            vertices,
            claims,
            split: 0,
        }
    }

    /// The smallest claimed id.
    pub fn min_id(&self) -> VertexId {
        self.claims.iter().copied().min().expect("non-empty match")
    }
}

/// A graph rewrite rule: a value bundling a matcher and a rewriter.
///
/// `find` returns a maximal set of non-overlapping matches in a
/// deterministic order; `apply` performs one rewrite through `ZxGraph`
/// edits, after which edge normalisation has already been re-applied by
/// the editing operations themselves.
pub trait RewriteRule: Send + Sync {
    /// Rule name, as reported in errors and statistics.
    fn name(&self) -> &'static str;

    /// Find a maximal non-overlapping match set.
    fn find(&self, graph: &ZxGraph) -> Vec<RewriteMatch>;

    /// Apply one match.
    fn apply(&self, graph: &mut ZxGraph, m: &RewriteMatch) -> SimpResult<()>;

    /// The quantity each application strictly decreases. The driver checks
    /// the decrease after every pass.
    fn monovariant(&self, graph: &ZxGraph) -> u64 {
        graph.num_vertices() as u64
    }
}

/// Resolve overlaps among candidate matches.
///
/// Candidates are ordered by their sorted claim set, lexicographically
/// (ties by lower minimum id are subsumed, the minimum being the first
/// element of the sorted set), then selected greedily so that no vertex is
/// claimed twice. The result is deterministic for a given graph and comes
/// out in ascending minimum-id order.
pub fn select_non_overlapping(candidates: Vec<RewriteMatch>) -> Vec<RewriteMatch> {
    let mut keyed: Vec<(Vec<VertexId>, RewriteMatch)> = candidates
        .into_iter()
        .map(|m| {
            let mut key = m.claims.clone();
            key.sort_unstable();
            (key, m)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut taken: FxHashSet<VertexId> = FxHashSet::default();
    let mut selected = Vec::new();
    for (key, m) in keyed {
        if key.iter().any(|v| taken.contains(v)) {
            continue;
        }
        taken.extend(key.iter().copied());
        selected.push(m);
    }
    selected
}
