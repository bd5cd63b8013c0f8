//! Rule-level properties: non-overlap and monovariant decrease on random
//! graphs.

use alsvin_simp::{RewriteRule, all_rules};
use alsvin_types::Phase;
use alsvin_zx::{EdgeKind, VertexId, VertexKind, ZxGraph};
use proptest::prelude::*;
use rustc_hash::FxHashSet;

/// Random spider soup: a mix of Z/X spiders with assorted phases and
/// random Simple/Hadamard edges, plus a few boundaries.
fn arbitrary_graph() -> impl Strategy<Value = ZxGraph> {
    let vertex = (0u8..4, -4i64..4, 1i64..5);
    (
        proptest::collection::vec(vertex, 1..12),
        proptest::collection::vec((any::<u8>(), any::<u8>(), any::<bool>()), 0..30),
    )
        .prop_map(|(vertices, edges)| {
            let mut graph = ZxGraph::new();
            let i = graph.add_input(0).unwrap();
            let o = graph.add_output(0).unwrap();
            let mut ids = vec![i, o];
            for (k, n, d) in vertices {
                let kind = match k {
                    0 | 1 => VertexKind::Z,
                    2 => VertexKind::X,
                    _ => VertexKind::HBox,
                };
                let phase = if kind == VertexKind::HBox {
                    Phase::pi()
                } else {
                    Phase::new(n, d)
                };
                ids.push(graph.add_spider(kind, phase, 0.0, 0.0));
            }
            for (a, b, hadamard) in edges {
                let u = ids[a as usize % ids.len()];
                let v = ids[b as usize % ids.len()];
                let kind = if hadamard {
                    EdgeKind::Hadamard
                } else {
                    EdgeKind::Simple
                };
                let _ = graph.add_edge(u, v, kind);
            }
            graph
        })
}

proptest! {
    /// For every rule, `find` returns claim sets that are pairwise
    /// disjoint, in ascending minimum-id order.
    #[test]
    fn prop_matches_are_disjoint_and_ordered(graph in arbitrary_graph()) {
        for rule in all_rules() {
            let matches = rule.find(&graph);
            let mut seen: FxHashSet<VertexId> = FxHashSet::default();
            let mut last_min: Option<VertexId> = None;
            for m in &matches {
                for &v in &m.claims {
                    prop_assert!(seen.insert(v), "rule {} claims {v} twice", rule.name());
                }
                let min = m.min_id();
                if let Some(prev) = last_min {
                    prop_assert!(prev < min, "rule {} out of order", rule.name());
                }
                last_min = Some(min);
            }
        }
    }

    /// Applying a full match set strictly decreases the rule's
    /// monovariant.
    #[test]
    fn prop_rewrites_decrease_monovariant(graph in arbitrary_graph()) {
        for rule in all_rules() {
            let matches = rule.find(&graph);
            if matches.is_empty() {
                continue;
            }
            let mut staged = graph.clone();
            let before = rule.monovariant(&staged);
            for m in &matches {
                rule.apply(&mut staged, m).unwrap();
            }
            prop_assert!(
                rule.monovariant(&staged) < before,
                "rule {} did not decrease its monovariant",
                rule.name()
            );
            prop_assert!(staged.check_consistency(), "rule {} broke adjacency", rule.name());
        }
    }
}
