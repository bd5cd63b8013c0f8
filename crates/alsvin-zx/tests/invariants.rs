//! Structural invariants under random editing sequences.

use alsvin_types::Phase;
use alsvin_zx::{EdgeKind, VertexId, VertexKind, ZxGraph};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    AddSpider(u8, i64, i64),
    AddEdge(u8, u8, bool),
    RemoveEdge(u8, u8),
    RemoveVertex(u8),
    ToggleEdge(u8, u8),
    ToggleColor(u8),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0u8..3, -4i64..4, 1i64..4).prop_map(|(k, n, d)| Edit::AddSpider(k, n, d)),
        (any::<u8>(), any::<u8>(), any::<bool>()).prop_map(|(a, b, h)| Edit::AddEdge(a, b, h)),
        (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Edit::RemoveEdge(a, b)),
        any::<u8>().prop_map(Edit::RemoveVertex),
        (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Edit::ToggleEdge(a, b)),
        any::<u8>().prop_map(Edit::ToggleColor),
    ]
}

fn pick(graph: &ZxGraph, raw: u8) -> Option<VertexId> {
    let ids: Vec<VertexId> = graph.vertex_ids().collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids[raw as usize % ids.len()])
    }
}

fn apply(graph: &mut ZxGraph, edit: &Edit) {
    match *edit {
        Edit::AddSpider(k, n, d) => {
            let kind = match k {
                0 => VertexKind::Z,
                1 => VertexKind::X,
                _ => VertexKind::HBox,
            };
            graph.add_spider(kind, Phase::new(n, d), 0.0, 0.0);
        }
        Edit::AddEdge(a, b, hadamard) => {
            if let (Some(u), Some(v)) = (pick(graph, a), pick(graph, b)) {
                let kind = if hadamard {
                    EdgeKind::Hadamard
                } else {
                    EdgeKind::Simple
                };
                let _ = graph.add_edge(u, v, kind);
            }
        }
        Edit::RemoveEdge(a, b) => {
            if let (Some(u), Some(v)) = (pick(graph, a), pick(graph, b)) {
                let _ = graph.remove_edge(u, v, None);
            }
        }
        Edit::RemoveVertex(a) => {
            if let Some(v) = pick(graph, a) {
                let _ = graph.remove_vertex(v);
            }
        }
        Edit::ToggleEdge(a, b) => {
            if let (Some(u), Some(v)) = (pick(graph, a), pick(graph, b)) {
                if u != v {
                    let _ = graph.toggle_edge(u, v);
                }
            }
        }
        Edit::ToggleColor(a) => {
            if let Some(v) = pick(graph, a) {
                let _ = graph.toggle_color(v);
            }
        }
    }
}

proptest! {
    /// Adjacency stays symmetric and boundary lists sane under arbitrary
    /// edit sequences.
    #[test]
    fn prop_editing_preserves_consistency(edits in proptest::collection::vec(edit_strategy(), 0..60)) {
        let mut graph = ZxGraph::new();
        graph.add_input(0).unwrap();
        graph.add_output(0).unwrap();
        for edit in &edits {
            apply(&mut graph, edit);
            prop_assert!(graph.check_consistency());
        }
    }

    /// A boundary never exceeds degree one and keeps Simple-only incident
    /// edges through the public editor.
    #[test]
    fn prop_boundary_degree_bound(edits in proptest::collection::vec(edit_strategy(), 0..60)) {
        let mut graph = ZxGraph::new();
        let i = graph.add_input(0).unwrap();
        let o = graph.add_output(0).unwrap();
        for edit in &edits {
            apply(&mut graph, edit);
            for b in [i, o] {
                if graph.contains(b) {
                    prop_assert!(graph.degree(b) <= 1);
                    for (_, kind) in graph.neighbors(b) {
                        prop_assert_eq!(kind, EdgeKind::Simple);
                    }
                }
            }
        }
    }

    /// Re-running normalisation on an editor-produced graph changes
    /// nothing, twice over.
    #[test]
    fn prop_normalize_idempotent(edits in proptest::collection::vec(edit_strategy(), 0..40)) {
        let mut graph = ZxGraph::new();
        for edit in &edits {
            apply(&mut graph, edit);
        }
        prop_assert!(!graph.normalize());
        let snapshot = graph.clone();
        graph.normalize();
        prop_assert_eq!(snapshot, graph);
    }

    /// The adjoint is an involution.
    #[test]
    fn prop_adjoint_involution(edits in proptest::collection::vec(edit_strategy(), 0..40)) {
        let mut graph = ZxGraph::new();
        graph.add_input(0).unwrap();
        graph.add_output(0).unwrap();
        for edit in &edits {
            apply(&mut graph, edit);
        }
        let original = graph.clone();
        graph.adjoint();
        graph.adjoint();
        prop_assert_eq!(original, graph);
    }
}
