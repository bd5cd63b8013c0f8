//! The ZX-graph arena and its editing operations.

use alsvin_types::Phase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ZxError, ZxResult};
use crate::vertex::{EdgeKind, EdgeSet, Vertex, VertexId, VertexKind};

/// An open ZX-multigraph.
///
/// Vertices live in an arena keyed by [`VertexId`]; adjacency lists store
/// ids, never references, so clones and moves are trivial and traversals
/// are free of ownership cycles. Ids are handed out by a monotone counter
/// and never reused within one graph.
///
/// Structural guarantees held by every public editing operation on return:
///
/// - adjacency is symmetric: `(u, v, k)` is present iff `(v, u, k)` is;
/// - at most one edge of each kind exists per vertex pair (the
///   normalisation table collapses the rest);
/// - a boundary vertex has at most one incident edge, and that edge is
///   Simple (a Hadamard connection is detoured through a phase-0 Z-spider);
/// - ids in `inputs`/`outputs` refer to boundary vertices, with no two
///   inputs (or two outputs) sharing a qubit index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZxGraph {
    vertices: Vec<Option<Vertex>>,
    adjacency: Vec<BTreeMap<VertexId, EdgeSet>>,
    inputs: Vec<VertexId>,
    outputs: Vec<VertexId>,
    num_vertices: usize,
    num_edges: usize,
}

impl ZxGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Number of live vertices.
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Number of edges, counting a Simple and a Hadamard edge between the
    /// same pair as two.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Input boundary ids, in qubit-declaration order.
    pub fn inputs(&self) -> &[VertexId] {
        &self.inputs
    }

    /// Output boundary ids, in qubit-declaration order.
    pub fn outputs(&self) -> &[VertexId] {
        &self.outputs
    }

    /// True if `v` names a live vertex.
    pub fn contains(&self, v: VertexId) -> bool {
        self.vertices
            .get(v.index())
            .is_some_and(|slot| slot.is_some())
    }

    /// Attribute record of a vertex.
    pub fn vertex(&self, v: VertexId) -> Option<&Vertex> {
        self.vertices.get(v.index()).and_then(|slot| slot.as_ref())
    }

    /// Mutable attribute record of a vertex.
    pub fn vertex_mut(&mut self, v: VertexId) -> Option<&mut Vertex> {
        self.vertices
            .get_mut(v.index())
            .and_then(|slot| slot.as_mut())
    }

    /// The kind of a live vertex.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a live vertex.
    pub fn kind(&self, v: VertexId) -> VertexKind {
        self.vertex(v).expect("live vertex").kind
    }

    /// The phase of a live vertex.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a live vertex.
    pub fn phase(&self, v: VertexId) -> Phase {
        self.vertex(v).expect("live vertex").phase
    }

    /// Overwrite the phase of `v`.
    pub fn set_phase(&mut self, v: VertexId, phase: Phase) -> ZxResult<()> {
        self.vertex_mut(v)
            .map(|vert| vert.phase = phase)
            .ok_or(ZxError::VertexNotFound(v))
    }

    /// Add `delta` to the phase of `v`.
    pub fn add_phase(&mut self, v: VertexId, delta: Phase) -> ZxResult<()> {
        self.vertex_mut(v)
            .map(|vert| vert.phase += delta)
            .ok_or(ZxError::VertexNotFound(v))
    }

    /// Live vertices in insertion (id) order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (VertexId(i as u32), v)))
    }

    /// Ids of live vertices in insertion order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices().map(|(id, _)| id)
    }

    /// Neighbors of `v` with edge kinds, ascending by neighbor id, a pair
    /// with both kinds yielding Simple before Hadamard.
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = (VertexId, EdgeKind)> + '_ {
        self.adjacency
            .get(v.index())
            .into_iter()
            .flatten()
            .flat_map(|(&n, set)| set.kinds().map(move |k| (n, k)))
    }

    /// Distinct neighbor ids of `v`, ascending.
    pub fn neighbor_ids(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency
            .get(v.index())
            .into_iter()
            .flatten()
            .map(|(&n, _)| n)
    }

    /// The edges between `u` and `v`.
    pub fn edge_set(&self, u: VertexId, v: VertexId) -> EdgeSet {
        self.adjacency
            .get(u.index())
            .and_then(|m| m.get(&v))
            .copied()
            .unwrap_or_default()
    }

    /// True if an edge of `kind` connects `u` and `v`.
    pub fn has_edge(&self, u: VertexId, v: VertexId, kind: EdgeKind) -> bool {
        self.edge_set(u, v).contains(kind)
    }

    /// Degree of `v`, counting parallel Simple/Hadamard pairs as two.
    pub fn degree(&self, v: VertexId) -> usize {
        self.adjacency
            .get(v.index())
            .map(|m| m.values().map(EdgeSet::len).sum())
            .unwrap_or(0)
    }

    /// All edges as `(u, v, kind)` triples with `u < v`, ascending.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, EdgeKind)> + '_ {
        self.vertices().flat_map(move |(u, _)| {
            self.adjacency[u.index()]
                .iter()
                .filter(move |&(&n, _)| u < n)
                .flat_map(move |(&n, set)| set.kinds().map(move |k| (u, n, k)))
        })
    }

    /// Number of spiders carrying a non-Clifford phase.
    pub fn t_count(&self) -> usize {
        self.vertices()
            .filter(|(_, v)| v.is_spider() && !v.phase.is_clifford())
            .count()
    }

    // ------------------------------------------------------------------
    // Vertex creation and removal
    // ------------------------------------------------------------------

    fn alloc(&mut self, vertex: Vertex) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Some(vertex));
        self.adjacency.push(BTreeMap::new());
        self.num_vertices += 1;
        id
    }

    /// Add a Z-spider, X-spider, or H-box.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is [`VertexKind::Boundary`]; boundaries are created
    /// through [`add_input`](Self::add_input) / [`add_output`](Self::add_output).
    pub fn add_spider(&mut self, kind: VertexKind, phase: Phase, row: f64, col: f64) -> VertexId {
        assert!(
            kind != VertexKind::Boundary,
            "boundaries are created via add_input/add_output"
        );
        let mut v = Vertex::new(kind, -1, row, col);
        v.phase = phase;
        self.alloc(v)
    }

    /// Add an input boundary for `qubit` and append it to the input list.
    pub fn add_input(&mut self, qubit: i32) -> ZxResult<VertexId> {
        if self.inputs.iter().any(|&b| self.vertices[b.index()].as_ref().is_some_and(|v| v.qubit == qubit)) {
            return Err(ZxError::DuplicateQubitIndex {
                qubit,
                is_input: true,
            });
        }
        let id = self.alloc(Vertex::new(VertexKind::Boundary, qubit, f64::from(qubit), 0.0));
        self.inputs.push(id);
        Ok(id)
    }

    /// Add an output boundary for `qubit` and append it to the output list.
    pub fn add_output(&mut self, qubit: i32) -> ZxResult<VertexId> {
        if self.outputs.iter().any(|&b| self.vertices[b.index()].as_ref().is_some_and(|v| v.qubit == qubit)) {
            return Err(ZxError::DuplicateQubitIndex {
                qubit,
                is_input: false,
            });
        }
        let id = self.alloc(Vertex::new(VertexKind::Boundary, qubit, f64::from(qubit), 1.0));
        self.outputs.push(id);
        Ok(id)
    }

    /// Delete `v` with all incident edges; drop it from the boundary lists
    /// if present.
    pub fn remove_vertex(&mut self, v: VertexId) -> ZxResult<()> {
        if !self.contains(v) {
            return Err(ZxError::VertexNotFound(v));
        }
        let neighbors: Vec<(VertexId, usize)> = self.adjacency[v.index()]
            .iter()
            .map(|(&n, set)| (n, set.len()))
            .collect();
        for (n, count) in neighbors {
            if n != v {
                self.adjacency[n.index()].remove(&v);
            }
            self.num_edges -= count;
        }
        self.adjacency[v.index()].clear();
        self.vertices[v.index()] = None;
        self.num_vertices -= 1;
        self.inputs.retain(|&b| b != v);
        self.outputs.retain(|&b| b != v);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Edge editing
    // ------------------------------------------------------------------

    /// Insert an edge into both adjacency maps, saturating at one per kind,
    /// bypassing the normalisation table. Returns true if the edge was new.
    ///
    /// For callers (converters, rewrite engines) that restore the graph's
    /// invariants themselves; everything else goes through
    /// [`add_edge`](Self::add_edge).
    pub fn insert_edge_raw(&mut self, u: VertexId, v: VertexId, kind: EdgeKind) -> bool {
        debug_assert!(u != v, "self-loops are resolved before storage");
        let inserted = self.adjacency[u.index()].entry(v).or_default().insert(kind);
        if inserted {
            self.adjacency[v.index()].entry(u).or_default().insert(kind);
            self.num_edges += 1;
        }
        inserted
    }

    fn remove_edge_raw(&mut self, u: VertexId, v: VertexId, kind: EdgeKind) -> bool {
        let Some(set) = self.adjacency[u.index()].get_mut(&v) else {
            return false;
        };
        if !set.remove(kind) {
            return false;
        }
        if set.is_empty() {
            self.adjacency[u.index()].remove(&v);
        }
        let other = self.adjacency[v.index()].get_mut(&u).expect("symmetric adjacency");
        other.remove(kind);
        if other.is_empty() {
            self.adjacency[v.index()].remove(&u);
        }
        self.num_edges -= 1;
        true
    }

    /// Add an edge, applying the normalisation table.
    ///
    /// - a Simple self-loop disappears; a Hadamard self-loop on a spider
    ///   adds π to its phase;
    /// - a second edge of the same kind between two spiders annihilates
    ///   the existing one (Hopf);
    /// - a Hadamard edge touching a boundary is replaced by a detour
    ///   through a fresh phase-0 Z-spider;
    /// - a direct edge between two boundaries is a client error.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId, kind: EdgeKind) -> ZxResult<()> {
        let ku = self.vertex(u).ok_or(ZxError::VertexNotFound(u))?.kind;
        let kv = self.vertex(v).ok_or(ZxError::VertexNotFound(v))?.kind;

        if ku == VertexKind::Boundary && kv == VertexKind::Boundary {
            return Err(ZxError::InvalidEdge(u, v, "direct boundary-boundary edge"));
        }
        for (b, k) in [(u, ku), (v, kv)] {
            if k == VertexKind::Boundary && self.degree(b) >= 1 {
                return Err(ZxError::InvalidEdge(u, v, "boundary already connected"));
            }
        }
        self.connect_normalized(u, v, kind);
        Ok(())
    }

    /// The normalisation engine behind [`add_edge`](Self::add_edge), also
    /// used by `compose`, the parser, and the rewrite engine, where wires
    /// between two boundaries are legitimate.
    pub fn connect_normalized(&mut self, u: VertexId, v: VertexId, kind: EdgeKind) {
        if u == v {
            if kind == EdgeKind::Hadamard && self.vertex(u).is_some_and(Vertex::is_spider) {
                let _ = self.add_phase(u, Phase::pi());
            }
            return;
        }

        let ku = self.kind(u);
        let kv = self.kind(v);

        if kind == EdgeKind::Hadamard && (ku == VertexKind::Boundary || kv == VertexKind::Boundary)
        {
            // Detour: boundary --Simple-- Z(0) --Hadamard-- other.
            let (boundary, other) = if ku == VertexKind::Boundary { (u, v) } else { (v, u) };
            let (row, col) = self.midpoint(boundary, other);
            let z = self.add_spider(VertexKind::Z, Phase::zero(), row, col);
            self.insert_edge_raw(boundary, z, EdgeKind::Simple);
            self.connect_normalized(z, other, EdgeKind::Hadamard);
            return;
        }

        if self.edge_set(u, v).contains(kind) && ku.is_spider() && kv.is_spider() {
            self.remove_edge_raw(u, v, kind);
            return;
        }
        self.insert_edge_raw(u, v, kind);
    }

    fn midpoint(&self, u: VertexId, v: VertexId) -> (f64, f64) {
        let a = self.vertex(u).expect("live vertex");
        let b = self.vertex(v).expect("live vertex");
        ((a.row + b.row) / 2.0, (a.col + b.col) / 2.0)
    }

    /// Remove one matching edge, or every edge between the pair when `kind`
    /// is `None`.
    pub fn remove_edge(&mut self, u: VertexId, v: VertexId, kind: Option<EdgeKind>) -> ZxResult<()> {
        if !self.contains(u) {
            return Err(ZxError::VertexNotFound(u));
        }
        if !self.contains(v) {
            return Err(ZxError::VertexNotFound(v));
        }
        match kind {
            Some(k) => {
                self.remove_edge_raw(u, v, k);
            }
            None => {
                for k in [EdgeKind::Simple, EdgeKind::Hadamard] {
                    self.remove_edge_raw(u, v, k);
                }
            }
        }
        Ok(())
    }

    /// Flip every edge between `u` and `v` between Simple and Hadamard,
    /// re-applying normalisation.
    pub fn toggle_edge(&mut self, u: VertexId, v: VertexId) -> ZxResult<()> {
        if !self.contains(u) {
            return Err(ZxError::VertexNotFound(u));
        }
        if !self.contains(v) {
            return Err(ZxError::VertexNotFound(v));
        }
        let set = self.edge_set(u, v);
        for k in set.kinds() {
            self.remove_edge_raw(u, v, k);
        }
        for k in set.kinds() {
            self.connect_normalized(u, v, k.toggled());
        }
        Ok(())
    }

    /// Toggle a Hadamard edge between `u` and `v`: remove it if present,
    /// insert it otherwise. The workhorse of pivoting and local
    /// complementation.
    pub fn toggle_hadamard_edge(&mut self, u: VertexId, v: VertexId) {
        if !self.remove_edge_raw(u, v, EdgeKind::Hadamard) {
            self.connect_normalized(u, v, EdgeKind::Hadamard);
        }
    }

    /// Swap the colour of a spider (Z ↔ X) and toggle the kind of every
    /// incident edge, preserving the represented map. Hadamard edges landing
    /// on boundaries are detoured per the normalisation table.
    pub fn toggle_color(&mut self, v: VertexId) -> ZxResult<()> {
        let kind = self.vertex(v).ok_or(ZxError::VertexNotFound(v))?.kind;
        if !kind.is_spider() {
            return Ok(());
        }
        let incident: Vec<(VertexId, EdgeKind)> = self.neighbors(v).collect();
        for &(n, k) in &incident {
            self.remove_edge_raw(v, n, k);
        }
        self.vertex_mut(v).expect("live vertex").kind = kind.toggled();
        for (n, k) in incident {
            self.connect_normalized(v, n, k.toggled());
        }
        Ok(())
    }

    /// Re-apply the normalisation table across the whole graph. Editing
    /// operations normalise incrementally, so this is a no-op unless raw
    /// edges were spliced in; it is idempotent.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        loop {
            let bad = self.vertices().find_map(|(id, v)| {
                if v.kind != VertexKind::Boundary {
                    return None;
                }
                self.neighbors(id)
                    .find(|&(_, k)| k == EdgeKind::Hadamard)
                    .map(|(n, _)| (id, n))
            });
            let Some((b, n)) = bad else {
                return changed;
            };
            self.remove_edge_raw(b, n, EdgeKind::Hadamard);
            self.connect_normalized(b, n, EdgeKind::Hadamard);
            changed = true;
        }
    }

    // ------------------------------------------------------------------
    // Whole-graph operations
    // ------------------------------------------------------------------

    /// Import every live vertex and edge of `other`, returning the id
    /// translation table (indexed by old id).
    fn import(&mut self, other: &ZxGraph) -> Vec<VertexId> {
        let mut map = vec![VertexId(u32::MAX); other.vertices.len()];
        for (id, v) in other.vertices() {
            map[id.index()] = self.alloc(v.clone());
        }
        for (u, v, k) in other.edges() {
            self.insert_edge_raw(map[u.index()], map[v.index()], k);
        }
        map
    }

    /// Plug `other.inputs[i]` onto `self.outputs[i]` for each `i`, splicing
    /// the wires; `self.outputs` becomes `other.outputs`.
    pub fn compose(&mut self, other: &ZxGraph) -> ZxResult<()> {
        if self.outputs.len() != other.inputs.len() {
            return Err(ZxError::ArityMismatch {
                outputs: self.outputs.len(),
                inputs: other.inputs.len(),
            });
        }
        let translated = self.import(other);
        let old_outputs = std::mem::take(&mut self.outputs);

        for (i, &o) in old_outputs.iter().enumerate() {
            let inp = translated[other.inputs[i].index()];
            let (a, k1) = self
                .neighbors(o)
                .next()
                .expect("output boundary is connected");
            let (b, k2) = self
                .neighbors(inp)
                .next()
                .expect("input boundary is connected");
            self.remove_vertex(o)?;
            self.remove_vertex(inp)?;
            self.connect_normalized(a, b, k1.combined(k2));
        }
        self.outputs = other
            .outputs
            .iter()
            .map(|&o| translated[o.index()])
            .collect();
        Ok(())
    }

    /// Disjoint union: append `other`'s inputs and outputs after this
    /// graph's.
    pub fn tensor(&mut self, other: &ZxGraph) {
        let translated = self.import(other);
        self.inputs
            .extend(other.inputs.iter().map(|&i| translated[i.index()]));
        self.outputs
            .extend(other.outputs.iter().map(|&o| translated[o.index()]));
    }

    /// Reverse the roles of inputs and outputs and negate every phase.
    pub fn adjoint(&mut self) {
        std::mem::swap(&mut self.inputs, &mut self.outputs);
        for slot in self.vertices.iter_mut().flatten() {
            slot.phase = -slot.phase;
        }
    }

    /// The canonical extraction precondition: all non-boundary vertices are
    /// Z-spiders, every internal edge is Hadamard, each boundary hangs off
    /// exactly one Z-spider by a Simple edge (or, for a fully simplified
    /// wire, the opposite boundary directly), and no Z-spider touches more
    /// than one input or more than one output.
    pub fn is_graph_like(&self) -> bool {
        for (id, v) in self.vertices() {
            match v.kind {
                VertexKind::X | VertexKind::HBox => return false,
                VertexKind::Boundary => {
                    let mut edges = self.neighbors(id);
                    let Some((n, k)) = edges.next() else {
                        return false;
                    };
                    if edges.next().is_some()
                        || k != EdgeKind::Simple
                        || !matches!(self.kind(n), VertexKind::Z | VertexKind::Boundary)
                    {
                        return false;
                    }
                }
                VertexKind::Z => {
                    let mut input_count = 0;
                    let mut output_count = 0;
                    for (n, k) in self.neighbors(id) {
                        if self.kind(n) == VertexKind::Boundary {
                            if self.inputs.contains(&n) {
                                input_count += 1;
                            } else {
                                output_count += 1;
                            }
                        } else if k != EdgeKind::Hadamard {
                            return false;
                        }
                    }
                    if input_count > 1 || output_count > 1 {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Internal consistency check used by tests: adjacency symmetry and
    /// boundary-list sanity.
    pub fn check_consistency(&self) -> bool {
        for (u, _) in self.vertices() {
            for (&n, set) in &self.adjacency[u.index()] {
                if !self.contains(n) {
                    return false;
                }
                if self.edge_set(n, u) != *set {
                    return false;
                }
            }
        }
        self.inputs
            .iter()
            .chain(&self.outputs)
            .all(|&b| self.vertex(b).is_some_and(Vertex::is_boundary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_spiders(kind: VertexKind) -> (ZxGraph, VertexId, VertexId) {
        let mut g = ZxGraph::new();
        let a = g.add_spider(kind, Phase::zero(), 0.0, 0.0);
        let b = g.add_spider(kind, Phase::zero(), 0.0, 1.0);
        (g, a, b)
    }

    #[test]
    fn test_double_simple_edge_annihilates() {
        let (mut g, a, b) = two_spiders(VertexKind::Z);
        g.add_edge(a, b, EdgeKind::Simple).unwrap();
        assert_eq!(g.num_edges(), 1);
        g.add_edge(a, b, EdgeKind::Simple).unwrap();
        assert_eq!(g.num_edges(), 0);
        assert!(g.check_consistency());
    }

    #[test]
    fn test_double_hadamard_edge_annihilates() {
        let (mut g, a, b) = two_spiders(VertexKind::Z);
        g.add_edge(a, b, EdgeKind::Hadamard).unwrap();
        g.add_edge(a, b, EdgeKind::Hadamard).unwrap();
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn test_mixed_kinds_coexist() {
        let (mut g, a, b) = two_spiders(VertexKind::Z);
        g.add_edge(a, b, EdgeKind::Simple).unwrap();
        g.add_edge(a, b, EdgeKind::Hadamard).unwrap();
        assert_eq!(g.num_edges(), 2);
        assert!(g.has_edge(a, b, EdgeKind::Simple));
        assert!(g.has_edge(a, b, EdgeKind::Hadamard));
    }

    #[test]
    fn test_hadamard_self_loop_adds_pi() {
        let (mut g, a, _) = two_spiders(VertexKind::Z);
        g.connect_normalized(a, a, EdgeKind::Hadamard);
        assert_eq!(g.phase(a), Phase::pi());
        assert_eq!(g.num_edges(), 0);
        g.connect_normalized(a, a, EdgeKind::Simple);
        assert_eq!(g.phase(a), Phase::pi());
    }

    #[test]
    fn test_boundary_hadamard_is_detoured() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let s = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 2.0);
        g.add_edge(i, s, EdgeKind::Hadamard).unwrap();

        // i --Simple-- z --Hadamard-- s
        let (z, k) = g.neighbors(i).next().unwrap();
        assert_eq!(k, EdgeKind::Simple);
        assert_eq!(g.kind(z), VertexKind::Z);
        assert!(g.phase(z).is_zero());
        assert!(g.has_edge(z, s, EdgeKind::Hadamard));
        assert_eq!(g.num_edges(), 2);
    }

    #[test]
    fn test_boundary_boundary_edge_rejected() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let o = g.add_output(0).unwrap();
        assert!(matches!(
            g.add_edge(i, o, EdgeKind::Simple),
            Err(ZxError::InvalidEdge(..))
        ));
    }

    #[test]
    fn test_duplicate_qubit_index_rejected() {
        let mut g = ZxGraph::new();
        g.add_input(0).unwrap();
        assert!(matches!(
            g.add_input(0),
            Err(ZxError::DuplicateQubitIndex { qubit: 0, is_input: true })
        ));
        g.add_output(0).unwrap();
        g.add_input(1).unwrap();
    }

    #[test]
    fn test_remove_vertex_cleans_adjacency() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let s = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 1.0);
        let t = g.add_spider(VertexKind::X, Phase::zero(), 0.0, 2.0);
        g.add_edge(i, s, EdgeKind::Simple).unwrap();
        g.add_edge(s, t, EdgeKind::Simple).unwrap();
        g.add_edge(s, t, EdgeKind::Hadamard).unwrap();

        g.remove_vertex(s).unwrap();
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.degree(i), 0);
        assert_eq!(g.degree(t), 0);
        assert!(!g.contains(s));
        assert!(g.check_consistency());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut g = ZxGraph::new();
        let a = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 0.0);
        g.remove_vertex(a).unwrap();
        let b = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 0.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_toggle_edge() {
        let (mut g, a, b) = two_spiders(VertexKind::Z);
        g.add_edge(a, b, EdgeKind::Simple).unwrap();
        g.toggle_edge(a, b).unwrap();
        assert!(g.has_edge(a, b, EdgeKind::Hadamard));
        assert!(!g.has_edge(a, b, EdgeKind::Simple));
        g.toggle_edge(a, b).unwrap();
        assert!(g.has_edge(a, b, EdgeKind::Simple));
    }

    #[test]
    fn test_toggle_color() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let x = g.add_spider(VertexKind::X, Phase::new(1, 4), 0.0, 1.0);
        let z = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 2.0);
        g.add_edge(i, x, EdgeKind::Simple).unwrap();
        g.add_edge(x, z, EdgeKind::Simple).unwrap();

        g.toggle_color(x).unwrap();
        assert_eq!(g.kind(x), VertexKind::Z);
        assert!(g.has_edge(x, z, EdgeKind::Hadamard));
        // The boundary wire became Hadamard and must have been detoured.
        let (buf, k) = g.neighbors(i).next().unwrap();
        assert_eq!(k, EdgeKind::Simple);
        assert_eq!(g.kind(buf), VertexKind::Z);
        assert!(g.has_edge(buf, x, EdgeKind::Hadamard));
        assert!(g.check_consistency());
    }

    #[test]
    fn test_compose_identity_wires() {
        // first: in -- z(1/4) -- out; second: in -- z(1/4) -- out
        let mut first = ZxGraph::new();
        let i = first.add_input(0).unwrap();
        let s = first.add_spider(VertexKind::Z, Phase::new(1, 4), 0.0, 1.0);
        let o = first.add_output(0).unwrap();
        first.add_edge(i, s, EdgeKind::Simple).unwrap();
        first.add_edge(s, o, EdgeKind::Simple).unwrap();

        let second = first.clone();
        first.compose(&second).unwrap();

        assert_eq!(first.inputs().len(), 1);
        assert_eq!(first.outputs().len(), 1);
        // Two phase spiders joined by a simple wire.
        let spiders: Vec<_> = first
            .vertices()
            .filter(|(_, v)| v.is_spider())
            .map(|(id, _)| id)
            .collect();
        assert_eq!(spiders.len(), 2);
        assert!(first.has_edge(spiders[0], spiders[1], EdgeKind::Simple));
        assert!(first.check_consistency());
    }

    #[test]
    fn test_compose_arity_mismatch() {
        let mut first = ZxGraph::new();
        first.add_output(0).unwrap();
        let mut second = ZxGraph::new();
        second.add_input(0).unwrap();
        second.add_input(1).unwrap();
        assert!(matches!(
            first.compose(&second),
            Err(ZxError::ArityMismatch { outputs: 1, inputs: 2 })
        ));
    }

    #[test]
    fn test_tensor_appends_boundaries() {
        let mut first = ZxGraph::new();
        let i0 = first.add_input(0).unwrap();
        let o0 = first.add_output(0).unwrap();
        let z = first.add_spider(VertexKind::Z, Phase::zero(), 0.0, 1.0);
        first.add_edge(i0, z, EdgeKind::Simple).unwrap();
        first.add_edge(z, o0, EdgeKind::Simple).unwrap();

        let second = first.clone();
        first.tensor(&second);
        assert_eq!(first.inputs().len(), 2);
        assert_eq!(first.outputs().len(), 2);
        assert_eq!(first.num_vertices(), 6);
        assert_eq!(first.num_edges(), 4);
        assert!(first.check_consistency());
    }

    #[test]
    fn test_adjoint_involution() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let s = g.add_spider(VertexKind::Z, Phase::new(1, 4), 0.0, 1.0);
        let o = g.add_output(0).unwrap();
        g.add_edge(i, s, EdgeKind::Simple).unwrap();
        g.add_edge(s, o, EdgeKind::Simple).unwrap();

        let original = g.clone();
        g.adjoint();
        assert_eq!(g.inputs(), original.outputs());
        assert_eq!(g.phase(s), Phase::new(-1, 4));
        g.adjoint();
        assert_eq!(g, original);
    }

    #[test]
    fn test_graph_like_predicate() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let a = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 1.0);
        let b = g.add_spider(VertexKind::Z, Phase::new(1, 2), 0.0, 2.0);
        let o = g.add_output(0).unwrap();
        g.add_edge(i, a, EdgeKind::Simple).unwrap();
        g.add_edge(a, b, EdgeKind::Hadamard).unwrap();
        g.add_edge(b, o, EdgeKind::Simple).unwrap();
        assert!(g.is_graph_like());

        // An internal Simple edge breaks the property.
        let c = g.add_spider(VertexKind::Z, Phase::zero(), 1.0, 1.0);
        g.add_edge(a, c, EdgeKind::Simple).unwrap();
        assert!(!g.is_graph_like());
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let s = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 1.0);
        // Splice a raw Hadamard wire onto the boundary.
        g.insert_edge_raw(i, s, EdgeKind::Hadamard);

        assert!(g.normalize());
        let after_once = g.clone();
        assert!(!g.normalize());
        assert_eq!(g, after_once);
        assert!(g.check_consistency());
    }
}
