//! Frontier-based circuit extraction from graph-like ZX-graphs.

use alsvin_qcir::{Gate, GateKind, QCir, QubitId};
use alsvin_types::CancelToken;
use alsvin_zx::{EdgeKind, VertexId, VertexKind, ZxGraph};
use rustc_hash::FxHashSet;
use tracing::{debug, instrument};

use crate::biadjacency::BiadjacencyMatrix;
use crate::error::{ExtractError, ExtractResult};

const DEFAULT_BLOCKSIZE: usize = 6;

/// Extracts a logical circuit from a graph-like ZX-graph.
///
/// Extraction proceeds right to left: gates are peeled off the output side
/// and collected in reverse, so the final gate list is the reversal of the
/// collection order. The frontier (one vertex per output wire) advances
/// toward the inputs through phase extraction, CZ extraction, gaussian
/// elimination of the frontier biadjacency (one CNOT per logged row XOR),
/// and Hadamard-wire advances; the residual boundary permutation is emitted
/// as SWAPs.
#[derive(Debug, Clone)]
pub struct Extractor {
    graph: ZxGraph,
    /// Frontier vertex per wire; `None` once the wire is a bare
    /// input-output connection.
    frontier: Vec<Option<VertexId>>,
    rev_gates: Vec<Gate>,
    blocksize: usize,
    cancel: CancelToken,
}

impl Extractor {
    /// Set up extraction of `graph`. The graph is copied; extraction
    /// consumes the copy.
    pub fn new(graph: &ZxGraph) -> ExtractResult<Self> {
        if graph.inputs().len() != graph.outputs().len() {
            return Err(ExtractError::QubitMismatch {
                inputs: graph.inputs().len(),
                outputs: graph.outputs().len(),
            });
        }
        if !graph.is_graph_like() {
            return Err(ExtractError::NotGraphLike(
                "spiders must be Z, internal wires Hadamard, boundaries Simple",
            ));
        }

        let mut frontier = Vec::with_capacity(graph.outputs().len());
        for &o in graph.outputs() {
            let (n, _) = graph
                .neighbors(o)
                .next()
                .ok_or(ExtractError::NotGraphLike("dangling output boundary"))?;
            frontier.push((graph.kind(n) == VertexKind::Z).then_some(n));
        }

        Ok(Self {
            graph: graph.clone(),
            frontier,
            rev_gates: Vec::new(),
            blocksize: DEFAULT_BLOCKSIZE,
            cancel: CancelToken::new(),
        })
    }

    /// Override the gaussian-elimination block size.
    #[must_use]
    pub fn with_blocksize(mut self, blocksize: usize) -> Self {
        self.blocksize = blocksize.max(1);
        self
    }

    /// Poll the given token during extraction.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn num_wires(&self) -> usize {
        self.frontier.len()
    }

    /// Collected-order emit; the list is reversed into circuit order at the
    /// end.
    fn emit(&mut self, gate: Gate) {
        self.rev_gates.push(gate);
    }

    fn input_neighbor(&self, v: VertexId) -> Option<VertexId> {
        self.graph
            .neighbor_ids(v)
            .find(|n| self.graph.inputs().contains(n))
    }

    /// Peel the phases of frontier spiders as phase gates.
    fn extract_phases(&mut self) -> ExtractResult<()> {
        for wire in 0..self.num_wires() {
            let Some(f) = self.frontier[wire] else {
                continue;
            };
            let phase = self.graph.phase(f);
            if !phase.is_zero() {
                self.emit(Gate::single(GateKind::P(phase), QubitId::from(wire)));
                self.graph.set_phase(f, alsvin_types::Phase::zero())?;
            }
        }
        Ok(())
    }

    /// Peel Hadamard edges between frontier vertices as CZ gates.
    fn extract_czs(&mut self) -> ExtractResult<()> {
        for w1 in 0..self.num_wires() {
            let Some(f1) = self.frontier[w1] else {
                continue;
            };
            for w2 in w1 + 1..self.num_wires() {
                let Some(f2) = self.frontier[w2] else {
                    continue;
                };
                if self.graph.has_edge(f1, f2, EdgeKind::Hadamard) {
                    self.graph.remove_edge(f1, f2, Some(EdgeKind::Hadamard))?;
                    self.emit(Gate::two(GateKind::Cz, QubitId::from(w1), QubitId::from(w2)));
                }
            }
        }
        Ok(())
    }

    /// The internal (non-boundary, non-frontier) neighbors of the frontier,
    /// ascending by id.
    fn internal_neighbors(&self) -> Vec<VertexId> {
        let in_frontier: FxHashSet<VertexId> = self.frontier.iter().flatten().copied().collect();
        let mut set = FxHashSet::default();
        for &f in self.frontier.iter().flatten() {
            for n in self.graph.neighbor_ids(f) {
                if !in_frontier.contains(&n) && self.graph.kind(n) != VertexKind::Boundary {
                    set.insert(n);
                }
            }
        }
        let mut neighbors: Vec<VertexId> = set.into_iter().collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// One round of gaussian elimination over the frontier biadjacency,
    /// emitting CNOTs, followed by Hadamard-wire advances. Returns the
    /// number of advanced wires.
    fn eliminate_and_advance(
        &mut self,
        neighbors: &[VertexId],
        blocksize: usize,
    ) -> ExtractResult<usize> {
        let wires: Vec<usize> = (0..self.num_wires())
            .filter(|&w| self.frontier[w].is_some())
            .collect();
        let mut matrix = BiadjacencyMatrix::new(wires.len(), neighbors.len());
        let mut pure = vec![false; wires.len()];
        for (r, &w) in wires.iter().enumerate() {
            let f = self.frontier[w].expect("filtered on Some");
            pure[r] = self.input_neighbor(f).is_none();
            for (c, &n) in neighbors.iter().enumerate() {
                matrix.set(r, c, self.graph.has_edge(f, n, EdgeKind::Hadamard));
            }
        }

        matrix.gaussian_elimination_restricted(blocksize, &pure);

        // Each logged XOR is a CNOT whose control sits on the modified
        // row's wire.
        for (src, tgt) in matrix.op_log() {
            self.emit(Gate::two(
                GateKind::Cx,
                QubitId::from(wires[tgt]),
                QubitId::from(wires[src]),
            ));
        }

        // Rewrite the frontier-to-neighbor edges to match the reduced
        // matrix.
        for (r, &w) in wires.iter().enumerate() {
            let f = self.frontier[w].expect("filtered on Some");
            for (c, &n) in neighbors.iter().enumerate() {
                let want = matrix.get(r, c);
                let have = self.graph.has_edge(f, n, EdgeKind::Hadamard);
                if want != have {
                    if want {
                        self.graph.insert_edge_raw(f, n, EdgeKind::Hadamard);
                    } else {
                        self.graph.remove_edge(f, n, Some(EdgeKind::Hadamard))?;
                    }
                }
            }
        }

        // Advance frontier vertices that now see exactly one internal
        // neighbor through a Hadamard wire.
        let mut advanced = 0;
        let mut taken: FxHashSet<VertexId> = FxHashSet::default();
        for (r, &w) in wires.iter().enumerate() {
            if !pure[r] {
                continue;
            }
            let Some(c) = matrix.row_single_one(r) else {
                continue;
            };
            let next = neighbors[c];
            if taken.contains(&next) {
                continue;
            }
            let f = self.frontier[w].expect("filtered on Some");
            if self.graph.degree(f) != 2 {
                // Residual frontier-frontier edges keep this wire busy; a
                // later round peels them as CZs.
                continue;
            }
            let output = self.graph.outputs()[w];
            self.graph.remove_vertex(f)?;
            self.graph.connect_normalized(next, output, EdgeKind::Simple);
            self.emit(Gate::single(GateKind::H, QubitId::from(w)));
            self.frontier[w] = Some(next);
            taken.insert(next);
            advanced += 1;
        }
        Ok(advanced)
    }

    /// The residual boundary permutation, emitted as SWAPs.
    fn extract_permutation(&mut self) -> ExtractResult<()> {
        let n = self.num_wires();
        let mut perm = vec![usize::MAX; n];
        for wire in 0..n {
            let source = match self.frontier[wire] {
                Some(f) => self.input_neighbor(f).ok_or(ExtractError::ExtractionStalled(
                    "frontier vertex lost its input connection",
                ))?,
                None => {
                    let o = self.graph.outputs()[wire];
                    let (n0, _) = self
                        .graph
                        .neighbors(o)
                        .next()
                        .ok_or(ExtractError::ExtractionStalled("dangling output wire"))?;
                    n0
                }
            };
            perm[wire] = self
                .graph
                .inputs()
                .iter()
                .position(|&i| i == source)
                .ok_or(ExtractError::ExtractionStalled(
                    "output wire does not reach an input",
                ))?;
        }

        // Realize the permutation with transpositions. The emitted list is
        // reversed together with everything else, which yields the correct
        // left-to-right order.
        for i in 0..n {
            if perm[i] == i {
                continue;
            }
            let j = (i + 1..n)
                .find(|&j| perm[j] == i)
                .expect("perm is a bijection");
            perm.swap(i, j);
            self.emit(Gate::two(GateKind::Swap, QubitId::from(i), QubitId::from(j)));
        }
        Ok(())
    }

    /// Run the extraction.
    #[instrument(skip(self))]
    pub fn run(mut self) -> ExtractResult<QCir> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(ExtractError::Interrupted);
            }
            self.extract_phases()?;
            self.extract_czs()?;

            let neighbors = self.internal_neighbors();
            if neighbors.is_empty() {
                break;
            }

            let advanced = self.eliminate_and_advance(&neighbors, self.blocksize)?;
            if advanced == 0 {
                // Repair attempt: plain Gauss-Jordan without blocking.
                let advanced = self.eliminate_and_advance(&neighbors, 1)?;
                if advanced == 0 {
                    return Err(ExtractError::ExtractionStalled(
                        "no CNOT schedule reduces the frontier",
                    ));
                }
            }
            debug!(
                remaining = self.graph.num_vertices(),
                emitted = self.rev_gates.len(),
                "extraction round complete"
            );
        }

        self.extract_permutation()?;

        let mut circuit = QCir::new(self.num_wires());
        for gate in self.rev_gates.into_iter().rev() {
            circuit.add_gate(gate)?;
        }
        Ok(circuit)
    }
}

/// Extract a circuit from a graph-like ZX-graph with default settings.
pub fn extract_circuit(graph: &ZxGraph) -> ExtractResult<QCir> {
    Extractor::new(graph)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_types::Phase;

    /// in -- z(α) -- out becomes a single phase gate.
    #[test]
    fn test_extract_single_phase_wire() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let z = g.add_spider(VertexKind::Z, Phase::new(1, 4), 0.0, 1.0);
        let o = g.add_output(0).unwrap();
        g.add_edge(i, z, EdgeKind::Simple).unwrap();
        g.add_edge(z, o, EdgeKind::Simple).unwrap();

        let cir = extract_circuit(&g).unwrap();
        assert_eq!(cir.num_gates(), 1);
        assert_eq!(cir.gate(0).kind, GateKind::P(Phase::new(1, 4)));
        assert_eq!(cir.gate(0).qubits, vec![QubitId(0)]);
    }

    /// Two output-adjacent spiders joined by a Hadamard edge: a CZ.
    #[test]
    fn test_extract_cz() {
        let mut g = ZxGraph::new();
        let i0 = g.add_input(0).unwrap();
        let i1 = g.add_input(1).unwrap();
        let a = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 1.0);
        let b = g.add_spider(VertexKind::Z, Phase::zero(), 1.0, 1.0);
        let o0 = g.add_output(0).unwrap();
        let o1 = g.add_output(1).unwrap();
        g.add_edge(i0, a, EdgeKind::Simple).unwrap();
        g.add_edge(i1, b, EdgeKind::Simple).unwrap();
        g.add_edge(a, o0, EdgeKind::Simple).unwrap();
        g.add_edge(b, o1, EdgeKind::Simple).unwrap();
        g.add_edge(a, b, EdgeKind::Hadamard).unwrap();

        let cir = extract_circuit(&g).unwrap();
        assert_eq!(cir.num_gates(), 1);
        assert_eq!(cir.gate(0).kind, GateKind::Cz);
        assert_eq!(cir.gate(0).qubits, vec![QubitId(0), QubitId(1)]);
    }

    /// Crossed bare wires are a SWAP (the tail of scenario S3).
    #[test]
    fn test_extract_crossed_wires_as_swap() {
        let mut g = ZxGraph::new();
        let i0 = g.add_input(0).unwrap();
        let i1 = g.add_input(1).unwrap();
        let o0 = g.add_output(0).unwrap();
        let o1 = g.add_output(1).unwrap();
        g.connect_normalized(i0, o1, EdgeKind::Simple);
        g.connect_normalized(i1, o0, EdgeKind::Simple);

        let cir = extract_circuit(&g).unwrap();
        assert_eq!(cir.num_gates(), 1);
        assert_eq!(cir.gate(0).kind, GateKind::Swap);
        assert_eq!(cir.gate(0).qubits, vec![QubitId(0), QubitId(1)]);
    }

    /// A dense frontier biadjacency forces several row XORs in a single
    /// elimination round: every logged XOR surfaces as one CNOT, then the
    /// Hadamard advances of the same round move every wire at once.
    #[test]
    fn test_dense_biadjacency_emits_cnot_block() {
        // Inputs feed v0..v2, outputs hang off w0..w2, and the Hadamard
        // edges form the invertible pattern
        //   w0: {v0, v1},  w1: {v1, v2},  w2: {v2},
        // whose reduction takes three XORs before any row reaches
        // weight one.
        let mut g = ZxGraph::new();
        let inputs: Vec<_> = (0..3).map(|q| g.add_input(q).unwrap()).collect();
        let vs: Vec<_> = (0..3)
            .map(|k| g.add_spider(VertexKind::Z, Phase::zero(), f64::from(k), 1.0))
            .collect();
        let ws: Vec<_> = (0..3)
            .map(|k| g.add_spider(VertexKind::Z, Phase::zero(), f64::from(k), 2.0))
            .collect();
        let outputs: Vec<_> = (0..3).map(|q| g.add_output(q).unwrap()).collect();
        for q in 0..3 {
            g.add_edge(inputs[q], vs[q], EdgeKind::Simple).unwrap();
            g.add_edge(ws[q], outputs[q], EdgeKind::Simple).unwrap();
        }
        for (j, k) in [(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)] {
            g.add_edge(ws[j], vs[k], EdgeKind::Hadamard).unwrap();
        }
        assert!(g.is_graph_like());

        let cir = extract_circuit(&g).unwrap();

        // One round: the CNOT block of the elimination, preceded (in
        // circuit order) by the Hadamard advances that follow it during
        // peeling.
        let kinds: Vec<(GateKind, Vec<QubitId>)> = cir
            .gates()
            .iter()
            .map(|gate| (gate.kind, gate.qubits.clone()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (GateKind::H, vec![QubitId(2)]),
                (GateKind::H, vec![QubitId(1)]),
                (GateKind::H, vec![QubitId(0)]),
                (GateKind::Cx, vec![QubitId(1), QubitId(2)]),
                (GateKind::Cx, vec![QubitId(0), QubitId(2)]),
                (GateKind::Cx, vec![QubitId(0), QubitId(1)]),
            ]
        );
    }

    #[test]
    fn test_qubit_mismatch_rejected() {
        let mut g = ZxGraph::new();
        g.add_input(0).unwrap();
        assert!(matches!(
            Extractor::new(&g),
            Err(ExtractError::QubitMismatch { inputs: 1, outputs: 0 })
        ));
    }

    #[test]
    fn test_not_graph_like_rejected() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let x = g.add_spider(VertexKind::X, Phase::zero(), 0.0, 1.0);
        let o = g.add_output(0).unwrap();
        g.add_edge(i, x, EdgeKind::Simple).unwrap();
        g.add_edge(x, o, EdgeKind::Simple).unwrap();
        assert!(matches!(
            Extractor::new(&g),
            Err(ExtractError::NotGraphLike(_))
        ));
    }

    #[test]
    fn test_cancellation() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let z = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 1.0);
        let o = g.add_output(0).unwrap();
        g.add_edge(i, z, EdgeKind::Simple).unwrap();
        g.add_edge(z, o, EdgeKind::Simple).unwrap();

        let token = CancelToken::new();
        token.cancel();
        let result = Extractor::new(&g).unwrap().with_cancel(token).run();
        assert!(matches!(result, Err(ExtractError::Interrupted)));
    }
}
