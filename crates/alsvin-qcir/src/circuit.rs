//! The logical circuit container and its dependency DAG.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};

use alsvin_types::Phase;

use crate::error::{QcirError, QcirResult};
use crate::gate::{Gate, GateKind, QubitId};

/// A logical quantum circuit.
///
/// Gates are stored in append order, which is always a valid topological
/// order. A petgraph DAG tracks per-wire dependencies: gate `g` has an edge
/// from the previous gate touching each of its wires, so routing and
/// scheduling can ask for a gate's predecessors in O(degree).
#[derive(Debug, Clone, Default)]
pub struct QCir {
    num_qubits: usize,
    gates: Vec<Gate>,
    dag: DiGraph<usize, QubitId>,
    nodes: Vec<NodeIndex>,
    wire_front: FxHashMap<QubitId, NodeIndex>,
}

impl QCir {
    /// Create an empty circuit over `num_qubits` wires.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            ..Self::default()
        }
    }

    /// Circuit width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of gates.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// The gates in topological (append) order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// The gate at `index`.
    pub fn gate(&self, index: usize) -> &Gate {
        &self.gates[index]
    }

    /// Append a gate after validating its operands.
    pub fn add_gate(&mut self, gate: Gate) -> QcirResult<usize> {
        let expected = gate.kind.num_qubits();
        if gate.qubits.len() != expected {
            return Err(QcirError::QubitCountMismatch {
                gate: gate.kind.name(),
                expected,
                got: gate.qubits.len(),
            });
        }
        let mut seen = FxHashSet::default();
        for &q in &gate.qubits {
            if q.index() >= self.num_qubits {
                return Err(QcirError::QubitOutOfRange {
                    qubit: q,
                    width: self.num_qubits,
                });
            }
            if !seen.insert(q) {
                return Err(QcirError::DuplicateQubit(q));
            }
        }

        let index = self.gates.len();
        let node = self.dag.add_node(index);
        for &q in &gate.qubits {
            if let Some(&prev) = self.wire_front.get(&q) {
                self.dag.add_edge(prev, node, q);
            }
            self.wire_front.insert(q, node);
        }
        self.nodes.push(node);
        self.gates.push(gate);
        Ok(index)
    }

    /// Indices of the gates that must execute before gate `index`,
    /// ascending and deduplicated.
    pub fn predecessors(&self, index: usize) -> Vec<usize> {
        let mut preds: Vec<usize> = self
            .dag
            .neighbors_directed(self.nodes[index], Direction::Incoming)
            .map(|n| self.dag[n])
            .collect();
        preds.sort_unstable();
        preds.dedup();
        preds
    }

    /// Indices of the gates that depend directly on gate `index`.
    pub fn successors(&self, index: usize) -> Vec<usize> {
        let mut succs: Vec<usize> = self
            .dag
            .neighbors_directed(self.nodes[index], Direction::Outgoing)
            .map(|n| self.dag[n])
            .collect();
        succs.sort_unstable();
        succs.dedup();
        succs
    }

    /// Longest dependency chain length.
    pub fn depth(&self) -> usize {
        let mut depth = vec![0usize; self.gates.len()];
        let mut max = 0;
        for i in 0..self.gates.len() {
            let d = self
                .predecessors(i)
                .into_iter()
                .map(|p| depth[p])
                .max()
                .unwrap_or(0)
                + 1;
            depth[i] = d;
            max = max.max(d);
        }
        max
    }

    /// Number of single-qubit gates.
    pub fn num_single_qubit_gates(&self) -> usize {
        self.gates.iter().filter(|g| !g.is_two_qubit()).count()
    }

    /// Number of two-qubit gates.
    pub fn num_two_qubit_gates(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    /// The inverse circuit: gates reversed, each replaced by its adjoint.
    pub fn adjoint(&self) -> QCir {
        let mut out = QCir::new(self.num_qubits);
        for gate in self.gates.iter().rev() {
            out.add_gate(Gate {
                kind: gate.kind.adjoint(),
                qubits: gate.qubits.clone(),
            })
            .expect("adjoint of a valid gate is valid");
        }
        out
    }

    // Builder helpers, arity-checked like the underlying `add_gate`.

    /// Append a Hadamard.
    pub fn h(&mut self, q: QubitId) -> QcirResult<usize> {
        self.add_gate(Gate::single(GateKind::H, q))
    }

    /// Append a Pauli-X.
    pub fn x(&mut self, q: QubitId) -> QcirResult<usize> {
        self.add_gate(Gate::single(GateKind::X, q))
    }

    /// Append a Pauli-Z.
    pub fn z(&mut self, q: QubitId) -> QcirResult<usize> {
        self.add_gate(Gate::single(GateKind::Z, q))
    }

    /// Append an S gate.
    pub fn s(&mut self, q: QubitId) -> QcirResult<usize> {
        self.add_gate(Gate::single(GateKind::S, q))
    }

    /// Append a T gate.
    pub fn t(&mut self, q: QubitId) -> QcirResult<usize> {
        self.add_gate(Gate::single(GateKind::T, q))
    }

    /// Append an Rz rotation.
    pub fn rz(&mut self, phase: Phase, q: QubitId) -> QcirResult<usize> {
        self.add_gate(Gate::single(GateKind::Rz(phase), q))
    }

    /// Append a phase gate.
    pub fn p(&mut self, phase: Phase, q: QubitId) -> QcirResult<usize> {
        self.add_gate(Gate::single(GateKind::P(phase), q))
    }

    /// Append a CNOT with control `c` and target `t`.
    pub fn cx(&mut self, c: QubitId, t: QubitId) -> QcirResult<usize> {
        self.add_gate(Gate::two(GateKind::Cx, c, t))
    }

    /// Append a CZ.
    pub fn cz(&mut self, a: QubitId, b: QubitId) -> QcirResult<usize> {
        self.add_gate(Gate::two(GateKind::Cz, a, b))
    }

    /// Append a SWAP.
    pub fn swap(&mut self, a: QubitId, b: QubitId) -> QcirResult<usize> {
        self.add_gate(Gate::two(GateKind::Swap, a, b))
    }
}
