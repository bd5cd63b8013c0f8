//! Dependency tracking over the logical circuit being mapped.

use alsvin_qcir::{Gate, QCir};

/// The scheduler's view of the logical circuit: gate dependencies plus the
/// currently available (all-predecessors-done) gate set.
#[derive(Debug, Clone)]
pub struct CircuitTopology {
    gates: Vec<Gate>,
    successors: Vec<Vec<usize>>,
    pending_predecessors: Vec<usize>,
    available: Vec<usize>,
    executed: usize,
    num_qubits: usize,
}

impl CircuitTopology {
    /// Build the topology of a circuit.
    pub fn new(circuit: &QCir) -> Self {
        let n = circuit.num_gates();
        let mut successors = Vec::with_capacity(n);
        let mut pending = Vec::with_capacity(n);
        for i in 0..n {
            successors.push(circuit.successors(i));
            pending.push(circuit.predecessors(i).len());
        }
        let available: Vec<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
        Self {
            gates: circuit.gates().to_vec(),
            successors,
            pending_predecessors: pending,
            available,
            executed: 0,
            num_qubits: circuit.num_qubits(),
        }
    }

    /// Logical qubit count.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Total gate count.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// The gate with the given id.
    pub fn gate(&self, id: usize) -> &Gate {
        &self.gates[id]
    }

    /// Gates whose predecessors have all executed, ascending by id.
    pub fn available_gates(&self) -> &[usize] {
        &self.available
    }

    /// Number of gates executed so far.
    pub fn num_executed(&self) -> usize {
        self.executed
    }

    /// True once every gate has executed.
    pub fn is_done(&self) -> bool {
        self.executed == self.gates.len()
    }

    /// Mark a gate executed and release its successors.
    ///
    /// # Panics
    ///
    /// Panics if the gate is not currently available.
    pub fn mark_executed(&mut self, id: usize) {
        let position = self
            .available
            .iter()
            .position(|&g| g == id)
            .expect("gate must be available to execute");
        self.available.remove(position);
        self.executed += 1;
        for &succ in &self.successors[id] {
            self.pending_predecessors[succ] -= 1;
            if self.pending_predecessors[succ] == 0 {
                let insert_at = self.available.partition_point(|&g| g < succ);
                self.available.insert(insert_at, succ);
            }
        }
    }
}
