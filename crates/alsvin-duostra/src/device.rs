//! The physical device model: coupling graph, clocks, and bindings.

use alsvin_qcir::{GateKind, QubitId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{DuostraError, DuostraResult};

/// Per-qubit or per-edge calibration data from the device description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Gate duration annotation.
    pub time: f64,
    /// Gate error annotation.
    pub error: f64,
}

/// Gate delays, in device clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDelays {
    /// Single-qubit gate duration.
    pub single: u64,
    /// CX/CZ duration.
    pub double: u64,
    /// SWAP duration.
    pub swap: u64,
}

impl Default for GateDelays {
    fn default() -> Self {
        Self {
            single: 1,
            double: 2,
            swap: 6,
        }
    }
}

/// One gate emitted by the router, on physical qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// What the gate does.
    pub kind: GateKind,
    /// The physical qubits it acts on.
    pub qubits: (usize, Option<usize>),
    /// Start tick.
    pub time_begin: u64,
    /// End tick.
    pub time_end: u64,
}

impl Operation {
    /// Duration in ticks.
    pub fn duration(&self) -> u64 {
        self.time_end - self.time_begin
    }

    /// True for SWAPs.
    pub fn is_swap(&self) -> bool {
        self.kind == GateKind::Swap
    }
}

/// A physical qubit: its couplings, clock, and logical binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalQubit {
    adjacencies: Vec<usize>,
    occupied_time: u64,
    logical: Option<QubitId>,
}

impl PhysicalQubit {
    /// Neighboring physical qubit ids, ascending.
    pub fn adjacencies(&self) -> &[usize] {
        &self.adjacencies
    }

    /// The earliest tick at which the qubit is free.
    pub fn occupied_time(&self) -> u64 {
        self.occupied_time
    }

    /// The logical qubit bound here, if any.
    pub fn logical(&self) -> Option<QubitId> {
        self.logical
    }
}

/// The device coupling graph.
///
/// Shortest-path `distance` and `predecessor` matrices are computed once
/// via Floyd–Warshall when the device is built and stay valid for its
/// lifetime. `logical` bindings always form an injective map from logical
/// ids into physical ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    name: String,
    qubits: Vec<PhysicalQubit>,
    gate_set: Vec<String>,
    qubit_info: Vec<DeviceInfo>,
    /// Per-coupling calibration, keyed by the ordered qubit pair. Skipped
    /// in serialization together with the derived path tables; reload the
    /// device description to restore them.
    #[serde(skip)]
    edge_info: FxHashMap<(usize, usize), DeviceInfo>,
    delays: GateDelays,
    /// `distance[i][j]`: hops from i to j, `u64::MAX` if unreachable.
    #[serde(skip)]
    distance: Vec<Vec<u64>>,
    /// `predecessor[i][j]`: the vertex before j on the path i → j.
    #[serde(skip)]
    predecessor: Vec<Vec<Option<usize>>>,
}

impl Device {
    /// A device of `num_qubits` with no couplings yet.
    pub fn new(name: impl Into<String>, num_qubits: usize) -> Self {
        Self {
            name: name.into(),
            qubits: vec![PhysicalQubit::default(); num_qubits],
            qubit_info: vec![DeviceInfo::default(); num_qubits],
            ..Self::default()
        }
    }

    /// A device with the given couplings, paths precomputed.
    pub fn with_edges(
        name: impl Into<String>,
        num_qubits: usize,
        edges: &[(usize, usize)],
    ) -> Self {
        let mut device = Self::new(name, num_qubits);
        for &(a, b) in edges {
            device.add_edge(a, b);
        }
        device.compute_paths();
        device
    }

    /// A linear chain 0-1-2-…-(n-1).
    pub fn linear(num_qubits: usize) -> Self {
        let edges: Vec<(usize, usize)> = (1..num_qubits).map(|i| (i - 1, i)).collect();
        Self::with_edges("linear", num_qubits, &edges)
    }

    /// Device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// The physical gate-set names declared by the device description.
    pub fn gate_set(&self) -> &[String] {
        &self.gate_set
    }

    pub(crate) fn set_gate_set(&mut self, gates: Vec<String>) {
        self.gate_set = gates;
    }

    /// The configured gate delays.
    pub fn delays(&self) -> GateDelays {
        self.delays
    }

    /// Override the gate delays.
    pub fn set_delays(&mut self, delays: GateDelays) {
        self.delays = delays;
    }

    /// One physical qubit.
    pub fn qubit(&self, p: usize) -> &PhysicalQubit {
        &self.qubits[p]
    }

    /// Calibration data of one physical qubit.
    pub fn qubit_info(&self, p: usize) -> DeviceInfo {
        self.qubit_info[p]
    }

    /// Calibration data of one coupling.
    pub fn edge_info(&self, a: usize, b: usize) -> Option<DeviceInfo> {
        self.edge_info.get(&ordered(a, b)).copied()
    }

    pub(crate) fn set_qubit_info(&mut self, p: usize, info: DeviceInfo) {
        self.qubit_info[p] = info;
    }

    pub(crate) fn set_edge_info(&mut self, a: usize, b: usize, info: DeviceInfo) {
        self.edge_info.insert(ordered(a, b), info);
    }

    /// Add an undirected coupling. Duplicates are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize) {
        if a == b || self.qubits[a].adjacencies.contains(&b) {
            return;
        }
        self.qubits[a].adjacencies.push(b);
        self.qubits[a].adjacencies.sort_unstable();
        self.qubits[b].adjacencies.push(a);
        self.qubits[b].adjacencies.sort_unstable();
    }

    /// True when two physical qubits are directly coupled.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.qubits[a].adjacencies.contains(&b)
    }

    /// Recompute the all-pairs shortest-path tables (Floyd–Warshall).
    pub fn compute_paths(&mut self) {
        let n = self.num_qubits();
        let mut dist = vec![vec![u64::MAX; n]; n];
        let mut pred: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];

        for i in 0..n {
            dist[i][i] = 0;
            for &j in &self.qubits[i].adjacencies {
                dist[i][j] = 1;
                pred[i][j] = Some(i);
            }
        }
        for k in 0..n {
            for i in 0..n {
                if dist[i][k] == u64::MAX {
                    continue;
                }
                for j in 0..n {
                    if dist[k][j] == u64::MAX {
                        continue;
                    }
                    let through = dist[i][k] + dist[k][j];
                    if through < dist[i][j] {
                        dist[i][j] = through;
                        pred[i][j] = pred[k][j];
                    }
                }
            }
        }
        self.distance = dist;
        self.predecessor = pred;
    }

    /// Precomputed hop distance between two physical qubits.
    pub fn distance(&self, a: usize, b: usize) -> Option<u64> {
        let d = *self.distance.get(a)?.get(b)?;
        (d != u64::MAX).then_some(d)
    }

    /// The shortest path from `a` to `b`, inclusive of both endpoints.
    pub fn path(&self, a: usize, b: usize) -> Option<Vec<usize>> {
        if a == b {
            return Some(vec![a]);
        }
        self.distance(a, b)?;
        let mut path = vec![b];
        let mut current = b;
        while current != a {
            current = self.predecessor[a][current]?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    /// Bind logical qubit `i` to physical qubit `assignment[i]`.
    pub fn place(&mut self, assignment: &[usize]) -> DuostraResult<()> {
        if assignment.len() > self.num_qubits() {
            return Err(DuostraError::ArityMismatch {
                logical: assignment.len(),
                physical: self.num_qubits(),
            });
        }
        let mut seen = vec![false; self.num_qubits()];
        for &p in assignment {
            if p >= self.num_qubits() {
                return Err(DuostraError::InvalidPlacement(
                    "physical qubit out of range",
                ));
            }
            if seen[p] {
                return Err(DuostraError::InvalidPlacement(
                    "physical qubit assigned twice",
                ));
            }
            seen[p] = true;
        }
        for qubit in &mut self.qubits {
            qubit.logical = None;
        }
        for (logical, &p) in assignment.iter().enumerate() {
            self.qubits[p].logical = Some(QubitId::from(logical));
        }
        Ok(())
    }

    /// The physical qubit bound to a logical qubit.
    pub fn physical_by_logical(&self, logical: QubitId) -> Option<usize> {
        self.qubits.iter().position(|q| q.logical == Some(logical))
    }

    /// The physical → logical binding vector.
    pub fn mapping(&self) -> Vec<Option<QubitId>> {
        self.qubits.iter().map(|q| q.logical).collect()
    }

    /// The duration of an operation kind on this device.
    pub fn delay_of(&self, kind: &GateKind) -> u64 {
        match kind {
            GateKind::Swap => self.delays.swap,
            k if k.is_two_qubit() => self.delays.double,
            _ => self.delays.single,
        }
    }

    /// Advance the occupied clocks per the operation; a SWAP also swaps
    /// the logical bindings of its qubits.
    pub fn apply_gate(&mut self, op: &Operation) {
        let (p0, p1) = op.qubits;
        self.qubits[p0].occupied_time = op.time_end;
        if let Some(p1) = p1 {
            self.qubits[p1].occupied_time = op.time_end;
            if op.is_swap() {
                let l0 = self.qubits[p0].logical;
                self.qubits[p0].logical = self.qubits[p1].logical;
                self.qubits[p1].logical = l0;
            }
        }
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}
