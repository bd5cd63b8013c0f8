//! Gate routing: executes one logical gate on the device, inserting SWAPs.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use alsvin_qcir::{Gate, GateKind, QubitId};
use alsvin_types::CancelToken;
use rustc_hash::FxHashMap;

use crate::config::{DuostraConfig, MinMaxOption, RouterKind};
use crate::device::{Device, Operation};
use crate::error::{DuostraError, DuostraResult};

/// Routes logical gates onto the device.
///
/// Single-qubit gates pass through to the bound physical qubit. A
/// two-qubit gate between non-adjacent qubits is preceded by a SWAP chain
/// along a route chosen either from the precomputed shortest-path tables
/// or by a bidirectional search weighted by occupied times (Duostra).
#[derive(Debug, Clone)]
pub struct Router {
    device: Device,
    kind: RouterKind,
    tie_breaker: MinMaxOption,
    available_time: MinMaxOption,
    cancel: CancelToken,
}

impl Router {
    /// Create a router over the (placed) device.
    pub fn new(device: Device, config: &DuostraConfig) -> Self {
        Self {
            device,
            kind: config.router,
            tie_breaker: config.tie_breaker,
            available_time: config.available_time,
            cancel: CancelToken::new(),
        }
    }

    /// Poll the given token at every search step.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The device state.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Consume the router, returning the device.
    pub fn into_device(self) -> Device {
        self.device
    }

    fn physical(&self, logical: QubitId) -> DuostraResult<usize> {
        self.device
            .physical_by_logical(logical)
            .ok_or(DuostraError::UnplacedQubit(logical.0))
    }

    /// True when the gate can execute without SWAPs.
    pub fn is_executable(&self, gate: &Gate) -> bool {
        let (q0, q1) = gate.target_pair();
        match q1 {
            None => true,
            Some(q1) => match (
                self.device.physical_by_logical(q0),
                self.device.physical_by_logical(q1),
            ) {
                (Some(p0), Some(p1)) => self.device.is_adjacent(p0, p1),
                _ => false,
            },
        }
    }

    /// Heuristic routing cost of a gate: the policy-combined availability
    /// of its operands plus the SWAP distance discounted by
    /// `apsp_coefficient`.
    pub fn gate_cost(&self, gate: &Gate, apsp_coefficient: u64) -> DuostraResult<u64> {
        let (q0, q1) = gate.target_pair();
        let p0 = self.physical(q0)?;
        let Some(q1) = q1 else {
            return Ok(self.device.qubit(p0).occupied_time());
        };
        let p1 = self.physical(q1)?;
        let (t0, t1) = (
            self.device.qubit(p0).occupied_time(),
            self.device.qubit(p1).occupied_time(),
        );
        let available = match self.available_time {
            MinMaxOption::Min => t0.min(t1),
            MinMaxOption::Max => t0.max(t1),
        };
        let hops = self.device.distance(p0, p1).ok_or(DuostraError::RoutingFailed { p0, p1 })?;
        let swap_cost = hops.saturating_sub(1) * self.device.delays().swap;
        Ok(available + swap_cost / apsp_coefficient.max(1))
    }

    fn emit(&mut self, kind: GateKind, p0: usize, p1: Option<usize>) -> Operation {
        let begin = match p1 {
            Some(p1) => self
                .device
                .qubit(p0)
                .occupied_time()
                .max(self.device.qubit(p1).occupied_time()),
            None => self.device.qubit(p0).occupied_time(),
        };
        let op = Operation {
            time_end: begin + self.device.delay_of(&kind),
            kind,
            qubits: (p0, p1),
            time_begin: begin,
        };
        self.device.apply_gate(&op);
        op
    }

    /// The logical-id key used to break cost ties between two candidate
    /// SWAP sides.
    fn tie_key(&self, p: usize) -> u64 {
        let id = self
            .device
            .qubit(p)
            .logical()
            .map_or(u64::MAX, |l| u64::from(l.0));
        match self.tie_breaker {
            MinMaxOption::Min => id,
            MinMaxOption::Max => u64::MAX - id,
        }
    }

    fn combine_times(&self, a: u64, b: u64) -> u64 {
        match self.available_time {
            MinMaxOption::Min => a.min(b),
            MinMaxOption::Max => a.max(b),
        }
    }

    /// Route one logical gate, returning the emitted operations in order.
    pub fn assign_gate(&mut self, gate: &Gate) -> DuostraResult<Vec<Operation>> {
        let (q0, q1) = gate.target_pair();
        let p0 = self.physical(q0)?;
        let Some(q1) = q1 else {
            return Ok(vec![self.emit(gate.kind, p0, None)]);
        };
        let p1 = self.physical(q1)?;

        match self.kind {
            RouterKind::ShortestPath => self.route_shortest_path(gate.kind, p0, p1),
            RouterKind::Duostra => self.route_duostra(gate.kind, p0, p1),
        }
    }

    /// Walk the predecessor tables, emitting each SWAP from whichever side
    /// is currently cheaper.
    fn route_shortest_path(
        &mut self,
        kind: GateKind,
        mut p0: usize,
        mut p1: usize,
    ) -> DuostraResult<Vec<Operation>> {
        let mut ops = Vec::new();
        while !self.device.is_adjacent(p0, p1) {
            let path = self
                .device
                .path(p0, p1)
                .ok_or(DuostraError::RoutingFailed { p0, p1 })?;
            let next0 = path[1];
            let next1 = path[path.len() - 2];

            let cost0 = self
                .device
                .qubit(p0)
                .occupied_time()
                .max(self.device.qubit(next0).occupied_time());
            let cost1 = self
                .device
                .qubit(p1)
                .occupied_time()
                .max(self.device.qubit(next1).occupied_time());

            let from_first = match cost0.cmp(&cost1) {
                std::cmp::Ordering::Less => true,
                std::cmp::Ordering::Greater => false,
                std::cmp::Ordering::Equal => self.tie_key(p0) <= self.tie_key(p1),
            };
            if from_first {
                ops.push(self.emit(GateKind::Swap, p0, Some(next0)));
                p0 = next0;
            } else {
                ops.push(self.emit(GateKind::Swap, p1, Some(next1)));
                p1 = next1;
            }
        }
        ops.push(self.emit(kind, p0, Some(p1)));
        Ok(ops)
    }

    /// Bidirectional best-first search from both endpoints; frontier
    /// expansion cost is the policy-combination of the neighbor's occupied
    /// time and the incumbent cost, plus the SWAP delay.
    fn route_duostra(
        &mut self,
        kind: GateKind,
        p0: usize,
        p1: usize,
    ) -> DuostraResult<Vec<Operation>> {
        if self.device.is_adjacent(p0, p1) {
            return Ok(vec![self.emit(kind, p0, Some(p1))]);
        }

        // side: false grows from p0, true from p1.
        let mut side: FxHashMap<usize, bool> = FxHashMap::default();
        let mut pred: FxHashMap<usize, usize> = FxHashMap::default();
        let mut heap: BinaryHeap<Reverse<(u64, u64, usize, bool)>> = BinaryHeap::new();

        side.insert(p0, false);
        side.insert(p1, true);
        heap.push(Reverse((
            self.device.qubit(p0).occupied_time(),
            self.tie_key(p0),
            p0,
            false,
        )));
        heap.push(Reverse((
            self.device.qubit(p1).occupied_time(),
            self.tie_key(p1),
            p1,
            true,
        )));

        let meet = loop {
            if self.cancel.is_cancelled() {
                return Err(DuostraError::Interrupted);
            }
            let Some(Reverse((cost, _, current, source))) = heap.pop() else {
                return Err(DuostraError::RoutingFailed { p0, p1 });
            };
            let mut found = None;
            for &adj in self.device.qubit(current).adjacencies() {
                match side.get(&adj) {
                    Some(&other) if other != source => {
                        found = Some((current, adj));
                        break;
                    }
                    Some(_) => {}
                    None => {
                        side.insert(adj, source);
                        pred.insert(adj, current);
                        let adj_cost = self
                            .combine_times(self.device.qubit(adj).occupied_time(), cost)
                            + self.device.delays().swap;
                        heap.push(Reverse((adj_cost, self.tie_key(adj), adj, source)));
                    }
                }
            }
            if let Some(edge) = found {
                break edge;
            }
        };

        // Reconstruct both half-paths from the meeting edge.
        let (mut left_end, mut right_end) = meet;
        if side[&left_end] {
            std::mem::swap(&mut left_end, &mut right_end);
        }
        let chain = |mut v: usize, pred: &FxHashMap<usize, usize>| {
            let mut path = vec![v];
            while let Some(&prev) = pred.get(&v) {
                path.push(prev);
                v = prev;
            }
            // root-first order
            path.reverse();
            path
        };
        let left = chain(left_end, &pred); // p0 .. left_end
        let right = chain(right_end, &pred); // p1 .. right_end

        let mut ops = Vec::new();
        for pair in left.windows(2) {
            ops.push(self.emit(GateKind::Swap, pair[0], Some(pair[1])));
        }
        for pair in right.windows(2) {
            ops.push(self.emit(GateKind::Swap, pair[0], Some(pair[1])));
        }
        ops.push(self.emit(kind, left_end, Some(right_end)));
        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_qcir::Gate;

    fn placed_router(kind: RouterKind, n: usize) -> Router {
        let mut device = Device::linear(n);
        let assignment: Vec<usize> = (0..n).collect();
        device.place(&assignment).unwrap();
        let config = DuostraConfig {
            router: kind,
            ..DuostraConfig::default()
        };
        Router::new(device, &config)
    }

    #[test]
    fn test_single_qubit_passthrough() {
        let mut router = placed_router(RouterKind::Duostra, 2);
        let ops = router
            .assign_gate(&Gate::single(GateKind::H, QubitId(1)))
            .unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].qubits, (1, None));
        assert_eq!(ops[0].time_begin, 0);
        assert_eq!(ops[0].time_end, 1);
    }

    #[test]
    fn test_adjacent_gate_needs_no_swap() {
        for kind in [RouterKind::ShortestPath, RouterKind::Duostra] {
            let mut router = placed_router(kind, 3);
            let ops = router
                .assign_gate(&Gate::two(GateKind::Cx, QubitId(0), QubitId(1)))
                .unwrap();
            assert_eq!(ops.len(), 1);
            assert_eq!(ops[0].kind, GateKind::Cx);
            assert_eq!(ops[0].qubits, (0, Some(1)));
        }
    }

    #[test]
    fn test_distant_gate_inserts_swaps() {
        for kind in [RouterKind::ShortestPath, RouterKind::Duostra] {
            let mut router = placed_router(kind, 4);
            let ops = router
                .assign_gate(&Gate::two(GateKind::Cx, QubitId(0), QubitId(3)))
                .unwrap();
            let swaps = ops.iter().filter(|op| op.is_swap()).count();
            assert_eq!(swaps, 2, "router {kind:?}");
            assert_eq!(ops.last().unwrap().kind, GateKind::Cx);

            // The final CX acts on adjacent physical qubits.
            let (a, b) = ops.last().unwrap().qubits;
            assert!(router.device().is_adjacent(a, b.unwrap()));
        }
    }

    #[test]
    fn test_occupied_times_are_monotone_per_qubit() {
        let mut router = placed_router(RouterKind::Duostra, 4);
        let mut all = Vec::new();
        all.extend(
            router
                .assign_gate(&Gate::two(GateKind::Cx, QubitId(0), QubitId(3)))
                .unwrap(),
        );
        all.extend(
            router
                .assign_gate(&Gate::two(GateKind::Cx, QubitId(0), QubitId(3)))
                .unwrap(),
        );

        let mut last_end: FxHashMap<usize, u64> = FxHashMap::default();
        for op in &all {
            let (p0, p1) = op.qubits;
            for p in std::iter::once(p0).chain(p1) {
                if let Some(&end) = last_end.get(&p) {
                    assert!(op.time_begin >= end, "overlap on qubit {p}");
                }
                last_end.insert(p, op.time_end);
            }
        }
    }

    #[test]
    fn test_bindings_track_swaps() {
        let mut router = placed_router(RouterKind::ShortestPath, 3);
        router
            .assign_gate(&Gate::two(GateKind::Cz, QubitId(0), QubitId(2)))
            .unwrap();
        // After one SWAP the pair is adjacent; both logicals still bound.
        for q in [QubitId(0), QubitId(2)] {
            assert!(router.device().physical_by_logical(q).is_some());
        }
    }
}
