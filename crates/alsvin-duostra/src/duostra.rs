//! The end-to-end mapping flow: place, schedule, route, verify, rebuild.

use alsvin_qcir::{Gate, QCir, QubitId};
use alsvin_types::CancelToken;
use tracing::{info, instrument};

use crate::checker::check_mapping;
use crate::config::DuostraConfig;
use crate::device::{Device, Operation};
use crate::error::{DuostraError, DuostraResult};
use crate::placer::Placer;
use crate::router::Router;
use crate::scheduler::{ScheduleResult, Scheduler};
use crate::topology::CircuitTopology;

/// The outcome of mapping a circuit onto a device.
#[derive(Debug, Clone)]
pub struct MappingResult {
    /// Emitted physical operations, ascending by start time.
    pub operations: Vec<Operation>,
    /// Logical gate ids in assignment order.
    pub order: Vec<usize>,
    /// The initial logical-to-physical assignment.
    pub initial_assignment: Vec<usize>,
    /// The physical circuit, with SWAPs decomposed into three CXs.
    pub physical_circuit: QCir,
    /// The device state after routing.
    pub device: Device,
}

impl MappingResult {
    /// The mapping depth: the final operation's end time.
    pub fn final_cost(&self) -> u64 {
        self.operations.iter().map(|op| op.time_end).max().unwrap_or(0)
    }

    /// The summed durations of all operations.
    pub fn total_time(&self) -> u64 {
        self.operations.iter().map(Operation::duration).sum()
    }

    /// Number of SWAPs inserted.
    pub fn num_swaps(&self) -> usize {
        self.operations.iter().filter(|op| op.is_swap()).count()
    }
}

/// The Duostra mapper: an explicit configuration plus a cancellation
/// token, applied to one circuit/device pair at a time.
#[derive(Debug, Clone, Default)]
pub struct Duostra {
    config: DuostraConfig,
    cancel: CancelToken,
}

impl Duostra {
    /// Create a mapper with the given configuration.
    pub fn new(config: DuostraConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Poll the given token throughout the mapping.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Map `circuit` onto `device`: compute an initial placement, schedule
    /// and route every gate, optionally verify, and build the physical
    /// circuit.
    #[instrument(skip(self, circuit, device))]
    pub fn map(&self, circuit: &QCir, mut device: Device) -> DuostraResult<MappingResult> {
        if circuit.num_qubits() > device.num_qubits() {
            return Err(DuostraError::ArityMismatch {
                logical: circuit.num_qubits(),
                physical: device.num_qubits(),
            });
        }
        let pristine_device = device.clone();

        info!(placer = %self.config.placer, "computing initial placement");
        let placer = Placer::new(self.config.placer, self.config.seed);
        let assignment = placer.place_and_assign(&mut device, circuit.num_qubits())?;

        let topology = CircuitTopology::new(circuit);
        let router = Router::new(device, &self.config).with_cancel(self.cancel.clone());
        let schedule = Scheduler::new(self.config.clone())
            .with_cancel(self.cancel.clone())
            .schedule(topology, router)?;

        if self.config.verify_result {
            check_mapping(circuit, &schedule.operations, &assignment, &pristine_device)?;
        }

        let result = build_result(schedule, assignment, pristine_device.num_qubits())?;
        info!(
            depth = result.final_cost(),
            swaps = result.num_swaps(),
            "mapping finished"
        );
        Ok(result)
    }
}

fn build_result(
    schedule: ScheduleResult,
    initial_assignment: Vec<usize>,
    num_physical: usize,
) -> DuostraResult<MappingResult> {
    let mut physical_circuit = QCir::new(num_physical);
    for op in &schedule.operations {
        let q0 = QubitId::from(op.qubits.0);
        match op.qubits.1 {
            None => {
                physical_circuit.add_gate(Gate::single(op.kind, q0))?;
            }
            Some(p1) => {
                let q1 = QubitId::from(p1);
                if op.is_swap() {
                    // SWAP is not a native gate; decompose into three CXs.
                    physical_circuit.cx(q0, q1)?;
                    physical_circuit.cx(q1, q0)?;
                    physical_circuit.cx(q0, q1)?;
                } else {
                    physical_circuit.add_gate(Gate::two(op.kind, q0, q1))?;
                }
            }
        }
    }
    Ok(MappingResult {
        operations: schedule.operations,
        order: schedule.order,
        initial_assignment,
        physical_circuit,
        device: schedule.device,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlacerKind, SchedulerKind};
    use alsvin_qcir::GateKind;

    #[test]
    fn test_map_simple_circuit() {
        let mut cir = QCir::new(2);
        cir.h(QubitId(0)).unwrap();
        cir.cx(QubitId(0), QubitId(1)).unwrap();

        let config = DuostraConfig {
            placer: PlacerKind::Naive,
            ..DuostraConfig::default()
        }
        .with_verification();
        let result = Duostra::new(config).map(&cir, Device::linear(2)).unwrap();

        assert_eq!(result.operations.len(), 2);
        assert_eq!(result.num_swaps(), 0);
        assert_eq!(result.physical_circuit.num_gates(), 2);
    }

    #[test]
    fn test_swap_decomposes_to_three_cx() {
        let mut cir = QCir::new(3);
        cir.cx(QubitId(0), QubitId(2)).unwrap();

        let config = DuostraConfig {
            placer: PlacerKind::Naive,
            scheduler: SchedulerKind::Greedy,
            ..DuostraConfig::default()
        };
        let result = Duostra::new(config).map(&cir, Device::linear(3)).unwrap();

        assert_eq!(result.num_swaps(), 1);
        // 1 SWAP -> 3 CX, plus the routed CX itself.
        assert_eq!(result.physical_circuit.num_gates(), 4);
        assert!(
            result
                .physical_circuit
                .gates()
                .iter()
                .all(|g| g.kind == GateKind::Cx)
        );
    }

    #[test]
    fn test_too_small_device() {
        let cir = QCir::new(5);
        let result = Duostra::new(DuostraConfig::default()).map(&cir, Device::linear(3));
        assert!(matches!(result, Err(DuostraError::ArityMismatch { .. })));
    }
}
