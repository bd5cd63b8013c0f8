//! Structural verification of a mapping result.

use alsvin_qcir::{GateKind, QCir, QubitId};

use crate::device::{Device, Operation};
use crate::error::{DuostraError, DuostraResult};
use crate::topology::CircuitTopology;

/// Replay an emitted operation sequence against the logical circuit.
///
/// Checks, in one pass over the operations:
///
/// - every two-qubit operation acts on coupled physical qubits;
/// - per physical qubit, operations are disjoint in time with the declared
///   device delays;
/// - tracking SWAPs through the layout, every non-SWAP operation realizes
///   a logical gate whose dependencies are satisfied, and all logical
///   gates are realized.
pub fn check_mapping(
    logical: &QCir,
    operations: &[Operation],
    initial_assignment: &[usize],
    device: &Device,
) -> DuostraResult<()> {
    let fail = |reason: String| Err(DuostraError::MappingCheckFailed(reason));

    let mut layout: Vec<Option<QubitId>> = vec![None; device.num_qubits()];
    for (logical_id, &p) in initial_assignment.iter().enumerate() {
        layout[p] = Some(QubitId::from(logical_id));
    }

    let mut busy_until = vec![0u64; device.num_qubits()];
    let mut topology = CircuitTopology::new(logical);

    for op in operations {
        let (p0, p1) = op.qubits;
        if op.time_end != op.time_begin + device.delay_of(&op.kind) {
            return fail(format!("operation {:?} has a wrong duration", op.kind));
        }
        for p in std::iter::once(p0).chain(p1) {
            if p >= device.num_qubits() {
                return fail(format!("physical qubit {p} is not on the device"));
            }
            if op.time_begin < busy_until[p] {
                return fail(format!("operations overlap on physical qubit {p}"));
            }
            busy_until[p] = op.time_end;
        }

        let Some(p1) = p1 else {
            let l0 = match layout[p0] {
                Some(l) => l,
                None => return fail(format!("physical qubit {p0} carries no logical qubit")),
            };
            consume_gate(&mut topology, op.kind, &[l0])?;
            continue;
        };

        if !device.is_adjacent(p0, p1) {
            return fail(format!(
                "two-qubit operation on uncoupled qubits ({p0}, {p1})"
            ));
        }
        if op.is_swap() {
            layout.swap(p0, p1);
            continue;
        }
        let (l0, l1) = match (layout[p0], layout[p1]) {
            (Some(a), Some(b)) => (a, b),
            _ => return fail(format!("unbound physical qubits in ({p0}, {p1})")),
        };
        consume_gate(&mut topology, op.kind, &[l0, l1])?;
    }

    if !topology.is_done() {
        return fail(format!(
            "{} logical gates were never realized",
            topology.num_gates() - topology.num_executed()
        ));
    }
    Ok(())
}

/// Match one physical operation against an available logical gate and mark
/// it executed. Symmetric gates accept either operand order.
fn consume_gate(
    topology: &mut CircuitTopology,
    kind: GateKind,
    logicals: &[QubitId],
) -> DuostraResult<()> {
    let symmetric = matches!(kind, GateKind::Cz | GateKind::Swap);
    let found = topology.available_gates().iter().copied().find(|&id| {
        let gate = topology.gate(id);
        if gate.kind != kind {
            return false;
        }
        if gate.qubits == logicals {
            return true;
        }
        symmetric
            && logicals.len() == 2
            && gate.qubits == [logicals[1], logicals[0]]
    });
    match found {
        Some(id) => {
            topology.mark_executed(id);
            Ok(())
        }
        None => Err(DuostraError::MappingCheckFailed(format!(
            "no available logical gate matches {kind:?} on {logicals:?}"
        ))),
    }
}
