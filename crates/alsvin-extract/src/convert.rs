//! Conversion of logical circuits into ZX-graphs.

use alsvin_qcir::{Gate, GateKind, QCir};
use alsvin_types::Phase;
use alsvin_zx::{EdgeKind, VertexId, VertexKind, ZxGraph};

use crate::error::ExtractResult;

/// Encode a circuit as a ZX-graph: one wire per qubit, gates appended left
/// to right as their spider gadgets.
///
/// The encoding uses the standard gadgets: phase rotations are single
/// spiders, H is an arity-2 H-box, CX is a Simple-connected Z/X pair, CZ a
/// Hadamard edge between two Z-spiders, and SWAP crosses the wires. The
/// result is generally not graph-like; run `to_graph_like` before
/// extraction.
pub fn circuit_to_zx(circuit: &QCir) -> ExtractResult<ZxGraph> {
    let mut graph = ZxGraph::new();
    let mut last: Vec<VertexId> = Vec::with_capacity(circuit.num_qubits());
    for q in 0..circuit.num_qubits() {
        last.push(graph.add_input(q as i32)?);
    }

    for (col, gate) in circuit.gates().iter().enumerate() {
        let col = col as f64 + 1.0;
        append_gate(&mut graph, &mut last, gate, col);
    }

    for q in 0..circuit.num_qubits() {
        let o = graph.add_output(q as i32)?;
        graph.connect_normalized(last[q], o, EdgeKind::Simple);
    }
    Ok(graph)
}

fn spider(graph: &mut ZxGraph, kind: VertexKind, phase: Phase, qubit: usize, col: f64) -> VertexId {
    let v = graph.add_spider(kind, phase, qubit as f64, col);
    graph.vertex_mut(v).expect("just created").qubit = qubit as i32;
    v
}

fn append_single(
    graph: &mut ZxGraph,
    last: &mut [VertexId],
    kind: VertexKind,
    phase: Phase,
    q: usize,
    col: f64,
) {
    let v = spider(graph, kind, phase, q, col);
    graph.connect_normalized(last[q], v, EdgeKind::Simple);
    last[q] = v;
}

fn append_gate(graph: &mut ZxGraph, last: &mut [VertexId], gate: &Gate, col: f64) {
    let q0 = gate.qubits[0].index();
    match gate.kind {
        GateKind::H => append_single(graph, last, VertexKind::HBox, Phase::pi(), q0, col),
        GateKind::X => append_single(graph, last, VertexKind::X, Phase::pi(), q0, col),
        GateKind::Y => {
            // Y = X then Z, up to a global phase.
            append_single(graph, last, VertexKind::X, Phase::pi(), q0, col);
            append_single(graph, last, VertexKind::Z, Phase::pi(), q0, col);
        }
        GateKind::Z => append_single(graph, last, VertexKind::Z, Phase::pi(), q0, col),
        GateKind::S => append_single(graph, last, VertexKind::Z, Phase::new(1, 2), q0, col),
        GateKind::Sdg => append_single(graph, last, VertexKind::Z, Phase::new(-1, 2), q0, col),
        GateKind::T => append_single(graph, last, VertexKind::Z, Phase::new(1, 4), q0, col),
        GateKind::Tdg => append_single(graph, last, VertexKind::Z, Phase::new(-1, 4), q0, col),
        GateKind::Rz(p) | GateKind::P(p) => {
            append_single(graph, last, VertexKind::Z, p, q0, col);
        }
        GateKind::Rx(p) => append_single(graph, last, VertexKind::X, p, q0, col),
        GateKind::Cx => {
            let qt = gate.qubits[1].index();
            let control = spider(graph, VertexKind::Z, Phase::zero(), q0, col);
            let target = spider(graph, VertexKind::X, Phase::zero(), qt, col);
            graph.connect_normalized(last[q0], control, EdgeKind::Simple);
            graph.connect_normalized(last[qt], target, EdgeKind::Simple);
            graph.connect_normalized(control, target, EdgeKind::Simple);
            last[q0] = control;
            last[qt] = target;
        }
        GateKind::Cz => {
            let q1 = gate.qubits[1].index();
            let a = spider(graph, VertexKind::Z, Phase::zero(), q0, col);
            let b = spider(graph, VertexKind::Z, Phase::zero(), q1, col);
            graph.connect_normalized(last[q0], a, EdgeKind::Simple);
            graph.connect_normalized(last[q1], b, EdgeKind::Simple);
            graph.connect_normalized(a, b, EdgeKind::Hadamard);
            last[q0] = a;
            last[q1] = b;
        }
        GateKind::Swap => {
            let q1 = gate.qubits[1].index();
            last.swap(q0, q1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_qcir::QubitId;

    #[test]
    fn test_cnot_encoding() {
        let mut cir = QCir::new(2);
        cir.cx(QubitId(0), QubitId(1)).unwrap();
        let g = circuit_to_zx(&cir).unwrap();

        assert_eq!(g.inputs().len(), 2);
        assert_eq!(g.outputs().len(), 2);
        let z = g
            .vertices()
            .find(|(_, v)| v.kind == VertexKind::Z)
            .map(|(id, _)| id)
            .unwrap();
        let x = g
            .vertices()
            .find(|(_, v)| v.kind == VertexKind::X)
            .map(|(id, _)| id)
            .unwrap();
        assert!(g.has_edge(z, x, EdgeKind::Simple));
        assert_eq!(g.num_edges(), 5);
    }

    #[test]
    fn test_swap_crosses_wires() {
        let mut cir = QCir::new(2);
        cir.swap(QubitId(0), QubitId(1)).unwrap();
        let g = circuit_to_zx(&cir).unwrap();

        // No vertices besides boundaries; wires crossed.
        assert_eq!(g.num_vertices(), 4);
        let i0 = g.inputs()[0];
        let o1 = g.outputs()[1];
        assert!(g.has_edge(i0, o1, EdgeKind::Simple));
    }

    #[test]
    fn test_phase_gates_carry_exact_phases() {
        let mut cir = QCir::new(1);
        cir.t(QubitId(0)).unwrap();
        cir.s(QubitId(0)).unwrap();
        let g = circuit_to_zx(&cir).unwrap();
        let phases: Vec<Phase> = g
            .vertices()
            .filter(|(_, v)| v.is_spider())
            .map(|(_, v)| v.phase)
            .collect();
        assert_eq!(phases, vec![Phase::new(1, 4), Phase::new(1, 2)]);
    }
}
