//! End-to-end encode → simplify → extract scenarios.

use alsvin_extract::{circuit_to_zx, extract_circuit};
use alsvin_qcir::{Gate, GateKind, QCir, QubitId};
use alsvin_simp::Simplifier;

fn reduce_and_extract(cir: &QCir) -> QCir {
    let mut graph = circuit_to_zx(cir).unwrap();
    let simp = Simplifier::new();
    simp.to_graph_like(&mut graph).unwrap();
    simp.clifford_simp(&mut graph).unwrap();
    extract_circuit(&graph).unwrap()
}

#[test]
fn test_cnot_roundtrip() {
    let mut cir = QCir::new(2);
    cir.cx(QubitId(0), QubitId(1)).unwrap();

    let extracted = reduce_and_extract(&cir);

    // The CNOT survives with its orientation; the extractor may dress the
    // target wire with Hadamard pairs, which cancel.
    let two_qubit: Vec<_> = extracted
        .gates()
        .iter()
        .filter(|g| g.is_two_qubit())
        .collect();
    assert_eq!(two_qubit.len(), 1);
    assert_eq!(two_qubit[0].kind, GateKind::Cx);
    assert_eq!(two_qubit[0].qubits, vec![QubitId(0), QubitId(1)]);

    let mut h_per_wire = [0usize; 2];
    for gate in extracted.gates() {
        if !gate.is_two_qubit() {
            assert_eq!(gate.kind, GateKind::H);
            h_per_wire[gate.qubits[0].index()] += 1;
        }
    }
    assert!(h_per_wire.iter().all(|&n| n % 2 == 0));
}

#[test]
fn test_cz_roundtrip() {
    let mut cir = QCir::new(2);
    cir.cz(QubitId(0), QubitId(1)).unwrap();

    let extracted = reduce_and_extract(&cir);
    let two_qubit: Vec<_> = extracted
        .gates()
        .iter()
        .filter(|g| g.is_two_qubit())
        .collect();
    assert_eq!(two_qubit.len(), 1);
    assert_eq!(two_qubit[0].kind, GateKind::Cz);
}

/// The 3-CNOT swap network reduces to a crossed pair of wires and comes
/// back as one SWAP.
#[test]
fn test_swap_network_extracts_to_swap() {
    let mut cir = QCir::new(2);
    cir.cx(QubitId(0), QubitId(1)).unwrap();
    cir.cx(QubitId(1), QubitId(0)).unwrap();
    cir.cx(QubitId(0), QubitId(1)).unwrap();

    let extracted = reduce_and_extract(&cir);
    assert_eq!(extracted.num_gates(), 1);
    assert_eq!(extracted.gate(0).kind, GateKind::Swap);
    assert_eq!(
        extracted.gate(0).qubits,
        vec![QubitId(0), QubitId(1)]
    );
}

/// Phase gates on one wire fuse into a single rotation.
#[test]
fn test_phase_chain_fuses() {
    let mut cir = QCir::new(1);
    cir.t(QubitId(0)).unwrap();
    cir.t(QubitId(0)).unwrap();

    let extracted = reduce_and_extract(&cir);
    assert_eq!(extracted.num_gates(), 1);
    assert_eq!(
        extracted.gate(0).kind,
        GateKind::P(alsvin_types::Phase::new(1, 2))
    );
}

/// An empty circuit extracts to an empty circuit.
#[test]
fn test_identity_circuit() {
    let cir = QCir::new(3);
    let extracted = reduce_and_extract(&cir);
    assert_eq!(extracted.num_gates(), 0);
    assert_eq!(extracted.num_qubits(), 3);
}

// GF(2) helpers for the multi-CNOT round trip below. A matrix acts on
// basis-state parity vectors: out = M · in.

type Gf2 = Vec<Vec<bool>>;

fn gf2_identity(n: usize) -> Gf2 {
    (0..n).map(|i| (0..n).map(|j| i == j).collect()).collect()
}

fn gf2_mul(a: &Gf2, b: &Gf2) -> Gf2 {
    let n = a.len();
    let mut out = vec![vec![false; n]; n];
    for i in 0..n {
        for k in 0..n {
            if a[i][k] {
                for j in 0..n {
                    out[i][j] ^= b[k][j];
                }
            }
        }
    }
    out
}

fn gf2_transpose(m: &Gf2) -> Gf2 {
    let n = m.len();
    (0..n).map(|i| (0..n).map(|j| m[j][i]).collect()).collect()
}

fn gf2_invert(m: &Gf2) -> Gf2 {
    let n = m.len();
    let mut work = m.clone();
    let mut inv = gf2_identity(n);
    for col in 0..n {
        let pivot = (col..n)
            .find(|&r| work[r][col])
            .expect("matrix is invertible");
        work.swap(col, pivot);
        inv.swap(col, pivot);
        for r in 0..n {
            if r != col && work[r][col] {
                for j in 0..n {
                    work[r][j] ^= work[col][j];
                    inv[r][j] ^= inv[col][j];
                }
            }
        }
    }
    inv
}

/// The parity transfer matrix of a CX/SWAP-only gate slice.
fn linear_action(gates: &[Gate], n: usize) -> Gf2 {
    let mut m = gf2_identity(n);
    for gate in gates {
        match gate.kind {
            GateKind::Cx => {
                let (c, t) = (gate.qubits[0].index(), gate.qubits[1].index());
                let control_row = m[c].clone();
                for (dst, src) in m[t].iter_mut().zip(control_row) {
                    *dst ^= src;
                }
            }
            GateKind::Swap => {
                let (a, b) = (gate.qubits[0].index(), gate.qubits[1].index());
                m.swap(a, b);
            }
            other => panic!("non-linear gate {other:?} in a linear block"),
        }
    }
    m
}

/// Split a circuit of the shape (linear block)(H on every wire)(linear
/// block) into its two linear halves, verifying that shape.
fn split_at_h_layer(cir: &QCir) -> (&[Gate], &[Gate]) {
    let gates = cir.gates();
    let h_positions: Vec<usize> = gates
        .iter()
        .enumerate()
        .filter(|(_, g)| !g.is_two_qubit())
        .map(|(i, g)| {
            assert_eq!(g.kind, GateKind::H, "unexpected single-qubit gate {g}");
            i
        })
        .collect();
    assert_eq!(h_positions.len(), cir.num_qubits(), "one H per wire");
    let mut wires: Vec<usize> = h_positions
        .iter()
        .map(|&p| gates[p].qubits[0].index())
        .collect();
    wires.sort_unstable();
    wires.dedup();
    assert_eq!(wires.len(), cir.num_qubits(), "one H per wire");

    let first = *h_positions.first().expect("non-empty layer");
    let last = *h_positions.last().expect("non-empty layer");
    assert_eq!(last - first + 1, h_positions.len(), "contiguous H layer");
    (&gates[..first], &gates[last + 1..])
}

/// Pushing the leading linear block through the H layer turns
/// `post · H · pre` into `post · (preᵀ)⁻¹ · H`, so two such circuits agree
/// exactly when `post · (preᵀ)⁻¹` does.
fn h_layer_canonical_form(cir: &QCir) -> Gf2 {
    let (pre, post) = split_at_h_layer(cir);
    let n = cir.num_qubits();
    gf2_mul(
        &linear_action(post, n),
        &gf2_invert(&gf2_transpose(&linear_action(pre, n))),
    )
}

/// A CNOT ladder capped by a Hadamard on every wire survives as a graph
/// whose frontier biadjacency needs a genuine multi-row reduction: one
/// extraction round emits several CNOTs before any wire can advance, and
/// those CNOTs must interleave correctly with the Hadamard advances of
/// the same round. Verified by the GF(2) action of the extracted circuit.
#[test]
fn test_cnot_ladder_multi_row_elimination() {
    let mut cir = QCir::new(3);
    cir.cx(QubitId(1), QubitId(0)).unwrap();
    cir.cx(QubitId(2), QubitId(1)).unwrap();
    for q in 0..3u32 {
        cir.h(QubitId(q)).unwrap();
    }

    let extracted = reduce_and_extract(&cir);

    let cx_count = extracted
        .gates()
        .iter()
        .filter(|g| g.kind == GateKind::Cx)
        .count();
    assert!(
        cx_count >= 2,
        "expected a multi-CNOT elimination block, got {cx_count}"
    );

    assert_eq!(
        h_layer_canonical_form(&extracted),
        h_layer_canonical_form(&cir)
    );
}
