//! Gate types for the logical circuit IR.

use alsvin_types::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The id as an array index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// The gate set the synthesis core speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around Z.
    Rz(Phase),
    /// Rotation around X.
    Rx(Phase),
    /// Phase gate (diagonal rotation, Rz up to global phase).
    P(Phase),
    /// Controlled-X (CNOT).
    Cx,
    /// Controlled-Z.
    Cz,
    /// SWAP gate.
    Swap,
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::H => "h",
            GateKind::X => "x",
            GateKind::Y => "y",
            GateKind::Z => "z",
            GateKind::S => "s",
            GateKind::Sdg => "sdg",
            GateKind::T => "t",
            GateKind::Tdg => "tdg",
            GateKind::Rz(_) => "rz",
            GateKind::Rx(_) => "rx",
            GateKind::P(_) => "p",
            GateKind::Cx => "cx",
            GateKind::Cz => "cz",
            GateKind::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            GateKind::Cx | GateKind::Cz | GateKind::Swap => 2,
            _ => 1,
        }
    }

    /// True for two-qubit gates.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.num_qubits() == 2
    }

    /// The Z-axis rotation angle of a diagonal gate, if any.
    pub fn z_phase(&self) -> Option<Phase> {
        match self {
            GateKind::Z => Some(Phase::pi()),
            GateKind::S => Some(Phase::new(1, 2)),
            GateKind::Sdg => Some(Phase::new(-1, 2)),
            GateKind::T => Some(Phase::new(1, 4)),
            GateKind::Tdg => Some(Phase::new(-1, 4)),
            GateKind::Rz(p) | GateKind::P(p) => Some(*p),
            _ => None,
        }
    }

    /// The inverse gate.
    pub fn adjoint(&self) -> GateKind {
        match self {
            GateKind::S => GateKind::Sdg,
            GateKind::Sdg => GateKind::S,
            GateKind::T => GateKind::Tdg,
            GateKind::Tdg => GateKind::T,
            GateKind::Rz(p) => GateKind::Rz(-*p),
            GateKind::Rx(p) => GateKind::Rx(-*p),
            GateKind::P(p) => GateKind::P(-*p),
            self_inverse => *self_inverse,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateKind::Rz(p) => write!(f, "rz({p})"),
            GateKind::Rx(p) => write!(f, "rx({p})"),
            GateKind::P(p) => write!(f, "p({p})"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// A gate with its operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// What the gate does.
    pub kind: GateKind,
    /// The qubits it acts on, control first for controlled gates.
    pub qubits: Vec<QubitId>,
}

impl Gate {
    /// Create a single-qubit gate.
    pub fn single(kind: GateKind, qubit: QubitId) -> Self {
        debug_assert_eq!(kind.num_qubits(), 1);
        Self {
            kind,
            qubits: vec![qubit],
        }
    }

    /// Create a two-qubit gate.
    pub fn two(kind: GateKind, q0: QubitId, q1: QubitId) -> Self {
        debug_assert_eq!(kind.num_qubits(), 2);
        Self {
            kind,
            qubits: vec![q0, q1],
        }
    }

    /// The operand pair `(q0, q1?)`.
    pub fn target_pair(&self) -> (QubitId, Option<QubitId>) {
        (self.qubits[0], self.qubits.get(1).copied())
    }

    /// True for two-qubit gates.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.kind.is_two_qubit()
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for (i, q) in self.qubits.iter().enumerate() {
            write!(f, "{}{q}", if i == 0 { " " } else { ", " })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_properties() {
        assert_eq!(GateKind::H.num_qubits(), 1);
        assert_eq!(GateKind::Cx.num_qubits(), 2);
        assert!(GateKind::Swap.is_two_qubit());
        assert_eq!(GateKind::T.z_phase(), Some(Phase::new(1, 4)));
        assert_eq!(GateKind::H.z_phase(), None);
    }

    #[test]
    fn test_adjoint() {
        assert_eq!(GateKind::S.adjoint(), GateKind::Sdg);
        assert_eq!(GateKind::Cx.adjoint(), GateKind::Cx);
        assert_eq!(
            GateKind::Rz(Phase::new(1, 4)).adjoint(),
            GateKind::Rz(Phase::new(-1, 4))
        );
    }

    #[test]
    fn test_display() {
        let g = Gate::two(GateKind::Cx, QubitId(0), QubitId(1));
        assert_eq!(g.to_string(), "cx q0, q1");
        let r = Gate::single(GateKind::Rz(Phase::new(1, 2)), QubitId(3));
        assert_eq!(r.to_string(), "rz(1/2) q3");
    }
}
