//! Logical quantum circuit IR.
//!
//! The circuit representation the extractor emits and the Duostra
//! router/scheduler consumes: an ordered gate list over abstract qubits,
//! backed by a per-wire dependency DAG.
//!
//! # Example
//!
//! ```rust
//! use alsvin_qcir::{QCir, QubitId};
//!
//! let mut cir = QCir::new(2);
//! cir.h(QubitId(0)).unwrap();
//! cir.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(cir.depth(), 2);
//! assert_eq!(cir.predecessors(1), vec![0]);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;

pub use circuit::QCir;
pub use error::{QcirError, QcirResult};
pub use gate::{Gate, GateKind, QubitId};
