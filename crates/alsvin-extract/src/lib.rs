//! Circuit extraction over GF(2) biadjacency matrices.
//!
//! This crate turns a graph-like ZX-graph back into a gate list. The
//! [`BiadjacencyMatrix`] provides logged row operations and the block-wise
//! pattern-reuse gaussian elimination; the [`Extractor`] drives the frontier
//! from the outputs to the inputs, emitting phase gates, CZs, CNOTs,
//! Hadamards, and a final SWAP permutation. The inverse direction, encoding
//! a circuit as a ZX-graph, lives in [`convert`].
//!
//! # Example
//!
//! ```rust
//! use alsvin_extract::{circuit_to_zx, extract_circuit};
//! use alsvin_qcir::{QCir, QubitId};
//! use alsvin_simp::Simplifier;
//!
//! let mut cir = QCir::new(2);
//! cir.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let mut graph = circuit_to_zx(&cir).unwrap();
//! let simp = Simplifier::new();
//! simp.to_graph_like(&mut graph).unwrap();
//! simp.clifford_simp(&mut graph).unwrap();
//!
//! let extracted = extract_circuit(&graph).unwrap();
//! assert_eq!(extracted.num_two_qubit_gates(), 1);
//! ```

pub mod biadjacency;
pub mod convert;
pub mod error;
pub mod extractor;

pub use biadjacency::{BiadjacencyMatrix, MatrixOp};
pub use convert::circuit_to_zx;
pub use error::{ExtractError, ExtractResult};
pub use extractor::{Extractor, extract_circuit};
