//! ZX-graph data model and editor.
//!
//! This crate is the GraphStore of the Alsvin stack: a labelled open
//! multigraph with spider and H-box vertices, Simple and Hadamard edges,
//! and the structural invariants every rewrite preserves.
//!
//! # Overview
//!
//! The graph is an arena of vertices keyed by [`VertexId`]; adjacency lists
//! store ids. Edge insertion applies the normalisation table (Hopf
//! cancellation of same-kind parallel edges, self-loop resolution, Hadamard
//! detours at boundaries), so a graph reachable through the public API is
//! always normalised.
//!
//! # Example
//!
//! ```rust
//! use alsvin_types::Phase;
//! use alsvin_zx::{EdgeKind, VertexKind, ZxGraph};
//!
//! let mut g = ZxGraph::new();
//! let i = g.add_input(0).unwrap();
//! let s = g.add_spider(VertexKind::Z, Phase::new(1, 4), 0.0, 1.0);
//! let t = g.add_spider(VertexKind::Z, Phase::zero(), 0.0, 2.0);
//! let o = g.add_output(0).unwrap();
//! g.add_edge(i, s, EdgeKind::Simple).unwrap();
//! g.add_edge(s, t, EdgeKind::Simple).unwrap();
//! g.add_edge(t, o, EdgeKind::Simple).unwrap();
//!
//! assert_eq!(g.num_vertices(), 4);
//! assert!(!g.is_graph_like()); // internal wires must be Hadamard
//!
//! g.toggle_edge(s, t).unwrap();
//! assert!(g.is_graph_like());
//! ```
//!
//! The `.zx` text format lives in [`format`]; see [`format::parse_zx`] and
//! [`format::write_zx`].

pub mod error;
pub mod format;
pub mod graph;
pub mod vertex;

pub use error::{ZxError, ZxResult};
pub use format::{parse_zx, write_zx};
pub use graph::ZxGraph;
pub use vertex::{EdgeKind, EdgeSet, Vertex, VertexId, VertexKind};
