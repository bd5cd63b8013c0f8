//! ZX-graph simplification: rules, matching, and strategies.
//!
//! A rule is a value implementing [`RewriteRule`]: a matcher returning a
//! deterministic, non-overlapping match set, and a rewriter applying one
//! match through graph edits. The [`Simplifier`] drives rules to fixed
//! points, checks each rule's monovariant, and exposes the composite
//! strategies `clifford_simp`, `full_reduce`, and `to_graph_like`.
//!
//! # Example
//!
//! ```rust
//! use alsvin_simp::Simplifier;
//! use alsvin_types::Phase;
//! use alsvin_zx::{EdgeKind, VertexKind, ZxGraph};
//!
//! // Two π/4 spiders on a wire fuse into one π/2 spider.
//! let mut g = ZxGraph::new();
//! let a = g.add_spider(VertexKind::Z, Phase::new(1, 4), 0.0, 0.0);
//! let b = g.add_spider(VertexKind::Z, Phase::new(1, 4), 0.0, 1.0);
//! g.add_edge(a, b, EdgeKind::Simple).unwrap();
//!
//! let report = Simplifier::new().clifford_simp(&mut g).unwrap();
//! assert_eq!(report.count("spider-fusion"), 1);
//! assert_eq!(g.num_vertices(), 1);
//! ```

pub mod driver;
pub mod error;
pub mod rule;
pub mod rules;

pub use driver::{Simplifier, SimplifyReport};
pub use error::{SimpError, SimpResult};
pub use rule::{RewriteMatch, RewriteRule, select_non_overlapping};
pub use rules::{
    Bialgebra, GadgetFusion, HadamardFusion, IdentityRemoval, LocalComplementation, PiCopy, Pivot,
    SpiderFusion, StateCopy, all_rules, clifford_rules,
};
