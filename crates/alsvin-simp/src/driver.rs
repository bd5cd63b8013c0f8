//! The simplification driver: fixed-point iteration of rule passes and the
//! named composite strategies.

use std::collections::BTreeMap;

use alsvin_types::CancelToken;
use alsvin_zx::{EdgeKind, VertexId, VertexKind, ZxGraph};
use tracing::{debug, info, instrument, warn};

use crate::error::{SimpError, SimpResult};
use crate::rule::RewriteRule;
use crate::rules::{GadgetFusion, SpiderFusion, clifford_rules};

/// Per-rule application statistics for one strategy run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimplifyReport {
    counts: BTreeMap<&'static str, usize>,
    /// Outer fixed-point rounds executed.
    pub rounds: usize,
}

impl SimplifyReport {
    /// Record `n` applications of `rule`.
    fn record(&mut self, rule: &'static str, n: usize) {
        if n > 0 {
            *self.counts.entry(rule).or_default() += n;
        }
    }

    /// Applications of one rule.
    pub fn count(&self, rule: &str) -> usize {
        self.counts.get(rule).copied().unwrap_or(0)
    }

    /// Total rewrite applications.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Iterate `(rule, count)` pairs in rule-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.counts.iter().map(|(&name, &n)| (name, n))
    }
}

/// Drives rules to fixed points and sequences the composite strategies.
///
/// Every pass is staged on a clone of the graph and committed only after
/// the rule's monovariant is seen to strictly decrease, so a failing pass
/// leaves the graph untouched. A [`CancelToken`] is polled at the top of
/// every pass iteration.
#[derive(Debug, Clone, Default)]
pub struct Simplifier {
    cancel: CancelToken,
}

impl Simplifier {
    /// Create a driver with a fresh cancellation token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver polling the given token.
    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    fn check_cancelled(&self) -> SimpResult<()> {
        if self.cancel.is_cancelled() {
            Err(SimpError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Run one matching-then-rewriting pass of `rule`. Returns the number
    /// of matches applied; the graph is updated only on success.
    pub fn run_pass(&self, graph: &mut ZxGraph, rule: &dyn RewriteRule) -> SimpResult<usize> {
        self.check_cancelled()?;
        let matches = rule.find(graph);
        if matches.is_empty() {
            return Ok(0);
        }

        let before = rule.monovariant(graph);
        let mut staged = graph.clone();
        for m in &matches {
            rule.apply(&mut staged, m)?;
        }
        let after = rule.monovariant(&staged);
        if after >= before {
            return Err(SimpError::NoProgress {
                rule: rule.name(),
                before,
                after,
            });
        }
        debug!(rule = rule.name(), applied = matches.len(), "pass committed");
        *graph = staged;
        Ok(matches.len())
    }

    /// Run `rule` to its fixed point. Returns total applications.
    pub fn run_to_fixed_point(
        &self,
        graph: &mut ZxGraph,
        rule: &dyn RewriteRule,
    ) -> SimpResult<usize> {
        let mut total = 0;
        loop {
            let applied = self.run_pass(graph, rule)?;
            if applied == 0 {
                return Ok(total);
            }
            total += applied;
        }
    }

    /// Iterate a rule list to a joint fixed point, disabling any rule that
    /// reports `NoProgress` for the remainder of the run.
    fn iterate_rules(
        &self,
        graph: &mut ZxGraph,
        rules: &[Box<dyn RewriteRule>],
        report: &mut SimplifyReport,
    ) -> SimpResult<()> {
        let mut disabled: Vec<&'static str> = Vec::new();
        loop {
            self.check_cancelled()?;
            report.rounds += 1;
            let mut fired = 0;
            for rule in rules {
                if disabled.contains(&rule.name()) {
                    continue;
                }
                match self.run_to_fixed_point(graph, rule.as_ref()) {
                    Ok(n) => {
                        report.record(rule.name(), n);
                        fired += n;
                    }
                    Err(SimpError::NoProgress { rule: name, before, after }) => {
                        warn!(rule = name, before, after, "rule disabled after no-progress pass");
                        disabled.push(name);
                    }
                    Err(e) => return Err(e),
                }
            }
            if fired == 0 {
                return Ok(());
            }
        }
    }

    /// Run an arbitrary ordered rule sequence to a joint fixed point. The
    /// named strategies are compositions of this.
    pub fn run_rules(
        &self,
        graph: &mut ZxGraph,
        rules: &[Box<dyn RewriteRule>],
    ) -> SimpResult<SimplifyReport> {
        let mut report = SimplifyReport::default();
        self.iterate_rules(graph, rules, &mut report)?;
        Ok(report)
    }

    /// Clifford simplification: spider fusion, identity removal, pi-copy,
    /// pivot, and local complementation to a joint fixed point.
    #[instrument(skip(self, graph))]
    pub fn clifford_simp(&self, graph: &mut ZxGraph) -> SimpResult<SimplifyReport> {
        let mut report = SimplifyReport::default();
        self.iterate_rules(graph, &clifford_rules(), &mut report)?;
        info!(
            applied = report.total(),
            vertices = graph.num_vertices(),
            edges = graph.num_edges(),
            "clifford-simp finished"
        );
        Ok(report)
    }

    /// Full reduction: Clifford simplification interleaved with phase-gadget
    /// fusion until neither fires.
    #[instrument(skip(self, graph))]
    pub fn full_reduce(&self, graph: &mut ZxGraph) -> SimpResult<SimplifyReport> {
        let mut report = SimplifyReport::default();
        self.iterate_rules(graph, &clifford_rules(), &mut report)?;
        loop {
            self.check_cancelled()?;
            let fused = match self.run_to_fixed_point(graph, &GadgetFusion) {
                Ok(n) => n,
                Err(SimpError::NoProgress { rule, before, after }) => {
                    warn!(rule, before, after, "gadget fusion disabled after no-progress pass");
                    0
                }
                Err(e) => return Err(e),
            };
            report.record("gadget-fusion", fused);
            if fused == 0 {
                break;
            }
            self.iterate_rules(graph, &clifford_rules(), &mut report)?;
        }
        info!(applied = report.total(), "full-reduce finished");
        Ok(report)
    }

    /// Normalise a graph into graph-like form: arity-2 H-boxes become
    /// Hadamard edges, X-spiders are recoloured to Z, Simple-connected
    /// same-colour spiders fuse, and wires joining two boundaries directly
    /// are buffered through a phase-0 Z-spider with Hadamard edges on both
    /// sides.
    #[instrument(skip(self, graph))]
    pub fn to_graph_like(&self, graph: &mut ZxGraph) -> SimpResult<SimplifyReport> {
        let mut report = SimplifyReport::default();
        graph.normalize();

        // Arity-2 H-boxes turn into Hadamard-coloured wires.
        loop {
            self.check_cancelled()?;
            let hbox = graph.vertices().find_map(|(id, v)| {
                (v.kind == VertexKind::HBox && v.phase.is_pi() && graph.degree(id) == 2)
                    .then_some(id)
            });
            let Some(h) = hbox else { break };
            let legs: Vec<(VertexId, EdgeKind)> = graph.neighbors(h).collect();
            graph.remove_vertex(h)?;
            let [(a, k1), (b, k2)] = legs[..] else {
                unreachable!("degree was checked")
            };
            let hadamards = 1 + [k1, k2]
                .iter()
                .filter(|&&k| k == EdgeKind::Hadamard)
                .count();
            let kind = if hadamards % 2 == 1 {
                EdgeKind::Hadamard
            } else {
                EdgeKind::Simple
            };
            graph.connect_normalized(a, b, kind);
            report.record("hbox-to-edge", 1);
        }

        // Recolour every X-spider to Z.
        let xs: Vec<VertexId> = graph
            .vertices()
            .filter_map(|(id, v)| (v.kind == VertexKind::X).then_some(id))
            .collect();
        for x in &xs {
            graph.toggle_color(*x)?;
        }
        report.record("color-change", xs.len());

        // Fuse adjacent same-colour spiders.
        let fused = self.run_to_fixed_point(graph, &SpiderFusion)?;
        report.record("spider-fusion", fused);

        // Buffer direct boundary-boundary wires through a phase-0 spider.
        let bare: Vec<(VertexId, VertexId)> = graph
            .edges()
            .filter(|&(u, v, k)| {
                k == EdgeKind::Simple
                    && graph.kind(u) == VertexKind::Boundary
                    && graph.kind(v) == VertexKind::Boundary
            })
            .map(|(u, v, _)| (u, v))
            .collect();
        for (u, v) in bare {
            graph.remove_edge(u, v, Some(EdgeKind::Simple))?;
            let (row, col) = {
                let a = graph.vertex(u).expect("live boundary");
                (a.row, a.col + 0.5)
            };
            let z = graph.add_spider(VertexKind::Z, alsvin_types::Phase::zero(), row, col);
            graph.insert_edge_raw(u, z, EdgeKind::Hadamard);
            graph.insert_edge_raw(z, v, EdgeKind::Hadamard);
            report.record("boundary-buffer", 1);
        }

        Ok(report)
    }
}
