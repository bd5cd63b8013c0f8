//! The look-ahead tree search scheduler.

use rayon::prelude::*;

use alsvin_types::CancelToken;

use crate::config::DuostraConfig;
use crate::error::{DuostraError, DuostraResult};
use crate::router::Router;
use crate::scheduler::{BaseScheduler, tie_value};

#[derive(Debug, Clone, Copy)]
struct TreeNodeConf {
    never_cache: bool,
    execute_single: bool,
    candidates: usize,
    tie_breaker: crate::config::MinMaxOption,
}

/// One node of the search tree: a routed prefix plus the device and
/// topology snapshots reached by it.
#[derive(Debug, Clone)]
struct TreeNode {
    conf: TreeNodeConf,
    /// The gates this node routed on top of its parent.
    gate_ids: Vec<usize>,
    children: Vec<TreeNode>,
    max_cost: u64,
    router: Router,
    scheduler: BaseScheduler,
}

impl TreeNode {
    fn root(conf: TreeNodeConf, router: Router, scheduler: BaseScheduler) -> Self {
        Self {
            conf,
            gate_ids: Vec::new(),
            children: Vec::new(),
            max_cost: 0,
            router,
            scheduler,
        }
    }

    fn with_gate(
        conf: TreeNodeConf,
        gate_id: usize,
        router: Router,
        scheduler: BaseScheduler,
        max_cost: u64,
    ) -> DuostraResult<Self> {
        let mut node = Self {
            conf,
            gate_ids: vec![gate_id],
            children: Vec::new(),
            max_cost,
            router,
            scheduler,
        };
        node.route_internal_gates()?;
        Ok(node)
    }

    /// Route this node's own gates on its snapshots; with
    /// `execute_single`, also consume every forced follow-up gate.
    fn route_internal_gates(&mut self) -> DuostraResult<()> {
        for i in 0..self.gate_ids.len() {
            let cost = self
                .scheduler
                .route_one_gate(&mut self.router, self.gate_ids[i], true)?;
            self.max_cost = self.max_cost.max(cost);
        }
        if self.gate_ids.is_empty() || !self.conf.execute_single {
            return Ok(());
        }
        while let Some(id) = self.immediate_next() {
            let cost = self.scheduler.route_one_gate(&mut self.router, id, true)?;
            self.max_cost = self.max_cost.max(cost);
            self.gate_ids.push(id);
        }
        Ok(())
    }

    /// A gate whose routing is forced: directly executable, or the only
    /// one available.
    fn immediate_next(&self) -> Option<usize> {
        if let Some(id) = self.scheduler.executable_gate(&self.router) {
            return Some(id);
        }
        match self.scheduler.available_gates() {
            [only] => Some(*only),
            _ => None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn done(&self) -> bool {
        self.scheduler.is_done()
    }

    /// Tie-break key: the smallest logical qubit this node's first gate
    /// touches, mapped through the configured preference.
    fn tie_key(&self) -> u64 {
        self.gate_ids
            .first()
            .and_then(|&id| {
                self.scheduler
                    .topology()
                    .gate(id)
                    .qubits
                    .iter()
                    .copied()
                    .min()
            })
            .map_or(u64::MAX, |q| tie_value(self.conf.tie_breaker, q))
    }

    fn grow(&mut self) -> DuostraResult<()> {
        debug_assert!(self.children.is_empty());
        let available = self.scheduler.available_gates().to_vec();
        self.children = available
            .into_iter()
            .map(|id| {
                TreeNode::with_gate(
                    self.conf,
                    id,
                    self.router.clone(),
                    self.scheduler.clone(),
                    self.max_cost,
                )
            })
            .collect::<DuostraResult<Vec<_>>>()?;
        Ok(())
    }

    /// Minimum accumulated cost over descendants within `depth` levels.
    fn best_cost(&mut self, depth: usize, cancel: &CancelToken) -> DuostraResult<u64> {
        if cancel.is_cancelled() {
            return Err(DuostraError::Interrupted);
        }
        if self.is_leaf() {
            if depth == 0 || self.done() {
                return Ok(self.max_cost);
            }
            if depth == 1 {
                return self.best_cost_leaf();
            }
            self.grow()?;
        } else if depth <= 1 {
            // Cached children exist; still collapse to the one-level sweep.
            return self.best_cost_leaf();
        }

        // Truncate to the top candidates by immediate cost.
        self.children
            .sort_by_key(|child| (child.max_cost, child.tie_key()));
        if self.conf.candidates < self.children.len() {
            self.children.truncate(self.conf.candidates);
        }

        let mut best = u64::MAX;
        for child in &mut self.children {
            best = best.min(child.best_cost(depth - 1, cancel)?);
        }

        if self.conf.never_cache {
            self.children.clear();
        }
        Ok(best)
    }

    /// The one-level look-ahead: evaluate routing each available gate on a
    /// snapshot copy, in parallel, reduced deterministically by
    /// `(cost, tie-key, gate id)`.
    fn best_cost_leaf(&self) -> DuostraResult<u64> {
        let available = self.scheduler.available_gates().to_vec();
        if available.is_empty() {
            return Ok(self.max_cost);
        }
        let evaluated: Vec<DuostraResult<(u64, u64, usize)>> = available
            .par_iter()
            .map(|&id| {
                let mut router = self.router.clone();
                let mut scheduler = self.scheduler.clone();
                let cost = scheduler.route_one_gate(&mut router, id, true)?;
                let tie = self
                    .scheduler
                    .topology()
                    .gate(id)
                    .qubits
                    .iter()
                    .copied()
                    .min()
                    .map_or(u64::MAX, |q| tie_value(self.conf.tie_breaker, q));
                Ok((self.max_cost.max(cost), tie, id))
            })
            .collect();

        let mut best: Option<(u64, u64, usize)> = None;
        for entry in evaluated {
            let key = entry?;
            if best.is_none_or(|current| key < current) {
                best = Some(key);
            }
        }
        Ok(best.expect("non-empty available set").0)
    }

    /// Pick (and take) the cheapest child under `depth` look-ahead.
    fn best_child(mut self, depth: usize, cancel: &CancelToken) -> DuostraResult<TreeNode> {
        if self.is_leaf() {
            self.grow()?;
        }
        let mut best: Option<(u64, u64, usize)> = None;
        for (idx, child) in self.children.iter_mut().enumerate() {
            let cost = child.best_cost(depth, cancel)?;
            let key = (cost, child.tie_key(), idx);
            if best.is_none_or(|current| key < current) {
                best = Some(key);
            }
        }
        let (_, _, idx) = best.ok_or(DuostraError::InvalidPlacement("no child to grow"))?;
        Ok(self.children.swap_remove(idx))
    }
}

/// Drive the search scheduler: repeatedly adopt the best child as the new
/// root and replay its gates on the real router.
pub(crate) fn assign_gates_search(
    config: &DuostraConfig,
    cancel: &CancelToken,
    state: &mut BaseScheduler,
    router: &mut Router,
) -> DuostraResult<()> {
    let conf = TreeNodeConf {
        never_cache: config.effective_never_cache(),
        execute_single: config.execute_single_immediately,
        candidates: config.num_candidates.unwrap_or(usize::MAX),
        tie_breaker: config.tie_breaker,
    };
    let mut root = TreeNode::root(conf, router.clone(), state.clone());

    while !root.done() {
        if cancel.is_cancelled() {
            return Err(DuostraError::Interrupted);
        }
        root = root.best_child(config.depth, cancel)?;
        for &gate_id in &root.gate_ids {
            state.route_one_gate(router, gate_id, false)?;
        }
    }
    Ok(())
}
