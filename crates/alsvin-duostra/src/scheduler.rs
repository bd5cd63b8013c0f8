//! Gate-order scheduling over the router.

use alsvin_qcir::QubitId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

use alsvin_types::CancelToken;

use crate::config::{DuostraConfig, MinMaxOption, SchedulerKind};
use crate::device::{Device, Operation};
use crate::error::{DuostraError, DuostraResult};
use crate::router::Router;
use crate::search::assign_gates_search;
use crate::topology::CircuitTopology;

/// The bookkeeping shared by every scheduling strategy: the topology, the
/// emitted operations, and the gate assignment order.
#[derive(Debug, Clone)]
pub struct BaseScheduler {
    topology: CircuitTopology,
    operations: Vec<Operation>,
    order: Vec<usize>,
}

impl BaseScheduler {
    /// Wrap a topology.
    pub fn new(topology: CircuitTopology) -> Self {
        Self {
            topology,
            operations: Vec::new(),
            order: Vec::new(),
        }
    }

    /// The underlying topology.
    pub fn topology(&self) -> &CircuitTopology {
        &self.topology
    }

    /// Currently available gate ids, ascending.
    pub fn available_gates(&self) -> &[usize] {
        self.topology.available_gates()
    }

    /// True once every gate has routed.
    pub fn is_done(&self) -> bool {
        self.topology.is_done()
    }

    /// The first available gate executable without SWAPs.
    pub fn executable_gate(&self, router: &Router) -> Option<usize> {
        self.topology
            .available_gates()
            .iter()
            .copied()
            .find(|&id| router.is_executable(self.topology.gate(id)))
    }

    /// Route one gate. With `forget`, the operations are dropped after
    /// costing (look-ahead probes); the assignment order and topology
    /// update either way. Returns the latest end time among the emitted
    /// operations.
    pub fn route_one_gate(
        &mut self,
        router: &mut Router,
        gate_id: usize,
        forget: bool,
    ) -> DuostraResult<u64> {
        let gate = self.topology.gate(gate_id).clone();
        let ops = router.assign_gate(&gate)?;
        let max_end = ops.iter().map(|op| op.time_end).max().unwrap_or(0);
        if !forget {
            self.operations.extend(ops);
        }
        self.order.push(gate_id);
        self.topology.mark_executed(gate_id);
        Ok(max_end)
    }

    fn into_result(mut self, device: Device) -> ScheduleResult {
        self.operations.sort_by_key(|op| op.time_begin);
        ScheduleResult {
            operations: self.operations,
            order: self.order,
            device,
        }
    }
}

/// The outcome of scheduling: operations sorted by start time, the gate
/// assignment order, and the final device state.
#[derive(Debug, Clone)]
pub struct ScheduleResult {
    /// Emitted operations, ascending by `time_begin`.
    pub operations: Vec<Operation>,
    /// Logical gate ids in assignment order.
    pub order: Vec<usize>,
    /// The device after all gates routed.
    pub device: Device,
}

impl ScheduleResult {
    /// The mapping depth: the last operation's end time.
    pub fn final_cost(&self) -> u64 {
        self.operations.iter().map(|op| op.time_end).max().unwrap_or(0)
    }

    /// The summed durations of all operations.
    pub fn total_time(&self) -> u64 {
        self.operations.iter().map(Operation::duration).sum()
    }

    /// Number of SWAPs inserted.
    pub fn num_swaps(&self) -> usize {
        self.operations.iter().filter(|op| op.is_swap()).count()
    }
}

/// Chooses the order in which ready gates are handed to the router.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: DuostraConfig,
    cancel: CancelToken,
}

impl Scheduler {
    /// Create a scheduler from the configuration.
    pub fn new(config: DuostraConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Poll the given token while scheduling.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn check_cancelled(&self) -> DuostraResult<()> {
        if self.cancel.is_cancelled() {
            Err(DuostraError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Run the configured strategy to completion.
    #[instrument(skip(self, topology, router))]
    pub fn schedule(
        &self,
        topology: CircuitTopology,
        mut router: Router,
    ) -> DuostraResult<ScheduleResult> {
        let mut state = BaseScheduler::new(topology);
        info!(
            scheduler = %self.config.scheduler,
            gates = state.topology().num_gates(),
            "scheduling"
        );
        match self.config.scheduler {
            SchedulerKind::Base => self.assign_base(&mut state, &mut router)?,
            SchedulerKind::Naive | SchedulerKind::Static => {
                self.assign_naive(&mut state, &mut router)?;
            }
            SchedulerKind::Random => self.assign_random(&mut state, &mut router)?,
            SchedulerKind::Greedy => self.assign_greedy(&mut state, &mut router)?,
            SchedulerKind::Search => {
                assign_gates_search(&self.config, &self.cancel, &mut state, &mut router)?;
            }
        }
        debug!(ops = state.operations.len(), "scheduling finished");
        Ok(state.into_result(router.into_device()))
    }

    /// Route gates in id order, which is always a valid topological order.
    fn assign_base(&self, state: &mut BaseScheduler, router: &mut Router) -> DuostraResult<()> {
        for id in 0..state.topology().num_gates() {
            self.check_cancelled()?;
            state.route_one_gate(router, id, false)?;
        }
        Ok(())
    }

    /// Prefer an executable gate; otherwise take the first available.
    fn assign_naive(&self, state: &mut BaseScheduler, router: &mut Router) -> DuostraResult<()> {
        while !state.is_done() {
            self.check_cancelled()?;
            let id = state
                .executable_gate(router)
                .unwrap_or_else(|| state.available_gates()[0]);
            state.route_one_gate(router, id, false)?;
        }
        Ok(())
    }

    /// Pick uniformly among available gates, from the seeded generator.
    fn assign_random(&self, state: &mut BaseScheduler, router: &mut Router) -> DuostraResult<()> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        while !state.is_done() {
            self.check_cancelled()?;
            let waitlist = state.available_gates();
            let id = waitlist[rng.gen_range(0..waitlist.len())];
            state.route_one_gate(router, id, false)?;
        }
        Ok(())
    }

    /// Executable-first, then the cheapest candidate by routing cost.
    fn assign_greedy(&self, state: &mut BaseScheduler, router: &mut Router) -> DuostraResult<()> {
        while !state.is_done() {
            self.check_cancelled()?;
            let id = match state.executable_gate(router) {
                Some(id) => id,
                None => self.greedy_fallback(state, router)?,
            };
            state.route_one_gate(router, id, false)?;
        }
        Ok(())
    }

    /// The min- or max-cost gate among the first `num_candidates`
    /// available; ties resolve by the configured logical-id preference.
    fn greedy_fallback(&self, state: &BaseScheduler, router: &Router) -> DuostraResult<usize> {
        let waitlist = state.available_gates();
        let limit = self.config.num_candidates.unwrap_or(waitlist.len());
        let candidates = &waitlist[..limit.min(waitlist.len())];

        let mut best: Option<(u64, u64, usize)> = None;
        for &id in candidates {
            let gate = state.topology().gate(id);
            let cost = router.gate_cost(gate, self.config.apsp_coefficient)?;
            let min_qubit = gate.qubits.iter().copied().min().expect("gate has operands");
            let key = (cost, tie_value(self.config.tie_breaker, min_qubit), id);
            let better = match (&best, self.config.cost_selection) {
                (None, _) => true,
                (Some(current), MinMaxOption::Min) => key < *current,
                (Some(current), MinMaxOption::Max) => {
                    key.0 > current.0 || (key.0 == current.0 && (key.1, key.2) < (current.1, current.2))
                }
            };
            if better {
                best = Some(key);
            }
        }
        best.map(|(_, _, id)| id)
            .ok_or(DuostraError::InvalidPlacement("no candidate gates"))
    }
}

/// Map a logical qubit id through the tie-break policy so that smaller
/// keys always win.
pub(crate) fn tie_value(policy: MinMaxOption, qubit: QubitId) -> u64 {
    match policy {
        MinMaxOption::Min => u64::from(qubit.0),
        MinMaxOption::Max => u64::MAX - u64::from(qubit.0),
    }
}
