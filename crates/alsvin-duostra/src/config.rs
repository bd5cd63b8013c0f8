//! Mapper configuration: option enums and the threaded `DuostraConfig`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DuostraError, DuostraResult};

/// Scheduling algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerKind {
    /// Route gates in topological id order.
    Base,
    /// Prefer an executable gate, else the first available.
    Naive,
    /// Historical alias of [`Naive`](Self::Naive); the two were never
    /// behaviourally distinct.
    Static,
    /// Pick a random available gate (seeded).
    Random,
    /// Pick the cheapest available gate by routing cost.
    Greedy,
    /// Look-ahead tree search over gate orders.
    Search,
}

/// Routing algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouterKind {
    /// Walk the precomputed all-pairs shortest path.
    ShortestPath,
    /// Bidirectional search weighted by occupied times.
    Duostra,
}

/// Initial placement selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacerKind {
    /// Identity placement.
    Naive,
    /// Seeded random placement.
    Random,
    /// Depth-first device traversal order.
    Dfs,
}

/// A two-way min/max policy knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinMaxOption {
    /// Prefer the smaller value.
    Min,
    /// Prefer the larger value.
    Max,
}

macro_rules! impl_option_strings {
    ($ty:ty { $($variant:path => $name:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    $($variant => $name),+
                };
                write!(f, "{s}")
            }
        }

        impl FromStr for $ty {
            type Err = DuostraError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($variant),)+
                    _ => Err(DuostraError::InvalidOptionValue {
                        key: stringify!($ty).to_lowercase(),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

impl_option_strings!(SchedulerKind {
    SchedulerKind::Base => "base",
    SchedulerKind::Naive => "naive",
    SchedulerKind::Static => "static",
    SchedulerKind::Random => "random",
    SchedulerKind::Greedy => "greedy",
    SchedulerKind::Search => "search",
});

impl_option_strings!(RouterKind {
    RouterKind::ShortestPath => "shortest-path",
    RouterKind::Duostra => "duostra",
});

impl_option_strings!(PlacerKind {
    PlacerKind::Naive => "naive",
    PlacerKind::Random => "random",
    PlacerKind::Dfs => "dfs",
});

impl_option_strings!(MinMaxOption {
    MinMaxOption::Min => "min",
    MinMaxOption::Max => "max",
});

/// The full mapper configuration, threaded explicitly through placement,
/// routing, and scheduling. Randomness comes from the embedded seed, never
/// from a global source.
///
/// Serializes to JSON via [`to_json`](Self::to_json) /
/// [`from_json`](Self::from_json); fields missing from a JSON document
/// fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuostraConfig {
    /// Scheduling algorithm.
    pub scheduler: SchedulerKind,
    /// Routing algorithm.
    pub router: RouterKind,
    /// Initial placement algorithm.
    pub placer: PlacerKind,
    /// On tied routing cost, prefer the lower or higher logical qubit id.
    pub tie_breaker: MinMaxOption,
    /// Edge cost uses the min or max of the endpoint occupied times.
    pub available_time: MinMaxOption,
    /// Greedy scheduler picks the min- or max-cost candidate.
    pub cost_selection: MinMaxOption,
    /// Scheduler child-truncation width; `None` keeps all candidates.
    pub num_candidates: Option<usize>,
    /// Weight divisor of the shortest-path term in the greedy heuristic.
    pub apsp_coefficient: u64,
    /// Search-scheduler look-ahead depth.
    pub depth: usize,
    /// Disable child caching in the search tree.
    pub never_cache: bool,
    /// Route single-qubit gates as soon as they are ready.
    pub execute_single_immediately: bool,
    /// Seed for the random scheduler and placer.
    pub seed: u64,
    /// Run the mapping equivalence checker on the result.
    pub verify_result: bool,
}

impl Default for DuostraConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerKind::Search,
            router: RouterKind::Duostra,
            placer: PlacerKind::Dfs,
            tie_breaker: MinMaxOption::Min,
            available_time: MinMaxOption::Max,
            cost_selection: MinMaxOption::Min,
            num_candidates: None,
            apsp_coefficient: 1,
            depth: 4,
            never_cache: true,
            execute_single_immediately: false,
            seed: 0,
            verify_result: false,
        }
    }
}

impl DuostraConfig {
    /// Set the scheduling algorithm.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: SchedulerKind) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Set the routing algorithm.
    #[must_use]
    pub fn with_router(mut self, router: RouterKind) -> Self {
        self.router = router;
        self
    }

    /// Set the placement algorithm.
    #[must_use]
    pub fn with_placer(mut self, placer: PlacerKind) -> Self {
        self.placer = placer;
        self
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable the mapping equivalence checker.
    #[must_use]
    pub fn with_verification(mut self) -> Self {
        self.verify_result = true;
        self
    }

    /// Apply one textual `key = value` option, using the external option
    /// names.
    pub fn set_option(&mut self, key: &str, value: &str) -> DuostraResult<()> {
        let bad = || DuostraError::InvalidOptionValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "scheduler" => self.scheduler = value.parse()?,
            "router" => self.router = value.parse()?,
            "placer" => self.placer = value.parse()?,
            "tie-breaker" => self.tie_breaker = value.parse()?,
            "available-time" => self.available_time = value.parse()?,
            "cost-selection" => self.cost_selection = value.parse()?,
            "num-candidates" => {
                let n: usize = value.parse().map_err(|_| bad())?;
                if n == 0 {
                    return Err(bad());
                }
                self.num_candidates = Some(n);
            }
            "apsp-coefficient" => {
                let n: u64 = value.parse().map_err(|_| bad())?;
                if n == 0 {
                    return Err(bad());
                }
                self.apsp_coefficient = n;
            }
            "depth" => {
                let n: usize = value.parse().map_err(|_| bad())?;
                if n == 0 {
                    return Err(bad());
                }
                self.depth = n;
            }
            "never-cache" => self.never_cache = value.parse().map_err(|_| bad())?,
            "execute-single-immediately" => {
                self.execute_single_immediately = value.parse().map_err(|_| bad())?;
            }
            _ => return Err(DuostraError::UnknownOption(key.to_string())),
        }
        Ok(())
    }

    /// Parse a configuration from JSON. Missing fields take their default
    /// values.
    pub fn from_json(src: &str) -> DuostraResult<Self> {
        serde_json::from_str(src).map_err(|e| DuostraError::ParseError {
            line: e.line(),
            message: e.to_string(),
        })
    }

    /// Render the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("config serializes to JSON")
    }

    /// The effective look-ahead parameters: depth 1 always disables
    /// caching.
    pub fn effective_never_cache(&self) -> bool {
        self.never_cache || self.depth == 1
    }
}
