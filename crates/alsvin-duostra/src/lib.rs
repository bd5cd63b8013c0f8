//! Duostra qubit mapping: device model, router, and schedulers.
//!
//! Maps a logical circuit onto a physical device coupling graph. SWAPs are
//! inserted by the [`Router`] (shortest-path walk or the Duostra
//! bidirectional search), and gate order is chosen by a [`Scheduler`]
//! strategy ranging from naive to a look-ahead tree search. The
//! [`Duostra`] entry point chains placement, scheduling, verification, and
//! physical-circuit construction.
//!
//! # Example
//!
//! ```rust
//! use alsvin_duostra::{Device, Duostra, DuostraConfig, PlacerKind};
//! use alsvin_qcir::{QCir, QubitId};
//!
//! let mut cir = QCir::new(3);
//! cir.h(QubitId(0)).unwrap();
//! cir.cx(QubitId(0), QubitId(2)).unwrap();
//!
//! let config = DuostraConfig {
//!     placer: PlacerKind::Naive,
//!     ..DuostraConfig::default()
//! }
//! .with_verification();
//!
//! let result = Duostra::new(config).map(&cir, Device::linear(3)).unwrap();
//! assert_eq!(result.num_swaps(), 1);
//! ```

pub mod checker;
pub mod config;
pub mod device;
pub mod duostra;
pub mod error;
pub mod format;
pub mod placer;
pub mod router;
pub mod scheduler;
mod search;
pub mod topology;

pub use checker::check_mapping;
pub use config::{DuostraConfig, MinMaxOption, PlacerKind, RouterKind, SchedulerKind};
pub use device::{Device, DeviceInfo, GateDelays, Operation, PhysicalQubit};
pub use duostra::{Duostra, MappingResult};
pub use error::{DuostraError, DuostraResult};
pub use format::parse_device;
pub use placer::Placer;
pub use router::Router;
pub use scheduler::{BaseScheduler, ScheduleResult, Scheduler};
pub use topology::CircuitTopology;
