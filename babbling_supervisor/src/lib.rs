//! babbling_supervisor
//!
//! Stateful arbitration layer on top of `babbling_core`.
//!
//! Responsibilities:
//! - own the learning-module registry, selection counters and interest history
//! - choose which module babbles next
//! - drive the produce -> perceive cycle and broadcast every perceived pair
//! - replay recorded trajectories
//! - switch modules into evaluation (pure exploitation) and back
//!
//! Non-goals:
//! - no IO
//! - no async
//! - no model internals (those live behind `LearningModule`)

pub mod adapter;
pub mod eval;
pub mod replay;
pub mod supervisor;

pub use adapter::{compose, BoundModule};

pub use eval::EvaluationGuard;
pub use replay::ReplayOptions;

pub use supervisor::{
    CycleState,
    RestoreStats,
    Supervisor,
    SupervisorSnapshot,
};
