//! Fast-forward: rebuild module state from a recorded trajectory.

use babbling_core::{ExperienceLog, Result, SupervisorError};
use tracing::info;

use crate::supervisor::Supervisor;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReplayOptions {
    /// Ask modules to rebuild their interest models too, not only sensorimotor ones.
    pub forward_interest: bool,
}

impl<E> Supervisor<E> {
    pub fn replay(&mut self, log: &ExperienceLog) -> Result<()> {
        self.replay_with(log, ReplayOptions::default())
    }

    /// Broadcast every logged pair in order, then let each module replay its
    /// own models from the log as if it had been in control throughout.
    ///
    /// The whole log is checked before anything is replayed. Counters and the
    /// timestep are left alone.
    pub fn replay_with(&mut self, log: &ExperienceLog, opts: ReplayOptions) -> Result<()> {
        let m_ndims = self.motor.m_ndims;
        let s_len = self.partition.sensory_len();
        for e in log {
            if e.motor.len() != m_ndims {
                return Err(SupervisorError::DimensionMismatch {
                    what: "logged motor command",
                    expected: m_ndims,
                    got: e.motor.len(),
                });
            }
            if e.sensory.len() != s_len {
                return Err(SupervisorError::DimensionMismatch {
                    what: "logged sensory observation",
                    expected: s_len,
                    got: e.sensory.len(),
                });
            }
        }

        for e in log {
            self.update_sensorimotor_models(&e.flat())?;
        }
        for module in &mut self.modules {
            module.replay_models(log, opts.forward_interest)?;
        }

        info!(
            entries = log.len(),
            modules = self.modules.len(),
            forward_interest = opts.forward_interest,
            "experience log replayed"
        );
        Ok(())
    }
}
