//! Exploration/exploitation mode switching.
//!
//! `enter_evaluation_mode` / `exit_evaluation_mode` must be paired by the
//! caller. `evaluation()` does the pairing itself: the returned guard puts
//! every module back into its saved mode when it goes out of scope.

use std::ops::{Deref, DerefMut};

use babbling_core::{Result, SensorimotorMode, SupervisorError};
use tracing::{info, warn};

use crate::supervisor::Supervisor;

impl<E> Supervisor<E> {
    /// Save every module's mode, then force pure exploitation.
    pub fn enter_evaluation_mode(&mut self) -> Result<()> {
        if self.saved_modes.is_some() {
            return Err(SupervisorError::ModeSwitchMisuse("already in evaluation mode"));
        }
        let saved: Vec<SensorimotorMode> = self.modules.iter().map(|m| m.mode()).collect();
        for module in &mut self.modules {
            module.set_mode(SensorimotorMode::Exploit);
        }
        self.saved_modes = Some(saved);
        info!(t = self.t, "entered evaluation mode");
        Ok(())
    }

    /// Put every module back into the mode saved by `enter_evaluation_mode`.
    pub fn exit_evaluation_mode(&mut self) -> Result<()> {
        let saved = self
            .saved_modes
            .take()
            .ok_or(SupervisorError::ModeSwitchMisuse("exit without a matching enter"))?;
        for (module, mode) in self.modules.iter_mut().zip(saved) {
            module.set_mode(mode);
        }
        info!(t = self.t, "left evaluation mode");
        Ok(())
    }

    #[inline]
    pub fn is_evaluating(&self) -> bool {
        self.saved_modes.is_some()
    }

    /// Enter evaluation mode for the lifetime of the returned guard.
    pub fn evaluation(&mut self) -> Result<EvaluationGuard<'_, E>> {
        self.enter_evaluation_mode()?;
        Ok(EvaluationGuard {
            sup: self,
            released: false,
        })
    }
}

/// Scoped evaluation mode. Dereferences to the supervisor.
pub struct EvaluationGuard<'a, E> {
    sup: &'a mut Supervisor<E>,
    released: bool,
}

impl<E> EvaluationGuard<'_, E> {
    /// Leave evaluation mode now, surfacing a pairing error instead of logging it.
    pub fn finish(mut self) -> Result<()> {
        self.released = true;
        self.sup.exit_evaluation_mode()
    }
}

impl<E> Deref for EvaluationGuard<'_, E> {
    type Target = Supervisor<E>;

    fn deref(&self) -> &Self::Target {
        self.sup
    }
}

impl<E> DerefMut for EvaluationGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.sup
    }
}

impl<E> Drop for EvaluationGuard<'_, E> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(error) = self.sup.exit_evaluation_mode() {
            warn!(%error, "evaluation guard could not restore modes");
        }
    }
}
