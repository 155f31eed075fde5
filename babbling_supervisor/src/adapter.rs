//! Binding between a resolved `ModuleDescriptor` and the module behind it.
//!
//! The supervisor never slices flat vectors or calls a module directly; it goes
//! through `BoundModule`, which:
//! - cuts the module's motor/sensory/context views out of flat vectors
//! - forwards to the `LearningModule` contract
//! - tags module failures with the module id (no retry, no swallowing)

use babbling_core::{
    ExperienceLog, LearningModule, ModuleDescriptor, Result, SensorimotorMode, SupervisorError,
};

pub struct BoundModule {
    pub(crate) descriptor: ModuleDescriptor,
    pub(crate) inner: Box<dyn LearningModule>,
}

impl std::fmt::Debug for BoundModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundModule")
            .field("descriptor", &self.descriptor)
            .field("mode", &self.inner.sensorimotor_mode())
            .finish_non_exhaustive()
    }
}

impl BoundModule {
    pub fn new(descriptor: ModuleDescriptor, inner: Box<dyn LearningModule>) -> Self {
        Self { descriptor, inner }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    pub fn module(&self) -> &dyn LearningModule {
        self.inner.as_ref()
    }

    pub fn module_mut(&mut self) -> &mut dyn LearningModule {
        self.inner.as_mut()
    }

    #[inline]
    pub fn interest(&self) -> f32 {
        self.inner.interest()
    }

    /// Produce with the full context vector; only the declared dims reach the module.
    pub fn produce(&mut self, context: &[f32]) -> Result<Vec<f32>> {
        let ctx = self.descriptor.context_of(context)?;
        self.inner
            .produce(ctx.as_deref())
            .map_err(|e| SupervisorError::module(&self.descriptor.id, e))
    }

    /// Inverse query: the module's context slice is prepended to `goal`.
    pub fn inverse(&mut self, goal: &[f32], context: &[f32]) -> Result<Vec<f32>> {
        let mut full = self.descriptor.context_of(context)?.unwrap_or_default();
        let expected = self.descriptor.s_ndims() - full.len();
        if goal.len() != expected {
            return Err(SupervisorError::DimensionMismatch {
                what: "sensory goal",
                expected,
                got: goal.len(),
            });
        }
        full.extend_from_slice(goal);
        self.inner
            .inverse(&full)
            .map_err(|e| SupervisorError::module(&self.descriptor.id, e))
    }

    pub fn update_sensorimotor(&mut self, ms: &[f32]) -> Result<()> {
        let m = self.descriptor.motor_of(ms)?;
        let s = self.descriptor.sensory_of(ms)?;
        self.inner
            .update_sensorimotor(&m, &s)
            .map_err(|e| SupervisorError::module(&self.descriptor.id, e))
    }

    pub fn update_interest(&mut self, ms: &[f32]) -> Result<()> {
        let m = self.descriptor.motor_of(ms)?;
        let s = self.descriptor.sensory_of(ms)?;
        self.inner
            .update_interest(&m, &s)
            .map_err(|e| SupervisorError::module(&self.descriptor.id, e))
    }

    pub fn replay_models(&mut self, log: &ExperienceLog, forward_interest: bool) -> Result<()> {
        let id = self.descriptor.id.clone();
        self.inner
            .replay_models(log, Some(&id), forward_interest)
            .map_err(|e| SupervisorError::module(id, e))
    }

    pub fn mode(&self) -> SensorimotorMode {
        self.inner.sensorimotor_mode()
    }

    pub fn set_mode(&mut self, mode: SensorimotorMode) {
        self.inner.set_sensorimotor_mode(mode);
    }
}

/// Flat `(motor, context, sensory)` vector.
pub fn compose(m: &[f32], s: &[f32]) -> Vec<f32> {
    let mut ms = Vec::with_capacity(m.len() + s.len());
    ms.extend_from_slice(m);
    ms.extend_from_slice(s);
    ms
}
