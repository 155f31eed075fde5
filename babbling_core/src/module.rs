//! Contract between the supervisor and the learning modules it arbitrates.
//!
//! The regression machinery behind a module (forward/inverse models, the
//! competence-progress estimator) lives elsewhere; the supervisor only ever
//! talks to a module through this trait.

use serde::{Deserialize, Serialize};

use crate::descriptor::ModuleDescriptor;
use crate::env::MotorConfig;
use crate::error::ModuleError;
use crate::experience::ExperienceLog;

/// Operating mode of a module's sensorimotor model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorimotorMode {
    /// Inverse queries add exploration noise.
    #[default]
    Explore,
    /// Pure exploitation, no added noise.
    Exploit,
}

pub trait LearningModule {
    /// Current interest (competence progress). Higher is more worth practicing.
    fn interest(&self) -> f32;

    /// Emit a motor command for a self-chosen goal.
    ///
    /// `context` is already reduced to the module's declared context dims and
    /// is `None` for unconditioned modules.
    fn produce(&mut self, context: Option<&[f32]>) -> Result<Vec<f32>, ModuleError>;

    /// Motor command expected to reach `goal` (context prefix + sensory goal).
    fn inverse(&mut self, goal: &[f32]) -> Result<Vec<f32>, ModuleError>;

    fn update_sensorimotor(&mut self, m: &[f32], s: &[f32]) -> Result<(), ModuleError>;

    fn update_interest(&mut self, m: &[f32], s: &[f32]) -> Result<(), ModuleError>;

    /// Rebuild models from a recorded trajectory.
    ///
    /// `as_controller` names the log controller this module should treat as
    /// itself; `forward_interest` asks it to rebuild its interest model as well.
    fn replay_models(
        &mut self,
        log: &ExperienceLog,
        as_controller: Option<&str>,
        forward_interest: bool,
    ) -> Result<(), ModuleError>;

    fn sensorimotor_mode(&self) -> SensorimotorMode;

    fn set_sensorimotor_mode(&mut self, mode: SensorimotorMode);
}

/// Builds the module bound to a resolved descriptor.
pub trait ModuleFactory {
    fn build(
        &mut self,
        descriptor: &ModuleDescriptor,
        motor: &MotorConfig,
    ) -> Result<Box<dyn LearningModule>, ModuleError>;
}

impl<F> ModuleFactory for F
where
    F: FnMut(&ModuleDescriptor, &MotorConfig) -> Result<Box<dyn LearningModule>, ModuleError>,
{
    fn build(
        &mut self,
        descriptor: &ModuleDescriptor,
        motor: &MotorConfig,
    ) -> Result<Box<dyn LearningModule>, ModuleError> {
        self(descriptor, motor)
    }
}
