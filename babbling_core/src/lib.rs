pub mod space;
pub mod descriptor;

pub mod env;
pub mod module;
pub mod experience;
pub mod error;
pub mod cfg;
pub mod state;
pub mod policy;

pub use space::{DimRange, SensoryGroup, SpacePartition, STANDARD_CONTEXT_DIMS, STANDARD_GROUPS};
pub use descriptor::{ContextSpec, ModuleSpec, ModuleDescriptor, standard_modules};

pub use env::{Environment, MotorConfig};
pub use module::{LearningModule, ModuleFactory, SensorimotorMode};
pub use experience::{Experience, ExperienceLog};
pub use error::{ModuleError, Result, SupervisorError};
pub use cfg::SupervisorCfg;
pub use state::{InterestSnapshot, UsageCounters};
pub use policy::{BabblingPolicy, DEFAULT_EPSILON, DEFAULT_TEMPERATURE};
