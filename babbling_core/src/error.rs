use thiserror::Error;

/// Error raised by a learning module collaborator. Passed through untouched.
pub type ModuleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Supervisor error taxonomy.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// Space partition, motor configuration or module declarations are inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown learning module `{0}`")]
    UnknownModule(String),

    #[error("unknown sensory space `{0}`")]
    UnknownSpace(String),

    #[error("{what}: expected {expected} dims, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("evaluation mode misuse: {0}")]
    ModeSwitchMisuse(&'static str),

    /// Restoring would rewind a supervisor that already made decisions.
    #[error("cannot restore into a supervisor in use (t = {t}, {selections} selections recorded)")]
    RestoreIntoUsed { t: u64, selections: u64 },

    /// `perceive` without a pending motor command and without an override.
    #[error("no motor command is awaiting perception")]
    NothingToPerceive,

    #[error("learning module `{module}` failed: {source}")]
    Module {
        module: String,
        #[source]
        source: ModuleError,
    },
}

impl SupervisorError {
    pub fn config(msg: impl Into<String>) -> Self {
        SupervisorError::Configuration(msg.into())
    }

    pub fn module(module: impl Into<String>, source: ModuleError) -> Self {
        SupervisorError::Module {
            module: module.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
