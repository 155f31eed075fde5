use serde::{Deserialize, Serialize};

use crate::policy::BabblingPolicy;

pub const DEFAULT_DIAGNOSTIC_EVERY: u64 = 1000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorCfg {
    /// Policy used by `produce` and `choose_babbling_module` unless overridden per call.
    pub policy: BabblingPolicy,
    /// RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Emit an interest diagnostic every this many timesteps (0 disables).
    pub diagnostic_every: u64,
    /// Whether a module named explicitly in `produce_with` receives the next interest update.
    pub credit_explicit_control: bool,
}

impl Default for SupervisorCfg {
    fn default() -> Self {
        Self {
            policy: BabblingPolicy::default(),
            seed: None,
            diagnostic_every: DEFAULT_DIAGNOSTIC_EVERY,
            credit_explicit_control: true,
        }
    }
}

impl SupervisorCfg {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: BabblingPolicy) -> Self {
        self.policy = policy;
        self
    }
}
