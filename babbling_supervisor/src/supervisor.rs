//! The babbling supervisor.
//!
//! Owns the module registry and arbitrates among modules:
//! - picks which module practices next (interest-driven policy)
//! - drives the produce -> act -> perceive cycle
//! - fans every perceived pair out to all modules
//! - credits only the controlling module with an interest update
//!
//! No IO. No threads. All mutation goes through `&mut self`; callers sharing a
//! supervisor across threads wrap it in a `Mutex` themselves.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use babbling_core::{
    standard_modules, BabblingPolicy, Environment, ExperienceLog, InterestSnapshot, ModuleDescriptor,
    ModuleFactory, ModuleSpec, MotorConfig, Result, SensorimotorMode, SpacePartition, SupervisorCfg,
    SupervisorError, UsageCounters,
};

use crate::adapter::{compose, BoundModule};

/// Where the supervisor is in the production/perception cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CycleState {
    Idle,
    /// A motor command was handed out and its sensory outcome is pending.
    AwaitingPerception,
}

/// Snapshot of supervisor bookkeeping for storage-agnostic persistence.
///
/// Module model state is not included; rebuild it with `replay`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SupervisorSnapshot {
    pub t: u64,
    /// Sorted by module id.
    pub selection_counts: Vec<(String, u64)>,
    pub interest_history: Vec<InterestSnapshot>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RestoreStats {
    /// Counters applied from the snapshot.
    pub applied: usize,
    /// Counters naming modules this supervisor does not have.
    pub skipped: usize,
}

#[derive(Debug)]
pub struct Supervisor<E> {
    pub(crate) env: E,
    pub(crate) cfg: SupervisorCfg,
    pub(crate) motor: MotorConfig,
    pub(crate) partition: SpacePartition,
    pub(crate) modules: Vec<BoundModule>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) usage: UsageCounters,
    pub(crate) interest_history: Vec<InterestSnapshot>,
    pub(crate) in_control: Option<usize>,
    pub(crate) cycle: CycleState,
    pub(crate) last_motor: Option<Vec<f32>>,
    pub(crate) t: u64,
    /// Present only between entering and leaving evaluation mode.
    pub(crate) saved_modes: Option<Vec<SensorimotorMode>>,
    pub(crate) recording: Option<ExperienceLog>,
    pub(crate) rng: ChaCha8Rng,
}

impl<E: Environment> Supervisor<E> {
    /// Standard six-module agent over `SpacePartition::standard`.
    pub fn new<F: ModuleFactory>(env: E, factory: F, cfg: SupervisorCfg) -> Result<Self> {
        let partition = SpacePartition::standard(env.motor_config().m_ndims);
        Self::with_layout(env, partition, &standard_modules(), factory, cfg)
    }

    /// Any partition and module list.
    pub fn with_layout<F: ModuleFactory>(
        env: E,
        partition: SpacePartition,
        specs: &[ModuleSpec],
        mut factory: F,
        cfg: SupervisorCfg,
    ) -> Result<Self> {
        let motor = env.motor_config();
        motor.validate()?;
        partition.validate()?;
        if motor.m_ndims != partition.motor().len() {
            return Err(SupervisorError::config(format!(
                "environment declares {} motor dims, partition has {}",
                motor.m_ndims,
                partition.motor().len()
            )));
        }
        if specs.is_empty() {
            return Err(SupervisorError::config("no learning modules declared"));
        }

        let mut modules = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());
        for spec in specs {
            let descriptor = ModuleDescriptor::resolve(spec, &partition)?;
            if index.contains_key(&descriptor.id) {
                return Err(SupervisorError::config(format!("duplicate module id `{}`", descriptor.id)));
            }
            let inner = factory
                .build(&descriptor, &motor)
                .map_err(|e| SupervisorError::module(&descriptor.id, e))?;
            index.insert(descriptor.id.clone(), modules.len());
            modules.push(BoundModule::new(descriptor, inner));
        }

        let usage = UsageCounters::with_ids(modules.iter().map(BoundModule::id));
        let rng = match cfg.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        info!(
            modules = modules.len(),
            m_ndims = motor.m_ndims,
            total_dims = partition.total_dims(),
            policy = ?cfg.policy,
            "babbling supervisor ready"
        );

        Ok(Self {
            env,
            cfg,
            motor,
            partition,
            modules,
            index,
            usage,
            interest_history: Vec::new(),
            in_control: None,
            cycle: CycleState::Idle,
            last_motor: None,
            t: 1,
            saved_modes: None,
            recording: None,
            rng,
        })
    }

    /// Rest posture motor parameters from the environment.
    pub fn rest_params(&self) -> Vec<f32> {
        self.env.rest_params()
    }
}

impl<E> Supervisor<E> {
    fn lookup(&self, module_id: &str) -> Result<usize> {
        self.index
            .get(module_id)
            .copied()
            .ok_or_else(|| SupervisorError::UnknownModule(module_id.to_string()))
    }

    /// Current interest of every module, in registry order.
    pub fn interests(&self) -> Vec<f32> {
        self.modules.iter().map(BoundModule::interest).collect()
    }

    /// Run the selection policy (configured one unless `policy` overrides it).
    pub fn choose_babbling_module(&mut self, policy: Option<BabblingPolicy>) -> Result<String> {
        let (idx, interests) = self.select(policy)?;
        self.commit_choice(idx, self.t, interests);
        Ok(self.modules[idx].id().to_string())
    }

    /// Pick a module without recording the decision.
    fn select(&mut self, policy: Option<BabblingPolicy>) -> Result<(usize, Vec<f32>)> {
        let policy = policy.unwrap_or(self.cfg.policy);
        let interests = self.interests();
        let idx = policy
            .choose(&interests, &mut self.rng)
            .ok_or_else(|| SupervisorError::config("no learning modules registered"))?;
        debug!(t = self.t, module = self.modules[idx].id(), ?policy, "babbling module chosen");
        Ok((idx, interests))
    }

    /// Count a decision taken at timestep `t` and keep its interests.
    fn commit_choice(&mut self, idx: usize, t: u64, interests: Vec<f32>) {
        self.usage.bump(self.modules[idx].id());
        if self.cfg.diagnostic_every > 0 && t % self.cfg.diagnostic_every == 0 {
            info!(
                t,
                interests = ?interests,
                chosen = ?self.usage.sorted(),
                "babbling diagnostics"
            );
        }
        self.interest_history.push(InterestSnapshot { t, interests });
    }

    /// Let the configured policy pick a module and produce a motor command.
    pub fn produce(&mut self, context: &[f32]) -> Result<Vec<f32>> {
        self.produce_selected(None, context)
    }

    /// Like `produce`, with a one-off policy.
    pub fn produce_with_policy(&mut self, policy: BabblingPolicy, context: &[f32]) -> Result<Vec<f32>> {
        self.produce_selected(Some(policy), context)
    }

    /// The decision only counts once the chosen module handed out a command.
    fn produce_selected(&mut self, policy: Option<BabblingPolicy>, context: &[f32]) -> Result<Vec<f32>> {
        let t = self.t;
        let (idx, interests) = self.select(policy)?;
        let m = self.produce_from(idx, context, true)?;
        self.commit_choice(idx, t, interests);
        Ok(m)
    }

    /// Produce from a named module, bypassing the policy.
    pub fn produce_with(&mut self, module_id: &str, context: &[f32]) -> Result<Vec<f32>> {
        let idx = self.lookup(module_id)?;
        self.produce_from(idx, context, self.cfg.credit_explicit_control)
    }

    /// Produce from the module bound to a sensory space (`s_hand`, `s_ball`, ...).
    pub fn produce_for_space(&mut self, space: &str, context: &[f32]) -> Result<Vec<f32>> {
        let idx = self
            .modules
            .iter()
            .position(|m| m.descriptor.sensory_space == space)
            .ok_or_else(|| SupervisorError::UnknownSpace(space.to_string()))?;
        self.produce_from(idx, context, self.cfg.credit_explicit_control)
    }

    fn produce_from(&mut self, idx: usize, context: &[f32], credit: bool) -> Result<Vec<f32>> {
        if self.cycle == CycleState::AwaitingPerception {
            warn!(t = self.t, "replacing a motor command that was never perceived");
        }
        let m = self.modules[idx].produce(context)?;
        self.check_motor(&m, "produced motor command")?;

        self.in_control = credit.then_some(idx);
        self.last_motor = Some(m.clone());
        self.cycle = CycleState::AwaitingPerception;
        self.t += 1;
        debug!(t = self.t, module = self.modules[idx].id(), credited = credit, "motor command produced");
        Ok(m)
    }

    /// Motor command expected to reach `goal` in a module's sensory space.
    ///
    /// The following perception updates models but credits no module.
    pub fn inverse(&mut self, module_id: &str, goal: &[f32], context: &[f32]) -> Result<Vec<f32>> {
        let idx = self.lookup(module_id)?;
        let m = self.modules[idx].inverse(goal, context)?;
        self.check_motor(&m, "inverse motor command")?;

        self.in_control = None;
        self.last_motor = Some(m.clone());
        self.cycle = CycleState::AwaitingPerception;
        debug!(t = self.t, module = module_id, "inverse query answered");
        Ok(m)
    }

    /// Feed back the sensory outcome of the last command.
    ///
    /// `motor_override` replaces the pending command (externally driven motion);
    /// no interest update follows an override.
    pub fn perceive(&mut self, sensory: &[f32], motor_override: Option<&[f32]>) -> Result<()> {
        if sensory.len() != self.partition.sensory_len() {
            return Err(SupervisorError::DimensionMismatch {
                what: "sensory observation",
                expected: self.partition.sensory_len(),
                got: sensory.len(),
            });
        }

        let (ms, controller) = match motor_override {
            Some(m) => {
                self.check_motor(m, "motor override")?;
                (compose(m, sensory), None)
            }
            None => {
                let m = match (self.cycle, self.last_motor.as_deref()) {
                    (CycleState::AwaitingPerception, Some(m)) => m,
                    _ => return Err(SupervisorError::NothingToPerceive),
                };
                (compose(m, sensory), self.in_control)
            }
        };

        self.cycle = CycleState::Idle;
        self.in_control = None;

        if let Some(log) = self.recording.as_mut() {
            let m_ndims = self.motor.m_ndims;
            let controller_id = controller.map(|i| self.modules[i].id());
            log.record(&ms[..m_ndims], sensory, controller_id);
        }

        self.update_sensorimotor_models(&ms)?;
        if let Some(idx) = controller {
            self.modules[idx].update_interest(&ms)?;
        }
        debug!(t = self.t, credited = ?controller.map(|i| self.modules[i].id()), "perception broadcast");
        Ok(())
    }

    /// Hand a flat `(motor, context, sensory)` pair to every module.
    pub fn update_sensorimotor_models(&mut self, ms: &[f32]) -> Result<()> {
        let expected = self.partition.total_dims();
        if ms.len() != expected {
            return Err(SupervisorError::DimensionMismatch {
                what: "motor-sensory pair",
                expected,
                got: ms.len(),
            });
        }
        for module in &mut self.modules {
            module.update_sensorimotor(ms)?;
        }
        Ok(())
    }

    fn check_motor(&self, m: &[f32], what: &'static str) -> Result<()> {
        if m.len() != self.motor.m_ndims {
            return Err(SupervisorError::DimensionMismatch {
                what,
                expected: self.motor.m_ndims,
                got: m.len(),
            });
        }
        Ok(())
    }

    /// Clamp a motor command into the environment's bounds.
    pub fn clamp_motor(&self, m: &[f32]) -> Vec<f32> {
        self.motor.clamp(m)
    }

    pub fn motor_slice<'a>(&self, ms: &'a [f32]) -> &'a [f32] {
        let end = self.partition.motor().end.min(ms.len());
        &ms[..end]
    }

    pub fn sensory_slice<'a>(&self, ms: &'a [f32]) -> &'a [f32] {
        let start = self.partition.motor().end.min(ms.len());
        &ms[start..]
    }

    pub fn compose(&self, m: &[f32], s: &[f32]) -> Vec<f32> {
        compose(m, s)
    }

    /// Start recording every perceived pair (replaces any running recording).
    pub fn start_recording(&mut self) {
        self.recording = Some(ExperienceLog::new());
    }

    /// Stop recording and hand back what was recorded.
    pub fn take_recording(&mut self) -> Option<ExperienceLog> {
        self.recording.take()
    }

    pub fn snapshot(&self) -> SupervisorSnapshot {
        SupervisorSnapshot {
            t: self.t,
            selection_counts: self.usage.sorted(),
            interest_history: self.interest_history.clone(),
        }
    }

    /// Restore timestep, counters and interest history into a fresh supervisor.
    ///
    /// Counters only ever grow, so a supervisor that already counted a
    /// decision or advanced its timestep is refused with `RestoreIntoUsed`.
    /// Counters for unknown modules are skipped; modules missing from the
    /// snapshot keep a zero count.
    pub fn restore(&mut self, snap: SupervisorSnapshot) -> Result<RestoreStats> {
        let selections = self.usage.total();
        if self.t != 1 || selections != 0 || !self.interest_history.is_empty() {
            return Err(SupervisorError::RestoreIntoUsed { t: self.t, selections });
        }
        let mut stats = RestoreStats::default();
        for (id, count) in &snap.selection_counts {
            if self.usage.set(id, *count) {
                stats.applied += 1;
            } else {
                warn!(module = %id, "snapshot names an unknown module, skipping");
                stats.skipped += 1;
            }
        }
        self.t = snap.t.max(1);
        self.interest_history = snap.interest_history;
        info!(t = self.t, applied = stats.applied, skipped = stats.skipped, "bookkeeping restored");
        Ok(stats)
    }

    #[inline]
    pub fn timestep(&self) -> u64 {
        self.t
    }

    pub fn cfg(&self) -> &SupervisorCfg {
        &self.cfg
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    pub fn partition(&self) -> &SpacePartition {
        &self.partition
    }

    pub fn motor_config(&self) -> &MotorConfig {
        &self.motor
    }

    /// Module ids in registry order.
    pub fn module_ids(&self) -> Vec<&str> {
        self.modules.iter().map(BoundModule::id).collect()
    }

    pub fn descriptor(&self, module_id: &str) -> Result<&ModuleDescriptor> {
        Ok(self.modules[self.lookup(module_id)?].descriptor())
    }

    pub fn module(&self, module_id: &str) -> Result<&dyn babbling_core::LearningModule> {
        Ok(self.modules[self.lookup(module_id)?].module())
    }

    pub fn module_mut(&mut self, module_id: &str) -> Result<&mut dyn babbling_core::LearningModule> {
        let idx = self.lookup(module_id)?;
        Ok(self.modules[idx].module_mut())
    }

    pub fn selection_counts(&self) -> &UsageCounters {
        &self.usage
    }

    pub fn interest_history(&self) -> &[InterestSnapshot] {
        &self.interest_history
    }

    /// Module credited with the next perception, if any.
    pub fn in_control(&self) -> Option<&str> {
        self.in_control.map(|i| self.modules[i].id())
    }

    pub fn last_motor(&self) -> Option<&[f32]> {
        self.last_motor.as_deref()
    }

    pub fn cycle_state(&self) -> CycleState {
        self.cycle
    }
}
