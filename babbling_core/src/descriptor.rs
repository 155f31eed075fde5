use serde::{Deserialize, Serialize};

use crate::error::{Result, SupervisorError};
use crate::space::{DimRange, SpacePartition};

/// Context dimensions a module conditions on, by index into the context vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextSpec {
    pub dims: Vec<usize>,
    /// Sensory bounds of each declared context dim, in `dims` order.
    pub sensory_mins: Vec<f32>,
    pub sensory_maxs: Vec<f32>,
}

impl ContextSpec {
    pub fn new(dims: Vec<usize>, sensory_mins: Vec<f32>, sensory_maxs: Vec<f32>) -> Self {
        Self {
            dims,
            sensory_mins,
            sensory_maxs,
        }
    }

    /// First `n` context dims, all bounded by `[min, max]`.
    pub fn prefix(n: usize, min: f32, max: f32) -> Self {
        Self {
            dims: (0..n).collect(),
            sensory_mins: vec![min; n],
            sensory_maxs: vec![max; n],
        }
    }

    #[inline]
    pub fn n_dims(&self) -> usize {
        self.dims.len()
    }

    /// Gather the declared dims out of a full context vector.
    pub fn slice(&self, context: &[f32]) -> Result<Vec<f32>> {
        let needed = self.dims.iter().max().map(|d| d + 1).unwrap_or(0);
        if context.len() < needed {
            return Err(SupervisorError::DimensionMismatch {
                what: "context",
                expected: needed,
                got: context.len(),
            });
        }
        Ok(self.dims.iter().map(|&d| context[d]).collect())
    }
}

/// Declaration of a learning module before it is bound to a partition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub id: String,
    pub sensory_space: String,
    pub context: Option<ContextSpec>,
}

impl ModuleSpec {
    pub fn new(id: impl Into<String>, sensory_space: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sensory_space: sensory_space.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: ContextSpec) -> Self {
        self.context = Some(context);
        self
    }
}

/// The six modules of the reference agent.
///
/// Hand and joystick are unconditioned; the arm conditions on the first
/// context dim; ball, light and sound condition on both.
pub fn standard_modules() -> Vec<ModuleSpec> {
    vec![
        ModuleSpec::new("mod1", "s_hand"),
        ModuleSpec::new("mod2", "s_joystick"),
        ModuleSpec::new("mod3", "s_ergo").with_context(ContextSpec::prefix(1, -1.0, 1.0)),
        ModuleSpec::new("mod4", "s_ball").with_context(ContextSpec::prefix(2, -1.0, 1.0)),
        ModuleSpec::new("mod5", "s_light").with_context(ContextSpec::prefix(2, -1.0, 1.0)),
        ModuleSpec::new("mod6", "s_sound").with_context(ContextSpec::prefix(2, -1.0, 1.0)),
    ]
}

/// A module spec resolved against a partition.
///
/// `sensory_dims` are flat-vector indices: the module's context dims first,
/// then its sensory group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub id: String,
    pub sensory_space: String,
    pub motor: DimRange,
    pub sensory_dims: Vec<usize>,
    pub context: Option<ContextSpec>,
}

impl ModuleDescriptor {
    pub fn resolve(spec: &ModuleSpec, partition: &SpacePartition) -> Result<Self> {
        if spec.id.is_empty() {
            return Err(SupervisorError::config("module with empty id"));
        }
        let group = partition.group(&spec.sensory_space).ok_or_else(|| {
            SupervisorError::config(format!(
                "module `{}` names unknown sensory space `{}`",
                spec.id, spec.sensory_space
            ))
        })?;

        let ctx_range = partition.context();
        let mut sensory_dims = Vec::new();
        if let Some(ctx) = &spec.context {
            if ctx.sensory_mins.len() != ctx.n_dims() || ctx.sensory_maxs.len() != ctx.n_dims() {
                return Err(SupervisorError::config(format!(
                    "module `{}`: context bounds must have one entry per context dim",
                    spec.id
                )));
            }
            for (i, &d) in ctx.dims.iter().enumerate() {
                if d >= ctx_range.len() {
                    return Err(SupervisorError::config(format!(
                        "module `{}`: context dim {} outside the {} shared context dims",
                        spec.id,
                        d,
                        ctx_range.len()
                    )));
                }
                if ctx.dims[..i].contains(&d) {
                    return Err(SupervisorError::config(format!(
                        "module `{}`: context dim {} declared twice",
                        spec.id, d
                    )));
                }
                let (lo, hi) = (ctx.sensory_mins[i], ctx.sensory_maxs[i]);
                if lo.is_nan() || hi.is_nan() || lo > hi {
                    return Err(SupervisorError::config(format!(
                        "module `{}`: context dim {} has invalid bounds [{}, {}]",
                        spec.id, d, lo, hi
                    )));
                }
                sensory_dims.push(ctx_range.start + d);
            }
        }
        sensory_dims.extend(group.indices());

        Ok(Self {
            id: spec.id.clone(),
            sensory_space: spec.sensory_space.clone(),
            motor: partition.motor(),
            sensory_dims,
            context: spec.context.clone(),
        })
    }

    #[inline]
    pub fn m_ndims(&self) -> usize {
        self.motor.len()
    }

    #[inline]
    pub fn s_ndims(&self) -> usize {
        self.sensory_dims.len()
    }

    pub fn context_ndims(&self) -> usize {
        self.context.as_ref().map_or(0, ContextSpec::n_dims)
    }

    /// Motor slice of a flat pair.
    pub fn motor_of(&self, ms: &[f32]) -> Result<Vec<f32>> {
        ms.get(self.motor.indices())
            .map(<[f32]>::to_vec)
            .ok_or(SupervisorError::DimensionMismatch {
                what: "motor-sensory pair",
                expected: self.motor.end,
                got: ms.len(),
            })
    }

    /// Sensory slice of a flat pair, context prefix first.
    pub fn sensory_of(&self, ms: &[f32]) -> Result<Vec<f32>> {
        self.sensory_dims
            .iter()
            .map(|&i| {
                ms.get(i).copied().ok_or(SupervisorError::DimensionMismatch {
                    what: "motor-sensory pair",
                    expected: i + 1,
                    got: ms.len(),
                })
            })
            .collect()
    }

    /// The module's slice of a context vector; `None` for unconditioned modules.
    pub fn context_of(&self, context: &[f32]) -> Result<Option<Vec<f32>>> {
        self.context.as_ref().map(|c| c.slice(context)).transpose()
    }
}
