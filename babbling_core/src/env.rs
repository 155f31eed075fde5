use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SupervisorError};

/// Motor dimensionality and per-dimension bounds declared by the environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotorConfig {
    pub m_ndims: usize,
    pub m_mins: Vec<f32>,
    pub m_maxs: Vec<f32>,
}

impl MotorConfig {
    /// Every dim bounded by `[min, max]`.
    pub fn uniform(m_ndims: usize, min: f32, max: f32) -> Self {
        Self {
            m_ndims,
            m_mins: vec![min; m_ndims],
            m_maxs: vec![max; m_ndims],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.m_mins.len() != self.m_ndims || self.m_maxs.len() != self.m_ndims {
            return Err(SupervisorError::config(format!(
                "motor bounds must have {} entries (mins: {}, maxs: {})",
                self.m_ndims,
                self.m_mins.len(),
                self.m_maxs.len()
            )));
        }
        for (i, (lo, hi)) in self.m_mins.iter().zip(&self.m_maxs).enumerate() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(SupervisorError::config(format!("motor dim {i}: invalid bounds [{lo}, {hi}]")));
            }
        }
        Ok(())
    }

    /// Clamp a motor command into the declared bounds.
    pub fn clamp(&self, m: &[f32]) -> Vec<f32> {
        m.iter()
            .zip(self.m_mins.iter().zip(&self.m_maxs))
            .map(|(&x, (&lo, &hi))| x.max(lo).min(hi))
            .collect()
    }
}

/// The world the agent acts in, as far as the supervisor needs to know it.
///
/// Executing commands and reading sensors is left to the driving loop.
pub trait Environment {
    fn motor_config(&self) -> MotorConfig;

    /// Motor parameters of the rest posture.
    fn rest_params(&self) -> Vec<f32>;
}

impl<T: Environment + ?Sized> Environment for &T {
    fn motor_config(&self) -> MotorConfig {
        (**self).motor_config()
    }

    fn rest_params(&self) -> Vec<f32> {
        (**self).rest_params()
    }
}

impl<T: Environment + ?Sized> Environment for Box<T> {
    fn motor_config(&self) -> MotorConfig {
        (**self).motor_config()
    }

    fn rest_params(&self) -> Vec<f32> {
        (**self).rest_params()
    }
}

impl<T: Environment + ?Sized> Environment for Arc<T> {
    fn motor_config(&self) -> MotorConfig {
        (**self).motor_config()
    }

    fn rest_params(&self) -> Vec<f32> {
        (**self).rest_params()
    }
}
