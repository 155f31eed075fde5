//! Static layout of the flat `(motor, context, sensory)` vector.
//!
//! The flat vector always starts with the motor block, followed by the shared
//! context block, followed by named sensory groups. Observations handed to the
//! supervisor cover everything after the motor block.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SupervisorError};

/// Number of shared context dimensions in the standard layout.
pub const STANDARD_CONTEXT_DIMS: usize = 2;

/// Sensory groups of the standard layout, in flat-vector order.
pub const STANDARD_GROUPS: [(&str, usize); 6] = [
    ("s_hand", 30),
    ("s_joystick", 20),
    ("s_ergo", 20),
    ("s_ball", 20),
    ("s_light", 10),
    ("s_sound", 10),
];

/// Half-open index range `[start, end)` into the flat vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimRange {
    pub start: usize,
    pub end: usize,
}

impl DimRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn with_len(start: usize, len: usize) -> Self {
        Self { start, end: start + len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        idx >= self.start && idx < self.end
    }

    /// Empty ranges never overlap anything.
    #[inline]
    pub fn overlaps(&self, other: &DimRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    #[inline]
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensoryGroup {
    pub name: String,
    pub range: DimRange,
}

impl SensoryGroup {
    pub fn new(name: impl Into<String>, range: DimRange) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

/// Named slicing of the flat vector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacePartition {
    motor: DimRange,
    context: DimRange,
    groups: Vec<SensoryGroup>,
}

impl SpacePartition {
    /// Reference layout: `m_ndims` motor dims, two context dims, then the six
    /// standard sensory groups laid out back to back.
    pub fn standard(m_ndims: usize) -> Self {
        Self::lay_out(m_ndims, STANDARD_CONTEXT_DIMS, &STANDARD_GROUPS)
    }

    /// Lay out `groups` contiguously after `m_ndims` motor and `context_ndims` context dims.
    pub fn contiguous(m_ndims: usize, context_ndims: usize, groups: &[(&str, usize)]) -> Result<Self> {
        let p = Self::lay_out(m_ndims, context_ndims, groups);
        p.validate()?;
        Ok(p)
    }

    /// Build from explicit ranges. Overlaps and misplaced blocks are rejected.
    pub fn from_ranges(motor: DimRange, context: DimRange, groups: Vec<SensoryGroup>) -> Result<Self> {
        let p = Self {
            motor,
            context,
            groups,
        };
        p.validate()?;
        Ok(p)
    }

    fn lay_out(m_ndims: usize, context_ndims: usize, groups: &[(&str, usize)]) -> Self {
        let motor = DimRange::with_len(0, m_ndims);
        let context = DimRange::with_len(motor.end, context_ndims);
        let mut cursor = context.end;
        let groups = groups
            .iter()
            .map(|(name, len)| {
                let g = SensoryGroup::new(*name, DimRange::with_len(cursor, *len));
                cursor += len;
                g
            })
            .collect();
        Self {
            motor,
            context,
            groups,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.motor.start != 0 {
            return Err(SupervisorError::config(format!(
                "motor range must start at 0, starts at {}",
                self.motor.start
            )));
        }
        if self.motor.is_empty() {
            return Err(SupervisorError::config("motor space is empty"));
        }
        if self.context.start != self.motor.end {
            return Err(SupervisorError::config(format!(
                "context range must follow the motor range (expected start {}, got {})",
                self.motor.end, self.context.start
            )));
        }
        if self.groups.is_empty() {
            return Err(SupervisorError::config("no sensory groups declared"));
        }

        for (i, g) in self.groups.iter().enumerate() {
            if g.name.is_empty() {
                return Err(SupervisorError::config("sensory group with empty name"));
            }
            if g.range.is_empty() {
                return Err(SupervisorError::config(format!("sensory group `{}` is empty", g.name)));
            }
            if g.range.overlaps(&self.motor) || g.range.overlaps(&self.context) {
                return Err(SupervisorError::config(format!(
                    "sensory group `{}` overlaps the motor/context block",
                    g.name
                )));
            }
            for other in &self.groups[i + 1..] {
                if other.name == g.name {
                    return Err(SupervisorError::config(format!("duplicate sensory group `{}`", g.name)));
                }
                if other.range.overlaps(&g.range) {
                    return Err(SupervisorError::config(format!(
                        "sensory groups `{}` and `{}` overlap",
                        g.name, other.name
                    )));
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn motor(&self) -> DimRange {
        self.motor
    }

    #[inline]
    pub fn context(&self) -> DimRange {
        self.context
    }

    pub fn groups(&self) -> &[SensoryGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<DimRange> {
        self.groups.iter().find(|g| g.name == name).map(|g| g.range)
    }

    /// Length of the flat `(motor, context, sensory)` vector.
    pub fn total_dims(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.range.end)
            .chain([self.motor.end, self.context.end])
            .max()
            .unwrap_or(0)
    }

    /// Length of an observation: everything after the motor block.
    pub fn sensory_len(&self) -> usize {
        self.total_dims() - self.motor.len()
    }
}
