use serde::{Deserialize, Serialize};

/// One recorded `(motor, sensory)` pair.
///
/// `sensory` is a full observation (context + all sensory groups), the same
/// shape `perceive` takes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub motor: Vec<f32>,
    pub sensory: Vec<f32>,
    /// Module that was in control when the pair was produced, if any.
    pub controller: Option<String>,
}

impl Experience {
    pub fn new(motor: Vec<f32>, sensory: Vec<f32>) -> Self {
        Self {
            motor,
            sensory,
            controller: None,
        }
    }

    pub fn with_controller(mut self, id: impl Into<String>) -> Self {
        self.controller = Some(id.into());
        self
    }

    /// Flat `(motor, context, sensory)` vector.
    pub fn flat(&self) -> Vec<f32> {
        let mut ms = Vec::with_capacity(self.motor.len() + self.sensory.len());
        ms.extend_from_slice(&self.motor);
        ms.extend_from_slice(&self.sensory);
        ms
    }
}

/// Ordered trajectory of experiences. Replay walks it front to back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceLog {
    pub entries: Vec<Experience>,
}

impl ExperienceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, e: Experience) {
        self.entries.push(e);
    }

    pub fn record(&mut self, motor: &[f32], sensory: &[f32], controller: Option<&str>) {
        self.entries.push(Experience {
            motor: motor.to_vec(),
            sensory: sensory.to_vec(),
            controller: controller.map(str::to_string),
        });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Experience> {
        self.entries.iter()
    }
}

impl FromIterator<Experience> for ExperienceLog {
    fn from_iter<I: IntoIterator<Item = Experience>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ExperienceLog {
    type Item = &'a Experience;
    type IntoIter = std::slice::Iter<'a, Experience>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
