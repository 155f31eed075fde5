use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-module selection counters. Counts only ever go up during a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    counts: HashMap<String, u64>,
}

impl UsageCounters {
    pub fn with_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            counts: ids.into_iter().map(|id| (id.to_string(), 0)).collect(),
        }
    }

    #[inline]
    pub fn bump(&mut self, id: &str) {
        if let Some(c) = self.counts.get_mut(id) {
            *c += 1;
        } else {
            self.counts.insert(id.to_string(), 1);
        }
    }

    pub fn get(&self, id: &str) -> u64 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Overwrite a counter. Returns false if `id` was not tracked.
    pub fn set(&mut self, id: &str, count: u64) -> bool {
        match self.counts.get_mut(id) {
            Some(c) => {
                *c = count;
                true
            }
            None => false,
        }
    }

    /// Deterministic ordering: sorted by module id.
    pub fn sorted(&self) -> Vec<(String, u64)> {
        let mut out: Vec<(String, u64)> = self.counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

/// Interests of every module at one babbling decision, in registry order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterestSnapshot {
    pub t: u64,
    pub interests: Vec<f32>,
}
