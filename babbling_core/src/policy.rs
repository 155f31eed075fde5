//! Babbling-module selection policies.
//!
//! Every policy is a pure function of the interest vector (registry order) and
//! an RNG, returning the index of the chosen module.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EPSILON: f32 = 0.2;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BabblingPolicy {
    /// Uniform over modules; interests are ignored.
    Random,
    /// Uniform with probability `epsilon`, otherwise the most interesting module.
    GreedyEpsilon { epsilon: f32 },
    /// Boltzmann sampling over interests.
    Softmax { temperature: f32 },
    /// Uniform with probability `epsilon`, otherwise proportional to interest.
    ProportionalEpsilon { epsilon: f32 },
}

impl Default for BabblingPolicy {
    fn default() -> Self {
        Self::proportional()
    }
}

impl BabblingPolicy {
    pub fn greedy() -> Self {
        Self::GreedyEpsilon {
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn softmax() -> Self {
        Self::Softmax {
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn proportional() -> Self {
        Self::ProportionalEpsilon {
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Pick a module index. `None` only when `interests` is empty.
    pub fn choose<R: Rng + ?Sized>(&self, interests: &[f32], rng: &mut R) -> Option<usize> {
        if interests.is_empty() {
            return None;
        }
        let idx = match *self {
            Self::Random => choose_random(interests.len(), rng),
            Self::GreedyEpsilon { epsilon } => choose_greedy(interests, epsilon, rng),
            Self::Softmax { temperature } => choose_softmax(interests, temperature, rng),
            Self::ProportionalEpsilon { epsilon } => choose_proportional(interests, epsilon, rng),
        };
        Some(idx)
    }
}

#[inline]
fn explore<R: Rng + ?Sized>(epsilon: f32, rng: &mut R) -> bool {
    epsilon > 0.0 && rng.gen::<f32>() < epsilon
}

pub fn choose_random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> usize {
    rng.gen_range(0..n)
}

/// Index of the strictly largest finite interest; ties go to the first one.
pub fn argmax_first(interests: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &x) in interests.iter().enumerate() {
        if !x.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if x <= b => {}
            _ => best = Some((i, x)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn choose_greedy<R: Rng + ?Sized>(interests: &[f32], epsilon: f32, rng: &mut R) -> usize {
    if explore(epsilon, rng) {
        return choose_random(interests.len(), rng);
    }
    match argmax_first(interests) {
        Some(i) => i,
        None => choose_random(interests.len(), rng),
    }
}

/// Softmax weights, shifted by the maximum before exponentiation.
///
/// Non-finite interests get zero weight. A non-positive temperature degenerates
/// to a one-hot vector on the greedy choice.
pub fn softmax_weights(interests: &[f32], temperature: f32) -> Vec<f64> {
    let max = interests
        .iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return vec![0.0; interests.len()];
    }

    if !(temperature.is_finite() && temperature > 0.0) {
        let best = argmax_first(interests);
        return (0..interests.len())
            .map(|i| if Some(i) == best { 1.0 } else { 0.0 })
            .collect();
    }

    let t = temperature as f64;
    interests
        .iter()
        .map(|&x| {
            if x.is_finite() {
                ((x as f64 - max as f64) / t).exp()
            } else {
                0.0
            }
        })
        .collect()
}

pub fn choose_softmax<R: Rng + ?Sized>(interests: &[f32], temperature: f32, rng: &mut R) -> usize {
    let w = softmax_weights(interests, temperature);
    sample_or_uniform(&w, rng)
}

/// Proportional weights: negative and non-finite interests clamp to zero.
pub fn proportional_weights(interests: &[f32]) -> Vec<f64> {
    interests
        .iter()
        .map(|&x| if x.is_finite() && x > 0.0 { x as f64 } else { 0.0 })
        .collect()
}

pub fn choose_proportional<R: Rng + ?Sized>(interests: &[f32], epsilon: f32, rng: &mut R) -> usize {
    if explore(epsilon, rng) {
        return choose_random(interests.len(), rng);
    }
    let w = proportional_weights(interests);
    sample_or_uniform(&w, rng)
}

/// Sample an index proportional to `w`; uniform when no weight is positive.
fn sample_or_uniform<R: Rng + ?Sized>(w: &[f64], rng: &mut R) -> usize {
    match WeightedIndex::new(w) {
        Ok(dist) => dist.sample(rng),
        Err(_) => choose_random(w.len(), rng),
    }
}
