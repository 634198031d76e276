//! Seeded randomness for track generation
//!
//! The spawner only ever draws through [`RandomSource`], so tests can feed
//! scripted values and replays stay bit-identical for a given seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Capability producing uniform values
pub trait RandomSource {
    /// Uniform float in `[min, max)` (returns `min` when the range is empty)
    fn range_f32(&mut self, min: f32, max: f32) -> f32;
    /// Uniform integer in `[min, max]`
    fn range_u32_inclusive(&mut self, min: u32, max: u32) -> u32;
    /// Uniform lane index in `[0, lane_count)`
    fn lane(&mut self, lane_count: u8) -> u8;
    /// Bernoulli draw with probability `p`
    fn chance(&mut self, p: f32) -> bool;
}

/// PCG-backed random source (serializable, so snapshots resume the stream)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimRng {
    seed: u64,
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this stream was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SimRng {
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    fn range_u32_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn lane(&mut self, lane_count: u8) -> u8 {
        if lane_count <= 1 {
            return 0;
        }
        self.rng.random_range(0..lane_count)
    }

    fn chance(&mut self, p: f32) -> bool {
        // random_bool panics outside [0, 1]
        self.rng.random_bool(p.clamp(0.0, 1.0) as f64)
    }
}

/// Random source replaying fixed values, for tests and scripted tracks
///
/// Each draw takes the next value from its own queue, cycling when exhausted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pub floats: Vec<f32>,
    pub ints: Vec<u32>,
    pub lanes: Vec<u8>,
    pub chances: Vec<bool>,
    cursor: [usize; 4],
}

impl ScriptedSource {
    pub fn new(floats: Vec<f32>, ints: Vec<u32>, lanes: Vec<u8>, chances: Vec<bool>) -> Self {
        Self {
            floats,
            ints,
            lanes,
            chances,
            cursor: [0; 4],
        }
    }

    fn next<T: Copy>(values: &[T], cursor: &mut usize) -> Option<T> {
        if values.is_empty() {
            return None;
        }
        let value = values[*cursor % values.len()];
        *cursor += 1;
        Some(value)
    }
}

impl RandomSource for ScriptedSource {
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        Self::next(&self.floats, &mut self.cursor[0])
            .unwrap_or(min)
            .clamp(min, max.max(min))
    }

    fn range_u32_inclusive(&mut self, min: u32, max: u32) -> u32 {
        Self::next(&self.ints, &mut self.cursor[1])
            .unwrap_or(min)
            .clamp(min, max.max(min))
    }

    fn lane(&mut self, lane_count: u8) -> u8 {
        Self::next(&self.lanes, &mut self.cursor[2]).unwrap_or(0) % lane_count.max(1)
    }

    fn chance(&mut self, _p: f32) -> bool {
        Self::next(&self.chances, &mut self.cursor[3]).unwrap_or(false)
    }
}
