//! Range-limited integer draws used throughout generation and behavior.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Uniform-ish integer source over the half-open range `[min, max)`.
///
/// A draw is `floor(u * (max - 1 - min) + 0.5) + min` for `u` in `[0, 1)`.
/// The half-step rounding gives the two end values half the weight of the
/// interior values; callers depend on that distribution, so it is kept as is
/// instead of a plain `gen_range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedRandom {
    min: i32,
    max: i32,
}

impl BoundedRandom {
    /// # Panics
    ///
    /// Panics if `max <= min`.
    pub fn new(min: i32, max: i32) -> Self {
        assert!(max > min, "empty random range [{min}, {max})");
        Self { min, max }
    }

    /// Range `[0, max)`
    pub fn below(max: i32) -> Self {
        Self::new(0, max)
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let interval = (self.max - 1 - self.min) as f64;
        (rng.gen::<f64>() * interval + 0.5).floor() as i32 + self.min
    }
}
