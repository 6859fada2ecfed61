//! Random identifiers, bounded decimals and subset selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use drugsim_common::{FixedDecimal, Result, SimError};

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Source of every random value in a session.
///
/// `Some(seed)` gives reproducible sequences; `None` seeds from the OS.
#[derive(Debug)]
pub struct Randomizer {
    rng: StdRng,
}

impl Randomizer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// `length` uppercase base-36 characters.
    pub fn random_token(&mut self, length: usize) -> String {
        (0..length)
            .map(|_| BASE36_DIGITS[self.rng.gen_range(0..BASE36_DIGITS.len())] as char)
            .collect()
    }

    /// Uniform value in `[min, max)` truncated to `decimals` places.
    ///
    /// Truncation (not round-half-up) keeps the upper bound exclusive.
    pub fn random_in_range(&mut self, min: f64, max: f64, decimals: u8) -> Result<FixedDecimal> {
        if min.is_nan() || max.is_nan() || min >= max {
            return Err(SimError::InvalidArgument(format!(
                "empty range [{}, {})",
                min, max
            )));
        }
        let scale = 10f64.powi(decimals as i32);
        let raw = self.rng.gen_range(min..max);
        let mut value = ((raw * scale).floor() / scale).max(min);
        if value >= max {
            value = ((max * scale).ceil() - 1.0) / scale;
        }
        Ok(FixedDecimal::new(value, decimals))
    }

    /// `n` distinct elements of `items` in random order.
    ///
    /// Fisher-Yates over a copy, then truncated; `items` is left untouched.
    pub fn shuffle_and_take<T: Clone>(&mut self, items: &[T], n: usize) -> Result<Vec<T>> {
        if n > items.len() {
            return Err(SimError::InvalidArgument(format!(
                "cannot take {} of {} items",
                n,
                items.len()
            )));
        }
        let mut pool = items.to_vec();
        for i in (1..pool.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            pool.swap(i, j);
        }
        pool.truncate(n);
        Ok(pool)
    }

    /// Visual-only severity score in [0, 100] for radar charts.
    pub fn severity(&mut self) -> u8 {
        self.rng.gen_range(0..=100)
    }
}
