//! Summary statistics over a sequence of random integers.

use rand::distr::{Distribution, Uniform};
use rand::Rng;
use thiserror::Error;

/// How many numbers the demo draws.
pub const DEFAULT_COUNT: usize = 10;
pub const DEFAULT_LOWER: i64 = 1;
pub const DEFAULT_UPPER: i64 = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumbersError {
    #[error("List of numbers cannot be empty")]
    EmptyInput,
    #[error("Invalid range: lower bound {lower} is greater than upper bound {upper}")]
    InvalidRange { lower: i64, upper: i64 },
}

/// Draw `count` integers uniformly from `[lower, upper]` with the
/// thread-local RNG.
pub fn generate_numbers(count: usize, lower: i64, upper: i64) -> Result<Vec<i64>, NumbersError> {
    generate_numbers_with(&mut rand::rng(), count, lower, upper)
}

/// Same as [`generate_numbers`] but with a caller-supplied RNG.
///
/// A `count` of zero always yields an empty sequence, even for an inverted
/// range.
pub fn generate_numbers_with<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    lower: i64,
    upper: i64,
) -> Result<Vec<i64>, NumbersError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let dist = Uniform::new_inclusive(lower, upper)
        .map_err(|_| NumbersError::InvalidRange { lower, upper })?;

    let numbers: Vec<i64> = (0..count).map(|_| dist.sample(rng)).collect();
    log::debug!("generated {count} numbers in [{lower}, {upper}]");
    Ok(numbers)
}

/// Arithmetic mean of `numbers`.
pub fn calculate_average(numbers: &[i64]) -> Result<f64, NumbersError> {
    if numbers.is_empty() {
        return Err(NumbersError::EmptyInput);
    }
    // i128 holds the sum of any i64 slice that fits in memory.
    let total: i128 = numbers.iter().map(|&n| n as i128).sum();
    Ok(total as f64 / numbers.len() as f64)
}

/// Largest element of `numbers`.
pub fn find_max(numbers: &[i64]) -> Result<i64, NumbersError> {
    numbers.iter().copied().max().ok_or(NumbersError::EmptyInput)
}
