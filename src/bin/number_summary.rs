//! Summary of a freshly generated random sequence.

use anyhow::Result;
use clean_stats::numbers::{
    calculate_average, find_max, generate_numbers, DEFAULT_COUNT, DEFAULT_LOWER, DEFAULT_UPPER,
};

fn main() -> Result<()> {
    env_logger::init();

    let nums = generate_numbers(DEFAULT_COUNT, DEFAULT_LOWER, DEFAULT_UPPER)?;
    println!("Generated numbers: {nums:?}");
    println!("Average: {:?}", calculate_average(&nums)?);
    println!("Max: {}", find_max(&nums)?);

    Ok(())
}
