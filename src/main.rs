//! Tabular summary of the iris dataset.

use anyhow::Result;
use clean_stats::data::{
    calculate_column_mean, filter_by_category, find_column_max, load_data, preview, Value,
    DEFAULT_FILTER_LIMIT,
};

const IRIS_URL: &str = "https://raw.githubusercontent.com/mwaskom/seaborn-data/master/iris.csv";

fn main() -> Result<()> {
    env_logger::init();

    let dataset = load_data(IRIS_URL)?;

    let avg_sepal = calculate_column_mean(&dataset, "sepal_length")?;
    println!("Average sepal length: {avg_sepal:?}");

    let max_petal = find_column_max(&dataset, "petal_width")?;
    println!("Max petal width: {max_petal}");

    let setosa = filter_by_category(
        &dataset,
        "species",
        &Value::from("setosa"),
        DEFAULT_FILTER_LIMIT,
    )?;
    println!("\nSetosa species (first {DEFAULT_FILTER_LIMIT} rows):");
    println!("{}", preview::render(&setosa)?);

    Ok(())
}
