use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// (state, relative size of its dairy and honey sectors)
const STATES: [(&str, f64); 12] = [
    ("CALIFORNIA", 9.0),
    ("WISCONSIN", 7.5),
    ("NEW YORK", 5.0),
    ("IDAHO", 4.0),
    ("TEXAS", 4.5),
    ("PENNSYLVANIA", 3.5),
    ("MINNESOTA", 3.0),
    ("MICHIGAN", 3.2),
    ("NORTH DAKOTA", 2.8),
    ("FLORIDA", 1.5),
    ("VERMONT", 1.2),
    ("HAWAII", 0.4),
];

/// (commodity, first year reported, last year reported, base value in USD)
const COMMODITIES: [(&str, i64, i64, f64); 5] = [
    ("Cheese", 1930, 2023, 2.0e6),
    ("Coffee", 1950, 2023, 1.5e6),
    ("Honey", 1930, 2022, 4.0e5),
    ("Milk", 1930, 2023, 8.0e6),
    ("Yogurt", 1980, 2023, 6.0e5),
];

struct Row {
    state: &'static str,
    year: i64,
    commodity: &'static str,
    production: Option<f64>,
}

fn generate(rng: &mut StdRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(state, size) in &STATES {
        for &(commodity, first, last, base) in &COMMODITIES {
            // Only Hawaii grows coffee.
            if commodity == "Coffee" && state != "HAWAII" {
                continue;
            }
            for year in first..=last {
                let growth = 1.0 + (year - first) as f64 * 0.03;
                let noise: f64 = rng.gen_range(0.85..1.15);
                let production = if rng.gen_bool(0.04) {
                    None
                } else {
                    Some((base * size * growth * noise).round())
                };
                rows.push(Row {
                    state,
                    year,
                    commodity,
                    production,
                });
            }
        }
    }
    rows
}

fn write_csv(path: &PathBuf, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating output CSV")?;
    writer.write_record(["State", "Year", "commodity", "total_production"])?;
    for row in rows {
        let year = row.year.to_string();
        let production = row.production.map(|v| v.to_string()).unwrap_or_default();
        writer.write_record([row.state, year.as_str(), row.commodity, production.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &PathBuf, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("State", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("commodity", DataType::Utf8, false),
        Field::new("total_production", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.state))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.commodity))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.production))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_usda_production.csv"));

    let mut rng = StdRng::seed_from_u64(42);
    let rows = generate(&mut rng);

    let is_parquet = output_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&output_path, &rows)?;
    } else {
        write_csv(&output_path, &rows)?;
    }

    println!("Wrote {} production records to {}", rows.len(), output_path.display());
    Ok(())
}
