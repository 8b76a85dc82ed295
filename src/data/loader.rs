use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DataLoadError;
use super::model::{Commodity, Dataset, ProductionRecord};

/// Column names of the input (and export) format, in file order.
pub const STATE_COLUMN: &str = "State";
pub const YEAR_COLUMN: &str = "Year";
pub const COMMODITY_COLUMN: &str = "commodity";
pub const PRODUCTION_COLUMN: &str = "total_production";

pub const COLUMNS: [&str; 4] = [STATE_COLUMN, YEAR_COLUMN, COMMODITY_COLUMN, PRODUCTION_COLUMN];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the production dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` (or no extension) – header `State,Year,commodity,total_production`
/// * `.parquet` / `.pq`       – the same four columns, any castable types
pub fn load(path: &Path) -> Result<Dataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = match ext.as_str() {
        "csv" | "" => read_csv(file)?,
        "parquet" | "pq" => read_parquet(file)?,
        other => return Err(DataLoadError::UnsupportedExtension(other.to_string())),
    };

    let dataset = Dataset::from_records(records)?;
    log::info!(
        "Loaded {} records from {} ({} states, years {}-{})",
        dataset.len(),
        path.display(),
        dataset.states().len(),
        dataset.min_year(),
        dataset.max_year()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Parse production records from CSV text.
///
/// Columns are located by header name, so their order does not matter and
/// extra columns are ignored.
pub fn read_csv<R: Read>(input: R) -> Result<Vec<ProductionRecord>, DataLoadError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let position = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(DataLoadError::MissingColumn(name))
    };
    let state_idx = position(STATE_COLUMN)?;
    let year_idx = position(YEAR_COLUMN)?;
    let commodity_idx = position(COMMODITY_COLUMN)?;
    let production_idx = position(PRODUCTION_COLUMN)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        records.push(parse_row(
            i + 1,
            cell(state_idx),
            cell(year_idx),
            cell(commodity_idx),
            Some(cell(production_idx)),
        )?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Parse production records from a Parquet file.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): every required column is cast to text
/// and validated exactly like a CSV cell, so integer or float years and
/// integer or float production values are all accepted.
fn read_parquet(file: File) -> Result<Vec<ProductionRecord>, DataLoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let mut columns = Vec::with_capacity(COLUMNS.len());
        for name in COLUMNS {
            let idx = schema
                .index_of(name)
                .map_err(|_| DataLoadError::MissingColumn(name))?;
            columns.push(cast(batch.column(idx).as_ref(), &DataType::Utf8)?);
        }
        let state = columns[0].as_string::<i32>();
        let year = columns[1].as_string::<i32>();
        let commodity = columns[2].as_string::<i32>();
        let production = columns[3].as_string::<i32>();

        for row in 0..batch.num_rows() {
            let production_cell = (!production.is_null(row)).then(|| production.value(row));
            records.push(parse_row(
                records.len() + 1,
                text_at(state, row),
                text_at(year, row),
                text_at(commodity, row),
                production_cell,
            )?);
        }
    }

    Ok(records)
}

/// Nulls read as empty cells.
fn text_at(arr: &StringArray, row: usize) -> &str {
    if arr.is_null(row) {
        ""
    } else {
        arr.value(row)
    }
}

// ---------------------------------------------------------------------------
// Cell validation shared by both readers
// ---------------------------------------------------------------------------

fn parse_row(
    row: usize,
    state: &str,
    year: &str,
    commodity: &str,
    production: Option<&str>,
) -> Result<ProductionRecord, DataLoadError> {
    if state.trim().is_empty() {
        return Err(DataLoadError::EmptyState { row });
    }
    let year = parse_year(row, year)?;
    let commodity: Commodity =
        commodity
            .parse()
            .map_err(|_| DataLoadError::UnknownCommodity {
                row,
                value: commodity.to_string(),
            })?;
    let production = match production {
        Some(cell) => parse_production(row, cell)?,
        None => None,
    };
    Ok(ProductionRecord::new(state, year, commodity, production))
}

/// Years must be integral; `2020.0` is accepted since float-typed year
/// columns are common in exported dataframes.
fn parse_year(row: usize, raw: &str) -> Result<i32, DataLoadError> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Ok(year);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 => {
            Ok(v as i32)
        }
        _ => Err(DataLoadError::InvalidYear {
            row,
            value: raw.to_string(),
        }),
    }
}

fn parse_production(row: usize, raw: &str) -> Result<Option<f64>, DataLoadError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let invalid = || DataLoadError::InvalidProduction {
        row,
        value: raw.to_string(),
    };
    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if value.is_nan() {
        return Ok(None);
    }
    if value < 0.0 || value.is_infinite() {
        return Err(invalid());
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(tmp, "{}", content).unwrap();
        tmp
    }

    #[test]
    fn loads_csv_and_normalizes_fields() {
        let tmp = csv_file(
            "State,Year,commodity,total_production\n\
             california,2020,Milk,100\n\
             TEXAS,2021.0,Honey,\n\
             Texas ,2019,Yogurt,12.5\n",
        );
        let ds = load(tmp.path()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.states(), ["CALIFORNIA", "TEXAS"]);
        assert_eq!(ds.min_year(), 2019);
        assert_eq!(ds.max_year(), 2021);
        assert_eq!(
            ds.records()[1],
            ProductionRecord::new("TEXAS", 2021, Commodity::Honey, None)
        );
        assert_eq!(ds.records()[2].production, Some(12.5));
    }

    #[test]
    fn column_order_is_irrelevant_and_extra_columns_ignored() {
        let records = read_csv(
            "commodity,extra,total_production,Year,State\nCheese,x,5,2000,OHIO\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(
            records,
            vec![ProductionRecord::new("OHIO", 2000, Commodity::Cheese, Some(5.0))]
        );
    }

    #[test]
    fn nan_production_is_absent() {
        let records =
            read_csv("State,Year,commodity,total_production\nOHIO,2000,Milk,NaN\n".as_bytes())
                .unwrap();
        assert_eq!(records[0].production, None);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_csv("State,Year,commodity\nOHIO,2000,Milk\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn("total_production")));
    }

    #[test]
    fn non_integral_year_is_rejected() {
        let err = read_csv(
            "State,Year,commodity,total_production\nOHIO,2000,Milk,1\nOHIO,2000.5,Milk,1\n"
                .as_bytes(),
        )
        .unwrap_err();
        match err {
            DataLoadError::InvalidYear { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "2000.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_commodity_is_rejected() {
        let err = read_csv("State,Year,commodity,total_production\nOHIO,2000,Butter,1\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataLoadError::UnknownCommodity { row: 1, .. }));
    }

    #[test]
    fn negative_or_text_production_is_rejected() {
        for bad in ["-3", "lots"] {
            let csv = format!("State,Year,commodity,total_production\nOHIO,2000,Milk,{bad}\n");
            let err = read_csv(csv.as_bytes()).unwrap_err();
            assert!(matches!(err, DataLoadError::InvalidProduction { .. }), "{bad}");
        }
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let err = read_csv("State,Year,commodity,total_production\nOHIO,2000\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataLoadError::Csv(_)));
    }

    #[test]
    fn header_only_file_is_empty() {
        let tmp = csv_file("State,Year,commodity,total_production\n");
        assert!(matches!(load(tmp.path()), Err(DataLoadError::Empty)));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let tmp = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        assert!(matches!(
            load(tmp.path()),
            Err(DataLoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn loads_parquet_with_numeric_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("State", DataType::Utf8, false),
            Field::new("Year", DataType::Int64, false),
            Field::new("commodity", DataType::Utf8, false),
            Field::new("total_production", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["WISCONSIN", "VERMONT"])),
                Arc::new(Int64Array::from(vec![2022, 2023])),
                Arc::new(StringArray::from(vec!["Cheese", "Honey"])),
                Arc::new(Float64Array::from(vec![Some(250.5), None])),
            ],
        )
        .unwrap();

        let tmp = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(tmp.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load(tmp.path()).unwrap();
        assert_eq!(
            ds.records(),
            [
                ProductionRecord::new("WISCONSIN", 2022, Commodity::Cheese, Some(250.5)),
                ProductionRecord::new("VERMONT", 2023, Commodity::Honey, None),
            ]
        );
    }
}
