//! CSV export of the filtered table rows.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::loader::COLUMNS;
use crate::data::model::{Commodity, ProductionRecord};

/// File name offered by the save dialog.
pub const EXPORT_FILE_NAME: &str = "usda_production_filtered_data.csv";

/// One exported line; field order matches [`COLUMNS`].
#[derive(Serialize)]
struct ExportRow<'a> {
    state: &'a str,
    year: i32,
    commodity: Commodity,
    total_production: Option<f64>,
}

/// Serialize rows to CSV bytes, preserving their order.
///
/// The header is always written, even when there are no rows.
pub fn to_csv(rows: &[ProductionRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for rec in rows {
        writer.serialize(ExportRow {
            state: &rec.state,
            year: rec.year,
            commodity: rec.commodity,
            total_production: rec.production,
        })?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// A ready-to-save export.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("writing export to {}", path.display()))?;
        log::info!("Exported {} bytes to {}", self.bytes.len(), path.display());
        Ok(())
    }
}

/// Produce a download only when the export action actually fired.
pub fn download(triggered: bool, rows: &[ProductionRecord]) -> Result<Option<Download>, csv::Error> {
    if !triggered {
        return Ok(None);
    }
    Ok(Some(Download {
        file_name: EXPORT_FILE_NAME,
        bytes: to_csv(rows)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn rows() -> Vec<ProductionRecord> {
        vec![
            ProductionRecord::new("CALIFORNIA", 2021, Commodity::Milk, Some(200.0)),
            ProductionRecord::new("CALIFORNIA", 2020, Commodity::Milk, Some(100.5)),
            ProductionRecord::new("NEW YORK", 2020, Commodity::Yogurt, Some(1234567.0)),
        ]
    }

    #[test]
    fn writes_header_and_rows_in_order() {
        let text = String::from_utf8(to_csv(&rows()).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "State,Year,commodity,total_production");
        assert_eq!(lines[1], "CALIFORNIA,2021,Milk,200.0");
        assert_eq!(lines[2], "CALIFORNIA,2020,Milk,100.5");
        assert_eq!(lines[3], "NEW YORK,2020,Yogurt,1234567.0");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn empty_export_still_has_header() {
        let text = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "State,Year,commodity,total_production\n");
    }

    #[test]
    fn export_round_trips_through_the_loader() {
        let bytes = to_csv(&rows()).unwrap();
        assert_eq!(read_csv(bytes.as_slice()).unwrap(), rows());
    }

    #[test]
    fn download_is_a_no_op_unless_triggered() {
        assert_eq!(download(false, &rows()).unwrap(), None);

        let dl = download(true, &rows()).unwrap().unwrap();
        assert_eq!(dl.file_name, "usda_production_filtered_data.csv");
        assert_eq!(dl.bytes, to_csv(&rows()).unwrap());
    }

    #[test]
    fn download_writes_bytes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        let dl = download(true, &rows()).unwrap().unwrap();
        dl.write_to(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), dl.bytes);
    }
}
