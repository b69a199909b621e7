//! Report table and spreadsheet emission.
//!
//! The report is built in memory during the window loop and written once at
//! the end. Every cell, numbers included, is stored as a string.

use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::model::{MetricSample, ReportError};

pub const SHEET_NAME: &str = "Sheet1";

pub const DEFAULT_OUTPUT_PATH: &str = "ProverPowerCalculator.xlsx";

/// Column headers; "BJ" marks the local-time columns.
pub const HEADER: [&str; 5] = ["start_time", "start_time_BJ", "end_time", "end_time_BJ", "power"];

/// One data row, already rendered to cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub start_time: String,
    pub start_time_bj: String,
    pub end_time: String,
    pub end_time_bj: String,
    pub power: String,
}

impl ReportRow {
    pub fn from_sample(sample: &MetricSample) -> Self {
        let window = &sample.window;
        Self {
            start_time: window.start_epoch().to_string(),
            start_time_bj: window.start_local(),
            end_time: window.end_epoch().to_string(),
            end_time_bj: window.end_local(),
            power: format!("{:.6}", sample.power),
        }
    }

    pub fn cells(&self) -> [&str; 5] {
        [
            &self.start_time,
            &self.start_time_bj,
            &self.end_time,
            &self.end_time_bj,
            &self.power,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: &MetricSample) {
        self.rows.push(ReportRow::from_sample(sample));
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes header plus rows to `path`, replacing any existing file.
    pub fn write_xlsx(&self, path: &Path) -> Result<(), ReportError> {
        self.build_and_save(path).map_err(|source| ReportError::Xlsx {
            path: path.display().to_string(),
            source,
        })
    }

    fn build_and_save(&self, path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, title) in HEADER.iter().enumerate() {
            sheet.write_string(0, col as u16, *title)?;
        }
        for (i, row) in self.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, value) in row.cells().iter().enumerate() {
                sheet.write_string(r, col as u16, *value)?;
            }
        }

        workbook.save(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HourlyWindow;
    use calamine::{Reader, Xlsx, open_workbook};
    use chrono::TimeZone;
    use chrono_tz::Asia::Shanghai;

    fn sample(hour: u32, power: f64) -> MetricSample {
        let start = Shanghai.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap();
        MetricSample {
            window: HourlyWindow::starting_at(start),
            power,
        }
    }

    fn read_sheet(path: &Path) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook(path).expect("report should open");
        let range = workbook
            .worksheet_range(SHEET_NAME)
            .expect("Sheet1 should exist");
        range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_row_from_sample_formats_all_cells() {
        let row = ReportRow::from_sample(&sample(0, 12.5));
        assert_eq!(
            row.cells(),
            [
                "1704038400",
                "2024-01-01 00:00:00",
                "1704042000",
                "2024-01-01 01:00:00",
                "12.500000",
            ]
        );
    }

    #[test]
    fn test_power_uses_six_decimal_fixed_point() {
        assert_eq!(ReportRow::from_sample(&sample(0, 0.0)).power, "0.000000");
        assert_eq!(ReportRow::from_sample(&sample(0, 1.0 / 3.0)).power, "0.333333");
        assert_eq!(ReportRow::from_sample(&sample(0, 1e7)).power, "10000000.000000");
    }

    #[test]
    fn test_empty_report_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_PATH);

        Report::new().write_xlsx(&path).expect("save should succeed");

        let rows = read_sheet(&path);
        assert_eq!(rows, vec![HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>()]);
    }

    #[test]
    fn test_rows_follow_header_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut report = Report::new();
        report.push(&sample(0, 1.5));
        report.push(&sample(1, 2.25));
        report.write_xlsx(&path).unwrap();

        let rows = read_sheet(&path);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "start_time");
        assert_eq!(rows[1], ["1704038400", "2024-01-01 00:00:00", "1704042000", "2024-01-01 01:00:00", "1.500000"]);
        assert_eq!(rows[2][1], "2024-01-01 01:00:00");
        assert_eq!(rows[2][4], "2.250000");
    }

    #[test]
    fn test_existing_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        std::fs::write(&path, b"stale contents").unwrap();

        Report::new().write_xlsx(&path).unwrap();
        assert_eq!(read_sheet(&path).len(), 1);
    }

    #[test]
    fn test_unwritable_path_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.xlsx");

        let err = Report::new().write_xlsx(&path).unwrap_err();
        assert!(err.to_string().contains("out.xlsx"), "got: {}", err);
    }
}
