//! Workbook directories with one CSV file per sheet.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::config::validate_sheet_name;
use crate::error::{SessionLogError, SessionLogResult};
use crate::record::{HEADER, SessionRecord};

use super::TableSink;

pub struct CsvWorkbook {
    sheet_path: PathBuf,
}

impl CsvWorkbook {
    /// Resolve the workbook directory and the sheet inside it. The sheet
    /// file itself is only created on the first append.
    pub fn open(workbook: &Path, sheet_name: &str) -> SessionLogResult<Self> {
        if !workbook.is_dir() {
            return Err(SessionLogError::SpreadsheetNotFound(format!(
                "{} is not a directory. Check `spreadsheet_id` in your config",
                workbook.display()
            )));
        }

        validate_sheet_name(sheet_name)?;

        Ok(CsvWorkbook {
            sheet_path: workbook.join(format!("{sheet_name}.csv")),
        })
    }

    pub fn sheet_path(&self) -> &Path {
        &self.sheet_path
    }

    fn write_error(&self, error: impl std::fmt::Display) -> SessionLogError {
        SessionLogError::Sink(format!("Could not write {}: {error}", self.sheet_path.display()))
    }

    fn needs_header(&self) -> bool {
        std::fs::metadata(&self.sheet_path).map_or(true, |m| m.len() == 0)
    }
}

impl TableSink for CsvWorkbook {
    fn append_row(&mut self, record: &SessionRecord) -> SessionLogResult<()> {
        let write_header = self.needs_header();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.sheet_path)
            .map_err(|e| self.write_error(e))?;

        let mut writer = csv::Writer::from_writer(file);

        if write_header {
            tracing::info!(sheet = %self.sheet_path.display(), "Creating sheet with header row");
            writer.write_record(HEADER).map_err(|e| self.write_error(e))?;
        }
        writer
            .write_record(record.to_row())
            .map_err(|e| self.write_error(e))?;
        writer.flush().map_err(|e| self.write_error(e))?;

        Ok(())
    }
}
