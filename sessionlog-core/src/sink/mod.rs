//! Destinations for session records.

mod workbook;

pub use workbook::CsvWorkbook;

use crate::error::SessionLogResult;
use crate::record::SessionRecord;

/// An append-only table of session records.
///
/// Implementations create the table with the `record::HEADER` row the
/// first time something is appended.
pub trait TableSink {
    fn append_row(&mut self, record: &SessionRecord) -> SessionLogResult<()>;
}
