//! Tabular export: workbook document model and the export engine

mod engine;
mod sheet;

pub use engine::{DownloadLink, Exporter};
pub use sheet::{BorderStyle, Cell, CellStyle, CellValue, Row, Workbook, Worksheet};
