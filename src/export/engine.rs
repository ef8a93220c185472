//! Tabular export engine
//!
//! Walks a form's descriptor list and every matching entity row, renders
//! one type-aware cell per (row, field) pair, and writes the workbook to a
//! unique per-export path. Unique paths are deliberate: a fixed shared
//! output file lets two overlapping exports interleave writes and serve a
//! half-written artifact, so every invocation gets its own file and old
//! artifacts are swept by a retention pass.

use crate::config::FormRegistry;
use crate::core::entity::{Entity, MultiReferenceField, ReferenceField, ScalarField};
use crate::core::error::{EntableError, ExportError};
use crate::core::field::{FieldDescriptor, FieldType};
use crate::core::query::{FilterMap, OrderBy};
use crate::core::table::EntityTable;
use crate::export::sheet::{Cell, CellStyle, CellValue, Workbook, Worksheet};
use crate::storage::TagStore;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{info, warn};
use uuid::Uuid;

/// Zero-date sentinel stored by date fields that were never set
const ZERO_DATE: &str = "0000-00-00";

/// Zero-datetime sentinel stored by datetime/time fields that were never set
const ZERO_DATETIME: &str = "0000-00-00 00:00:00";

/// File suffix of export artifacts
const EXPORT_SUFFIX: &str = ".sheet.json";

/// Default number of export artifacts kept per module
const DEFAULT_RETENTION: usize = 10;

/// Downloadable-link descriptor returned to the caller after an export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadLink {
    pub href: String,
    pub label: String,
    pub icon: String,
    pub class: String,
}

/// Export engine for one entity module
pub struct Exporter {
    registry: Arc<FormRegistry>,
    table: EntityTable,
    tags: Arc<dyn TagStore>,
    export_dir: PathBuf,
    sheet_title: Option<String>,
    retention: usize,
}

impl Exporter {
    /// Create an exporter writing artifacts into `export_dir`
    pub fn new(
        registry: Arc<FormRegistry>,
        table: EntityTable,
        tags: Arc<dyn TagStore>,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            table,
            tags,
            export_dir: export_dir.into(),
            sheet_title: None,
            retention: DEFAULT_RETENTION,
        }
    }

    /// Override the worksheet title (default: capitalized entity type,
    /// pluralized, e.g. "Skeletons")
    pub fn with_sheet_title(mut self, title: impl Into<String>) -> Self {
        self.sheet_title = Some(title.into());
        self
    }

    /// Override how many export artifacts the retention sweep keeps
    pub fn with_retention(mut self, keep: usize) -> Self {
        self.retention = keep.max(1);
        self
    }

    fn sheet_title(&self) -> String {
        match &self.sheet_title {
            Some(title) => title.clone(),
            None => {
                let prefix = self.table.entity_type();
                let mut chars = prefix.chars();
                match chars.next() {
                    Some(first) => format!("{}{}s", first.to_uppercase(), chars.as_str()),
                    None => "Export".to_string(),
                }
            }
        }
    }

    /// Export all entities of a form as a workbook.
    ///
    /// The header row carries the form's field labels in declared order;
    /// one data row follows per entity, ordered by `label` ascending unless
    /// `order` overrides it. Returns the download link for the written
    /// artifact.
    pub async fn export(
        &self,
        form_name: &str,
        order: Option<OrderBy>,
    ) -> Result<DownloadLink, EntableError> {
        let fields = self.registry.fields(form_name)?;

        let mut sheet = Worksheet::new(self.sheet_title());
        sheet.push_row(
            fields
                .iter()
                .map(|field| {
                    Cell::styled(CellValue::text(field.label.clone()), CellStyle::header())
                })
                .collect(),
        );

        let order = order.unwrap_or_else(|| OrderBy::asc("label"));
        let rows = self.table.fetch_all(&FilterMap::new(), Some(order)).await?;
        let row_count = rows.len();

        for row in &rows {
            let mut cells = Vec::with_capacity(fields.len());
            for field in fields {
                cells.push(Cell::new(self.render_cell(row, field).await?));
            }
            sheet.push_row(cells);
        }

        sheet.auto_size_columns();
        let workbook = Workbook::single(sheet);

        std::fs::create_dir_all(&self.export_dir).map_err(|source| ExportError::Io {
            path: self.export_dir.clone(),
            source,
        })?;
        let path = self.export_dir.join(format!(
            "{}-export-{}{}",
            self.table.entity_type(),
            Uuid::new_v4(),
            EXPORT_SUFFIX
        ));
        workbook.save(&path)?;
        self.prune_old_exports();

        info!(
            form = form_name,
            rows = row_count,
            path = %path.display(),
            "wrote export"
        );

        Ok(DownloadLink {
            href: path.to_string_lossy().into_owned(),
            label: "Download Export File".to_string(),
            icon: "fas fa-download".to_string(),
            class: "btn-primary".to_string(),
        })
    }

    /// Render one cell for a (row, field) pair, dispatching on field type.
    ///
    /// Unknown and partial types render blank by design; they are the
    /// extension point for types this module does not export.
    async fn render_cell(
        &self,
        row: &Entity,
        field: &FieldDescriptor,
    ) -> Result<CellValue, EntableError> {
        Ok(match field.field_type {
            FieldType::Multiselect => {
                let items = row.multi_select_field(&field.key, self.tags.as_ref()).await?;
                let joined = items
                    .iter()
                    .map(|tag| tag.display_value())
                    .collect::<Vec<_>>()
                    .join(",");
                CellValue::text(joined)
            }
            FieldType::Select => match row.select_field(&field.key, self.tags.as_ref()).await? {
                Some(tag) => CellValue::text(tag.label),
                None => CellValue::text("-"),
            },
            FieldType::Url => match non_empty(row.text_field(&field.key)) {
                // TODO: point href at the stored URL once the consumer
                // confirms it can follow absolute targets; the legacy
                // exporter always emitted "#" and readers may rely on it.
                Some(url) => CellValue::Link {
                    href: "#".to_string(),
                    text: url.to_string(),
                },
                None => CellValue::text("-"),
            },
            FieldType::Text => match non_empty(row.text_field(&field.key)) {
                Some(value) => CellValue::text(value),
                None => CellValue::text("-"),
            },
            FieldType::Date => CellValue::text(render_date(row.text_field(&field.key))),
            FieldType::Datetime | FieldType::Time => {
                CellValue::text(render_datetime(row.text_field(&field.key)))
            }
            FieldType::Currency | FieldType::ReadonlyCurrency => {
                CellValue::text(render_currency(row.text_field(&field.key)))
            }
            FieldType::Partial | FieldType::Unknown => CellValue::Empty,
        })
    }

    /// Delete the oldest export artifacts beyond the retention count.
    ///
    /// Best-effort: a failed directory read or removal is logged, never an
    /// export failure.
    fn prune_old_exports(&self) {
        let prefix = format!("{}-export-", self.table.entity_type());
        let entries = match std::fs::read_dir(&self.export_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "retention sweep could not read export directory");
                return;
            }
        };

        let mut artifacts: Vec<(SystemTime, PathBuf)> = entries
            .flatten()
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(EXPORT_SUFFIX))
            })
            .filter_map(|entry| {
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((modified, entry.path()))
            })
            .collect();

        artifacts.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, path) in artifacts.into_iter().skip(self.retention) {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "failed to remove old export");
            } else {
                info!(path = %path.display(), "removed old export");
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `DD.MM.YYYY`, or `-` for unset, zero-sentinel, or unparsable values
fn render_date(value: Option<&str>) -> String {
    let Some(value) = non_empty(value) else {
        return "-".to_string();
    };
    if value == ZERO_DATE {
        return "-".to_string();
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => "-".to_string(),
    }
}

/// Datetime and time fields render date-only, matching what readers of the
/// legacy export expect; `-` for unset, zero-sentinel, or unparsable values
fn render_datetime(value: Option<&str>) -> String {
    let Some(value) = non_empty(value) else {
        return "-".to_string();
    };
    if value == ZERO_DATETIME {
        return "-".to_string();
    }
    let date = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => "-".to_string(),
    }
}

/// Grouped numeric with 2 decimals (`1234.5` → `1'234.50`), or `-` for
/// empty or unparsable values
fn render_currency(value: Option<&str>) -> String {
    let Some(value) = non_empty(value) else {
        return "-".to_string();
    };
    match value.trim().parse::<f64>() {
        Ok(amount) => format_currency(amount),
        Err(_) => "-".to_string(),
    }
}

fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('\'');
        }
        grouped.push(c);
    }
    let int_grouped: String = grouped.chars().rev().collect();

    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        int_grouped,
        frac_part
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_date() {
        assert_eq!(render_date(Some("2024-03-01")), "01.03.2024");
        assert_eq!(render_date(Some(ZERO_DATE)), "-");
        assert_eq!(render_date(Some("")), "-");
        assert_eq!(render_date(None), "-");
        assert_eq!(render_date(Some("garbage")), "-");
    }

    #[test]
    fn test_render_datetime_is_date_only() {
        assert_eq!(render_datetime(Some("2024-03-01 13:45:10")), "01.03.2024");
        assert_eq!(render_datetime(Some(ZERO_DATETIME)), "-");
        assert_eq!(render_datetime(Some("2024-03-01")), "01.03.2024");
        assert_eq!(render_datetime(None), "-");
    }

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(1234.5), "1'234.50");
        assert_eq!(format_currency(0.0), "0.00");
        assert_eq!(format_currency(999.999), "1'000.00");
        assert_eq!(format_currency(1_234_567.0), "1'234'567.00");
        assert_eq!(format_currency(-1234.5), "-1'234.50");
    }

    #[test]
    fn test_render_currency() {
        assert_eq!(render_currency(Some("1234.5")), "1'234.50");
        assert_eq!(render_currency(Some("")), "-");
        assert_eq!(render_currency(Some("abc")), "-");
        assert_eq!(render_currency(None), "-");
    }
}
