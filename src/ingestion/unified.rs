//! Unified loading entrypoint.
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - Success and failure are reported to the run's [`PipelineContext`].

use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::observability::{PipelineContext, PipelineEvent};
use crate::types::Table;

use super::{csv, json, parquet};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Apache Parquet.
    Parquet,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl LoadFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Options controlling loading.
///
/// Use [`Default`] for common cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<LoadFormat>,
    /// Excel sheet to read; `None` reads the first sheet.
    pub excel_sheet: Option<String>,
}

/// Load `path` into an untyped [`Table`].
///
/// Emits [`PipelineEvent::Loaded`] on success and [`PipelineEvent::LoadFailed`] (Critical) on
/// failure.
///
/// ```no_run
/// use data_ai_automator::ingestion::{load_table, LoadOptions};
/// use data_ai_automator::observability::PipelineContext;
///
/// # fn main() -> Result<(), data_ai_automator::LoadError> {
/// let table = load_table("sales.csv", &LoadOptions::default(), &PipelineContext::default())?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load_table(
    path: impl AsRef<Path>,
    options: &LoadOptions,
    ctx: &PipelineContext,
) -> LoadResult<Table> {
    let path = path.as_ref();
    let result = match options.format {
        Some(f) => Ok(f),
        None => infer_format_from_path(path),
    }
    .and_then(|fmt| load_with_format(path, fmt, options).map(|t| (fmt, t)));

    match result {
        Ok((format, table)) => {
            ctx.emit(PipelineEvent::Loaded {
                path: path.to_path_buf(),
                format,
                rows: table.row_count(),
                columns: table.column_count(),
            });
            Ok(table)
        }
        Err(e) => {
            ctx.emit(PipelineEvent::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
            Err(e)
        }
    }
}

fn load_with_format(path: &Path, fmt: LoadFormat, options: &LoadOptions) -> LoadResult<Table> {
    match fmt {
        LoadFormat::Csv => csv::load_csv_from_path(path),
        LoadFormat::Json => json::load_json_from_path(path),
        LoadFormat::Parquet => parquet::load_parquet_from_path(path),
        LoadFormat::Excel => load_excel_dispatch(path, options.excel_sheet.as_deref()),
    }
}

fn infer_format_from_path(path: &Path) -> LoadResult<LoadFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    LoadFormat::from_extension(ext).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: ext.to_string(),
    })
}

fn load_excel_dispatch(path: &Path, sheet: Option<&str>) -> LoadResult<Table> {
    #[cfg(feature = "excel")]
    {
        super::excel::load_excel_from_path(path, sheet)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = sheet;
        Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: "excel (enable cargo feature 'excel')".to_string(),
        })
    }
}
