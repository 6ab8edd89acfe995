use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error type returned by the loader.
///
/// This is a single error enum shared across CSV/JSON/Parquet (and optional Excel) loading. Any
/// load error aborts the run before cleaning starts.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel loading error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV loading error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON loading error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parquet loading error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The file extension does not map to a supported format.
    #[error("unsupported file type '{extension}' ({})", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The file was readable but its content cannot form a table.
    #[error("malformed input: {message}")]
    Malformed { message: String },
}

/// Error writing the cleaned table.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Column-type manifest serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error assembling the PDF report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF construction/serialization error.
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The chart image could not be decoded for embedding.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Error rendering the bar chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// There is nothing to plot.
    #[error("grouped data is empty")]
    Empty,

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding/writing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure of a pipeline mode.
///
/// Only I/O-boundary failures surface here; data-quality issues never do.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input could not be loaded.
    #[error("failed to load input: {0}")]
    Load(#[from] LoadError),

    /// The cleaned table could not be written.
    #[error("failed to write cleaned output: {0}")]
    Export(#[from] ExportError),

    /// The PDF report could not be produced.
    #[error("failed to export report: {0}")]
    Report(#[from] ReportError),

    /// A regenerate mode needs the cleaned output of a previous full run.
    #[error("{} not found. Run option 1 first.", path.display())]
    MissingCleanedOutput { path: PathBuf },
}
