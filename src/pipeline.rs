//! Run orchestration.
//!
//! - [`run_full_pipeline`]: load, clean, transform, write the cleaned CSV, then chart, AI analysis
//!   and PDF report.
//! - [`regenerate_ai_report`]: AI analysis from an existing cleaned CSV.
//! - [`regenerate_pdf`]: AI analysis and PDF report from an existing cleaned CSV.
//!
//! Only the load and the cleaned CSV write are fatal in a full run; chart, AI and report failures
//! are reported as `Degraded` events and the run carries on.

use std::path::{Path, PathBuf};

use crate::ai::{generate_analysis, AnalysisClient};
use crate::chart::{render_bar_chart, DEFAULT_TOP_N};
use crate::cleaning::{clean, reclassify};
use crate::config::OutputPaths;
use crate::error::PipelineError;
use crate::ingestion::{load_table, LoadFormat, LoadOptions};
use crate::observability::{ArtifactKind, Component, PipelineContext, PipelineEvent, Severity};
use crate::output::{column_types_path, read_column_types, write_column_types, write_csv};
use crate::report::{export_pdf_report, ReportInput};
use crate::summary::ProcessingSummary;
use crate::transform::transform;
use crate::types::{GroupedRow, Table};

/// Where to read from and write to.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub input: PathBuf,
    pub load: LoadOptions,
    pub outputs: OutputPaths,
}

/// Transformed table, its rollups and the cleaning summary.
#[derive(Debug, Clone)]
pub struct Processed {
    pub table: Table,
    pub grouped: Vec<GroupedRow>,
    pub summary: ProcessingSummary,
}

/// Everything a full run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub processed: Processed,
    pub ai_text: String,
    pub chart: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

/// Clean and transform an untyped table.
pub fn process_table(raw: Table, ctx: &PipelineContext) -> Processed {
    let (cleaned, summary) = clean(raw, ctx);
    let (table, grouped) = transform(cleaned, ctx);
    Processed {
        table,
        grouped,
        summary,
    }
}

/// Full run.
pub fn run_full_pipeline(
    options: &RunOptions,
    client: Option<&dyn AnalysisClient>,
    ctx: &PipelineContext,
) -> Result<RunOutcome, PipelineError> {
    tracing::info!(target: "data_ai_automator", input = %options.input.display(), "starting full pipeline");

    let raw = load_table(&options.input, &options.load, ctx)?;
    let processed = process_table(raw, ctx);

    write_csv(&processed.table, &options.outputs.cleaned_csv)?;
    write_column_types(&processed.table, column_types_path(&options.outputs.cleaned_csv))?;
    artifact(ctx, ArtifactKind::CleanedCsv, &options.outputs.cleaned_csv);

    let chart = match render_bar_chart(&processed.grouped, &options.outputs.chart_png, DEFAULT_TOP_N) {
        Ok(path) => {
            artifact(ctx, ArtifactKind::Chart, &path);
            Some(path)
        }
        Err(e) => {
            degraded(ctx, Component::Chart, Severity::Warning, e.to_string());
            None
        }
    };

    let ai_text = generate_analysis(client, &processed.table, &processed.grouped, ctx);

    let report = match write_report(&processed, &ai_text, chart.as_deref(), &options.outputs.report_pdf, ctx) {
        Ok(path) => Some(path),
        Err(e) => {
            degraded(ctx, Component::Report, Severity::Error, e.to_string());
            None
        }
    };

    tracing::info!(target: "data_ai_automator", "pipeline finished");
    Ok(RunOutcome {
        processed,
        ai_text,
        chart,
        report,
    })
}

/// Reload a cleaned CSV written by a full run, retype it and transform it.
///
/// Column types come from the manifest written next to the CSV, so the rollups match the full
/// run. Without a manifest the types are inferred again. The summary is a pass-through: nothing
/// is counted as removed or filled.
pub fn load_processed(cleaned_csv: &Path, ctx: &PipelineContext) -> Result<Processed, PipelineError> {
    if !cleaned_csv.exists() {
        return Err(PipelineError::MissingCleanedOutput {
            path: cleaned_csv.to_path_buf(),
        });
    }
    let options = LoadOptions {
        format: Some(LoadFormat::Csv),
        ..LoadOptions::default()
    };
    let raw = load_table(cleaned_csv, &options, ctx)?;
    let known = match read_column_types(column_types_path(cleaned_csv))? {
        Some(known) => known,
        None => {
            tracing::warn!(target: "data_ai_automator", path = %cleaned_csv.display(), "no column type manifest, inferring types again");
            Vec::new()
        }
    };
    let (typed, summary) = reclassify(raw, &known, ctx);
    let (table, grouped) = transform(typed, ctx);
    Ok(Processed {
        table,
        grouped,
        summary,
    })
}

/// AI analysis of an existing cleaned CSV.
pub fn regenerate_ai_report(
    outputs: &OutputPaths,
    client: Option<&dyn AnalysisClient>,
    ctx: &PipelineContext,
) -> Result<String, PipelineError> {
    let processed = load_processed(&outputs.cleaned_csv, ctx)?;
    Ok(generate_analysis(client, &processed.table, &processed.grouped, ctx))
}

/// PDF report from an existing cleaned CSV, reusing the chart file when present.
///
/// Unlike the full run, a report failure is returned as an error.
pub fn regenerate_pdf(
    outputs: &OutputPaths,
    client: Option<&dyn AnalysisClient>,
    ctx: &PipelineContext,
) -> Result<PathBuf, PipelineError> {
    let processed = load_processed(&outputs.cleaned_csv, ctx)?;
    let ai_text = generate_analysis(client, &processed.table, &processed.grouped, ctx);
    write_report(&processed, &ai_text, Some(&outputs.chart_png), &outputs.report_pdf, ctx)
}

fn write_report(
    processed: &Processed,
    ai_text: &str,
    chart: Option<&Path>,
    path: &Path,
    ctx: &PipelineContext,
) -> Result<PathBuf, PipelineError> {
    let input = ReportInput {
        summary: &processed.summary,
        grouped: &processed.grouped,
        ai_text,
        chart,
    };
    let path = export_pdf_report(&input, path)?;
    artifact(ctx, ArtifactKind::Report, &path);
    Ok(path)
}

fn artifact(ctx: &PipelineContext, kind: ArtifactKind, path: &Path) {
    ctx.emit(PipelineEvent::ArtifactWritten {
        kind,
        path: path.to_path_buf(),
    });
}

fn degraded(ctx: &PipelineContext, component: Component, severity: Severity, message: String) {
    ctx.emit(PipelineEvent::Degraded {
        component,
        severity,
        message,
    });
}
