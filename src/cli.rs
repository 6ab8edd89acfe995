use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use data_ai_automator::ai::{AnalysisClient, GeminiClient};
use data_ai_automator::config::{OutputPaths, RoleAliases};
use data_ai_automator::ingestion::LoadOptions;
use data_ai_automator::observability::{
    CompositeObserver, FileObserver, PipelineContext, PipelineObserver, TracingObserver,
};
use data_ai_automator::pipeline::{regenerate_ai_report, regenerate_pdf, run_full_pipeline, RunOptions};
use data_ai_automator::PipelineError;

pub const DEFAULT_INPUT: &str = "sample.csv";

/// A single mode run without the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Clean, transform, chart, AI analysis and PDF report
    Full,
    /// AI report from an existing cleaned_output.csv
    Ai,
    /// PDF report from an existing cleaned_output.csv
    Pdf,
}

#[derive(Debug, Parser)]
#[command(
    name = "data-ai-automator",
    about = "Data processing and AI automation: clean, aggregate, analyse and report on a tabular file"
)]
pub struct Cli {
    /// Input file path (CSV, JSON/NDJSON, Parquet, Excel)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Run the full pipeline without showing the menu (same as `--mode full`)
    #[arg(long, conflicts_with = "mode")]
    pub auto: bool,

    /// Run one mode without showing the menu
    #[arg(long, value_enum)]
    pub mode: Option<RunMode>,

    /// JSON file overriding the price/quantity/group-key column aliases
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for cleaned_output.csv, top_products.png and report.pdf
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Also append pipeline events to this file
    #[arg(long, env = "DATA_AI_AUTOMATOR_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Resolved run settings shared by every mode.
pub struct App {
    pub options: RunOptions,
    pub ctx: PipelineContext,
    pub client: Option<Box<dyn AnalysisClient>>,
}

impl Cli {
    /// Mode requested on the command line; `None` means the interactive menu.
    pub fn run_mode(&self) -> Option<RunMode> {
        if self.auto { Some(RunMode::Full) } else { self.mode }
    }
}

impl App {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let aliases = match &cli.config {
            Some(path) => RoleAliases::from_json_path(path)
                .with_context(|| format!("failed to read alias config {}", path.display()))?,
            None => RoleAliases::default(),
        };

        let mut observers: Vec<Arc<dyn PipelineObserver>> = vec![Arc::new(TracingObserver)];
        if let Some(path) = &cli.log_file {
            observers.push(Arc::new(FileObserver::new(path)));
        }
        let ctx = PipelineContext {
            aliases,
            ..PipelineContext::with_observer(Arc::new(CompositeObserver::new(observers)))
        };

        let client = match GeminiClient::from_env() {
            Ok(c) => Some(Box::new(c) as Box<dyn AnalysisClient>),
            Err(e) => {
                tracing::error!("GEMINI_API_KEY or GOOGLE_API_KEY not usable ({e}). Check your .env file.");
                None
            }
        };

        Ok(Self {
            options: RunOptions {
                input: cli.input.clone(),
                load: LoadOptions::default(),
                outputs: OutputPaths::in_dir(&cli.output_dir),
            },
            ctx,
            client,
        })
    }

    fn client(&self) -> Option<&dyn AnalysisClient> {
        self.client.as_deref()
    }

    pub fn run_full(&self) -> Result<()> {
        let outcome = run_full_pipeline(&self.options, self.client(), &self.ctx)
            .with_context(|| format!("pipeline failed for {}", self.options.input.display()))?;
        tracing::info!("{}", outcome.processed.summary.to_string().trim_end().replace('\n', "; "));
        Ok(())
    }

    pub fn ai_only(&self) -> Result<String, PipelineError> {
        regenerate_ai_report(&self.options.outputs, self.client(), &self.ctx)
    }

    pub fn pdf_only(&self) -> Result<PathBuf, PipelineError> {
        regenerate_pdf(&self.options.outputs, self.client(), &self.ctx)
    }
}

const MENU: &str = "
Data AI Automator - Menu
1. Process Data (clean + transform + AI + PDF)
2. Generate AI Report only (requires existing cleaned_output.csv)
3. Export PDF only (requires existing cleaned_output.csv)
4. Exit";

/// Run one mode. Any fatal failure is returned.
pub fn run_mode<W: Write>(app: &App, mode: RunMode, mut out: W) -> Result<()> {
    match mode {
        RunMode::Full => app.run_full(),
        RunMode::Ai => {
            let text = app.ai_only().context("failed to generate AI report")?;
            writeln!(out, "\nAI Report:\n\n{text}")?;
            Ok(())
        }
        RunMode::Pdf => {
            let path = app.pdf_only().context("failed to export PDF")?;
            writeln!(out, "PDF report exported to {}", path.display())?;
            Ok(())
        }
    }
}

/// Interactive loop. Failures of a menu option are reported and the menu is shown again; the last
/// one is returned when the loop ends so the process exits non-zero.
pub fn run_menu<R: BufRead, W: Write>(app: &App, mut input: R, mut out: W) -> Result<()> {
    let mut failure: Option<anyhow::Error> = None;
    loop {
        writeln!(out, "{MENU}")?;
        write!(out, "Select an option (1-4): ")?;
        out.flush()?;

        let mut choice = String::new();
        if input.read_line(&mut choice)? == 0 {
            break;
        }

        let result = match choice.trim() {
            "1" => app.run_full().inspect_err(|e| tracing::error!("Error during full pipeline: {e:#}")),
            "2" => match app.ai_only() {
                Ok(text) => {
                    writeln!(out, "\nAI Report:\n\n{text}")?;
                    Ok(())
                }
                Err(e) => {
                    report_option_failure(&mut out, &e, "Error generating AI report")?;
                    Err(e.into())
                }
            },
            "3" => match app.pdf_only() {
                Ok(path) => {
                    writeln!(out, "PDF report exported to {}", path.display())?;
                    Ok(())
                }
                Err(e) => {
                    report_option_failure(&mut out, &e, "Error exporting PDF")?;
                    Err(e.into())
                }
            },
            "4" => {
                writeln!(out, "Exiting.")?;
                break;
            }
            _ => {
                writeln!(out, "Invalid choice. Please select 1-4.")?;
                Ok(())
            }
        };
        if let Err(e) = result {
            failure = Some(e);
        }
    }
    failure.map_or(Ok(()), Err)
}

fn report_option_failure<W: Write>(out: &mut W, e: &PipelineError, what: &str) -> std::io::Result<()> {
    match e {
        PipelineError::MissingCleanedOutput { .. } => writeln!(out, "{e}"),
        _ => {
            tracing::error!("{what}: {e}");
            Ok(())
        }
    }
}
