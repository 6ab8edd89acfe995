//! Run-scoped event reporting.
//!
//! Pipeline stages never log through process-wide state. They receive a [`PipelineContext`] and
//! report [`PipelineEvent`]s through it; the context fans events out to an optional
//! [`PipelineObserver`] and escalates them to [`PipelineObserver::on_alert`] at or above a
//! severity threshold.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::RoleAliases;
use crate::ingestion::LoadFormat;
use crate::types::ColumnType;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (a component failed).
    Error,
    /// Critical error (typically I/O failures that abort the run).
    Critical,
}

/// Pipeline stage identifiers, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    Deduplicate,
    Classify,
    Impute,
    FilterInvalid,
    DeriveTotal,
    Aggregate,
    Rollup,
}

/// Kind of artifact written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    CleanedCsv,
    Chart,
    Report,
}

/// Component that failed without aborting the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Ai,
    Chart,
    Report,
}

/// Events emitted while a run progresses.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    Loaded {
        path: PathBuf,
        format: LoadFormat,
        rows: usize,
        columns: usize,
    },
    LoadFailed {
        path: PathBuf,
        message: String,
    },
    ColumnClassified {
        column: String,
        column_type: ColumnType,
    },
    StageFinished {
        stage: Stage,
        rows: usize,
    },
    ArtifactWritten {
        kind: ArtifactKind,
        path: PathBuf,
    },
    Degraded {
        component: Component,
        severity: Severity,
        message: String,
    },
}

impl PipelineEvent {
    /// Severity used for alert thresholds.
    pub fn severity(&self) -> Severity {
        match self {
            Self::LoadFailed { .. } => Severity::Critical,
            Self::Degraded { severity, .. } => *severity,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded {
                path,
                format,
                rows,
                columns,
            } => write!(
                f,
                "loaded format={format:?} path={} rows={rows} columns={columns}",
                path.display()
            ),
            Self::LoadFailed { path, message } => {
                write!(f, "load failed path={} err={message}", path.display())
            }
            Self::ColumnClassified {
                column,
                column_type,
            } => write!(f, "column '{column}' classified as {column_type}"),
            Self::StageFinished { stage, rows } => write!(f, "stage {stage:?} finished rows={rows}"),
            Self::ArtifactWritten { kind, path } => {
                write!(f, "{kind:?} written to {}", path.display())
            }
            Self::Degraded {
                component, message, ..
            } => write!(f, "{component:?} unavailable: {message}"),
        }
    }
}

/// Observer interface for pipeline events.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait PipelineObserver: Send + Sync {
    /// Called for every event.
    fn on_event(&self, event: &PipelineEvent);

    /// Called when an event meets the context's alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_event`].
    fn on_alert(&self, event: &PipelineEvent) {
        self.on_event(event);
    }
}

/// Explicit handle passed through one pipeline run.
///
/// Carries the reporting sink and the injected column-role vocabulary.
#[derive(Clone)]
pub struct PipelineContext {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
    /// Column-role heuristics.
    pub aliases: RoleAliases,
}

impl fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineContext")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("aliases", &self.aliases)
            .finish()
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: Severity::Critical,
            aliases: RoleAliases::default(),
        }
    }
}

impl PipelineContext {
    /// Context reporting to `observer`.
    pub fn with_observer(observer: Arc<dyn PipelineObserver>) -> Self {
        Self {
            observer: Some(observer),
            ..Default::default()
        }
    }

    /// Report an event to the observer, escalating to `on_alert` when severe enough.
    pub fn emit(&self, event: PipelineEvent) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_event(&event);
            if event.severity() >= self.alert_at_or_above {
                obs.on_alert(&event);
            }
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_event(&self, event: &PipelineEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }

    fn on_alert(&self, event: &PipelineEvent) {
        for o in &self.observers {
            o.on_alert(event);
        }
    }
}

/// Forwards events to `tracing` at a level matching their severity.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event.severity() {
            Severity::Info => tracing::info!(target: "data_ai_automator", "{event}"),
            Severity::Warning => tracing::warn!(target: "data_ai_automator", "{event}"),
            Severity::Error | Severity::Critical => {
                tracing::error!(target: "data_ai_automator", "{event}");
            }
        }
    }

    fn on_alert(&self, event: &PipelineEvent) {
        tracing::error!(target: "data_ai_automator", alert = true, "{event}");
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.append_line(&format!(
            "{} severity={:?} {event}",
            unix_ts(),
            event.severity()
        ));
    }

    fn on_alert(&self, event: &PipelineEvent) {
        self.append_line(&format!(
            "{} ALERT severity={:?} {event}",
            unix_ts(),
            event.severity()
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{
        Component, CompositeObserver, PipelineContext, PipelineEvent, PipelineObserver, Severity,
        Stage,
    };

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<Severity>>,
        alerts: Mutex<Vec<Severity>>,
    }

    impl PipelineObserver for Recording {
        fn on_event(&self, event: &PipelineEvent) {
            self.events.lock().unwrap().push(event.severity());
        }

        fn on_alert(&self, event: &PipelineEvent) {
            self.alerts.lock().unwrap().push(event.severity());
        }
    }

    #[test]
    fn alerts_fire_only_at_threshold() {
        let rec = Arc::new(Recording::default());
        let ctx = PipelineContext {
            alert_at_or_above: Severity::Error,
            ..PipelineContext::with_observer(rec.clone())
        };

        ctx.emit(PipelineEvent::StageFinished {
            stage: Stage::Impute,
            rows: 3,
        });
        ctx.emit(PipelineEvent::Degraded {
            component: Component::Ai,
            severity: Severity::Warning,
            message: "no key".to_string(),
        });
        ctx.emit(PipelineEvent::Degraded {
            component: Component::Report,
            severity: Severity::Error,
            message: "disk full".to_string(),
        });

        assert_eq!(
            *rec.events.lock().unwrap(),
            vec![Severity::Info, Severity::Warning, Severity::Error]
        );
        assert_eq!(*rec.alerts.lock().unwrap(), vec![Severity::Error]);
    }

    #[test]
    fn composite_fans_out() {
        let a = Arc::new(Recording::default());
        let b = Arc::new(Recording::default());
        let composite = CompositeObserver::new(vec![a.clone(), b.clone()]);
        let ctx = PipelineContext::with_observer(Arc::new(composite));

        ctx.emit(PipelineEvent::StageFinished {
            stage: Stage::Rollup,
            rows: 1,
        });

        assert_eq!(a.events.lock().unwrap().len(), 1);
        assert_eq!(b.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn context_without_observer_is_silent() {
        let ctx = PipelineContext::default();
        ctx.emit(PipelineEvent::LoadFailed {
            path: "x.csv".into(),
            message: "gone".to_string(),
        });
    }
}
