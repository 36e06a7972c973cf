//! Query-to-results orchestration.
//!
//! A [`Harness`] ties a specification source to a result log. Opening a
//! query loads every matching specification, registers one recorder per
//! file and collects the case handles into a [`Session`] that a
//! presentation layer can list and run.

pub mod session;

pub use session::{Session, SessionGroup};

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::loader::{SpecLoader, SpecSource};
use crate::logger;
use crate::query::Query;
use crate::results::ResultLog;
use crate::runner::{CaseHandle, RunResult, RunSummary};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Harness {
    loader: SpecLoader,
    log: ResultLog,
    config: HarnessConfig,
}

impl Harness {
    pub fn new(source: Arc<dyn SpecSource>) -> Self {
        Self::with_config(source, HarnessConfig::default())
    }

    pub fn with_config(source: Arc<dyn SpecSource>, config: HarnessConfig) -> Self {
        Self {
            loader: SpecLoader::new(source),
            log: ResultLog::new(),
            config,
        }
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Install the tracing subscriber using the configured default level.
    pub fn init_logging(&self) {
        logger::init_logger(&self.config.log_level);
    }

    /// Resolve `query`, load every entry and collect case handles.
    ///
    /// Fails only for query-level errors. An entry whose specification
    /// cannot be loaded is kept in the session with its `load_error` set.
    pub async fn open(&self, query: &str) -> Result<Session> {
        let query = Query::parse(query)?;
        let entries = self.loader.load_query(&query).await?;

        // manifest order is kept regardless of which load finishes first
        let specs = join_all(entries.iter().map(|entry| entry.load())).await;

        let mut groups = Vec::with_capacity(entries.len());
        for (entry, spec) in entries.iter().zip(specs) {
            let id = entry.id().clone();
            match spec {
                Ok(spec) => {
                    let cases: Vec<CaseHandle> = match &spec.generator {
                        Some(generator) => {
                            let recorder = self.log.record(&id)?;
                            generator
                                .iterate(&recorder)
                                .filter(|case| entry.selects(case.name()))
                                .collect()
                        }
                        None => Vec::new(),
                    };
                    groups.push(SessionGroup {
                        id,
                        description: Some(spec.description),
                        cases,
                        load_error: None,
                    });
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Specification failed to load");
                    groups.push(SessionGroup {
                        id,
                        description: None,
                        cases: Vec::new(),
                        load_error: Some(e),
                    });
                }
            }
        }

        let session = Session::new(groups, query.run_now || self.config.run_now);
        info!(
            groups = session.groups().len(),
            cases = session.case_count(),
            "Session opened"
        );
        Ok(session)
    }

    /// Open `query` and run every case at once when run-now is requested.
    pub async fn open_and_maybe_run(&self, query: &str) -> Result<(Session, Option<RunSummary>)> {
        let session = self.open(query).await?;
        let summary = if session.run_now() {
            Some(session.run_all().await?)
        } else {
            None
        };
        Ok((session, summary))
    }

    /// Render a result's elapsed time with the configured precision.
    pub fn render_elapsed(&self, result: &RunResult) -> String {
        result.elapsed_display(self.config.time_precision)
    }

    /// Export the result log with the configured indent.
    pub fn export_json(&self) -> Result<String> {
        self.log.export_json(self.config.json_indent)
    }
}
