//! The sampling state machine

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use mystat_connection::{ConnectionFactory, connect_with_retry};
use mystat_core::{Connection, MystatError, Result};

use super::{Clock, OutputSink, SamplerConfig, SystemClock};
use crate::delta::{DeltaCalculator, MetricsRecord};
use crate::fetcher::{SnapshotFetcher, StatusQuery};
use crate::render::{TableRenderer, TableSchema};

/// Where the sampler is between steps.
///
/// Epochs are numbered from 1. Each epoch owns one connection, prints the
/// headers once and samples up to `cycles_per_epoch` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Connecting { epoch: u64 },
    Sampling { epoch: u64, cycle: u32 },
    EpochFinished { epoch: u64 },
    Stopped,
}

/// Samples one instance until the row bound, a fatal error or shutdown
pub struct Sampler<F, S> {
    factory: F,
    sink: S,
    renderer: TableRenderer,
    fetcher: SnapshotFetcher,
    calculator: DeltaCalculator,
    clock: Box<dyn Clock>,
    config: SamplerConfig,
    conn: Option<Arc<dyn Connection>>,
    rows_written: u64,
}

impl<F, S> Sampler<F, S>
where
    F: ConnectionFactory,
    S: OutputSink,
{
    pub fn new(factory: F, sink: S, schema: TableSchema) -> Self {
        Self {
            factory,
            sink,
            renderer: TableRenderer::new(schema),
            fetcher: SnapshotFetcher::new(),
            calculator: DeltaCalculator::new(),
            clock: Box::new(SystemClock),
            config: SamplerConfig::default(),
            conn: None,
            rows_written: 0,
        }
    }

    pub fn with_config(mut self, config: SamplerConfig) -> Self {
        self.calculator = DeltaCalculator::with_config(config.delta);
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Run until stopped, returning the number of data rows written.
    ///
    /// `shutdown` is raced against every step, so a pending sleep, query
    /// or reconnect backoff is abandoned as soon as it resolves. The open
    /// connection is closed on every exit path.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> Result<u64> {
        self.config.validate()?;
        tokio::pin!(shutdown);

        let mut state = SamplerState::Connecting { epoch: 1 };
        while state != SamplerState::Stopped {
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                result = self.step(state) => Some(result),
            };

            state = match outcome {
                None => {
                    tracing::info!(rows = self.rows_written, "shutdown requested");
                    SamplerState::Stopped
                }
                Some(Ok(next)) => next,
                Some(Err(e)) => {
                    self.close_connection().await;
                    return Err(e);
                }
            };
        }

        self.close_connection().await;
        Ok(self.rows_written)
    }

    /// Advance the state machine by one transition
    pub async fn step(&mut self, state: SamplerState) -> Result<SamplerState> {
        match state {
            SamplerState::Connecting { epoch } => self.start_epoch(epoch).await,
            SamplerState::Sampling { epoch, cycle } => self.sample_cycle(epoch, cycle).await,
            SamplerState::EpochFinished { epoch } => {
                self.close_connection().await;
                Ok(SamplerState::Connecting { epoch: epoch + 1 })
            }
            SamplerState::Stopped => Ok(SamplerState::Stopped),
        }
    }

    async fn start_epoch(&mut self, epoch: u64) -> Result<SamplerState> {
        let conn = connect_with_retry(&self.factory, &self.config.reconnect).await?;
        StatusQuery::ensure_supported(conn.driver_name())?;
        self.conn = Some(conn);
        tracing::info!(epoch, "connected, starting epoch");

        for line in self.renderer.header_lines() {
            self.sink.write_line(&line)?;
        }
        Ok(SamplerState::Sampling { epoch, cycle: 0 })
    }

    async fn sample_cycle(&mut self, epoch: u64, cycle: u32) -> Result<SamplerState> {
        let Some(conn) = self.conn.clone() else {
            return Ok(SamplerState::Connecting { epoch });
        };

        match self.sample_once(conn.as_ref()).await {
            Ok(record) => {
                if record.had_counter_reset() {
                    tracing::warn!(
                        counters = ?record.reset_counters(),
                        "row rendered with clamped counters"
                    );
                }
                self.sink.write_line(&self.renderer.render_row(&record))?;
                self.rows_written += 1;
                tracing::debug!(
                    epoch,
                    cycle,
                    window_ms = record.window().as_millis() as u64,
                    "row written"
                );
            }
            Err(MystatError::DataIntegrity(reason)) => {
                tracing::error!(epoch, cycle, %reason, "skipping cycle");
            }
            Err(e) if e.is_connection_error() => {
                tracing::warn!(epoch, cycle, error = %e, "connection lost, ending epoch");
                return Ok(SamplerState::EpochFinished { epoch });
            }
            Err(e) => return Err(e),
        }

        if self.config.max_rows.is_some_and(|max| self.rows_written >= max) {
            tracing::info!(rows = self.rows_written, "row limit reached");
            return Ok(SamplerState::Stopped);
        }

        tokio::time::sleep(self.config.pause_after_row()).await;

        let next = cycle + 1;
        if next >= self.config.cycles_per_epoch {
            Ok(SamplerState::EpochFinished { epoch })
        } else {
            Ok(SamplerState::Sampling { epoch, cycle: next })
        }
    }

    /// Facts, snapshot A, window, snapshot B, delta. The row is stamped
    /// with the instant the cycle started.
    async fn sample_once(&self, conn: &dyn Connection) -> Result<MetricsRecord> {
        let started = self.clock.now();
        let facts = self.fetcher.fetch_facts(conn).await?;
        let first = self
            .fetcher
            .fetch_counters(conn, self.clock.now().with_timezone(&Utc))
            .await?;
        tokio::time::sleep(self.config.window).await;
        let second = self
            .fetcher
            .fetch_counters(conn, self.clock.now().with_timezone(&Utc))
            .await?;

        self.calculator.compute(&first, &second, facts, started)
    }

    async fn close_connection(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.close().await {
                tracing::warn!(error = %e, "failed to close connection");
            }
        }
    }
}
