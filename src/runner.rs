//! Host driving loop.
//!
//! The runner owns the controller and drives a [`Simulation`] through
//! the run lifecycle:
//!
//! 1. optionally push the controller's phase to the signal,
//! 2. per tick: advance the simulation, read both waiting proxies, step
//!    the controller, deliver the phase command if there is one,
//! 3. close the simulation.
//!
//! Any collaborator failure aborts the run; nothing is retried.

use crate::config::RunConfig;
use crate::control::PhaseController;
use crate::core::{Approach, ControllerState, Metrics, PhaseHistory};
use crate::sim::{SimError, Simulation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to set the initial phase: {source}")]
    Sync { source: SimError },

    #[error("simulation failed at tick {tick}: {source}")]
    Tick { tick: u64, source: SimError },

    #[error("failed to close the simulation: {source}")]
    Close { source: SimError },
}

/// Summary of a completed run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Ticks executed by this run
    pub ticks: u64,
    /// Controller tick count at the end, including resumed ticks
    pub final_tick: u64,
    pub final_state: ControllerState,
    /// Phase changes emitted by this run
    pub changes: usize,
    /// Ticks whose metrics had to be clamped
    pub clamped_ticks: u64,
    pub history: PhaseHistory,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Progress {
    ticks: u64,
    changes: usize,
    clamped: u64,
}

/// Drives one controller against one simulation.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::config::{ControllerConfig, RunConfig};
/// use adaptive_tls::control::PhaseController;
/// use adaptive_tls::core::Metrics;
/// use adaptive_tls::runner::Runner;
/// use adaptive_tls::sim::TraceSimulation;
///
/// let config = ControllerConfig::default();
/// let mut sim = TraceSimulation::new(vec![Metrics::default(); 30], &config);
/// let controller = PhaseController::new(config).unwrap();
/// let run = RunConfig { ticks: None, ..RunConfig::default() };
///
/// let report = Runner::new(controller, run).run(&mut sim).unwrap();
///
/// assert_eq!(report.ticks, 30);
/// assert_eq!(report.changes, 1);
/// ```
pub struct Runner {
    controller: PhaseController,
    run: RunConfig,
}

impl Runner {
    /// Applies the run's history limit to `controller`.
    pub fn new(mut controller: PhaseController, run: RunConfig) -> Self {
        controller.set_history_limit(run.history_limit);
        Self { controller, run }
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub fn into_controller(self) -> PhaseController {
        self.controller
    }

    /// Run to completion, then close the simulation.
    ///
    /// On failure the simulation is still closed if possible; a close
    /// error at that point is logged and the original error returned.
    pub fn run<S: Simulation + ?Sized>(&mut self, sim: &mut S) -> Result<RunReport, RunError> {
        let started_at = Utc::now();
        tracing::info!(
            signal = %self.controller.config().signal_id,
            phase = %self.controller.phase(),
            tick = self.controller.tick(),
            ticks = ?self.run.ticks,
            "starting adaptive control"
        );

        let progress = match self.drive(sim) {
            Ok(progress) => progress,
            Err(err) => {
                if let Err(close_err) = sim.close() {
                    tracing::warn!(error = %close_err, "failed to close simulation after abort");
                }
                tracing::error!(error = %err, "run aborted");
                return Err(err);
            }
        };
        sim.close().map_err(|source| RunError::Close { source })?;

        let history = self.controller.history().clone();
        let report = RunReport {
            ticks: progress.ticks,
            final_tick: self.controller.tick(),
            final_state: self.controller.state(),
            changes: progress.changes,
            clamped_ticks: progress.clamped,
            history,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!(
            ticks = report.ticks,
            changes = report.changes,
            cycles = report.history.cycles(),
            phase = %report.final_state.phase,
            "run complete"
        );
        Ok(report)
    }

    fn drive<S: Simulation + ?Sized>(&mut self, sim: &mut S) -> Result<Progress, RunError> {
        if self.run.sync_initial_phase {
            let config = self.controller.config();
            sim.set_phase(&config.signal_id, self.controller.phase().index())
                .map_err(|source| RunError::Sync { source })?;
        }

        let delay = Duration::from_millis(self.run.tick_delay_ms);
        let mut progress = Progress::default();

        while !self.run.ticks.is_some_and(|limit| progress.ticks >= limit) {
            if sim.is_finished() {
                tracing::info!(ticks = progress.ticks, "simulation finished");
                break;
            }
            let tick = self.controller.tick() + 1;
            let fail = |source| RunError::Tick { tick, source };

            sim.advance().map_err(fail)?;
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }

            let raw = self.read_metrics(sim).map_err(fail)?;
            let metrics = raw.sanitized();
            if metrics != raw {
                progress.clamped += 1;
                tracing::warn!(
                    tick,
                    waiting_h = raw.waiting_h,
                    waiting_v = raw.waiting_v,
                    "clamped malformed waiting proxy"
                );
            }

            let action = self.controller.step(metrics);
            if let Some(command) = action.command(self.controller.config()) {
                sim.set_phase(&command.signal_id, command.phase_index)
                    .map_err(fail)?;
                progress.changes += 1;
            }
            progress.ticks += 1;
        }

        Ok(progress)
    }

    fn read_metrics<S: Simulation + ?Sized>(&self, sim: &mut S) -> Result<Metrics, SimError> {
        let config = self.controller.config();
        let waiting_h = sim.waiting_proxy(config.approach_id(Approach::Horizontal))?;
        let waiting_v = sim.waiting_proxy(config.approach_id(Approach::Vertical))?;
        Ok(Metrics::new(waiting_h, waiting_v))
    }
}
