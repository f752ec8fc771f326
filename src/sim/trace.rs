//! Replay of recorded metrics.

use crate::config::ControllerConfig;
use crate::control::PhaseCommand;
use crate::core::{Metrics, Phase};
use crate::sim::{SimError, Simulation};
use std::path::Path;

/// Simulation that replays one recorded [`Metrics`] snapshot per tick.
///
/// Phase commands are checked and recorded but do not influence the
/// replayed values. Advancing past the last snapshot fails with
/// [`SimError::TraceExhausted`].
///
/// # Example
///
/// ```rust
/// use adaptive_tls::config::ControllerConfig;
/// use adaptive_tls::core::Metrics;
/// use adaptive_tls::sim::{Simulation, TraceSimulation};
///
/// let config = ControllerConfig::default();
/// let mut sim = TraceSimulation::new(
///     vec![Metrics::new(1.0, 2.0), Metrics::new(3.0, 4.0)],
///     &config,
/// );
///
/// sim.advance().unwrap();
/// assert_eq!(sim.waiting_proxy("E2_0").unwrap(), 2.0);
/// sim.advance().unwrap();
/// assert_eq!(sim.waiting_proxy("E0_0").unwrap(), 3.0);
/// assert!(sim.is_finished());
/// assert!(sim.advance().is_err());
/// ```
#[derive(Debug)]
pub struct TraceSimulation {
    frames: Vec<Metrics>,
    cursor: usize,
    signal_id: String,
    approach_h: String,
    approach_v: String,
    commands: Vec<PhaseCommand>,
    closed: bool,
}

impl TraceSimulation {
    pub fn new(frames: Vec<Metrics>, controller: &ControllerConfig) -> Self {
        Self {
            frames,
            cursor: 0,
            signal_id: controller.signal_id.clone(),
            approach_h: controller.approach_h.clone(),
            approach_v: controller.approach_v.clone(),
            commands: Vec::new(),
            closed: false,
        }
    }

    /// Parse a JSON array of `{ "waiting_h": .., "waiting_v": .. }` objects.
    pub fn from_json_str(
        json: &str,
        origin: &Path,
        controller: &ControllerConfig,
    ) -> Result<Self, SimError> {
        let frames: Vec<Metrics> =
            serde_json::from_str(json).map_err(|source| SimError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        Ok(Self::new(frames, controller))
    }

    /// Load a trace file.
    pub fn from_file(path: &Path, controller: &ControllerConfig) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json, path, controller)
    }

    /// Number of snapshots in the trace.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Ticks replayed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Every phase command received, in order.
    pub fn commands(&self) -> &[PhaseCommand] {
        &self.commands
    }

    /// Phases commanded, in order.
    pub fn commanded_phases(&self) -> Vec<Phase> {
        self.commands
            .iter()
            .filter_map(|c| Phase::from_index(c.phase_index))
            .collect()
    }

    fn ensure_open(&self) -> Result<(), SimError> {
        if self.closed {
            Err(SimError::Closed)
        } else {
            Ok(())
        }
    }

    fn current(&self) -> Result<Metrics, SimError> {
        let index = self.cursor.saturating_sub(1);
        self.frames
            .get(index)
            .copied()
            .ok_or(SimError::TraceExhausted {
                ticks: self.frames.len(),
            })
    }
}

impl Simulation for TraceSimulation {
    fn advance(&mut self) -> Result<(), SimError> {
        self.ensure_open()?;
        if self.cursor >= self.frames.len() {
            return Err(SimError::TraceExhausted {
                ticks: self.frames.len(),
            });
        }
        self.cursor += 1;
        Ok(())
    }

    fn waiting_proxy(&mut self, approach_id: &str) -> Result<f64, SimError> {
        self.ensure_open()?;
        let frame = self.current()?;
        if approach_id == self.approach_h {
            Ok(frame.waiting_h)
        } else if approach_id == self.approach_v {
            Ok(frame.waiting_v)
        } else {
            Err(SimError::UnknownApproach {
                id: approach_id.to_string(),
            })
        }
    }

    fn set_phase(&mut self, signal_id: &str, phase_index: u8) -> Result<(), SimError> {
        self.ensure_open()?;
        if signal_id != self.signal_id {
            return Err(SimError::UnknownSignal {
                id: signal_id.to_string(),
            });
        }
        let phase = Phase::from_index(phase_index).ok_or(SimError::InvalidPhase {
            index: phase_index,
        })?;
        self.commands.push(PhaseCommand::new(signal_id, phase));
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    fn close(&mut self) -> Result<(), SimError> {
        self.ensure_open()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(frames: Vec<Metrics>) -> TraceSimulation {
        TraceSimulation::new(frames, &ControllerConfig::default())
    }

    #[test]
    fn advance_past_end_is_exhausted() {
        let mut sim = sim(vec![Metrics::default()]);
        sim.advance().unwrap();
        assert!(matches!(
            sim.advance(),
            Err(SimError::TraceExhausted { ticks: 1 })
        ));
    }

    #[test]
    fn empty_trace_is_finished_immediately() {
        let mut sim = sim(Vec::new());
        assert!(sim.is_empty());
        assert!(sim.is_finished());
        assert!(sim.waiting_proxy("E0_0").is_err());
    }

    #[test]
    fn set_phase_is_recorded() {
        let mut sim = sim(vec![Metrics::default()]);
        sim.set_phase("C", 1).unwrap();
        sim.set_phase("C", 2).unwrap();
        assert_eq!(sim.commanded_phases(), vec![Phase::HYellow, Phase::VGreen]);
        assert_eq!(sim.commands()[0].signal_id, "C");
    }

    #[test]
    fn set_phase_validates_target() {
        let mut sim = sim(vec![Metrics::default()]);
        assert!(matches!(
            sim.set_phase("Z", 0),
            Err(SimError::UnknownSignal { .. })
        ));
        assert!(matches!(
            sim.set_phase("C", 4),
            Err(SimError::InvalidPhase { index: 4 })
        ));
        assert!(sim.commands().is_empty());
    }

    #[test]
    fn parses_json_trace() {
        let json = r#"[{"waiting_h": 1.0, "waiting_v": 0.5}, {"waiting_h": 0.0, "waiting_v": 9.0}]"#;
        let sim = TraceSimulation::from_json_str(
            json,
            Path::new("inline.json"),
            &ControllerConfig::default(),
        )
        .unwrap();
        assert_eq!(sim.len(), 2);
    }

    #[test]
    fn malformed_trace_reports_origin() {
        let err = TraceSimulation::from_json_str(
            "[{}",
            Path::new("broken.json"),
            &ControllerConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn closed_trace_rejects_calls() {
        let mut sim = sim(vec![Metrics::default()]);
        sim.close().unwrap();
        assert!(matches!(sim.advance(), Err(SimError::Closed)));
        assert!(matches!(sim.set_phase("C", 0), Err(SimError::Closed)));
    }
}
