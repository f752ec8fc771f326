//! Deterministic queue model of a two-approach intersection.
//!
//! Vehicles arrive at a fixed fractional rate per approach and wait at the
//! stop line. While an approach shows green, queued vehicles leave at the
//! discharge rate, front first. The waiting proxy of an approach is the
//! summed ticks waited by every vehicle still queued on it, the same
//! quantity a micro-simulator reports as a lane's accumulated waiting
//! time.

use crate::config::ControllerConfig;
use crate::core::{Approach, Phase};
use crate::sim::{SimError, Simulation};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Parameters of the built-in queue model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueModelConfig {
    /// Vehicles arriving on the horizontal approach per tick
    pub arrival_h: f64,
    /// Vehicles arriving on the vertical approach per tick
    pub arrival_v: f64,
    /// Vehicles leaving a green approach per tick
    pub discharge: f64,
    /// Vehicles already waiting on the horizontal approach at tick zero
    pub initial_queue_h: u32,
    /// Vehicles already waiting on the vertical approach at tick zero
    pub initial_queue_v: u32,
    /// Ticks after which the model reports itself finished; `None` never ends
    pub duration: Option<u64>,
}

impl Default for QueueModelConfig {
    fn default() -> Self {
        Self {
            arrival_h: 0.25,
            arrival_v: 0.2,
            discharge: 0.5,
            initial_queue_h: 0,
            initial_queue_v: 0,
            duration: None,
        }
    }
}

#[derive(Debug)]
struct Lane {
    id: String,
    arrival: f64,
    arrival_credit: f64,
    discharge_credit: f64,
    /// Ticks waited by each queued vehicle, front of the queue first
    waiting: VecDeque<u64>,
}

impl Lane {
    fn new(id: &str, arrival: f64, initial_queue: u32) -> Self {
        Self {
            id: id.to_string(),
            arrival,
            arrival_credit: 0.0,
            discharge_credit: 0.0,
            waiting: std::iter::repeat(0).take(initial_queue as usize).collect(),
        }
    }

    fn advance(&mut self, green: bool, discharge: f64) {
        if green {
            self.discharge_credit += discharge;
            while self.discharge_credit >= 1.0 && self.waiting.pop_front().is_some() {
                self.discharge_credit -= 1.0;
            }
            if self.waiting.is_empty() {
                self.discharge_credit = 0.0;
            }
        } else {
            self.discharge_credit = 0.0;
        }

        for waited in self.waiting.iter_mut() {
            *waited += 1;
        }

        self.arrival_credit += self.arrival;
        while self.arrival_credit >= 1.0 {
            self.waiting.push_back(0);
            self.arrival_credit -= 1.0;
        }
    }

    fn accumulated_waiting(&self) -> f64 {
        self.waiting.iter().sum::<u64>() as f64
    }
}

/// Built-in synthetic intersection.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::config::ControllerConfig;
/// use adaptive_tls::core::Approach;
/// use adaptive_tls::sim::{QueueModel, QueueModelConfig, Simulation};
///
/// let controller = ControllerConfig::default();
/// let mut model = QueueModel::new(QueueModelConfig::default(), &controller);
///
/// for _ in 0..20 {
///     model.advance().unwrap();
/// }
///
/// // Horizontal has green at the start, so only vertical traffic queues.
/// assert_eq!(model.queue_length(Approach::Horizontal), 0);
/// assert!(model.queue_length(Approach::Vertical) > 0);
/// assert!(model.waiting_proxy("E2_0").unwrap() > 0.0);
/// ```
#[derive(Debug)]
pub struct QueueModel {
    signal_id: String,
    discharge: f64,
    phase: Phase,
    horizontal: Lane,
    vertical: Lane,
    tick: u64,
    duration: Option<u64>,
    closed: bool,
}

impl QueueModel {
    /// Model addressed by the identifiers in `controller`, starting in `HGreen`.
    pub fn new(config: QueueModelConfig, controller: &ControllerConfig) -> Self {
        Self {
            signal_id: controller.signal_id.clone(),
            discharge: config.discharge,
            phase: Phase::HGreen,
            horizontal: Lane::new(&controller.approach_h, config.arrival_h, config.initial_queue_h),
            vertical: Lane::new(&controller.approach_v, config.arrival_v, config.initial_queue_v),
            tick: 0,
            duration: config.duration,
            closed: false,
        }
    }

    /// Phase the signal is currently showing.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Vehicles currently queued on an approach.
    pub fn queue_length(&self, approach: Approach) -> usize {
        self.lane(approach).waiting.len()
    }

    fn lane(&self, approach: Approach) -> &Lane {
        match approach {
            Approach::Horizontal => &self.horizontal,
            Approach::Vertical => &self.vertical,
        }
    }

    fn ensure_open(&self) -> Result<(), SimError> {
        if self.closed {
            Err(SimError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Simulation for QueueModel {
    fn advance(&mut self) -> Result<(), SimError> {
        self.ensure_open()?;
        let green = |approach| self.phase.is_green() && self.phase.approach() == approach;
        let (h_green, v_green) = (green(Approach::Horizontal), green(Approach::Vertical));
        self.horizontal.advance(h_green, self.discharge);
        self.vertical.advance(v_green, self.discharge);
        self.tick += 1;
        Ok(())
    }

    fn waiting_proxy(&mut self, approach_id: &str) -> Result<f64, SimError> {
        self.ensure_open()?;
        [&self.horizontal, &self.vertical]
            .into_iter()
            .find(|lane| lane.id == approach_id)
            .map(Lane::accumulated_waiting)
            .ok_or_else(|| SimError::UnknownApproach {
                id: approach_id.to_string(),
            })
    }

    fn set_phase(&mut self, signal_id: &str, phase_index: u8) -> Result<(), SimError> {
        self.ensure_open()?;
        if signal_id != self.signal_id {
            return Err(SimError::UnknownSignal {
                id: signal_id.to_string(),
            });
        }
        self.phase = Phase::from_index(phase_index).ok_or(SimError::InvalidPhase {
            index: phase_index,
        })?;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.duration.is_some_and(|duration| self.tick >= duration)
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

    fn model(config: QueueModelConfig) -> QueueModel {
        QueueModel::new(config, &ControllerConfig::default())
    }

    #[test]
    fn red_approach_accumulates_waiting_time() {
        let mut model = model(QueueModelConfig {
            arrival_h: 0.0,
            arrival_v: 1.0,
            ..QueueModelConfig::default()
        });

        for _ in 0..3 {
            model.advance().unwrap();
        }

        // Arrivals at ticks 1, 2, 3 have waited 2, 1 and 0 ticks.
        assert_eq!(model.queue_length(Approach::Vertical), 3);
        assert_eq!(model.waiting_proxy("E2_0").unwrap(), 3.0);
        assert_eq!(model.waiting_proxy("E0_0").unwrap(), 0.0);
    }

    #[test]
    fn green_approach_discharges() {
        let mut model = model(QueueModelConfig {
            arrival_h: 0.0,
            arrival_v: 0.0,
            discharge: 1.0,
            initial_queue_h: 0,
            initial_queue_v: 4,
            ..QueueModelConfig::default()
        });

        model.set_phase("C", Phase::VGreen.index()).unwrap();
        model.advance().unwrap();
        model.advance().unwrap();

        assert_eq!(model.queue_length(Approach::Vertical), 2);
    }

    #[test]
    fn yellow_does_not_discharge() {
        let mut model = model(QueueModelConfig {
            arrival_h: 0.0,
            arrival_v: 0.0,
            discharge: 1.0,
            initial_queue_h: 3,
            initial_queue_v: 0,
            ..QueueModelConfig::default()
        });

        model.set_phase("C", Phase::HYellow.index()).unwrap();
        model.advance().unwrap();

        assert_eq!(model.queue_length(Approach::Horizontal), 3);
        assert_eq!(model.waiting_proxy("E0_0").unwrap(), 3.0);
    }

    #[test]
    fn fractional_rates_accumulate() {
        let mut model = model(QueueModelConfig {
            arrival_h: 0.0,
            arrival_v: 0.5,
            ..QueueModelConfig::default()
        });

        for _ in 0..4 {
            model.advance().unwrap();
        }
        assert_eq!(model.queue_length(Approach::Vertical), 2);
    }

    #[test]
    fn unknown_identifiers_are_errors() {
        let mut model = model(QueueModelConfig::default());
        assert!(matches!(
            model.waiting_proxy("nope"),
            Err(SimError::UnknownApproach { .. })
        ));
        assert!(matches!(
            model.set_phase("X", 0),
            Err(SimError::UnknownSignal { .. })
        ));
        assert!(matches!(
            model.set_phase("C", 7),
            Err(SimError::InvalidPhase { index: 7 })
        ));
    }

    #[test]
    fn duration_ends_the_model() {
        let mut model = model(QueueModelConfig {
            duration: Some(2),
            ..QueueModelConfig::default()
        });
        assert!(!model.is_finished());
        model.advance().unwrap();
        assert!(!model.is_finished());
        model.advance().unwrap();
        assert!(model.is_finished());
    }

    #[test]
    fn without_duration_the_model_never_finishes() {
        let mut model = model(QueueModelConfig::default());
        for _ in 0..500 {
            model.advance().unwrap();
        }
        assert!(!model.is_finished());
    }

    #[test]
    fn closed_model_rejects_calls() {
        let mut model = model(QueueModelConfig::default());
        model.close().unwrap();
        assert!(matches!(model.advance(), Err(SimError::Closed)));
        assert!(matches!(model.close(), Err(SimError::Closed)));
    }
}
