//! The simulation collaborator.
//!
//! The controller never talks to a simulator directly. The host drives a
//! [`Simulation`] through a narrow interface: advance one tick, query a
//! waiting proxy per approach, and set the signal phase. Two
//! implementations ship with the crate:
//!
//! - [`QueueModel`]: a deterministic two-approach intersection
//! - [`TraceSimulation`]: replays recorded metrics, one snapshot per tick
//!
//! Adapters for external micro-simulators implement the same trait.

pub mod error;
mod queue_model;
mod trace;

pub use error::SimError;
pub use queue_model::{QueueModel, QueueModelConfig};
pub use trace::TraceSimulation;

/// Command/query interface of the simulated intersection.
///
/// All calls are synchronous. A failed call is reported to the host,
/// which aborts the run; implementations do not retry.
pub trait Simulation {
    /// Advance the simulation by one tick.
    fn advance(&mut self) -> Result<(), SimError>;

    /// Congestion proxy for an approach at the current tick.
    fn waiting_proxy(&mut self, approach_id: &str) -> Result<f64, SimError>;

    /// Switch `signal_id` to the phase with the given program index.
    fn set_phase(&mut self, signal_id: &str, phase_index: u8) -> Result<(), SimError>;

    /// Whether the simulation has nothing left to run.
    ///
    /// Lets an unbounded run end on its own. Defaults to `false`.
    fn is_finished(&self) -> bool {
        false
    }

    /// Release the connection. Further calls fail with [`SimError::Closed`].
    fn close(&mut self) -> Result<(), SimError>;
}
