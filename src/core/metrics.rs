//! Per-tick congestion snapshot.

use super::phase::Approach;
use serde::{Deserialize, Serialize};

/// Waiting-time proxies for both monitored approaches at one tick.
///
/// Snapshots are read fresh every tick and never retained by the
/// controller.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// Accumulated waiting time on the horizontal approach
    pub waiting_h: f64,
    /// Accumulated waiting time on the vertical approach
    pub waiting_v: f64,
}

impl Metrics {
    pub fn new(waiting_h: f64, waiting_v: f64) -> Self {
        Self {
            waiting_h,
            waiting_v,
        }
    }

    /// Proxy value for one approach.
    pub fn waiting(&self, approach: Approach) -> f64 {
        match approach {
            Approach::Horizontal => self.waiting_h,
            Approach::Vertical => self.waiting_v,
        }
    }

    /// Clamp NaN and negative readings to zero.
    ///
    /// Positive infinity is kept: it still compares above any threshold.
    pub fn sanitized(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_nan() || v < 0.0 {
                0.0
            } else {
                v
            }
        }
        Self {
            waiting_h: clamp(self.waiting_h),
            waiting_v: clamp(self.waiting_v),
        }
    }
}
