//! Phase change history.
//!
//! Records every phase change the controller emits, keyed by the tick on
//! which it happened. Ticks, not wall-clock time, are the controller's
//! only clock.

use super::phase::Phase;
use super::rule_kind::RuleKind;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Record of a single emitted phase change.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::core::{Phase, PhaseChange, RuleKind};
///
/// let change = PhaseChange {
///     tick: 10,
///     from: Phase::HGreen,
///     to: Phase::HYellow,
///     held: 10,
///     rule: RuleKind::CongestionPreempt,
/// };
/// assert_eq!(change.from.next(), change.to);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseChange {
    /// Tick (1-based, counted from the start of the run) of the change
    pub tick: u64,
    /// Phase being left
    pub from: Phase,
    /// Phase being entered
    pub to: Phase,
    /// Ticks `from` was active before the change
    pub held: u32,
    /// Rule that caused the change
    pub rule: RuleKind,
}

/// Ordered history of phase changes.
///
/// The history can be bounded: with a limit set, only the most recent
/// `limit` changes are kept and older ones are evicted from the front.
/// [`cycles`](Self::cycles), [`count_by_rule`](Self::count_by_rule) and
/// [`total`](Self::total) cover the whole run regardless of eviction;
/// [`path`](Self::path), [`changes`](Self::changes) and
/// [`mean_duration`](Self::mean_duration) cover the retained window.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::core::{Phase, PhaseChange, PhaseHistory, RuleKind};
///
/// let history = PhaseHistory::new(Phase::HGreen)
///     .record(PhaseChange {
///         tick: 30,
///         from: Phase::HGreen,
///         to: Phase::HYellow,
///         held: 30,
///         rule: RuleKind::MaxGreen,
///     })
///     .record(PhaseChange {
///         tick: 33,
///         from: Phase::HYellow,
///         to: Phase::VGreen,
///         held: 3,
///         rule: RuleKind::YellowComplete,
///     });
///
/// assert_eq!(history.path(), vec![Phase::HGreen, Phase::HYellow, Phase::VGreen]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseHistory {
    /// Phase in effect at the start of the retained window
    start: Phase,
    changes: VecDeque<PhaseChange>,
    limit: Option<usize>,
    evicted: u64,
    cycles: u64,
    by_rule: [u64; 3],
}

impl Default for PhaseHistory {
    fn default() -> Self {
        Self::new(Phase::HGreen)
    }
}

impl PhaseHistory {
    /// Create an empty, unbounded history for a run starting in `initial`.
    pub fn new(initial: Phase) -> Self {
        Self::with_limit(initial, None)
    }

    /// Create an empty history keeping at most `limit` changes.
    pub fn with_limit(initial: Phase, limit: Option<usize>) -> Self {
        Self {
            start: initial,
            changes: VecDeque::new(),
            limit,
            evicted: 0,
            cycles: 0,
            by_rule: [0; 3],
        }
    }

    /// Change the retention limit, evicting immediately if needed.
    pub fn set_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self.evict();
        self
    }

    /// Record a change, returning the extended history.
    pub fn record(mut self, change: PhaseChange) -> Self {
        if change.to == Phase::HGreen {
            self.cycles += 1;
        }
        self.by_rule[change.rule.index()] += 1;
        self.changes.push_back(change);
        self.evict();
        self
    }

    fn evict(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.changes.len() > limit {
            if let Some(oldest) = self.changes.pop_front() {
                self.start = oldest.to;
                self.evicted += 1;
            }
        }
    }

    /// Phase in effect at the start of the retained window.
    ///
    /// This is the run's starting phase until a change is evicted.
    pub fn start(&self) -> Phase {
        self.start
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Phases visited in order: the window's start, then each `to`.
    pub fn path(&self) -> Vec<Phase> {
        std::iter::once(self.start)
            .chain(self.changes.iter().map(|c| c.to))
            .collect()
    }

    /// Retained changes in order.
    pub fn changes(&self) -> &VecDeque<PhaseChange> {
        &self.changes
    }

    /// Number of retained changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Changes dropped to honor the limit.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Every change ever recorded, retained or not.
    pub fn total(&self) -> u64 {
        self.evicted + self.changes.len() as u64
    }

    /// Number of completed cycles, counted as returns to `HGreen`.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Changes fired by a given rule.
    pub fn count_by_rule(&self, rule: RuleKind) -> u64 {
        self.by_rule[rule.index()]
    }

    /// Mean completed duration of `phase` over the retained window, in ticks.
    ///
    /// Returns `None` if `phase` never completed within the window.
    pub fn mean_duration(&self, phase: Phase) -> Option<f64> {
        let (count, total) = self
            .changes
            .iter()
            .filter(|c| c.from == phase)
            .fold((0u64, 0u64), |(n, sum), c| (n + 1, sum + u64::from(c.held)));
        if count == 0 {
            None
        } else {
            Some(total as f64 / count as f64)
        }
    }
}
