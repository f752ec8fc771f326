//! Ordered transition rules.
//!
//! Rules are evaluated in priority order and the first one whose guard
//! passes decides the next phase. The standard set is:
//!
//! 1. [`RuleKind::YellowComplete`]: a yellow that has run its full
//!    duration gives way to the opposing green. Yellow is never extended
//!    or cut short.
//! 2. [`RuleKind::CongestionPreempt`]: a green that has run at least
//!    `min_green` ends when the opposing approach's waiting proxy exceeds
//!    the threshold.
//! 3. [`RuleKind::MaxGreen`]: a green that has run `max_green` ends
//!    regardless of queues.
//!
//! If nothing fires the phase is held.

use crate::config::PhaseTiming;
use crate::core::{ControllerState, Guard, Metrics, Phase, RuleKind};
use std::fmt;

/// Everything a rule may look at.
///
/// `state.timer` already includes the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleContext {
    pub state: ControllerState,
    pub metrics: Metrics,
    pub timing: PhaseTiming,
}

impl RuleContext {
    /// Waiting proxy of the approach that is currently held at red.
    pub fn opposing_waiting(&self) -> f64 {
        self.metrics
            .waiting(self.state.phase.approach().opposing())
    }
}

/// A guarded transition: when `guard` passes, move to `target(phase)`.
pub struct Rule {
    pub kind: RuleKind,
    pub guard: Guard<RuleContext>,
    pub target: fn(Phase) -> Phase,
}

impl Rule {
    pub fn new(kind: RuleKind, guard: Guard<RuleContext>, target: fn(Phase) -> Phase) -> Self {
        Self {
            kind,
            guard,
            target,
        }
    }

    /// Next phase if this rule fires in `context`.
    pub fn apply(&self, context: &RuleContext) -> Option<Phase> {
        if self.guard.check(context) {
            Some((self.target)(context.state.phase))
        } else {
            None
        }
    }

    /// Yellow has run for `yellow_duration` ticks.
    pub fn yellow_complete() -> Self {
        let in_yellow = Guard::new(|c: &RuleContext| c.state.phase.is_yellow());
        let elapsed = Guard::new(|c: &RuleContext| c.state.timer >= c.timing.yellow_duration);
        Self::new(RuleKind::YellowComplete, in_yellow.and(elapsed), Phase::next)
    }

    /// Green has served `min_green` ticks and the other approach is congested.
    pub fn congestion_preempt() -> Self {
        let in_green = Guard::new(|c: &RuleContext| c.state.phase.is_green());
        let served = Guard::new(|c: &RuleContext| c.state.timer >= c.timing.min_green);
        let congested = Guard::new(|c: &RuleContext| c.opposing_waiting() > c.timing.threshold);
        Self::new(
            RuleKind::CongestionPreempt,
            in_green.and(served).and(congested),
            Phase::next,
        )
    }

    /// Green has reached `max_green` ticks.
    pub fn max_green() -> Self {
        let in_green = Guard::new(|c: &RuleContext| c.state.phase.is_green());
        let expired = Guard::new(|c: &RuleContext| c.state.timer >= c.timing.max_green);
        Self::new(RuleKind::MaxGreen, in_green.and(expired), Phase::next)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("kind", &self.kind).finish()
    }
}

/// Rules in priority order.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::config::PhaseTiming;
/// use adaptive_tls::control::{RuleContext, RuleKind, RuleSet};
/// use adaptive_tls::core::{ControllerState, Metrics, Phase};
///
/// let rules = RuleSet::standard();
/// let context = RuleContext {
///     state: ControllerState::new(Phase::HYellow, 3),
///     metrics: Metrics::new(100.0, 100.0),
///     timing: PhaseTiming::default(),
/// };
///
/// assert_eq!(
///     rules.evaluate(&context),
///     Some((RuleKind::YellowComplete, Phase::VGreen))
/// );
/// ```
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    /// Yellow completion, congestion preemption, then max green.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Rule::yellow_complete(),
                Rule::congestion_preempt(),
                Rule::max_green(),
            ],
        }
    }

    /// A rule set in exactly the given order.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First rule that fires, with the phase it selects.
    pub fn evaluate(&self, context: &RuleContext) -> Option<(RuleKind, Phase)> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(context).map(|next| (rule.kind, next)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(phase: Phase, timer: u32, waiting_h: f64, waiting_v: f64) -> RuleContext {
        RuleContext {
            state: ControllerState::new(phase, timer),
            metrics: Metrics::new(waiting_h, waiting_v),
            timing: PhaseTiming::default(),
        }
    }

    #[test]
    fn standard_order_is_fixed() {
        let kinds: Vec<RuleKind> = RuleSet::standard().rules().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::YellowComplete,
                RuleKind::CongestionPreempt,
                RuleKind::MaxGreen
            ]
        );
    }

    #[test]
    fn yellow_waits_for_full_duration() {
        let rule = Rule::yellow_complete();
        assert_eq!(rule.apply(&context(Phase::HYellow, 2, 0.0, 0.0)), None);
        assert_eq!(
            rule.apply(&context(Phase::HYellow, 3, 0.0, 0.0)),
            Some(Phase::VGreen)
        );
        assert_eq!(
            rule.apply(&context(Phase::VYellow, 3, 0.0, 0.0)),
            Some(Phase::HGreen)
        );
    }

    #[test]
    fn yellow_ignores_congestion() {
        let rules = RuleSet::standard();
        assert_eq!(rules.evaluate(&context(Phase::HYellow, 1, 99.0, 99.0)), None);
    }

    #[test]
    fn preempt_watches_opposing_approach() {
        let rule = Rule::congestion_preempt();
        // Own approach congested, opposing quiet: hold.
        assert_eq!(rule.apply(&context(Phase::HGreen, 10, 50.0, 0.0)), None);
        assert_eq!(
            rule.apply(&context(Phase::HGreen, 10, 0.0, 6.0)),
            Some(Phase::HYellow)
        );
        assert_eq!(
            rule.apply(&context(Phase::VGreen, 10, 6.0, 0.0)),
            Some(Phase::VYellow)
        );
    }

    #[test]
    fn preempt_requires_strictly_above_threshold() {
        let rule = Rule::congestion_preempt();
        assert_eq!(rule.apply(&context(Phase::HGreen, 10, 0.0, 5.0)), None);
    }

    #[test]
    fn preempt_blocked_before_min_green() {
        let rule = Rule::congestion_preempt();
        assert_eq!(rule.apply(&context(Phase::HGreen, 9, 0.0, 1000.0)), None);
    }

    #[test]
    fn max_green_fires_without_congestion() {
        let rules = RuleSet::standard();
        assert_eq!(rules.evaluate(&context(Phase::VGreen, 29, 0.0, 0.0)), None);
        assert_eq!(
            rules.evaluate(&context(Phase::VGreen, 30, 0.0, 0.0)),
            Some((RuleKind::MaxGreen, Phase::VYellow))
        );
    }

    #[test]
    fn preempt_wins_over_max_green() {
        let rules = RuleSet::standard();
        assert_eq!(
            rules.evaluate(&context(Phase::HGreen, 30, 0.0, 9.0)),
            Some((RuleKind::CongestionPreempt, Phase::HYellow))
        );
    }

    #[test]
    fn green_rules_never_fire_in_yellow() {
        assert_eq!(Rule::max_green().apply(&context(Phase::HYellow, 40, 0.0, 0.0)), None);
        assert_eq!(
            Rule::congestion_preempt().apply(&context(Phase::VYellow, 40, 99.0, 99.0)),
            None
        );
    }

    #[test]
    fn custom_order_is_respected() {
        let rules = RuleSet::from_rules(vec![Rule::max_green(), Rule::congestion_preempt()]);
        assert_eq!(
            rules.evaluate(&context(Phase::HGreen, 30, 0.0, 9.0)),
            Some((RuleKind::MaxGreen, Phase::HYellow))
        );
    }

    #[test]
    fn rule_kind_names() {
        assert_eq!(RuleKind::MaxGreen.to_string(), "max_green");
        assert_eq!(RuleKind::YellowComplete.name(), "yellow_complete");
    }
}
