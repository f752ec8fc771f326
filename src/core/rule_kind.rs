//! Identifiers for the transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies which rule produced a phase change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    YellowComplete,
    CongestionPreempt,
    MaxGreen,
}

impl RuleKind {
    /// Every rule kind, in priority order.
    pub const ALL: [RuleKind; 3] = [Self::YellowComplete, Self::CongestionPreempt, Self::MaxGreen];

    pub fn name(&self) -> &'static str {
        match self {
            Self::YellowComplete => "yellow_complete",
            Self::CongestionPreempt => "congestion_preempt",
            Self::MaxGreen => "max_green",
        }
    }

    /// Position in [`RuleKind::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::YellowComplete => 0,
            Self::CongestionPreempt => 1,
            Self::MaxGreen => 2,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_priority_order() {
        for (i, kind) in RuleKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn display_uses_snake_case_name() {
        assert_eq!(RuleKind::CongestionPreempt.to_string(), "congestion_preempt");
    }
}
