//! Signal phases and the approaches they serve.
//!
//! The intersection runs a fixed four-phase cycle over two conflicting
//! approaches. Each phase carries the index the external signal program
//! uses for it; [`Phase::index`] and [`Phase::from_index`] are the only
//! places that mapping lives.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two monitored traffic streams.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Approach {
    Horizontal,
    Vertical,
}

impl Approach {
    /// The approach that conflicts with this one.
    pub fn opposing(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// A discrete signal state of the intersection.
///
/// Phases form a cycle:
/// `HGreen -> HYellow -> VGreen -> VYellow -> HGreen`.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::core::{Approach, Phase};
///
/// assert_eq!(Phase::HGreen.next(), Phase::HYellow);
/// assert_eq!(Phase::VYellow.next(), Phase::HGreen);
/// assert_eq!(Phase::VGreen.index(), 2);
/// assert_eq!(Phase::from_index(1), Some(Phase::HYellow));
/// assert_eq!(Phase::HGreen.approach(), Approach::Horizontal);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Horizontal approach has green.
    #[default]
    HGreen,
    /// Horizontal approach clearing.
    HYellow,
    /// Vertical approach has green.
    VGreen,
    /// Vertical approach clearing.
    VYellow,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Phase; 4] = [Phase::HGreen, Phase::HYellow, Phase::VGreen, Phase::VYellow];

    /// Index of this phase in the external signal program.
    pub fn index(self) -> u8 {
        match self {
            Self::HGreen => 0,
            Self::HYellow => 1,
            Self::VGreen => 2,
            Self::VYellow => 3,
        }
    }

    /// Map an external program index back to a phase.
    ///
    /// Returns `None` for indices outside the four-phase program.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::HGreen),
            1 => Some(Self::HYellow),
            2 => Some(Self::VGreen),
            3 => Some(Self::VYellow),
            _ => None,
        }
    }

    /// Display name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HGreen => "H_GREEN",
            Self::HYellow => "H_YELLOW",
            Self::VGreen => "V_GREEN",
            Self::VYellow => "V_YELLOW",
        }
    }

    pub fn is_green(self) -> bool {
        matches!(self, Self::HGreen | Self::VGreen)
    }

    pub fn is_yellow(self) -> bool {
        matches!(self, Self::HYellow | Self::VYellow)
    }

    /// The approach this phase shows green or yellow to.
    pub fn approach(self) -> Approach {
        match self {
            Self::HGreen | Self::HYellow => Approach::Horizontal,
            Self::VGreen | Self::VYellow => Approach::Vertical,
        }
    }

    /// The successor in the fixed cycle.
    ///
    /// Green phases move to their own yellow, yellow phases move to the
    /// opposing green. There is no other edge.
    pub fn next(self) -> Self {
        match self {
            Self::HGreen => Self::HYellow,
            Self::HYellow => Self::VGreen,
            Self::VGreen => Self::VYellow,
            Self::VYellow => Self::HGreen,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_mapping_matches_signal_program() {
        assert_eq!(Phase::HGreen.index(), 0);
        assert_eq!(Phase::HYellow.index(), 1);
        assert_eq!(Phase::VGreen.index(), 2);
        assert_eq!(Phase::VYellow.index(), 3);
    }

    #[test]
    fn from_index_inverts_index() {
        for phase in Phase::ALL {
            assert_eq!(Phase::from_index(phase.index()), Some(phase));
        }
        assert_eq!(Phase::from_index(4), None);
        assert_eq!(Phase::from_index(u8::MAX), None);
    }

    #[test]
    fn cycle_returns_to_start_after_four_steps() {
        let mut phase = Phase::HGreen;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(phase);
            phase = phase.next();
        }
        assert_eq!(phase, Phase::HGreen);
        assert_eq!(seen, Phase::ALL.to_vec());
    }

    #[test]
    fn yellow_is_followed_by_opposing_green() {
        assert_eq!(Phase::HYellow.next(), Phase::VGreen);
        assert_eq!(Phase::VYellow.next(), Phase::HGreen);
        assert_ne!(Phase::HYellow.next().approach(), Phase::HYellow.approach());
    }

    #[test]
    fn green_and_yellow_are_disjoint() {
        for phase in Phase::ALL {
            assert_ne!(phase.is_green(), phase.is_yellow());
        }
    }

    #[test]
    fn opposing_approach_is_an_involution() {
        assert_eq!(Approach::Horizontal.opposing(), Approach::Vertical);
        assert_eq!(Approach::Vertical.opposing().opposing(), Approach::Vertical);
    }

    #[test]
    fn display_uses_signal_names() {
        assert_eq!(Phase::VYellow.to_string(), "V_YELLOW");
        assert_eq!(Phase::default(), Phase::HGreen);
    }

    #[test]
    fn phase_serializes_correctly() {
        let json = serde_json::to_string(&Phase::VGreen).unwrap();
        let deserialized: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, Phase::VGreen);
    }
}
