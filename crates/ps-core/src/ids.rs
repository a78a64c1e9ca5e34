//! Typed identifiers for agents, stages and journeys.
//!
//! Stage and journey ids index dense registries (`id.index()`); agent ids
//! are handed out monotonically and are never reused after an agent leaves
//! the simulation.

use std::fmt;

/// Typed id over `u64` with an `INVALID` sentinel and `Name(n)` display.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u64);

        impl $name {
            /// Never handed out by a registry.
            pub const INVALID: $name = $name(u64::MAX);

            /// The id of slot `i` in a dense registry.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                $name(i as u64)
            }

            /// Slot of this id in a dense registry.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identifier of a live or departed agent.  Assigned from 1 upwards.
    pub struct AgentId;
}

typed_id! {
    /// Index of a stage (exit region or waypoint) in the stage registry.
    pub struct StageId;
}

typed_id! {
    /// Index of a registered journey.
    pub struct JourneyId;
}
