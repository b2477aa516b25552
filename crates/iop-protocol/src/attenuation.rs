//! Attenuation level and register mapping
//!
//! The accessory realizes a requested attenuation through two registers: a
//! coarse register stepping once per complete decade of dB and a fine
//! register carrying the remaining units. The mapping is piecewise linear
//! over the supported 0-79 dB range:
//!
//! ```text
//! reg10 = 0xE0 + attenuation / 10     (0xE0 .. 0xE7)
//! reg1  = 0xD0 + attenuation % 10     (0xD0 .. 0xD9)
//! ```
//!
//! The panel never sets a level directly; it steps the current level by
//! 1 or 5 dB, and steps that would leave the range are rejected with the
//! level unchanged.

use std::fmt;

use crate::error::AttenuationError;

/// Lowest supported attenuation in dB
pub const MIN_ATTENUATION_DB: u8 = 0;
/// Highest supported attenuation in dB
pub const MAX_ATTENUATION_DB: u8 = 79;

/// Coarse (tens) register value at 0 dB
const COARSE_BASE: u8 = 0xE0;
/// Fine (units) register value at 0 dB
const FINE_BASE: u8 = 0xD0;

/// Attenuation steps offered by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// +1 dB
    Up1,
    /// +5 dB
    Up5,
    /// -1 dB
    Down1,
    /// -5 dB
    Down5,
}

impl Step {
    /// Signed dB delta for this step
    pub fn delta(self) -> i8 {
        match self {
            Step::Up1 => 1,
            Step::Up5 => 5,
            Step::Down1 => -1,
            Step::Down5 => -5,
        }
    }
}

/// A validated attenuation level in dB
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attenuation(u8);

impl Attenuation {
    /// Create an attenuation level, rejecting values outside 0-79 dB
    pub fn new(db: i32) -> Result<Self, AttenuationError> {
        if (i32::from(MIN_ATTENUATION_DB)..=i32::from(MAX_ATTENUATION_DB)).contains(&db) {
            Ok(Self(db as u8))
        } else {
            Err(AttenuationError::OutOfRange(db))
        }
    }

    /// The level in dB
    pub fn db(self) -> u8 {
        self.0
    }

    /// Apply a panel step, returning the new level
    ///
    /// A step that would leave the supported range is rejected and the
    /// current level stands; levels are never clamped.
    pub fn adjusted(self, step: Step) -> Result<Self, AttenuationError> {
        let target = i32::from(self.0) + i32::from(step.delta());
        Self::new(target).map_err(|_| AttenuationError::StepBlocked {
            current: self.0,
            step: step.delta(),
        })
    }

    /// Register pair realizing this level
    pub fn registers(self) -> RegisterPair {
        RegisterPair::for_attenuation(self)
    }
}

impl Default for Attenuation {
    /// Power-on level: 0 dB
    fn default() -> Self {
        Self(0)
    }
}

impl fmt::Display for Attenuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}dB", self.0)
    }
}

/// Coarse/fine register values written to the accessory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterPair {
    /// Coarse register: 0xE0 plus one per complete decade
    pub reg10: u8,
    /// Fine register: 0xD0 plus the remaining units
    pub reg1: u8,
}

impl RegisterPair {
    /// Map an attenuation level onto its register pair
    pub fn for_attenuation(level: Attenuation) -> Self {
        let decade = level.db() / 10;
        let units = level.db() % 10;
        Self {
            reg10: COARSE_BASE + decade,
            reg1: FINE_BASE + units,
        }
    }

    /// Map a raw dB value, rejecting values outside 0-79
    pub fn for_db(db: i32) -> Result<Self, AttenuationError> {
        Attenuation::new(db).map(Self::for_attenuation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_covers_full_range() {
        for db in 0..=79 {
            let regs = RegisterPair::for_db(db).unwrap();
            assert_eq!(i32::from(regs.reg10) - 0xE0, db / 10, "reg10 at {} dB", db);
            assert_eq!(i32::from(regs.reg1) - 0xD0, db % 10, "reg1 at {} dB", db);
        }
    }

    #[test]
    fn decade_table_endpoints() {
        assert_eq!(
            RegisterPair::for_db(0).unwrap(),
            RegisterPair {
                reg10: 224,
                reg1: 208
            }
        );
        assert_eq!(
            RegisterPair::for_db(9).unwrap(),
            RegisterPair {
                reg10: 224,
                reg1: 217
            }
        );
        assert_eq!(
            RegisterPair::for_db(10).unwrap(),
            RegisterPair {
                reg10: 225,
                reg1: 208
            }
        );
        assert_eq!(
            RegisterPair::for_db(79).unwrap(),
            RegisterPair {
                reg10: 231,
                reg1: 217
            }
        );
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert_eq!(
            RegisterPair::for_db(-1),
            Err(AttenuationError::OutOfRange(-1))
        );
        assert_eq!(
            RegisterPair::for_db(80),
            Err(AttenuationError::OutOfRange(80))
        );
        assert!(Attenuation::new(200).is_err());
    }

    #[test]
    fn steps_down_blocked_at_floor() {
        let zero = Attenuation::default();
        assert_eq!(
            zero.adjusted(Step::Down1),
            Err(AttenuationError::StepBlocked {
                current: 0,
                step: -1
            })
        );
        assert_eq!(
            zero.adjusted(Step::Down5),
            Err(AttenuationError::StepBlocked {
                current: 0,
                step: -5
            })
        );
    }

    #[test]
    fn steps_up_blocked_at_ceiling() {
        let top = Attenuation::new(79).unwrap();
        assert!(top.adjusted(Step::Up1).is_err());

        let near_top = Attenuation::new(75).unwrap();
        assert!(near_top.adjusted(Step::Up5).is_err());
    }

    #[test]
    fn coarse_step_down_blocked_below_five() {
        let low = Attenuation::new(4).unwrap();
        assert_eq!(
            low.adjusted(Step::Down5),
            Err(AttenuationError::StepBlocked {
                current: 4,
                step: -5
            })
        );
    }

    #[test]
    fn boundary_steps_allowed() {
        assert_eq!(
            Attenuation::new(74).unwrap().adjusted(Step::Up5).unwrap(),
            Attenuation::new(79).unwrap()
        );
        assert_eq!(
            Attenuation::new(78).unwrap().adjusted(Step::Up1).unwrap(),
            Attenuation::new(79).unwrap()
        );
        assert_eq!(
            Attenuation::new(5).unwrap().adjusted(Step::Down5).unwrap(),
            Attenuation::default()
        );
        assert_eq!(
            Attenuation::new(1).unwrap().adjusted(Step::Down1).unwrap(),
            Attenuation::default()
        );
    }

    #[test]
    fn rejected_step_reports_current_level() {
        let level = Attenuation::new(2).unwrap();
        let err = level.adjusted(Step::Down5).unwrap_err();
        assert_eq!(
            err,
            AttenuationError::StepBlocked {
                current: 2,
                step: -5
            }
        );
        assert!(err.to_string().contains("cannot proceed"));
    }

    #[test]
    fn display_matches_panel_format() {
        assert_eq!(Attenuation::new(5).unwrap().to_string(), "5dB");
    }
}
