//! # Six-Step Commutation
//!
//! Decodes the Hall triplet into one of six inverter sectors and produces the
//! ideal terminal voltage of each phase. In every sector one phase is tied to
//! `+Vdc`, one to `-Vdc` and the third floats (modeled as 0 V).
//!
//! | Hall (H1H2H3) | state | active |
//! |---------------|-------|--------|
//! | 101           | 1     | A+ B-  |
//! | 100           | 2     | A+ C-  |
//! | 110           | 3     | B+ C-  |
//! | 010           | 4     | B+ A-  |
//! | 011           | 5     | C+ A-  |
//! | 001           | 6     | C+ B-  |
//! | 000 / 111     | 0     | none   |

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::hall::HallSignals;
use super::three_phase::PhaseValues;

/// Inverter switching state
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum CommutationState {
    /// Invalid Hall code: all phases undriven
    #[default]
    #[strum(to_string = "off")]
    Off,
    #[strum(to_string = "A+ B-")]
    AB,
    #[strum(to_string = "A+ C-")]
    AC,
    #[strum(to_string = "B+ C-")]
    BC,
    #[strum(to_string = "B+ A-")]
    BA,
    #[strum(to_string = "C+ A-")]
    CA,
    #[strum(to_string = "C+ B-")]
    CB,
}

impl CommutationState {
    /// Decode a Hall triplet; `000` and `111` give [`CommutationState::Off`]
    pub fn from_hall(hall: HallSignals) -> Self {
        match hall.bits() {
            0b101 => Self::AB,
            0b100 => Self::AC,
            0b110 => Self::BC,
            0b010 => Self::BA,
            0b011 => Self::CA,
            0b001 => Self::CB,
            _ => Self::Off,
        }
    }

    /// Sector number, 1..=6, or 0 when off
    pub fn index(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::AB => 1,
            Self::AC => 2,
            Self::BC => 3,
            Self::BA => 4,
            Self::CA => 5,
            Self::CB => 6,
        }
    }

    /// Inverse of [`CommutationState::index`]; out-of-range numbers are off
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::AB,
            2 => Self::AC,
            3 => Self::BC,
            4 => Self::BA,
            5 => Self::CA,
            6 => Self::CB,
            _ => Self::Off,
        }
    }

    /// Whether the inverter drives any phase
    pub fn is_driving(self) -> bool {
        self != Self::Off
    }

    /// Ideal terminal voltages for this sector
    pub fn phase_voltages(self, vdc: f64) -> PhaseValues {
        match self {
            Self::AB => PhaseValues::new(vdc, -vdc, 0.0),
            Self::AC => PhaseValues::new(vdc, 0.0, -vdc),
            Self::BC => PhaseValues::new(0.0, vdc, -vdc),
            Self::BA => PhaseValues::new(-vdc, vdc, 0.0),
            Self::CA => PhaseValues::new(-vdc, 0.0, vdc),
            Self::CB => PhaseValues::new(0.0, -vdc, vdc),
            Self::Off => PhaseValues::ZERO,
        }
    }
}

/// Sector number (0..=6) for a Hall triplet
pub fn commutation_state(hall: HallSignals) -> u8 {
    CommutationState::from_hall(hall).index()
}

/// Terminal voltages for a sector number; anything outside 1..=6 is zero drive
pub fn phase_voltages(state: u8, vdc: f64) -> PhaseValues {
    CommutationState::from_index(state).phase_voltages(vdc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(0b101, 1)]
    #[case(0b100, 2)]
    #[case(0b110, 3)]
    #[case(0b010, 4)]
    #[case(0b011, 5)]
    #[case(0b001, 6)]
    #[case(0b000, 0)]
    #[case(0b111, 0)]
    fn test_commutation_table(#[case] bits: u8, #[case] state: u8) {
        assert_eq!(commutation_state(HallSignals::from_bits(bits)), state);
    }

    #[rstest]
    #[case(1, (24.0, -24.0, 0.0))]
    #[case(2, (24.0, 0.0, -24.0))]
    #[case(3, (0.0, 24.0, -24.0))]
    #[case(4, (-24.0, 24.0, 0.0))]
    #[case(5, (-24.0, 0.0, 24.0))]
    #[case(6, (0.0, -24.0, 24.0))]
    #[case(0, (0.0, 0.0, 0.0))]
    #[case(9, (0.0, 0.0, 0.0))]
    fn test_voltage_patterns(#[case] state: u8, #[case] expected: (f64, f64, f64)) {
        assert_eq!(phase_voltages(state, 24.0), PhaseValues::from(expected));
    }

    #[test]
    fn test_voltages_odd_in_vdc() {
        for state in CommutationState::iter().filter(|s| s.is_driving()) {
            let pos = state.phase_voltages(24.0);
            let neg = state.phase_voltages(-24.0);
            assert_eq!(pos, -neg, "state {state}");
        }
    }

    #[test]
    fn test_each_sector_drives_two_phases() {
        for state in CommutationState::iter().filter(|s| s.is_driving()) {
            let v = state.phase_voltages(12.0);
            let active = v.as_array().iter().filter(|x| **x != 0.0).count();
            assert_eq!(active, 2);
            assert_eq!(v.total(), 0.0);
        }
    }

    #[test]
    fn test_only_invalid_codes_turn_off() {
        for bits in 0u8..8 {
            let hall = HallSignals::from_bits(bits);
            assert_eq!(
                CommutationState::from_hall(hall).is_driving(),
                hall.is_valid(),
                "code {hall}"
            );
        }
    }

    #[test]
    fn test_index_roundtrip() {
        for state in CommutationState::iter() {
            assert_eq!(CommutationState::from_index(state.index()), state);
        }
    }

    #[test]
    fn test_display_names_switches() {
        assert_eq!(CommutationState::AB.to_string(), "A+ B-");
        assert_eq!(CommutationState::Off.to_string(), "off");
    }
}
