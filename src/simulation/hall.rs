//! # Hall Sensor Model
//!
//! Three digital Hall sensors report rotor position as 180°-wide square waves of
//! the electrical angle. Sensor H1 is high on `[0, π)`; H2 and H3 are the same
//! window rotated by the sensor spacing.
//!
//! Two mountings are modeled:
//! - [`HallLayout::Spaced60`] (default): H2 on `[π/3, 4π/3)`, H3 on `[2π/3, 5π/3)`.
//!   The windows overlap so that `111` appears on `[2π/3, π)` and `000` on
//!   `[5π/3, 2π)`; both decode to zero drive.
//! - [`HallLayout::Spaced120`]: H2 on `[2π/3, 5π/3)`, H3 on `[4π/3, 7π/3)`.
//!   Every sector yields one of the six valid codes in the order 1..=6 of the
//!   commutation table.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use super::angle::wrap_angle;

/// Hall sensor triplet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HallSignals {
    pub h1: bool,
    pub h2: bool,
    pub h3: bool,
}

impl HallSignals {
    pub const fn new(h1: bool, h2: bool, h3: bool) -> Self {
        Self { h1, h2, h3 }
    }

    /// Pack as `(H1 << 2) | (H2 << 1) | H3`
    pub fn bits(&self) -> u8 {
        (u8::from(self.h1) << 2) | (u8::from(self.h2) << 1) | u8::from(self.h3)
    }

    /// Unpack the low three bits of `bits`
    pub fn from_bits(bits: u8) -> Self {
        Self {
            h1: bits & 0b100 != 0,
            h2: bits & 0b010 != 0,
            h3: bits & 0b001 != 0,
        }
    }

    /// `000` and `111` cannot identify a sector
    pub fn is_valid(&self) -> bool {
        !matches!(self.bits(), 0b000 | 0b111)
    }
}

impl fmt::Display for HallSignals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03b}", self.bits())
    }
}

/// Angular placement of the three sensors around the stator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HallLayout {
    /// Sensor windows start at 0, π/3 and 2π/3
    #[default]
    Spaced60,
    /// Sensor windows start at 0, 2π/3 and 4π/3
    Spaced120,
}

impl HallLayout {
    /// Start of each sensor's high window (rad, electrical)
    fn offsets(self) -> [f64; 3] {
        match self {
            HallLayout::Spaced60 => [0.0, PI / 3.0, 2.0 * PI / 3.0],
            HallLayout::Spaced120 => [0.0, 2.0 * PI / 3.0, 4.0 * PI / 3.0],
        }
    }

    /// Sensor outputs at electrical angle `theta_e`
    pub fn signals(self, theta_e: f64) -> HallSignals {
        let theta = wrap_angle(theta_e);
        let [o1, o2, o3] = self.offsets();
        HallSignals {
            h1: in_half_turn(theta, o1),
            h2: in_half_turn(theta, o2),
            h3: in_half_turn(theta, o3),
        }
    }
}

/// `theta` lies in `[start, start + π)`, wrapping past 2π
fn in_half_turn(theta: f64, start: f64) -> bool {
    let end = start + PI;
    if end <= 2.0 * PI {
        (start..end).contains(&theta)
    } else {
        theta >= start || theta < end - 2.0 * PI
    }
}

/// Hall outputs for the default sensor layout
pub fn hall_signals(theta_e: f64) -> HallSignals {
    HallLayout::default().signals(theta_e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, (true, false, false))]
    #[case(PI / 2.0, (true, true, false))]
    #[case(5.0 * PI / 6.0, (true, true, true))]
    #[case(7.0 * PI / 6.0, (false, true, true))]
    #[case(3.0 * PI / 2.0, (false, false, true))]
    #[case(11.0 * PI / 6.0, (false, false, false))]
    fn test_default_layout_windows(#[case] theta: f64, #[case] expected: (bool, bool, bool)) {
        let h = hall_signals(theta);
        assert_eq!((h.h1, h.h2, h.h3), expected);
    }

    #[test]
    fn test_boundary_at_zero() {
        let h = hall_signals(0.0);
        assert_eq!(h, HallSignals::new(true, false, false));
        assert_eq!(h.bits(), 0b100);
    }

    #[test]
    fn test_negative_angle_wraps() {
        assert_eq!(hall_signals(-PI / 2.0), hall_signals(3.0 * PI / 2.0));
    }

    #[rstest]
    #[case(PI / 6.0, 0b101)]
    #[case(PI / 2.0, 0b100)]
    #[case(5.0 * PI / 6.0, 0b110)]
    #[case(7.0 * PI / 6.0, 0b010)]
    #[case(3.0 * PI / 2.0, 0b011)]
    #[case(11.0 * PI / 6.0, 0b001)]
    fn test_spaced_120_sectors(#[case] theta: f64, #[case] bits: u8) {
        assert_eq!(HallLayout::Spaced120.signals(theta).bits(), bits);
    }

    #[test]
    fn test_bits_roundtrip_all_codes() {
        for bits in 0u8..8 {
            assert_eq!(HallSignals::from_bits(bits).bits(), bits);
        }
        assert!(!HallSignals::from_bits(0b000).is_valid());
        assert!(!HallSignals::from_bits(0b111).is_valid());
        assert!(HallSignals::from_bits(0b101).is_valid());
    }

    #[test]
    fn test_display_is_binary() {
        assert_eq!(HallSignals::new(true, false, true).to_string(), "101");
    }

    proptest! {
        #[test]
        fn spaced_120_always_valid(theta in -50.0f64..50.0) {
            prop_assert!(HallLayout::Spaced120.signals(theta).is_valid());
        }

        #[test]
        fn spaced_120_valid_far_from_zero(theta in 1.0e15f64..1.0e18) {
            prop_assert!(HallLayout::Spaced120.signals(theta).is_valid());
            prop_assert!(HallLayout::Spaced120.signals(-theta).is_valid());
        }

        #[test]
        fn every_sensor_high_half_the_turn(theta in 0.0f64..PI) {
            // exactly one of θ and θ+π sees each sensor high
            for layout in [HallLayout::Spaced60, HallLayout::Spaced120] {
                let a = layout.signals(theta);
                let b = layout.signals(theta + PI);
                prop_assert_ne!(a.h1, b.h1);
                prop_assert_ne!(a.h2, b.h2);
                prop_assert_ne!(a.h3, b.h3);
            }
        }
    }
}
