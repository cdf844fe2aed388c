// THEORY:
// The `Color` module is the most fundamental unit of the sizer. It is a "dumb"
// data container for a single four-channel sample (red, green, blue, alpha) plus
// the two equality lenses the rest of the system needs.
//
// Key architectural principles:
// 1.  **Wide, signed channels**: Channels are stored as `i32`, not `u8`. Raw samples
//     may arrive at 16-bit precision and claim colors come straight from a table,
//     so out-of-range values are accepted and simply propagate. Differences are
//     therefore always representable without overflow.
// 2.  **Two kinds of equality**: Exact equality (`PartialEq`/`Hash`) keys the
//     frequency tally. Approximate equality (`approx_eq`) drives claim matching: every
//     channel is compared independently against the tolerance. There is no combined
//     or Euclidean distance.
// 3.  **Truncating normalization**: Wide samples are brought back to the 8-bit range
//     by a right shift of 8 bits, never by linear rescaling. `0xABCD` becomes `0xAB`.

pub mod color {
    use serde::Serialize;
    use std::fmt;

    pub type Channel = i32;
    pub type WideChannel = u32;
    pub type Tolerance = i32;

    /// Per-channel tolerance used for claim matching unless configured otherwise.
    pub const DEFAULT_TOLERANCE: Tolerance = 50;

    const NORMALIZE_SHIFT: u32 = 8;

    /// A single four-channel color sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
    pub struct Color {
        pub red: Channel,
        pub green: Channel,
        pub blue: Channel,
        pub alpha: Channel,
    }

    impl Color {
        /// Fully transparent black, the sample returned outside a grid's bounds.
        pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

        pub const fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Color {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// An opaque color, as claim targets are declared.
        pub const fn opaque(red: Channel, green: Channel, blue: Channel) -> Self {
            Color::new(red, green, blue, 255)
        }

        /// Down-scales 16-bit samples to the 8-bit range by discarding the low byte.
        pub fn normalize(
            red: WideChannel,
            green: WideChannel,
            blue: WideChannel,
            alpha: WideChannel,
        ) -> Self {
            Color::new(
                (red >> NORMALIZE_SHIFT) as Channel,
                (green >> NORMALIZE_SHIFT) as Channel,
                (blue >> NORMALIZE_SHIFT) as Channel,
                (alpha >> NORMALIZE_SHIFT) as Channel,
            )
        }

        /// True when every channel is identical.
        pub fn exact_eq(&self, other: &Color) -> bool {
            self == other
        }

        /// True when no channel differs by more than `tolerance`.
        ///
        /// - Channel-independent and symmetric.
        /// - A tolerance of 0 is exact equality; a negative tolerance never matches.
        pub fn approx_eq(&self, other: &Color, tolerance: Tolerance) -> bool {
            (self.red - other.red).abs() <= tolerance
                && (self.green - other.green).abs() <= tolerance
                && (self.blue - other.blue).abs() <= tolerance
                && (self.alpha - other.alpha).abs() <= tolerance
        }
    }

    impl From<[u16; 4]> for Color {
        fn from(channels: [u16; 4]) -> Self {
            Color::normalize(
                channels[0] as WideChannel,
                channels[1] as WideChannel,
                channels[2] as WideChannel,
                channels[3] as WideChannel,
            )
        }
    }

    impl From<[u8; 4]> for Color {
        fn from(channels: [u8; 4]) -> Self {
            Color::new(
                channels[0] as Channel,
                channels[1] as Channel,
                channels[2] as Channel,
                channels[3] as Channel,
            )
        }
    }

    impl fmt::Display for Color {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "rgba({}, {}, {}, {})",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::color::*;

    const SAMPLES: [Color; 5] = [
        Color::new(0, 0, 0, 0),
        Color::new(255, 255, 255, 255),
        Color::new(200, 0, 0, 255),
        Color::new(12, 140, 77, 128),
        Color::new(-40, 300, 5, 255),
    ];

    #[test]
    fn identical_colors_match_at_any_tolerance() {
        for color in SAMPLES {
            for tolerance in [0, 1, 50, 255, 1000] {
                assert!(color.approx_eq(&color, tolerance), "{color} at {tolerance}");
            }
        }
    }

    #[test]
    fn matching_is_symmetric() {
        for a in SAMPLES {
            for b in SAMPLES {
                for tolerance in [0, 10, 50, 200, 255] {
                    assert_eq!(a.approx_eq(&b, tolerance), b.approx_eq(&a, tolerance));
                }
            }
        }
    }

    #[test]
    fn widening_tolerance_never_loses_a_match() {
        for a in SAMPLES {
            for b in SAMPLES {
                for tolerance in 0..=300 {
                    if a.approx_eq(&b, tolerance) {
                        assert!(a.approx_eq(&b, tolerance + 1));
                    }
                }
            }
        }
    }

    #[test]
    fn tolerance_is_inclusive_and_per_channel() {
        let base = Color::new(100, 100, 100, 255);
        assert!(base.approx_eq(&Color::new(150, 50, 150, 205), 50));
        assert!(!base.approx_eq(&Color::new(151, 100, 100, 255), 50));
        // Each channel just inside, no summed distance.
        assert!(base.approx_eq(&Color::new(149, 51, 149, 206), 49));
        assert!(!base.approx_eq(&Color::new(100, 100, 100, 204), 50));
    }

    #[test]
    fn zero_tolerance_is_exact_equality() {
        let a = Color::new(10, 20, 30, 255);
        let b = Color::new(10, 20, 31, 255);
        assert!(a.approx_eq(&a, 0));
        assert!(!a.approx_eq(&b, 0));
        assert!(a.exact_eq(&a));
        assert!(!a.exact_eq(&b));
    }

    #[test]
    fn normalize_truncates_the_low_byte() {
        let color = Color::normalize(0xABCD, 0x00FF, 0xFFFF, 0x0100);
        assert_eq!(color, Color::new(0xAB, 0x00, 0xFF, 0x01));
    }

    #[test]
    fn wide_array_conversion_normalizes() {
        assert_eq!(
            Color::from([0xC8C8u16, 0x0000, 0x00FF, 0xFFFF]),
            Color::new(200, 0, 0, 255)
        );
    }

    #[test]
    fn out_of_range_channels_propagate() {
        let color = Color::new(-1, 256, 1000, 255);
        assert_eq!(color.red, -1);
        assert_eq!(color.blue, 1000);
        assert!(color.approx_eq(&Color::new(0, 255, 999, 255), 1));
    }
}
