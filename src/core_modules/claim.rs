// THEORY:
// A `Claim` is a named territory on the map. It is defined by the color it is
// painted in and carries an opaque classification code through untouched. Its
// `count` is the only mutable part, and only the aggregator writes it: claims are
// built with a count of zero, and aggregation hands back the same claims, in the
// same order, with their final counts filled in.

pub mod claim {
    use crate::core_modules::color::color::{Color, Tolerance};
    use serde::Serialize;

    pub type ClaimClass = i32;
    pub type PixelCount = u64;

    /// A named region whose pixel count is being measured.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Claim {
        pub name: String,
        pub target_color: Color,
        pub class: ClaimClass,
        pub count: PixelCount,
    }

    impl Claim {
        pub fn new(name: impl Into<String>, target_color: Color, class: ClaimClass) -> Self {
            Self {
                name: name.into(),
                target_color,
                class,
                count: 0,
            }
        }

        /// The all-zero stand-in used when a malformed row is kept rather than dropped.
        pub fn placeholder() -> Self {
            Self::new(String::new(), Color::default(), 0)
        }

        pub fn matches(&self, sample: &Color, tolerance: Tolerance) -> bool {
            sample.approx_eq(&self.target_color, tolerance)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::claim::*;
    use crate::core_modules::color::color::Color;

    #[test]
    fn new_claims_start_at_zero() {
        let claim = Claim::new("Avalon", Color::opaque(200, 0, 0), 3);
        assert_eq!(claim.count, 0);
        assert_eq!(claim.class, 3);
        assert_eq!(claim.target_color.alpha, 255);
    }

    #[test]
    fn placeholder_is_all_zero() {
        let claim = Claim::placeholder();
        assert!(claim.name.is_empty());
        assert_eq!(claim.target_color, Color::new(0, 0, 0, 0));
        assert_eq!((claim.class, claim.count), (0, 0));
    }

    #[test]
    fn matches_uses_target_color() {
        let claim = Claim::new("Avalon", Color::opaque(200, 0, 0), 1);
        assert!(claim.matches(&Color::new(210, 5, 0, 255), 50));
        assert!(!claim.matches(&Color::new(0, 200, 0, 255), 50));
    }
}
