#![forbid(unsafe_code)]

//! Easing curves for transitions.
//!
//! Every curve is a pure function of normalized progress `[0, 1] → [0, 1]`
//! with `f(0) = 0` and `f(1) = 1`. All curves are monotonic except
//! [`Easing::EaseOutBack`], the documented overshoot exception.
//!
//! Stored as an enum (rather than `fn` pointers) so transitions stay
//! `Copy + Debug` and serialize with the rest of the configuration.

use serde::{Deserialize, Serialize};

/// A named easing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Quadratic acceleration from rest.
    EaseIn,
    /// Quadratic deceleration to rest.
    EaseOut,
    /// Smoothstep: accelerate then decelerate.
    #[default]
    EaseInOut,
    /// Decelerate past the target, then settle back. Non-monotonic:
    /// peaks slightly above 1.0 before returning to it.
    EaseOutBack,
}

impl Easing {
    /// Evaluate the curve at progress `t`.
    ///
    /// Input is clamped to `[0, 1]`, so `eval(0.0) == 0.0` and
    /// `eval(1.0) == 1.0` hold for every curve.
    #[must_use]
    pub fn eval(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
            Self::EaseOutBack => {
                // Standard back-out with overshoot constant c1 = 1.70158.
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                let u = t - 1.0;
                1.0 + C3 * u * u * u + C1 * u * u
            }
        }
    }

    /// Whether the curve is monotonically non-decreasing on `[0, 1]`.
    #[must_use]
    pub const fn is_monotonic(self) -> bool {
        !matches!(self, Self::EaseOutBack)
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseOutBack,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert!(easing.eval(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.eval(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.eval(-0.5), easing.eval(0.0));
            assert!((easing.eval(1.5) - easing.eval(1.0)).abs() < 1e-6);
        }
    }

    #[test]
    fn monotonic_curves_are_monotonic() {
        for easing in ALL.into_iter().filter(|e| e.is_monotonic()) {
            let mut prev = 0.0f32;
            for i in 0..=100 {
                let t = i as f32 / 100.0;
                let v = easing.eval(t);
                assert!(v >= prev - 1e-4, "{easing:?} not monotonic at t={t}");
                prev = v;
            }
        }
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (0..=100)
            .map(|i| Easing::EaseOutBack.eval(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0, "EaseOutBack should overshoot, peak={peak}");
    }
}
