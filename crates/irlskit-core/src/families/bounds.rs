// =============================================================================
// Mean Boundaries
// =============================================================================
//
// Each restricted family carries TWO intervals for μ:
//
//   - the validity interval (open), used by `muvalid` to report whether a
//     mean is admissible;
//   - the adjustment interval (closed), used by `mu_adjust` to clamp a mean
//     back into range so the IRLS loop can keep going.
//
// The adjustment interval is the narrower "soft" zone and sits inside the
// validity interval's closure:
//
//     Binomial:  valid (0.0001, 0.9999)   adjust [0.001, 0.999]
//     Poisson:   valid (0.0001, ∞)        adjust [0.001, ∞)
//     Gamma:     valid (0.001,  ∞)        adjust [0.001, ∞)
//
// Gamma uses the same constant for both tiers, so a mean clamped to the
// Gamma floor lies exactly on the open validity bound and reports invalid.
// Gaussian has no interval at all.
//
// =============================================================================

use crate::error::{IrlsKitError, Result};
use crate::families::Family;

/// Lower validity bound for Binomial means.
pub const BINOMIAL_VALID_MIN: f64 = 0.0001;
/// Upper validity bound for Binomial means.
pub const BINOMIAL_VALID_MAX: f64 = 0.9999;
/// Lower validity bound for Poisson means.
pub const POISSON_VALID_MIN: f64 = 0.0001;
/// Lower validity bound for Gamma means.
pub const GAMMA_VALID_MIN: f64 = 0.001;

/// Binomial clamp floor.
pub const BINOMIAL_ADJUST_MIN: f64 = 0.001;
/// Binomial clamp ceiling.
pub const BINOMIAL_ADJUST_MAX: f64 = 0.999;
/// Poisson clamp floor.
pub const POISSON_ADJUST_MIN: f64 = 0.001;
/// Gamma clamp floor.
pub const GAMMA_ADJUST_MIN: f64 = 0.001;

/// An interval on the mean scale. `upper = None` means unbounded above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuInterval {
    pub lower: f64,
    pub upper: Option<f64>,
}

impl MuInterval {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper: Some(upper),
        }
    }

    pub const fn at_least(lower: f64) -> Self {
        Self { lower, upper: None }
    }

    /// Strict membership in the open interval. NaN is never inside.
    #[inline]
    pub fn contains_open(&self, x: f64) -> bool {
        x > self.lower && self.upper.map_or(true, |u| x < u)
    }

    /// Whether `clamp` would move `x`. NaN is left alone.
    #[inline]
    pub fn needs_clamp(&self, x: f64) -> bool {
        x < self.lower || self.upper.is_some_and(|u| x > u)
    }

    /// Clamp into the closed interval, passing NaN through unchanged.
    #[inline]
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.lower {
            self.lower
        } else {
            match self.upper {
                Some(u) if x > u => u,
                _ => x,
            }
        }
    }
}

/// The validity and adjustment intervals of one family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundTiers {
    pub valid: MuInterval,
    pub adjust: MuInterval,
}

impl BoundTiers {
    fn validate(&self, family: Family) -> Result<()> {
        let (valid, adjust) = (self.valid, self.adjust);

        if !adjust.lower.is_finite() || !valid.lower.is_finite() {
            return Err(IrlsKitError::InvalidConfig(format!(
                "{} bounds must have a finite lower limit",
                family
            )));
        }
        if adjust.lower < valid.lower {
            return Err(IrlsKitError::InvalidConfig(format!(
                "{} adjustment floor {} lies below the validity floor {}",
                family, adjust.lower, valid.lower
            )));
        }
        match (valid.upper, adjust.upper) {
            (Some(vu), Some(au)) if au > vu => {
                return Err(IrlsKitError::InvalidConfig(format!(
                    "{} adjustment ceiling {} lies above the validity ceiling {}",
                    family, au, vu
                )));
            }
            (Some(vu), None) => {
                return Err(IrlsKitError::InvalidConfig(format!(
                    "{} adjustment interval must be capped at the validity ceiling {}",
                    family, vu
                )));
            }
            _ => {}
        }
        if let Some(au) = adjust.upper {
            if au < adjust.lower {
                return Err(IrlsKitError::InvalidConfig(format!(
                    "{} adjustment interval [{}, {}] is empty",
                    family, adjust.lower, au
                )));
            }
        }
        Ok(())
    }
}

/// Per-family boundary configuration.
///
/// `MuBounds::default()` holds the published constants. Gaussian is not
/// listed because its mean is unrestricted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuBounds {
    pub binomial: BoundTiers,
    pub poisson: BoundTiers,
    pub gamma: BoundTiers,
}

impl Default for MuBounds {
    fn default() -> Self {
        Self {
            binomial: BoundTiers {
                valid: MuInterval::new(BINOMIAL_VALID_MIN, BINOMIAL_VALID_MAX),
                adjust: MuInterval::new(BINOMIAL_ADJUST_MIN, BINOMIAL_ADJUST_MAX),
            },
            poisson: BoundTiers {
                valid: MuInterval::at_least(POISSON_VALID_MIN),
                adjust: MuInterval::at_least(POISSON_ADJUST_MIN),
            },
            gamma: BoundTiers {
                valid: MuInterval::at_least(GAMMA_VALID_MIN),
                adjust: MuInterval::at_least(GAMMA_ADJUST_MIN),
            },
        }
    }
}

impl MuBounds {
    /// The tiers for `family`, or `None` for the unrestricted Gaussian.
    pub fn tiers(&self, family: Family) -> Option<BoundTiers> {
        match family {
            Family::Binomial => Some(self.binomial),
            Family::Poisson => Some(self.poisson),
            Family::Gamma => Some(self.gamma),
            Family::Gaussian => None,
        }
    }

    /// Check that every adjustment interval sits inside its validity interval.
    pub fn validate(&self) -> Result<()> {
        self.binomial.validate(Family::Binomial)?;
        self.poisson.validate(Family::Poisson)?;
        self.gamma.validate(Family::Gamma)
    }
}
