// =============================================================================
// Distribution Families
// =============================================================================
//
// A family fixes two things about the response:
//
//   - which values of μ are admissible (the domain of the mean), and
//   - how the variance depends on the mean: Var(Y) = φ × V(μ).
//
//   Family    | Domain of y  | Initial μ        | V(μ)
//   ----------|--------------|------------------|-----------
//   Binomial  | [0, 1]       | (y + 0.5) / 2    | μ(1 − μ)
//   Poisson   | [0, ∞)       | y + 0.1          | μ
//   Gaussian  | ℝ            | y                | 1
//   Gamma     | (0, ∞)       | y + 0.1          | μ²
//
// The family is a closed enum. It is resolved from a name once, when the fit
// is set up, and every kernel matches on it exhaustively afterwards.
//
// =============================================================================

pub mod bounds;

use std::fmt;
use std::str::FromStr;

use crate::error::{IrlsKitError, Result};
use crate::links::Link;

pub use bounds::{BoundTiers, MuBounds, MuInterval};

/// Exponential-family distribution of the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Binomial,
    Poisson,
    Gaussian,
    Gamma,
}

impl Family {
    pub const ALL: [Family; 4] = [
        Family::Binomial,
        Family::Poisson,
        Family::Gaussian,
        Family::Gamma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Family::Binomial => "Binomial",
            Family::Poisson => "Poisson",
            Family::Gaussian => "Gaussian",
            Family::Gamma => "Gamma",
        }
    }

    /// The canonical link for this family.
    pub fn default_link(&self) -> Link {
        match self {
            Family::Binomial => Link::Logit,
            Family::Poisson => Link::Log,
            Family::Gaussian => Link::Identity,
            Family::Gamma => Link::Inverse,
        }
    }

    /// Open interval used by `muvalid` under the default bounds.
    pub fn valid_interval(&self) -> Option<MuInterval> {
        MuBounds::default().tiers(*self).map(|t| t.valid)
    }

    /// Closed interval used by `mu_adjust` under the default bounds.
    pub fn adjust_interval(&self) -> Option<MuInterval> {
        MuBounds::default().tiers(*self).map(|t| t.adjust)
    }

    /// Starting value of μ for a single response, or the violated constraint.
    ///
    /// NaN never satisfies a domain constraint, so restricted families reject it.
    pub(crate) fn initial_value(&self, y: f64) -> std::result::Result<f64, &'static str> {
        if y.is_nan() && *self != Family::Gaussian {
            return Err("NaN values not allowed");
        }
        match self {
            Family::Binomial => {
                if y < 0.0 {
                    Err("negative values not allowed")
                } else if y > 1.0 {
                    Err("number of successes larger than 1")
                } else {
                    Ok((y + 0.5) / 2.0)
                }
            }
            Family::Poisson => {
                if y >= 0.0 {
                    Ok(y + 0.1)
                } else {
                    Err("negative values not allowed")
                }
            }
            Family::Gaussian => Ok(y),
            Family::Gamma => {
                if y > 0.0 {
                    Ok(y + 0.1)
                } else {
                    Err("non-positive values not allowed")
                }
            }
        }
    }

    /// Variance function V(μ) as a plain function pointer.
    pub(crate) fn variance_fn(&self) -> fn(f64) -> f64 {
        match self {
            Family::Binomial => |mu| mu * (1.0 - mu),
            Family::Poisson => |mu| mu,
            Family::Gaussian => |_| 1.0,
            Family::Gamma => |mu| mu * mu,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = IrlsKitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "binomial" => Ok(Family::Binomial),
            "poisson" => Ok(Family::Poisson),
            "gaussian" | "normal" => Ok(Family::Gaussian),
            "gamma" => Ok(Family::Gamma),
            _ => Err(IrlsKitError::UnknownFamily(s.to_string())),
        }
    }
}
