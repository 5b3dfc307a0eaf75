// =============================================================================
// Link Functions
// =============================================================================
//
// The link g connects the mean μ to the linear predictor η = Xβ:
//
//     η = g(μ)        μ = g⁻¹(η)
//
// IRLS needs three pieces for every link:
//
//   - g(μ)       to start the linear predictor from the initial mean
//   - g'(μ)      for the working response z = η + (y − μ) g'(μ)
//                and the working weights w = 1 / (V(μ) g'(μ)²)
//   - g⁻¹(η)     to map the solved linear predictor back to μ
//
// Links are identified by a flat integer code, tens digit per link group:
//
//   10 logit   11 probit   12 cloglog   20 log   30 identity   40 inverse
//
// Link choice is independent of the family. Probit is part of the code table
// but has no kernel; asking for it is an error rather than a zero vector.
//
// =============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::{IrlsKitError, Result};

/// Link function, tagged with its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Link {
    Logit = 10,
    Probit = 11,
    Cloglog = 12,
    Log = 20,
    Identity = 30,
    Inverse = 40,
}

impl Link {
    pub const ALL: [Link; 6] = [
        Link::Logit,
        Link::Probit,
        Link::Cloglog,
        Link::Log,
        Link::Identity,
        Link::Inverse,
    ];

    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Resolve an integer link code.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            10 => Ok(Link::Logit),
            11 => Ok(Link::Probit),
            12 => Ok(Link::Cloglog),
            20 => Ok(Link::Log),
            30 => Ok(Link::Identity),
            40 => Ok(Link::Inverse),
            _ => Err(IrlsKitError::UnknownLink(code)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Link::Logit => "logit",
            Link::Probit => "probit",
            Link::Cloglog => "cloglog",
            Link::Log => "log",
            Link::Identity => "identity",
            Link::Inverse => "inverse",
        }
    }

    pub fn is_implemented(&self) -> bool {
        !matches!(self, Link::Probit)
    }

    /// η = g(μ)
    pub(crate) fn forward_fn(&self) -> Result<fn(f64) -> f64> {
        match self {
            Link::Logit => Ok(|mu| (mu / (1.0 - mu)).ln()),
            Link::Cloglog => Ok(|mu| (-(1.0 - mu).ln()).ln()),
            Link::Log => Ok(f64::ln),
            Link::Identity => Ok(|mu| mu),
            Link::Inverse => Ok(|mu| 1.0 / mu),
            Link::Probit => Err(IrlsKitError::UnimplementedLink(*self)),
        }
    }

    /// dη/dμ = g'(μ)
    pub(crate) fn derivative_fn(&self) -> Result<fn(f64) -> f64> {
        match self {
            Link::Logit => Ok(|mu| 1.0 / (mu * (1.0 - mu))),
            // d/dμ log(−log(1 − μ)) = −1 / (log(1 − μ)(1 − μ)), positive on (0, 1)
            Link::Cloglog => Ok(|mu| -1.0 / ((1.0 - mu).ln() * (1.0 - mu))),
            Link::Log => Ok(|mu| 1.0 / mu),
            Link::Identity => Ok(|_| 1.0),
            Link::Inverse => Ok(|mu| -1.0 / (mu * mu)),
            Link::Probit => Err(IrlsKitError::UnimplementedLink(*self)),
        }
    }

    /// μ = g⁻¹(η)
    pub(crate) fn inverse_fn(&self) -> Result<fn(f64) -> f64> {
        match self {
            Link::Logit => Ok(inv_logit),
            Link::Cloglog => Ok(|eta| 1.0 - (-eta.exp()).exp()),
            Link::Log => Ok(f64::exp),
            Link::Identity => Ok(|eta| eta),
            Link::Inverse => Ok(|eta| 1.0 / eta),
            Link::Probit => Err(IrlsKitError::UnimplementedLink(*self)),
        }
    }

    /// dμ/dη as a function of η.
    pub(crate) fn mu_eta_fn(&self) -> Result<fn(f64) -> f64> {
        match self {
            Link::Logit => Ok(|eta| {
                let p = inv_logit(eta);
                p * (1.0 - p)
            }),
            Link::Cloglog => Ok(|eta| {
                let e = eta.exp();
                e * (-e).exp()
            }),
            Link::Log => Ok(f64::exp),
            Link::Identity => Ok(|_| 1.0),
            Link::Inverse => Ok(|eta| -1.0 / (eta * eta)),
            Link::Probit => Err(IrlsKitError::UnimplementedLink(*self)),
        }
    }
}

/// exp(η) / (1 + exp(η)), written so neither tail overflows.
#[inline]
fn inv_logit(eta: f64) -> f64 {
    if eta >= 0.0 {
        1.0 / (1.0 + (-eta).exp())
    } else {
        let e = eta.exp();
        e / (1.0 + e)
    }
}

impl TryFrom<i32> for Link {
    type Error = IrlsKitError;

    fn try_from(code: i32) -> Result<Self> {
        Link::from_code(code)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Link {
    type Err = IrlsKitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "logit" => Ok(Link::Logit),
            "probit" => Ok(Link::Probit),
            "cloglog" => Ok(Link::Cloglog),
            "log" => Ok(Link::Log),
            "identity" => Ok(Link::Identity),
            "inverse" => Ok(Link::Inverse),
            _ => Err(IrlsKitError::UnknownLinkName(s.to_string())),
        }
    }
}
