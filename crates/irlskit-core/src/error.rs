// =============================================================================
// Error Types
// =============================================================================
//
// Every kernel in this crate fails fast. There is no "return zeros and hope"
// path: an unknown family, an unimplemented link or a response outside the
// family's domain is reported to the caller (normally the IRLS driver), which
// is expected to abort the fit and show the message to the user.
//
// =============================================================================

use thiserror::Error;

use crate::families::Family;
use crate::links::Link;

/// Errors raised by the family and link kernels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrlsKitError {
    /// A response or mean value lies outside the domain the family requires.
    #[error("{constraint} for the {family} family (y[{index}] = {value})")]
    Domain {
        family: Family,
        constraint: &'static str,
        index: usize,
        value: f64,
    },

    /// A family name that does not map to any supported family.
    #[error("unknown family '{0}'. Use 'binomial', 'poisson', 'gaussian' or 'gamma'")]
    UnknownFamily(String),

    /// A link that exists in the code table but has no kernel yet.
    #[error("the {0} link (code {}) is not implemented", .0.code())]
    UnimplementedLink(Link),

    /// An integer link code outside the code table.
    #[error("unknown link code {0}. Use 10 (logit), 12 (cloglog), 20 (log), 30 (identity) or 40 (inverse)")]
    UnknownLink(i32),

    #[error("unknown link '{0}'. Use 'logit', 'cloglog', 'log', 'identity' or 'inverse'")]
    UnknownLinkName(String),

    /// Input vectors that should share a length do not.
    #[error("length mismatch: expected {expected} elements, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// A `KernelConfig` whose bounds break the two-tier layout.
    #[error("invalid kernel configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IrlsKitError>;
