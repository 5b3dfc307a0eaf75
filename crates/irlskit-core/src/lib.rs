// =============================================================================
// irlskit Core Library
// =============================================================================
//
// Numeric kernels that an IRLS (Iteratively Reweighted Least Squares) loop
// calls on every iteration of a GLM fit. The driver itself (weighted least
// squares, convergence, coefficient estimation) lives elsewhere; this crate
// only answers the per-element questions it asks:
//
//   - where should μ start?                      initial_mu
//   - is this μ admissible for the family?       muvalid / all_valid
//   - pull an inadmissible μ back into range     mu_adjust
//   - η = g(μ), g'(μ), μ = g⁻¹(η)                linkfun / dlink / invlink
//   - V(μ)                                       varfun
//
// STRUCTURE:
// ----------
//   - families:  Family enum, per-family domains and boundary constants
//   - links:     Link enum with its integer codes and the scalar link rules
//   - kernels:   vectorised kernels and their configuration
//   - error:     error type shared by all of the above
//
// The free functions below use `KernelConfig::default()`. Build a `Kernels`
// value when custom bounds or a different parallel threshold are needed.
//
// =============================================================================

pub mod error;
pub mod families;
pub mod kernels;
pub mod links;

pub use error::{IrlsKitError, Result};
pub use families::{BoundTiers, Family, MuBounds, MuInterval};
pub use kernels::{KernelConfig, Kernels};
pub use links::Link;

use ndarray::Array1;

/// Initial mean vector for the IRLS loop. See [`Kernels::initial_mu`].
pub fn initial_mu(family: Family, y: &Array1<f64>, n: usize) -> Result<Array1<f64>> {
    Kernels::default().initial_mu(family, y, n)
}

/// Per-element validity of `mu` for `family`.
pub fn muvalid(family: Family, mu: &Array1<f64>) -> Array1<bool> {
    Kernels::default().muvalid(family, mu)
}

pub fn all_valid(family: Family, mu: &Array1<f64>) -> bool {
    Kernels::default().all_valid(family, mu)
}

/// Clamp `mu` into the family's adjustment interval.
pub fn mu_adjust(family: Family, mu: &Array1<f64>) -> Array1<f64> {
    Kernels::default().mu_adjust(family, mu)
}

pub fn varfun(family: Family, mu: &Array1<f64>) -> Array1<f64> {
    Kernels::default().varfun(family, mu)
}

pub fn linkfun(link: Link, mu: &Array1<f64>) -> Result<Array1<f64>> {
    Kernels::default().linkfun(link, mu)
}

pub fn dlink(link: Link, mu: &Array1<f64>) -> Result<Array1<f64>> {
    Kernels::default().dlink(link, mu)
}

pub fn invlink(link: Link, eta: &Array1<f64>) -> Result<Array1<f64>> {
    Kernels::default().invlink(link, eta)
}

pub fn mu_eta(link: Link, eta: &Array1<f64>) -> Result<Array1<f64>> {
    Kernels::default().mu_eta(link, eta)
}

// -----------------------------------------------------------------------------
// Integer link codes (10 logit, 11 probit, 12 cloglog, 20 log, 30 identity,
// 40 inverse), for callers that carry the code rather than the enum.
// -----------------------------------------------------------------------------

pub fn linkfun_code(code: i32, mu: &Array1<f64>) -> Result<Array1<f64>> {
    linkfun(Link::from_code(code)?, mu)
}

pub fn dlink_code(code: i32, mu: &Array1<f64>) -> Result<Array1<f64>> {
    dlink(Link::from_code(code)?, mu)
}

pub fn invlink_code(code: i32, eta: &Array1<f64>) -> Result<Array1<f64>> {
    invlink(Link::from_code(code)?, eta)
}
