// =============================================================================
// Vector Kernels
// =============================================================================
//
// The family and link modules describe what happens to ONE element. This
// module lifts those scalar rules over whole vectors, the shape the IRLS
// driver works with.
//
// Every kernel is pure: it reads its input, allocates one output of the same
// length and returns it. Large inputs are processed with rayon (through
// ndarray's parallel iterators); small ones stay on the calling thread. The
// result is identical either way.
//
// =============================================================================

use ndarray::{Array1, Zip};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::error::{IrlsKitError, Result};
use crate::families::{Family, MuBounds};
use crate::links::Link;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the vector kernels.
///
/// The defaults reproduce the published boundary constants and are what the
/// crate-level free functions use.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelConfig {
    /// Validity and adjustment intervals for each restricted family.
    pub bounds: MuBounds,

    /// Inputs with at least this many elements are processed in parallel.
    /// Default: 65_536
    pub parallel_threshold: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            bounds: MuBounds::default(),
            parallel_threshold: 65_536,
        }
    }
}

impl KernelConfig {
    pub fn validate(&self) -> Result<()> {
        self.bounds.validate()
    }
}

// =============================================================================
// Kernels
// =============================================================================

/// Family and link kernels bound to a validated configuration.
///
/// `Kernels` holds no state beyond its configuration, so one instance can be
/// shared between threads and reused across every iteration of a fit.
#[derive(Debug, Clone, Default)]
pub struct Kernels {
    config: KernelConfig,
}

impl Kernels {
    /// Build kernels from `config`, rejecting bounds that break the two tiers.
    pub fn new(config: KernelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Starting values of μ for the IRLS loop.
    ///
    /// # Arguments
    /// * `family` - Distribution family
    /// * `y` - Response vector
    /// * `n` - Expected number of observations; must equal `y.len()`
    ///
    /// # Errors
    /// * `LengthMismatch` if `y.len() != n`
    /// * `Domain` at the first response outside the family's domain
    pub fn initial_mu(&self, family: Family, y: &Array1<f64>, n: usize) -> Result<Array1<f64>> {
        if y.len() != n {
            return Err(IrlsKitError::LengthMismatch {
                expected: n,
                got: y.len(),
            });
        }

        if let Some((index, value, constraint)) = self.first_domain_violation(family, y) {
            warn!(%family, index, value, constraint, "response outside family domain");
            return Err(IrlsKitError::Domain {
                family,
                constraint,
                index,
                value,
            });
        }

        // Every element passed the check above, so the fallback is never taken.
        Ok(self.map_elements(y, move |yi| family.initial_value(yi).unwrap_or(f64::NAN)))
    }

    /// Per-element admissibility of μ under the family's open validity interval.
    ///
    /// Gaussian means are always valid, including ±∞ and NaN.
    pub fn muvalid(&self, family: Family, mu: &Array1<f64>) -> Array1<bool> {
        match self.config.bounds.tiers(family) {
            Some(tiers) => self.map_predicate(mu, move |m| tiers.valid.contains_open(m)),
            None => Array1::from_elem(mu.len(), true),
        }
    }

    /// `true` when every element of `mu` is admissible.
    pub fn all_valid(&self, family: Family, mu: &Array1<f64>) -> bool {
        match self.config.bounds.tiers(family) {
            Some(tiers) => match mu.as_slice() {
                Some(slice) if slice.len() >= self.config.parallel_threshold => {
                    slice.par_iter().all(|&m| tiers.valid.contains_open(m))
                }
                _ => mu.iter().all(|&m| tiers.valid.contains_open(m)),
            },
            None => true,
        }
    }

    /// Clamp μ into the family's adjustment interval.
    ///
    /// Elements already inside (and NaN) pass through unchanged; Gaussian is
    /// returned as-is.
    pub fn mu_adjust(&self, family: Family, mu: &Array1<f64>) -> Array1<f64> {
        let Some(tiers) = self.config.bounds.tiers(family) else {
            return mu.clone();
        };
        let adjust = tiers.adjust;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let clamped = mu.iter().filter(|&&m| adjust.needs_clamp(m)).count();
            if clamped > 0 {
                debug!(%family, clamped, n = mu.len(), "clamped mu into adjustment interval");
            }
        }

        self.map_elements(mu, move |m| adjust.clamp(m))
    }

    /// Variance function V(μ).
    pub fn varfun(&self, family: Family, mu: &Array1<f64>) -> Array1<f64> {
        match family {
            Family::Gaussian => Array1::ones(mu.len()),
            _ => self.map_elements(mu, family.variance_fn()),
        }
    }

    /// Linear predictor η = g(μ).
    pub fn linkfun(&self, link: Link, mu: &Array1<f64>) -> Result<Array1<f64>> {
        let g = link.forward_fn()?;
        Ok(self.map_elements(mu, g))
    }

    /// Link derivative dη/dμ = g'(μ).
    pub fn dlink(&self, link: Link, mu: &Array1<f64>) -> Result<Array1<f64>> {
        let dg = link.derivative_fn()?;
        Ok(self.map_elements(mu, dg))
    }

    /// Mean μ = g⁻¹(η).
    pub fn invlink(&self, link: Link, eta: &Array1<f64>) -> Result<Array1<f64>> {
        let ginv = link.inverse_fn()?;
        Ok(self.map_elements(eta, ginv))
    }

    /// dμ/dη evaluated at η; the reciprocal of `dlink` at μ = g⁻¹(η).
    pub fn mu_eta(&self, link: Link, eta: &Array1<f64>) -> Result<Array1<f64>> {
        let f = link.mu_eta_fn()?;
        Ok(self.map_elements(eta, f))
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Index, value and constraint of the first response the family rejects.
    fn first_domain_violation(
        &self,
        family: Family,
        y: &Array1<f64>,
    ) -> Option<(usize, f64, &'static str)> {
        if family == Family::Gaussian {
            return None;
        }

        let index = match y.as_slice() {
            Some(slice) if slice.len() >= self.config.parallel_threshold => {
                slice.par_iter().position_first(|&yi| family.initial_value(yi).is_err())
            }
            _ => y.iter().position(|&yi| family.initial_value(yi).is_err()),
        }?;

        let value = y[index];
        family
            .initial_value(value)
            .err()
            .map(|constraint| (index, value, constraint))
    }

    fn map_elements<F>(&self, x: &Array1<f64>, f: F) -> Array1<f64>
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        if x.len() >= self.config.parallel_threshold {
            trace!(n = x.len(), "parallel element-wise kernel");
            let mut out = x.clone();
            out.par_mapv_inplace(f);
            out
        } else {
            x.mapv(f)
        }
    }

    fn map_predicate<F>(&self, x: &Array1<f64>, f: F) -> Array1<bool>
    where
        F: Fn(f64) -> bool + Sync + Send,
    {
        if x.len() >= self.config.parallel_threshold {
            trace!(n = x.len(), "parallel element-wise predicate");
            Zip::from(x).par_map_collect(|&v| f(v))
        } else {
            x.map(|&v| f(v))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn parallel_kernels() -> Kernels {
        Kernels::new(KernelConfig {
            parallel_threshold: 0,
            ..KernelConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_initial_mu_binomial() {
        let mu = Kernels::default()
            .initial_mu(Family::Binomial, &array![0.0, 1.0], 2)
            .unwrap();
        assert_abs_diff_eq!(mu[0], 0.25);
        assert_abs_diff_eq!(mu[1], 0.75);
    }

    #[test]
    fn test_initial_mu_reports_first_violation() {
        let err = Kernels::default()
            .initial_mu(Family::Binomial, &array![0.5, 2.0, -1.0], 3)
            .unwrap_err();
        assert_eq!(
            err,
            IrlsKitError::Domain {
                family: Family::Binomial,
                constraint: "number of successes larger than 1",
                index: 1,
                value: 2.0,
            }
        );
    }

    #[test]
    fn test_initial_mu_length_mismatch() {
        let err = Kernels::default()
            .initial_mu(Family::Gaussian, &array![1.0, 2.0], 3)
            .unwrap_err();
        assert_eq!(err, IrlsKitError::LengthMismatch { expected: 3, got: 2 });
    }

    #[test]
    fn test_initial_mu_empty() {
        let mu = Kernels::default()
            .initial_mu(Family::Gamma, &Array1::zeros(0), 0)
            .unwrap();
        assert!(mu.is_empty());
    }

    #[test]
    fn test_muvalid_per_family() {
        let k = Kernels::default();
        let mu = array![0.00005, 0.0005, 0.5, 0.99995, 2.0];

        assert_eq!(
            k.muvalid(Family::Binomial, &mu),
            array![false, true, true, false, false]
        );
        assert_eq!(
            k.muvalid(Family::Poisson, &mu),
            array![false, true, true, true, true]
        );
        assert_eq!(
            k.muvalid(Family::Gamma, &mu),
            array![false, false, true, true, true]
        );
        assert_eq!(k.muvalid(Family::Gaussian, &mu), Array1::from_elem(5, true));
    }

    #[test]
    fn test_all_valid() {
        let k = Kernels::default();
        assert!(k.all_valid(Family::Poisson, &array![0.1, 5.0]));
        assert!(!k.all_valid(Family::Poisson, &array![0.1, 0.0]));
        assert!(k.all_valid(Family::Gaussian, &array![f64::NAN]));
        assert!(!parallel_kernels().all_valid(Family::Binomial, &array![0.5, 1.0]));
    }

    #[test]
    fn test_mu_adjust_binomial() {
        let adjusted = Kernels::default().mu_adjust(Family::Binomial, &array![-0.2, 0.0005, 0.4, 0.9995, 1.3]);
        assert_eq!(adjusted, array![0.001, 0.001, 0.4, 0.999, 0.999]);
    }

    #[test]
    fn test_mu_adjust_poisson_and_gamma_have_no_ceiling() {
        let k = Kernels::default();
        let mu = array![-1.0, 0.0, 1e6];
        assert_eq!(k.mu_adjust(Family::Poisson, &mu), array![0.001, 0.001, 1e6]);
        assert_eq!(k.mu_adjust(Family::Gamma, &mu), array![0.001, 0.001, 1e6]);
    }

    #[test]
    fn test_mu_adjust_gaussian_is_identity() {
        let mu = array![-1e9, 0.0, 3.5];
        assert_eq!(Kernels::default().mu_adjust(Family::Gaussian, &mu), mu);
    }

    #[test]
    fn test_varfun() {
        let k = Kernels::default();
        let mu = array![0.2, 0.5];
        let v = k.varfun(Family::Binomial, &mu);
        assert_abs_diff_eq!(v[0], 0.16, epsilon = 1e-12);
        assert_abs_diff_eq!(v[1], 0.25, epsilon = 1e-12);
        assert_eq!(k.varfun(Family::Poisson, &mu), mu);
        assert_eq!(k.varfun(Family::Gamma, &array![3.0]), array![9.0]);
        assert_eq!(k.varfun(Family::Gaussian, &array![f64::NAN, -4.0]), array![1.0, 1.0]);
    }

    #[test]
    fn test_link_triad_shapes() {
        let k = Kernels::default();
        let mu = array![0.2, 0.5, 0.7];
        for link in [Link::Logit, Link::Cloglog, Link::Log, Link::Identity, Link::Inverse] {
            assert_eq!(k.linkfun(link, &mu).unwrap().len(), 3);
            assert_eq!(k.dlink(link, &mu).unwrap().len(), 3);
            assert_eq!(k.invlink(link, &mu).unwrap().len(), 3);
            assert_eq!(k.mu_eta(link, &mu).unwrap().len(), 3);
        }
    }

    #[test]
    fn test_identity_dlink_is_ones() {
        let d = Kernels::default().dlink(Link::Identity, &array![-3.0, 0.0, 8.0]).unwrap();
        assert_eq!(d, array![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_probit_fails_for_every_kernel() {
        let k = Kernels::default();
        let mu = array![0.5];
        let expected = IrlsKitError::UnimplementedLink(Link::Probit);
        assert_eq!(k.linkfun(Link::Probit, &mu).unwrap_err(), expected);
        assert_eq!(k.dlink(Link::Probit, &mu).unwrap_err(), expected);
        assert_eq!(k.invlink(Link::Probit, &mu).unwrap_err(), expected);
        assert_eq!(k.mu_eta(Link::Probit, &mu).unwrap_err(), expected);
    }

    #[test]
    fn test_parallel_path_matches_serial() {
        let serial = Kernels::default();
        let parallel = parallel_kernels();
        let y: Array1<f64> = Array1::linspace(0.0, 1.0, 257);

        assert_eq!(
            serial.initial_mu(Family::Binomial, &y, y.len()).unwrap(),
            parallel.initial_mu(Family::Binomial, &y, y.len()).unwrap()
        );
        assert_eq!(
            serial.muvalid(Family::Binomial, &y),
            parallel.muvalid(Family::Binomial, &y)
        );
        assert_eq!(
            serial.mu_adjust(Family::Binomial, &y),
            parallel.mu_adjust(Family::Binomial, &y)
        );
        assert_eq!(
            serial.linkfun(Link::Log, &y).unwrap(),
            parallel.linkfun(Link::Log, &y).unwrap()
        );
    }

    #[test]
    fn test_parallel_domain_check_finds_first_violation() {
        let mut y = Array1::from_elem(1000, 1.0);
        y[700] = -2.0;
        y[300] = -1.0;
        let err = parallel_kernels()
            .initial_mu(Family::Poisson, &y, 1000)
            .unwrap_err();
        assert!(matches!(
            err,
            IrlsKitError::Domain { index: 300, .. }
        ));
    }

    #[test]
    fn test_custom_bounds() {
        let mut config = KernelConfig::default();
        config.bounds.binomial.adjust.lower = 0.01;
        config.bounds.binomial.adjust.upper = Some(0.99);
        let k = Kernels::new(config).unwrap();
        assert_eq!(k.mu_adjust(Family::Binomial, &array![0.0, 1.0]), array![0.01, 0.99]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = KernelConfig::default();
        config.bounds.gamma.adjust.lower = 0.0;
        assert!(matches!(
            Kernels::new(config),
            Err(IrlsKitError::InvalidConfig(_))
        ));
    }
}
