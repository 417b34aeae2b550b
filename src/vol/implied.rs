//! Implied-volatility inversion via bracketed root finding.
//!
//! The solver searches for the sigma at which the Black-Scholes price
//! reproduces an observed market premium. It is deterministic for a given
//! input set, and every mathematically unreachable quote (non-positive
//! price, expired option, premium outside the range achievable within the
//! volatility bracket) reports "no solution" instead of failing.

use crate::core::OptionType;
use crate::engines::analytic::bs_price;
use crate::math::brent;

const MAX_ITER: usize = 128;

/// Tunable bracket and tolerance for the implied-vol search.
///
/// The default bracket `(1e-6, 5.0)` admits annualized volatilities up to
/// 500%, a plausible range for equity markets; markets needing a narrower
/// or wider admissible range configure it here rather than patching a
/// buried literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IvConfig {
    /// Lower volatility bracket endpoint.
    pub bracket_lo: f64,
    /// Upper volatility bracket endpoint.
    pub bracket_hi: f64,
    /// Root-finder termination tolerance on the bracket width.
    pub tol: f64,
}

impl Default for IvConfig {
    fn default() -> Self {
        Self {
            bracket_lo: 1e-6,
            bracket_hi: 5.0,
            tol: 1e-12,
        }
    }
}

impl IvConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the volatility bracket.
    ///
    /// # Panics
    /// Panics if either endpoint is non-finite or the bracket is not
    /// strictly increasing. A misconfigured bracket is caller misuse, not
    /// an unreachable quote, so it is never absorbed into "no solution".
    pub fn with_bracket(mut self, lo: f64, hi: f64) -> Self {
        assert!(
            lo.is_finite() && hi.is_finite() && lo < hi,
            "bracket must be finite with lo < hi"
        );
        self.bracket_lo = lo;
        self.bracket_hi = hi;
        self
    }

    /// Sets the termination tolerance.
    ///
    /// # Panics
    /// Panics if `tol` is non-finite or not positive.
    pub fn with_tol(mut self, tol: f64) -> Self {
        assert!(tol.is_finite() && tol > 0.0, "tol must be finite and > 0");
        self.tol = tol;
        self
    }
}

/// Implied volatility under the default bracket, or `None` when no
/// solution exists.
///
/// Preconditions short-circuit before any search: `market_price <= 0` or
/// `t <= 0` is immediately "no solution".
///
/// # Examples
/// ```rust
/// use volkit::core::OptionType;
/// use volkit::engines::analytic::bs_price;
/// use volkit::vol::implied::implied_vol;
///
/// let price = bs_price(OptionType::Call, 100.0, 100.0, 0.03, 0.25, 1.0).unwrap();
/// let sigma = implied_vol(OptionType::Call, 100.0, 100.0, 0.03, 1.0, price).unwrap();
/// assert!((sigma - 0.25).abs() < 1e-8);
/// ```
pub fn implied_vol(
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    t: f64,
    market_price: f64,
) -> Option<f64> {
    implied_vol_with(&IvConfig::default(), option_type, s, k, r, t, market_price)
}

/// Implied volatility under an explicit [`IvConfig`].
///
/// The root of `f(sigma) = bs_price(sigma) - market_price` is located by
/// Brent's method over the configured bracket; a quote at which `f` does
/// not change sign across the bracket has no admissible volatility and
/// yields `None`.
#[allow(clippy::too_many_arguments)]
pub fn implied_vol_with(
    config: &IvConfig,
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    t: f64,
    market_price: f64,
) -> Option<f64> {
    if market_price <= 0.0 || t <= 0.0 {
        return None;
    }
    if !s.is_finite() || !k.is_finite() || !r.is_finite() || !market_price.is_finite() {
        return None;
    }
    if s <= 0.0 || k <= 0.0 {
        return None;
    }

    let objective = |sigma: f64| {
        bs_price(option_type, s, k, r, sigma, t).map_or(f64::NAN, |p| p - market_price)
    };

    brent(
        objective,
        config.bracket_lo,
        config.bracket_hi,
        config.tol,
        MAX_ITER,
    )
    .ok()
}
