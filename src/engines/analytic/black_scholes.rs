//! Analytic Black-Scholes kernel for European vanilla options.
//!
//! Price requests degrade degenerate inputs (expired, zero-vol, zero
//! spot/strike) to their closed-form limits; Greek requests whose
//! mathematical preconditions are violated return `None` rather than a
//! fabricated number. Neither path ever panics or leaks NaN.

use std::collections::HashMap;

use crate::core::{Greeks, OptionType, PricingEngine, PricingError, PricingResult};
use crate::instruments::VanillaOption;
use crate::market::Market;
use crate::math::{normal_cdf, normal_pdf};

#[inline]
fn inputs_finite(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> bool {
    s.is_finite() && k.is_finite() && r.is_finite() && sigma.is_finite() && t.is_finite()
}

#[inline]
fn intrinsic(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    (option_type.sign() * (spot - strike)).max(0.0)
}

/// Deterministic limit price when diffusion is absent (`sigma <= 0`) or one
/// of spot/strike sits at zero.
#[inline]
fn forward_intrinsic(option_type: OptionType, spot: f64, strike: f64, df: f64) -> f64 {
    (option_type.sign() * (spot - strike * df)).max(0.0)
}

#[inline]
fn d1_d2(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> (f64, f64) {
    let sig_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Preconditions under which d1, and with it every Greek, is defined.
#[inline]
fn greeks_defined(s: f64, k: f64, sigma: f64, t: f64) -> bool {
    t > 0.0 && sigma > 0.0 && s > 0.0 && k > 0.0
}

/// Black-Scholes price of a European option.
///
/// Parameters:
/// - `s`: spot price, `k`: strike, `r`: continuously compounded rate,
///   `sigma`: annualized volatility, `t`: time to expiry in years.
///
/// Edge cases:
/// - `t <= 0` returns intrinsic value.
/// - `sigma <= 0`, `s == 0`, or `k == 0` return the degenerate forward
///   bound `max(+/-(S - K e^{-rT}), 0)`, the correct limit in all three
///   cases.
/// - Negative or non-finite inputs return `None`.
///
/// # Examples
/// ```rust
/// use volkit::core::OptionType;
/// use volkit::engines::analytic::bs_price;
///
/// let call = bs_price(OptionType::Call, 100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
/// let put = bs_price(OptionType::Put, 100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
/// assert!(call > put);
/// ```
pub fn bs_price(
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    sigma: f64,
    t: f64,
) -> Option<f64> {
    if !inputs_finite(s, k, r, sigma, t) || s < 0.0 || k < 0.0 {
        return None;
    }
    if t <= 0.0 {
        return Some(intrinsic(option_type, s, k));
    }

    let df = (-r * t).exp();
    if sigma <= 0.0 || s == 0.0 || k == 0.0 {
        return Some(forward_intrinsic(option_type, s, k, df));
    }

    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    Some(match option_type {
        OptionType::Call => s * normal_cdf(d1) - k * df * normal_cdf(d2),
        OptionType::Put => k * df * normal_cdf(-d2) - s * normal_cdf(-d1),
    })
}

/// First derivative of price to spot: `N(d1)` for calls, `N(d1) - 1` for
/// puts. `None` when `t <= 0`, `sigma <= 0`, `s <= 0`, or `k <= 0`.
pub fn bs_delta(
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    sigma: f64,
    t: f64,
) -> Option<f64> {
    if !inputs_finite(s, k, r, sigma, t) || !greeks_defined(s, k, sigma, t) {
        return None;
    }
    let (d1, _) = d1_d2(s, k, r, sigma, t);
    Some(match option_type {
        OptionType::Call => normal_cdf(d1),
        OptionType::Put => normal_cdf(d1) - 1.0,
    })
}

/// Second derivative of price to spot. Type-independent.
pub fn bs_gamma(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> Option<f64> {
    if !inputs_finite(s, k, r, sigma, t) || !greeks_defined(s, k, sigma, t) {
        return None;
    }
    let (d1, _) = d1_d2(s, k, r, sigma, t);
    Some(normal_pdf(d1) / (s * sigma * t.sqrt()))
}

/// Sensitivity to volatility, scaled per one percentage-point vol move
/// (not per unit). Type-independent.
pub fn bs_vega(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> Option<f64> {
    if !inputs_finite(s, k, r, sigma, t) || !greeks_defined(s, k, sigma, t) {
        return None;
    }
    let (d1, _) = d1_d2(s, k, r, sigma, t);
    Some(s * normal_pdf(d1) * t.sqrt() / 100.0)
}

/// Time decay `dV/dt` (negative of the maturity derivative).
///
/// Call: `-S phi(d1) sigma / (2 sqrt(T)) - r K e^{-rT} N(d2)`.
/// Put uses the mirrored sign convention consistent with the put price
/// formula: `-S phi(d1) sigma / (2 sqrt(T)) + r K e^{-rT} N(-d2)`.
pub fn bs_theta(
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    sigma: f64,
    t: f64,
) -> Option<f64> {
    if !inputs_finite(s, k, r, sigma, t) || !greeks_defined(s, k, sigma, t) {
        return None;
    }
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    let decay = -s * normal_pdf(d1) * sigma / (2.0 * t.sqrt());
    let df = (-r * t).exp();
    Some(match option_type {
        OptionType::Call => decay - r * k * df * normal_cdf(d2),
        OptionType::Put => decay + r * k * df * normal_cdf(-d2),
    })
}

/// Bundles the four Greeks, or `None` when the set is not computable.
///
/// The preconditions are shared (`t > 0`, `sigma > 0`, `s > 0`, `k > 0`),
/// so the set is all-or-nothing.
pub fn black_scholes_greeks(
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    sigma: f64,
    t: f64,
) -> Option<Greeks> {
    let delta = bs_delta(option_type, s, k, r, sigma, t)?;
    let gamma = bs_gamma(s, k, r, sigma, t)?;
    let vega = bs_vega(s, k, r, sigma, t)?;
    let theta = bs_theta(option_type, s, k, r, sigma, t)?;
    Some(Greeks {
        delta,
        gamma,
        vega,
        theta,
    })
}

/// Analytic Black-Scholes engine for European vanilla options.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholesEngine;

impl BlackScholesEngine {
    /// Creates a Black-Scholes engine instance.
    pub fn new() -> Self {
        Self
    }
}

impl PricingEngine<VanillaOption> for BlackScholesEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        instrument.validate()?;

        let price = bs_price(
            instrument.option_type,
            market.spot,
            instrument.strike,
            market.rate,
            market.vol,
            instrument.expiry,
        )
        .ok_or_else(|| {
            PricingError::NumericalError("price not computable for supplied inputs".to_string())
        })?;

        // None at expiry: an expired option has no defined sensitivities.
        let greeks = black_scholes_greeks(
            instrument.option_type,
            market.spot,
            instrument.strike,
            market.rate,
            market.vol,
            instrument.expiry,
        );

        let mut diagnostics = HashMap::new();
        diagnostics.insert("vol".to_string(), market.vol);
        if greeks.is_some() {
            let (d1, d2) = d1_d2(
                market.spot,
                instrument.strike,
                market.rate,
                market.vol,
                instrument.expiry,
            );
            diagnostics.insert("d1".to_string(), d1);
            diagnostics.insert("d2".to_string(), d2);
        }

        Ok(PricingResult {
            price,
            stderr: None,
            greeks,
            diagnostics,
        })
    }
}
