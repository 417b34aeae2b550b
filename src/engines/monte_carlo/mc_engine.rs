//! Terminal-draw Monte Carlo estimator for European vanilla options.
//!
//! One standard-normal draw per simulation produces the terminal price
//! `ST = S exp((r - sigma^2/2) T + sigma sqrt(T) Z)`; the estimate is the
//! discounted mean payoff. No path discretization and no variance
//! reduction: this is a statistical cross-check of the closed form, and
//! the estimate carries its sample standard error.
//!
//! Callers inject the random source, so a seeded generator gives
//! reproducible runs; the engine wrapper seeds a `StdRng` per pricing call.

use std::collections::HashMap;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{OptionType, PricingEngine, PricingError, PricingResult};
use crate::instruments::VanillaOption;
use crate::market::Market;

/// Default simulation count.
pub const DEFAULT_NUM_SIMS: usize = 10_000;

#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: usize = 4_096;

/// Monte Carlo price with its sampling error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McEstimate {
    /// Discounted mean payoff.
    pub price: f64,
    /// Sample standard error of the discounted mean.
    pub stderr: f64,
}

#[inline]
fn vanilla_payoff(option_type: OptionType, terminal: f64, strike: f64) -> f64 {
    (option_type.sign() * (terminal - strike)).max(0.0)
}

fn validate_inputs(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> Result<(), PricingError> {
    let finite =
        s.is_finite() && k.is_finite() && r.is_finite() && sigma.is_finite() && t.is_finite();
    if !finite {
        return Err(PricingError::InvalidInput(
            "monte carlo inputs must be finite".to_string(),
        ));
    }
    if s < 0.0 || k < 0.0 {
        return Err(PricingError::InvalidInput(
            "spot and strike must be >= 0".to_string(),
        ));
    }
    if sigma < 0.0 {
        return Err(PricingError::InvalidInput(
            "sigma must be >= 0".to_string(),
        ));
    }
    Ok(())
}

/// Accumulates `(sum, sum_of_squares)` of undiscounted payoffs over `count`
/// terminal draws.
fn accumulate_draws<R: Rng + ?Sized>(
    rng: &mut R,
    option_type: OptionType,
    s: f64,
    k: f64,
    drift: f64,
    vol_sqrt_t: f64,
    count: usize,
) -> (f64, f64) {
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for _ in 0..count {
        let z: f64 = rng.sample(StandardNormal);
        let terminal = s * (drift + vol_sqrt_t * z).exp();
        let x = vanilla_payoff(option_type, terminal, k);
        sum += x;
        sum_sq += x * x;
    }
    (sum, sum_sq)
}

fn estimate_from_sums(sum: f64, sum_sq: f64, n: f64, discount: f64) -> McEstimate {
    let mean = sum / n;
    let var = if n > 1.0 {
        ((sum_sq - sum * sum / n) / (n - 1.0)).max(0.0)
    } else {
        0.0
    };
    McEstimate {
        price: discount * mean,
        stderr: discount * (var / n).sqrt(),
    }
}

/// Monte Carlo price and standard error from an injected random source.
///
/// `t <= 0` degenerates to the immediate exercise value with zero error,
/// without drawing.
///
/// # Errors
/// Returns [`PricingError::InvalidInput`] for `num_sims == 0`, non-finite
/// inputs, negative spot/strike, or negative sigma.
///
/// # Examples
/// ```rust
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use volkit::core::OptionType;
/// use volkit::engines::monte_carlo::{DEFAULT_NUM_SIMS, monte_carlo_estimate};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let est = monte_carlo_estimate(
///     &mut rng, OptionType::Call, 100.0, 100.0, 0.05, 0.2, 1.0, DEFAULT_NUM_SIMS,
/// )
/// .unwrap();
/// assert!(est.price > 0.0 && est.stderr > 0.0);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn monte_carlo_estimate<R: Rng + ?Sized>(
    rng: &mut R,
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    sigma: f64,
    t: f64,
    num_sims: usize,
) -> Result<McEstimate, PricingError> {
    if num_sims == 0 {
        return Err(PricingError::InvalidInput(
            "num_sims must be > 0".to_string(),
        ));
    }
    validate_inputs(s, k, r, sigma, t)?;

    if t <= 0.0 {
        return Ok(McEstimate {
            price: vanilla_payoff(option_type, s, k),
            stderr: 0.0,
        });
    }

    let drift = (r - 0.5 * sigma * sigma) * t;
    let vol_sqrt_t = sigma * t.sqrt();
    let (sum, sum_sq) = accumulate_draws(rng, option_type, s, k, drift, vol_sqrt_t, num_sims);
    let discount = (-r * t).exp();
    Ok(estimate_from_sums(sum, sum_sq, num_sims as f64, discount))
}

/// Monte Carlo price from an injected random source.
///
/// See [`monte_carlo_estimate`] for the estimator definition and error
/// conditions.
#[allow(clippy::too_many_arguments)]
pub fn monte_carlo_price<R: Rng + ?Sized>(
    rng: &mut R,
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    sigma: f64,
    t: f64,
    num_sims: usize,
) -> Result<f64, PricingError> {
    monte_carlo_estimate(rng, option_type, s, k, r, sigma, t, num_sims).map(|est| est.price)
}

/// Monte Carlo pricing engine for European vanilla options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarloPricingEngine {
    /// Number of simulated terminal draws.
    pub num_sims: usize,
    /// RNG seed.
    pub seed: u64,
}

impl Default for MonteCarloPricingEngine {
    fn default() -> Self {
        Self {
            num_sims: DEFAULT_NUM_SIMS,
            seed: 0,
        }
    }
}

impl MonteCarloPricingEngine {
    /// Creates an engine with an explicit simulation count and seed.
    pub fn new(num_sims: usize, seed: u64) -> Self {
        Self { num_sims, seed }
    }

    /// Sets the simulation count.
    pub fn with_num_sims(mut self, num_sims: usize) -> Self {
        self.num_sims = num_sims;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[cfg(feature = "parallel")]
    fn estimate(
        &self,
        option_type: OptionType,
        s: f64,
        k: f64,
        r: f64,
        sigma: f64,
        t: f64,
    ) -> McEstimate {
        let drift = (r - 0.5 * sigma * sigma) * t;
        let vol_sqrt_t = sigma * t.sqrt();
        let num_chunks = self.num_sims.div_ceil(PARALLEL_CHUNK);
        let seed = self.seed;
        let num_sims = self.num_sims;

        // Independent seed stream per chunk; draw order within the
        // aggregate carries no contract, only the mean does.
        let (sum, sum_sq) = (0..num_chunks)
            .into_par_iter()
            .map(|chunk| {
                let count = PARALLEL_CHUNK.min(num_sims - chunk * PARALLEL_CHUNK);
                let chunk_seed =
                    seed ^ (chunk as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                let mut rng = StdRng::seed_from_u64(chunk_seed);
                accumulate_draws(&mut rng, option_type, s, k, drift, vol_sqrt_t, count)
            })
            .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));

        let discount = (-r * t).exp();
        estimate_from_sums(sum, sum_sq, self.num_sims as f64, discount)
    }
}

impl PricingEngine<VanillaOption> for MonteCarloPricingEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        instrument.validate()?;
        if self.num_sims == 0 {
            return Err(PricingError::InvalidInput(
                "num_sims must be > 0".to_string(),
            ));
        }

        let estimate = if instrument.expiry <= 0.0 {
            McEstimate {
                price: instrument.payoff(market.spot),
                stderr: 0.0,
            }
        } else {
            #[cfg(feature = "parallel")]
            {
                self.estimate(
                    instrument.option_type,
                    market.spot,
                    instrument.strike,
                    market.rate,
                    market.vol,
                    instrument.expiry,
                )
            }
            #[cfg(not(feature = "parallel"))]
            {
                let mut rng = StdRng::seed_from_u64(self.seed);
                monte_carlo_estimate(
                    &mut rng,
                    instrument.option_type,
                    market.spot,
                    instrument.strike,
                    market.rate,
                    market.vol,
                    instrument.expiry,
                    self.num_sims,
                )?
            }
        };

        let mut diagnostics = HashMap::new();
        diagnostics.insert("num_sims".to_string(), self.num_sims as f64);
        diagnostics.insert("vol".to_string(), market.vol);

        Ok(PricingResult {
            price: estimate.price,
            stderr: Some(estimate.stderr),
            greeks: None,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::analytic::bs_price;

    #[test]
    fn mc_matches_closed_form_within_five_percent() {
        for option_type in [OptionType::Call, OptionType::Put] {
            let mut rng = StdRng::seed_from_u64(42);
            let est = monte_carlo_estimate(
                &mut rng,
                option_type,
                100.0,
                100.0,
                0.05,
                0.2,
                1.0,
                DEFAULT_NUM_SIMS,
            )
            .unwrap();

            let bs = bs_price(option_type, 100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
            let rel_err = ((est.price - bs) / bs).abs();
            assert!(
                rel_err <= 0.05,
                "MC/BS relative error too high: mc={} bs={} rel_err={}",
                est.price,
                bs,
                rel_err
            );
        }
    }

    #[test]
    fn mc_estimate_is_within_three_stderr_of_closed_form() {
        let mut rng = StdRng::seed_from_u64(7);
        let est = monte_carlo_estimate(
            &mut rng,
            OptionType::Call,
            100.0,
            110.0,
            0.03,
            0.25,
            0.5,
            50_000,
        )
        .unwrap();
        let bs = bs_price(OptionType::Call, 100.0, 110.0, 0.03, 0.25, 0.5).unwrap();
        assert!((est.price - bs).abs() <= 3.0 * est.stderr + 1e-3);
    }

    #[test]
    fn same_seed_reproduces_the_estimate() {
        let run = || {
            let mut rng = StdRng::seed_from_u64(123);
            monte_carlo_price(&mut rng, OptionType::Put, 95.0, 100.0, 0.02, 0.3, 0.75, 5_000)
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn expired_option_returns_exercise_value_without_drawing() {
        let mut rng = StdRng::seed_from_u64(1);
        let est = monte_carlo_estimate(
            &mut rng,
            OptionType::Call,
            110.0,
            100.0,
            0.05,
            0.2,
            0.0,
            DEFAULT_NUM_SIMS,
        )
        .unwrap();
        assert_eq!(est.price, 10.0);
        assert_eq!(est.stderr, 0.0);
    }

    #[test]
    fn zero_sims_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err =
            monte_carlo_price(&mut rng, OptionType::Call, 100.0, 100.0, 0.05, 0.2, 1.0, 0)
                .unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(monte_carlo_price(
            &mut rng,
            OptionType::Call,
            f64::NAN,
            100.0,
            0.05,
            0.2,
            1.0,
            100
        )
        .is_err());
    }

    #[test]
    fn engine_reports_price_and_stderr() {
        let market = Market::builder().spot(100.0).rate(0.05).vol(0.2).build().unwrap();
        let option = VanillaOption::european_call(100.0, 1.0);

        let result = MonteCarloPricingEngine::new(20_000, 42)
            .price(&option, &market)
            .unwrap();

        let bs = bs_price(OptionType::Call, 100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        assert!(((result.price - bs) / bs).abs() <= 0.05);
        assert!(result.stderr.unwrap() > 0.0);
        assert!(result.greeks.is_none());
    }
}
