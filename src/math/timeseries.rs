//! Historical-data utilities feeding the pricing layer.
//!
//! The pricing core consumes an annualized volatility scalar; this module
//! derives it from a close-price history via log returns.

/// Trading periods per year for daily close series.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

fn validate_prices(prices: &[f64]) {
    assert!(prices.len() >= 2, "need at least 2 prices");
    assert!(
        prices.iter().all(|p| p.is_finite() && *p > 0.0),
        "prices must be finite and > 0"
    );
}

fn sample_std_dev(series: &[f64]) -> f64 {
    let n = series.len() as f64;
    if n < 2.0 {
        return 0.0;
    }
    let mean = series.iter().sum::<f64>() / n;
    let var = series.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

/// Computes log returns from a price series.
///
/// `r_t = ln(P_t / P_{t-1})`
///
/// # Panics
/// Panics if fewer than 2 prices are supplied, or if any price is
/// non-finite or <= 0.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    validate_prices(prices);
    prices
        .windows(2)
        .map(|w| (w[1] / w[0]).ln())
        .collect::<Vec<_>>()
}

/// Annualized close-to-close historical volatility.
///
/// Sample (n-1) standard deviation of log returns scaled by
/// `sqrt(periods_per_year)`; use [`TRADING_DAYS_PER_YEAR`] for daily
/// closes.
///
/// # Panics
/// Panics if fewer than 3 prices are supplied, if any price is non-finite
/// or <= 0, or if `periods_per_year` is not positive.
pub fn historical_volatility(closes: &[f64], periods_per_year: f64) -> f64 {
    assert!(closes.len() >= 3, "need at least 3 closes");
    assert!(
        periods_per_year.is_finite() && periods_per_year > 0.0,
        "periods_per_year must be finite and > 0"
    );
    let r = log_returns(closes);
    sample_std_dev(&r) * periods_per_year.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn log_returns_match_hand_computation() {
        let r = log_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert_relative_eq!(r[0], (110.0_f64 / 100.0).ln(), epsilon = 1e-12);
        assert_relative_eq!(r[1], (99.0_f64 / 110.0).ln(), epsilon = 1e-12);
    }

    #[test]
    fn constant_prices_have_zero_volatility() {
        let vol = historical_volatility(&[100.0; 10], TRADING_DAYS_PER_YEAR);
        assert_relative_eq!(vol, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn alternating_prices_annualize_known_std() {
        // Log returns alternate +/- ln(1.01): sample std is known exactly.
        let mut closes = vec![100.0];
        for i in 0..20 {
            let last = *closes.last().unwrap();
            closes.push(if i % 2 == 0 { last * 1.01 } else { last / 1.01 });
        }
        let r = log_returns(&closes);
        let n = r.len() as f64;
        let mean = r.iter().sum::<f64>() / n;
        let expected_std =
            (r.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)).sqrt();

        let vol = historical_volatility(&closes, TRADING_DAYS_PER_YEAR);
        assert_relative_eq!(vol, expected_std * TRADING_DAYS_PER_YEAR.sqrt(), epsilon = 1e-12);
    }

    #[test]
    #[should_panic(expected = "finite and > 0")]
    fn non_positive_price_panics() {
        log_returns(&[100.0, 0.0, 101.0]);
    }
}
