//! Instrument definitions.

use serde::{Deserialize, Serialize};

use crate::core::{Instrument, OptionType, PricingError};

/// European vanilla option contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VanillaOption {
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: f64,
    /// Time to expiry in years.
    pub expiry: f64,
}

impl VanillaOption {
    /// Creates a European call.
    pub fn european_call(strike: f64, expiry: f64) -> Self {
        Self {
            option_type: OptionType::Call,
            strike,
            expiry,
        }
    }

    /// Creates a European put.
    pub fn european_put(strike: f64, expiry: f64) -> Self {
        Self {
            option_type: OptionType::Put,
            strike,
            expiry,
        }
    }

    /// Validates contract fields.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(PricingError::InvalidInput(
                "strike must be finite and > 0".to_string(),
            ));
        }
        if !self.expiry.is_finite() || self.expiry < 0.0 {
            return Err(PricingError::InvalidInput(
                "expiry must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Exercise payoff at a given underlying level.
    #[inline]
    pub fn payoff(&self, spot: f64) -> f64 {
        (self.option_type.sign() * (spot - self.strike)).max(0.0)
    }
}

impl Instrument for VanillaOption {
    fn instrument_type(&self) -> &str {
        "vanilla_european"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_expiring_today() {
        assert!(VanillaOption::european_call(100.0, 0.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_strike_and_expiry() {
        assert!(VanillaOption::european_call(0.0, 1.0).validate().is_err());
        assert!(VanillaOption::european_put(100.0, -0.5).validate().is_err());
        assert!(VanillaOption::european_put(f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn payoff_matches_side() {
        let call = VanillaOption::european_call(100.0, 1.0);
        let put = VanillaOption::european_put(100.0, 1.0);
        assert_eq!(call.payoff(110.0), 10.0);
        assert_eq!(call.payoff(90.0), 0.0);
        assert_eq!(put.payoff(90.0), 10.0);
        assert_eq!(put.payoff(110.0), 0.0);
    }
}
