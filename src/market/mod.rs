//! Market snapshot consumed by pricing engines.

use crate::core::PricingError;

/// Market snapshot used by all pricing engines.
///
/// A single flat volatility is carried; smile/surface lookups are handled
/// downstream by the vol layer, not by the snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Market {
    /// Spot price.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Annualized volatility.
    pub vol: f64,
}

impl Market {
    /// Starts a market builder.
    #[inline]
    pub fn builder() -> MarketBuilder {
        MarketBuilder::default()
    }
}

/// Builder for [`Market`].
#[derive(Debug, Clone, Default)]
pub struct MarketBuilder {
    spot: Option<f64>,
    rate: Option<f64>,
    vol: Option<f64>,
}

impl MarketBuilder {
    /// Sets the spot price.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the flat risk-free rate.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the flat annualized volatility.
    #[inline]
    pub fn vol(mut self, vol: f64) -> Self {
        self.vol = Some(vol);
        self
    }

    /// Validates and builds a [`Market`].
    pub fn build(self) -> Result<Market, PricingError> {
        let spot = self
            .spot
            .ok_or_else(|| PricingError::InvalidInput("market spot is required".to_string()))?;
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market spot must be finite and > 0".to_string(),
            ));
        }

        let rate = self.rate.unwrap_or(0.0);
        if !rate.is_finite() {
            return Err(PricingError::InvalidInput(
                "market rate must be finite".to_string(),
            ));
        }

        let vol = self
            .vol
            .ok_or_else(|| PricingError::InvalidInput("market vol is required".to_string()))?;
        if !vol.is_finite() || vol <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market vol must be finite and > 0".to_string(),
            ));
        }

        Ok(Market { spot, rate, vol })
    }
}
