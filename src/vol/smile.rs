//! Volatility smile construction from option-chain quotes.
//!
//! A chain arrives either as a strike-indexed table with named price
//! columns or as a bare price series; both are normalized to `(strike,
//! price)` rows before inversion. Rows whose quote cannot be inverted are
//! skipped, and the surviving strikes and vols come out as parallel
//! sequences preserving input order.

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{OptionType, PricingError};
use crate::vol::implied::{IvConfig, implied_vol_with};

/// Strike-indexed quote table with named price columns.
///
/// Every column must be the same length as the strike axis. Smile
/// construction requires exactly one price column; a table carrying more
/// is ambiguous and rejected loudly rather than guessed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainTable {
    strikes: Vec<f64>,
    columns: Vec<(String, Vec<f64>)>,
}

impl ChainTable {
    /// Builds a table, validating that every column matches the strike
    /// axis length.
    pub fn new(strikes: Vec<f64>, columns: Vec<(String, Vec<f64>)>) -> Result<Self, PricingError> {
        for (name, values) in &columns {
            if values.len() != strikes.len() {
                return Err(PricingError::InvalidInput(format!(
                    "column `{name}` has {} values for {} strikes",
                    values.len(),
                    strikes.len()
                )));
            }
        }
        Ok(Self { strikes, columns })
    }

    /// Convenience constructor for the common one-column case.
    pub fn from_column(
        strikes: Vec<f64>,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, PricingError> {
        Self::new(strikes, vec![(name.into(), values)])
    }

    /// Strike axis.
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Number of price columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// A bare price series: one quote per strike, no column labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Label carried through diagnostics.
    pub name: String,
    /// Strike axis, parallel to `values`.
    pub strikes: Vec<f64>,
    /// Observed premiums, parallel to `strikes`.
    pub values: Vec<f64>,
}

/// Either chain shape accepted by the smile builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainData {
    /// Strike-indexed table with named columns.
    Table(ChainTable),
    /// Bare series, coerced to a one-column table.
    Series(PriceSeries),
}

impl ChainData {
    /// Normalizes either shape to `(strike, price)` rows in input order.
    ///
    /// A table must carry exactly one price column; zero or several is a
    /// structural error, not a skippable row.
    pub fn normalize(&self) -> Result<Vec<(f64, f64)>, PricingError> {
        match self {
            Self::Table(table) => match table.columns.as_slice() {
                [(_, values)] => Ok(table.strikes.iter().copied().zip(values.iter().copied()).collect()),
                cols => Err(PricingError::InvalidInput(format!(
                    "chain table must have exactly one price column, got {}",
                    cols.len()
                ))),
            },
            Self::Series(series) => {
                if series.values.len() != series.strikes.len() {
                    return Err(PricingError::InvalidInput(format!(
                        "series `{}` has {} values for {} strikes",
                        series.name,
                        series.values.len(),
                        series.strikes.len()
                    )));
                }
                Ok(series
                    .strikes
                    .iter()
                    .copied()
                    .zip(series.values.iter().copied())
                    .collect())
            }
        }
    }
}

/// Why a chain row produced no smile point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Quote was non-positive or not finite.
    NonPositivePrice,
    /// Inversion found no admissible volatility.
    NoSolution,
}

/// Per-row result of the smile build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowOutcome {
    /// Row inverted successfully.
    Solved {
        /// Strike of the row.
        strike: f64,
        /// Implied volatility at that strike.
        vol: f64,
    },
    /// Row dropped, with the reason recorded.
    Skipped {
        /// Strike of the row.
        strike: f64,
        /// Why the row was dropped.
        reason: SkipReason,
    },
}

/// Parallel strike and vol sequences forming one smile slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolSmile {
    /// Strikes that inverted successfully, in input order.
    pub strikes: Vec<f64>,
    /// Implied vols parallel to `strikes`.
    pub vols: Vec<f64>,
}

impl VolSmile {
    /// Number of points in the smile.
    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    /// True when no row survived inversion.
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }
}

fn invert_row(
    config: &IvConfig,
    option_type: OptionType,
    s: f64,
    r: f64,
    t: f64,
    strike: f64,
    price: f64,
) -> RowOutcome {
    if !price.is_finite() || price <= 0.0 {
        return RowOutcome::Skipped {
            strike,
            reason: SkipReason::NonPositivePrice,
        };
    }
    match implied_vol_with(config, option_type, s, strike, r, t, price) {
        Some(vol) => RowOutcome::Solved { strike, vol },
        None => RowOutcome::Skipped {
            strike,
            reason: SkipReason::NoSolution,
        },
    }
}

/// Inverts every chain row, reporting a [`RowOutcome`] per input row.
///
/// Outcomes are returned in input order regardless of how many rows skip,
/// so callers can attribute each drop to its strike.
pub fn compute_smile_outcomes(
    chain: &ChainData,
    spot: f64,
    expiry: f64,
    rate: f64,
    option_type: OptionType,
) -> Result<Vec<RowOutcome>, PricingError> {
    compute_smile_outcomes_with(&IvConfig::default(), chain, spot, expiry, rate, option_type)
}

/// [`compute_smile_outcomes`] with an explicit solver configuration.
pub fn compute_smile_outcomes_with(
    config: &IvConfig,
    chain: &ChainData,
    spot: f64,
    expiry: f64,
    rate: f64,
    option_type: OptionType,
) -> Result<Vec<RowOutcome>, PricingError> {
    let rows = chain.normalize()?;

    #[cfg(feature = "parallel")]
    let outcomes = rows
        .par_iter()
        .map(|&(strike, price)| invert_row(config, option_type, spot, rate, expiry, strike, price))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes = rows
        .iter()
        .map(|&(strike, price)| invert_row(config, option_type, spot, rate, expiry, strike, price))
        .collect();

    Ok(outcomes)
}

/// Builds a smile slice from an option chain.
///
/// Rows with a non-positive quote or a failed inversion are dropped; the
/// surviving strikes and vols come back as parallel sequences in input
/// order.
///
/// # Examples
/// ```rust
/// use volkit::core::OptionType;
/// use volkit::engines::analytic::bs_price;
/// use volkit::vol::smile::{ChainData, PriceSeries, compute_smile};
///
/// let strikes = vec![90.0, 100.0, 110.0];
/// let prices: Vec<f64> = strikes
///     .iter()
///     .map(|&k| bs_price(OptionType::Call, 100.0, k, 0.03, 0.25, 1.0).unwrap())
///     .collect();
/// let chain = ChainData::Series(PriceSeries {
///     name: "mid".into(),
///     strikes,
///     values: prices,
/// });
/// let smile = compute_smile(&chain, 100.0, 1.0, 0.03, OptionType::Call).unwrap();
/// assert_eq!(smile.len(), 3);
/// ```
pub fn compute_smile(
    chain: &ChainData,
    spot: f64,
    expiry: f64,
    rate: f64,
    option_type: OptionType,
) -> Result<VolSmile, PricingError> {
    let outcomes = compute_smile_outcomes(chain, spot, expiry, rate, option_type)?;
    let mut strikes = Vec::with_capacity(outcomes.len());
    let mut vols = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        if let RowOutcome::Solved { strike, vol } = outcome {
            strikes.push(strike);
            vols.push(vol);
        }
    }
    Ok(VolSmile { strikes, vols })
}
