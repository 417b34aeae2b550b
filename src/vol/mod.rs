//! Volatility analytics: implied-vol inversion and smile construction.

pub mod implied;
pub mod smile;

pub use implied::{IvConfig, implied_vol, implied_vol_with};
pub use smile::{
    ChainData, ChainTable, PriceSeries, RowOutcome, SkipReason, VolSmile, compute_smile,
    compute_smile_outcomes, compute_smile_outcomes_with,
};
