//! Monte Carlo engines.

pub mod mc_engine;

pub use mc_engine::{
    DEFAULT_NUM_SIMS, McEstimate, MonteCarloPricingEngine, monte_carlo_estimate,
    monte_carlo_price,
};
