//! Closed-form engines.

pub mod black_scholes;

pub use black_scholes::{
    BlackScholesEngine, black_scholes_greeks, bs_delta, bs_gamma, bs_price, bs_theta, bs_vega,
};
