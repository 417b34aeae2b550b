//! Pricing engines: closed-form analytic and Monte Carlo.

pub mod analytic;
pub mod monte_carlo;
