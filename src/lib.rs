//! Volkit is a small quantitative library for European option analytics:
//! closed-form Black-Scholes pricing and Greeks, Monte Carlo estimation,
//! implied-volatility inversion, and volatility-smile construction from an
//! option-chain strike ladder.
//!
//! References used across modules:
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 13, 15, 19.
//! - Glasserman (2004) for Monte Carlo estimators.
//! - Brent, *Algorithms for Minimization without Derivatives* (1973), Ch. 4.
//!
//! Numerical considerations:
//! - Kernel routines degrade degenerate inputs (expired, zero-vol, zero
//!   spot/strike) to their closed-form limits or an explicit `None`; NaN
//!   never leaks to callers.
//! - The implied-vol solver is bracketed: quotes outside the admissible
//!   volatility range report "no solution" instead of failing.
//! - MC estimates are sampling-driven; callers inject a seeded RNG for
//!   reproducible runs and receive a standard error alongside the price.
//!
//! # Feature Flags
//! - `parallel`: enables Rayon-powered Monte Carlo draws and smile loops.
//!
//! # Quick Start
//! Price a Black-Scholes call:
//! ```rust
//! use volkit::core::OptionType;
//! use volkit::engines::analytic::bs_price;
//!
//! let px = bs_price(OptionType::Call, 100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
//! assert!(px > 10.0 && px < 11.0);
//! ```
//!
//! Invert implied volatility:
//! ```rust
//! use volkit::core::OptionType;
//! use volkit::engines::analytic::bs_price;
//! use volkit::vol::implied::implied_vol;
//!
//! let market = bs_price(OptionType::Call, 100.0, 105.0, 0.02, 0.25, 1.0).unwrap();
//! let sigma = implied_vol(OptionType::Call, 100.0, 105.0, 0.02, 1.0, market).unwrap();
//! assert!((sigma - 0.25).abs() < 1.0e-6);
//! ```
//!
//! Build a smile from a strike-indexed chain:
//! ```rust
//! use volkit::core::OptionType;
//! use volkit::engines::analytic::bs_price;
//! use volkit::vol::smile::{compute_smile, ChainData, ChainTable};
//!
//! let strikes = vec![90.0, 100.0, 110.0];
//! let prices: Vec<f64> = strikes
//!     .iter()
//!     .map(|&k| bs_price(OptionType::Call, 100.0, k, 0.02, 0.2, 0.5).unwrap())
//!     .collect();
//! let table = ChainTable::from_column(strikes, "last_price", prices).unwrap();
//! let smile = compute_smile(&ChainData::Table(table), 100.0, 0.5, 0.02, OptionType::Call).unwrap();
//! assert_eq!(smile.len(), 3);
//! ```

pub mod core;
pub mod engines;
pub mod instruments;
pub mod market;
pub mod math;
pub mod vol;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::engines::analytic::*;
    pub use crate::engines::monte_carlo::*;
    pub use crate::instruments::*;
    pub use crate::market::*;
    pub use crate::vol::implied::*;
    pub use crate::vol::smile::*;
}
