//! Closed-form microstrip design calculators: impedance analysis and width
//! synthesis, stepped-impedance low-pass filter synthesis, and illustrative
//! S-parameter approximations for uniform lines and gap-coupled resonators.
//!
//! ```
//! use rfstrip::prelude::*;
//!
//! let sub = Msub::new("FR4", 4.4, 1.6e-3, 0.025).unwrap();
//! let w = sub.width(50.0).unwrap();
//! assert!((sub.z0(w).unwrap() - 50.0).abs() < 0.5);
//! ```
pub mod config;
pub mod consts;
pub mod element;
pub mod error;
pub mod file;
pub mod filter;
pub mod frequency;
pub mod logger;
pub mod network;
pub mod prelude;
pub mod report;
pub mod scale;
pub mod unit;
pub mod util;
