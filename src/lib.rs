//! Slopescreen Signal Engine Library
//!
//! Turns time-ordered daily price bars into trading signals (moving-average
//! crossovers, gentle-uptrend segments, forward profit potential) and a
//! composite 0-100 quality score, and screens whole symbol universes
//! concurrently against an injected bar provider.

pub mod application;
pub mod config;
pub mod domain;
