//! Deterministic traffic model
//!
//! A placeholder for a real prediction model: congestion is pseudo-random
//! but fully determined by the path and the hour, so identical requests
//! always get identical estimates.

mod estimator;

pub use estimator::{PEAK_HOUR, TrafficEstimator, TrafficProfile, hour_of_day};
pub(crate) use estimator::validate_hour;
