use chrono::{NaiveTime, Timelike};
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use xxhash_rust::xxh32::xxh32;

use crate::{Error, Hour, Minutes, NodeId};

/// Hour the baseline is anchored at
pub const PEAK_HOUR: Hour = 17;
const BASELINE: f64 = 0.2;
const BASELINE_SPAN: f64 = 0.6;
const JITTER: f64 = 0.1;
const SEED_SALT: u32 = 0;

/// Hour component of a departure time
#[allow(clippy::cast_possible_truncation)]
pub fn hour_of_day(time: NaiveTime) -> Hour {
    time.hour() as Hour
}

/// Congestion in `[0, 1]` for every node of a path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrafficProfile(Vec<f64>);

impl TrafficProfile {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn into_values(self) -> Vec<f64> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Average congestion, 0 for an empty profile
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            0.0
        } else {
            self.0.iter().sum::<f64>() / self.0.len() as f64
        }
    }
}

/// Stateless estimator, safe to share between threads
#[derive(Debug, Default, Clone, Copy)]
pub struct TrafficEstimator;

impl TrafficEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Congestion profile for `path` departing at `hour`
    ///
    /// The seed is a hash of `"id1,id2,...-hour"`. Each value is
    /// `0.2 + 0.6 * |hour - 17| / 24` plus uniform jitter in `[-0.1, 0.1]`,
    /// clamped to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHour` for hours above 23
    pub fn congestion(&self, path: &[NodeId], hour: Hour) -> Result<TrafficProfile, Error> {
        validate_hour(hour)?;
        Ok(profile_for(path, hour))
    }

    /// `base_time * (1 + mean congestion)`
    pub fn adjusted_time(&self, base_time: Minutes, profile: &TrafficProfile) -> Minutes {
        base_time * (1.0 + profile.mean())
    }

    /// Adjusted travel time for `path` departing at `hour`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHour` for hours above 23
    pub fn travel_time(
        &self,
        path: &[NodeId],
        base_time: Minutes,
        hour: Hour,
    ) -> Result<Minutes, Error> {
        let profile = self.congestion(path, hour)?;
        Ok(self.adjusted_time(base_time, &profile))
    }

    /// Departure hour with the lowest adjusted time and that time
    ///
    /// All 24 hours are evaluated; on ties the earliest hour wins.
    pub fn best_hour(&self, path: &[NodeId], base_time: Minutes) -> (Hour, Minutes) {
        let mut best = (0, f64::INFINITY);
        for hour in 0..24 {
            let time = self.adjusted_time(base_time, &profile_for(path, hour));
            if time < best.1 {
                best = (hour, time);
            }
        }
        best
    }
}

pub(crate) fn validate_hour(hour: Hour) -> Result<(), Error> {
    if hour > 23 {
        Err(Error::InvalidHour(hour))
    } else {
        Ok(())
    }
}

fn profile_for(path: &[NodeId], hour: Hour) -> TrafficProfile {
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed_for(path, hour)));
    let base = baseline(hour);
    let values = path
        .iter()
        .map(|_| (base + rng.gen_range(-JITTER..=JITTER)).clamp(0.0, 1.0))
        .collect();
    TrafficProfile(values)
}

fn baseline(hour: Hour) -> f64 {
    let offset = f64::from(hour.abs_diff(PEAK_HOUR));
    BASELINE + BASELINE_SPAN * (offset / 24.0)
}

fn seed_for(path: &[NodeId], hour: Hour) -> u32 {
    let key = format!("{}-{hour}", path.iter().join(","));
    xxh32(key.as_bytes(), SEED_SALT)
}
