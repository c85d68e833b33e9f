/// Market condition stream
///
/// Steps three independent bounded walks (inter-arrival gap, price, spread) in
/// lockstep and stamps each sample with an accumulated simulated clock.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use crate::horizon::Timestamped;
use crate::walk::BoundedRandomWalk;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// One tick of simulated market state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSample {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub spread: f64,
}

impl Timestamped for MarketSample {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// Convert a gap in hours to a non-negative duration at microsecond resolution.
pub fn gap_duration(hours: f64) -> Duration {
    Duration::microseconds((hours.abs() * MICROS_PER_HOUR).round() as i64)
}

#[derive(Debug, Clone)]
pub struct MarketConditions<R> {
    clock: Option<NaiveDateTime>,
    gap: BoundedRandomWalk<R>,
    price: BoundedRandomWalk<R>,
    spread: BoundedRandomWalk<R>,
}

impl<R: Rng> MarketConditions<R> {
    pub fn new(
        t0: NaiveDateTime,
        gap: BoundedRandomWalk<R>,
        price: BoundedRandomWalk<R>,
        spread: BoundedRandomWalk<R>,
    ) -> Self {
        MarketConditions {
            clock: Some(t0),
            gap,
            price,
            spread,
        }
    }
}

impl<R: Rng> Iterator for MarketConditions<R> {
    type Item = MarketSample;

    fn next(&mut self) -> Option<MarketSample> {
        // Stream ends once the clock has run off the calendar
        let timestamp = self.clock?;

        let hours = self.gap.next()?;
        let price = self.price.next()?;
        let spread = self.spread.next()?;

        // The gap drawn now only moves the next sample's timestamp
        self.clock = timestamp.checked_add_signed(gap_duration(hours));

        Some(MarketSample {
            timestamp,
            price,
            spread,
        })
    }
}
