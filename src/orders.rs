/// Order event stream
///
/// Turns each market sample into one simulated limit order. Buys are skewed
/// half a spread below the reference price and sells half a spread above it;
/// the overlap divisor sets how far the two price clouds bleed into each other.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::config::{ConfigError, ConfigResult};
use crate::horizon::Timestamped;
use crate::market::MarketSample;

/// Timestamp column layout for whole seconds
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp column layout when the fraction is non-zero; always six digits
pub const TIMESTAMP_FORMAT_MICROS: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format a timestamp for the output column
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    let layout = if timestamp.nanosecond() != 0 {
        TIMESTAMP_FORMAT_MICROS
    } else {
        TIMESTAMP_FORMAT
    };
    timestamp.format(layout).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }

    /// Spread divisor: positive for sells (above mid), negative for buys
    pub fn divisor(&self) -> f64 {
        match self {
            Side::Buy => -2.0,
            Side::Sell => 2.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instrument symbol; cheap to clone into every event
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instrument(Arc<str>);

impl Instrument {
    pub fn new(symbol: &str) -> Self {
        Instrument(Arc::from(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weighted set of tradable instruments
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    entries: Vec<(Instrument, f64)>,
    total_weight: f64,
}

impl Universe {
    pub fn new<S: AsRef<str>>(entries: impl IntoIterator<Item = (S, f64)>) -> ConfigResult<Self> {
        let entries: Vec<(Instrument, f64)> = entries
            .into_iter()
            .map(|(symbol, weight)| (Instrument::new(symbol.as_ref()), weight))
            .collect();
        let total_weight = entries.iter().map(|(_, w)| w).sum();

        let universe = Universe { entries, total_weight };
        universe.validate()?;
        Ok(universe)
    }

    /// Equal-weight universe
    pub fn uniform<S: AsRef<str>>(symbols: impl IntoIterator<Item = S>) -> ConfigResult<Self> {
        Self::new(symbols.into_iter().map(|s| (s, 1.0)))
    }

    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }
        for (instrument, weight) in &self.entries {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(ConfigError::InvalidWeight {
                    symbol: instrument.to_string(),
                    weight: *weight,
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Map a uniform draw in `[0, 1)` to an instrument.
    ///
    /// The first instrument owns the top slice of the unit interval, so with
    /// two equal weights a draw `>= 0.5` picks the first symbol.
    pub fn pick(&self, u: f64) -> &Instrument {
        let mut cumulative = 0.0;
        for (instrument, weight) in &self.entries {
            cumulative += weight / self.total_weight;
            if u >= 1.0 - cumulative {
                return instrument;
            }
        }
        // Rounding can leave the cumulative sum a hair under 1.0
        &self.entries[self.entries.len() - 1].0
    }
}

impl Default for Universe {
    fn default() -> Self {
        let entries = vec![(Instrument::new("ABC"), 1.0), (Instrument::new("DEF"), 1.0)];
        Universe { entries, total_weight: 2.0 }
    }
}

/// One simulated limit order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEvent {
    pub timestamp: NaiveDateTime,
    pub instrument: Instrument,
    pub side: Side,
    /// Limit price, rounded to cents
    pub price: f64,
    pub size: u64,
}

impl OrderEvent {
    /// Five-field output row: timestamp, instrument, side, price, size
    pub fn record(&self) -> [String; 5] {
        [
            format_timestamp(&self.timestamp),
            self.instrument.to_string(),
            self.side.to_string(),
            format!("{:.2}", self.price),
            self.size.to_string(),
        ]
    }
}

impl Timestamped for OrderEvent {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// Round to two decimal places
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Order-level parameters
#[derive(Debug, Clone, PartialEq)]
pub struct OrderParams {
    pub overlap: f64,
    pub size_std: f64,
    pub universe: Universe,
}

pub struct OrderEvents<M, R> {
    market: M,
    params: OrderParams,
    rng: R,
}

impl<M, R> OrderEvents<M, R>
where
    M: Iterator<Item = MarketSample>,
    R: Rng,
{
    pub fn new(market: M, params: OrderParams, rng: R) -> Self {
        OrderEvents { market, params, rng }
    }

    fn normal(&mut self, mean: f64, std: f64) -> f64 {
        let z: f64 = StandardNormal.sample(&mut self.rng);
        mean + std * z
    }

    fn order_for(&mut self, sample: MarketSample) -> OrderEvent {
        let instrument = self.params.universe.pick(self.rng.gen::<f64>()).clone();
        let side = if self.rng.gen::<f64>() >= 0.5 {
            Side::Sell
        } else {
            Side::Buy
        };

        let mean = sample.price + sample.spread / side.divisor();
        let price = round_cents(self.normal(mean, sample.spread / self.params.overlap));
        // Float-to-int `as` truncates toward zero
        let size = self.normal(0.0, self.params.size_std).abs() as u64;

        OrderEvent {
            timestamp: sample.timestamp,
            instrument,
            side,
            price,
            size,
        }
    }
}

impl<M, R> Iterator for OrderEvents<M, R>
where
    M: Iterator<Item = MarketSample>,
    R: Rng,
{
    type Item = OrderEvent;

    fn next(&mut self) -> Option<OrderEvent> {
        let sample = self.market.next()?;
        Some(self.order_for(sample))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.market.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(price: f64, spread: f64) -> MarketSample {
        MarketSample {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 30, 0)
                .unwrap(),
            price,
            spread,
        }
    }

    fn params() -> OrderParams {
        OrderParams {
            overlap: 4.0,
            size_std: 100.0,
            universe: Universe::default(),
        }
    }

    #[test]
    fn test_side_divisor() {
        assert_eq!(Side::Buy.divisor(), -2.0);
        assert_eq!(Side::Sell.divisor(), 2.0);
        assert_eq!(Side::Buy.to_string(), "buy");
        assert_eq!(Side::Sell.to_string(), "sell");
    }

    #[test]
    fn test_default_universe_threshold() {
        let universe = Universe::default();
        assert_eq!(universe.pick(0.5).as_str(), "ABC");
        assert_eq!(universe.pick(0.99).as_str(), "ABC");
        assert_eq!(universe.pick(0.4999).as_str(), "DEF");
        assert_eq!(universe.pick(0.0).as_str(), "DEF");
    }

    #[test]
    fn test_weighted_universe() {
        let universe = Universe::new([("X", 1.0), ("Y", 2.0), ("Z", 1.0)]).unwrap();
        assert_eq!(universe.pick(0.8).as_str(), "X");
        assert_eq!(universe.pick(0.5).as_str(), "Y");
        assert_eq!(universe.pick(0.1).as_str(), "Z");
    }

    #[test]
    fn test_universe_rejects_bad_weights() {
        assert_eq!(
            Universe::new(Vec::<(&str, f64)>::new()),
            Err(ConfigError::EmptyUniverse)
        );
        assert!(matches!(
            Universe::new([("X", 0.0)]),
            Err(ConfigError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(101.236), 101.24);
        assert_eq!(round_cents(99.994), 99.99);
    }

    #[test]
    fn test_one_order_per_sample() {
        let market = std::iter::repeat(sample(100.0, 4.0)).take(25);
        let orders = OrderEvents::new(market, params(), StdRng::seed_from_u64(9));
        assert_eq!(orders.count(), 25);
    }

    #[test]
    fn test_zero_spread_pins_price() {
        let market = std::iter::repeat(sample(100.0, 0.0)).take(200);
        let orders = OrderEvents::new(market, params(), StdRng::seed_from_u64(11));
        for order in orders {
            assert_eq!(order.price, 100.0);
        }
    }

    #[test]
    fn test_sides_skew_around_reference() {
        let market = std::iter::repeat(sample(100.0, 4.0)).take(4000);
        let orders: Vec<OrderEvent> =
            OrderEvents::new(market, params(), StdRng::seed_from_u64(12)).collect();

        let mean = |side: Side| {
            let prices: Vec<f64> = orders
                .iter()
                .filter(|o| o.side == side)
                .map(|o| o.price)
                .collect();
            prices.iter().sum::<f64>() / prices.len() as f64
        };

        // Expected means are 98 and 102 with a deviation of 1
        assert!((mean(Side::Buy) - 98.0).abs() < 0.2);
        assert!((mean(Side::Sell) - 102.0).abs() < 0.2);
    }

    #[test]
    fn test_record_layout() {
        let order = OrderEvent {
            timestamp: sample(0.0, 0.0).timestamp + Duration::microseconds(26_490),
            instrument: Instrument::new("ABC"),
            side: Side::Sell,
            price: 101.5,
            size: 42,
        };
        assert_eq!(
            order.record(),
            [
                "2024-01-02 00:30:00.026490".to_string(),
                "ABC".to_string(),
                "sell".to_string(),
                "101.50".to_string(),
                "42".to_string(),
            ]
        );
    }

    #[test]
    fn test_record_whole_second_has_no_fraction() {
        let order = OrderEvent {
            timestamp: sample(0.0, 0.0).timestamp,
            instrument: Instrument::new("DEF"),
            side: Side::Buy,
            price: 99.0,
            size: 0,
        };
        assert_eq!(order.record()[0], "2024-01-02 00:30:00");
    }

    #[test]
    fn test_whole_millisecond_fraction_keeps_six_digits() {
        let t = sample(0.0, 0.0).timestamp;
        assert_eq!(
            format_timestamp(&(t + Duration::microseconds(500_000))),
            "2024-01-02 00:30:00.500000"
        );
        assert_eq!(
            format_timestamp(&(t + Duration::microseconds(1_000))),
            "2024-01-02 00:30:00.001000"
        );
    }
}
