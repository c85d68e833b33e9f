/// Generator configuration
///
/// All parameters are fixed at start-up and handed to the feed builder by value.
/// Validation happens once here so the generators themselves never fail.

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::orders::Universe;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name}: bounds must be finite, got [{min}, {max}]")]
    NonFiniteBounds { name: &'static str, min: f64, max: f64 },

    #[error("{name}: min {min} exceeds max {max}")]
    InvertedBounds { name: &'static str, min: f64, max: f64 },

    #[error("{name}: standard deviation must be finite and non-negative, got {std}")]
    InvalidStd { name: &'static str, std: f64 },

    #[error("spread minimum must be non-negative, got {0}")]
    NegativeSpread(f64),

    #[error("overlap must be finite and positive, got {0}")]
    InvalidOverlap(f64),

    #[error("instrument universe is empty")]
    EmptyUniverse,

    #[error("instrument {symbol}: weight must be finite and positive, got {weight}")]
    InvalidWeight { symbol: String, weight: f64 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Parameters of one bounded random walk: output range and step deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

impl WalkParams {
    pub fn new(min: f64, max: f64, std: f64) -> ConfigResult<Self> {
        let params = WalkParams { min, max, std };
        params.validate("walk")?;
        Ok(params)
    }

    /// Width of the output interval
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    pub(crate) fn validate(&self, name: &'static str) -> ConfigResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::NonFiniteBounds {
                name,
                min: self.min,
                max: self.max,
            });
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedBounds {
                name,
                min: self.min,
                max: self.max,
            });
        }
        if !self.std.is_finite() || self.std < 0.0 {
            return Err(ConfigError::InvalidStd { name, std: self.std });
        }
        Ok(())
    }
}

/// Inter-arrival gap in hours
pub const DEFAULT_GAP: WalkParams = WalkParams { min: 12.0, max: 36.0, std: 50.0 };
pub const DEFAULT_PRICE: WalkParams = WalkParams { min: 60.0, max: 150.0, std: 1.0 };
pub const DEFAULT_SPREAD: WalkParams = WalkParams { min: 2.0, max: 6.0, std: 0.1 };
pub const DEFAULT_OVERLAP: f64 = 4.0;
pub const DEFAULT_SIZE_STD: f64 = 100.0;
pub const DEFAULT_HORIZON_DAYS: i64 = 365 * 5;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Carried over from the original feed; generation never reads it.
    pub realtime: bool,
    /// Simulated duration after `market_open` past which generation stops
    pub horizon: Duration,
    pub market_open: NaiveDateTime,
    pub gap: WalkParams,
    pub price: WalkParams,
    pub spread: WalkParams,
    /// Divisor on the spread giving the limit price deviation
    pub overlap: f64,
    pub size_std: f64,
    pub universe: Universe,
    /// Fixed seed for reproducible output; entropy when `None`
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.gap.validate("gap")?;
        self.price.validate("price")?;
        self.spread.validate("spread")?;

        if self.spread.min < 0.0 {
            return Err(ConfigError::NegativeSpread(self.spread.min));
        }
        if !self.overlap.is_finite() || self.overlap <= 0.0 {
            return Err(ConfigError::InvalidOverlap(self.overlap));
        }
        if !self.size_std.is_finite() || self.size_std < 0.0 {
            return Err(ConfigError::InvalidStd { name: "size", std: self.size_std });
        }
        self.universe.validate()
    }

    /// Last timestamp allowed into the output
    pub fn horizon_end(&self) -> NaiveDateTime {
        match self.market_open.checked_add_signed(self.horizon) {
            Some(end) => end,
            // Saturate toward the sign of the horizon
            None if self.horizon < Duration::zero() => NaiveDateTime::MIN,
            None => NaiveDateTime::MAX,
        }
    }
}

/// Today's date at 00:30:00 local time
pub fn default_market_open() -> NaiveDateTime {
    Local::now().date_naive().and_time(NaiveTime::default()) + Duration::minutes(30)
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            realtime: true,
            horizon: Duration::days(DEFAULT_HORIZON_DAYS),
            market_open: default_market_open(),
            gap: DEFAULT_GAP,
            price: DEFAULT_PRICE,
            spread: DEFAULT_SPREAD,
            overlap: DEFAULT_OVERLAP,
            size_std: DEFAULT_SIZE_STD,
            universe: Universe::default(),
            seed: None,
        }
    }
}
