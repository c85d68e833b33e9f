/// Datafeed - Synthetic Limit Order Generator
///
/// Produces a plausible stream of limit-order events for exercising order-book
/// simulators and analytics pipelines when no live market data is available.
/// Features include:
/// - Bounded random walks folded into range by reflection
/// - Market condition stream (gap, price, spread) on a simulated clock
/// - Order events skewed around the reference price by side
/// - Horizon cutoff turning the infinite pipeline into a finite feed
/// - Seeded, reproducible output
/// - CSV sink with skip-if-present behaviour

pub mod config;
pub mod walk;
pub mod market;
pub mod orders;
pub mod horizon;
pub mod feed;
pub mod stats;
pub mod sink;

pub use config::{ConfigError, ConfigResult, GeneratorConfig, WalkParams};
pub use walk::{reflect, BoundedRandomWalk};
pub use market::{MarketConditions, MarketSample};
pub use orders::{Instrument, OrderEvent, OrderEvents, OrderParams, Side, Universe};
pub use horizon::{HorizonBound, HorizonExt, Timestamped};
pub use feed::{generate, BoundedFeed, OrderFeed};
pub use stats::FeedStats;
pub use sink::{generate_csv, write_rows, SinkError, SinkOptions, SinkOutcome};
