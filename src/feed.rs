/// Feed assembly
///
/// Wires walk -> market -> orders -> horizon from a validated configuration.
/// With a seed the whole pipeline is reproducible: a master RNG hands out one
/// child seed per component in a fixed order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigResult, GeneratorConfig};
use crate::horizon::{HorizonBound, HorizonExt};
use crate::market::MarketConditions;
use crate::orders::{OrderEvents, OrderParams};
use crate::walk::BoundedRandomWalk;

pub type MarketStream = MarketConditions<StdRng>;
pub type OrderStream = OrderEvents<MarketStream, StdRng>;
pub type BoundedFeed = HorizonBound<OrderStream>;

struct Seeds {
    gap: u64,
    price: u64,
    spread: u64,
    orders: u64,
}

impl Seeds {
    fn derive(seed: Option<u64>) -> Self {
        let mut master = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Seeds {
            gap: master.gen(),
            price: master.gen(),
            spread: master.gen(),
            orders: master.gen(),
        }
    }
}

/// Builds the generator pipeline
#[derive(Debug, Clone)]
pub struct OrderFeed {
    config: GeneratorConfig,
}

impl OrderFeed {
    pub fn new(config: GeneratorConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(OrderFeed { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn build(&self) -> ConfigResult<OrderStream> {
        let seeds = Seeds::derive(self.config.seed);

        let market = MarketConditions::new(
            self.config.market_open,
            BoundedRandomWalk::new(self.config.gap, StdRng::seed_from_u64(seeds.gap))?,
            BoundedRandomWalk::new(self.config.price, StdRng::seed_from_u64(seeds.price))?,
            BoundedRandomWalk::new(self.config.spread, StdRng::seed_from_u64(seeds.spread))?,
        );

        let params = OrderParams {
            overlap: self.config.overlap,
            size_std: self.config.size_std,
            universe: self.config.universe.clone(),
        };
        Ok(OrderEvents::new(market, params, StdRng::seed_from_u64(seeds.orders)))
    }

    /// Unbounded order stream, for consumers that apply their own cutoff
    pub fn unbounded(&self) -> ConfigResult<OrderStream> {
        self.build()
    }

    /// Order stream cut at `market_open + horizon`
    pub fn bounded(&self) -> ConfigResult<BoundedFeed> {
        Ok(self.build()?.until(self.config.horizon_end()))
    }
}

/// Validate `config` and return its bounded order stream
pub fn generate(config: GeneratorConfig) -> ConfigResult<BoundedFeed> {
    OrderFeed::new(config)?.bounded()
}
