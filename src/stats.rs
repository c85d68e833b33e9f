/// Generation statistics
///
/// Tracks row counts per side and instrument, the price envelope, the simulated
/// time span covered and wall-clock throughput of a generation run.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;

use crate::orders::{Instrument, OrderEvent, Side};

#[derive(Debug, Clone)]
pub struct FeedStats {
    start_time: Option<Instant>,
    total_rows: u64,
    buys: u64,
    sells: u64,
    total_size: u64,
    per_instrument: BTreeMap<Instrument, u64>,

    min_price: Option<f64>,
    max_price: Option<f64>,

    first_timestamp: Option<NaiveDateTime>,
    last_timestamp: Option<NaiveDateTime>,
}

impl FeedStats {
    pub fn new() -> Self {
        FeedStats {
            start_time: None,
            total_rows: 0,
            buys: 0,
            sells: 0,
            total_size: 0,
            per_instrument: BTreeMap::new(),
            min_price: None,
            max_price: None,
            first_timestamp: None,
            last_timestamp: None,
        }
    }

    /// Record an event handed to the sink
    pub fn record(&mut self, event: &OrderEvent) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
        self.total_rows += 1;
        self.total_size = self.total_size.saturating_add(event.size);

        match event.side {
            Side::Buy => self.buys += 1,
            Side::Sell => self.sells += 1,
        }
        *self.per_instrument.entry(event.instrument.clone()).or_insert(0) += 1;

        self.min_price = Some(self.min_price.map_or(event.price, |p| p.min(event.price)));
        self.max_price = Some(self.max_price.map_or(event.price, |p| p.max(event.price)));

        if self.first_timestamp.is_none() {
            self.first_timestamp = Some(event.timestamp);
        }
        self.last_timestamp = Some(event.timestamp);
    }

    /// Get rows per second of wall-clock time
    pub fn rows_per_sec(&self) -> f64 {
        match self.start_time {
            None => 0.0,
            Some(start) => {
                let elapsed = start.elapsed().as_secs_f64();
                if elapsed > 0.0 {
                    self.total_rows as f64 / elapsed
                } else {
                    0.0
                }
            }
        }
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|st| st.elapsed())
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn buys(&self) -> u64 {
        self.buys
    }

    pub fn sells(&self) -> u64 {
        self.sells
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Row count for one instrument
    pub fn instrument_rows(&self, instrument: &Instrument) -> u64 {
        self.per_instrument.get(instrument).copied().unwrap_or(0)
    }

    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.min_price.zip(self.max_price)
    }

    /// Simulated time covered, first to last row
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.first_timestamp.zip(self.last_timestamp)
    }

    pub fn reset(&mut self) {
        *self = FeedStats::new();
    }

    /// One-line summary for the completion log
    pub fn summary(&self) -> String {
        let mut out = format!(
            "rows={} buys={} sells={} size={}",
            self.total_rows, self.buys, self.sells, self.total_size
        );

        for (instrument, count) in &self.per_instrument {
            out.push_str(&format!(" {}={}", instrument, count));
        }
        if let Some((lo, hi)) = self.price_range() {
            out.push_str(&format!(" price=[{:.2}, {:.2}]", lo, hi));
        }
        if let Some((first, last)) = self.time_span() {
            out.push_str(&format!(" span={} -> {}", first, last));
        }
        out.push_str(&format!(" rate={:.0}/s", self.rows_per_sec()));
        out
    }
}

impl Default for FeedStats {
    fn default() -> Self {
        Self::new()
    }
}
