/// CSV sink
///
/// Drains a finite order stream into headerless five-column CSV rows. The
/// file-level entry point skips generation entirely when the destination
/// already exists.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, GeneratorConfig};
use crate::feed::OrderFeed;
use crate::orders::OrderEvent;
use crate::stats::FeedStats;

/// Rows between progress log lines
const PROGRESS_INTERVAL: u64 = 100_000;

/// Leading rows echoed to the log
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SinkResult<T> = Result<T, SinkError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    /// Destination already existed; nothing written
    Skipped,
    Written { rows: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkOptions {
    /// Overwrite an existing destination instead of skipping
    pub force: bool,
    pub preview_rows: usize,
}

impl Default for SinkOptions {
    fn default() -> Self {
        SinkOptions {
            force: false,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Write every event as a CSV row and return the collected statistics.
pub fn write_rows<W, I>(writer: W, events: I, preview_rows: usize) -> SinkResult<FeedStats>
where
    W: Write,
    I: IntoIterator<Item = OrderEvent>,
{
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    let mut stats = FeedStats::new();

    for (idx, event) in events.into_iter().enumerate() {
        let record = event.record();
        csv.write_record(&record)?;
        stats.record(&event);

        if idx < preview_rows {
            info!(row = idx, "{}", record.join(","));
        }
        if stats.total_rows() % PROGRESS_INTERVAL == 0 {
            debug!(rows = stats.total_rows(), "generated");
        }
    }

    csv.flush()?;
    Ok(stats)
}

/// Generate the feed for `config` into `path` unless the file already exists.
pub fn generate_csv(
    path: &Path,
    config: &GeneratorConfig,
    options: SinkOptions,
) -> SinkResult<SinkOutcome> {
    if path.is_file() && !options.force {
        info!(path = %path.display(), "data already present, skipping generation");
        return Ok(SinkOutcome::Skipped);
    }

    // Build before touching the file so a bad config leaves nothing behind
    let feed = OrderFeed::new(config.clone())?;
    let horizon_end = feed.config().horizon_end();
    let feed = feed.bounded()?;

    info!(path = %path.display(), until = %horizon_end, "no data found, generating");
    let file = File::create(path)?;
    let stats = write_rows(file, feed, options.preview_rows)?;

    info!("csv generation completed: {}", stats.summary());
    Ok(SinkOutcome::Written {
        rows: stats.total_rows(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{Instrument, Side};
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn event(size: u64) -> OrderEvent {
        OrderEvent {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 30, 0)
                .unwrap(),
            instrument: Instrument::new("DEF"),
            side: Side::Buy,
            price: 97.1,
            size,
        }
    }

    #[test]
    fn test_write_rows_format() {
        let mut buf = Vec::new();
        let stats = write_rows(&mut buf, vec![event(5), event(17)], 0).unwrap();

        assert_eq!(stats.total_rows(), 2);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "2024-01-02 00:30:00,DEF,buy,97.10,5\n2024-01-02 00:30:00,DEF,buy,97.10,17\n"
        );
    }

    #[test]
    fn test_write_rows_empty() {
        let mut buf = Vec::new();
        let stats = write_rows(&mut buf, Vec::new(), DEFAULT_PREVIEW_ROWS).unwrap();
        assert_eq!(stats.total_rows(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_preview_rows_visible_at_info() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            write_rows(io::sink(), vec![event(5), event(17), event(23)], 2).unwrap();
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("2024-01-02 00:30:00,DEF,buy,97.10,5"));
        assert!(logs.contains("2024-01-02 00:30:00,DEF,buy,97.10,17"));
        assert!(!logs.contains("97.10,23"));
    }

    #[test]
    fn test_write_error_surfaces() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let result = write_rows(Broken, vec![event(1)], 0);
        assert!(result.is_err());
    }
}
