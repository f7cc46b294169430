use futures::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use super::{error::SerialError, models::SensorSnapshot, parser::parse_line};
use crate::{reading_cache::ReadingCache, realtime::SnapshotPublisher};

/// Turns raw station lines into cache updates and realtime publishes.
#[derive(Clone)]
pub struct SensorService {
    cache: ReadingCache,
    publisher: SnapshotPublisher,
}

impl SensorService {
    pub fn new(cache: ReadingCache, publisher: SnapshotPublisher) -> Self {
        Self { cache, publisher }
    }

    /// Classify one line; on a match, update the cache and publish the full
    /// snapshot. Returns the published snapshot, or `None` if the line was dropped.
    pub async fn handle_line(&self, line: &str) -> Option<SensorSnapshot> {
        debug!(line = %line.trim(), "Station line received");

        let Some(parsed) = parse_line(line) else {
            debug!(line = %line.trim(), "Dropping unrecognised line");
            return None;
        };

        info!(field = %parsed.field, value = %parsed.value, "Sensor value updated");
        let snapshot = self.cache.apply(parsed.field, parsed.value).await;
        self.publisher.publish(snapshot.clone());
        Some(snapshot)
    }

    /// Consume `lines` until the stream ends or fails.
    /// Spawn this via `tokio::spawn`.
    pub async fn run<S>(self, mut lines: S)
    where
        S: Stream<Item = Result<String, SerialError>> + Unpin,
    {
        info!("Sensor ingest started");

        while let Some(next) = lines.next().await {
            match next {
                Ok(line) => {
                    self.handle_line(&line).await;
                }
                Err(e) => {
                    error!(error = %e, "Serial stream failed; sensor ingest stopped");
                    return;
                }
            }
        }

        warn!("Serial stream ended; sensor ingest stopped");
    }
}
