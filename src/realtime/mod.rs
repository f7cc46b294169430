pub mod ws;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use crate::sensors::models::SensorSnapshot;

/// Name of the only event pushed over the realtime channel.
pub const SENSOR_DATA_EVENT: &str = "sensorData";

/// How many snapshots a slow client may fall behind before it skips ahead.
pub const DEFAULT_CAPACITY: usize = 64;

/// Wire envelope: `{"event":"sensorData","data":{...}}`.
#[derive(Debug, Serialize)]
pub struct RealtimeEvent<'a> {
    pub event: &'static str,
    pub data: &'a SensorSnapshot,
}

impl<'a> RealtimeEvent<'a> {
    pub fn sensor_data(data: &'a SensorSnapshot) -> Self {
        Self {
            event: SENSOR_DATA_EVENT,
            data,
        }
    }
}

/// Fans full snapshots out to every connected realtime session.
///
/// Delivery is best-effort: nothing is queued for clients that are not
/// connected at the time of the publish.
#[derive(Debug, Clone)]
pub struct SnapshotPublisher {
    tx: broadcast::Sender<SensorSnapshot>,
}

impl SnapshotPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Push `snapshot` to all current subscribers, returning how many there were.
    pub fn publish(&self, snapshot: SensorSnapshot) -> usize {
        match self.tx.send(snapshot) {
            Ok(listeners) => {
                trace!("Broadcasted snapshot to {listeners} listener(s)");
                listeners
            }
            // No one is connected; nothing to do.
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SensorSnapshot> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SnapshotPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
