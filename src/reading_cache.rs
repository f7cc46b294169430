use std::sync::Arc;

use tokio::sync::RwLock;

use crate::sensors::models::{SensorField, SensorSnapshot};

/// Process-wide holder of the latest `SensorSnapshot`.
///
/// Wrapped in `Arc` so it can be cheaply cloned and shared across tasks.
/// The serial ingest task is the only writer; websocket sessions only read.
#[derive(Clone, Default)]
pub struct ReadingCache {
    inner: Arc<RwLock<SensorSnapshot>>,
}

impl ReadingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite one field and return the full snapshot as it stands afterwards.
    pub async fn apply(&self, field: SensorField, value: String) -> SensorSnapshot {
        let mut guard = self.inner.write().await;
        guard.set(field, value);
        guard.clone()
    }

    /// Return a copy of every current value.
    pub async fn snapshot(&self) -> SensorSnapshot {
        self.inner.read().await.clone()
    }
}
