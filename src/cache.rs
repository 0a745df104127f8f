use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::Result;
use crate::client::NeviwebClient;
use crate::types::Snapshot;

/// Handle held by entities. The mutex serializes refreshes and setpoint
/// writes so concurrent callers cannot race the session state.
pub type SharedCache = Arc<Mutex<DataCache>>;

/// Owns the client and the last successful snapshot. Readers get the
/// snapshot as an immutable value; a refresh swaps the whole thing.
#[derive(Debug)]
pub struct DataCache {
    client: NeviwebClient,
    snapshot: Arc<Snapshot>,
}

impl DataCache {
    pub fn new(client: NeviwebClient) -> Self {
        Self {
            client,
            snapshot: Arc::new(Snapshot::new()),
        }
    }

    pub fn into_shared(self) -> SharedCache {
        Arc::new(Mutex::new(self))
    }

    /// Fetch a fresh snapshot. A failed fetch is logged and the previous
    /// snapshot stays in place; the polling loop must never die over a
    /// transient portal error.
    pub async fn refresh(&mut self) {
        match self.client.fetch_all().await {
            Ok(snapshot) => self.snapshot = Arc::new(snapshot),
            Err(e) => warn!(error = %e, "refresh failed, keeping previous snapshot"),
        }
    }

    /// Current snapshot, empty if no fetch has ever succeeded.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Setpoint writes go through here so entities never touch the
    /// client directly. Failures propagate to the caller.
    pub async fn set_temperature(&mut self, device_id: u64, temperature: f64) -> Result<()> {
        self.client.set_temperature(device_id, temperature).await
    }
}
