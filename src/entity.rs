use async_trait::async_trait;
use tracing::debug;

use crate::cache::SharedCache;
use crate::types::{OperatingState, Snapshot};
use crate::{Error, Result};

/// Feature flags a host platform can probe before wiring up controls.
pub const SUPPORT_TARGET_TEMPERATURE: u32 = 1;

/// Capability contract for a climate-control entity. Host adapter layers
/// implement their framework glue against this instead of a base class.
#[async_trait]
pub trait ClimateEntity {
    fn name(&self) -> &str;

    fn temperature_unit(&self) -> &'static str {
        "°C"
    }

    fn supported_features(&self) -> u32 {
        SUPPORT_TARGET_TEMPERATURE
    }

    fn current_temperature(&self) -> Option<f64>;

    fn target_temperature(&self) -> Option<f64>;

    fn min_temp(&self) -> f64;

    fn max_temp(&self) -> f64;

    fn operating_state(&self) -> OperatingState;

    /// Pull fresh data and update the exposed fields.
    async fn refresh(&mut self) -> Result<()>;

    /// Forward a target-temperature change. `None` is a no-op.
    async fn set_target_temperature(&mut self, temperature: Option<f64>) -> Result<()>;
}

/// One Neviweb thermostat presented as a climate entity.
#[derive(Debug)]
pub struct Thermostat {
    cache: SharedCache,
    device_id: u64,
    name: String,
    min_temp: f64,
    max_temp: f64,
    current: Option<f64>,
    target: Option<f64>,
    mode: Option<i64>,
    state: OperatingState,
}

impl Thermostat {
    /// Temperature bounds are captured here, once; the device must be
    /// present in the current snapshot.
    pub async fn new(cache: SharedCache, device_id: u64, name: impl Into<String>) -> Result<Self> {
        let snapshot = cache.lock().await.snapshot();
        let record = snapshot
            .get(&device_id)
            .ok_or(Error::DeviceNotFound(device_id))?;

        Ok(Self {
            min_temp: record.info.temp_min,
            max_temp: record.info.temp_max,
            cache,
            device_id,
            name: name.into(),
            current: None,
            target: None,
            mode: None,
            state: OperatingState::Idle,
        })
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }

    /// Vendor's raw numeric mode, unmapped.
    pub fn mode(&self) -> Option<i64> {
        self.mode
    }

    fn apply(&mut self, snapshot: &Snapshot) -> Result<()> {
        let record = snapshot
            .get(&self.device_id)
            .ok_or(Error::DeviceNotFound(self.device_id))?;
        self.current = Some(record.data.temperature);
        self.target = Some(record.data.setpoint);
        self.mode = Some(record.data.mode);
        self.state = OperatingState::from_heat_level(record.data.heat_level);
        Ok(())
    }
}

#[async_trait]
impl ClimateEntity for Thermostat {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_temperature(&self) -> Option<f64> {
        self.current
    }

    fn target_temperature(&self) -> Option<f64> {
        self.target
    }

    fn min_temp(&self) -> f64 {
        self.min_temp
    }

    fn max_temp(&self) -> f64 {
        self.max_temp
    }

    fn operating_state(&self) -> OperatingState {
        self.state
    }

    /// A device that vanished from the snapshot is an error, not a
    /// silent reuse of stale values.
    async fn refresh(&mut self) -> Result<()> {
        let snapshot = {
            let mut cache = self.cache.lock().await;
            cache.refresh().await;
            cache.snapshot()
        };
        self.apply(&snapshot)
    }

    async fn set_target_temperature(&mut self, temperature: Option<f64>) -> Result<()> {
        let Some(temperature) = temperature else {
            return Ok(());
        };
        self.cache
            .lock()
            .await
            .set_temperature(self.device_id, temperature)
            .await?;
        // Optimistic: the portal does not acknowledge the value.
        self.target = Some(temperature);
        debug!(device = self.device_id, temperature, "setpoint written");
        Ok(())
    }
}
