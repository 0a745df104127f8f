use std::collections::HashMap;

use serde::Deserialize;

/// Static device description as returned by the gateway device listing.
/// Temperature bounds are fixed for the lifetime of the device.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub wattage: Option<f64>,
    pub temp_min: f64,
    pub temp_max: f64,
}

/// Current telemetry for one device. `mode` is the vendor's raw numeric
/// mode value, passed through unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceData {
    pub setpoint: f64,
    pub temperature: f64,
    pub mode: i64,
    pub heat_level: f64,
}

/// One snapshot entry: a device is present with both halves or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    pub info: DeviceInfo,
    pub data: DeviceData,
}

/// The most recent fully-fetched device mapping, replaced wholesale on
/// every successful refresh.
pub type Snapshot = HashMap<u64, DeviceRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingState {
    #[default]
    Idle,
    Heat,
}

impl OperatingState {
    /// Any nonzero heat level, positive or negative, counts as heating.
    pub fn from_heat_level(level: f64) -> Self {
        if level != 0.0 {
            OperatingState::Heat
        } else {
            OperatingState::Idle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingState::Idle => "idle",
            OperatingState::Heat => "heat",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_heat_level_is_heat() {
        assert_eq!(OperatingState::from_heat_level(1.0), OperatingState::Heat);
        assert_eq!(OperatingState::from_heat_level(0.25), OperatingState::Heat);
        assert_eq!(OperatingState::from_heat_level(-2.0), OperatingState::Heat);
    }

    #[test]
    fn zero_heat_level_is_idle() {
        assert_eq!(OperatingState::from_heat_level(0.0), OperatingState::Idle);
    }

    #[test]
    fn device_info_parses_wire_names() {
        let info: DeviceInfo = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Salon",
            "wattage": 1500.0,
            "tempMin": 5.0,
            "tempMax": 30.0
        }))
        .unwrap();
        assert_eq!(info.id, 42);
        assert_eq!(info.temp_min, 5.0);
        assert_eq!(info.temp_max, 30.0);
        assert_eq!(info.wattage, Some(1500.0));
    }

    #[test]
    fn device_data_parses_heat_level() {
        let data: DeviceData = serde_json::from_value(serde_json::json!({
            "setpoint": 21.0,
            "temperature": 19.5,
            "mode": 1,
            "heatLevel": 37.0
        }))
        .unwrap();
        assert_eq!(data.mode, 1);
        assert_eq!(data.heat_level, 37.0);
    }

    #[test]
    fn device_info_wattage_optional() {
        let info: DeviceInfo = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Bureau",
            "tempMin": 5.0,
            "tempMax": 30.0
        }))
        .unwrap();
        assert_eq!(info.wattage, None);
    }
}
