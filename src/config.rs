use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::cache::{DataCache, SharedCache};
use crate::client::NeviwebClient;
use crate::entity::Thermostat;
use crate::{Error, Result};

pub const DEFAULT_NAME: &str = "Sinope";

/// Options recognized by the host platform's configuration schema.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    pub username: String,
    pub password: String,
    /// Gateway display name as shown in the vendor portal.
    pub gateway: String,
    /// Entity display-name prefix.
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl PlatformConfig {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        gateway: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            gateway: gateway.into(),
            name: default_name(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("gateway", &self.gateway),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Platform entry point: log in, take an initial snapshot, and produce
/// one entity per device. A login or gateway-resolution failure is fatal
/// and no entities are created; a failed initial fetch just yields an
/// empty entity list.
pub async fn setup_platform(config: &PlatformConfig) -> Result<Vec<Thermostat>> {
    config.validate()?;

    let client = NeviwebClient::builder(&config.username, &config.password, &config.gateway)
        .login()
        .await?;
    let cache = DataCache::new(client).into_shared();
    cache.lock().await.refresh().await;

    build_entities(cache, &config.name).await
}

/// Build one named entity per device in the current snapshot, in
/// ascending device-id order so entity lists are stable across restarts.
pub async fn build_entities(cache: SharedCache, prefix: &str) -> Result<Vec<Thermostat>> {
    let snapshot = cache.lock().await.snapshot();
    let mut ids: Vec<u64> = snapshot.keys().copied().collect();
    ids.sort_unstable();

    let mut entities = Vec::with_capacity(ids.len());
    for id in ids {
        let name = format!("{prefix} {}", snapshot[&id].info.name);
        entities.push(Thermostat::new(Arc::clone(&cache), id, name).await?);
    }
    debug!(entities = entities.len(), "platform setup complete");
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_defaults_when_absent() {
        let config: PlatformConfig = serde_json::from_str(
            r#"{"username": "a@b.c", "password": "pw", "gateway": "Home"}"#,
        )
        .unwrap();
        assert_eq!(config.name, "Sinope");
        config.validate().unwrap();
    }

    #[test]
    fn explicit_name_kept() {
        let config: PlatformConfig = serde_json::from_str(
            r#"{"username": "a@b.c", "password": "pw", "gateway": "Home", "name": "Chalet"}"#,
        )
        .unwrap();
        assert_eq!(config.name, "Chalet");
    }

    #[test]
    fn empty_required_field_rejected() {
        let config = PlatformConfig::new("", "pw", "Home");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let config = PlatformConfig::new("a@b.c", "pw", "  ");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
